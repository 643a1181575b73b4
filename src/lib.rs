//! # fzr - line filter and ranker
//!
//! fzr takes candidate lines (usually file paths) and a list of query tokens,
//! keeps the lines that satisfy the query, ranks them by match quality and
//! renders them twice: colored on stdout and as a JSON highlight document on
//! stderr for an editor front end.
//!
//! ## Architecture
//!
//! - [`query`] - token compilation, filter plans, matching, scoring, ranking
//! - [`highlight`] - run-length highlight encoding of match positions
//! - [`output`] - terminal and JSON rendering
//! - [`source`] - stdin, directory and command line sources
//! - [`config`] - config file loading
//! - [`error`] - error types
//!
//! ## Quick Start
//!
//! ```
//! use fzr::query::{FilterPlan, LineFilter};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let tokens = ["src", "|", "lib", "rs$"];
//! let plan = FilterPlan::from_tokens(&tokens, StdRng::seed_from_u64(0));
//!
//! let lines = ["src/main.rs", "docs/readme.md", "lib/util.rs"];
//! let ranked = LineFilter::new(&plan).run(&lines);
//!
//! assert_eq!(ranked.len(), 2);
//! for line in &ranked {
//!     println!("{:>6.1} {}", line.score, line.matches.content);
//! }
//! ```
//!
//! ## Query syntax
//!
//! Each token is one predicate. Tokens are AND-ed; a `|` token joins the next
//! token into the previous group as an alternative. Modifiers: leading `!`
//! (must not contain), `^` (starts with), `'` (exact), trailing `$` (ends
//! with) and `'` (whole word). A bare token is a fuzzy subsequence match.

pub mod config;
pub mod error;
pub mod highlight;
pub mod output;
pub mod query;
pub mod source;
