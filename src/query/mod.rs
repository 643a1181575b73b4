pub mod executor;
pub mod fuzzy;
pub mod matcher;
pub mod paint;
pub mod plan;
pub mod ranker;
pub mod scorer;
pub mod token;

pub use executor::{LineFilter, LineMatches, evaluate_line};
pub use matcher::{MatchResult, fold_case};
pub use paint::{DEFAULT_LABEL, PALETTE, Paint};
pub use plan::{FilterPlan, OR_MARKER, PredicateGroup};
pub use ranker::rank;
pub use scorer::{ScoredLine, score_line};
pub use token::{Modifiers, Predicate, PredicateId, TokenCompiler, compile_token};
