//! Query token compilation
//!
//! A token is an optional run of leading modifiers, a literal body and an
//! optional run of trailing modifiers:
//!
//! | Modifier     | Meaning                                   |
//! |--------------|-------------------------------------------|
//! | leading `!`  | inverted exact match                      |
//! | leading `^`  | anchored at line start                    |
//! | leading `'`  | exact (substring) match                   |
//! | trailing `$` | anchored at line end                      |
//! | trailing `'` | exact match bounded by word boundaries    |
//!
//! Without `!`, `^`, `'` or `$` the body is matched as a fuzzy subsequence.
//! Compilation is total: every string, including the empty one, yields a
//! predicate.

use crate::query::fuzzy::FuzzyPattern;
use crate::query::matcher::fold_case;
use crate::query::paint::Paint;
use rand::Rng;

/// Identity of a compiled predicate.
///
/// Two tokens with the same text compile to two predicates with distinct ids;
/// scoring and highlighting group by id, never by content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PredicateId(pub u32);

/// Mode flags parsed from a token's modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub exact: bool,
    pub word: bool,
    pub prefix: bool,
    pub suffix: bool,
    pub inverse: bool,
}

impl Modifiers {
    /// No exact/positional flag set: the body is a fuzzy subsequence
    pub fn is_fuzzy(&self) -> bool {
        !(self.exact || self.prefix || self.suffix)
    }
}

/// One compiled query token
#[derive(Debug, Clone)]
pub struct Predicate {
    id: PredicateId,
    /// Case-folded token body with modifiers stripped
    pub content: String,
    pub modifiers: Modifiers,
    pub paint: Paint,
    pub(crate) fuzzy: FuzzyPattern,
}

impl Predicate {
    pub fn id(&self) -> PredicateId {
        self.id
    }
}

/// Split a raw token into its modifiers and body
pub fn parse_modifiers(token: &str) -> (Modifiers, &str) {
    let mut modifiers = Modifiers::default();
    let mut body = token;

    while let Some(first) = body.as_bytes().first() {
        match first {
            b'!' => {
                modifiers.inverse = true;
                modifiers.exact = true;
            }
            b'^' => {
                modifiers.prefix = true;
                modifiers.exact = true;
            }
            b'\'' => modifiers.exact = true,
            _ => break,
        }
        body = &body[1..];
    }

    while let Some(last) = body.as_bytes().last() {
        match last {
            b'$' => {
                modifiers.suffix = true;
                modifiers.exact = true;
            }
            b'\'' => {
                modifiers.word = true;
                modifiers.exact = true;
            }
            _ => break,
        }
        body = &body[..body.len() - 1];
    }

    (modifiers, body)
}

/// Compiles tokens into predicates, handing out ids and paint.
///
/// The random source is owned by the compiler so a seeded generator gives
/// reproducible colours.
pub struct TokenCompiler<R> {
    rng: R,
    next_id: u32,
}

impl<R: Rng> TokenCompiler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, next_id: 0 }
    }

    pub fn compile(&mut self, token: &str) -> Predicate {
        let id = PredicateId(self.next_id);
        self.next_id += 1;
        compile_token(token, id, &mut self.rng)
    }
}

/// Compile a single token with an explicit id
pub fn compile_token<R: Rng + ?Sized>(token: &str, id: PredicateId, rng: &mut R) -> Predicate {
    // Paint is drawn before looking at the token so colours depend only on
    // the token's position in the query.
    let paint = Paint::random(rng);
    let (modifiers, body) = parse_modifiers(token);
    let content = fold_case(body);

    let fuzzy = if modifiers.is_fuzzy() {
        FuzzyPattern::new(&content)
    } else {
        FuzzyPattern::Empty
    };

    Predicate {
        id,
        content,
        modifiers,
        paint,
        fuzzy,
    }
}
