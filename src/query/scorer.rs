//! Relevance scoring for surviving lines
//!
//! Each predicate's claimed positions are scored on their own and the results
//! are summed:
//! - every position earns a base match score plus a bonus when it follows a
//!   separator or starts the line (full bonus) or follows an alphanumeric
//!   (half bonus)
//! - adjacent positions earn a consecutive bonus
//! - any other gap costs a fixed penalty plus the gap length
//!
//! The weights are fixed so scores stay comparable with other consumers of the
//! same ranking.

use crate::query::executor::LineMatches;
use crate::query::token::PredicateId;
use std::collections::BTreeMap;

/// Base score for each matched position
pub const MATCH_SCORE: f64 = 10.0;
/// Weight applied to a position's boundary bonus
pub const BONUS_WEIGHT: f64 = 10.0;
/// Added for each pair of adjacent positions
pub const CONSECUTIVE_BONUS: f64 = 5.0;
/// Fixed cost of a gap between positions
pub const GAP_PENALTY: f64 = 3.0;
/// Cost per unit of gap length
pub const GAP_UNIT: f64 = 1.0;

/// Bytes after which a match counts as starting a new segment
const SEPARATORS: &[u8] = b"/_-.: ";

/// A surviving line with its score
#[derive(Debug, Clone)]
pub struct ScoredLine<'p> {
    pub matches: LineMatches<'p>,
    pub score: f64,
}

/// Boundary bonus for the position at byte offset `pos` of `content`
pub fn position_bonus(content: &[u8], pos: usize) -> f64 {
    if pos == 0 {
        return 1.0;
    }

    match content.get(pos - 1) {
        Some(b) if SEPARATORS.contains(b) => 1.0,
        Some(b) if b.is_ascii_alphanumeric() => 0.5,
        _ => 0.0,
    }
}

/// Score one predicate's positions, which must be sorted ascending
pub fn score_positions(content: &[u8], positions: &[usize]) -> f64 {
    let base: f64 = positions
        .iter()
        .map(|&p| MATCH_SCORE + BONUS_WEIGHT * position_bonus(content, p))
        .sum();

    let gaps: f64 = positions
        .windows(2)
        .map(|pair| {
            let gap = pair[1] - pair[0];
            if gap == 1 {
                CONSECUTIVE_BONUS
            } else {
                -(GAP_PENALTY + gap as f64 * GAP_UNIT)
            }
        })
        .sum();

    base + gaps
}

/// Total score of a line.
///
/// Positions are regrouped per predicate identity; predicates are visited in
/// id order so the floating point sum is reproducible.
pub fn score_line(matches: &LineMatches<'_>) -> f64 {
    let mut by_predicate: BTreeMap<PredicateId, Vec<usize>> = BTreeMap::new();

    // Claims iterate in ascending position order, so every list comes out sorted
    for (&pos, predicates) in &matches.claims {
        for predicate in predicates {
            by_predicate.entry(predicate.id()).or_default().push(pos);
        }
    }

    let content = matches.content.as_bytes();
    by_predicate
        .values()
        .filter(|positions| !positions.is_empty())
        .map(|positions| score_positions(content, positions))
        .sum()
}
