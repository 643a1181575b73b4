use crate::query::scorer::ScoredLine;
use std::cmp::Ordering;

/// Order lines by descending score.
///
/// Lines with equal scores keep their input order, whatever order they were
/// evaluated in.
pub fn rank(mut lines: Vec<ScoredLine<'_>>) -> Vec<ScoredLine<'_>> {
    lines.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.matches.index.cmp(&b.matches.index))
    });
    lines
}
