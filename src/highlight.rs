//! Run-length highlight encoding
//!
//! Turns a line's claimed positions into consecutive runs of text that share
//! one ordered label list. Runs tile the line exactly and no two neighbours
//! carry the same labels.

use crate::query::executor::LineMatches;
use crate::query::paint::DEFAULT_LABEL;
use crate::query::scorer::ScoredLine;
use serde::Serialize;

/// Text span whose characters all carry the same labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightRun {
    pub text: String,
    #[serde(rename = "hl")]
    pub labels: Vec<&'static str>,
}

/// One ranked line for the structured document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightedLine {
    #[serde(rename = "lines")]
    pub runs: Vec<HighlightRun>,
    pub text: String,
}

impl HighlightedLine {
    pub fn from_scored(line: &ScoredLine<'_>) -> Self {
        Self {
            runs: encode_runs(&line.matches),
            text: line.matches.content.clone(),
        }
    }
}

/// Labels for the character starting at `offset`
fn labels_at(matches: &LineMatches<'_>, offset: usize) -> Vec<&'static str> {
    let claims = matches.claims_at(offset);
    if claims.is_empty() {
        vec![DEFAULT_LABEL]
    } else {
        claims.iter().map(|p| p.paint.label).collect()
    }
}

pub fn encode_runs(matches: &LineMatches<'_>) -> Vec<HighlightRun> {
    let mut runs: Vec<HighlightRun> = Vec::new();

    for (offset, ch) in matches.content.char_indices() {
        let labels = labels_at(matches, offset);
        match runs.last_mut() {
            Some(run) if run.labels == labels => run.text.push(ch),
            _ => runs.push(HighlightRun {
                text: ch.to_string(),
                labels,
            }),
        }
    }

    runs
}
