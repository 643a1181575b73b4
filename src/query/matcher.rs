//! Per-predicate position discovery
//!
//! Positions are byte offsets into the case-folded line. A predicate's mode is
//! resolved in priority order: prefix, suffix, word-bounded exact, exact,
//! fuzzy. Inverted predicates never report positions; they either fail (the
//! positive condition held) or report [`MatchResult::Absent`].

use crate::query::token::Predicate;
use memchr::memmem;

/// Outcome of evaluating one predicate against one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// Claimed byte offsets; empty means the predicate did not match
    Positions(Vec<usize>),
    /// An inverted predicate whose text is absent from the line
    Absent,
}

impl MatchResult {
    /// Whether this result satisfies the predicate's group
    pub fn is_satisfied(&self) -> bool {
        match self {
            MatchResult::Positions(positions) => !positions.is_empty(),
            MatchResult::Absent => true,
        }
    }

    /// Positions to record for highlighting and scoring
    pub fn positions(&self) -> &[usize] {
        match self {
            MatchResult::Positions(positions) => positions,
            MatchResult::Absent => &[],
        }
    }
}

/// Word characters for boundary checks: ASCII alphanumerics and `_`
#[inline]
pub fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Lowercase `text` without moving any byte offsets.
///
/// Characters whose lowercase form has a different UTF-8 length are kept as
/// they are, so offsets into the folded string are valid in the original.
pub fn fold_case(text: &str) -> String {
    if text.is_ascii() {
        return text.to_ascii_lowercase();
    }

    let mut folded = String::with_capacity(text.len());
    for ch in text.chars() {
        let mut lower = ch.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) if l.len_utf8() == ch.len_utf8() => folded.push(l),
            _ => folded.push(ch),
        }
    }
    folded
}

impl Predicate {
    /// Evaluate this predicate against an already case-folded line
    pub fn find(&self, line: &str) -> MatchResult {
        let found = if self.content.len() > line.len() {
            None
        } else if self.modifiers.prefix {
            self.find_prefix(line)
        } else if self.modifiers.suffix {
            self.find_suffix(line)
        } else if self.modifiers.exact && self.modifiers.word {
            self.find_words(line)
        } else if self.modifiers.exact {
            self.find_exact(line)
        } else {
            self.fuzzy.find(line)
        };

        match (found, self.modifiers.inverse) {
            (Some(positions), false) => MatchResult::Positions(positions),
            (None, false) => MatchResult::Positions(Vec::new()),
            (Some(_), true) => MatchResult::Positions(Vec::new()),
            (None, true) => MatchResult::Absent,
        }
    }

    fn find_prefix(&self, line: &str) -> Option<Vec<usize>> {
        if self.content.is_empty() {
            return Some(char_starts(line));
        }

        let end = self.content.len();
        let bounded = !self.modifiers.word || boundary_after(line.as_bytes(), end);
        (line.starts_with(self.content.as_str()) && bounded).then(|| (0..end).collect())
    }

    fn find_suffix(&self, line: &str) -> Option<Vec<usize>> {
        if self.content.is_empty() {
            return Some(char_starts(line));
        }

        let start = line.len() - self.content.len();
        let bounded = !self.modifiers.word || boundary_before(line.as_bytes(), start);
        (line.ends_with(self.content.as_str()) && bounded).then(|| (start..line.len()).collect())
    }

    fn find_words(&self, line: &str) -> Option<Vec<usize>> {
        if self.content.is_empty() {
            return Some(char_starts(line));
        }

        let bytes = line.as_bytes();
        let needle = self.content.as_bytes();
        let finder = memmem::Finder::new(needle);
        let mut positions = Vec::new();
        let mut at = 0;

        while let Some(found) = finder.find(&bytes[at..]) {
            let start = at + found;
            let end = start + needle.len();
            if is_transition(bytes, start) && is_transition(bytes, end) {
                positions.extend(start..end);
                at = end;
            } else {
                at = start + 1;
            }
        }

        (!positions.is_empty()).then_some(positions)
    }

    fn find_exact(&self, line: &str) -> Option<Vec<usize>> {
        if self.content.is_empty() {
            return Some(char_starts(line));
        }

        let len = self.content.len();
        let positions: Vec<usize> = memmem::find_iter(line.as_bytes(), self.content.as_bytes())
            .flat_map(|start| start..start + len)
            .collect();

        (!positions.is_empty()).then_some(positions)
    }
}

fn boundary_before(bytes: &[u8], start: usize) -> bool {
    start == 0 || !is_word_byte(bytes[start - 1])
}

fn boundary_after(bytes: &[u8], end: usize) -> bool {
    bytes.get(end).is_none_or(|&b| !is_word_byte(b))
}

/// Word/non-word change between the bytes around `at`; line edges count
/// as non-word
fn is_transition(bytes: &[u8], at: usize) -> bool {
    let before = at
        .checked_sub(1)
        .and_then(|i| bytes.get(i))
        .is_some_and(|&b| is_word_byte(b));
    let after = bytes.get(at).is_some_and(|&b| is_word_byte(b));
    before != after
}

fn char_starts(line: &str) -> Vec<usize> {
    line.char_indices().map(|(i, _)| i).collect()
}
