//! Fuzzy subsequence search
//!
//! Finds the shortest span of a line that contains every character of the
//! query in order. A lazy regex (`a.*?b.*?c`) locates the leftmost candidate
//! at or after each start offset, then a greedy walk from the candidate start
//! turns it into concrete positions. The tightest candidate wins; on equal
//! spans the leftmost one is kept.

use regex::Regex;
use tracing::warn;

/// Compiled fuzzy pattern for one predicate
#[derive(Debug, Clone)]
pub enum FuzzyPattern {
    /// Searchable pattern plus the characters to walk
    Compiled { regex: Regex, chars: Vec<char> },
    /// Empty query content never matches
    Empty,
    /// The pattern engine rejected the content; never matches
    Invalid,
}

impl FuzzyPattern {
    pub fn new(content: &str) -> Self {
        let chars: Vec<char> = content.chars().collect();
        if chars.is_empty() {
            return FuzzyPattern::Empty;
        }

        match Regex::new(&build_pattern(&chars)) {
            Ok(regex) => FuzzyPattern::Compiled { regex, chars },
            Err(e) => {
                warn!(target: "fzr::query", content, error = %e, "fuzzy pattern rejected, predicate will never match");
                FuzzyPattern::Invalid
            }
        }
    }

    /// Positions of the shortest subsequence span, or `None` if the line
    /// does not contain the whole query
    pub fn find(&self, line: &str) -> Option<Vec<usize>> {
        let FuzzyPattern::Compiled { regex, chars } = self else {
            return None;
        };

        let first_len = chars[0].len_utf8();
        let mut best: Option<Vec<usize>> = None;
        let mut at = 0;

        // Starts between `at` and the match start all resolve to the same
        // candidate, so jump straight past it.
        while at <= line.len() {
            let Some(m) = regex.find_at(line, at) else {
                break;
            };

            if let Some(positions) = walk(line, m.start(), chars) {
                let tighter = match &best {
                    Some(current) => span(&positions) < span(current),
                    None => true,
                };
                if tighter {
                    best = Some(positions);
                }
            }

            at = m.start() + first_len;
        }

        best
    }
}

/// Lazy pattern over the query characters, alphanumerics verbatim and
/// everything else escaped
fn build_pattern(chars: &[char]) -> String {
    let mut pattern = String::from("(?s)");
    let mut buf = [0u8; 4];

    for (i, &ch) in chars.iter().enumerate() {
        if i > 0 {
            pattern.push_str(".*?");
        }
        if ch.is_alphanumeric() {
            pattern.push(ch);
        } else {
            pattern.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
        }
    }

    pattern
}

/// Greedy left-to-right subsequence walk starting at byte offset `start`
fn walk(line: &str, start: usize, chars: &[char]) -> Option<Vec<usize>> {
    let mut positions = Vec::with_capacity(chars.len());
    let mut wanted = chars.iter().peekable();

    for (offset, ch) in line[start..].char_indices() {
        match wanted.peek() {
            Some(&&w) if w == ch => {
                positions.push(start + offset);
                wanted.next();
                if wanted.peek().is_none() {
                    break;
                }
            }
            Some(_) => {}
            None => break,
        }
    }

    wanted.peek().is_none().then_some(positions)
}

fn span(positions: &[usize]) -> usize {
    match (positions.first(), positions.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_contiguous_span() {
        let pattern = FuzzyPattern::new("ab");
        assert_eq!(pattern.find("axxabxxab"), Some(vec![3, 4]));
    }

    #[test]
    fn test_leftmost_on_equal_span() {
        let pattern = FuzzyPattern::new("ab");
        assert_eq!(pattern.find("a_b a_b"), Some(vec![0, 2]));
    }

    #[test]
    fn test_scattered_subsequence() {
        let pattern = FuzzyPattern::new("smr");
        assert_eq!(pattern.find("src/main.rs"), Some(vec![0, 4, 9]));
    }

    #[test]
    fn test_shorter_span_later_in_line() {
        let pattern = FuzzyPattern::new("abc");
        // a(0) b(5) c(6) spans 6; a(4) b(5) c(6) spans 2
        assert_eq!(pattern.find("axxxabc"), Some(vec![4, 5, 6]));
    }

    #[test]
    fn test_missing_character() {
        let pattern = FuzzyPattern::new("abz");
        assert_eq!(pattern.find("a b c"), None);
    }

    #[test]
    fn test_order_matters() {
        let pattern = FuzzyPattern::new("ba");
        assert_eq!(pattern.find("ab"), None);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let pattern = FuzzyPattern::new("a.(b");
        assert!(matches!(pattern, FuzzyPattern::Compiled { .. }));
        assert_eq!(pattern.find("axbxc"), None);
        assert_eq!(pattern.find("a.x(b"), Some(vec![0, 1, 3, 4]));
    }

    #[test]
    fn test_repeated_characters() {
        let pattern = FuzzyPattern::new("aa");
        assert_eq!(pattern.find("a-b-aa"), Some(vec![4, 5]));
    }

    #[test]
    fn test_multibyte_positions_are_char_starts() {
        let pattern = FuzzyPattern::new("éb");
        assert_eq!(pattern.find("xéb"), Some(vec![1, 3]));
    }

    #[test]
    fn test_empty_never_matches() {
        let pattern = FuzzyPattern::new("");
        assert!(matches!(pattern, FuzzyPattern::Empty));
        assert_eq!(pattern.find("anything"), None);
    }

    #[test]
    fn test_invalid_never_matches() {
        assert_eq!(FuzzyPattern::Invalid.find("abc"), None);
    }
}
