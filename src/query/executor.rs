use crate::query::matcher::fold_case;
use crate::query::plan::FilterPlan;
use crate::query::ranker::rank;
use crate::query::scorer::{ScoredLine, score_line};
use crate::query::token::Predicate;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Matches recorded for one surviving line
#[derive(Debug, Clone)]
pub struct LineMatches<'p> {
    /// Position of the line in the input, used for stable ranking
    pub index: usize,
    /// Original (unfolded) line text
    pub content: String,
    /// Byte offset -> predicates that claimed it, in evaluation order
    pub claims: BTreeMap<usize, Vec<&'p Predicate>>,
}

impl<'p> LineMatches<'p> {
    /// Predicates claiming the character starting at `offset`
    pub fn claims_at(&self, offset: usize) -> &[&'p Predicate] {
        self.claims.get(&offset).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Run every group of `plan` against `line`.
///
/// Returns `None` as soon as a group has no satisfied predicate.
pub fn evaluate_line<'p>(plan: &'p FilterPlan, index: usize, line: &str) -> Option<LineMatches<'p>> {
    let folded = fold_case(line);
    let mut claims: BTreeMap<usize, Vec<&'p Predicate>> = BTreeMap::new();

    for group in plan.groups() {
        let mut satisfied = false;

        for predicate in group.predicates() {
            let result = predicate.find(&folded);
            satisfied |= result.is_satisfied();
            for &pos in result.positions() {
                claims.entry(pos).or_default().push(predicate);
            }
        }

        if !satisfied {
            return None;
        }
    }

    Some(LineMatches {
        index,
        content: line.to_string(),
        claims,
    })
}

/// Filters, scores and ranks a batch of lines against one plan
pub struct LineFilter<'p> {
    plan: &'p FilterPlan,
    parallel: bool,
}

impl<'p> LineFilter<'p> {
    pub fn new(plan: &'p FilterPlan) -> Self {
        Self {
            plan,
            parallel: true,
        }
    }

    /// Evaluate lines on the rayon pool (default) or on the calling thread
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Surviving lines, best score first, input order among equal scores
    pub fn run<S>(&self, lines: &[S]) -> Vec<ScoredLine<'p>>
    where
        S: AsRef<str> + Sync,
    {
        let plan = self.plan;
        let evaluate = |(index, line): (usize, &S)| {
            evaluate_line(plan, index, line.as_ref()).map(|matches| {
                let score = score_line(&matches);
                ScoredLine { matches, score }
            })
        };

        let scored: Vec<ScoredLine<'p>> = if self.parallel {
            lines.par_iter().enumerate().filter_map(evaluate).collect()
        } else {
            lines.iter().enumerate().filter_map(evaluate).collect()
        };

        debug!(
            target: "fzr::query",
            input = lines.len(),
            matched = scored.len(),
            "filtered lines"
        );

        rank(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn plan(tokens: &[&str]) -> FilterPlan {
        FilterPlan::from_tokens(tokens, StdRng::seed_from_u64(5))
    }

    #[test]
    fn test_empty_plan_matches_everything() {
        let p = plan(&[]);
        let m = evaluate_line(&p, 0, "anything").unwrap();
        assert!(m.claims.is_empty());
        assert_eq!(m.content, "anything");
    }

    #[test]
    fn test_or_group_semantics() {
        let p = plan(&["foo", "|", "bar", "baz"]);
        assert!(evaluate_line(&p, 0, "foobaz").is_some());
        assert!(evaluate_line(&p, 0, "barbaz").is_some());
        assert!(evaluate_line(&p, 0, "quxbaz").is_none());
        assert!(evaluate_line(&p, 0, "foobar").is_none());
    }

    #[test]
    fn test_inverted_predicate_records_nothing() {
        let p = plan(&["!foo"]);
        let m = evaluate_line(&p, 0, "nothing").unwrap();
        assert!(m.claims.is_empty());
        assert!(evaluate_line(&p, 0, "nofoobar").is_none());
    }

    #[test]
    fn test_overlapping_claims_keep_order() {
        let p = plan(&["'ab", "'b"]);
        let m = evaluate_line(&p, 0, "ab").unwrap();
        let ids: Vec<u32> = m.claims_at(1).iter().map(|pr| pr.id().0).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(m.claims_at(0).len(), 1);
        assert!(m.claims_at(5).is_empty());
    }

    #[test]
    fn test_content_keeps_original_case() {
        let p = plan(&["'main"]);
        let m = evaluate_line(&p, 3, "src/MAIN.rs").unwrap();
        assert_eq!(m.content, "src/MAIN.rs");
        assert_eq!(m.index, 3);
        assert_eq!(m.claims.keys().copied().collect::<Vec<_>>(), vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let p = plan(&["sr", "|", "lib", "rs$"]);
        let lines: Vec<String> = (0..200)
            .map(|i| match i % 4 {
                0 => format!("src/mod_{i}.rs"),
                1 => format!("lib/{i}/x.rs"),
                2 => format!("docs/{i}.md"),
                _ => format!("s/r/{i}.rs"),
            })
            .collect();

        let par = LineFilter::new(&p).parallel(true).run(&lines);
        let seq = LineFilter::new(&p).parallel(false).run(&lines);

        let key = |v: &[ScoredLine]| -> Vec<(usize, f64)> {
            v.iter().map(|s| (s.matches.index, s.score)).collect()
        };
        assert_eq!(key(&par), key(&seq));
        assert_eq!(par.len(), 150);
    }
}
