//! Filter plan: AND of OR-groups
//!
//! Tokens are grouped left to right. Each token opens a new group unless the
//! token before it was the OR marker, in which case it joins the previous
//! group. A line passes the plan when every group has at least one satisfied
//! predicate; an empty plan passes every line.

use crate::query::token::{Predicate, TokenCompiler};
use rand::Rng;
use tracing::debug;

/// Token that joins the next token into the previous group
pub const OR_MARKER: &str = "|";

/// Predicates related by OR; never empty
#[derive(Debug, Clone)]
pub struct PredicateGroup {
    predicates: Vec<Predicate>,
}

impl PredicateGroup {
    fn new(first: Predicate) -> Self {
        Self {
            predicates: vec![first],
        }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }
}

/// Ordered predicate groups, AND-ed together
#[derive(Debug, Clone, Default)]
pub struct FilterPlan {
    groups: Vec<PredicateGroup>,
}

impl FilterPlan {
    /// Build a plan, compiling every non-marker token with `compiler`
    pub fn compile<S, R>(tokens: &[S], compiler: &mut TokenCompiler<R>) -> Self
    where
        S: AsRef<str>,
        R: Rng,
    {
        let mut groups: Vec<PredicateGroup> = Vec::new();
        let mut join_previous = false;

        for token in tokens {
            let token = token.as_ref();
            if token == OR_MARKER {
                join_previous = true;
                continue;
            }

            let predicate = compiler.compile(token);
            match groups.last_mut() {
                // A leading marker has no group to join
                Some(group) if join_previous => group.predicates.push(predicate),
                _ => groups.push(PredicateGroup::new(predicate)),
            }
            join_previous = false;
        }

        let plan = Self { groups };
        debug!(
            target: "fzr::query",
            groups = plan.groups.len(),
            predicates = plan.predicate_count(),
            "compiled filter plan"
        );
        plan
    }

    /// Build a plan with a fresh compiler over `rng`
    pub fn from_tokens<S: AsRef<str>, R: Rng>(tokens: &[S], rng: R) -> Self {
        Self::compile(tokens, &mut TokenCompiler::new(rng))
    }

    pub fn groups(&self) -> &[PredicateGroup] {
        &self.groups
    }

    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.groups.iter().flat_map(|g| g.predicates.iter())
    }

    pub fn predicate_count(&self) -> usize {
        self.groups.iter().map(|g| g.predicates.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn plan(tokens: &[&str]) -> FilterPlan {
        FilterPlan::from_tokens(tokens, StdRng::seed_from_u64(1))
    }

    fn contents(plan: &FilterPlan) -> Vec<Vec<&str>> {
        plan.groups()
            .iter()
            .map(|g| g.predicates().iter().map(|p| p.content.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_each_token_is_a_group() {
        let p = plan(&["foo", "bar"]);
        assert_eq!(contents(&p), vec![vec!["foo"], vec!["bar"]]);
    }

    #[test]
    fn test_or_marker_joins_previous_group() {
        let p = plan(&["foo", "|", "bar", "baz"]);
        assert_eq!(contents(&p), vec![vec!["foo", "bar"], vec!["baz"]]);
    }

    #[test]
    fn test_chained_or() {
        let p = plan(&["a", "|", "b", "|", "c"]);
        assert_eq!(contents(&p), vec![vec!["a", "b", "c"]]);
        assert_eq!(p.predicate_count(), 3);
    }

    #[test]
    fn test_leading_and_trailing_markers() {
        let p = plan(&["|", "a", "b", "|"]);
        assert_eq!(contents(&p), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_empty_plan() {
        let p = plan(&[]);
        assert!(p.is_empty());
        assert_eq!(p.predicates().count(), 0);
    }

    #[test]
    fn test_ids_follow_token_order() {
        let p = plan(&["a", "|", "b", "c"]);
        let ids: Vec<u32> = p.predicates().map(|pr| pr.id().0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
