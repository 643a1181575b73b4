#![no_main]

use fzr::query::{FilterPlan, LineFilter};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Arbitrary)]
struct Input {
    tokens: Vec<String>,
    lines: Vec<String>,
}

fuzz_target!(|input: Input| {
    // Compilation is total and matching must never panic, whatever the
    // tokens contain
    let plan = FilterPlan::from_tokens(&input.tokens, StdRng::seed_from_u64(0));
    let ranked = LineFilter::new(&plan).parallel(false).run(&input.lines);

    for line in &ranked {
        let runs = fzr::highlight::encode_runs(&line.matches);
        let joined: String = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(joined, line.matches.content);
    }
});
