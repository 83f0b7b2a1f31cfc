#![allow(clippy::unwrap_used, clippy::panic, clippy::expect_used)]

//! Conformance harness over WHATWG `urltestdata`-format vectors.
//!
//! The corpus lives in `tests/data/urltestdata.json`; success records
//! compare the serializer and every component accessor, failure records
//! expect `ParseOutcome::Failure`.

mod loader;
mod runner;

use loader::load_test_cases;
use runner::run_test_cases;

#[test]
fn urltestdata_vectors() {
    let cases = load_test_cases();
    assert!(!cases.is_empty(), "no test vectors loaded");

    let result = run_test_cases(cases);
    assert_eq!(
        result.failed, 0,
        "{} conformance failures:\n{}",
        result.failed,
        result.report()
    );
    assert!(result.passed > 0);
}
