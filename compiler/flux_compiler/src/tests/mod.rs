//! Evaluator unit tests that outgrew their modules.

#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod closure_tests;
