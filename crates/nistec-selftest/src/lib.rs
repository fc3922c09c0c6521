//! Randomized self-test of the ECDSA engine across the NIST curves.

#![forbid(unsafe_code)]

pub mod case;
pub mod parallel;

pub use case::{run_case, CaseFailure, CaseOutcome};
pub use parallel::{rerun_case, run_parallel, SelfTestReport};
