//! Core error type and invariant helpers shared by the nistec crates.

#![forbid(unsafe_code)]

mod error;

pub use error::{invariant_violation, Error};

pub type Result<T> = std::result::Result<T, Error>;
