use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unsupported point configuration: {0}")]
    UnsupportedPointConfiguration(&'static str),

    #[error("scalar out of range: expected a value in [1, n-1]")]
    ScalarOutOfRange,

    #[error("coordinate out of range: expected a value below the field prime")]
    CoordinateOutOfRange,

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("unknown curve: {0}")]
    UnknownCurve(String),

    #[error("unknown hash algorithm: {0}")]
    UnknownHash(String),
}

/// Abort on a broken arithmetic invariant.
///
/// Reached only when domain parameters are corrupted (a non-prime modulus, a zero
/// input to inversion) or the signing retry budget is exhausted. Never recovered.
#[cold]
#[track_caller]
pub fn invariant_violation(what: &str) -> ! {
    panic!("arithmetic invariant violation: {what}")
}
