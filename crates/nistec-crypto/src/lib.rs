//! Prime-field arithmetic, NIST curve group law and ECDSA for nistec.
//!
//! All arithmetic is implemented from scratch on fixed-width limbs.
//! Reference crates (p256, p384) are dev-dependencies only.

#![forbid(unsafe_code)]

pub mod curve;
pub mod ecdsa;
pub mod field;
pub mod hash;
pub mod mul;
pub mod point;
pub mod uint;

pub use curve::{Curve, CurveId, NistP256, NistP384, NistP521};
pub use ecdsa::{Ecdsa, KeyPair, Signature, MAX_SIGN_ATTEMPTS};
pub use hash::{DigestReduction, HashAlgorithm};
pub use point::Point;
pub use uint::Uint;
