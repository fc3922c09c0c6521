//! NIST CAVP ECDSA vector files (`SigGen.txt`, `SigVer.rsp`, `KeyPair.rsp`).
//!
//! Files are parsed into sections and records, then replayed against the
//! `nistec-crypto` engine.

#![forbid(unsafe_code)]

mod error;
pub mod parser;
pub mod runner;

pub use error::CavpError;
pub use parser::{parse, parse_file, Record, Section, VectorKind};
pub use runner::{replay, replay_key_pair, replay_sig_gen, replay_sig_ver, Failure, ReplayOptions, Report};
