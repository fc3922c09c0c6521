//! Multi-threaded self-test runner.

#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use nistec_crypto::{with_curve, CurveId};
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use sha2::{Digest, Sha256};

use crate::case::{run_case, CaseOutcome};

/// Result of a self-test run on one curve.
#[derive(Clone, Debug)]
pub struct SelfTestReport {
    pub curve: CurveId,
    /// Cases asked for.
    pub requested: u64,
    /// Cases actually run before finishing or being stopped.
    pub completed: u64,
    /// Failing cases with their ids.
    pub failures: Vec<(u64, CaseOutcome)>,
    /// Per-run salt; with a case id it reproduces that case via [`rerun_case`].
    pub salt: [u8; 32],
}

impl SelfTestReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn was_stopped(&self) -> bool {
        self.completed < self.requested
    }
}

/// Run `cases` randomized cases on `curve`.
///
/// Runs until all cases are done or `stop` is set to true.
/// Uses all available CPU cores via rayon. `counter` is incremented once
/// per finished case and may be shared across runs for progress reporting.
///
/// NOTE: every case gets its own generator seeded from a per-run random salt + case id.
pub fn run_parallel(
    curve: CurveId,
    cases: u64,
    max_message_len: usize,
    stop: Arc<AtomicBool>,
    counter: Arc<AtomicU64>,
) -> SelfTestReport {
    let mut salt = [0u8; 32];
    OsRng.fill_bytes(&mut salt);

    run_with_salt(curve, cases, max_message_len, &stop, &counter, &salt)
}

/// Run a single case of an earlier run again.
pub fn rerun_case(curve: CurveId, salt: &[u8; 32], case_id: u64, max_message_len: usize) -> CaseOutcome {
    let mut rng = ChaCha20Rng::from_seed(seed_from_counter(case_id, salt));
    with_curve!(curve, C => run_case::<C, _>(&mut rng, max_message_len))
}

fn run_with_salt(
    curve: CurveId,
    cases: u64,
    max_message_len: usize,
    stop: &AtomicBool,
    counter: &AtomicU64,
    salt: &[u8; 32],
) -> SelfTestReport {
    let completed = AtomicU64::new(0);

    let mut failures: Vec<(u64, CaseOutcome)> = (0..cases)
        .into_par_iter()
        .filter_map(|case_id| {
            if stop.load(Ordering::Relaxed) {
                return None;
            }

            let outcome = rerun_case(curve, salt, case_id, max_message_len);
            completed.fetch_add(1, Ordering::Relaxed);
            counter.fetch_add(1, Ordering::Relaxed);

            if outcome.is_success() {
                None
            } else {
                Some((case_id, outcome))
            }
        })
        .collect();
    failures.sort_by_key(|(case_id, _)| *case_id);

    SelfTestReport {
        curve,
        requested: cases,
        completed: completed.into_inner(),
        failures,
        salt: *salt,
    }
}

/// Convert a case id into a 32-byte generator seed using a per-run salt.
///
/// seed = sha256(salt || case_id_le)
fn seed_from_counter(counter: u64, salt: &[u8; 32]) -> [u8; 32] {
    let mut buf = [0u8; 40]; // 32 salt + 8 counter
    buf[..32].copy_from_slice(salt);
    buf[32..40].copy_from_slice(&counter.to_le_bytes());
    Sha256::digest(buf).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_from_counter_deterministic_with_fixed_salt() {
        let salt = [7u8; 32];
        let s1 = seed_from_counter(12345, &salt);
        let s2 = seed_from_counter(12345, &salt);
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_seed_from_counter_different() {
        let salt = [7u8; 32];
        assert_ne!(seed_from_counter(1, &salt), seed_from_counter(2, &salt));
        assert_ne!(seed_from_counter(1, &salt), seed_from_counter(1, &[8u8; 32]));
    }

    #[test]
    fn test_run_small_batch() {
        let stop = Arc::new(AtomicBool::new(false));
        let counter = Arc::new(AtomicU64::new(0));

        let report = run_parallel(CurveId::P256, 6, 128, stop, counter.clone());

        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(report.completed, 6);
        assert!(!report.was_stopped());
        assert_eq!(counter.load(Ordering::Relaxed), 6);
    }

    #[test]
    fn test_round_trips_all_curves() {
        for (curve, cases) in [(CurveId::P256, 128), (CurveId::P384, 32), (CurveId::P521, 16)] {
            let stop = Arc::new(AtomicBool::new(false));
            let counter = Arc::new(AtomicU64::new(0));

            let report = run_parallel(curve, cases, 256, stop, counter);

            assert!(report.is_success(), "{curve}: {:?}", report.failures);
            assert_eq!(report.completed, cases);
        }
    }

    #[test]
    fn test_run_stops_when_signaled() {
        let stop = Arc::new(AtomicBool::new(true));
        let counter = Arc::new(AtomicU64::new(0));

        let report = run_parallel(CurveId::P521, 1000, 64, stop, counter);

        assert_eq!(report.completed, 0);
        assert!(report.was_stopped());
        assert!(report.is_success());
    }

    #[test]
    fn test_rerun_reproduces_case() {
        let salt = [3u8; 32];
        let a = rerun_case(CurveId::P384, &salt, 17, 512);
        let b = rerun_case(CurveId::P384, &salt, 17, 512);
        assert_eq!(a, b);
        assert_eq!(a.curve, CurveId::P384);
    }

    #[test]
    fn test_fixed_salt_run() {
        let stop = AtomicBool::new(false);
        let counter = AtomicU64::new(10);
        let report = run_with_salt(CurveId::P384, 3, 32, &stop, &counter, &[9u8; 32]);
        assert_eq!(report.salt, [9u8; 32]);
        assert_eq!(report.completed, 3);
        assert_eq!(counter.load(Ordering::Relaxed), 13);
    }
}
