//! One randomized sign/verify case.
//!
//! Pipeline: key pair → random message → sign → verify → tampered inputs must fail

#![forbid(unsafe_code)]

use std::fmt;

use nistec_crypto::curve::Curve;
use nistec_crypto::{CurveId, Ecdsa, Signature};
use rand::{CryptoRng, Rng, RngCore};

/// A check that did not hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaseFailure {
    /// Signing returned no signature (self-check failed).
    SignFailed,
    /// The untouched signature was rejected.
    Rejected,
    TamperedMessageAccepted,
    TamperedRAccepted,
    TamperedSAccepted,
    WrongKeyAccepted,
}

impl fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::SignFailed => "signing failed its self-check",
            Self::Rejected => "valid signature rejected",
            Self::TamperedMessageAccepted => "signature accepted for a modified message",
            Self::TamperedRAccepted => "signature accepted with a modified r",
            Self::TamperedSAccepted => "signature accepted with a modified s",
            Self::WrongKeyAccepted => "signature accepted under an unrelated key",
        };
        f.write_str(text)
    }
}

/// Result of a single case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseOutcome {
    pub curve: CurveId,
    pub message_len: usize,
    pub failures: Vec<CaseFailure>,
}

impl CaseOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run one case on curve `C` with a message of random length in `0..=max_message_len`.
pub fn run_case<C: Curve, R: RngCore + CryptoRng>(
    rng: &mut R,
    max_message_len: usize,
) -> CaseOutcome {
    let ecdsa = Ecdsa::<C>::new();
    let mut outcome = CaseOutcome {
        curve: C::ID,
        message_len: rng.gen_range(0..=max_message_len),
        failures: Vec::new(),
    };

    let mut message = vec![0u8; outcome.message_len];
    rng.fill_bytes(&mut message);

    let key_pair = ecdsa.generate_keypair(rng);
    let Some(public) = key_pair.public else {
        outcome.failures.push(CaseFailure::SignFailed);
        return outcome;
    };
    let Some(signature) = ecdsa.sign(rng, &message, &key_pair) else {
        outcome.failures.push(CaseFailure::SignFailed);
        return outcome;
    };

    if !ecdsa.verify(&message, &public, &signature) {
        outcome.failures.push(CaseFailure::Rejected);
    }

    let tampered = tamper_message(rng, &message);
    if ecdsa.verify(&tampered, &public, &signature) {
        outcome.failures.push(CaseFailure::TamperedMessageAccepted);
    }

    let order_bits = C::scalar_modulus().bits();
    let bad_r = Signature::new(signature.r.flip_bit(rng.gen_range(0..order_bits)), signature.s);
    if ecdsa.verify(&message, &public, &bad_r) {
        outcome.failures.push(CaseFailure::TamperedRAccepted);
    }

    let bad_s = Signature::new(signature.r, signature.s.flip_bit(rng.gen_range(0..order_bits)));
    if ecdsa.verify(&message, &public, &bad_s) {
        outcome.failures.push(CaseFailure::TamperedSAccepted);
    }

    if let Some(other) = ecdsa.generate_keypair(rng).public {
        if other != public && ecdsa.verify(&message, &other, &signature) {
            outcome.failures.push(CaseFailure::WrongKeyAccepted);
        }
    }

    outcome
}

/// Flip one random bit, or append a byte to an empty message.
fn tamper_message<R: RngCore>(rng: &mut R, message: &[u8]) -> Vec<u8> {
    let mut tampered = message.to_vec();
    if tampered.is_empty() {
        tampered.push(0x01);
    } else {
        let bit = rng.gen_range(0..tampered.len() * 8);
        tampered[bit / 8] ^= 1 << (bit % 8);
    }
    tampered
}
