//! Replay parsed CAVP sections against the ECDSA engine.

#![forbid(unsafe_code)]

use std::fmt;

use nistec_crypto::curve::Curve;
use nistec_crypto::{with_curve, DigestReduction, Ecdsa, HashAlgorithm, Point, Signature, Uint};

use crate::parser::{Record, Section, VectorKind};

/// Which sections to replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Replay every SHA-2 section, not only the curve's designated hash.
    /// Non-designated hashes use leftmost-bits digest truncation.
    pub all_hashes: bool,
}

/// One record whose outcome did not match the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub section: String,
    pub line: usize,
    pub reason: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line {}: {}", self.section, self.line, self.reason)
    }
}

/// Outcome counts of a replay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failures: Vec<Failure>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn merge(&mut self, other: Report) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.failures.extend(other.failures);
    }

    fn record(&mut self, section: &Section, record: &Record, outcome: Result<(), String>) {
        match outcome {
            Ok(()) => self.passed += 1,
            Err(reason) => {
                self.failed += 1;
                self.failures.push(Failure {
                    section: section.header(),
                    line: record.line,
                    reason,
                });
            }
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed, {} failed, {} skipped",
            self.passed, self.failed, self.skipped
        )
    }
}

/// Replay `sections` of the given kind.
pub fn replay(kind: VectorKind, sections: &[Section], options: &ReplayOptions) -> Report {
    match kind {
        VectorKind::SigGen => replay_sig_gen(sections, options),
        VectorKind::SigVer => replay_sig_ver(sections, options),
        VectorKind::KeyPair => replay_key_pair(sections, options),
    }
}

/// Reproduce key derivation and signatures from `SigGen.txt` using the recorded nonce.
pub fn replay_sig_gen(sections: &[Section], options: &ReplayOptions) -> Report {
    replay_with(sections, options, |id, ecdsa_hash, section, report| {
        with_curve!(id, C => {
            let ecdsa = engine::<C>(ecdsa_hash);
            for record in &section.records {
                report.record(section, record, check_sig_gen(&ecdsa, record));
            }
        })
    })
}

/// Check verification outcomes against the `Result` lines of `SigVer.rsp`.
pub fn replay_sig_ver(sections: &[Section], options: &ReplayOptions) -> Report {
    replay_with(sections, options, |id, ecdsa_hash, section, report| {
        with_curve!(id, C => {
            let ecdsa = engine::<C>(ecdsa_hash);
            for record in &section.records {
                report.record(section, record, check_sig_ver(&ecdsa, record));
            }
        })
    })
}

/// Check `d * G == Q` for every record of `KeyPair.rsp`.
///
/// Sections carry no hash, so `options` has no effect.
pub fn replay_key_pair(sections: &[Section], _options: &ReplayOptions) -> Report {
    let mut report = Report::default();
    for section in sections {
        let Some(id) = section.curve_id() else {
            report.skipped += section.records.len();
            continue;
        };
        with_curve!(id, C => {
            let ecdsa = Ecdsa::<C>::new();
            for record in &section.records {
                report.record(section, record, check_key_pair(&ecdsa, record));
            }
        })
    }
    report
}

/// Section filter shared by the signature replays.
fn replay_with<F>(sections: &[Section], options: &ReplayOptions, mut run: F) -> Report
where
    F: FnMut(nistec_crypto::CurveId, HashAlgorithm, &Section, &mut Report),
{
    let mut report = Report::default();
    for section in sections {
        let selected = match (section.curve_id(), section.hash_algorithm()) {
            (Some(id), Some(hash)) if options.all_hashes || hash == id.params().hash => {
                Some((id, hash))
            }
            _ => None,
        };
        match selected {
            Some((id, hash)) => run(id, hash, section, &mut report),
            None => report.skipped += section.records.len(),
        }
    }
    report
}

fn engine<C: Curve>(hash: HashAlgorithm) -> Ecdsa<C> {
    let ecdsa = Ecdsa::<C>::new();
    if hash == C::PARAMS.hash {
        ecdsa
    } else {
        ecdsa
            .with_hash(hash)
            .with_digest_reduction(DigestReduction::Leftmost)
    }
}

fn check_sig_gen<C: Curve>(ecdsa: &Ecdsa<C>, record: &Record) -> Result<(), String> {
    let message = field(record, "Msg")?;
    let d = integer(record, "d")?;
    let k = integer(record, "k")?;

    let key_pair = ecdsa
        .keypair_from_private(&d)
        .map_err(|e| format!("d: {e}"))?;
    check_public(key_pair.public.as_ref(), record)?;

    let signature = ecdsa
        .sign_with_nonce(message, &key_pair, &k)
        .map_err(|e| format!("k: {e}"))?
        .ok_or("signature failed its self-check")?;

    if signature.r != integer(record, "R")? {
        return Err(format!("R mismatch: got {:x}", signature.r));
    }
    if signature.s != integer(record, "S")? {
        return Err(format!("S mismatch: got {:x}", signature.s));
    }
    Ok(())
}

fn check_sig_ver<C: Curve>(ecdsa: &Ecdsa<C>, record: &Record) -> Result<(), String> {
    let expected = record
        .expects_pass()
        .ok_or("missing or unreadable Result")?;
    let message = field(record, "Msg")?;
    let signature = Signature::new(integer(record, "R")?, integer(record, "S")?);

    // A coordinate outside the field cannot be a valid key.
    let verified = match Point::<C>::from_coordinates(&integer(record, "Qx")?, &integer(record, "Qy")?) {
        Ok(public) => ecdsa.verify(message, &public, &signature),
        Err(_) => false,
    };

    if verified == expected {
        Ok(())
    } else {
        Err(format!(
            "expected {}, verification {}",
            record.result.as_deref().unwrap_or_default(),
            if verified { "passed" } else { "failed" }
        ))
    }
}

fn check_key_pair<C: Curve>(ecdsa: &Ecdsa<C>, record: &Record) -> Result<(), String> {
    let d = integer(record, "d")?;
    let key_pair = ecdsa
        .keypair_from_private(&d)
        .map_err(|e| format!("d: {e}"))?;
    check_public(key_pair.public.as_ref(), record)
}

fn check_public<C: Curve>(public: Option<&Point<C>>, record: &Record) -> Result<(), String> {
    let (qx, qy) = public
        .and_then(Point::coordinates)
        .ok_or("public key is the point at infinity")?;
    if qx != integer(record, "Qx")? {
        return Err(format!("Qx mismatch: got {qx:x}"));
    }
    if qy != integer(record, "Qy")? {
        return Err(format!("Qy mismatch: got {qy:x}"));
    }
    Ok(())
}

fn field<'a>(record: &'a Record, name: &str) -> Result<&'a [u8], String> {
    record.get(name).ok_or_else(|| format!("missing field {name}"))
}

fn integer(record: &Record, name: &str) -> Result<Uint, String> {
    Uint::from_be_bytes(field(record, name)?).map_err(|e| format!("{name}: {e}"))
}
