use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use nistec_cavp::{parse_file, replay, ReplayOptions, Report, VectorKind};
use nistec_crypto::curve::Curve;
use nistec_crypto::{with_curve, CurveId, Ecdsa, Point, Signature, Uint};
use nistec_selftest::{run_parallel, SelfTestReport};
use rand::rngs::OsRng;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Maximum failure lines printed per CAVP file
const MAX_FAILURES_SHOWN: usize = 20;

#[derive(Parser, Debug)]
#[command(name = "nistec", about = "ECDSA over NIST P-256, P-384 and P-521")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run randomized sign/verify/tamper round trips on all cores
    Selftest {
        /// Curve to test, or "all"
        #[arg(long = "curve", default_value = "all")]
        curve: String,

        /// Number of cases per curve
        #[arg(long = "cases", default_value_t = 100)]
        cases: u64,

        /// Messages are 0..=N random bytes
        #[arg(long = "max-message-len", default_value_t = 1024)]
        max_message_len: usize,

        /// Maximum duration per curve before stopping (seconds)
        #[arg(long = "duration-secs")]
        duration_secs: Option<u64>,
    },

    /// Replay extracted CAVP vector files
    Cavp {
        /// SigGen.txt
        #[arg(long = "sig-gen")]
        sig_gen: Option<PathBuf>,

        /// SigVer.rsp
        #[arg(long = "sig-ver")]
        sig_ver: Option<PathBuf>,

        /// KeyPair.rsp
        #[arg(long = "key-pair")]
        key_pair: Option<PathBuf>,

        /// Also replay sections whose hash is not the curve's designated one
        #[arg(long = "all-hashes", default_value_t = false)]
        all_hashes: bool,
    },

    /// Generate a key pair, or derive the public key of a given private key
    Keygen {
        #[arg(long = "curve", default_value = "P-256")]
        curve: CurveId,

        /// Private key (hex)
        #[arg(long = "private")]
        private: Option<String>,
    },

    /// Sign a message with the curve's designated hash
    Sign {
        #[arg(long = "curve", default_value = "P-256")]
        curve: CurveId,

        /// Private key (hex)
        #[arg(long = "private")]
        private: String,

        /// Message bytes (hex)
        #[arg(long = "message")]
        message: String,

        /// Fixed nonce (hex), for reproducing test vectors
        #[arg(long = "nonce")]
        nonce: Option<String>,
    },

    /// Verify a signature; exits with 1 if it is invalid
    Verify {
        #[arg(long = "curve", default_value = "P-256")]
        curve: CurveId,

        /// Public key x coordinate (hex)
        #[arg(long = "qx")]
        qx: String,

        /// Public key y coordinate (hex)
        #[arg(long = "qy")]
        qy: String,

        #[arg(long = "r")]
        r: String,

        #[arg(long = "s")]
        s: String,

        /// Message bytes (hex)
        #[arg(long = "message")]
        message: String,
    },
}

/// Parse "all" or a single curve name.
fn parse_curves(arg: &str) -> Result<Vec<CurveId>> {
    if arg.trim().eq_ignore_ascii_case("all") {
        return Ok(CurveId::ALL.to_vec());
    }
    Ok(vec![arg.parse::<CurveId>()?])
}

/// Parse a hex integer, with or without a 0x prefix.
fn parse_uint(arg: &str, what: &str) -> Result<Uint> {
    let digits = arg.trim().trim_start_matches("0x");
    Uint::parse_be_hex(digits).with_context(|| format!("invalid {what} '{arg}'"))
}

fn parse_message(arg: &str) -> Result<Vec<u8>> {
    let digits = arg.trim().trim_start_matches("0x");
    hex::decode(digits).with_context(|| format!("invalid message hex '{arg}'"))
}

/// Fixed-width hex of a value below the group order or field prime.
fn to_hex(value: &Uint, len: usize) -> String {
    hex::encode(value.to_be_bytes(len))
}

fn keygen<C: Curve>(private: Option<Uint>) -> Result<bool> {
    let ecdsa = Ecdsa::<C>::new();
    let key_pair = match private {
        Some(d) => ecdsa.keypair_from_private(&d)?,
        None => ecdsa.generate_keypair(&mut OsRng),
    };
    let (qx, qy) = key_pair
        .public
        .as_ref()
        .and_then(Point::coordinates)
        .ok_or_else(|| anyhow!("public key is the point at infinity"))?;

    let scalar_len = C::scalar_modulus().byte_len();
    let coord_len = C::base_modulus().byte_len();
    println!("Curve:   {}", C::ID);
    println!("Private: {}", to_hex(&key_pair.private, scalar_len));
    println!("Qx:      {}", to_hex(&qx, coord_len));
    println!("Qy:      {}", to_hex(&qy, coord_len));
    if let Some(public) = key_pair.public.as_ref() {
        println!("SEC1:    {}", hex::encode(public.to_compressed_bytes()));
    }
    Ok(true)
}

fn sign<C: Curve>(private: &Uint, message: &[u8], nonce: Option<&Uint>) -> Result<bool> {
    let ecdsa = Ecdsa::<C>::new();
    let key_pair = ecdsa.keypair_from_private(private)?;
    let signature = match nonce {
        Some(k) => ecdsa.sign_with_nonce(message, &key_pair, k)?,
        None => ecdsa.sign(&mut OsRng, message, &key_pair),
    };

    let Some(signature) = signature else {
        eprintln!("Error: signature failed its self-check");
        return Ok(false);
    };

    let len = C::scalar_modulus().byte_len();
    println!("Curve: {}", C::ID);
    println!("Hash:  {}", ecdsa.hash());
    println!("R:     {}", to_hex(&signature.r, len));
    println!("S:     {}", to_hex(&signature.s, len));
    Ok(true)
}

fn verify<C: Curve>(qx: &Uint, qy: &Uint, signature: &Signature, message: &[u8]) -> Result<bool> {
    // A coordinate outside the field cannot be a valid key.
    let valid = match Point::<C>::from_coordinates(qx, qy) {
        Ok(public) => Ecdsa::<C>::new().verify(message, &public, signature),
        Err(_) => false,
    };
    println!("{}", if valid { "VALID" } else { "INVALID" });
    Ok(valid)
}

/// Run the self-test on one curve with a progress bar.
fn selftest_curve(
    curve: CurveId,
    cases: u64,
    max_message_len: usize,
    duration: Option<Duration>,
) -> Result<SelfTestReport> {
    let stop = Arc::new(AtomicBool::new(false));
    let counter = Arc::new(AtomicU64::new(0));

    let pb = ProgressBar::new(cases);
    pb.set_style(ProgressStyle::with_template(
        "{prefix:>6} [{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})",
    )?);
    pb.set_prefix(curve.name());

    let start = Instant::now();
    let report = thread::scope(|scope| {
        let (worker_stop, worker_counter) = (stop.clone(), counter.clone());
        let handle = scope.spawn(move || {
            run_parallel(curve, cases, max_message_len, worker_stop, worker_counter)
        });

        while !handle.is_finished() {
            pb.set_position(counter.load(Ordering::Relaxed));
            if duration.is_some_and(|limit| start.elapsed() >= limit) {
                stop.store(true, Ordering::Relaxed);
            }
            thread::sleep(Duration::from_millis(100));
        }
        handle.join()
    })
    .map_err(|_| anyhow!("self-test worker for {curve} panicked"))?;

    pb.set_position(report.completed);
    pb.finish();
    Ok(report)
}

fn run_selftest(
    curve: &str,
    cases: u64,
    max_message_len: usize,
    duration_secs: Option<u64>,
) -> Result<bool> {
    let curves = parse_curves(curve)?;
    let duration = duration_secs.map(Duration::from_secs);

    eprintln!("Cases per curve: {}", cases);
    eprintln!("Max message length: {}", max_message_len);
    if let Some(secs) = duration_secs {
        eprintln!("Duration limit: {}s per curve", secs);
    }
    eprintln!();

    let mut all_passed = true;
    for curve in curves {
        let report = selftest_curve(curve, cases, max_message_len, duration)?;

        println!(
            "{}: {}/{} cases run, {} failed (salt {})",
            curve,
            report.completed,
            report.requested,
            report.failures.len(),
            hex::encode(report.salt)
        );
        if report.was_stopped() {
            eprintln!("Warning: {} stopped early by the duration limit", curve);
        }
        for (case_id, outcome) in &report.failures {
            for failure in &outcome.failures {
                eprintln!(
                    "  case {} ({} byte message): {}",
                    case_id, outcome.message_len, failure
                );
            }
        }
        all_passed &= report.is_success();
    }
    Ok(all_passed)
}

fn print_report(label: &str, report: &Report) {
    println!("{}: {}", label, report);
    for failure in report.failures.iter().take(MAX_FAILURES_SHOWN) {
        eprintln!("  {}", failure);
    }
    if report.failures.len() > MAX_FAILURES_SHOWN {
        eprintln!(
            "  ... and {} more",
            report.failures.len() - MAX_FAILURES_SHOWN
        );
    }
}

fn run_cavp(files: &[(VectorKind, &str, Option<PathBuf>)], all_hashes: bool) -> Result<bool> {
    if files.iter().all(|(_, _, path)| path.is_none()) {
        bail!("at least one of --sig-gen, --sig-ver or --key-pair is required");
    }

    let options = ReplayOptions { all_hashes };
    let mut all_passed = true;
    for (kind, label, path) in files {
        let Some(path) = path else { continue };
        let sections = parse_file(path, *kind)
            .with_context(|| format!("failed to load {}", path.display()))?;
        let report = replay(*kind, &sections, &options);
        print_report(label, &report);
        all_passed &= report.is_success();
    }
    Ok(all_passed)
}

fn run(command: Command) -> Result<bool> {
    match command {
        Command::Selftest {
            curve,
            cases,
            max_message_len,
            duration_secs,
        } => run_selftest(&curve, cases, max_message_len, duration_secs),
        Command::Cavp {
            sig_gen,
            sig_ver,
            key_pair,
            all_hashes,
        } => run_cavp(
            &[
                (VectorKind::SigGen, "SigGen", sig_gen),
                (VectorKind::SigVer, "SigVer", sig_ver),
                (VectorKind::KeyPair, "KeyPair", key_pair),
            ],
            all_hashes,
        ),
        Command::Keygen { curve, private } => {
            let private = private.map(|p| parse_uint(&p, "private key")).transpose()?;
            with_curve!(curve, C => keygen::<C>(private))
        }
        Command::Sign {
            curve,
            private,
            message,
            nonce,
        } => {
            let private = parse_uint(&private, "private key")?;
            let message = parse_message(&message)?;
            let nonce = nonce.map(|k| parse_uint(&k, "nonce")).transpose()?;
            with_curve!(curve, C => sign::<C>(&private, &message, nonce.as_ref()))
        }
        Command::Verify {
            curve,
            qx,
            qy,
            r,
            s,
            message,
        } => {
            let qx = parse_uint(&qx, "qx")?;
            let qy = parse_uint(&qy, "qy")?;
            let signature = Signature::new(parse_uint(&r, "r")?, parse_uint(&s, "s")?);
            let message = parse_message(&message)?;
            with_curve!(curve, C => verify::<C>(&qx, &qy, &signature, &message))
        }
    }
}

fn main() {
    let args = Args::parse();

    match run(args.command) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(2);
        }
    }
}
