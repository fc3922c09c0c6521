//! Message digests and digest-to-integer conversion (FIPS 186-4 section 6.4).

#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use nistec_core::{invariant_violation, Error};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use crate::field::Modulus;
use crate::uint::Uint;

/// SHA-2 variants usable for ECDSA message hashing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 4] = [Self::Sha224, Self::Sha256, Self::Sha384, Self::Sha512];

    /// Name as written in CAVP section headers.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha224 => "SHA-224",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }

    /// Digest length in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    pub fn digest(self, message: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha224 => Sha224::digest(message).to_vec(),
            Self::Sha256 => Sha256::digest(message).to_vec(),
            Self::Sha384 => Sha384::digest(message).to_vec(),
            Self::Sha512 => Sha512::digest(message).to_vec(),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "SHA224" => Ok(Self::Sha224),
            "SHA256" => Ok(Self::Sha256),
            "SHA384" => Ok(Self::Sha384),
            "SHA512" => Ok(Self::Sha512),
            _ => Err(Error::UnknownHash(s.to_string())),
        }
    }
}

/// How a digest becomes the integer `z` used by signing and verification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DigestReduction {
    /// Whole digest as a big-endian integer, reduced modulo `n`.
    ///
    /// Digests wider than 640 bits are not representable and are treated as
    /// an arithmetic invariant violation.
    #[default]
    ModOrder,
    /// Leftmost `bitlength(n)` bits of the digest, then reduced modulo `n`.
    Leftmost,
}

impl DigestReduction {
    /// Convert `digest` to an integer in `[0, n)`.
    ///
    /// # Panics
    ///
    /// With `ModOrder`, if `digest` is wider than 640 bits.
    pub fn to_integer(self, digest: &[u8], order: &Modulus) -> Uint {
        let order_bits = order.bits();
        let z = match self {
            Self::ModOrder => Uint::from_be_bytes(digest)
                .unwrap_or_else(|_| invariant_violation("digest wider than the integer width")),
            Self::Leftmost => leftmost_bits(digest, order_bits),
        };
        order.reduce(&z)
    }
}

fn leftmost_bits(digest: &[u8], bits: usize) -> Uint {
    let keep = digest.len().min(bits.div_ceil(8));
    let z = Uint::from_be_bytes(&digest[..keep]).unwrap_or(Uint::ZERO);
    let have = keep * 8;
    if have > bits {
        z.shr(have - bits)
    } else {
        z
    }
}
