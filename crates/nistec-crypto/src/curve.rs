//! Domain parameters for the NIST prime curves (FIPS 186-4 appendix D.1.2).
//!
//! Curves are zero-sized marker types carrying a [`CurveParameters`] constant.
//! Every curve is `y^2 = x^3 + a*x + b` with `a = p - 3`; only data differs.

#![forbid(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use nistec_core::Error;

use crate::field::{Field, FieldElement, Modulus};
use crate::hash::HashAlgorithm;
use crate::uint::Uint;

/// Constants of one short-Weierstrass curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurveParameters {
    pub name: &'static str,
    /// Field prime.
    pub p: Uint,
    /// Prime order of the generator.
    pub n: Uint,
    pub a: Uint,
    pub b: Uint,
    pub gx: Uint,
    pub gy: Uint,
    /// Hash designated for ECDSA on this curve.
    pub hash: HashAlgorithm,
}

/// A curve marker type.
pub trait Curve:
    Copy + Clone + fmt::Debug + Default + PartialEq + Eq + Send + Sync + 'static
{
    const ID: CurveId;
    const PARAMS: CurveParameters;

    /// Modulus of the coordinate field.
    fn base_modulus() -> Modulus {
        BaseField::<Self>::MODULUS
    }

    /// Modulus of the scalar field (the group order).
    fn scalar_modulus() -> Modulus {
        ScalarField::<Self>::MODULUS
    }
}

/// Coordinate field GF(p) of curve `C`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BaseField<C>(PhantomData<C>);

impl<C: Curve> Field for BaseField<C> {
    const MODULUS: Modulus = Modulus::new(C::PARAMS.p);
}

/// Scalar field GF(n) of curve `C`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScalarField<C>(PhantomData<C>);

impl<C: Curve> Field for ScalarField<C> {
    const MODULUS: Modulus = Modulus::new(C::PARAMS.n);
}

pub type BaseElement<C> = FieldElement<BaseField<C>>;
pub type ScalarElement<C> = FieldElement<ScalarField<C>>;

/// a = p - 3
const fn minus_three(p: Uint) -> Uint {
    p.wrapping_sub(&Uint::from_u64(3))
}

const P256_P: Uint =
    Uint::from_be_hex("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");

/// NIST P-256 (secp256r1).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NistP256;

impl Curve for NistP256 {
    const ID: CurveId = CurveId::P256;
    const PARAMS: CurveParameters = CurveParameters {
        name: "P-256",
        p: P256_P,
        n: Uint::from_be_hex("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551"),
        a: minus_three(P256_P),
        b: Uint::from_be_hex("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"),
        gx: Uint::from_be_hex("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"),
        gy: Uint::from_be_hex("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"),
        hash: HashAlgorithm::Sha256,
    };
}

const P384_P: Uint = Uint::from_be_hex(
    "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffff0000000000000000ffffffff",
);

/// NIST P-384 (secp384r1).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NistP384;

impl Curve for NistP384 {
    const ID: CurveId = CurveId::P384;
    const PARAMS: CurveParameters = CurveParameters {
        name: "P-384",
        p: P384_P,
        n: Uint::from_be_hex(
            "ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf581a0db248b0a77aecec196accc52973",
        ),
        a: minus_three(P384_P),
        b: Uint::from_be_hex(
            "b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875ac656398d8a2ed19d2a85c8edd3ec2aef",
        ),
        gx: Uint::from_be_hex(
            "aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a385502f25dbf55296c3a545e3872760ab7",
        ),
        gy: Uint::from_be_hex(
            "3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c00a60b1ce1d7e819d7a431d7c90ea0e5f",
        ),
        hash: HashAlgorithm::Sha384,
    };
}

/// p = 2^521 - 1
const P521_P: Uint = Uint::from_be_hex(
    "1ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
);

/// NIST P-521 (secp521r1).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NistP521;

impl Curve for NistP521 {
    const ID: CurveId = CurveId::P521;
    const PARAMS: CurveParameters = CurveParameters {
        name: "P-521",
        p: P521_P,
        n: Uint::from_be_hex(
            "1fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffa51868783bf2f966b7fcc0148f709a5d03bb5c9b8899c47aebb6fb71e91386409",
        ),
        a: minus_three(P521_P),
        b: Uint::from_be_hex(
            "051953eb9618e1c9a1f929a21a0b68540eea2da725b99b315f3b8b489918ef109e156193951ec7e937b1652c0bd3bb1bf073573df883d2c34f1ef451fd46b503f00",
        ),
        gx: Uint::from_be_hex(
            "c6858e06b70404e9cd9e3ecb662395b4429c648139053fb521f828af606b4d3dbaa14b5e77efe75928fe1dc127a2ffa8de3348b3c1856a429bf97e7e31c2e5bd66",
        ),
        gy: Uint::from_be_hex(
            "11839296a789a3bc0045c8a5fb42c7d1bd998f54449579b446817afbd17273e662c97ee72995ef42640c550b9013fad0761353c7086a272c24088be94769fd16650",
        ),
        hash: HashAlgorithm::Sha512,
    };
}

/// Runtime curve selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveId {
    P256,
    P384,
    P521,
}

impl CurveId {
    pub const ALL: [CurveId; 3] = [Self::P256, Self::P384, Self::P521];

    pub const fn params(self) -> CurveParameters {
        match self {
            Self::P256 => NistP256::PARAMS,
            Self::P384 => NistP384::PARAMS,
            Self::P521 => NistP521::PARAMS,
        }
    }

    /// Name as written in CAVP section headers.
    pub const fn name(self) -> &'static str {
        self.params().name
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CurveId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "P256" | "SECP256R1" => Ok(Self::P256),
            "P384" | "SECP384R1" => Ok(Self::P384),
            "P521" | "SECP521R1" => Ok(Self::P521),
            _ => Err(Error::UnknownCurve(s.to_string())),
        }
    }
}

/// Run a generic body with `$curve` bound to the marker type for a [`CurveId`].
///
/// ```
/// use nistec_crypto::curve::{Curve, CurveId};
/// let bits = nistec_crypto::with_curve!(CurveId::P384, C => C::scalar_modulus().bits());
/// assert_eq!(bits, 384);
/// ```
#[macro_export]
macro_rules! with_curve {
    ($id:expr, $curve:ident => $body:expr) => {
        match $id {
            $crate::curve::CurveId::P256 => {
                type $curve = $crate::curve::NistP256;
                $body
            }
            $crate::curve::CurveId::P384 => {
                type $curve = $crate::curve::NistP384;
                $body
            }
            $crate::curve::CurveId::P521 => {
                type $curve = $crate::curve::NistP521;
                $body
            }
        }
    };
}
