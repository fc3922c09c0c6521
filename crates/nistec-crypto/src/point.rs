//! Affine points and the group law.
//!
//! curve: y² = x³ + a·x + b over GF(p), a = p - 3
//! The identity is the explicit [`Point::Infinity`] variant.

#![forbid(unsafe_code)]

use nistec_core::{Error, Result};

use crate::curve::{BaseElement, Curve};
use crate::uint::Uint;

/// SEC1 tag for the point at infinity.
const TAG_INFINITY: u8 = 0x00;
/// SEC1 tag for an uncompressed point.
const TAG_UNCOMPRESSED: u8 = 0x04;

/// Point on curve `C` in affine coordinates, or the point at infinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Point<C: Curve> {
    /// Identity element.
    Infinity,
    Affine { x: BaseElement<C>, y: BaseElement<C> },
}

impl<C: Curve> Point<C> {
    /// Generator point G.
    pub fn generator() -> Self {
        Self::Affine {
            x: BaseElement::<C>::from_uint(&C::PARAMS.gx),
            y: BaseElement::<C>::from_uint(&C::PARAMS.gy),
        }
    }

    /// Create point from affine coordinates.
    ///
    /// Coordinates must be below p; they are not reduced. Does not validate
    /// that the point is on the curve.
    pub fn from_coordinates(x: &Uint, y: &Uint) -> Result<Self> {
        let x = BaseElement::<C>::from_canonical(x).ok_or(Error::CoordinateOutOfRange)?;
        let y = BaseElement::<C>::from_canonical(y).ok_or(Error::CoordinateOutOfRange)?;
        Ok(Self::Affine { x, y })
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, Self::Infinity)
    }

    /// Affine coordinates as integers; None for the point at infinity.
    pub fn coordinates(&self) -> Option<(Uint, Uint)> {
        match self {
            Self::Infinity => None,
            Self::Affine { x, y } => Some((x.to_uint(), y.to_uint())),
        }
    }

    /// Negation: (x, -y).
    pub fn neg(&self) -> Self {
        match self {
            Self::Infinity => Self::Infinity,
            Self::Affine { x, y } => Self::Affine { x: *x, y: y.neg() },
        }
    }

    /// SEC1 uncompressed encoding: `04 || X || Y` (a single `00` byte for infinity).
    pub fn to_uncompressed_bytes(&self) -> Vec<u8> {
        match self {
            Self::Infinity => vec![TAG_INFINITY],
            Self::Affine { x, y } => {
                let mut bytes = Vec::with_capacity(1 + 2 * C::base_modulus().byte_len());
                bytes.push(TAG_UNCOMPRESSED);
                bytes.extend_from_slice(&x.to_bytes());
                bytes.extend_from_slice(&y.to_bytes());
                bytes
            }
        }
    }

    /// SEC1 compressed encoding: `02 || X` for even y, `03 || X` for odd y.
    pub fn to_compressed_bytes(&self) -> Vec<u8> {
        match self {
            Self::Infinity => vec![TAG_INFINITY],
            Self::Affine { x, y } => {
                let mut bytes = Vec::with_capacity(1 + C::base_modulus().byte_len());
                bytes.push(if y.is_odd() { 0x03 } else { 0x02 });
                bytes.extend_from_slice(&x.to_bytes());
                bytes
            }
        }
    }

    /// Decode a SEC1 uncompressed point and check it lies on the curve.
    pub fn from_uncompressed_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes == [TAG_INFINITY] {
            return Ok(Self::Infinity);
        }

        let len = C::base_modulus().byte_len();
        if bytes.len() != 1 + 2 * len || bytes[0] != TAG_UNCOMPRESSED {
            return Err(Error::InvalidEncoding(format!(
                "expected {} bytes starting with 0x04 for {}",
                1 + 2 * len,
                C::PARAMS.name
            )));
        }

        let x = Uint::from_be_bytes(&bytes[1..1 + len])?;
        let y = Uint::from_be_bytes(&bytes[1 + len..])?;
        let point = Self::from_coordinates(&x, &y)?;
        if !is_on_curve(&point) {
            return Err(Error::InvalidEncoding("point is not on the curve".into()));
        }
        Ok(point)
    }
}

/// Check y² ≡ x³ + a·x + b (mod p). The point at infinity is rejected.
pub fn is_on_curve<C: Curve>(point: &Point<C>) -> bool {
    match point {
        Point::Infinity => false,
        Point::Affine { x, y } => {
            let a = BaseElement::<C>::from_uint(&C::PARAMS.a);
            let b = BaseElement::<C>::from_uint(&C::PARAMS.b);
            let rhs = x.square().mul(x).add(&a.mul(x)).add(&b);
            y.square() == rhs
        }
    }
}

/// Point addition for distinct points: P1 + P2.
///
/// Handles the identity, otherwise applies the chord formula, which requires
/// x1 ≠ x2 and y1 ≠ y2. Doubling and negation go through [`double`] or
/// [`add_general`].
pub fn add<C: Curve>(p1: &Point<C>, p2: &Point<C>) -> Result<Point<C>> {
    match (p1, p2) {
        (Point::Infinity, _) => Ok(*p2),
        (_, Point::Infinity) => Ok(*p1),
        (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => {
            if x1 == x2 {
                return Err(Error::UnsupportedPointConfiguration("equal x coordinates"));
            }
            if y1 == y2 {
                return Err(Error::UnsupportedPointConfiguration("equal y coordinates"));
            }
            Ok(chord(x1, y1, x2, y2))
        }
    }
}

/// Point doubling: 2P.
///
/// A point with y = 0 has a vertical tangent and is rejected.
pub fn double<C: Curve>(p: &Point<C>) -> Result<Point<C>> {
    match p {
        Point::Infinity => Ok(Point::Infinity),
        Point::Affine { x, y } => {
            if y.is_zero() {
                return Err(Error::UnsupportedPointConfiguration("vertical tangent (y = 0)"));
            }
            Ok(tangent(x, y))
        }
    }
}

/// Point addition for any pair of points. Never fails.
///
/// P + (-P) and 2-torsion sums give infinity, P + P is routed to doubling.
pub fn add_general<C: Curve>(p1: &Point<C>, p2: &Point<C>) -> Point<C> {
    match (p1, p2) {
        (Point::Infinity, _) => *p2,
        (_, Point::Infinity) => *p1,
        (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => {
            if x1 != x2 {
                return chord(x1, y1, x2, y2);
            }
            if y1 == y2 && !y1.is_zero() {
                tangent(x1, y1)
            } else {
                // y2 = -y1, or inputs that share x without being on one curve
                Point::Infinity
            }
        }
    }
}

/// Doubling that maps the vertical-tangent case to infinity.
pub(crate) fn double_general<C: Curve>(p: &Point<C>) -> Point<C> {
    match p {
        Point::Affine { x, y } if !y.is_zero() => tangent(x, y),
        _ => Point::Infinity,
    }
}

/// x3 = λ² − x1 − x2, y3 = (2x1 + x2)·λ − λ³ − y1, λ = (y2 − y1)/(x2 − x1)
fn chord<C: Curve>(
    x1: &BaseElement<C>,
    y1: &BaseElement<C>,
    x2: &BaseElement<C>,
    y2: &BaseElement<C>,
) -> Point<C> {
    let lambda = y2.sub(y1).div(&x2.sub(x1));
    let lambda2 = lambda.square();
    let lambda3 = lambda2.mul(&lambda);

    let x3 = lambda2.sub(x1).sub(x2);
    let y3 = x1.mul_u64(2).add(x2).mul(&lambda).sub(&lambda3).sub(y1);

    Point::Affine { x: x3, y: y3 }
}

/// x3 = μ² − 2x1, y3 = 3x1·μ − μ³ − y1, μ = (3x1² + a)/(2y1)
fn tangent<C: Curve>(x1: &BaseElement<C>, y1: &BaseElement<C>) -> Point<C> {
    let a = BaseElement::<C>::from_uint(&C::PARAMS.a);
    let mu = x1.square().mul_u64(3).add(&a).div(&y1.mul_u64(2));
    let mu2 = mu.square();
    let mu3 = mu2.mul(&mu);

    let x3 = mu2.sub(&x1.mul_u64(2));
    let y3 = x1.mul_u64(3).mul(&mu).sub(&mu3).sub(y1);

    Point::Affine { x: x3, y: y3 }
}
