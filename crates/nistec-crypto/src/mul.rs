//! Scalar multiplication by double-and-add.

#![forbid(unsafe_code)]

use crate::curve::Curve;
use crate::point::{add_general, double_general, Point};
use crate::uint::Uint;

/// Multiply point P by scalar k: k * P.
///
/// Bits of `k` are consumed from least to most significant. `k` is not
/// reduced modulo the group order.
pub fn multiply<C: Curve>(k: &Uint, p: &Point<C>) -> Point<C> {
    if k.is_zero() || p.is_infinity() {
        return Point::Infinity;
    }

    let bits = k.bits();
    let mut result = Point::Infinity;
    let mut base = *p;

    for i in 0..bits {
        if k.bit(i) {
            result = add_general(&result, &base);
        }
        if i + 1 < bits {
            base = double_general(&base);
        }
    }

    result
}

/// Multiply generator G by scalar k: k * G.
pub fn multiply_generator<C: Curve>(k: &Uint) -> Point<C> {
    multiply(k, &Point::generator())
}
