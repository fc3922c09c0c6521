//! Modular arithmetic over an arbitrary odd modulus.
//!
//! [`Modulus`] carries the Montgomery constants for one modulus and works on raw
//! [`Uint`] values. [`FieldElement`] binds a value to a modulus at the type level
//! through a [`Field`] marker, so a base-field element can never be combined with
//! a scalar by accident.
//!
//! Elements are kept in Montgomery form (`x * R mod m`, `R = 2^(64 * limbs)`).

#![forbid(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;

use nistec_core::invariant_violation;

use crate::uint::{Uint, LIMBS};

/// Largest supported modulus width in limbs (576 bits).
///
/// One spare limb keeps `a + b` and the Montgomery accumulator from overflowing.
pub const MAX_MODULUS_LIMBS: usize = LIMBS - 1;

/// An odd modulus with precomputed Montgomery constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Modulus {
    value: Uint,
    /// Number of significant limbs of `value`.
    limbs: usize,
    /// -value^(-1) mod 2^64.
    m_inv: u64,
    /// R mod value (Montgomery form of one).
    r1: Uint,
    /// R^2 mod value.
    r2: Uint,
    /// value - 2 for Fermat inversion.
    fermat_exp: Uint,
}

impl Modulus {
    /// Precompute constants for `value`.
    ///
    /// Panics (at compile time for `const` moduli) if `value` is even, below 3,
    /// or wider than 576 bits.
    pub const fn new(value: Uint) -> Self {
        assert!(value.is_odd(), "modulus must be odd");
        assert!(value.bits() >= 2, "modulus must be at least 3");

        let limbs = value.bits().div_ceil(64);
        assert!(limbs <= MAX_MODULUS_LIMBS, "modulus wider than 576 bits");

        // Newton iteration doubles the correct low bits each round: 1 -> 64.
        let m0 = value.limbs()[0];
        let mut inv: u64 = 1;
        let mut round = 0;
        while round < 6 {
            inv = inv.wrapping_mul(2u64.wrapping_sub(m0.wrapping_mul(inv)));
            round += 1;
        }

        let mut acc = Uint::ONE;
        let mut step = 0;
        while step < 64 * limbs {
            acc = Self::double_mod(&acc, &value);
            step += 1;
        }
        let r1 = acc;
        while step < 128 * limbs {
            acc = Self::double_mod(&acc, &value);
            step += 1;
        }

        Self {
            value,
            limbs,
            m_inv: inv.wrapping_neg(),
            r1,
            r2: acc,
            fermat_exp: value.wrapping_sub(&Uint::from_u64(2)),
        }
    }

    const fn double_mod(a: &Uint, m: &Uint) -> Uint {
        let (doubled, carry) = a.shl1();
        if carry || !matches!(doubled.const_cmp(m), std::cmp::Ordering::Less) {
            doubled.wrapping_sub(m)
        } else {
            doubled
        }
    }

    pub const fn value(&self) -> &Uint {
        &self.value
    }

    pub const fn bits(&self) -> usize {
        self.value.bits()
    }

    /// Byte length of a fixed-width big-endian encoding.
    pub const fn byte_len(&self) -> usize {
        self.value.bits().div_ceil(8)
    }

    /// Reduce an arbitrary integer.
    pub fn reduce(&self, x: &Uint) -> Uint {
        x.rem(&self.value)
    }

    /// Addition (mod m). Inputs must already be reduced.
    pub fn add(&self, a: &Uint, b: &Uint) -> Uint {
        // Both inputs < m < 2^576, so the sum cannot leave the 640-bit container.
        let sum = a.wrapping_add(b);
        if sum >= self.value {
            sum.wrapping_sub(&self.value)
        } else {
            sum
        }
    }

    /// Subtraction (mod m). Inputs must already be reduced.
    pub fn sub(&self, a: &Uint, b: &Uint) -> Uint {
        let (diff, borrow) = a.overflowing_sub(b);
        if borrow {
            diff.wrapping_add(&self.value)
        } else {
            diff
        }
    }

    /// Negation (mod m).
    pub fn neg(&self, a: &Uint) -> Uint {
        if a.is_zero() {
            *a
        } else {
            self.value.wrapping_sub(a)
        }
    }

    /// Multiplication (mod m) of canonical values.
    pub fn mul(&self, a: &Uint, b: &Uint) -> Uint {
        // (a*b/R) * R^2 / R = a*b
        self.mont_mul(&self.mont_mul(a, b), &self.r2)
    }

    /// Exponentiation (mod m) of a canonical value.
    pub fn pow(&self, base: &Uint, exp: &Uint) -> Uint {
        let base = self.to_montgomery(base);
        self.from_montgomery(&self.mont_pow(&base, exp))
    }

    /// Multiplicative inverse via Fermat's little theorem, `x^(m-2)`.
    ///
    /// Returns `None` if the self-check `x * x^-1 == 1` fails, i.e. `x == 0`
    /// or the modulus is not prime.
    pub fn checked_inverse(&self, x: &Uint) -> Option<Uint> {
        let x = self.to_montgomery(x);
        self.mont_inverse(&x).map(|inv| self.from_montgomery(&inv))
    }

    /// Multiplicative inverse; a failed self-check is fatal.
    pub fn inverse(&self, x: &Uint) -> Uint {
        self.checked_inverse(x)
            .unwrap_or_else(|| invariant_violation("x * x^-1 != 1 (zero input or composite modulus)"))
    }

    pub(crate) fn to_montgomery(&self, x: &Uint) -> Uint {
        let x = if *x >= self.value { self.reduce(x) } else { *x };
        self.mont_mul(&x, &self.r2)
    }

    pub(crate) fn from_montgomery(&self, x: &Uint) -> Uint {
        self.mont_mul(x, &Uint::ONE)
    }

    /// Square-and-multiply over the exponent bits, least significant first.
    pub(crate) fn mont_pow(&self, base: &Uint, exp: &Uint) -> Uint {
        let mut result = self.r1;
        let mut base = *base;
        let bits = exp.bits();

        for i in 0..bits {
            if exp.bit(i) {
                result = self.mont_mul(&result, &base);
            }
            if i + 1 < bits {
                base = self.mont_mul(&base, &base);
            }
        }

        result
    }

    pub(crate) fn mont_inverse(&self, x: &Uint) -> Option<Uint> {
        let candidate = self.mont_pow(x, &self.fermat_exp);
        if self.mont_mul(x, &candidate) == self.r1 {
            Some(candidate)
        } else {
            None
        }
    }

    /// Montgomery product `a * b * R^-1 (mod m)`, coarsely integrated
    /// operand scanning over the significant limbs only.
    pub(crate) fn mont_mul(&self, a: &Uint, b: &Uint) -> Uint {
        let n = self.limbs;
        let m = self.value.limbs();
        let a = a.limbs();
        let b = b.limbs();
        let mut t = [0u64; LIMBS + 2];

        for i in 0..n {
            // t += a * b[i]
            let mut carry = 0u64;
            for j in 0..n {
                let (lo, hi) = mac(t[j], a[j], b[i], carry);
                t[j] = lo;
                carry = hi;
            }
            let (sum, overflow) = t[n].overflowing_add(carry);
            t[n] = sum;
            t[n + 1] = overflow as u64;

            // t = (t + q * m) / 2^64, with q chosen so the low limb vanishes
            let q = t[0].wrapping_mul(self.m_inv);
            let (_, mut carry) = mac(t[0], q, m[0], 0);
            for j in 1..n {
                let (lo, hi) = mac(t[j], q, m[j], carry);
                t[j - 1] = lo;
                carry = hi;
            }
            let (sum, overflow) = t[n].overflowing_add(carry);
            t[n - 1] = sum;
            t[n] = t[n + 1] + overflow as u64;
        }

        // t < 2m here
        let mut limbs = [0u64; LIMBS];
        limbs[..=n].copy_from_slice(&t[..=n]);
        let out = Uint::from_limbs(limbs);
        if out >= self.value {
            out.wrapping_sub(&self.value)
        } else {
            out
        }
    }
}

/// acc + a * b + carry as (low, high). Cannot overflow 128 bits.
#[inline(always)]
const fn mac(acc: u64, a: u64, b: u64, carry: u64) -> (u64, u64) {
    let wide = (acc as u128) + (a as u128) * (b as u128) + (carry as u128);
    (wide as u64, (wide >> 64) as u64)
}

/// Type-level modulus marker.
pub trait Field: Copy + Clone + fmt::Debug + PartialEq + Eq + Send + Sync + 'static {
    const MODULUS: Modulus;
}

/// Element of the prime field selected by `F`.
/// Invariant: the stored Montgomery representative is below the modulus.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FieldElement<F: Field> {
    mont: Uint,
    _field: PhantomData<F>,
}

impl<F: Field> FieldElement<F> {
    /// Zero element.
    pub const ZERO: Self = Self {
        mont: Uint::ZERO,
        _field: PhantomData,
    };

    /// One element.
    pub const ONE: Self = Self {
        mont: F::MODULUS.r1,
        _field: PhantomData,
    };

    /// Create from an integer, reducing it modulo the field modulus.
    pub fn from_uint(value: &Uint) -> Self {
        Self {
            mont: F::MODULUS.to_montgomery(value),
            _field: PhantomData,
        }
    }

    /// Create from an already-canonical integer.
    /// Returns None if value >= modulus.
    pub fn from_canonical(value: &Uint) -> Option<Self> {
        if *value >= F::MODULUS.value {
            None
        } else {
            Some(Self::from_uint(value))
        }
    }

    pub fn from_u64(value: u64) -> Self {
        Self::from_uint(&Uint::from_u64(value))
    }

    /// Canonical integer in `[0, modulus)`.
    pub fn to_uint(&self) -> Uint {
        F::MODULUS.from_montgomery(&self.mont)
    }

    /// Fixed-width big-endian encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_uint().to_be_bytes(F::MODULUS.byte_len())
    }

    pub fn modulus() -> Modulus {
        F::MODULUS
    }

    pub fn is_zero(&self) -> bool {
        self.mont.is_zero()
    }

    pub fn is_odd(&self) -> bool {
        self.to_uint().is_odd()
    }

    fn from_mont(mont: Uint) -> Self {
        Self {
            mont,
            _field: PhantomData,
        }
    }

    /// Addition: self + other (mod m).
    pub fn add(&self, other: &Self) -> Self {
        Self::from_mont(F::MODULUS.add(&self.mont, &other.mont))
    }

    /// Subtraction: self - other (mod m).
    pub fn sub(&self, other: &Self) -> Self {
        Self::from_mont(F::MODULUS.sub(&self.mont, &other.mont))
    }

    /// Negation: -self (mod m).
    pub fn neg(&self) -> Self {
        Self::from_mont(F::MODULUS.neg(&self.mont))
    }

    /// Multiplication: self * other (mod m).
    pub fn mul(&self, other: &Self) -> Self {
        Self::from_mont(F::MODULUS.mont_mul(&self.mont, &other.mont))
    }

    /// Multiplication by a small integer.
    pub fn mul_u64(&self, k: u64) -> Self {
        self.mul(&Self::from_u64(k))
    }

    /// Square: self^2 (mod m).
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Exponentiation: self^exp (mod m).
    pub fn pow(&self, exp: &Uint) -> Self {
        Self::from_mont(F::MODULUS.mont_pow(&self.mont, exp))
    }

    /// Multiplicative inverse, or None if the inversion self-check fails.
    pub fn checked_inverse(&self) -> Option<Self> {
        F::MODULUS.mont_inverse(&self.mont).map(Self::from_mont)
    }

    /// Multiplicative inverse: self^(m-2) (mod m).
    ///
    /// Panics with an arithmetic invariant violation for zero.
    pub fn inverse(&self) -> Self {
        self.checked_inverse()
            .unwrap_or_else(|| invariant_violation("x * x^-1 != 1 (zero input or composite modulus)"))
    }

    /// Division: self * other^-1 (mod m).
    pub fn div(&self, other: &Self) -> Self {
        self.mul(&other.inverse())
    }
}

impl<F: Field> Default for FieldElement<F> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<F: Field> fmt::Debug for FieldElement<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({:#x})", self.to_uint())
    }
}

impl<F: Field> fmt::Display for FieldElement<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.to_uint(), f)
    }
}
