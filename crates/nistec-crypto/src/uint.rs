//! Fixed-width unsigned integers backing the field and scalar layers.
//!
//! 10 x 64-bit limbs in little-endian order (640 bits). The width covers the
//! `bitlength(n) + 64` bits sampled for P-521 keys and nonces.

#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;

use nistec_core::{invariant_violation, Error, Result};
use rand::RngCore;

/// Number of 64-bit limbs.
pub const LIMBS: usize = 10;

/// Width in bits.
pub const BITS: usize = LIMBS * 64;

/// Width in bytes.
pub const BYTES: usize = LIMBS * 8;

/// Unsigned 640-bit integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Uint {
    limbs: [u64; LIMBS],
}

impl Uint {
    pub const ZERO: Self = Self { limbs: [0; LIMBS] };

    pub const ONE: Self = Self::from_u64(1);

    pub const fn from_u64(value: u64) -> Self {
        let mut limbs = [0u64; LIMBS];
        limbs[0] = value;
        Self { limbs }
    }

    /// Create from limbs (little-endian).
    pub const fn from_limbs(limbs: [u64; LIMBS]) -> Self {
        Self { limbs }
    }

    pub const fn limbs(&self) -> &[u64; LIMBS] {
        &self.limbs
    }

    /// Parse a big-endian hex literal at compile time.
    ///
    /// Panics on a non-hex character or a value wider than 640 bits, which
    /// turns a typo in a curve constant into a build error.
    pub const fn from_be_hex(hex: &str) -> Self {
        let bytes = hex.as_bytes();
        assert!(bytes.len() <= LIMBS * 16, "hex literal too long");

        let mut limbs = [0u64; LIMBS];
        let mut i = 0;
        while i < bytes.len() {
            let nibble = match bytes[bytes.len() - 1 - i] {
                c @ b'0'..=b'9' => c - b'0',
                c @ b'a'..=b'f' => c - b'a' + 10,
                c @ b'A'..=b'F' => c - b'A' + 10,
                _ => panic!("invalid hex digit"),
            };
            limbs[i / 16] |= (nibble as u64) << ((i % 16) * 4);
            i += 1;
        }
        Self { limbs }
    }

    /// Parse big-endian hex at runtime.
    ///
    /// Odd-length input is accepted (an implicit leading `0` nibble), as are
    /// leading zeros beyond the 640-bit width.
    pub fn parse_be_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        if hex.is_empty() {
            return Err(Error::InvalidEncoding("empty hex string".into()));
        }

        let mut limbs = [0u64; LIMBS];
        for (i, c) in hex.bytes().rev().enumerate() {
            let nibble = (c as char)
                .to_digit(16)
                .ok_or_else(|| Error::InvalidEncoding(format!("invalid hex digit '{}'", c as char)))?;
            if i >= LIMBS * 16 {
                if nibble != 0 {
                    return Err(Error::InvalidEncoding("integer wider than 640 bits".into()));
                }
                continue;
            }
            limbs[i / 16] |= (nibble as u64) << ((i % 16) * 4);
        }
        Ok(Self { limbs })
    }

    /// Create from big-endian bytes of any length.
    /// Fails if the value does not fit in 640 bits.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self> {
        let mut limbs = [0u64; LIMBS];
        for (i, &byte) in bytes.iter().rev().enumerate() {
            if i >= BYTES {
                if byte != 0 {
                    return Err(Error::InvalidEncoding("integer wider than 640 bits".into()));
                }
                continue;
            }
            limbs[i / 8] |= (byte as u64) << ((i % 8) * 8);
        }
        Ok(Self { limbs })
    }

    /// Convert to big-endian bytes, left-padded to `len`.
    ///
    /// Bytes above `len` are dropped; callers size `len` from the modulus.
    pub fn to_be_bytes(&self, len: usize) -> Vec<u8> {
        debug_assert!(self.bits() <= len * 8, "value does not fit in {len} bytes");
        let mut out = vec![0u8; len];
        for (i, byte) in out.iter_mut().rev().enumerate().take(BYTES) {
            *byte = (self.limbs[i / 8] >> ((i % 8) * 8)) as u8;
        }
        out
    }

    pub const fn is_zero(&self) -> bool {
        let mut i = 0;
        while i < LIMBS {
            if self.limbs[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    pub const fn is_odd(&self) -> bool {
        self.limbs[0] & 1 == 1
    }

    /// Position of the highest set bit plus one (0 for zero).
    pub const fn bits(&self) -> usize {
        let mut i = LIMBS;
        while i > 0 {
            i -= 1;
            if self.limbs[i] != 0 {
                return i * 64 + (64 - self.limbs[i].leading_zeros() as usize);
            }
        }
        0
    }

    /// Bit `index`, counting from the least significant bit.
    pub const fn bit(&self, index: usize) -> bool {
        if index >= BITS {
            return false;
        }
        (self.limbs[index / 64] >> (index % 64)) & 1 == 1
    }

    /// Const-context comparison.
    pub const fn const_cmp(&self, other: &Self) -> Ordering {
        let mut i = LIMBS;
        while i > 0 {
            i -= 1;
            if self.limbs[i] > other.limbs[i] {
                return Ordering::Greater;
            }
            if self.limbs[i] < other.limbs[i] {
                return Ordering::Less;
            }
        }
        Ordering::Equal
    }

    /// Addition returning the carry out of the top limb.
    pub const fn overflowing_add(&self, other: &Self) -> (Self, bool) {
        let mut limbs = [0u64; LIMBS];
        let mut carry = false;
        let mut i = 0;
        while i < LIMBS {
            let (sum, c1) = self.limbs[i].overflowing_add(other.limbs[i]);
            let (sum, c2) = sum.overflowing_add(carry as u64);
            limbs[i] = sum;
            carry = c1 | c2;
            i += 1;
        }
        (Self { limbs }, carry)
    }

    /// Subtraction returning the borrow out of the top limb.
    pub const fn overflowing_sub(&self, other: &Self) -> (Self, bool) {
        let mut limbs = [0u64; LIMBS];
        let mut borrow = false;
        let mut i = 0;
        while i < LIMBS {
            let (diff, b1) = self.limbs[i].overflowing_sub(other.limbs[i]);
            let (diff, b2) = diff.overflowing_sub(borrow as u64);
            limbs[i] = diff;
            borrow = b1 | b2;
            i += 1;
        }
        (Self { limbs }, borrow)
    }

    pub const fn wrapping_add(&self, other: &Self) -> Self {
        self.overflowing_add(other).0
    }

    pub const fn wrapping_sub(&self, other: &Self) -> Self {
        self.overflowing_sub(other).0
    }

    /// Shift left by one bit, returning the bit shifted out.
    pub const fn shl1(&self) -> (Self, bool) {
        let mut limbs = [0u64; LIMBS];
        let mut carry = 0u64;
        let mut i = 0;
        while i < LIMBS {
            limbs[i] = (self.limbs[i] << 1) | carry;
            carry = self.limbs[i] >> 63;
            i += 1;
        }
        (Self { limbs }, carry == 1)
    }

    /// Logical shift right.
    pub fn shr(&self, shift: usize) -> Self {
        if shift >= BITS {
            return Self::ZERO;
        }
        let words = shift / 64;
        let bits = shift % 64;
        let mut limbs = [0u64; LIMBS];
        for i in 0..LIMBS - words {
            let lo = self.limbs[i + words] >> bits;
            let hi = if bits > 0 && i + words + 1 < LIMBS {
                self.limbs[i + words + 1] << (64 - bits)
            } else {
                0
            };
            limbs[i] = lo | hi;
        }
        Self { limbs }
    }

    /// Remainder modulo an arbitrary non-zero `modulus`.
    ///
    /// Bitwise long division; works for even moduli too (key sampling reduces
    /// modulo `n - 1`).
    pub fn rem(&self, modulus: &Self) -> Self {
        if modulus.is_zero() {
            invariant_violation("remainder by zero");
        }
        if self < modulus {
            return *self;
        }

        let mut rem = Self::ZERO;
        for i in (0..self.bits()).rev() {
            let (mut shifted, carry) = rem.shl1();
            if self.bit(i) {
                shifted.limbs[0] |= 1;
            }
            if carry || shifted >= *modulus {
                shifted = shifted.wrapping_sub(modulus);
            }
            rem = shifted;
        }
        rem
    }

    /// Uniformly random integer below `2^bits`.
    pub fn random_bits<R: RngCore + ?Sized>(rng: &mut R, bits: usize) -> Self {
        let bits = bits.min(BITS);
        let len = bits.div_ceil(8);
        let mut bytes = vec![0u8; len];
        rng.fill_bytes(&mut bytes);
        if bits % 8 != 0 {
            bytes[0] &= (1u8 << (bits % 8)) - 1;
        }
        let mut limbs = [0u64; LIMBS];
        for (i, &byte) in bytes.iter().rev().enumerate() {
            limbs[i / 8] |= (byte as u64) << ((i % 8) * 8);
        }
        Self { limbs }
    }

    /// Flip bit `index`.
    pub fn flip_bit(&self, index: usize) -> Self {
        let mut out = *self;
        if index < BITS {
            out.limbs[index / 64] ^= 1 << (index % 64);
        }
        out
    }
}

impl Ord for Uint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.const_cmp(other)
    }
}

impl PartialOrd for Uint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u64> for Uint {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl fmt::LowerHex for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut digits = String::new();
        let mut started = false;
        for limb in self.limbs.iter().rev() {
            if started {
                digits.push_str(&format!("{limb:016x}"));
            } else if *limb != 0 {
                digits.push_str(&format!("{limb:x}"));
                started = true;
            }
        }
        if !started {
            digits.push('0');
        }
        f.pad_integral(true, "0x", &digits)
    }
}

impl fmt::UpperHex for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lower = format!("{self:x}").to_ascii_uppercase();
        f.pad_integral(true, "0x", &lower)
    }
}

impl fmt::Display for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::Debug for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint({self:#x})")
    }
}
