//! GF(256) field operations.
//!
//! The field is defined by the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
//! (0x11D) with generator 2. Multiplication and division go through
//! compile-time exp/log tables; the exp table is doubled to 512 entries so
//! sums of two logarithms never need reduction.

use crate::{FieldError, FieldResult};

/// Primitive polynomial defining the field.
pub const FIELD_POLYNOMIAL: u16 = 0x11D;

/// Multiplicative generator of the field.
pub const GENERATOR: u8 = 2;

/// Number of field elements.
pub const FIELD_SIZE: usize = 256;

/// Order of the multiplicative group (non-zero elements).
pub const GROUP_ORDER: usize = 255;

/// exp[i] = GENERATOR^i, duplicated across two full cycles.
static EXP: [u8; 512] = {
    let mut exp = [0u8; 512];
    let mut x: u16 = 1;
    let mut i = 0usize;
    while i < 512 {
        exp[i] = x as u8;
        x <<= 1;
        if x >= 256 {
            x ^= FIELD_POLYNOMIAL;
        }
        i += 1;
    }
    exp
};

/// log[a] = discrete logarithm of a to base GENERATOR; log[0] is unused.
static LOG: [u8; 256] = {
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0u8;
    while i < 255 {
        log[x as usize] = i;
        x <<= 1;
        if x >= 256 {
            x ^= FIELD_POLYNOMIAL;
        }
        i += 1;
    }
    log
};

/// Field addition (XOR).
#[inline]
#[must_use]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Field subtraction; identical to addition in characteristic 2.
#[inline]
#[must_use]
pub fn sub(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Field multiplication via exp/log tables.
#[inline]
#[must_use]
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    EXP[LOG[a as usize] as usize + LOG[b as usize] as usize]
}

/// Field division.
///
/// # Errors
///
/// Returns [`FieldError::DivisionByZero`] if `b` is zero.
#[inline]
pub fn div(a: u8, b: u8) -> FieldResult<u8> {
    if b == 0 {
        return Err(FieldError::DivisionByZero);
    }
    if a == 0 {
        return Ok(0);
    }
    Ok(EXP[LOG[a as usize] as usize + GROUP_ORDER - LOG[b as usize] as usize])
}

/// Field exponentiation.
///
/// `pow(0, 0)` is 1 by convention; `pow(0, e)` is 0 for e > 0.
#[inline]
#[must_use]
pub fn pow(a: u8, e: u32) -> u8 {
    if e == 0 {
        return 1;
    }
    if a == 0 {
        return 0;
    }
    let log = u64::from(LOG[a as usize]) * u64::from(e);
    EXP[(log % GROUP_ORDER as u64) as usize]
}

/// Multiplicative inverse.
///
/// # Errors
///
/// Returns [`FieldError::ZeroInverse`] if `a` is zero.
#[inline]
pub fn inv(a: u8) -> FieldResult<u8> {
    if a == 0 {
        return Err(FieldError::ZeroInverse);
    }
    Ok(EXP[GROUP_ORDER - LOG[a as usize] as usize])
}

/// XOR `src` into `acc` element-wise. Slices must be equally long.
#[inline]
pub fn add_slice(acc: &mut [u8], src: &[u8]) {
    debug_assert_eq!(acc.len(), src.len());
    for (a, s) in acc.iter_mut().zip(src) {
        *a ^= s;
    }
}

/// Accumulate `src * c` into `acc` element-wise. Slices must be equally long.
///
/// This is the inner loop of both Reed-Solomon encoding and decoding; the
/// multiply is skipped entirely for a zero coefficient.
#[inline]
pub fn mul_add_slice(acc: &mut [u8], src: &[u8], c: u8) {
    debug_assert_eq!(acc.len(), src.len());
    if c == 0 {
        return;
    }
    let log_c = LOG[c as usize] as usize;
    for (a, &s) in acc.iter_mut().zip(src) {
        if s != 0 {
            *a ^= EXP[LOG[s as usize] as usize + log_c];
        }
    }
}
