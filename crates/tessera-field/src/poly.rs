//! Dense polynomials over GF(256).
//!
//! A polynomial is a coefficient slice in ascending order: index `i` holds
//! the coefficient of x^i. Trailing zeros are degenerate and trimmed where
//! they matter (division).

use crate::{FieldError, FieldResult, gf};

/// Strip trailing zero coefficients.
#[must_use]
fn significant(coeffs: &[u8]) -> &[u8] {
    let end = coeffs.iter().rposition(|&c| c != 0).map_or(0, |p| p + 1);
    &coeffs[..end]
}

/// Schoolbook polynomial multiplication.
#[must_use]
pub fn mul(a: &[u8], b: &[u8]) -> Vec<u8> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0u8; a.len() + b.len() - 1];
    for (i, &ca) in a.iter().enumerate() {
        if ca == 0 {
            continue;
        }
        for (j, &cb) in b.iter().enumerate() {
            out[i + j] ^= gf::mul(ca, cb);
        }
    }
    out
}

/// Evaluate a polynomial at `x` by Horner's method.
#[must_use]
pub fn eval(coeffs: &[u8], x: u8) -> u8 {
    let mut acc = 0u8;
    for &c in coeffs.iter().rev() {
        acc = gf::add(gf::mul(acc, x), c);
    }
    acc
}

/// Polynomial division with remainder.
///
/// Returns `(quotient, remainder)` such that
/// `num = quotient * den + remainder` with `deg(remainder) < deg(den)`.
/// The divisor's leading coefficient is normalized via its inverse.
///
/// # Errors
///
/// Returns [`FieldError::DivisionByZero`] if the divisor is empty or all
/// zeros.
pub fn div(num: &[u8], den: &[u8]) -> FieldResult<(Vec<u8>, Vec<u8>)> {
    let den = significant(den);
    if den.is_empty() {
        return Err(FieldError::DivisionByZero);
    }
    let mut rem = significant(num).to_vec();
    if rem.len() < den.len() {
        return Ok((Vec::new(), rem));
    }

    let lead_inv = gf::inv(den[den.len() - 1])?;
    let mut quot = vec![0u8; rem.len() - den.len() + 1];
    for qi in (0..quot.len()).rev() {
        let coeff = rem[qi + den.len() - 1];
        if coeff == 0 {
            continue;
        }
        let q = gf::mul(coeff, lead_inv);
        quot[qi] = q;
        for (j, &d) in den.iter().enumerate() {
            rem[qi + j] ^= gf::mul(q, d);
        }
    }
    rem.truncate(den.len() - 1);
    let rem_len = significant(&rem).len();
    rem.truncate(rem_len);
    Ok((quot, rem))
}
