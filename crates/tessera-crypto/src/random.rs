//! Cryptographically secure randomness.
//!
//! [`SecureRng::fill`] is the only place that touches the OS entropy
//! source; bytes, arrays and field-element sampling all layer on top of
//! it, and the `RngCore` impl exists so the generator plugs into the
//! wider rand ecosystem.

use crate::{CryptoError, CryptoResult};
use rand_core::{CryptoRng, RngCore};

/// Random generator over the operating system's entropy source.
///
/// Zero-sized and stateless: instances cost nothing to create, every draw
/// goes straight to the OS, and concurrent use needs no coordination. The
/// field-element samplers the coding cores need are inherent methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureRng;

impl SecureRng {
    /// Create a new instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Fill `dest` with entropy from the OS.
    ///
    /// Every other draw in this module funnels through here.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomFailed`] if the OS entropy source
    /// fails.
    pub fn fill(&mut self, dest: &mut [u8]) -> CryptoResult<()> {
        getrandom::getrandom(dest).map_err(|_| CryptoError::RandomFailed)
    }

    /// Draw a fixed-size array.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomFailed`] if the OS entropy source
    /// fails.
    pub fn array<const N: usize>(&mut self) -> CryptoResult<[u8; N]> {
        let mut out = [0u8; N];
        self.fill(&mut out)?;
        Ok(out)
    }

    /// Draw a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomFailed`] if the OS entropy source
    /// fails.
    pub fn byte(&mut self) -> CryptoResult<u8> {
        Ok(self.array::<1>()?[0])
    }

    /// Draw `count` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomFailed`] if the OS entropy source
    /// fails.
    pub fn bytes(&mut self, count: usize) -> CryptoResult<Vec<u8>> {
        let mut out = vec![0u8; count];
        self.fill(&mut out)?;
        Ok(out)
    }

    /// Sample a uniform GF(256) element.
    ///
    /// A byte and a field element coincide, so no reduction is needed and
    /// the draw is exactly uniform.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomFailed`] if the OS entropy source
    /// fails.
    pub fn field_element(&mut self) -> CryptoResult<u8> {
        self.byte()
    }

    /// Sample a uniform non-zero GF(256) element, rejecting zeros.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomFailed`] if the OS entropy source
    /// fails.
    pub fn nonzero_field_element(&mut self) -> CryptoResult<u8> {
        loop {
            let candidate = self.field_element()?;
            if candidate != 0 {
                return Ok(candidate);
            }
        }
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.fill(dest).expect("OS entropy source failed")
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        getrandom::getrandom(dest).map_err(rand_core::Error::from)
    }
}

impl CryptoRng for SecureRng {}
