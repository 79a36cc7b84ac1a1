//! # Tessera Crypto
//!
//! Security support for the Tessera coding cores.
//!
//! This crate provides:
//! - OS-backed cryptographically secure randomness, including uniform and
//!   non-zero GF(256) element sampling
//! - Multi-pass buffer clearing, constant-time comparison and a scoped
//!   sensitive-buffer helper
//! - The error-sanitization layer that turns internal failures into fixed,
//!   non-leaky user-facing messages

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod random;
pub mod sanitize;
pub mod secure;

pub use random::SecureRng;
pub use sanitize::{ErrorCategory, Sanitize};

use thiserror::Error;

/// Errors from the security support layer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    /// The operating system CSPRNG failed
    #[error("secure random generation failed")]
    RandomFailed,
}

/// Result type for this crate.
pub type CryptoResult<T> = Result<T, CryptoError>;
