//! # Tessera Shamir
//!
//! Shamir secret sharing over GF(256).
//!
//! This crate provides:
//! - k-of-n splitting with cryptographically random polynomials
//! - Reconstruction by Lagrange interpolation at zero
//! - Tamper-evident share metadata (SHA-256 fingerprints, per-operation
//!   share-set ids) and spec-ordered collection validation
//! - A versioned share text format (v2.0 current, v1.0 accepted on input)
//!
//! Fewer than k shares carry no information about the secret; every share
//! and the final reconstruction are integrity-checked, so tampering and
//! cross-operation mixing fail loudly instead of yielding wrong bytes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod reconstruct;
pub mod serialize;
pub mod share;
pub mod split;
pub mod validate;

pub use config::{MAX_SECRET_SIZE, MAX_SHARES, SssConfig};
pub use error::{ShamirError, ShamirResult};
pub use reconstruct::{reconstruct, reconstruct_string};
pub use serialize::{decode_share, encode_share};
pub use share::{SecretShare, ShareMetadata};
pub use split::{SplitSecret, split, split_str};
pub use validate::{validate_share, validate_shares};
