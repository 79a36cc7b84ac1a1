//! # Tessera Field
//!
//! GF(256) arithmetic for the Tessera coding cores.
//!
//! This crate provides:
//! - Table-driven field operations over GF(2^8) with primitive polynomial
//!   0x11D and generator 2
//! - Dense polynomial multiplication, evaluation and division
//! - Matrices over the field, including Vandermonde and systematic
//!   encoder-matrix construction and Gauss-Jordan inversion
//!
//! The tables are built at compile time; all operations are pure functions
//! and safe to call concurrently.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod gf;
pub mod matrix;
pub mod poly;

pub use matrix::Matrix;

use thiserror::Error;

/// Errors produced by field and matrix operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Division by zero in GF(256)
    #[error("division by zero in GF(256)")]
    DivisionByZero,

    /// Zero has no multiplicative inverse
    #[error("zero has no multiplicative inverse in GF(256)")]
    ZeroInverse,

    /// Matrix has no inverse for the requested row set
    #[error("matrix is singular")]
    SingularMatrix,

    /// Matrix dimensions do not admit the requested operation
    #[error("matrix dimension mismatch")]
    DimensionMismatch,

    /// Row selection was given no rows, or a row outside the matrix
    #[error("invalid row selection")]
    InvalidRowSelection,
}

/// Result type for field and matrix operations.
pub type FieldResult<T> = Result<T, FieldError>;
