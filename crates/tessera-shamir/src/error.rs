//! Error types for the secret-sharing core.

use tessera_crypto::{CryptoError, ErrorCategory, Sanitize};
use tessera_field::FieldError;
use thiserror::Error;

/// Errors produced by splitting, validation, reconstruction and the share
/// text format.
#[derive(Debug, Error)]
pub enum ShamirError {
    /// Configuration parameters out of range or inconsistent
    #[error("invalid sharing configuration: {0}")]
    InvalidConfig(&'static str),

    /// Secret empty or larger than the configured maximum
    #[error("invalid secret: {0}")]
    InvalidSecret(&'static str),

    /// Malformed share, failed integrity hash or invalid index
    #[error("invalid share: {0}")]
    InvalidShare(&'static str),

    /// Share text carried a version this library does not speak
    #[error("unsupported share format version")]
    UnsupportedVersion,

    /// Fewer shares than the threshold requires
    #[error("insufficient shares: have {available}, need {required}")]
    InsufficientShares {
        /// Valid shares present
        available: usize,
        /// Threshold recorded in the metadata
        required: usize,
    },

    /// Shares from different split operations or with mismatched metadata
    #[error("incompatible shares: {0}")]
    IncompatibleShares(&'static str),

    /// The reconstructed secret failed its size or hash check
    #[error("reconstruction produced a secret that failed verification")]
    ReconstructionFailed,

    /// The CSPRNG failed while drawing polynomial coefficients
    #[error(transparent)]
    Random(#[from] CryptoError),

    /// Field arithmetic failure during interpolation
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl Sanitize for ShamirError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfig(_) => ErrorCategory::InvalidConfig,
            Self::InvalidShare(_) | Self::UnsupportedVersion => ErrorCategory::InvalidShareFormat,
            Self::InsufficientShares { .. } => ErrorCategory::InsufficientShares,
            Self::IncompatibleShares(_) => ErrorCategory::IncompatibleShares,
            Self::InvalidSecret(_) | Self::ReconstructionFailed => ErrorCategory::ValidationFailed,
            Self::Random(_) | Self::Field(_) => ErrorCategory::OperationFailed,
        }
    }
}

/// Result type for the secret-sharing core.
pub type ShamirResult<T> = Result<T, ShamirError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_messages_are_fixed_per_category() {
        let a = ShamirError::InvalidShare("integrity hash mismatch");
        let b = ShamirError::UnsupportedVersion;
        assert_eq!(a.sanitized_message(), b.sanitized_message());
        assert_eq!(a.category(), ErrorCategory::InvalidShareFormat);
    }
}
