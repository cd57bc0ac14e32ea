//! Error types for key material handling and AEAD operations

use thiserror::Error;

/// Errors from mesh cryptographic operations.
///
/// Address parsing deliberately has no variant here: the scanning callers
/// that consume addresses expect an absent result for malformed input, so
/// `btmesh-proto` returns `Option` instead of raising.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material has the wrong length for the AES-128 primitives
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Root key hex string is malformed (odd length or non-hex characters)
    #[error("invalid key encoding: {reason}")]
    InvalidKeyEncoding {
        /// Reason reported by the hex decoder
        reason: String,
    },

    /// CCM tag length outside the supported set
    #[error("unsupported CCM tag length: {tag_length}")]
    UnsupportedTagLength {
        /// Requested tag length in bytes
        tag_length: usize,
    },

    /// Plaintext exceeds what CCM can frame under a 13-byte nonce
    #[error("payload too large for CCM: max {max} bytes")]
    PayloadTooLarge {
        /// Maximum payload length in bytes
        max: usize,
    },

    /// AEAD authentication tag did not verify on decrypt.
    /// No plaintext is released when this is returned.
    #[error("authentication failed")]
    AuthenticationFailure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_length_display() {
        let err = CryptoError::InvalidKeyLength { expected: 16, actual: 12 };
        assert_eq!(err.to_string(), "invalid key length: expected 16, got 12");
    }

    #[test]
    fn authentication_failure_does_not_mention_plaintext() {
        let err = CryptoError::AuthenticationFailure;
        assert_eq!(err.to_string(), "authentication failed");
    }
}
