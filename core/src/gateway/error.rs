//! Error types for the gateway handshake.

use thiserror::Error;

use crate::crypto::KeyError;

/// Errors that can occur while authorising the gateway form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandshakeError {
    /// An asset id or key is not valid base-58.
    #[error("malformed base58 {what}: {reason}")]
    MalformedBase58 {
        /// Which input was malformed.
        what: &'static str,
        reason: String,
    },

    /// A key decoded to the wrong number of bytes.
    #[error("invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Key agreement with the gateway key produced the all-zero secret.
    #[error("key agreement with the gateway is not contributory")]
    NonContributory,

    /// The currency is not backed by a gateway. The native currency never is.
    #[error("no gateway serves {0}")]
    NoGateway(String),

    /// The gateway URL could not be extended with the form path.
    #[error("invalid gateway url: {0}")]
    InvalidUrl(String),
}

impl HandshakeError {
    pub(crate) fn from_key_error(what: &'static str, err: KeyError) -> Self {
        match err {
            KeyError::InvalidEncoding(reason) => Self::MalformedBase58 { what, reason },
            KeyError::InvalidLength { expected, actual } => Self::InvalidKeyLength {
                what,
                expected,
                actual,
            },
            KeyError::NonContributory => Self::NonContributory,
        }
    }
}
