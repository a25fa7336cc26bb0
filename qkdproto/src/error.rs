//! Error taxonomy for the codec boundary operations.
//!
//! Two failure conditions exist: malformed wire input (`InvalidEncoding`)
//! and XOR-recovered bytes that do not form valid text (`DecodeFailure`).
//! Both are surfaced synchronously; nothing here is retried or swallowed
//! into a default value.
//!
use thiserror::Error;

/// Errors from encode/decode operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Ciphertext hex or key bitstring is malformed.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// XOR-recovered bytes are not valid UTF-8 text.
    #[error("recovered bytes are not valid text")]
    DecodeFailure,
}

impl From<hex::FromHexError> for CodecError {
    fn from(err: hex::FromHexError) -> Self {
        Self::InvalidEncoding(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for CodecError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        Self::DecodeFailure
    }
}
