//! Error types for MARC operations.
//!
//! This module provides the [`MarcError`] type for all MARC library operations
//! and the [`Result`] convenience type. Structural framing errors (anything the
//! stream reader raises while decoding a record) terminate the stream; callers
//! should discard the reader after one. Model-surface errors ([`MarcError::InvalidTag`],
//! [`MarcError::InvalidPattern`]) are raised at the mutation or query site and
//! leave any in-progress stream untouched.

use thiserror::Error;

/// Error type for all MARC library operations.
#[derive(Error, Debug)]
pub enum MarcError {
    /// The underlying byte source failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer than 24 octets were available at the start of a record.
    #[error("Truncated leader: {0}")]
    TruncatedLeader(String),

    /// A numeric leader position holds a non-digit octet.
    #[error("Malformed leader: {0}")]
    MalformedLeader(String),

    /// The directory length is not a multiple of 12, or an entry holds
    /// non-digit octets where digits are required.
    #[error("Malformed directory: {0}")]
    MalformedDirectory(String),

    /// The data area ended before `record_length - base_address_of_data`
    /// octets could be read, or a directory entry points past it.
    #[error("Truncated record: {0}")]
    TruncatedRecord(String),

    /// The data area does not end with the record terminator (0x1D).
    #[error("Missing record terminator: {0}")]
    MissingRecordTerminator(String),

    /// A field slice is structurally invalid: missing its trailing field
    /// terminator, too short for its indicators, or undecodable.
    #[error("Malformed field: {0}")]
    MalformedField(String),

    /// A tag failed the model invariants on construction or mutation.
    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    /// A named charset could not be resolved in the charset registry.
    #[error("Unknown charset: {0}")]
    UnknownCharset(String),

    /// A charset-specific decode failure (invalid UTF-8 and the like).
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// A subfield pattern containing `[` failed to compile as a regular
    /// expression.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Convenience type alias for [`std::result::Result`] with [`MarcError`].
pub type Result<T> = std::result::Result<T, MarcError>;
