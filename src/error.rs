//! Error types for the MariaDB wire codec.

use std::panic::Location;
use thiserror::Error;

use crate::protocol::types::ServerType;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Category of a value-level decode failure.
///
/// Callers key off the category rather than the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The requested representation is not supported for the column type.
    Incompatible,
    /// The value does not fit the requested width or signedness.
    Overflow,
    /// The payload does not parse as the expected literal grammar.
    Malformed,
    /// An arbitrary-precision value has no exact integral representation.
    Inexact,
}

/// Error type for decoding and encoding operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A single value could not be decoded.
    ///
    /// The cursor has already been moved past the value when this is returned.
    #[error("{message}")]
    Decode {
        kind: DecodeErrorKind,
        message: String,
    },

    /// Buffer too small.
    #[error("Buffer too small: need {needed} bytes, have {available} (at {location})")]
    BufferTooSmall {
        needed: usize,
        available: usize,
        location: &'static Location<'static>,
    },

    /// Protocol error.
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Unsupported server data type.
    #[error("Unsupported server data type: {type_num}")]
    UnsupportedType { type_num: u8 },
}

impl Error {
    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create an incompatibility error for a server type and target name.
    pub fn incompatible(server_type: ServerType, target: &str) -> Self {
        Self::Decode {
            kind: DecodeErrorKind::Incompatible,
            message: format!("Data type {} cannot be decoded as {}", server_type, target),
        }
    }

    /// Create an overflow error.
    pub fn overflow(message: impl Into<String>) -> Self {
        Self::Decode {
            kind: DecodeErrorKind::Overflow,
            message: message.into(),
        }
    }

    /// Create a malformed-literal error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Decode {
            kind: DecodeErrorKind::Malformed,
            message: message.into(),
        }
    }

    /// Create an exactness error.
    pub fn inexact(message: impl Into<String>) -> Self {
        Self::Decode {
            kind: DecodeErrorKind::Inexact,
            message: message.into(),
        }
    }

    /// Decode error category, if this is a value-level decode error.
    pub fn decode_kind(&self) -> Option<DecodeErrorKind> {
        match self {
            Error::Decode { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether this error is a value-level decode error.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. })
    }
}
