//! Error types for KV3 reading and writing.
//!
//! Every failure the codec can produce is a variant of [`Error`]. Parse and
//! decode failures carry enough context (a [`Position`] for text, a short
//! description for binary) to point at the problem.
//!
//! ## Error Categories
//!
//! - **Lex / Parse**: malformed text tokens or grammar violations, with line/column
//! - **UnknownEncoding / UnknownFormat**: a UUID or name the registry does not know
//! - **UnsupportedEncoding**: a known encoding this crate cannot read or write
//! - **CorruptData**: structural violations in a binary stream
//! - **KeyNotFound**: a missed lookup through [`KvMap::try_get`](crate::KvMap::try_get)
//!
//! ## Examples
//!
//! ```rust
//! use keyvalues3::{from_str, Error};
//!
//! let result = from_str("{ key = [1, 2 }");
//! assert!(matches!(result, Err(Error::Parse { .. })));
//!
//! if let Err(err) = result {
//!     eprintln!("Parse error: {}", err);
//! }
//! ```

use crate::text::Position;
use std::io;
use thiserror::Error;

/// Represents all possible errors that can occur while reading or writing KV3.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed token in text input
    #[error("Lex error at {position}: {reason}")]
    Lex { position: Position, reason: String },

    /// Grammar violation in text input
    #[error("Parse error at {position}: expected {expected}, found {found}")]
    Parse {
        position: Position,
        expected: String,
        found: String,
    },

    /// Encoding UUID or name not present in the registry
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Format UUID or name not present in the registry
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Encoding is known but this crate has no reader or writer for it
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Structural violation in binary data
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// Object lookup miss
    #[error("Key not found: {0:?}")]
    KeyNotFound(String),

    /// Input matched none of the text or binary probes
    #[error("Unrecognized format: {0}")]
    UnrecognizedFormat(String),

    /// Value that cannot be represented in the requested encoding
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

impl Error {
    /// Creates a lex error at the given position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues3::{Error, Position};
    ///
    /// let err = Error::lex(Position::new(10, 5, 120), "unterminated string");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn lex(position: Position, reason: &str) -> Self {
        Error::Lex {
            position,
            reason: reason.to_string(),
        }
    }

    /// Creates a parse error describing what was expected and what was found instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyvalues3::{Error, Position};
    ///
    /// let err = Error::parse(Position::new(2, 3, 14), "'='", "'}'");
    /// assert!(err.to_string().contains("expected '='"));
    /// ```
    pub fn parse(position: Position, expected: &str, found: &str) -> Self {
        Error::Parse {
            position,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a corrupt-data error for a binary structural violation.
    pub fn corrupt(msg: &str) -> Self {
        Error::CorruptData(msg.to_string())
    }

    pub fn unsupported_encoding(msg: &str) -> Self {
        Error::UnsupportedEncoding(msg.to_string())
    }

    pub fn invalid_value(msg: &str) -> Self {
        Error::InvalidValue(msg.to_string())
    }

    /// Creates an I/O error for stream reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the text position for lex and parse errors.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Lex { position, .. } | Error::Parse { position, .. } => Some(*position),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::CorruptData("unexpected end of data".to_string())
        } else {
            Error::Io(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_accessor() {
        let pos = Position::new(3, 7, 40);
        assert_eq!(Error::lex(pos, "bad").position(), Some(pos));
        assert_eq!(Error::parse(pos, "a", "b").position(), Some(pos));
        assert_eq!(Error::corrupt("x").position(), None);
    }

    #[test]
    fn test_unexpected_eof_maps_to_corrupt_data() {
        let err: Error = io::Error::new(io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(matches!(err, Error::CorruptData(_)));

        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
