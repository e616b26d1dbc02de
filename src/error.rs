//! Error types for the conversion pipeline.

use std::collections::TryReserveError;
use thiserror::Error;

/// Every way a document conversion can fail.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The scratch arena or the output buffer could not grow.
    #[error("out of memory while growing {buffer} to {requested} bytes")]
    OutOfMemory {
        buffer: &'static str,
        requested: usize,
    },

    /// The event source found the input structurally broken.
    #[error("malformed input at byte {offset}: {reason}")]
    Malformed { offset: u64, reason: String },

    /// Reading the input failed.
    #[error("read error")]
    Read(#[source] std::io::Error),

    /// Writing the output failed. Fatal to the whole run.
    #[error("write error")]
    Write(#[source] std::io::Error),

    /// The document produced no record and the configured policy rejects that.
    #[error("document contained no convertible record")]
    NoRecords,
}

impl ConvertError {
    /// True when no further input should be processed after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConvertError::Write(_))
    }

    pub(crate) fn malformed(offset: u64, reason: impl Into<String>) -> Self {
        ConvertError::Malformed {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_memory(buffer: &'static str, requested: usize, _: TryReserveError) -> Self {
        ConvertError::OutOfMemory { buffer, requested }
    }
}

/// A convenience `Result` alias using [`ConvertError`].
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_write_errors_are_fatal() {
        let write = ConvertError::Write(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        let read = ConvertError::Read(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        assert!(write.is_fatal());
        assert!(!read.is_fatal());
        assert!(!ConvertError::malformed(3, "bad").is_fatal());
        assert!(!ConvertError::NoRecords.is_fatal());
    }

    #[test]
    fn test_malformed_message() {
        let err = ConvertError::malformed(42, "mismatched end tag");
        assert_eq!(err.to_string(), "malformed input at byte 42: mismatched end tag");
    }
}
