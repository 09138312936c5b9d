//! Error handling for mathdown operations.
//!
//! Malformed math never errors - an unterminated span degrades to
//! literal text inside the extractor. The error type here covers the
//! faults that remain: placeholder/buffer mismatches, which indicate an
//! instance being driven out of its extract-then-restore lifecycle, and
//! file plumbing in the CLI.

use std::fmt;

/// Fault raised by restoration or CLI plumbing.
#[derive(Debug, Clone)]
pub enum MathError {
    /// A placeholder referenced a math buffer entry that was never
    /// captured.
    UnknownPlaceholder { token: String, available: usize },
    /// Restoration ran on an instance whose buffer is gone - either no
    /// extraction happened, or the buffer was already consumed.
    BufferConsumed { token: String },
    /// IO error (for file operations).
    IoError { message: String },
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::UnknownPlaceholder { token, available } => {
                write!(
                    f,
                    "Placeholder {} has no captured math ({} spans in buffer)",
                    token, available
                )
            }
            MathError::BufferConsumed { token } => {
                write!(
                    f,
                    "Placeholder {} cannot be restored: no live math buffer (restoration without a prior extraction, or run twice)",
                    token
                )
            }
            MathError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for MathError {}

impl From<std::io::Error> for MathError {
    fn from(err: std::io::Error) -> Self {
        MathError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type for mathdown operations.
pub type MathResult<T> = Result<T, MathError>;

// Convenience constructors
impl MathError {
    pub fn unknown_placeholder(token: impl Into<String>, available: usize) -> Self {
        MathError::UnknownPlaceholder {
            token: token.into(),
            available,
        }
    }

    pub fn buffer_consumed(token: impl Into<String>) -> Self {
        MathError::BufferConsumed {
            token: token.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        MathError::IoError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_placeholder_display() {
        let err = MathError::unknown_placeholder("@@7@@", 2);
        let msg = err.to_string();
        assert!(msg.contains("@@7@@"));
        assert!(msg.contains("2 spans"));
    }

    #[test]
    fn test_buffer_consumed_display() {
        let err = MathError::buffer_consumed("@@0@@");
        assert!(err.to_string().contains("no live math buffer"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.md");
        let err = MathError::from(io);
        assert!(err.to_string().contains("missing.md"));
    }
}
