//! Error types for the adapter
//!
//! Caller-contract violations are raised before any native call is made.
//! Raw engine statuses are normally returned verbatim; only layers that must
//! produce values (capability probe, metadata enumeration) wrap a failing
//! status in [`Error::Engine`].
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::status::Status;
use std::io;
use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the adapter
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was absent
    #[error("Argument `{0}` must not be null")]
    ArgumentNull(&'static str),

    /// A size or count argument is outside its permitted range
    #[error("Argument `{name}` out of range ({value}): {reason}")]
    ArgumentOutOfRange {
        /// Argument name
        name: &'static str,
        /// Offending value
        value: i64,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// An argument is present but malformed
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Argument name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Two parallel arrays disagree in length
    #[error("Length mismatch: `{left}` has {left_len} entries, `{right}` has {right_len}")]
    LengthMismatch {
        /// First array name
        left: &'static str,
        /// First array length
        left_len: usize,
        /// Second array name
        right: &'static str,
        /// Second array length
        right_len: usize,
    },

    /// The engine reported a hard error where a value was required
    #[error("Engine error: {0}")]
    Engine(Status),

    /// A metadata cursor did not have the shape it described
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// A retrieved field could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration could not be parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),

    /// The engine library could not be loaded
    #[error("Engine library unavailable: {0}")]
    Unavailable(String),

    /// I/O error (configuration files)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    /// Whether this error was raised before reaching the engine
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Error::ArgumentNull(_)
                | Error::ArgumentOutOfRange { .. }
                | Error::InvalidArgument { .. }
                | Error::LengthMismatch { .. }
        )
    }

    /// Shorthand for [`Error::InvalidArgument`]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_argument_null() {
        let err = Error::ArgumentNull("data");
        let msg = err.to_string();
        assert!(msg.contains("data"));
        assert!(msg.contains("null"));
    }

    #[test]
    fn test_error_display_out_of_range() {
        let err = Error::ArgumentOutOfRange {
            name: "size",
            value: -4,
            reason: "must not be negative",
        };
        let msg = err.to_string();
        assert!(msg.contains("size"));
        assert!(msg.contains("-4"));
    }

    #[test]
    fn test_error_display_length_mismatch() {
        let err = Error::LengthMismatch {
            left: "columns",
            left_len: 3,
            right: "columnids",
            right_len: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("columns"));
        assert!(msg.contains('3'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_error_display_unavailable() {
        let err = Error::Unavailable("LoadLibraryA failed for \"esent.dll\"".to_string());
        assert!(err.to_string().contains("esent.dll"));
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_error_display_engine() {
        let err = Error::Engine(Status::from_raw(-1603));
        assert!(err.to_string().contains("-1603"));
    }

    #[test]
    fn test_contract_violation_classification() {
        assert!(Error::ArgumentNull("x").is_contract_violation());
        assert!(Error::invalid("name", "empty").is_contract_violation());
        assert!(!Error::Engine(Status::from_raw(-1)).is_contract_violation());
        assert!(!Error::Corruption("short".into()).is_contract_violation());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::IoError(_)));
    }
}
