//! Raw engine status codes
//!
//! Every native entry point returns a signed 32-bit status: zero is success,
//! positive values are warnings whose meaning depends on the call, negative
//! values are errors. This module only classifies; it never decides what a
//! caller should do about a warning.

use std::fmt;

/// How a status should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// Status `0`
    Success,
    /// Status `> 0`
    Warning,
    /// Status `< 0`
    Error,
}

/// Raw status returned by a native call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(i32);

impl Status {
    /// The success status
    pub const SUCCESS: Status = Status(0);

    /// Wrap a raw native status
    pub const fn from_raw(code: i32) -> Self {
        Status(code)
    }

    /// The raw code
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Classify the status
    pub const fn class(self) -> StatusClass {
        if self.0 == 0 {
            StatusClass::Success
        } else if self.0 > 0 {
            StatusClass::Warning
        } else {
            StatusClass::Error
        }
    }

    /// Status `0`
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Status `> 0`
    pub const fn is_warning(self) -> bool {
        self.0 > 0
    }

    /// Status `< 0`
    pub const fn is_error(self) -> bool {
        self.0 < 0
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::SUCCESS
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Status(code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.0, self.class())
    }
}

/// Status codes the adapter itself needs to recognise.
pub mod codes {
    /// Cursor is not positioned on a record
    pub const NO_CURRENT_RECORD: i32 = -1603;
    /// Seek or lookup found nothing
    pub const RECORD_NOT_FOUND: i32 = -1601;
    /// Entry point not present in the loaded engine
    pub const FEATURE_NOT_AVAILABLE: i32 = -1001;
    /// Argument rejected by the engine
    pub const INVALID_PARAMETER: i32 = -1003;
    /// Column value is null
    pub const COLUMN_NULL: i32 = 1004;
    /// Output buffer too small; actual size reported
    pub const BUFFER_TRUNCATED: i32 = 1006;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_sign() {
        assert_eq!(Status::from_raw(-1).class(), StatusClass::Error);
        assert_eq!(Status::from_raw(0).class(), StatusClass::Success);
        assert_eq!(Status::from_raw(1).class(), StatusClass::Warning);
        assert_eq!(Status::from_raw(i32::MIN).class(), StatusClass::Error);
        assert_eq!(Status::from_raw(i32::MAX).class(), StatusClass::Warning);
    }

    #[test]
    fn predicates_agree_with_class() {
        for code in [-1603, -1, 0, 1, 1006] {
            let status = Status::from_raw(code);
            let flags = [status.is_error(), status.is_success(), status.is_warning()];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1);
        }
    }

    #[test]
    fn display_includes_code() {
        let text = Status::from_raw(codes::BUFFER_TRUNCATED).to_string();
        assert!(text.contains("1006"));
        assert!(text.contains("Warning"));
    }
}
