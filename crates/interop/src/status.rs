//! Status observation hook
//!
//! Every status the adapter returns passes through [`observe`] exactly once.
//! The hook only reports; it never changes the status or the control flow.

use isam_core::{Status, StatusClass};
use tracing::{debug, trace};

/// Report a native status and hand it back unchanged.
pub fn observe(op: &'static str, status: Status) -> Status {
    match status.class() {
        StatusClass::Success => {
            trace!(target: "isam::api", op, "Native call succeeded");
        }
        StatusClass::Warning => {
            debug!(target: "isam::api", op, code = status.code(), "Native call returned a warning");
        }
        StatusClass::Error => {
            debug!(target: "isam::api", op, code = status.code(), "Native call failed");
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_is_identity() {
        for code in [-1603, -1, 0, 1, 1006] {
            assert_eq!(observe("JetMove", Status::from_raw(code)).code(), code);
        }
    }
}
