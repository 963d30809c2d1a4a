//! Execution environment errors

use super::ConvergeError;

/// Transport or process failure in the provider session adapter.
pub fn session_failed(reason: impl Into<String>) -> ConvergeError {
    ConvergeError::SessionFailed {
        reason: reason.into(),
    }
}
