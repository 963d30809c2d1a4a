//! Provider invocation errors

use super::ConvergeError;

pub fn unsupported_operation(
    resource: impl Into<String>,
    operation: impl std::fmt::Display,
) -> ConvergeError {
    ConvergeError::UnsupportedOperation {
        resource: resource.into(),
        operation: operation.to_string(),
    }
}

/// Provider returned a failure or output the engine could not unmarshal.
pub fn invocation_failed(
    resource: impl Into<String>,
    operation: impl std::fmt::Display,
    reason: impl Into<String>,
) -> ConvergeError {
    ConvergeError::InvocationFailed {
        resource: resource.into(),
        operation: operation.to_string(),
        reason: reason.into(),
    }
}
