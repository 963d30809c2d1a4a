//! Module reference parsing errors

use super::ConvergeError;

pub fn invalid_module_reference(
    reference: impl Into<String>,
    reason: impl Into<String>,
) -> ConvergeError {
    ConvergeError::InvalidModuleReference {
        reference: reference.into(),
        reason: reason.into(),
    }
}
