//! Dynamic value conversion errors

use super::ConvergeError;

/// A value cannot cross the dynamic-typing boundary; `path` locates it
/// within the property set (e.g. `$.Limits[0]`).
pub fn value_not_representable(
    path: impl Into<String>,
    reason: impl Into<String>,
) -> ConvergeError {
    ConvergeError::ValueNotRepresentable {
        path: path.into(),
        reason: reason.into(),
    }
}
