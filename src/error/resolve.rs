//! Module/resource resolution errors

use super::ConvergeError;
use crate::domain::ModuleReference;

/// Resource lookup failed; `scope` narrows the message to the requested
/// module when one was named.
pub fn resource_not_found(
    name: impl Into<String>,
    scope: Option<&ModuleReference>,
) -> ConvergeError {
    ConvergeError::ResourceNotFound {
        name: name.into(),
        scope: scope.map_or_else(
            || "any installed module".to_string(),
            |module| format!("module '{module}'"),
        ),
    }
}

/// More than one distinct module exposes the resource at the same highest
/// version; `candidates` is the pre-joined `name@version` list.
pub fn ambiguous_resource(name: impl Into<String>, candidates: impl Into<String>) -> ConvergeError {
    ConvergeError::AmbiguousResource {
        name: name.into(),
        candidates: candidates.into(),
    }
}

pub fn version_not_satisfied(
    module: impl Into<String>,
    constraint: impl Into<String>,
    installed: impl Into<String>,
) -> ConvergeError {
    ConvergeError::VersionNotSatisfied {
        module: module.into(),
        constraint: constraint.into(),
        installed: installed.into(),
    }
}

pub fn module_not_found(module: impl std::fmt::Display) -> ConvergeError {
    ConvergeError::ModuleNotFound {
        module: module.to_string(),
    }
}
