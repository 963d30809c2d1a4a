//! Error types and handling for Converge
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`resolve`]: Module/resource resolution errors
//! - [`invoke`]: Provider invocation errors
//! - [`session`]: Execution environment errors
//! - [`properties`]: Dynamic value conversion errors
//! - [`reference`]: Module reference parsing errors

pub mod invoke;
pub mod properties;
pub mod reference;
pub mod resolve;
pub mod session;

pub use invoke::{invocation_failed, unsupported_operation};
pub use properties::value_not_representable;
pub use reference::invalid_module_reference;
pub use resolve::{
    ambiguous_resource, module_not_found, resource_not_found, version_not_satisfied,
};
pub use session::session_failed;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Converge operations
///
/// Resolution errors are never retried internally; they indicate a caller or
/// environment mistake that retry cannot fix. Retry policy for invocation and
/// session failures belongs to the calling configuration engine, since only
/// it knows whether an operation is safe to repeat.
#[derive(Error, Diagnostic, Debug)]
pub enum ConvergeError {
    // Resolution errors
    #[error("Resource '{name}' not found in {scope}")]
    #[diagnostic(
        code(converge::resolve::resource_not_found),
        help("Check the resource name and that the providing module is installed")
    )]
    ResourceNotFound { name: String, scope: String },

    #[error("Resource '{name}' is ambiguous; highest version is tied between: {candidates}")]
    #[diagnostic(
        code(converge::resolve::ambiguous_resource),
        help("Pass a module reference to select one of the candidate modules")
    )]
    AmbiguousResource { name: String, candidates: String },

    #[error("No installed version of module '{module}' satisfies '{constraint}' (installed: {installed})")]
    #[diagnostic(code(converge::resolve::version_not_satisfied))]
    VersionNotSatisfied {
        module: String,
        constraint: String,
        installed: String,
    },

    #[error("Module '{module}' is not installed")]
    #[diagnostic(code(converge::resolve::module_not_found))]
    ModuleNotFound { module: String },

    // Invocation errors
    #[error("Resource '{resource}' does not support {operation}")]
    #[diagnostic(
        code(converge::invoke::unsupported_operation),
        help("The resource descriptor declares which operations the provider implements")
    )]
    UnsupportedOperation { resource: String, operation: String },

    #[error("{operation} on resource '{resource}' failed: {reason}")]
    #[diagnostic(code(converge::invoke::failed))]
    InvocationFailed {
        resource: String,
        operation: String,
        reason: String,
    },

    // Session errors
    #[error("Provider session failed: {reason}")]
    #[diagnostic(
        code(converge::session::failed),
        help("The execution environment is unreachable, crashed, or was disposed")
    )]
    SessionFailed { reason: String },

    // Property conversion errors
    #[error("Value at '{path}' is not representable: {reason}")]
    #[diagnostic(code(converge::properties::not_representable))]
    ValueNotRepresentable { path: String, reason: String },

    // Module reference errors
    #[error("Invalid module reference '{reference}': {reason}")]
    #[diagnostic(
        code(converge::reference::invalid),
        help("Valid forms: name, name@1.2.3, name@>=1.2.3")
    )]
    InvalidModuleReference { reference: String, reason: String },
}

impl From<std::io::Error> for ConvergeError {
    fn from(err: std::io::Error) -> Self {
        ConvergeError::SessionFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ConvergeError>;
