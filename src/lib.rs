//! Converge - desired-state resource invocation
//!
//! A library-level contract between a configuration engine and a set of
//! pluggable resource providers. Given a declared resource (name plus an
//! optional versioned module reference) and a desired property set, it can
//! discover available resources, read current state, test whether current
//! state matches desired state, and apply desired state.
//!
//! ## Core concepts
//!
//! - [`PropertySet`]: an insertion-ordered map of string keys to
//!   dynamically-typed values, used for desired-state input and
//!   current-state output
//! - [`ModuleReference`]: names a provider module, optionally pinned to an
//!   exact or minimum version
//! - [`ResourceDescriptor`]: discovery-time metadata about one resource and
//!   the concrete module version that owns it
//! - [`ProviderSession`]: the two-primitive boundary to a live provider
//!   execution environment (script host, subprocess, plugin host)
//! - [`ResourceInvoker`]: the invocation engine exposing Get/Test/Set with
//!   uniform resolution and error semantics
//!
//! ## Example
//!
//! ```ignore
//! use converge::{ModuleReference, PropertySet, ResourceInvoker};
//!
//! let mut session = my_adapter::connect()?;
//! let mut invoker = ResourceInvoker::new(&mut session);
//!
//! let desired: PropertySet =
//!     [("Key", "HKCU:\\Test"), ("Value", "1")].into_iter().collect();
//!
//! if !invoker.test("RegistryValue", &desired, None)? {
//!     let reboot_required = invoker.set("RegistryValue", &desired, None)?;
//! }
//! ```
//!
//! A session handles one invocation at a time; the `&mut` borrows enforce
//! that discipline at compile time. Callers needing parallelism open one
//! session per worker.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod error;
pub mod properties;
pub mod resolver;
pub mod session;

#[cfg(test)]
pub mod test_fixtures;

// Re-export main types at crate root
pub use catalog::{list_all, list_in_module};
pub use domain::{ModuleIdentity, ModuleReference, ResourceDescriptor, VersionConstraint};
pub use engine::{InvocationResult, ResourceInvoker};
pub use error::{ConvergeError, Result};
pub use properties::{DynamicValue, PropertySet};
pub use session::{ProviderSession, ResourceCommand, decode_resource_record};
