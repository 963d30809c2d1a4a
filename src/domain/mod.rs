//! Domain types shared across resolution, discovery and invocation

pub mod descriptor;
pub mod module_ref;

pub use descriptor::{ModuleIdentity, ResourceDescriptor};
pub use module_ref::{ModuleReference, VersionConstraint};
