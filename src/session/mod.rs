//! Provider session boundary
//!
//! A [`ProviderSession`] is a live connection to an execution environment
//! capable of hosting resource providers (a script host, a subprocess, a
//! plugin host). The engine and the catalog consume exactly two primitives:
//! a discovery command and a resource command, both synchronous and both
//! returning environment-native structured data.
//!
//! The underlying environment is conversational and stateful, so a session
//! handles at most one in-flight invocation; both primitives take `&mut
//! self` and the borrow checker enforces the discipline. Adapters translate
//! transport and process failures into
//! [`SessionFailed`](crate::ConvergeError::SessionFailed); any internal
//! asynchrony (pipe reads, process I/O) stays contained in the adapter.

pub(crate) mod record;

pub use record::decode_resource_record;

use std::fmt;

use serde_json::Value;

use crate::domain::{ModuleIdentity, ModuleReference};
use crate::error::Result;
use crate::properties::PropertySet;

/// The three provider operations a resource command can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceCommand {
    /// Read current state
    Get,
    /// Check whether current state satisfies desired state; must not mutate
    Test,
    /// Apply desired state; may have real side effects on the host
    Set,
}

impl ResourceCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceCommand::Get => "Get",
            ResourceCommand::Test => "Test",
            ResourceCommand::Set => "Set",
        }
    }
}

impl fmt::Display for ResourceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live connection to one provider execution environment
///
/// Alternate adapters (including mocked ones for testing) substitute freely;
/// the invocation engine never sees past this trait.
pub trait ProviderSession {
    /// Enumerate installed resources as raw discovery records, optionally
    /// restricted to modules matching `module_filter`.
    ///
    /// Each record must decode via [`decode_resource_record`]; see that
    /// function for the record contract.
    fn invoke_discovery_command(
        &mut self,
        module_filter: Option<&ModuleReference>,
    ) -> Result<Vec<Value>>;

    /// Run one Get/Test/Set command against a resolved resource, passing
    /// `properties` as the desired state (empty for Get).
    fn invoke_resource_command(
        &mut self,
        command: ResourceCommand,
        resource: &str,
        module: &ModuleIdentity,
        properties: &PropertySet,
    ) -> Result<Value>;
}
