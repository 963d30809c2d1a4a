//! Resolved module identities and resource descriptors

use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::properties::PropertySet;

/// Concrete module identity produced by resolution: name plus exact version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleIdentity {
    pub name: String,
    pub version: Version,
}

impl ModuleIdentity {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        ModuleIdentity {
            name: name.into(),
            version,
        }
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Discovery-time metadata about one resource
///
/// Descriptors are recomputed per session and never persisted, since the set
/// of installed providers can change between sessions. Once returned they
/// are immutable values owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Resource name as the provider declares it
    pub name: String,

    /// Concrete module that owns the resource
    pub module: ModuleIdentity,

    /// Whether the provider implements the Set operation; some resources
    /// are read/test-only
    pub supports_set: bool,

    /// Whether the provider implements the Test operation; defaults to true
    /// unless the provider explicitly declines
    pub supports_test: bool,

    /// Structural description of the resource's properties, when declared
    pub schema: Option<PropertySet>,
}

impl ResourceDescriptor {
    /// Resource names compare ASCII case-insensitively, matching the
    /// environment's ordinal-ignore-case lookups.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}
