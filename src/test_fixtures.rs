//! Test fixtures and utilities for reducing test setup duplication.
//!
//! Provides [`FakeSession`], an in-memory [`ProviderSession`] backed by a
//! declarable module/resource table. Each fake resource carries a mutable
//! property store, so Get/Test/Set behave like a real provider: Test
//! compares desired properties against the store without touching it, Set
//! merges them in. Call counters let tests assert whether the execution
//! environment was contacted at all.
//!
//! # Usage
//!
//! ```ignore
//! let mut session = FakeSession::with_resources(vec![
//!     FakeResource::new("RegistryValue", "Registry", "1.0.0"),
//! ]);
//! let mut invoker = ResourceInvoker::new(&mut session);
//! ```

use semver::Version;
use serde_json::{Value, json};

use crate::domain::{ModuleIdentity, ModuleReference};
use crate::error::{Result, invocation_failed};
use crate::properties::PropertySet;
use crate::session::{ProviderSession, ResourceCommand};

/// One declarable resource inside a [`FakeSession`]
#[derive(Debug, Clone)]
pub struct FakeResource {
    pub name: String,
    pub module: ModuleIdentity,
    pub supports_set: bool,
    pub supports_test: bool,
    pub reboot_on_set: bool,
    pub state: PropertySet,
}

#[allow(clippy::expect_used)]
impl FakeResource {
    pub fn new(name: &str, module_name: &str, version: &str) -> Self {
        FakeResource {
            name: name.to_string(),
            module: ModuleIdentity::new(
                module_name,
                Version::parse(version).expect("fixture version must parse"),
            ),
            supports_set: true,
            supports_test: true,
            reboot_on_set: false,
            state: PropertySet::new(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.supports_set = false;
        self
    }

    pub fn without_test(mut self) -> Self {
        self.supports_test = false;
        self
    }

    pub fn reboots_on_set(mut self) -> Self {
        self.reboot_on_set = true;
        self
    }

    pub fn with_state(mut self, state: PropertySet) -> Self {
        self.state = state;
        self
    }

    fn discovery_record(&self) -> Value {
        json!({
            "Name": self.name,
            "ModuleName": self.module.name,
            "Version": self.module.version.to_string(),
            "SupportsSet": self.supports_set,
            "SupportsTest": self.supports_test,
        })
    }
}

/// In-memory provider session over a fixed resource table
#[derive(Debug, Default)]
pub struct FakeSession {
    resources: Vec<FakeResource>,
    /// Extra raw records appended to every discovery response, for
    /// malformed-output tests
    pub extra_records: Vec<Value>,
    /// Replaces the next resource command's raw output when set
    pub next_result_override: Option<Value>,
    pub discovery_calls: usize,
    pub resource_calls: usize,
}

impl FakeSession {
    pub fn new() -> Self {
        FakeSession::default()
    }

    pub fn with_resources(resources: Vec<FakeResource>) -> Self {
        FakeSession {
            resources,
            ..FakeSession::default()
        }
    }

    pub fn add(&mut self, resource: FakeResource) {
        self.resources.push(resource);
    }

    /// Current property store of the first resource with this name.
    pub fn state_of(&self, name: &str) -> Option<&PropertySet> {
        self.resources
            .iter()
            .find(|resource| resource.name.eq_ignore_ascii_case(name))
            .map(|resource| &resource.state)
    }
}

impl ProviderSession for FakeSession {
    fn invoke_discovery_command(
        &mut self,
        module_filter: Option<&ModuleReference>,
    ) -> Result<Vec<Value>> {
        self.discovery_calls += 1;
        let mut records: Vec<Value> = self
            .resources
            .iter()
            .filter(|resource| {
                module_filter.is_none_or(|module| {
                    module.matches_module(&resource.module.name)
                        && module.matches_version(&resource.module.version)
                })
            })
            .map(FakeResource::discovery_record)
            .collect();
        records.extend(self.extra_records.iter().cloned());
        Ok(records)
    }

    fn invoke_resource_command(
        &mut self,
        command: ResourceCommand,
        resource: &str,
        module: &ModuleIdentity,
        properties: &PropertySet,
    ) -> Result<Value> {
        self.resource_calls += 1;

        if let Some(overridden) = self.next_result_override.take() {
            return Ok(overridden);
        }

        let hosted = self
            .resources
            .iter_mut()
            .find(|candidate| {
                candidate.name.eq_ignore_ascii_case(resource) && candidate.module == *module
            })
            .ok_or_else(|| {
                invocation_failed(resource, command, "resource is not hosted by this session")
            })?;

        match command {
            ResourceCommand::Get => hosted.state.to_json(),
            ResourceCommand::Test => {
                let in_desired_state = properties
                    .iter()
                    .all(|(key, desired)| hosted.state.get(key) == Some(desired));
                Ok(json!({ "InDesiredState": in_desired_state }))
            }
            ResourceCommand::Set => {
                if !hosted.supports_set {
                    return Err(invocation_failed(resource, command, "resource is read-only"));
                }
                for (key, desired) in properties {
                    hosted.state.insert(key.clone(), desired.clone());
                }
                Ok(json!({ "RebootRequired": hosted.reboot_on_set }))
            }
        }
    }
}
