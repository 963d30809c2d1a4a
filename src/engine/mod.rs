//! Resource invocation engine
//!
//! [`ResourceInvoker`] gives Get/Test/Set a uniform, provider-agnostic
//! calling convention: resolve the module reference, validate the resource
//! supports the requested operation, marshal the property set across the
//! dynamic-typing boundary, invoke through the session, and unmarshal the
//! result.
//!
//! Each invocation moves through resolution and then invocation; terminal
//! outcomes are a typed result or a typed error, never a partial value. The
//! engine adds no retry and no rollback: Set is a pass-through with
//! structured error translation, idempotent only to the extent the provider
//! is.


use log::debug;
use serde_json::Value;

use crate::domain::{ModuleReference, ResourceDescriptor};
use crate::error::{Result, invocation_failed, unsupported_operation};
use crate::properties::PropertySet;
use crate::resolver::ResolutionCache;
use crate::session::{ProviderSession, ResourceCommand, record};

/// Terminal output of exactly one invocation
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationResult {
    Get { properties: PropertySet },
    Test { in_desired_state: bool },
    Set { reboot_required: bool },
}

/// The per-resource invocation primitive a configuration engine calls
///
/// Borrows its session for its whole lifetime, so the single-invocation
/// discipline of the session holds across the invoker too; it owns only the
/// resolution cache, which is valid exactly as long as the session.
pub struct ResourceInvoker<'s> {
    session: &'s mut dyn ProviderSession,
    cache: ResolutionCache,
}

impl<'s> ResourceInvoker<'s> {
    pub fn new(session: &'s mut dyn ProviderSession) -> ResourceInvoker<'s> {
        ResourceInvoker {
            session,
            cache: ResolutionCache::new(),
        }
    }

    /// Resolve `name` to the concrete resource an invocation would target,
    /// without invoking it.
    pub fn resolve(
        &mut self,
        name: &str,
        module_ref: Option<&ModuleReference>,
    ) -> Result<ResourceDescriptor> {
        self.cache.resolve(self.session, name, module_ref)
    }

    /// Read current state, returned verbatim; the engine does not interpret
    /// or validate individual property values.
    pub fn get(
        &mut self,
        name: &str,
        module_ref: Option<&ModuleReference>,
    ) -> Result<PropertySet> {
        self.get_with(name, &PropertySet::new(), module_ref)
    }

    /// Read current state, passing provider-defined identity properties
    /// (e.g. the key path that names which instance to read).
    pub fn get_with(
        &mut self,
        name: &str,
        identity: &PropertySet,
        module_ref: Option<&ModuleReference>,
    ) -> Result<PropertySet> {
        let descriptor = self.resolve(name, module_ref)?;
        debug!("Get '{}' via {}", descriptor.name, descriptor.module);
        let raw = self.session.invoke_resource_command(
            ResourceCommand::Get,
            &descriptor.name,
            &descriptor.module,
            identity,
        )?;
        unmarshal_properties(&descriptor, &raw)
    }

    /// Check whether current state already satisfies `settings`. Never
    /// mutates observable state; callers rely on this for dry-run and diff
    /// semantics.
    pub fn test(
        &mut self,
        name: &str,
        settings: &PropertySet,
        module_ref: Option<&ModuleReference>,
    ) -> Result<bool> {
        let descriptor = self.resolve(name, module_ref)?;
        if !descriptor.supports_test {
            return Err(unsupported_operation(&descriptor.name, ResourceCommand::Test));
        }
        debug!("Test '{}' via {}", descriptor.name, descriptor.module);
        let raw = self.session.invoke_resource_command(
            ResourceCommand::Test,
            &descriptor.name,
            &descriptor.module,
            settings,
        )?;
        unmarshal_flag(&descriptor, ResourceCommand::Test, &raw, "InDesiredState")
    }

    /// Apply `settings`, returning whether the provider requires a reboot.
    ///
    /// Refused before the execution environment is contacted when the
    /// descriptor declares the resource read/test-only.
    pub fn set(
        &mut self,
        name: &str,
        settings: &PropertySet,
        module_ref: Option<&ModuleReference>,
    ) -> Result<bool> {
        let descriptor = self.resolve(name, module_ref)?;
        if !descriptor.supports_set {
            return Err(unsupported_operation(&descriptor.name, ResourceCommand::Set));
        }
        debug!("Set '{}' via {}", descriptor.name, descriptor.module);
        let raw = self.session.invoke_resource_command(
            ResourceCommand::Set,
            &descriptor.name,
            &descriptor.module,
            settings,
        )?;
        unmarshal_flag(&descriptor, ResourceCommand::Set, &raw, "RebootRequired")
    }

    /// Dispatch on a command value; `settings` are the desired state for
    /// Test/Set and identity properties for Get.
    pub fn invoke(
        &mut self,
        command: ResourceCommand,
        name: &str,
        settings: &PropertySet,
        module_ref: Option<&ModuleReference>,
    ) -> Result<InvocationResult> {
        match command {
            ResourceCommand::Get => Ok(InvocationResult::Get {
                properties: self.get_with(name, settings, module_ref)?,
            }),
            ResourceCommand::Test => Ok(InvocationResult::Test {
                in_desired_state: self.test(name, settings, module_ref)?,
            }),
            ResourceCommand::Set => Ok(InvocationResult::Set {
                reboot_required: self.set(name, settings, module_ref)?,
            }),
        }
    }
}

/// Get output must be one full, validly-typed property mapping.
fn unmarshal_properties(descriptor: &ResourceDescriptor, raw: &Value) -> Result<PropertySet> {
    PropertySet::from_json_object(raw).map_err(|err| {
        invocation_failed(
            &descriptor.name,
            ResourceCommand::Get,
            format!("malformed provider output: {err}"),
        )
    })
}

/// Test/Set output is a bare boolean or an object carrying `key`; a missing
/// flag is malformed output, never a defaulted value.
fn unmarshal_flag(
    descriptor: &ResourceDescriptor,
    command: ResourceCommand,
    raw: &Value,
    key: &str,
) -> Result<bool> {
    match raw {
        Value::Bool(flag) => Ok(*flag),
        Value::Object(fields) => match record::lookup(fields, key) {
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(other) => Err(invocation_failed(
                &descriptor.name,
                command,
                format!("malformed provider output: field '{key}' must be a boolean, found {other}"),
            )),
            None => Err(invocation_failed(
                &descriptor.name,
                command,
                format!("malformed provider output: field '{key}' is missing"),
            )),
        },
        other => Err(invocation_failed(
            &descriptor.name,
            command,
            format!("malformed provider output: expected a boolean result, found {other}"),
        )),
    }
}
