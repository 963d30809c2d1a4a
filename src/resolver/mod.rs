//! Module reference resolution
//!
//! Turns a resource name plus an optional [`ModuleReference`] into the one
//! concrete [`ResourceDescriptor`] an invocation will target. Resolution is
//! deterministic: identical session contents and inputs always yield the
//! same descriptor.
//!
//! Selection rule: among candidate modules exposing the requested resource,
//! the strictly-highest version wins. If multiple distinct modules tie at
//! the top version the resolution fails with
//! [`AmbiguousResource`](crate::ConvergeError::AmbiguousResource) rather
//! than pick one arbitrarily; applying the wrong provider version silently
//! is the primary correctness hazard in this domain.

use std::collections::HashMap;

use log::{debug, trace};

use crate::domain::{ModuleReference, ResourceDescriptor};
use crate::error::{
    Result, ambiguous_resource, module_not_found, resource_not_found, version_not_satisfied,
};
use crate::session::{ProviderSession, decode_resource_record};

/// Resolve `name` (optionally scoped to `module_ref`) to a concrete
/// resource descriptor.
pub fn resolve(
    session: &mut dyn ProviderSession,
    name: &str,
    module_ref: Option<&ModuleReference>,
) -> Result<ResourceDescriptor> {
    debug!(
        "resolving resource '{name}' in {}",
        module_ref.map_or_else(|| "any module".to_string(), |m| format!("module '{m}'"))
    );

    let records = session.invoke_discovery_command(module_ref)?;
    let mut descriptors = Vec::with_capacity(records.len());
    for record in &records {
        descriptors.push(decode_resource_record(record)?);
    }

    let resolved = match module_ref {
        Some(module) => resolve_in_module(name, module, descriptors),
        None => resolve_unscoped(name, descriptors),
    }?;

    debug!("resolved resource '{name}' to {} ('{}')", resolved.module, resolved.name);
    Ok(resolved)
}

/// Resolution scoped to one named module: the constraint narrows the
/// version, then the highest satisfying version wins. A single module name
/// cannot tie with itself, so this path never reports ambiguity.
fn resolve_in_module(
    name: &str,
    module: &ModuleReference,
    descriptors: Vec<ResourceDescriptor>,
) -> Result<ResourceDescriptor> {
    // Re-filter even though discovery was given the module filter; adapters
    // are allowed to return the full catalog.
    let in_module: Vec<ResourceDescriptor> = descriptors
        .into_iter()
        .filter(|descriptor| module.matches_module(&descriptor.module.name))
        .collect();
    if in_module.is_empty() {
        return Err(module_not_found(module));
    }

    let candidates = dedup_sorted(
        in_module
            .into_iter()
            .filter(|descriptor| descriptor.matches_name(name))
            .collect(),
    );
    if candidates.is_empty() {
        return Err(resource_not_found(name, Some(module)));
    }

    let satisfying: Vec<&ResourceDescriptor> = candidates
        .iter()
        .filter(|descriptor| module.matches_version(&descriptor.module.version))
        .collect();

    match satisfying.last() {
        // Sorted ascending, so the last satisfying candidate is the winner
        Some(winner) => Ok((*winner).clone()),
        None => {
            let installed: Vec<String> = candidates
                .iter()
                .map(|descriptor| descriptor.module.version.to_string())
                .collect();
            Err(version_not_satisfied(
                module.name(),
                module.constraint().to_string(),
                installed.join(", "),
            ))
        }
    }
}

/// Unscoped resolution across every installed module: the strictly-highest
/// version wins; a tie between distinct modules is ambiguous.
fn resolve_unscoped(
    name: &str,
    descriptors: Vec<ResourceDescriptor>,
) -> Result<ResourceDescriptor> {
    let candidates = dedup_sorted(
        descriptors
            .into_iter()
            .filter(|descriptor| descriptor.matches_name(name))
            .collect(),
    );
    if candidates.is_empty() {
        return Err(resource_not_found(name, None));
    }

    let top_version = &candidates[candidates.len() - 1].module.version;
    let winners: Vec<&ResourceDescriptor> = candidates
        .iter()
        .filter(|descriptor| &descriptor.module.version == top_version)
        .collect();

    if winners.len() > 1 {
        let tied: Vec<String> = winners
            .iter()
            .map(|descriptor| descriptor.module.to_string())
            .collect();
        return Err(ambiguous_resource(name, tied.join(", ")));
    }

    Ok(winners[0].clone())
}

/// Sort candidates by (module name, version) ascending and drop duplicate
/// module identities, making every later selection order-independent of the
/// adapter's enumeration order.
fn dedup_sorted(mut candidates: Vec<ResourceDescriptor>) -> Vec<ResourceDescriptor> {
    candidates.sort_by(|a, b| {
        let left = (a.module.name.to_ascii_lowercase(), &a.module.version);
        let right = (b.module.name.to_ascii_lowercase(), &b.module.version);
        left.cmp(&right)
    });
    candidates.dedup_by(|a, b| {
        a.module.matches_name(&b.module.name) && a.module.version == b.module.version
    });
    candidates.sort_by(|a, b| a.module.version.cmp(&b.module.version));
    candidates
}

/// Per-session cache of successful resolutions
///
/// Owned exclusively by the invocation engine for the session's lifetime;
/// installed providers cannot change mid-session, so a hit is always valid.
/// Failed resolutions are never cached.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<(String, String), ResourceDescriptor>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        ResolutionCache {
            entries: HashMap::new(),
        }
    }

    /// Resolve through the cache.
    pub fn resolve(
        &mut self,
        session: &mut dyn ProviderSession,
        name: &str,
        module_ref: Option<&ModuleReference>,
    ) -> Result<ResourceDescriptor> {
        let key = (
            name.to_ascii_lowercase(),
            module_ref.map_or_else(|| "*".to_string(), ToString::to_string),
        );
        if let Some(hit) = self.entries.get(&key) {
            trace!("resolution cache hit for '{name}'");
            return Ok(hit.clone());
        }

        let descriptor = resolve(session, name, module_ref)?;
        self.entries.insert(key, descriptor.clone());
        Ok(descriptor)
    }
}
