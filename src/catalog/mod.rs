//! Resource catalog enumeration
//!
//! Discovery/search backing: list every resource a session can see, or the
//! resources of one resolved module. Results are materialized before return
//! since downstream callers typically need random access and counts; order
//! is stable within a session but carries no guarantee across sessions.

use log::debug;

use crate::domain::{ModuleReference, ResourceDescriptor};
use crate::error::{Result, module_not_found};
use crate::session::{ProviderSession, decode_resource_record};

/// Enumerate every resource across every installed module.
pub fn list_all(session: &mut dyn ProviderSession) -> Result<Vec<ResourceDescriptor>> {
    let records = session.invoke_discovery_command(None)?;
    let mut descriptors = Vec::with_capacity(records.len());
    for record in &records {
        descriptors.push(decode_resource_record(record)?);
    }
    debug!("catalog enumerated {} resources", descriptors.len());
    Ok(descriptors)
}

/// Enumerate the resources of the single module `module_ref` resolves to.
///
/// When the constraint admits several installed versions, the highest one is
/// the resolved module, mirroring how invocation resolution selects versions.
pub fn list_in_module(
    session: &mut dyn ProviderSession,
    module_ref: &ModuleReference,
) -> Result<Vec<ResourceDescriptor>> {
    let records = session.invoke_discovery_command(Some(module_ref))?;
    let mut descriptors = Vec::with_capacity(records.len());
    for record in &records {
        descriptors.push(decode_resource_record(record)?);
    }

    // Adapters may ignore the discovery filter, so narrow again here.
    descriptors.retain(|descriptor| {
        module_ref.matches_module(&descriptor.module.name)
            && module_ref.matches_version(&descriptor.module.version)
    });

    let Some(resolved_version) = descriptors
        .iter()
        .map(|descriptor| descriptor.module.version.clone())
        .max()
    else {
        return Err(module_not_found(module_ref));
    };

    descriptors.retain(|descriptor| descriptor.module.version == resolved_version);
    debug!(
        "catalog enumerated {} resources in module '{}'",
        descriptors.len(),
        module_ref
    );
    Ok(descriptors)
}
