//! Decoding of raw discovery records
//!
//! Discovery records are environment-native objects describing one
//! installed resource. The record contract:
//!
//! - `Name` (string, required): resource name
//! - `ModuleName` (string, required): owning module
//! - `Version` (string, required): module version, semantic versioning
//! - `SupportsSet` (bool, optional, default true)
//! - `SupportsTest` (bool, optional, default true)
//! - `Schema` (object, optional): structural property description
//!
//! Key lookup is ASCII case-insensitive. Anything violating the contract is
//! malformed provider output and surfaces as
//! [`InvocationFailed`](crate::ConvergeError::InvocationFailed).

use semver::Version;
use serde_json::Value;

use crate::domain::{ModuleIdentity, ResourceDescriptor};
use crate::error::{ConvergeError, Result, invocation_failed};
use crate::properties::PropertySet;

const DISCOVERY: &str = "Discovery";

/// Decode one raw discovery record into a [`ResourceDescriptor`].
pub fn decode_resource_record(record: &Value) -> Result<ResourceDescriptor> {
    let Value::Object(fields) = record else {
        return Err(malformed("<record>", "record is not a structured object"));
    };

    let name = required_string(fields, "Name", "<record>")?;
    let module_name = required_string(fields, "ModuleName", &name)?;
    let version_text = required_string(fields, "Version", &name)?;
    let version = Version::parse(&version_text).map_err(|err| {
        malformed(&name, format!("field 'Version' is not semantic versioning: {err}"))
    })?;

    let supports_set = optional_bool(fields, "SupportsSet", &name)?.unwrap_or(true);
    let supports_test = optional_bool(fields, "SupportsTest", &name)?.unwrap_or(true);

    let schema = match lookup(fields, "Schema") {
        None | Some(Value::Null) => None,
        Some(value @ Value::Object(_)) => Some(
            PropertySet::from_json_object(value)
                .map_err(|err| malformed(&name, format!("field 'Schema': {err}")))?,
        ),
        Some(other) => {
            return Err(malformed(
                &name,
                format!("field 'Schema' must be an object, found {other}"),
            ));
        }
    };

    Ok(ResourceDescriptor {
        name,
        module: ModuleIdentity::new(module_name, version),
        supports_set,
        supports_test,
        schema,
    })
}

fn malformed(resource: &str, reason: impl Into<String>) -> ConvergeError {
    invocation_failed(resource, DISCOVERY, reason)
}

/// Case-insensitive field lookup in environment-native objects.
pub(crate) fn lookup<'a>(fields: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields
        .iter()
        .find(|(field, _)| field.eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
}

fn required_string(
    fields: &serde_json::Map<String, Value>,
    key: &str,
    resource: &str,
) -> Result<String> {
    match lookup(fields, key) {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.clone()),
        Some(_) => Err(malformed(
            resource,
            format!("field '{key}' must be a non-empty string"),
        )),
        None => Err(malformed(resource, format!("field '{key}' is missing"))),
    }
}

fn optional_bool(
    fields: &serde_json::Map<String, Value>,
    key: &str,
    resource: &str,
) -> Result<Option<bool>> {
    match lookup(fields, key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(_) => Err(malformed(resource, format!("field '{key}' must be a boolean"))),
    }
}
