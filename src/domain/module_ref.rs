//! Module references and version constraints
//!
//! A [`ModuleReference`] identifies a resource provider package by name plus
//! an optional version constraint. An unconstrained reference resolves to
//! any installed module providing the requested resource, preferring the
//! highest version.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::{ConvergeError, Result, invalid_module_reference};

/// Version requirement carried by a module reference
///
/// Ordering follows standard semantic versioning: pre-releases sort below
/// their release, build metadata is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionConstraint {
    /// Any installed version; resolution prefers the highest
    Any,
    /// Exactly this version
    Exact(Version),
    /// This version or newer
    Minimum(Version),
}

impl VersionConstraint {
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            VersionConstraint::Any => true,
            VersionConstraint::Exact(required) => version == required,
            VersionConstraint::Minimum(floor) => version >= floor,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, VersionConstraint::Any)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Any => write!(f, "*"),
            VersionConstraint::Exact(version) => write!(f, "{version}"),
            VersionConstraint::Minimum(floor) => write!(f, ">={floor}"),
        }
    }
}

/// Reference to a resource provider module, possibly version-constrained
///
/// Two references with the same name but different constraints are distinct;
/// resolution always yields at most one concrete module per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleReference {
    name: String,
    constraint: VersionConstraint,
}

impl ModuleReference {
    /// Reference any installed version of `name`.
    pub fn any(name: impl Into<String>) -> Result<ModuleReference> {
        ModuleReference::with_constraint(name, VersionConstraint::Any)
    }

    /// Reference exactly `version` of `name`.
    pub fn exact(name: impl Into<String>, version: Version) -> Result<ModuleReference> {
        ModuleReference::with_constraint(name, VersionConstraint::Exact(version))
    }

    /// Reference `version` or newer of `name`.
    pub fn at_least(name: impl Into<String>, version: Version) -> Result<ModuleReference> {
        ModuleReference::with_constraint(name, VersionConstraint::Minimum(version))
    }

    pub fn with_constraint(
        name: impl Into<String>,
        constraint: VersionConstraint,
    ) -> Result<ModuleReference> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(invalid_module_reference(
                format!("@{constraint}"),
                "module name is empty",
            ));
        }
        Ok(ModuleReference { name, constraint })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constraint(&self) -> &VersionConstraint {
        &self.constraint
    }

    /// Module names compare ASCII case-insensitively, matching the
    /// environment's ordinal-ignore-case lookups.
    pub fn matches_module(&self, module_name: &str) -> bool {
        self.name.eq_ignore_ascii_case(module_name)
    }

    pub fn matches_version(&self, version: &Version) -> bool {
        self.constraint.matches(version)
    }
}

impl fmt::Display for ModuleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraint.is_any() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}@{}", self.name, self.constraint)
        }
    }
}

impl FromStr for ModuleReference {
    type Err = ConvergeError;

    /// Parse `name`, `name@1.2.3` or `name@>=1.2.3`.
    fn from_str(input: &str) -> Result<ModuleReference> {
        let Some((name, requirement)) = input.split_once('@') else {
            return ModuleReference::any(input);
        };
        if name.trim().is_empty() {
            return Err(invalid_module_reference(input, "module name is empty"));
        }

        let (parse_from, minimum) = match requirement.strip_prefix(">=") {
            Some(rest) => (rest, true),
            None => (requirement, false),
        };
        let version = Version::parse(parse_from.trim())
            .map_err(|err| invalid_module_reference(input, err.to_string()))?;

        if minimum {
            ModuleReference::at_least(name, version)
        } else {
            ModuleReference::exact(name, version)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn version(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_unconstrained() {
        let module: ModuleReference = "Registry".parse().unwrap();
        assert_eq!(module.name(), "Registry");
        assert!(module.constraint().is_any());
        assert_eq!(module.to_string(), "Registry");
    }

    #[test]
    fn test_parse_exact() {
        let module: ModuleReference = "Registry@1.2.3".parse().unwrap();
        assert_eq!(module.constraint(), &VersionConstraint::Exact(version("1.2.3")));
        assert_eq!(module.to_string(), "Registry@1.2.3");
    }

    #[test]
    fn test_parse_minimum() {
        let module: ModuleReference = "Registry@>=2.0.0".parse().unwrap();
        assert!(module.matches_version(&version("2.0.0")));
        assert!(module.matches_version(&version("3.1.0")));
        assert!(!module.matches_version(&version("1.9.9")));
        assert_eq!(module.to_string(), "Registry@>=2.0.0");
    }

    #[test]
    fn test_parse_rejects_empty_name() {
        let err = "@1.0.0".parse::<ModuleReference>().unwrap_err();
        assert!(matches!(
            err,
            ConvergeError::InvalidModuleReference { .. }
        ));
    }

    #[test]
    fn test_parse_rejects_bad_version() {
        let err = "Registry@not-a-version".parse::<ModuleReference>().unwrap_err();
        assert!(err.to_string().contains("Registry@not-a-version"));
    }

    #[test]
    fn test_exact_constraint_excludes_other_versions() {
        let module = ModuleReference::exact("Registry", version("1.0.0")).unwrap();
        assert!(module.matches_version(&version("1.0.0")));
        assert!(!module.matches_version(&version("1.0.1")));
    }

    #[test]
    fn test_module_name_matching_is_case_insensitive() {
        let module = ModuleReference::any("Registry").unwrap();
        assert!(module.matches_module("registry"));
        assert!(module.matches_module("REGISTRY"));
        assert!(!module.matches_module("RegistryPolicy"));
    }

    #[test]
    fn test_prerelease_sorts_below_release() {
        let module = ModuleReference::at_least("Registry", version("2.0.0")).unwrap();
        assert!(!module.matches_version(&version("2.0.0-beta.1")));
    }
}
