// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Domain Invariants
//!
//! Field-level rules for configuration records and the names derived from
//! them. All functions are pure and return the first violation found.

use std::collections::HashSet;

use super::config::{CapacityBounds, CredentialRef, SizeClass};
use crate::errors::{TopologyError, TopologyResult};

/// Validate scaling bounds ordering
///
/// # Rules
/// - `min <= desired <= max`
/// - Bounds are taken verbatim later, so no clamping happens here
pub fn validate_capacity_bounds(bounds: &CapacityBounds) -> TopologyResult<()> {
    if bounds.min > bounds.max {
        return Err(TopologyError::ConfigurationConstraint(format!(
            "min capacity {} exceeds max capacity {}",
            bounds.min, bounds.max
        )));
    }
    if bounds.min > bounds.desired {
        return Err(TopologyError::ConfigurationConstraint(format!(
            "min capacity {} exceeds desired capacity {}",
            bounds.min, bounds.desired
        )));
    }
    if bounds.desired > bounds.max {
        return Err(TopologyError::ConfigurationConstraint(format!(
            "desired capacity {} exceeds max capacity {}",
            bounds.desired, bounds.max
        )));
    }
    Ok(())
}

/// Validate allocated database storage is positive
pub fn validate_storage(storage_gb: u32) -> TopologyResult<()> {
    if storage_gb == 0 {
        return Err(TopologyError::ConfigurationConstraint(
            "database storage must be a positive number of GB".to_string(),
        ));
    }
    Ok(())
}

/// Validate a size class token
///
/// # Rules
/// - Not empty
/// - Dot-separated, at least `family.size`
/// - Lowercase alphanumerics inside each segment
pub fn validate_size_class(label: &str, class: &SizeClass) -> TopologyResult<()> {
    let value = class.as_str();
    let segments: Vec<&str> = value.split('.').collect();

    let well_formed = segments.len() >= 2
        && segments.iter().all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        });

    if !well_formed {
        return Err(TopologyError::ConfigurationConstraint(format!(
            "{} '{}' is not of the form family.size",
            label, value
        )));
    }
    Ok(())
}

/// Validate the credential handle references something
pub fn validate_credential(credential: &CredentialRef) -> TopologyResult<()> {
    if credential.username.trim().is_empty() {
        return Err(TopologyError::ConfigurationConstraint(
            "database admin username cannot be empty".to_string(),
        ));
    }
    if credential.secret_id.trim().is_empty() {
        return Err(TopologyError::ConfigurationConstraint(
            "database credential secret id cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate an environment or stack name used inside derived identifiers
///
/// # Rules
/// - 1-64 characters
/// - ASCII alphanumerics and `-`
/// - Must not start or end with `-`
pub fn validate_scope_name(label: &str, name: &str) -> TopologyResult<()> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

    if !valid {
        return Err(TopologyError::ConfigurationConstraint(format!(
            "{} '{}' must be 1-64 alphanumeric or '-' characters",
            label, name
        )));
    }
    Ok(())
}

/// Validate that a sequence of names has no duplicates
pub fn validate_unique<'a>(names: impl IntoIterator<Item = &'a str>) -> TopologyResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(TopologyError::DuplicateExport(name.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 0, 0 ; "all zero")]
    #[test_case(1, 2, 4 ; "strictly increasing")]
    #[test_case(2, 2, 2 ; "all equal")]
    fn test_valid_capacity(min: u32, desired: u32, max: u32) {
        assert!(validate_capacity_bounds(&CapacityBounds::new(min, desired, max)).is_ok());
    }

    #[test_case(3, 2, 4 ; "min above desired")]
    #[test_case(1, 5, 4 ; "desired above max")]
    #[test_case(5, 5, 4 ; "min above max")]
    fn test_invalid_capacity(min: u32, desired: u32, max: u32) {
        assert!(matches!(
            validate_capacity_bounds(&CapacityBounds::new(min, desired, max)),
            Err(TopologyError::ConfigurationConstraint(_))
        ));
    }

    #[test]
    fn test_size_class() {
        assert!(validate_size_class("compute", &SizeClass::new("t3.micro")).is_ok());
        assert!(validate_size_class("db", &SizeClass::new("db.r6g.large")).is_ok());
        assert!(validate_size_class("compute", &SizeClass::new("")).is_err());
        assert!(validate_size_class("compute", &SizeClass::new("t3")).is_err());
        assert!(validate_size_class("compute", &SizeClass::new("T3.Micro")).is_err());
        assert!(validate_size_class("compute", &SizeClass::new("t3..micro")).is_err());
    }

    #[test]
    fn test_credential() {
        assert!(validate_credential(&CredentialRef::new("admin", "prod/db")).is_ok());
        assert!(validate_credential(&CredentialRef::new("", "prod/db")).is_err());
        assert!(validate_credential(&CredentialRef::new("admin", " ")).is_err());
    }

    #[test]
    fn test_scope_name() {
        assert!(validate_scope_name("environment", "dev").is_ok());
        assert!(validate_scope_name("environment", "prod-eu1").is_ok());
        assert!(validate_scope_name("environment", "").is_err());
        assert!(validate_scope_name("environment", "-dev").is_err());
        assert!(validate_scope_name("environment", "dev_1").is_err());
    }

    #[test]
    fn test_unique() {
        assert!(validate_unique(["a", "b", "c"]).is_ok());
        assert_eq!(
            validate_unique(["a", "b", "a"]),
            Err(TopologyError::DuplicateExport("a".to_string()))
        );
    }
}
