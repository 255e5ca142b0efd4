//! Submission validity predicate for the wizard

use crate::catalog::{NodeSize, StorageEngineId};

use super::state::Cascade;

/// Structured validation error for a wizard field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub how_to_fix: String,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        how_to_fix: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            how_to_fix: how_to_fix.into(),
        }
    }
}

/// Lowercase letters, digits and hyphens only; never empty
pub fn is_valid_cluster_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Check every field the deploy action depends on
///
/// All failures are collected so the caller can mark each offending control at once.
pub(crate) fn validate(c: &Cascade) -> Result<(), Vec<ValidationError>> {
    let mut errors: Vec<ValidationError> = Vec::new();

    if c.name.is_empty() {
        errors.push(ValidationError::new(
            "name",
            "Cluster name is required",
            "Enter a name for the cluster.",
        ));
    } else if !is_valid_cluster_name(&c.name) {
        errors.push(ValidationError::new(
            "name",
            "Cluster name may only contain lowercase letters, digits and hyphens",
            "Use a name such as \"my-cluster-1\".",
        ));
    }

    let Some(provider) = c.provider else {
        errors.push(ValidationError::new(
            "provider",
            "An infrastructure provider is required",
            "Select a provider to deploy to.",
        ));
        return Err(errors);
    };

    if c.credential_id.is_none() {
        errors.push(ValidationError::new(
            "credential",
            "A credential is required",
            format!("Select or create a {provider} credential."),
        ));
    }

    if !provider.is_hci() && c.region_id.is_none() {
        errors.push(ValidationError::new(
            "region",
            "A region is required for cloud providers",
            "Select the region to deploy into.",
        ));
    }

    if c.os_id.is_none() {
        errors.push(ValidationError::new(
            "os",
            "An operating system is required",
            "Select the node operating system.",
        ));
    } else if c.os_version.is_none() {
        errors.push(ValidationError::new(
            "osVersion",
            "An operating system version is required",
            "Select the operating system version.",
        ));
    }

    for (i, pool) in c.node_pools.iter().enumerate() {
        if pool.count == 0 {
            errors.push(ValidationError::new(
                format!("nodePools[{i}].count"),
                format!("{} pool must have at least one node", pool.role),
                "Set the node count to 1 or more.",
            ));
        }
        match (&pool.size, provider.is_hci()) {
            (NodeSize::CustomSize(size), true) if size.is_valid() => {}
            (NodeSize::CustomSize(_), true) => errors.push(ValidationError::new(
                format!("nodePools[{i}].customSize"),
                format!("{} pool custom size must have CPU, memory and storage", pool.role),
                "Set CPU, memory and storage to values greater than zero.",
            )),
            (NodeSize::VmSize(id), false) if c.vm_sizes.iter().any(|s| s.id == id.as_str()) => {}
            (NodeSize::VmSize(_), false) => errors.push(ValidationError::new(
                format!("nodePools[{i}].vmSize"),
                format!("{} pool needs a VM size", pool.role),
                format!("Pick one of the {provider} instance types."),
            )),
            (NodeSize::VmSize(_), true) => errors.push(ValidationError::new(
                format!("nodePools[{i}].customSize"),
                format!("{} pool must use a custom size on {provider}", pool.role),
                "Enter CPU, memory and storage for the pool.",
            )),
            (NodeSize::CustomSize(_), false) => errors.push(ValidationError::new(
                format!("nodePools[{i}].vmSize"),
                format!("{} pool must use a catalog VM size on {provider}", pool.role),
                format!("Pick one of the {provider} instance types."),
            )),
        }
    }

    if c.distribution.is_none() {
        errors.push(ValidationError::new(
            "distribution",
            "A Kubernetes distribution is required",
            "Select a Kubernetes distribution.",
        ));
    } else if c.k8s_version.is_none() {
        errors.push(ValidationError::new(
            "k8sVersion",
            "A Kubernetes version is required",
            "Select a Kubernetes version.",
        ));
    }

    match c.storage_engine {
        None => errors.push(ValidationError::new(
            "storageEngine",
            "A storage engine is required",
            "Select a storage engine.",
        )),
        Some(engine) if engine != StorageEngineId::CloudProvider && c.storage_version.is_none() => {
            errors.push(ValidationError::new(
                "storageVersion",
                format!("A {engine} version is required"),
                "Select a storage engine version.",
            ))
        }
        Some(_) => {}
    }

    if c.manager.server_id.is_some() && c.manager.credential_id.is_none() {
        errors.push(ValidationError::new(
            "manager.credential",
            "A management server credential is required",
            "Select a credential for the management server or clear the server.",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
