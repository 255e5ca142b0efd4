//! Human-readable configuration preview
//!
//! YAML-like text with one commented heading per section. It is shown to people
//! and never parsed back.

use crate::catalog::{self, NodeSize};

use super::codec::ConfigurationDraft;

const UNSET: &str = "<not set>";

fn or_unset(value: Option<&str>) -> &str {
    value.unwrap_or(UNSET)
}

/// Render the preview for a draft
///
/// Pure: the same draft always renders to identical text.
pub fn render_preview(draft: &ConfigurationDraft) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Cluster Configuration".to_string());
    lines.push(format!("name: {}", or_unset(draft.cluster_name.as_deref())));
    match draft.provider {
        Some(p) => {
            lines.push(format!("provider: {p}  # {}", catalog::provider(p).name));
            if p.is_hci() {
                lines.push("# Region not applicable for HCI providers".to_string());
            } else {
                lines.push(format!("region: {}", or_unset(draft.region.as_deref())));
            }
        }
        None => {
            lines.push(format!("provider: {UNSET}"));
            lines.push(format!("region: {}", or_unset(draft.region.as_deref())));
        }
    }
    lines.push(String::new());

    lines.push("# Credentials".to_string());
    match &draft.credential_id {
        Some(id) => lines.push(format!("credentialId: {id}")),
        None => lines.push("# No credential selected".to_string()),
    }
    if let Some(manager) = &draft.manager {
        lines.push("managementServer:".to_string());
        lines.push(format!("  serverId: {}", manager.server_id));
        lines.push(format!("  credentialId: {}", manager.credential_id));
    }
    lines.push(String::new());

    lines.push("# Node Configuration".to_string());
    lines.push("os:".to_string());
    lines.push(format!("  id: {}", or_unset(draft.os.as_deref())));
    lines.push(format!("  version: {}", or_unset(draft.os_version.as_deref())));
    if draft.node_pools.is_empty() {
        lines.push("# No node pools configured".to_string());
    } else {
        lines.push("nodePools:".to_string());
        for pool in &draft.node_pools {
            lines.push(format!("  - role: {}", pool.role));
            lines.push(format!("    count: {}", pool.count));
            match &pool.size {
                NodeSize::VmSize(id) => lines.push(format!("    vmSize: {id}")),
                NodeSize::CustomSize(size) => {
                    lines.push("    customSize:".to_string());
                    lines.push(format!("      cpu: {}", size.cpu));
                    lines.push(format!("      memory: {}Gi", size.memory));
                    lines.push(format!("      storage: {}Gi", size.storage));
                }
            }
        }
    }
    lines.push(String::new());

    lines.push("# Kubernetes Configuration".to_string());
    lines.push("kubernetes:".to_string());
    lines.push(format!(
        "  distribution: {}",
        draft
            .distribution
            .map(|d| d.as_str())
            .unwrap_or(UNSET)
    ));
    lines.push(format!("  version: {}", or_unset(draft.k8s_version.as_deref())));
    lines.push("storage:".to_string());
    lines.push(format!(
        "  engine: {}",
        draft
            .storage_engine
            .map(|e| e.as_str())
            .unwrap_or(UNSET)
    ));
    match (&draft.storage_engine, &draft.storage_version) {
        (Some(engine), _) if !engine.is_versioned() => {
            lines.push("  # Version managed by the cloud provider".to_string())
        }
        (_, version) => lines.push(format!("  version: {}", or_unset(version.as_deref()))),
    }
    lines.push(String::new());

    lines.push("# Add-ons".to_string());
    if draft.addons.is_empty() {
        lines.push("# No add-ons enabled".to_string());
    } else {
        lines.push("addons:".to_string());
        for addon in &draft.addons {
            match catalog::addon(&addon.id) {
                Some(entry) => lines.push(format!("  - id: {}  # {}", addon.id, entry.name)),
                None => lines.push(format!("  - id: {}", addon.id)),
            }
            lines.push(format!("    version: {}", addon.version));
            if addon.has_custom_values() {
                lines.push("    customValues: true".to_string());
            }
        }
    }
    lines.push(String::new());

    lines.push("# Security Hardening".to_string());
    if draft.security_options.is_empty() {
        lines.push("# No security hardening selected".to_string());
    } else {
        lines.push("securityOptions:".to_string());
        for option in &draft.security_options {
            match catalog::security_framework(option) {
                Some(framework) => lines.push(format!("  - {option}  # {}", framework.name)),
                None => lines.push(format!("  - {option}")),
            }
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CustomSize, DistributionId, NodePool, NodeRole, ProviderId, StorageEngineId};
    use crate::cluster::{AddonSpec, AddonValues};

    const SECTIONS: [&str; 6] = [
        "# Cluster Configuration",
        "# Credentials",
        "# Node Configuration",
        "# Kubernetes Configuration",
        "# Add-ons",
        "# Security Hardening",
    ];

    #[test]
    fn test_empty_draft_renders_placeholders() {
        let text = render_preview(&ConfigurationDraft::default());
        let mut last = 0;
        for section in SECTIONS {
            let at = text.find(section).unwrap_or_else(|| panic!("missing {section}"));
            assert!(at >= last, "{section} out of order");
            last = at;
        }
        assert!(text.contains("# No node pools configured"));
        assert!(text.contains("# No add-ons enabled"));
        assert!(text.contains("# No security hardening selected"));
        assert!(text.contains("# No credential selected"));
    }

    #[test]
    fn test_populated_draft() {
        let draft = ConfigurationDraft {
            cluster_name: Some("edge-01".to_string()),
            provider: Some(ProviderId::Proxmox),
            credential_id: Some("pve".to_string()),
            node_pools: vec![NodePool {
                role: NodeRole::Worker,
                count: 2,
                size: NodeSize::CustomSize(CustomSize {
                    cpu: 4,
                    memory: 16,
                    storage: 100,
                }),
            }],
            distribution: Some(DistributionId::K3s),
            k8s_version: Some("v1.31.2+k3s1".to_string()),
            storage_engine: Some(StorageEngineId::CloudProvider),
            addons: vec![AddonSpec {
                id: "velero".to_string(),
                version: "8.0.0".to_string(),
                values: Some(AddonValues::Persisted),
            }],
            security_options: vec!["nsa-cisa".to_string()],
            ..ConfigurationDraft::default()
        };
        let text = render_preview(&draft);
        assert!(text.contains("provider: proxmox  # Proxmox VE"));
        assert!(text.contains("# Region not applicable for HCI providers"));
        assert!(text.contains("      memory: 16Gi"));
        assert!(text.contains("  distribution: K3s"));
        assert!(text.contains("  # Version managed by the cloud provider"));
        assert!(text.contains("  - id: velero  # Velero"));
        assert!(text.contains("    customValues: true"));
        assert!(text.contains("  - nsa-cisa  # NSA/CISA Kubernetes Hardening"));
        assert_eq!(text, render_preview(&draft));
    }
}
