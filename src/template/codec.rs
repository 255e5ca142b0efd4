//! Mapping between configuration documents and persisted template rows

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::catalog::{DistributionId, NodePool, NodeSize, ProviderId, StorageEngineId};
use crate::cluster::{
    AddonSpec, AddonValues, ClusterConfiguration, KubernetesSpec, ManagerBinding, OsSpec,
    StorageSpec,
};
use crate::error::{Error, Result};
use crate::wizard::WizardState;

use super::record::{AddonRecord, NodePoolRecord, TemplateRecord};

/// Possibly incomplete configuration document
///
/// This is what templates store and what the preview renders. A complete draft
/// converts into a [`ClusterConfiguration`] with [`ConfigurationDraft::to_configuration`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigurationDraft {
    pub cluster_name: Option<String>,
    pub provider: Option<ProviderId>,
    pub credential_id: Option<String>,
    pub region: Option<String>,
    pub os: Option<String>,
    pub os_version: Option<String>,
    pub node_pools: Vec<NodePool>,
    pub distribution: Option<DistributionId>,
    pub k8s_version: Option<String>,
    pub storage_engine: Option<StorageEngineId>,
    pub storage_version: Option<String>,
    pub addons: Vec<AddonSpec>,
    pub security_options: Vec<String>,
    pub manager: Option<ManagerBinding>,
}

impl From<&ClusterConfiguration> for ConfigurationDraft {
    fn from(c: &ClusterConfiguration) -> Self {
        ConfigurationDraft {
            cluster_name: Some(c.name.clone()),
            provider: Some(c.provider),
            credential_id: Some(c.credential_id.clone()),
            region: c.region.clone(),
            os: Some(c.os.id.clone()),
            os_version: Some(c.os.version.clone()),
            node_pools: c.node_pools.clone(),
            distribution: Some(c.kubernetes.distribution),
            k8s_version: Some(c.kubernetes.version.clone()),
            storage_engine: Some(c.storage.engine),
            storage_version: c.storage.version.clone(),
            addons: c.addons.clone(),
            security_options: c.security_options.clone(),
            manager: c.manager.clone(),
        }
    }
}

/// Draft of whatever has been selected so far; disabled add-ons are left out
impl From<&WizardState> for ConfigurationDraft {
    fn from(state: &WizardState) -> Self {
        let c = state.cascade();
        ConfigurationDraft {
            cluster_name: Some(c.name.clone()).filter(|n| !n.is_empty()),
            provider: c.provider,
            credential_id: c.credential_id.clone(),
            region: c.region_id.clone(),
            os: c.os_id.clone(),
            os_version: c.os_version.clone(),
            node_pools: c.node_pools.clone(),
            distribution: c.distribution,
            k8s_version: c.k8s_version.clone(),
            storage_engine: c.storage_engine,
            storage_version: c.storage_version.clone(),
            addons: c
                .enabled_addons()
                .map(|a| AddonSpec {
                    id: a.id.clone(),
                    version: a.version.clone(),
                    values: a.values.clone(),
                })
                .collect(),
            security_options: c.security_options.clone(),
            manager: match (&c.manager.server_id, &c.manager.credential_id) {
                (Some(server_id), Some(credential_id)) => Some(ManagerBinding {
                    server_id: server_id.clone(),
                    credential_id: credential_id.clone(),
                }),
                _ => None,
            },
        }
    }
}

impl ConfigurationDraft {
    /// Complete configuration, or a [`Error::ParseError`] naming the first missing field
    pub fn to_configuration(&self) -> Result<ClusterConfiguration> {
        fn required<T: Clone>(value: &Option<T>, field: &str) -> Result<T> {
            value
                .clone()
                .ok_or_else(|| Error::parse(field, "missing from template"))
        }

        Ok(ClusterConfiguration {
            name: required(&self.cluster_name, "cluster_name")?,
            provider: required(&self.provider, "provider")?,
            credential_id: required(&self.credential_id, "credential_id")?,
            region: self.region.clone(),
            os: OsSpec {
                id: required(&self.os, "os")?,
                version: required(&self.os_version, "os_version")?,
            },
            node_pools: self.node_pools.clone(),
            kubernetes: KubernetesSpec {
                distribution: required(&self.distribution, "k8s_distribution")?,
                version: required(&self.k8s_version, "k8s_version")?,
            },
            storage: StorageSpec {
                engine: required(&self.storage_engine, "storage_engine")?,
                version: self.storage_version.clone(),
            },
            addons: self.addons.clone(),
            security_options: self.security_options.clone(),
            manager: self.manager.clone(),
        })
    }
}

/// A decoded template row
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub draft: ConfigurationDraft,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
    // Plain data structs with string keys always serialize.
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

fn pool_record(pool: &NodePool) -> NodePoolRecord {
    let (vm_size, custom_size) = match &pool.size {
        NodeSize::VmSize(id) => (Some(id.clone()), None),
        NodeSize::CustomSize(size) => (None, Some(*size)),
    };
    NodePoolRecord {
        role: pool.role,
        count: pool.count,
        vm_size,
        custom_size,
    }
}

fn addon_record(addon: &AddonSpec) -> AddonRecord {
    AddonRecord {
        id: addon.id.clone(),
        enabled: true,
        version: addon.version.clone(),
        has_custom_values: addon.has_custom_values(),
    }
}

/// Row for a new template built from a complete configuration
pub fn encode(
    config: &ClusterConfiguration,
    name: &str,
    description: Option<&str>,
    now: DateTime<Utc>,
) -> TemplateRecord {
    encode_draft(&ConfigurationDraft::from(config), name, description, now)
}

/// Row for a new template; values files are reduced to `hasCustomValues`
pub fn encode_draft(
    draft: &ConfigurationDraft,
    name: &str,
    description: Option<&str>,
    now: DateTime<Utc>,
) -> TemplateRecord {
    let node_pools: Vec<NodePoolRecord> = draft.node_pools.iter().map(pool_record).collect();
    let addons: Vec<AddonRecord> = draft.addons.iter().map(addon_record).collect();

    TemplateRecord {
        id: None,
        name: name.to_string(),
        description: description.map(str::to_string),
        provider: draft
            .provider
            .map(|p| p.as_str().to_string())
            .unwrap_or_default(),
        k8s_distribution: draft.distribution.map(|d| d.as_str().to_string()),
        k8s_version: draft.k8s_version.clone(),
        region: draft.region.clone(),
        os: draft.os.clone(),
        os_version: draft.os_version.clone(),
        storage_engine: draft.storage_engine.map(|e| e.as_str().to_string()),
        storage_version: draft.storage_version.clone(),
        node_pools: to_json(&node_pools),
        addons: to_json(&addons),
        security_options: to_json(&draft.security_options),
        cluster_name: draft.cluster_name.clone(),
        credential_id: draft.credential_id.clone(),
        manager: draft
            .manager
            .as_ref()
            .map(to_json)
            .unwrap_or(serde_json::Value::Null),
        created_at: Some(now),
        updated_at: Some(now),
    }
}

/// JSON column as a list; null, malformed or foreign shapes give an empty list
fn json_list<T: DeserializeOwned>(column: &str, value: &serde_json::Value) -> Vec<T> {
    if value.is_null() {
        return Vec::new();
    }
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        debug!(column, error = %e, "ignoring malformed template column");
        Vec::new()
    })
}

fn parse_column<T: std::str::FromStr>(column: &str, value: &Option<String>) -> Option<T> {
    let raw = value.as_deref().filter(|s| !s.is_empty())?;
    match raw.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            debug!(column, value = raw, "ignoring unknown template value");
            None
        }
    }
}

fn node_pool(record: NodePoolRecord) -> Option<NodePool> {
    let size = match (record.vm_size, record.custom_size) {
        (Some(id), _) if !id.is_empty() => NodeSize::VmSize(id),
        (_, Some(size)) => NodeSize::CustomSize(size),
        _ => return None,
    };
    Some(NodePool {
        role: record.role,
        count: record.count,
        size,
    })
}

/// Decode a stored row; never fails
///
/// Unknown identifiers and missing optional columns decode to `None` or an
/// empty list. Disabled add-on entries are skipped and a stored
/// `hasCustomValues` becomes [`AddonValues::Persisted`].
pub fn decode(record: &TemplateRecord) -> Template {
    let manager = if record.manager.is_null() {
        None
    } else {
        serde_json::from_value(record.manager.clone())
            .map_err(|e| debug!(error = %e, "ignoring malformed manager column"))
            .ok()
    };

    let draft = ConfigurationDraft {
        cluster_name: record.cluster_name.clone(),
        provider: parse_column("provider", &Some(record.provider.clone())),
        credential_id: record.credential_id.clone(),
        region: record.region.clone(),
        os: record.os.clone(),
        os_version: record.os_version.clone(),
        node_pools: json_list::<NodePoolRecord>("node_pools", &record.node_pools)
            .into_iter()
            .filter_map(node_pool)
            .collect(),
        distribution: parse_column("k8s_distribution", &record.k8s_distribution),
        k8s_version: record.k8s_version.clone(),
        storage_engine: parse_column("storage_engine", &record.storage_engine),
        storage_version: record.storage_version.clone(),
        addons: json_list::<AddonRecord>("addons", &record.addons)
            .into_iter()
            .filter(|a| a.enabled)
            .map(|a| AddonSpec {
                values: a.has_custom_values.then_some(AddonValues::Persisted),
                id: a.id,
                version: a.version,
            })
            .collect(),
        security_options: json_list("security_options", &record.security_options),
        manager,
    };

    Template {
        id: record.id.clone(),
        name: record.name.clone(),
        description: record.description.clone(),
        draft,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}
