//! The assembled cluster configuration document
//!
//! [`ClusterConfiguration`] is the immutable output of the wizard: it is either
//! handed to the deploy action, rendered as a preview, or persisted as a template.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::{DistributionId, NodePool, ProviderId, StorageEngineId};
use crate::error::Result;

/// Custom Helm values uploaded for an add-on
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValuesFile {
    pub file_name: String,
    pub contents: String,
}

/// Custom values attached to an add-on
///
/// Templates never store the file itself; after a persistence round-trip the
/// values are known to exist but are [`AddonValues::Persisted`] only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AddonValues {
    Inline(ValuesFile),
    Persisted,
}

/// Enabled add-on with its chosen version
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddonSpec {
    pub id: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<AddonValues>,
}

impl AddonSpec {
    pub fn has_custom_values(&self) -> bool {
        self.values.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OsSpec {
    pub id: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct KubernetesSpec {
    pub distribution: DistributionId,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StorageSpec {
    pub engine: StorageEngineId,
    /// Absent for `CloudProvider` storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Registration of the cluster with an external management server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerBinding {
    pub server_id: String,
    pub credential_id: String,
}

/// Deployable cluster configuration
///
/// # Examples
///
/// ```rust,no_run
/// use clusterforge::catalog::ProviderId;
/// use clusterforge::cluster::assemble;
/// use clusterforge::wizard::WizardState;
///
/// let state = WizardState::new()
///     .set_name("edge-01")
///     .select_provider(ProviderId::Harvester);
/// // ... credential fetched and selected ...
/// match assemble(&state) {
///     Ok(config) => println!("{}", config.to_yaml().unwrap()),
///     Err(errors) => {
///         for e in errors {
///             eprintln!("{}: {}", e.field, e.message);
///         }
///     }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfiguration {
    pub name: String,
    pub provider: ProviderId,
    pub credential_id: String,

    /// Absent for HCI providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    pub os: OsSpec,
    pub node_pools: Vec<NodePool>,
    pub kubernetes: KubernetesSpec,
    pub storage: StorageSpec,

    #[serde(default)]
    pub addons: Vec<AddonSpec>,

    #[serde(default)]
    pub security_options: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<ManagerBinding>,
}

impl ClusterConfiguration {
    /// Copy with every inline values file reduced to [`AddonValues::Persisted`]
    pub fn detach_values(&self) -> Self {
        let mut detached = self.clone();
        for addon in &mut detached.addons {
            if addon.values.is_some() {
                addon.values = Some(AddonValues::Persisted);
            }
        }
        detached
    }

    /// Structured YAML hand-off for the deploy action
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
