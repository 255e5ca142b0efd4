//! Turns a valid wizard state into a [`ClusterConfiguration`]

use tracing::debug;

use crate::catalog::{NodePool, NodeRole, StorageEngineId};
use crate::wizard::{ValidationError, WizardState};

use super::configuration::{
    AddonSpec, ClusterConfiguration, KubernetesSpec, ManagerBinding, OsSpec, StorageSpec,
};

/// Node counts emitted for every cluster, whatever the pool editor showed
const CONTROL_PLANE_COUNT: u32 = 1;
const WORKER_COUNT: u32 = 2;

/// Assemble the deployable configuration
///
/// Exactly two pools are emitted, `control-plane` with one node and `worker`
/// with two, each keeping the size configured for its role. Disabled add-ons
/// are dropped. The same state always produces an equal document.
pub fn assemble(state: &WizardState) -> Result<ClusterConfiguration, Vec<ValidationError>> {
    state.validate()?;
    let c = state.cascade();

    // validate() guarantees every required field below is present.
    let missing = |field: &str| {
        vec![ValidationError::new(
            field,
            format!("{field} is not set"),
            "Complete the wizard step before submitting.",
        )]
    };

    let provider = c.provider.ok_or_else(|| missing("provider"))?;

    let node_pools = [
        (NodeRole::ControlPlane, CONTROL_PLANE_COUNT),
        (NodeRole::Worker, WORKER_COUNT),
    ]
    .into_iter()
    .map(|(role, count)| {
        c.node_pool(role)
            .map(|pool| NodePool {
                role,
                count,
                size: pool.size.clone(),
            })
            .ok_or_else(|| missing(role.as_str()))
    })
    .collect::<Result<Vec<_>, _>>()?;

    let engine = c.storage_engine.ok_or_else(|| missing("storageEngine"))?;
    let storage_version = match engine {
        StorageEngineId::CloudProvider => None,
        _ => c.storage_version.clone(),
    };

    let manager = match (&c.manager.server_id, &c.manager.credential_id) {
        (Some(server_id), Some(credential_id)) => Some(ManagerBinding {
            server_id: server_id.clone(),
            credential_id: credential_id.clone(),
        }),
        _ => None,
    };

    let config = ClusterConfiguration {
        name: c.name.clone(),
        provider,
        credential_id: c.credential_id.clone().ok_or_else(|| missing("credential"))?,
        region: if provider.is_hci() {
            None
        } else {
            c.region_id.clone()
        },
        os: OsSpec {
            id: c.os_id.clone().ok_or_else(|| missing("os"))?,
            version: c.os_version.clone().ok_or_else(|| missing("osVersion"))?,
        },
        node_pools,
        kubernetes: KubernetesSpec {
            distribution: c.distribution.ok_or_else(|| missing("distribution"))?,
            version: c.k8s_version.clone().ok_or_else(|| missing("k8sVersion"))?,
        },
        storage: StorageSpec {
            engine,
            version: storage_version,
        },
        addons: c
            .enabled_addons()
            .map(|a| AddonSpec {
                id: a.id.clone(),
                version: a.version.clone(),
                values: a.values.clone(),
            })
            .collect(),
        security_options: c.security_options.clone(),
        manager,
    };

    debug!(
        name = %config.name,
        provider = %config.provider,
        addons = config.addons.len(),
        "assembled cluster configuration"
    );
    Ok(config)
}
