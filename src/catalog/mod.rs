//! Catalog tables for the provisioning wizard
//!
//! Pure lookups over the static data in [`tables`]. Every function is
//! deterministic and side-effect free: identical inputs always return the same
//! `&'static` entries, so results can be compared with plain equality.

mod tables;
pub mod types;

pub use types::*;

/// First entry flagged default, else the first entry
fn flagged_or_first<T>(items: &'static [T], is_default: impl Fn(&T) -> bool) -> Option<&'static T> {
    items.iter().find(|item| is_default(item)).or(items.first())
}

// ── Providers ──────────────────────────────────────────────────────────────

pub fn providers() -> &'static [Provider] {
    tables::PROVIDERS
}

pub fn provider(id: ProviderId) -> &'static Provider {
    tables::PROVIDERS
        .iter()
        .find(|p| p.id == id)
        .unwrap_or_else(|| unreachable!("every ProviderId has a catalog entry"))
}

// ── Regions ────────────────────────────────────────────────────────────────

/// Regions offered by a provider; always empty for HCI providers
pub fn regions_for(provider: ProviderId) -> &'static [Region] {
    tables::regions(provider)
}

pub fn default_region_for(provider: ProviderId) -> Option<&'static Region> {
    flagged_or_first(regions_for(provider), |r| r.is_default)
}

// ── Operating systems ──────────────────────────────────────────────────────

pub fn operating_systems_for(provider: ProviderId) -> Vec<&'static OperatingSystem> {
    tables::OPERATING_SYSTEMS
        .iter()
        .filter(|os| os.supports(provider))
        .collect()
}

pub fn operating_system(id: &str) -> Option<&'static OperatingSystem> {
    tables::OPERATING_SYSTEMS.iter().find(|os| os.id == id)
}

/// Amazon Linux on AWS, SLES everywhere else
///
/// Falls back to the first supported OS should SLES ever be dropped for a provider.
pub fn default_os_for(provider: ProviderId) -> Option<&'static OperatingSystem> {
    let supported = operating_systems_for(provider);
    let preferred = if provider == ProviderId::Aws {
        "amazon-linux"
    } else {
        "sles"
    };
    supported
        .iter()
        .find(|os| os.id == preferred)
        .or(supported.first())
        .copied()
}

pub fn versions_for(os: &'static OperatingSystem) -> &'static [Version] {
    os.versions
}

pub fn default_version_for(os: &'static OperatingSystem) -> Option<&'static Version> {
    flagged_or_first(os.versions, |v| v.is_default)
}

// ── Kubernetes ─────────────────────────────────────────────────────────────

pub fn distributions_for(provider: ProviderId) -> &'static [Distribution] {
    tables::distributions(provider)
}

pub fn default_distribution_for(provider: ProviderId) -> Option<&'static Distribution> {
    flagged_or_first(distributions_for(provider), |d| d.is_default)
}

pub fn is_distribution_offered(provider: ProviderId, distribution: DistributionId) -> bool {
    distributions_for(provider)
        .iter()
        .any(|d| d.id == distribution)
}

/// Kubernetes versions for a distribution on a provider
///
/// Empty when the distribution is not offered there (e.g. `EKS` on `azure`).
pub fn k8s_versions_for(provider: ProviderId, distribution: DistributionId) -> &'static [Version] {
    if is_distribution_offered(provider, distribution) {
        tables::kubernetes_versions(distribution)
    } else {
        &[]
    }
}

pub fn default_k8s_version_for(
    provider: ProviderId,
    distribution: DistributionId,
) -> Option<&'static Version> {
    flagged_or_first(k8s_versions_for(provider, distribution), |v| v.is_default)
}

// ── Storage ────────────────────────────────────────────────────────────────

pub fn storage_engine(id: StorageEngineId) -> &'static StorageEngine {
    tables::STORAGE_ENGINES
        .iter()
        .find(|e| e.id == id)
        .unwrap_or_else(|| unreachable!("every StorageEngineId has a catalog entry"))
}

pub fn storage_engines_for(
    provider: ProviderId,
    distribution: DistributionId,
) -> Vec<&'static StorageEngine> {
    tables::STORAGE_ENGINES
        .iter()
        .filter(|e| e.id.is_available(provider, distribution))
        .collect()
}

/// `CloudProvider` on a managed pairing (e.g. `aws` + `EKS`), `Longhorn` otherwise
pub fn default_storage_engine_for(
    provider: ProviderId,
    distribution: DistributionId,
) -> &'static StorageEngine {
    if distribution.is_managed_by(provider) {
        storage_engine(StorageEngineId::CloudProvider)
    } else {
        storage_engine(StorageEngineId::Longhorn)
    }
}

pub fn storage_versions_for(engine: StorageEngineId) -> &'static [Version] {
    storage_engine(engine).versions
}

pub fn default_storage_version_for(engine: StorageEngineId) -> Option<&'static Version> {
    flagged_or_first(storage_versions_for(engine), |v| v.is_default)
}

// ── Add-ons ────────────────────────────────────────────────────────────────

pub fn addons() -> &'static [Addon] {
    tables::ADDONS
}

pub fn addon(id: &str) -> Option<&'static Addon> {
    tables::ADDONS.iter().find(|a| a.id == id)
}

pub fn default_addon_version(addon: &'static Addon) -> Option<&'static Version> {
    flagged_or_first(addon.versions, |v| v.is_default)
}

// ── Sizing ─────────────────────────────────────────────────────────────────

/// Provider VM sizes, or the generic small/medium/large/x-large set
pub fn vm_sizes_for(provider: ProviderId) -> &'static [VmSize] {
    tables::vm_sizes(provider).unwrap_or(tables::GENERIC_SIZES)
}

pub fn default_vm_size_for(provider: ProviderId) -> Option<&'static VmSize> {
    flagged_or_first(vm_sizes_for(provider), |s| s.is_default)
}

/// One control-plane node and two workers, sized for the provider class
pub fn default_node_pools(provider: ProviderId) -> Vec<NodePool> {
    let size_for = |role: NodeRole| {
        if provider.is_hci() {
            NodeSize::CustomSize(match role {
                NodeRole::ControlPlane => tables::HCI_CONTROL_PLANE_SIZE,
                NodeRole::Worker => tables::HCI_WORKER_SIZE,
            })
        } else {
            let id = default_vm_size_for(provider).map(|s| s.id).unwrap_or_default();
            NodeSize::VmSize(id.to_string())
        }
    };

    vec![
        NodePool {
            role: NodeRole::ControlPlane,
            count: 1,
            size: size_for(NodeRole::ControlPlane),
        },
        NodePool {
            role: NodeRole::Worker,
            count: 2,
            size: size_for(NodeRole::Worker),
        },
    ]
}

// ── Security hardening ─────────────────────────────────────────────────────

pub fn security_frameworks() -> &'static [SecurityFramework] {
    tables::SECURITY_FRAMEWORKS
}

pub fn security_framework(id: &str) -> Option<&'static SecurityFramework> {
    tables::SECURITY_FRAMEWORKS.iter().find(|f| f.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_empty_iff_hci() {
        for p in ProviderId::ALL {
            assert_eq!(regions_for(p).is_empty(), p.is_hci(), "provider {p}");
        }
    }

    #[test]
    fn test_cloud_regions_have_exactly_one_default() {
        for p in ProviderId::ALL.into_iter().filter(|p| !p.is_hci()) {
            let defaults = regions_for(p).iter().filter(|r| r.is_default).count();
            assert_eq!(defaults, 1, "provider {p}");
            assert!(default_region_for(p).is_some());
        }
        assert!(default_region_for(ProviderId::Proxmox).is_none());
    }

    #[test]
    fn test_amazon_linux_only_on_aws() {
        for p in ProviderId::ALL {
            let has_al = operating_systems_for(p)
                .iter()
                .any(|os| os.id == "amazon-linux");
            assert_eq!(has_al, p == ProviderId::Aws, "provider {p}");
        }
    }

    #[test]
    fn test_every_exposed_os_supports_provider() {
        for p in ProviderId::ALL {
            for os in operating_systems_for(p) {
                assert!(os.providers.contains(&p));
            }
        }
    }

    #[test]
    fn test_default_os() {
        assert_eq!(default_os_for(ProviderId::Aws).unwrap().id, "amazon-linux");
        assert_eq!(default_os_for(ProviderId::Azure).unwrap().id, "sles");
        assert_eq!(default_os_for(ProviderId::Harvester).unwrap().id, "sles");
    }

    #[test]
    fn test_os_default_version_flagged_or_first() {
        for os in operating_systems_for(ProviderId::Aws) {
            let flagged: Vec<_> = os.versions.iter().filter(|v| v.is_default).collect();
            let chosen = default_version_for(os).unwrap();
            match flagged.as_slice() {
                [only] => assert_eq!(chosen, *only),
                [] => assert_eq!(chosen, &os.versions[0]),
                _ => panic!("{} has more than one default version", os.id),
            }
        }
        let flatcar = operating_system("flatcar").unwrap();
        assert_eq!(default_version_for(flatcar).unwrap().id, "3975.2.0");
    }

    #[test]
    fn test_managed_distributions_only_on_matching_provider() {
        for p in ProviderId::ALL {
            for d in distributions_for(p) {
                if let Some(owner) = d.id.managed_provider() {
                    assert_eq!(owner, p);
                }
            }
            for d in [
                DistributionId::Rke2,
                DistributionId::K3s,
                DistributionId::Vanilla,
            ] {
                assert!(is_distribution_offered(p, d), "{d} missing on {p}");
            }
        }
    }

    #[test]
    fn test_default_distribution() {
        assert_eq!(
            default_distribution_for(ProviderId::Aws).unwrap().id,
            DistributionId::Eks
        );
        assert_eq!(
            default_distribution_for(ProviderId::Oracle).unwrap().id,
            DistributionId::Oke
        );
        assert_eq!(
            default_distribution_for(ProviderId::Hetzner).unwrap().id,
            DistributionId::Rke2
        );
        assert_eq!(
            default_distribution_for(ProviderId::Harvester).unwrap().id,
            DistributionId::Rke2
        );
    }

    #[test]
    fn test_k8s_versions_empty_for_foreign_managed_distribution() {
        assert!(k8s_versions_for(ProviderId::Azure, DistributionId::Eks).is_empty());
        assert!(default_k8s_version_for(ProviderId::Azure, DistributionId::Eks).is_none());
        assert_eq!(
            default_k8s_version_for(ProviderId::Aws, DistributionId::Eks)
                .unwrap()
                .id,
            "1.31"
        );
        // Vanilla has no flagged default; the newest release wins.
        assert_eq!(
            default_k8s_version_for(ProviderId::Gcp, DistributionId::Vanilla)
                .unwrap()
                .id,
            "v1.31.2"
        );
    }

    #[test]
    fn test_default_storage_engine_follows_managed_pairing() {
        for p in ProviderId::ALL {
            for d in DistributionId::ALL {
                let expected = if d.is_managed_by(p) {
                    StorageEngineId::CloudProvider
                } else {
                    StorageEngineId::Longhorn
                };
                assert_eq!(default_storage_engine_for(p, d).id, expected, "{p}+{d}");
            }
        }
    }

    #[test]
    fn test_cloud_provider_storage_only_on_managed_pairing() {
        let engines = storage_engines_for(ProviderId::Aws, DistributionId::Eks);
        assert_eq!(engines.len(), 5);
        assert_eq!(engines[0].id, StorageEngineId::CloudProvider);

        let engines = storage_engines_for(ProviderId::Aws, DistributionId::Rke2);
        assert_eq!(engines.len(), 4);
        assert!(engines
            .iter()
            .all(|e| e.id != StorageEngineId::CloudProvider));
    }

    #[test]
    fn test_cloud_provider_storage_is_unversioned() {
        assert!(storage_versions_for(StorageEngineId::CloudProvider).is_empty());
        assert!(default_storage_version_for(StorageEngineId::CloudProvider).is_none());
        assert_eq!(
            default_storage_version_for(StorageEngineId::Longhorn)
                .unwrap()
                .id,
            "1.7.2"
        );
    }

    #[test]
    fn test_hci_sizes_fall_back_to_generic_tiers() {
        let ids: Vec<_> = vm_sizes_for(ProviderId::Vmware)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["small", "medium", "large", "x-large"]);
        assert_ne!(vm_sizes_for(ProviderId::Aws)[0].id, "small");
    }

    #[test]
    fn test_default_node_pools_by_class() {
        let pools = default_node_pools(ProviderId::Aws);
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0].role, NodeRole::ControlPlane);
        assert_eq!(pools[0].count, 1);
        assert_eq!(pools[1].role, NodeRole::Worker);
        assert_eq!(pools[1].count, 2);
        assert_eq!(pools[0].size.vm_size(), Some("t3.large"));

        let pools = default_node_pools(ProviderId::Harvester);
        assert!(pools.iter().all(|p| p.size.custom_size().is_some()));
        assert!(pools.iter().all(|p| p.size.vm_size().is_none()));
    }

    #[test]
    fn test_lookups_are_stable() {
        for p in ProviderId::ALL {
            assert_eq!(operating_systems_for(p), operating_systems_for(p));
            assert_eq!(default_node_pools(p), default_node_pools(p));
        }
    }

    #[test]
    fn test_addon_defaults() {
        for a in addons() {
            let defaults = a.versions.iter().filter(|v| v.is_default).count();
            assert!(defaults <= 1);
            assert!(default_addon_version(a).is_some());
        }
        assert!(addon("monitoring").is_some());
        assert!(addon("unknown").is_none());
    }

    #[test]
    fn test_provider_id_round_trips_through_str() {
        for p in ProviderId::ALL {
            assert_eq!(p.as_str().parse::<ProviderId>().unwrap(), p);
            assert_eq!(provider(p).id, p);
        }
        assert!("openstack".parse::<ProviderId>().is_err());
    }
}
