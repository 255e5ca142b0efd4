//! Catalog entity types
//!
//! These types describe everything the provisioning wizard can offer: providers,
//! regions, operating systems, Kubernetes distributions, storage engines, add-ons,
//! VM sizes and security hardening frameworks. Catalog entries are static data and
//! are handed out as `&'static` references; the node pool types at the bottom of
//! this module are owned values because the wizard edits them.
//!
//! # Type Hierarchy
//!
//! - [`ProviderId`] / [`Provider`] - infrastructure backend and its [`ProviderClass`]
//! - [`DistributionId`] / [`Distribution`] - Kubernetes flavour offered on a provider
//! - [`StorageEngineId`] / [`StorageEngine`] - persistent storage backend
//! - [`Version`] - shared version entry for OS, Kubernetes, storage and add-ons
//! - [`NodePool`] - role, node count and [`NodeSize`]

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Supported infrastructure backends
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Aws,
    Azure,
    Gcp,
    DigitalOcean,
    Oracle,
    Hetzner,
    Harvester,
    Vmware,
    Proxmox,
}

impl ProviderId {
    pub const ALL: [ProviderId; 9] = [
        ProviderId::Aws,
        ProviderId::Azure,
        ProviderId::Gcp,
        ProviderId::DigitalOcean,
        ProviderId::Oracle,
        ProviderId::Hetzner,
        ProviderId::Harvester,
        ProviderId::Vmware,
        ProviderId::Proxmox,
    ];

    /// Stable wire identifier, e.g. `"digitalocean"`
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Aws => "aws",
            ProviderId::Azure => "azure",
            ProviderId::Gcp => "gcp",
            ProviderId::DigitalOcean => "digitalocean",
            ProviderId::Oracle => "oracle",
            ProviderId::Hetzner => "hetzner",
            ProviderId::Harvester => "harvester",
            ProviderId::Vmware => "vmware",
            ProviderId::Proxmox => "proxmox",
        }
    }

    pub fn class(&self) -> ProviderClass {
        match self {
            ProviderId::Harvester | ProviderId::Vmware | ProviderId::Proxmox => ProviderClass::Hci,
            _ => ProviderClass::Cloud,
        }
    }

    pub fn is_hci(&self) -> bool {
        self.class() == ProviderClass::Hci
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::unknown_option("provider", s))
    }
}

/// Provider family
///
/// HCI (hyper-converged infrastructure) providers run on customer hardware and
/// have no region concept; cloud providers always expose regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProviderClass {
    Cloud,
    Hci,
}

/// Infrastructure provider catalog entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: &'static str,
    pub class: ProviderClass,
}

/// Cloud region
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: &'static str,
    pub name: &'static str,
    pub is_default: bool,
}

/// Version entry shared by operating systems, Kubernetes distributions,
/// storage engines and add-ons
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: &'static str,
    pub is_default: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
}

impl Version {
    pub const fn new(id: &'static str) -> Self {
        Self {
            id,
            is_default: false,
            deprecated: false,
        }
    }

    pub const fn default_version(id: &'static str) -> Self {
        Self {
            id,
            is_default: true,
            deprecated: false,
        }
    }

    pub const fn deprecated(id: &'static str) -> Self {
        Self {
            id,
            is_default: false,
            deprecated: true,
        }
    }
}

/// Node operating system
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OperatingSystem {
    pub id: &'static str,
    pub name: &'static str,
    pub versions: &'static [Version],
    pub providers: &'static [ProviderId],
}

impl OperatingSystem {
    pub fn supports(&self, provider: ProviderId) -> bool {
        self.providers.contains(&provider)
    }
}

/// Kubernetes distribution identifiers
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum DistributionId {
    #[serde(rename = "EKS")]
    Eks,
    #[serde(rename = "AKS")]
    Aks,
    #[serde(rename = "GKE")]
    Gke,
    #[serde(rename = "DOK8s")]
    DoK8s,
    #[serde(rename = "OKE")]
    Oke,
    #[serde(rename = "RKE2")]
    Rke2,
    #[serde(rename = "K3s")]
    K3s,
    Vanilla,
}

impl DistributionId {
    pub const ALL: [DistributionId; 8] = [
        DistributionId::Eks,
        DistributionId::Aks,
        DistributionId::Gke,
        DistributionId::DoK8s,
        DistributionId::Oke,
        DistributionId::Rke2,
        DistributionId::K3s,
        DistributionId::Vanilla,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionId::Eks => "EKS",
            DistributionId::Aks => "AKS",
            DistributionId::Gke => "GKE",
            DistributionId::DoK8s => "DOK8s",
            DistributionId::Oke => "OKE",
            DistributionId::Rke2 => "RKE2",
            DistributionId::K3s => "K3s",
            DistributionId::Vanilla => "Vanilla",
        }
    }

    /// The provider whose managed offering this is, if any
    pub fn managed_provider(&self) -> Option<ProviderId> {
        match self {
            DistributionId::Eks => Some(ProviderId::Aws),
            DistributionId::Aks => Some(ProviderId::Azure),
            DistributionId::Gke => Some(ProviderId::Gcp),
            DistributionId::DoK8s => Some(ProviderId::DigitalOcean),
            DistributionId::Oke => Some(ProviderId::Oracle),
            DistributionId::Rke2 | DistributionId::K3s | DistributionId::Vanilla => None,
        }
    }

    pub fn is_managed(&self) -> bool {
        self.managed_provider().is_some()
    }

    /// True when this is the managed offering of exactly `provider`
    pub fn is_managed_by(&self, provider: ProviderId) -> bool {
        self.managed_provider() == Some(provider)
    }
}

impl fmt::Display for DistributionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DistributionId::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| Error::unknown_option("distribution", s))
    }
}

/// Kubernetes distribution as offered on one provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub id: DistributionId,
    pub name: &'static str,
    pub is_default: bool,
}

/// Storage engine identifiers
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum StorageEngineId {
    CloudProvider,
    Longhorn,
    Portworx,
    #[serde(rename = "OpenEBS")]
    OpenEbs,
    Rook,
}

impl StorageEngineId {
    pub const ALL: [StorageEngineId; 5] = [
        StorageEngineId::CloudProvider,
        StorageEngineId::Longhorn,
        StorageEngineId::Portworx,
        StorageEngineId::OpenEbs,
        StorageEngineId::Rook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageEngineId::CloudProvider => "CloudProvider",
            StorageEngineId::Longhorn => "Longhorn",
            StorageEngineId::Portworx => "Portworx",
            StorageEngineId::OpenEbs => "OpenEBS",
            StorageEngineId::Rook => "Rook",
        }
    }

    /// Availability over (provider, distribution)
    ///
    /// Cloud provider storage only exists on the provider's own managed
    /// distribution; every other engine is installable anywhere.
    pub fn is_available(&self, provider: ProviderId, distribution: DistributionId) -> bool {
        match self {
            StorageEngineId::CloudProvider => distribution.is_managed_by(provider),
            _ => true,
        }
    }

    /// Cloud provider storage is versioned by the provider, not by us
    pub fn is_versioned(&self) -> bool {
        *self != StorageEngineId::CloudProvider
    }
}

impl fmt::Display for StorageEngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageEngineId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageEngineId::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| Error::unknown_option("storage engine", s))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StorageEngine {
    pub id: StorageEngineId,
    pub name: &'static str,
    pub versions: &'static [Version],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddonCategory {
    Monitoring,
    Logging,
    Networking,
    Security,
    Gitops,
    Backup,
    ServiceMesh,
}

/// Cluster add-on; independent of provider and distribution
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Addon {
    pub id: &'static str,
    pub name: &'static str,
    pub category: AddonCategory,
    pub versions: &'static [Version],
}

/// Catalog VM instance type
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VmSize {
    pub id: &'static str,
    pub name: &'static str,
    pub cpu: u32,
    pub memory_gb: u32,
    pub is_default: bool,
}

/// Security hardening framework applied at provisioning time
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SecurityFramework {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Role of a node pool in the cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NodeRole {
    ControlPlane,
    Worker,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::ControlPlane => "control-plane",
            NodeRole::Worker => "worker",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit machine shape for HCI providers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomSize {
    /// vCPU count
    pub cpu: u32,
    /// Memory in GiB
    pub memory: u32,
    /// Root disk in GiB
    pub storage: u32,
}

impl CustomSize {
    pub fn is_valid(&self) -> bool {
        self.cpu > 0 && self.memory > 0 && self.storage > 0
    }
}

/// Machine size of a pool: a catalog VM size (cloud) or a custom shape (HCI)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum NodeSize {
    VmSize(String),
    CustomSize(CustomSize),
}

impl NodeSize {
    pub fn vm_size(&self) -> Option<&str> {
        match self {
            NodeSize::VmSize(id) => Some(id),
            NodeSize::CustomSize(_) => None,
        }
    }

    pub fn custom_size(&self) -> Option<&CustomSize> {
        match self {
            NodeSize::VmSize(_) => None,
            NodeSize::CustomSize(size) => Some(size),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodePool {
    pub role: NodeRole,
    pub count: u32,
    #[serde(flatten)]
    pub size: NodeSize,
}
