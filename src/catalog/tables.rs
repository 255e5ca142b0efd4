//! Static catalog data
//!
//! Single source of truth for every provider, region, OS, distribution, storage
//! engine, add-on and size the wizard can offer. Lookups live in the parent module.

use super::types::{
    Addon, AddonCategory, CustomSize, Distribution, DistributionId, OperatingSystem, Provider,
    ProviderClass, ProviderId, Region, SecurityFramework, StorageEngine, StorageEngineId, Version,
    VmSize,
};

use super::types::ProviderId::{
    Aws, Azure, DigitalOcean, Gcp, Harvester, Hetzner, Oracle, Proxmox, Vmware,
};

pub(crate) static PROVIDERS: &[Provider] = &[
    Provider {
        id: Aws,
        name: "Amazon Web Services",
        class: ProviderClass::Cloud,
    },
    Provider {
        id: Azure,
        name: "Microsoft Azure",
        class: ProviderClass::Cloud,
    },
    Provider {
        id: Gcp,
        name: "Google Cloud Platform",
        class: ProviderClass::Cloud,
    },
    Provider {
        id: DigitalOcean,
        name: "DigitalOcean",
        class: ProviderClass::Cloud,
    },
    Provider {
        id: Oracle,
        name: "Oracle Cloud Infrastructure",
        class: ProviderClass::Cloud,
    },
    Provider {
        id: Hetzner,
        name: "Hetzner Cloud",
        class: ProviderClass::Cloud,
    },
    Provider {
        id: Harvester,
        name: "Harvester HCI",
        class: ProviderClass::Hci,
    },
    Provider {
        id: Vmware,
        name: "VMware vSphere",
        class: ProviderClass::Hci,
    },
    Provider {
        id: Proxmox,
        name: "Proxmox VE",
        class: ProviderClass::Hci,
    },
];

// ── Regions ────────────────────────────────────────────────────────────────

const fn region(id: &'static str, name: &'static str) -> Region {
    Region {
        id,
        name,
        is_default: false,
    }
}

const fn default_region(id: &'static str, name: &'static str) -> Region {
    Region {
        id,
        name,
        is_default: true,
    }
}

static AWS_REGIONS: &[Region] = &[
    default_region("us-east-1", "US East (N. Virginia)"),
    region("us-east-2", "US East (Ohio)"),
    region("us-west-2", "US West (Oregon)"),
    region("eu-west-1", "Europe (Ireland)"),
    region("eu-central-1", "Europe (Frankfurt)"),
    region("ap-southeast-1", "Asia Pacific (Singapore)"),
    region("ap-northeast-1", "Asia Pacific (Tokyo)"),
];

static AZURE_REGIONS: &[Region] = &[
    default_region("eastus", "East US"),
    region("eastus2", "East US 2"),
    region("westus2", "West US 2"),
    region("westeurope", "West Europe"),
    region("northeurope", "North Europe"),
    region("southeastasia", "Southeast Asia"),
];

static GCP_REGIONS: &[Region] = &[
    default_region("us-central1", "Iowa (us-central1)"),
    region("us-east1", "South Carolina (us-east1)"),
    region("us-west1", "Oregon (us-west1)"),
    region("europe-west1", "Belgium (europe-west1)"),
    region("europe-west3", "Frankfurt (europe-west3)"),
    region("asia-southeast1", "Singapore (asia-southeast1)"),
];

static DIGITALOCEAN_REGIONS: &[Region] = &[
    default_region("nyc1", "New York 1"),
    region("nyc3", "New York 3"),
    region("sfo3", "San Francisco 3"),
    region("ams3", "Amsterdam 3"),
    region("fra1", "Frankfurt 1"),
    region("sgp1", "Singapore 1"),
];

static ORACLE_REGIONS: &[Region] = &[
    default_region("us-ashburn-1", "US East (Ashburn)"),
    region("us-phoenix-1", "US West (Phoenix)"),
    region("eu-frankfurt-1", "Germany Central (Frankfurt)"),
    region("uk-london-1", "UK South (London)"),
    region("ap-tokyo-1", "Japan East (Tokyo)"),
];

static HETZNER_REGIONS: &[Region] = &[
    default_region("fsn1", "Falkenstein"),
    region("nbg1", "Nuremberg"),
    region("hel1", "Helsinki"),
    region("ash", "Ashburn, VA"),
    region("hil", "Hillsboro, OR"),
];

pub(crate) fn regions(provider: ProviderId) -> &'static [Region] {
    match provider {
        Aws => AWS_REGIONS,
        Azure => AZURE_REGIONS,
        Gcp => GCP_REGIONS,
        DigitalOcean => DIGITALOCEAN_REGIONS,
        Oracle => ORACLE_REGIONS,
        Hetzner => HETZNER_REGIONS,
        Harvester | Vmware | Proxmox => &[],
    }
}

// ── Operating systems ──────────────────────────────────────────────────────

const ALL_PROVIDERS: &[ProviderId] = &ProviderId::ALL;

pub(crate) static OPERATING_SYSTEMS: &[OperatingSystem] = &[
    OperatingSystem {
        id: "amazon-linux",
        name: "Amazon Linux",
        versions: &[
            Version::default_version("2023"),
            Version::deprecated("2"),
        ],
        providers: &[Aws],
    },
    OperatingSystem {
        id: "ubuntu",
        name: "Ubuntu",
        versions: &[
            Version::default_version("24.04"),
            Version::new("22.04"),
            Version::deprecated("20.04"),
        ],
        providers: ALL_PROVIDERS,
    },
    OperatingSystem {
        id: "sles",
        name: "SUSE Linux Enterprise Server",
        versions: &[
            Version::default_version("15 SP6"),
            Version::new("15 SP5"),
        ],
        providers: ALL_PROVIDERS,
    },
    OperatingSystem {
        id: "rhel",
        name: "Red Hat Enterprise Linux",
        versions: &[Version::default_version("9.4"), Version::new("8.10")],
        providers: ALL_PROVIDERS,
    },
    OperatingSystem {
        id: "rocky",
        name: "Rocky Linux",
        versions: &[Version::default_version("9.4"), Version::new("8.10")],
        providers: ALL_PROVIDERS,
    },
    OperatingSystem {
        id: "flatcar",
        name: "Flatcar Container Linux",
        // No flagged default: the newest release is used.
        versions: &[Version::new("3975.2.0"), Version::new("3815.2.5")],
        providers: ALL_PROVIDERS,
    },
];

// ── Kubernetes distributions ───────────────────────────────────────────────

const fn distribution(id: DistributionId, name: &'static str, is_default: bool) -> Distribution {
    Distribution {
        id,
        name,
        is_default,
    }
}

const RKE2: Distribution = distribution(DistributionId::Rke2, "RKE2", false);
const K3S: Distribution = distribution(DistributionId::K3s, "K3s", false);
const VANILLA: Distribution = distribution(DistributionId::Vanilla, "Vanilla Kubernetes", false);

static AWS_DISTRIBUTIONS: &[Distribution] = &[
    distribution(DistributionId::Eks, "Amazon EKS", true),
    RKE2,
    K3S,
    VANILLA,
];

static AZURE_DISTRIBUTIONS: &[Distribution] = &[
    distribution(DistributionId::Aks, "Azure AKS", true),
    RKE2,
    K3S,
    VANILLA,
];

static GCP_DISTRIBUTIONS: &[Distribution] = &[
    distribution(DistributionId::Gke, "Google GKE", true),
    RKE2,
    K3S,
    VANILLA,
];

static DIGITALOCEAN_DISTRIBUTIONS: &[Distribution] = &[
    distribution(DistributionId::DoK8s, "DigitalOcean Kubernetes", true),
    RKE2,
    K3S,
    VANILLA,
];

static ORACLE_DISTRIBUTIONS: &[Distribution] = &[
    distribution(DistributionId::Oke, "Oracle OKE", true),
    RKE2,
    K3S,
    VANILLA,
];

static SELF_MANAGED_DISTRIBUTIONS: &[Distribution] = &[
    distribution(DistributionId::Rke2, "RKE2", true),
    K3S,
    VANILLA,
];

pub(crate) fn distributions(provider: ProviderId) -> &'static [Distribution] {
    match provider {
        Aws => AWS_DISTRIBUTIONS,
        Azure => AZURE_DISTRIBUTIONS,
        Gcp => GCP_DISTRIBUTIONS,
        DigitalOcean => DIGITALOCEAN_DISTRIBUTIONS,
        Oracle => ORACLE_DISTRIBUTIONS,
        Hetzner | Harvester | Vmware | Proxmox => SELF_MANAGED_DISTRIBUTIONS,
    }
}

static EKS_VERSIONS: &[Version] = &[
    Version::default_version("1.31"),
    Version::new("1.30"),
    Version::new("1.29"),
    Version::deprecated("1.28"),
];

static AKS_VERSIONS: &[Version] = &[
    Version::default_version("1.31.2"),
    Version::new("1.30.6"),
    Version::new("1.29.10"),
    Version::deprecated("1.28.15"),
];

static GKE_VERSIONS: &[Version] = &[
    Version::default_version("1.31.1-gke.1678000"),
    Version::new("1.30.5-gke.1443001"),
    Version::deprecated("1.29.9-gke.1496000"),
];

static DOK8S_VERSIONS: &[Version] = &[
    Version::default_version("1.31.1-do.3"),
    Version::new("1.30.5-do.4"),
    Version::deprecated("1.29.9-do.4"),
];

static OKE_VERSIONS: &[Version] = &[
    Version::default_version("v1.31.1"),
    Version::new("v1.30.1"),
    Version::deprecated("v1.29.1"),
];

static RKE2_VERSIONS: &[Version] = &[
    Version::default_version("v1.31.2+rke2r1"),
    Version::new("v1.30.6+rke2r1"),
    Version::new("v1.29.10+rke2r1"),
    Version::deprecated("v1.28.15+rke2r1"),
];

static K3S_VERSIONS: &[Version] = &[
    Version::default_version("v1.31.2+k3s1"),
    Version::new("v1.30.6+k3s1"),
    Version::deprecated("v1.29.10+k3s1"),
];

// No flagged default: the first (newest) entry is used.
static VANILLA_VERSIONS: &[Version] = &[
    Version::new("v1.31.2"),
    Version::new("v1.30.6"),
    Version::new("v1.29.10"),
];

pub(crate) fn kubernetes_versions(distribution: DistributionId) -> &'static [Version] {
    match distribution {
        DistributionId::Eks => EKS_VERSIONS,
        DistributionId::Aks => AKS_VERSIONS,
        DistributionId::Gke => GKE_VERSIONS,
        DistributionId::DoK8s => DOK8S_VERSIONS,
        DistributionId::Oke => OKE_VERSIONS,
        DistributionId::Rke2 => RKE2_VERSIONS,
        DistributionId::K3s => K3S_VERSIONS,
        DistributionId::Vanilla => VANILLA_VERSIONS,
    }
}

// ── Storage engines ────────────────────────────────────────────────────────

pub(crate) static STORAGE_ENGINES: &[StorageEngine] = &[
    StorageEngine {
        id: StorageEngineId::CloudProvider,
        name: "Cloud Provider Storage",
        versions: &[],
    },
    StorageEngine {
        id: StorageEngineId::Longhorn,
        name: "Longhorn",
        versions: &[
            Version::default_version("1.7.2"),
            Version::new("1.6.3"),
            Version::deprecated("1.5.5"),
        ],
    },
    StorageEngine {
        id: StorageEngineId::Portworx,
        name: "Portworx",
        versions: &[Version::default_version("3.2.0"), Version::new("3.1.6")],
    },
    StorageEngine {
        id: StorageEngineId::OpenEbs,
        name: "OpenEBS",
        versions: &[Version::default_version("4.1.1"), Version::new("3.10.0")],
    },
    StorageEngine {
        id: StorageEngineId::Rook,
        name: "Rook Ceph",
        versions: &[Version::default_version("1.15.5"), Version::new("1.14.12")],
    },
];

// ── Add-ons ────────────────────────────────────────────────────────────────

pub(crate) static ADDONS: &[Addon] = &[
    Addon {
        id: "monitoring",
        name: "Prometheus & Grafana",
        category: AddonCategory::Monitoring,
        versions: &[Version::default_version("65.1.1"), Version::new("61.9.0")],
    },
    Addon {
        id: "logging",
        name: "Loki Stack",
        category: AddonCategory::Logging,
        versions: &[Version::default_version("6.18.0"), Version::new("5.47.2")],
    },
    Addon {
        id: "ingress-nginx",
        name: "NGINX Ingress Controller",
        category: AddonCategory::Networking,
        versions: &[Version::default_version("4.11.3"), Version::new("4.10.5")],
    },
    Addon {
        id: "cert-manager",
        name: "cert-manager",
        category: AddonCategory::Security,
        versions: &[Version::default_version("1.16.1"), Version::new("1.15.3")],
    },
    Addon {
        id: "argocd",
        name: "Argo CD",
        category: AddonCategory::Gitops,
        versions: &[Version::default_version("7.6.12"), Version::new("7.4.7")],
    },
    Addon {
        id: "velero",
        name: "Velero",
        category: AddonCategory::Backup,
        versions: &[Version::default_version("8.0.0"), Version::new("7.2.2")],
    },
    Addon {
        id: "istio",
        name: "Istio",
        category: AddonCategory::ServiceMesh,
        versions: &[Version::default_version("1.23.3"), Version::new("1.22.6")],
    },
];

// ── VM sizes ───────────────────────────────────────────────────────────────

const fn size(id: &'static str, name: &'static str, cpu: u32, memory_gb: u32) -> VmSize {
    VmSize {
        id,
        name,
        cpu,
        memory_gb,
        is_default: false,
    }
}

const fn default_size(id: &'static str, name: &'static str, cpu: u32, memory_gb: u32) -> VmSize {
    VmSize {
        id,
        name,
        cpu,
        memory_gb,
        is_default: true,
    }
}

static AWS_SIZES: &[VmSize] = &[
    size("t3.medium", "t3.medium (2 vCPU, 4 GiB)", 2, 4),
    default_size("t3.large", "t3.large (2 vCPU, 8 GiB)", 2, 8),
    size("m5.xlarge", "m5.xlarge (4 vCPU, 16 GiB)", 4, 16),
    size("m5.2xlarge", "m5.2xlarge (8 vCPU, 32 GiB)", 8, 32),
];

static AZURE_SIZES: &[VmSize] = &[
    size("Standard_B2s", "B2s (2 vCPU, 4 GiB)", 2, 4),
    default_size("Standard_D2s_v5", "D2s v5 (2 vCPU, 8 GiB)", 2, 8),
    size("Standard_D4s_v5", "D4s v5 (4 vCPU, 16 GiB)", 4, 16),
    size("Standard_D8s_v5", "D8s v5 (8 vCPU, 32 GiB)", 8, 32),
];

static GCP_SIZES: &[VmSize] = &[
    size("e2-medium", "e2-medium (2 vCPU, 4 GB)", 2, 4),
    default_size("e2-standard-2", "e2-standard-2 (2 vCPU, 8 GB)", 2, 8),
    size("e2-standard-4", "e2-standard-4 (4 vCPU, 16 GB)", 4, 16),
    size("e2-standard-8", "e2-standard-8 (8 vCPU, 32 GB)", 8, 32),
];

static DIGITALOCEAN_SIZES: &[VmSize] = &[
    size("s-2vcpu-4gb", "Basic (2 vCPU, 4 GB)", 2, 4),
    default_size("s-4vcpu-8gb", "Basic (4 vCPU, 8 GB)", 4, 8),
    size("g-4vcpu-16gb", "General Purpose (4 vCPU, 16 GB)", 4, 16),
    size("g-8vcpu-32gb", "General Purpose (8 vCPU, 32 GB)", 8, 32),
];

static ORACLE_SIZES: &[VmSize] = &[
    size("VM.Standard.E4.Flex.1", "E4 Flex (1 OCPU, 8 GB)", 2, 8),
    default_size("VM.Standard.E4.Flex.2", "E4 Flex (2 OCPU, 16 GB)", 4, 16),
    size("VM.Standard.E4.Flex.4", "E4 Flex (4 OCPU, 32 GB)", 8, 32),
];

static HETZNER_SIZES: &[VmSize] = &[
    size("cx22", "CX22 (2 vCPU, 4 GB)", 2, 4),
    default_size("cx32", "CX32 (4 vCPU, 8 GB)", 4, 8),
    size("cx42", "CX42 (8 vCPU, 16 GB)", 8, 16),
    size("cx52", "CX52 (16 vCPU, 32 GB)", 16, 32),
];

/// Fallback sizes for providers without a dedicated catalog
pub(crate) static GENERIC_SIZES: &[VmSize] = &[
    size("small", "Small (2 vCPU, 4 GB)", 2, 4),
    default_size("medium", "Medium (4 vCPU, 8 GB)", 4, 8),
    size("large", "Large (8 vCPU, 16 GB)", 8, 16),
    size("x-large", "X-Large (16 vCPU, 32 GB)", 16, 32),
];

pub(crate) fn vm_sizes(provider: ProviderId) -> Option<&'static [VmSize]> {
    match provider {
        Aws => Some(AWS_SIZES),
        Azure => Some(AZURE_SIZES),
        Gcp => Some(GCP_SIZES),
        DigitalOcean => Some(DIGITALOCEAN_SIZES),
        Oracle => Some(ORACLE_SIZES),
        Hetzner => Some(HETZNER_SIZES),
        Harvester | Vmware | Proxmox => None,
    }
}

pub(crate) const HCI_CONTROL_PLANE_SIZE: CustomSize = CustomSize {
    cpu: 4,
    memory: 8,
    storage: 50,
};

pub(crate) const HCI_WORKER_SIZE: CustomSize = CustomSize {
    cpu: 4,
    memory: 16,
    storage: 100,
};

// ── Security hardening ─────────────────────────────────────────────────────

pub(crate) static SECURITY_FRAMEWORKS: &[SecurityFramework] = &[
    SecurityFramework {
        id: "cis",
        name: "CIS Kubernetes Benchmark",
        description: "Center for Internet Security hardening profile",
    },
    SecurityFramework {
        id: "nsa-cisa",
        name: "NSA/CISA Kubernetes Hardening",
        description: "NSA and CISA Kubernetes hardening guidance",
    },
    SecurityFramework {
        id: "pci-dss",
        name: "PCI DSS",
        description: "Payment Card Industry Data Security Standard controls",
    },
    SecurityFramework {
        id: "hipaa",
        name: "HIPAA",
        description: "Health data safeguards for regulated workloads",
    },
    SecurityFramework {
        id: "fips",
        name: "FIPS 140-3",
        description: "FIPS-validated cryptographic modules",
    },
];
