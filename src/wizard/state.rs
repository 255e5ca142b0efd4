//! Immutable wizard state and the selection cascade
//!
//! Every operation takes `&self` and returns a new [`WizardState`]; nothing is
//! mutated in place. Selecting an upstream field re-derives every dependent list
//! and default from the catalog, so a value picked for one provider can never
//! survive into another provider's option set.
//!
//! Dependency order:
//!
//! ```text
//! provider ─┬─ credential (fetched)
//!           ├─ region (cloud only)
//!           ├─ os ── os version
//!           ├─ node pools / vm sizes
//!           └─ distribution ─┬─ k8s version
//!                            └─ storage engine ── storage version
//! add-ons, security options, management server ── manager credential (fetched)
//! ```
//!
//! Two steps depend on the backend: the provider's credential list and the
//! management server's detail plus credentials. For both, the state hands out a
//! [`FetchTicket`] carrying a generation number. A response is applied only when
//! its ticket still matches the current generation; anything else is a late answer
//! to a superseded selection and is dropped.

use tracing::debug;

use crate::catalog::{
    self, CustomSize, Distribution, DistributionId, NodePool, NodeRole, NodeSize,
    OperatingSystem, ProviderId, Region, StorageEngine, StorageEngineId, Version, VmSize,
};
use crate::cluster::{AddonValues, ClusterConfiguration, ValuesFile};
use crate::error::{Error, Result};

use super::credentials::{Credential, ManagerCredential, ManagerServer};
use super::phase::WizardPhase;
use super::validation::{self, ValidationError};

/// User's choice for one add-on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddonSelection {
    pub id: String,
    pub enabled: bool,
    pub version: String,
    pub values: Option<AddonValues>,
}

/// External management server binding
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManagerSelection {
    pub server_id: Option<String>,
    pub server: Option<ManagerServer>,
    pub credentials: Vec<ManagerCredential>,
    pub credential_id: Option<String>,
}

/// Every user selection together with the option lists derived from it
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cascade {
    pub name: String,
    pub provider: Option<ProviderId>,

    pub credentials: Vec<Credential>,
    pub credential_id: Option<String>,

    pub regions: &'static [Region],
    pub region_id: Option<String>,

    pub operating_systems: Vec<&'static OperatingSystem>,
    pub os_id: Option<String>,
    pub os_versions: &'static [Version],
    pub os_version: Option<String>,

    pub vm_sizes: &'static [VmSize],
    pub node_pools: Vec<NodePool>,

    pub distributions: &'static [Distribution],
    pub distribution: Option<DistributionId>,
    pub k8s_versions: &'static [Version],
    pub k8s_version: Option<String>,

    pub storage_engines: Vec<&'static StorageEngine>,
    pub storage_engine: Option<StorageEngineId>,
    pub storage_versions: &'static [Version],
    pub storage_version: Option<String>,

    pub addons: Vec<AddonSelection>,
    pub security_options: Vec<String>,
    pub manager: ManagerSelection,
}

impl Cascade {
    pub fn node_pool(&self, role: NodeRole) -> Option<&NodePool> {
        self.node_pools.iter().find(|p| p.role == role)
    }

    pub fn enabled_addons(&self) -> impl Iterator<Item = &AddonSelection> {
        self.addons.iter().filter(|a| a.enabled)
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validation::validate(self)
    }
}

/// Handed out when a backend fetch starts; must be presented to apply the result
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket<K> {
    generation: u64,
    pub key: K,
}

/// Where a finished wizard was handed off to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Submitted,
    SavedAsTemplate,
}

/// The whole wizard session state
#[derive(Clone, Debug, Default)]
pub struct WizardState {
    cascade: Cascade,
    credential_generation: u64,
    manager_generation: u64,
    outcome: Option<Outcome>,
}

fn version_ids(versions: &[Version]) -> impl Iterator<Item = &'static str> + '_ {
    versions.iter().map(|v| v.id)
}

fn default_id(version: Option<&'static Version>) -> Option<String> {
    version.map(|v| v.id.to_string())
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    pub fn phase(&self) -> WizardPhase {
        WizardPhase::derive(&self.cascade, self.outcome)
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        self.cascade.validate()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Next state with the cascade modified by `f`; any edit leaves a terminal phase
    fn with(&self, f: impl FnOnce(&mut Cascade)) -> Self {
        let mut next = self.clone();
        f(&mut next.cascade);
        next.outcome = None;
        next
    }

    fn try_with(&self, f: impl FnOnce(&mut Cascade) -> Result<()>) -> Result<Self> {
        let mut next = self.clone();
        f(&mut next.cascade)?;
        next.outcome = None;
        Ok(next)
    }

    fn require_provider(&self) -> Result<ProviderId> {
        self.cascade
            .provider
            .ok_or_else(|| Error::InvalidState("no provider selected".to_string()))
    }

    pub fn set_name(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.with(|c| c.name = name)
    }

    // ── Provider ───────────────────────────────────────────────────────────

    /// Select a provider and rebuild every downstream selection from its defaults
    ///
    /// The credential list is cleared and a new credential fetch generation begins;
    /// see [`WizardState::credential_ticket`].
    pub fn select_provider(&self, provider: ProviderId) -> Self {
        debug!(%provider, "selecting provider");

        let regions = catalog::regions_for(provider);
        let os = catalog::default_os_for(provider);
        let distribution = catalog::default_distribution_for(provider).map(|d| d.id);

        let mut cascade = Cascade {
            name: self.cascade.name.clone(),
            provider: Some(provider),
            regions,
            region_id: catalog::default_region_for(provider).map(|r| r.id.to_string()),
            operating_systems: catalog::operating_systems_for(provider),
            os_id: os.map(|o| o.id.to_string()),
            os_versions: os.map(catalog::versions_for).unwrap_or_default(),
            os_version: os.and_then(catalog::default_version_for).map(|v| v.id.to_string()),
            vm_sizes: catalog::vm_sizes_for(provider),
            node_pools: catalog::default_node_pools(provider),
            distributions: catalog::distributions_for(provider),
            ..Cascade::default()
        };
        if let Some(d) = distribution {
            derive_distribution(&mut cascade, provider, d);
        }

        WizardState {
            cascade,
            credential_generation: self.credential_generation + 1,
            manager_generation: self.manager_generation + 1,
            outcome: None,
        }
    }

    /// Ticket for the credential fetch of the current provider
    pub fn credential_ticket(&self) -> Option<FetchTicket<ProviderId>> {
        self.cascade.provider.map(|key| FetchTicket {
            generation: self.credential_generation,
            key,
        })
    }

    /// Apply a fetched credential list
    ///
    /// Returns `None` when the ticket belongs to a superseded provider selection.
    /// Credentials for other providers are filtered out and the one flagged default,
    /// if any, is selected.
    pub fn apply_credentials(
        &self,
        ticket: &FetchTicket<ProviderId>,
        credentials: Vec<Credential>,
    ) -> Option<Self> {
        if ticket.generation != self.credential_generation
            || self.cascade.provider != Some(ticket.key)
        {
            return None;
        }
        let provider = ticket.key;
        Some(self.with(|c| {
            c.credentials = credentials
                .into_iter()
                .filter(|cred| cred.provider == provider)
                .collect();
            c.credential_id = c
                .credentials
                .iter()
                .find(|cred| cred.is_default)
                .map(|cred| cred.id.clone());
        }))
    }

    pub fn select_credential(&self, id: &str) -> Result<Self> {
        self.try_with(|c| {
            if !c.credentials.iter().any(|cred| cred.id == id) {
                return Err(Error::unknown_option("credential", id));
            }
            c.credential_id = Some(id.to_string());
            Ok(())
        })
    }

    pub fn select_region(&self, id: &str) -> Result<Self> {
        self.try_with(|c| {
            if !c.regions.iter().any(|r| r.id == id) {
                return Err(Error::unknown_option("region", id));
            }
            c.region_id = Some(id.to_string());
            Ok(())
        })
    }

    // ── Operating system ───────────────────────────────────────────────────

    /// Select an OS and re-derive its version list and default version
    pub fn select_os(&self, id: &str) -> Result<Self> {
        self.try_with(|c| {
            let os = c
                .operating_systems
                .iter()
                .copied()
                .find(|os| os.id == id)
                .ok_or_else(|| Error::unknown_option("operating system", id))?;
            c.os_id = Some(os.id.to_string());
            c.os_versions = catalog::versions_for(os);
            c.os_version = default_id(catalog::default_version_for(os));
            Ok(())
        })
    }

    pub fn select_os_version(&self, version: &str) -> Result<Self> {
        self.try_with(|c| {
            if !version_ids(c.os_versions).any(|v| v == version) {
                return Err(Error::unknown_option("os version", version));
            }
            c.os_version = Some(version.to_string());
            Ok(())
        })
    }

    // ── Node pools ─────────────────────────────────────────────────────────

    fn with_pool(
        &self,
        role: NodeRole,
        f: impl FnOnce(&mut NodePool, ProviderId, &'static [VmSize]) -> Result<()>,
    ) -> Result<Self> {
        let provider = self.require_provider()?;
        self.try_with(|c| {
            let sizes = c.vm_sizes;
            let pool = c
                .node_pools
                .iter_mut()
                .find(|p| p.role == role)
                .ok_or_else(|| Error::unknown_option("node pool", role.as_str()))?;
            f(pool, provider, sizes)
        })
    }

    pub fn set_node_count(&self, role: NodeRole, count: u32) -> Result<Self> {
        self.with_pool(role, |pool, _, _| {
            pool.count = count;
            Ok(())
        })
    }

    /// Catalog VM size for a pool; cloud providers only
    pub fn set_vm_size(&self, role: NodeRole, size_id: &str) -> Result<Self> {
        self.with_pool(role, |pool, provider, sizes| {
            if provider.is_hci() {
                return Err(Error::InvalidState(format!(
                    "{provider} pools use a custom size"
                )));
            }
            if !sizes.iter().any(|s| s.id == size_id) {
                return Err(Error::unknown_option("vm size", size_id));
            }
            pool.size = NodeSize::VmSize(size_id.to_string());
            Ok(())
        })
    }

    /// Explicit machine shape for a pool; HCI providers only
    pub fn set_custom_size(&self, role: NodeRole, size: CustomSize) -> Result<Self> {
        self.with_pool(role, |pool, provider, _| {
            if !provider.is_hci() {
                return Err(Error::InvalidState(format!(
                    "{provider} pools use a catalog VM size"
                )));
            }
            pool.size = NodeSize::CustomSize(size);
            Ok(())
        })
    }

    // ── Kubernetes & storage ───────────────────────────────────────────────

    /// Select a distribution and re-derive Kubernetes versions and storage engines
    ///
    /// OS, region and credential are left untouched.
    pub fn select_distribution(&self, distribution: DistributionId) -> Result<Self> {
        let provider = self.require_provider()?;
        self.try_with(|c| {
            if !c.distributions.iter().any(|d| d.id == distribution) {
                return Err(Error::unknown_option("distribution", distribution.as_str()));
            }
            derive_distribution(c, provider, distribution);
            Ok(())
        })
    }

    pub fn select_k8s_version(&self, version: &str) -> Result<Self> {
        self.try_with(|c| {
            if !version_ids(c.k8s_versions).any(|v| v == version) {
                return Err(Error::unknown_option("kubernetes version", version));
            }
            c.k8s_version = Some(version.to_string());
            Ok(())
        })
    }

    /// Select a storage engine and re-derive its version list and default
    pub fn select_storage_engine(&self, engine: StorageEngineId) -> Result<Self> {
        self.try_with(|c| {
            if !c.storage_engines.iter().any(|e| e.id == engine) {
                return Err(Error::unknown_option("storage engine", engine.as_str()));
            }
            derive_storage_engine(c, engine);
            Ok(())
        })
    }

    pub fn select_storage_version(&self, version: &str) -> Result<Self> {
        self.try_with(|c| {
            if !version_ids(c.storage_versions).any(|v| v == version) {
                return Err(Error::unknown_option("storage version", version));
            }
            c.storage_version = Some(version.to_string());
            Ok(())
        })
    }

    // ── Add-ons ────────────────────────────────────────────────────────────

    /// Flip an add-on, seeding a first-time selection with the catalog default version
    pub fn toggle_addon(&self, id: &str) -> Result<Self> {
        let addon = catalog::addon(id).ok_or_else(|| Error::unknown_option("add-on", id))?;
        Ok(self.with(|c| {
            if let Some(existing) = c.addons.iter_mut().find(|a| a.id == id) {
                existing.enabled = !existing.enabled;
            } else {
                c.addons.push(AddonSelection {
                    id: addon.id.to_string(),
                    enabled: true,
                    version: default_id(catalog::default_addon_version(addon)).unwrap_or_default(),
                    values: None,
                });
            }
        }))
    }

    /// No-op when the add-on was never toggled
    pub fn set_addon_version(&self, id: &str, version: &str) -> Result<Self> {
        if let Some(addon) = catalog::addon(id) {
            if !version_ids(addon.versions).any(|v| v == version) {
                return Err(Error::unknown_option(format!("{id} version"), version));
            }
        }
        Ok(self.with_addon(id, |a| a.version = version.to_string()))
    }

    /// No-op when the add-on was never toggled
    pub fn set_addon_values_file(&self, id: &str, file: ValuesFile) -> Self {
        self.with_addon(id, |a| a.values = Some(AddonValues::Inline(file)))
    }

    /// No-op when the add-on was never toggled
    pub fn remove_addon_values_file(&self, id: &str) -> Self {
        self.with_addon(id, |a| a.values = None)
    }

    fn with_addon(&self, id: &str, f: impl FnOnce(&mut AddonSelection)) -> Self {
        if !self.cascade.addons.iter().any(|a| a.id == id) {
            return self.clone();
        }
        self.with(|c| {
            if let Some(addon) = c.addons.iter_mut().find(|a| a.id == id) {
                f(addon);
            }
        })
    }

    // ── Security hardening ─────────────────────────────────────────────────

    pub fn toggle_security_option(&self, id: &str) -> Result<Self> {
        if catalog::security_framework(id).is_none() {
            return Err(Error::unknown_option("security framework", id));
        }
        Ok(self.with(|c| {
            if let Some(pos) = c.security_options.iter().position(|s| s == id) {
                c.security_options.remove(pos);
            } else {
                c.security_options.push(id.to_string());
            }
        }))
    }

    // ── Management server ──────────────────────────────────────────────────

    /// Bind (or with `None`, unbind) a management server
    ///
    /// Clears the server detail and credential list; when a server is chosen a new
    /// fetch generation begins, see [`WizardState::manager_ticket`].
    pub fn select_manager_server(&self, server_id: Option<&str>) -> Self {
        let mut next = self.with(|c| {
            c.manager = ManagerSelection {
                server_id: server_id.map(str::to_string),
                ..ManagerSelection::default()
            };
        });
        next.manager_generation += 1;
        next
    }

    pub fn manager_ticket(&self) -> Option<FetchTicket<String>> {
        self.cascade
            .manager
            .server_id
            .clone()
            .map(|key| FetchTicket {
                generation: self.manager_generation,
                key,
            })
    }

    /// Apply a fetched server detail and credential list
    ///
    /// Returns `None` for a superseded ticket. Selects the server's default
    /// credential, else its first, else none.
    pub fn apply_manager(
        &self,
        ticket: &FetchTicket<String>,
        server: ManagerServer,
        credentials: Vec<ManagerCredential>,
    ) -> Option<Self> {
        if ticket.generation != self.manager_generation
            || self.cascade.manager.server_id.as_deref() != Some(ticket.key.as_str())
        {
            return None;
        }
        Some(self.with(|c| {
            let credential_id = credentials
                .iter()
                .find(|cred| cred.is_default)
                .or(credentials.first())
                .map(|cred| cred.id.clone());
            c.manager.server = Some(server);
            c.manager.credentials = credentials;
            c.manager.credential_id = credential_id;
        }))
    }

    pub fn select_manager_credential(&self, id: &str) -> Result<Self> {
        self.try_with(|c| {
            if !c.manager.credentials.iter().any(|cred| cred.id == id) {
                return Err(Error::unknown_option("manager credential", id));
            }
            c.manager.credential_id = Some(id.to_string());
            Ok(())
        })
    }

    // ── Terminal transitions ───────────────────────────────────────────────

    fn finish(&self, outcome: Outcome) -> Result<Self> {
        if let Err(errors) = self.validate() {
            let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
            return Err(Error::InvalidState(format!(
                "cannot leave the wizard with invalid fields: {}",
                fields.join(", ")
            )));
        }
        let mut next = self.clone();
        next.outcome = Some(outcome);
        Ok(next)
    }

    /// Hand-off to the deploy action
    pub fn mark_submitted(&self) -> Result<Self> {
        self.finish(Outcome::Submitted)
    }

    /// Hand-off to template persistence
    pub fn mark_saved_as_template(&self) -> Result<Self> {
        self.finish(Outcome::SavedAsTemplate)
    }

    // ── Resume ─────────────────────────────────────────────────────────────

    /// Rebuild a wizard from a stored configuration by replaying the cascade
    ///
    /// Values the catalog no longer offers are dropped and fall back to the
    /// derived default. Credential and management-server bindings need backend
    /// fetches and are left to the caller.
    pub fn from_configuration(config: &ClusterConfiguration) -> Self {
        let mut state = WizardState::new()
            .set_name(config.name.clone())
            .select_provider(config.provider);

        let replay = |state: WizardState, step: Result<WizardState>| match step {
            Ok(next) => next,
            Err(e) => {
                debug!(error = %e, "dropping stored selection");
                state
            }
        };

        if let Some(region) = &config.region {
            state = replay(state.clone(), state.select_region(region));
        }
        state = replay(state.clone(), state.select_os(&config.os.id));
        state = replay(state.clone(), state.select_os_version(&config.os.version));

        for pool in &config.node_pools {
            state = replay(state.clone(), state.set_node_count(pool.role, pool.count));
            let sized = match &pool.size {
                NodeSize::VmSize(id) => state.set_vm_size(pool.role, id),
                NodeSize::CustomSize(size) => state.set_custom_size(pool.role, *size),
            };
            state = replay(state.clone(), sized);
        }

        state = replay(
            state.clone(),
            state.select_distribution(config.kubernetes.distribution),
        );
        state = replay(
            state.clone(),
            state.select_k8s_version(&config.kubernetes.version),
        );
        state = replay(
            state.clone(),
            state.select_storage_engine(config.storage.engine),
        );
        if let Some(version) = &config.storage.version {
            state = replay(state.clone(), state.select_storage_version(version));
        }

        for addon in &config.addons {
            state = replay(state.clone(), state.toggle_addon(&addon.id));
            state = replay(
                state.clone(),
                state.set_addon_version(&addon.id, &addon.version),
            );
            if let Some(values) = &addon.values {
                let values = values.clone();
                state = state.with_addon(&addon.id, |a| a.values = Some(values));
            }
        }
        for option in &config.security_options {
            state = replay(state.clone(), state.toggle_security_option(option));
        }

        state
    }
}

/// Kubernetes versions, storage engines and storage versions for a distribution
fn derive_distribution(c: &mut Cascade, provider: ProviderId, distribution: DistributionId) {
    c.distribution = Some(distribution);
    c.k8s_versions = catalog::k8s_versions_for(provider, distribution);
    c.k8s_version = default_id(catalog::default_k8s_version_for(provider, distribution));
    c.storage_engines = catalog::storage_engines_for(provider, distribution);
    derive_storage_engine(
        c,
        catalog::default_storage_engine_for(provider, distribution).id,
    );
}

fn derive_storage_engine(c: &mut Cascade, engine: StorageEngineId) {
    c.storage_engine = Some(engine);
    c.storage_versions = catalog::storage_versions_for(engine);
    c.storage_version = default_id(catalog::default_storage_version_for(engine));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::credentials::CredentialMaterial;

    fn aws_credential(id: &str, is_default: bool) -> Credential {
        Credential {
            id: id.to_string(),
            name: format!("AWS {id}"),
            provider: ProviderId::Aws,
            is_default,
            material: CredentialMaterial::Aws {
                access_key_id: "AKIAEXAMPLE".to_string(),
            },
        }
    }

    fn manager_credential(id: &str, is_default: bool) -> ManagerCredential {
        ManagerCredential {
            id: id.to_string(),
            name: id.to_string(),
            server_id: "rancher-1".to_string(),
            is_default,
        }
    }

    fn rancher() -> ManagerServer {
        ManagerServer {
            id: "rancher-1".to_string(),
            name: "Rancher".to_string(),
            url: "https://rancher.example.com".to_string(),
        }
    }

    #[test]
    fn test_select_aws_populates_defaults() {
        let state = WizardState::new().select_provider(ProviderId::Aws);
        let c = state.cascade();
        assert_eq!(c.region_id.as_deref(), Some("us-east-1"));
        assert_eq!(c.os_id.as_deref(), Some("amazon-linux"));
        assert_eq!(c.os_version.as_deref(), Some("2023"));
        assert_eq!(c.distribution, Some(DistributionId::Eks));
        assert_eq!(c.k8s_version.as_deref(), Some("1.31"));
        assert_eq!(c.storage_engine, Some(StorageEngineId::CloudProvider));
        assert_eq!(c.storage_version, None);
        assert!(c.credentials.is_empty());
    }

    #[test]
    fn test_select_provider_is_idempotent() {
        let once = WizardState::new()
            .set_name("demo")
            .select_provider(ProviderId::Gcp);
        let twice = once.select_provider(ProviderId::Gcp);
        assert_eq!(once.cascade(), twice.cascade());
    }

    #[test]
    fn test_select_provider_resets_downstream() {
        let state = WizardState::new()
            .select_provider(ProviderId::Aws)
            .toggle_addon("monitoring")
            .unwrap()
            .toggle_security_option("cis")
            .unwrap()
            .select_manager_server(Some("rancher-1"));
        let state = state.select_provider(ProviderId::Hetzner);
        let c = state.cascade();
        assert!(c.addons.is_empty());
        assert!(c.security_options.is_empty());
        assert_eq!(c.manager, ManagerSelection::default());
        assert_eq!(c.distribution, Some(DistributionId::Rke2));
    }

    #[test]
    fn test_stale_credentials_are_discarded() {
        let aws = WizardState::new().select_provider(ProviderId::Aws);
        let aws_ticket = aws.credential_ticket().unwrap();
        let azure = aws.select_provider(ProviderId::Azure);

        assert!(azure
            .apply_credentials(&aws_ticket, vec![aws_credential("a", true)])
            .is_none());

        // Re-selecting the same provider also invalidates the earlier ticket.
        let aws_again = azure.select_provider(ProviderId::Aws);
        assert!(aws_again
            .apply_credentials(&aws_ticket, vec![aws_credential("a", true)])
            .is_none());

        let fresh = aws_again.credential_ticket().unwrap();
        let applied = aws_again
            .apply_credentials(&fresh, vec![aws_credential("a", false), aws_credential("b", true)])
            .unwrap();
        assert_eq!(applied.cascade().credentials.len(), 2);
        assert_eq!(applied.cascade().credential_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_credentials_without_default_are_not_auto_selected() {
        let state = WizardState::new().select_provider(ProviderId::Aws);
        let ticket = state.credential_ticket().unwrap();
        let state = state
            .apply_credentials(&ticket, vec![aws_credential("a", false)])
            .unwrap();
        assert_eq!(state.cascade().credential_id, None);
        let state = state.select_credential("a").unwrap();
        assert_eq!(state.cascade().credential_id.as_deref(), Some("a"));
        assert!(state.select_credential("zzz").is_err());
    }

    #[test]
    fn test_region_rejected_for_hci_and_unknown_ids() {
        let hci = WizardState::new().select_provider(ProviderId::Proxmox);
        assert!(hci.select_region("us-east-1").is_err());

        let aws = WizardState::new().select_provider(ProviderId::Aws);
        assert!(aws.select_region("eastus").is_err());
        let aws = aws.select_region("eu-west-1").unwrap();
        assert_eq!(aws.cascade().region_id.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_select_distribution_rederives_only_kubernetes_and_storage() {
        let state = WizardState::new()
            .select_provider(ProviderId::Aws)
            .select_region("us-west-2")
            .unwrap()
            .select_os("ubuntu")
            .unwrap();
        let next = state.select_distribution(DistributionId::K3s).unwrap();
        let c = next.cascade();
        assert_eq!(c.region_id.as_deref(), Some("us-west-2"));
        assert_eq!(c.os_id.as_deref(), Some("ubuntu"));
        assert_eq!(c.k8s_version.as_deref(), Some("v1.31.2+k3s1"));
        assert_eq!(c.storage_engine, Some(StorageEngineId::Longhorn));
        assert_eq!(c.storage_version.as_deref(), Some("1.7.2"));
        assert!(c
            .storage_engines
            .iter()
            .all(|e| e.id != StorageEngineId::CloudProvider));

        assert!(next.select_distribution(DistributionId::Aks).is_err());
    }

    #[test]
    fn test_select_storage_engine_rederives_version() {
        let state = WizardState::new()
            .select_provider(ProviderId::Azure)
            .select_storage_engine(StorageEngineId::Rook)
            .unwrap();
        assert_eq!(state.cascade().storage_version.as_deref(), Some("1.15.5"));
        let state = state.select_storage_version("1.14.12").unwrap();
        assert_eq!(state.cascade().storage_version.as_deref(), Some("1.14.12"));
        assert!(state.select_storage_version("1.7.2").is_err());
    }

    #[test]
    fn test_select_os_rederives_version() {
        let state = WizardState::new()
            .select_provider(ProviderId::Aws)
            .select_os("flatcar")
            .unwrap();
        assert_eq!(state.cascade().os_version.as_deref(), Some("3975.2.0"));
        assert!(state.select_os("windows").is_err());
    }

    #[test]
    fn test_node_pool_sizes_follow_provider_class() {
        let aws = WizardState::new().select_provider(ProviderId::Aws);
        let custom = CustomSize {
            cpu: 2,
            memory: 4,
            storage: 40,
        };
        assert!(aws.set_custom_size(NodeRole::Worker, custom).is_err());
        let aws = aws.set_vm_size(NodeRole::Worker, "m5.xlarge").unwrap();
        assert_eq!(
            aws.cascade().node_pool(NodeRole::Worker).unwrap().size,
            NodeSize::VmSize("m5.xlarge".to_string())
        );
        assert!(aws.set_vm_size(NodeRole::Worker, "cx22").is_err());

        let harvester = WizardState::new().select_provider(ProviderId::Harvester);
        assert!(harvester.set_vm_size(NodeRole::Worker, "medium").is_err());
        let harvester = harvester.set_custom_size(NodeRole::Worker, custom).unwrap();
        assert_eq!(
            harvester.cascade().node_pool(NodeRole::Worker).unwrap().size,
            NodeSize::CustomSize(custom)
        );

        assert!(WizardState::new()
            .set_node_count(NodeRole::Worker, 3)
            .is_err());
    }

    #[test]
    fn test_toggle_addon_seeds_default_version() {
        let state = WizardState::new().toggle_addon("argocd").unwrap();
        let addon = &state.cascade().addons[0];
        assert!(addon.enabled);
        assert_eq!(addon.version, "7.6.12");
        assert_eq!(addon.values, None);

        let state = state.toggle_addon("argocd").unwrap();
        assert!(!state.cascade().addons[0].enabled);
        assert!(state.toggle_addon("not-an-addon").is_err());
    }

    #[test]
    fn test_addon_mutations_are_noops_before_toggle() {
        let state = WizardState::new();
        let file = ValuesFile {
            file_name: "values.yaml".to_string(),
            contents: "replicas: 2".to_string(),
        };
        assert_eq!(
            state.set_addon_values_file("velero", file.clone()).cascade(),
            state.cascade()
        );
        assert_eq!(
            state.set_addon_version("velero", "7.2.2").unwrap().cascade(),
            state.cascade()
        );

        let state = state.toggle_addon("velero").unwrap();
        let state = state.set_addon_values_file("velero", file.clone());
        assert_eq!(
            state.cascade().addons[0].values,
            Some(AddonValues::Inline(file))
        );
        let state = state.remove_addon_values_file("velero");
        assert_eq!(state.cascade().addons[0].values, None);
        assert!(state.set_addon_version("velero", "0.0.1").is_err());
    }

    #[test]
    fn test_security_option_toggles() {
        let state = WizardState::new()
            .toggle_security_option("cis")
            .unwrap()
            .toggle_security_option("fips")
            .unwrap();
        assert_eq!(state.cascade().security_options, vec!["cis", "fips"]);
        let state = state.toggle_security_option("cis").unwrap();
        assert_eq!(state.cascade().security_options, vec!["fips"]);
        assert!(state.toggle_security_option("iso-27001").is_err());
    }

    #[test]
    fn test_manager_binding_selects_default_then_first() {
        let state = WizardState::new().select_manager_server(Some("rancher-1"));
        let ticket = state.manager_ticket().unwrap();
        let bound = state
            .apply_manager(
                &ticket,
                rancher(),
                vec![manager_credential("m1", false), manager_credential("m2", true)],
            )
            .unwrap();
        assert_eq!(bound.cascade().manager.credential_id.as_deref(), Some("m2"));

        let bound = state
            .apply_manager(&ticket, rancher(), vec![manager_credential("m1", false)])
            .unwrap();
        assert_eq!(bound.cascade().manager.credential_id.as_deref(), Some("m1"));

        let bound = state.apply_manager(&ticket, rancher(), vec![]).unwrap();
        assert_eq!(bound.cascade().manager.credential_id, None);
    }

    #[test]
    fn test_clearing_manager_discards_pending_fetch() {
        let state = WizardState::new().select_manager_server(Some("rancher-1"));
        let ticket = state.manager_ticket().unwrap();
        let cleared = state.select_manager_server(None);
        assert!(cleared.manager_ticket().is_none());
        assert!(cleared
            .apply_manager(&ticket, rancher(), vec![manager_credential("m1", true)])
            .is_none());
        assert_eq!(cleared.cascade().manager, ManagerSelection::default());
    }
}
