//! Wizard phases
//!
//! The phase is never stored; it is derived from the cascade so it cannot drift
//! from the selections it describes.

use std::fmt;

use super::state::{Cascade, Outcome};
use super::validation;

/// Position of a wizard session in the provisioning flow
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardPhase {
    /// Nothing selected yet
    Empty,
    /// Provider chosen, defaults derived
    ProviderSelected,
    CredentialSet,
    /// Region chosen, or not needed for an HCI provider
    RegionSet,
    OsVersionSet,
    PoolsConfigured,
    K8sConfigured,
    StorageConfigured,
    AddonsConfigured,
    SecurityConfigured,
    ManagerConfigured,
    /// Every required field passes validation
    Valid,
    /// Handed to the deploy action
    Submitted,
    /// Handed to template persistence
    SavedAsTemplate,
}

impl WizardPhase {
    /// 1-based step for display
    pub fn step_number(&self) -> usize {
        match self {
            WizardPhase::Empty => 1,
            WizardPhase::ProviderSelected => 2,
            WizardPhase::CredentialSet => 3,
            WizardPhase::RegionSet => 4,
            WizardPhase::OsVersionSet => 5,
            WizardPhase::PoolsConfigured => 6,
            WizardPhase::K8sConfigured => 7,
            WizardPhase::StorageConfigured => 8,
            WizardPhase::AddonsConfigured => 9,
            WizardPhase::SecurityConfigured => 10,
            WizardPhase::ManagerConfigured => 11,
            WizardPhase::Valid => 12,
            WizardPhase::Submitted | WizardPhase::SavedAsTemplate => 13,
        }
    }

    pub fn total_steps() -> usize {
        13
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardPhase::Empty => "Choose Provider",
            WizardPhase::ProviderSelected => "Select Credential",
            WizardPhase::CredentialSet => "Select Region",
            WizardPhase::RegionSet => "Operating System",
            WizardPhase::OsVersionSet => "Node Pools",
            WizardPhase::PoolsConfigured => "Kubernetes",
            WizardPhase::K8sConfigured => "Storage",
            WizardPhase::StorageConfigured => "Add-ons",
            WizardPhase::AddonsConfigured => "Security Hardening",
            WizardPhase::SecurityConfigured => "Management Server",
            WizardPhase::ManagerConfigured => "Review",
            WizardPhase::Valid => "Ready to Deploy",
            WizardPhase::Submitted => "Submitted",
            WizardPhase::SavedAsTemplate => "Saved as Template",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WizardPhase::Submitted | WizardPhase::SavedAsTemplate)
    }

    /// Furthest phase the cascade has reached
    ///
    /// Required steps are walked in order and the walk stops at the first one
    /// missing. Add-ons, security and the management server are optional; the
    /// latest of them that carries a selection is reported.
    pub(crate) fn derive(c: &Cascade, outcome: Option<Outcome>) -> Self {
        match outcome {
            Some(Outcome::Submitted) => return WizardPhase::Submitted,
            Some(Outcome::SavedAsTemplate) => return WizardPhase::SavedAsTemplate,
            None => {}
        }
        if validation::validate(c).is_ok() {
            return WizardPhase::Valid;
        }
        let Some(provider) = c.provider else {
            return WizardPhase::Empty;
        };

        let required = [
            (WizardPhase::CredentialSet, c.credential_id.is_some()),
            (
                WizardPhase::RegionSet,
                provider.is_hci() || c.region_id.is_some(),
            ),
            (WizardPhase::OsVersionSet, c.os_version.is_some()),
            (
                WizardPhase::PoolsConfigured,
                !c.node_pools.is_empty() && c.node_pools.iter().all(|p| p.count > 0),
            ),
            (WizardPhase::K8sConfigured, c.k8s_version.is_some()),
            (WizardPhase::StorageConfigured, c.storage_engine.is_some()),
        ];

        let mut reached = WizardPhase::ProviderSelected;
        for (phase, done) in required {
            if !done {
                return reached;
            }
            reached = phase;
        }

        if c.manager.credential_id.is_some() {
            WizardPhase::ManagerConfigured
        } else if !c.security_options.is_empty() {
            WizardPhase::SecurityConfigured
        } else if c.enabled_addons().next().is_some() {
            WizardPhase::AddonsConfigured
        } else {
            reached
        }
    }
}

impl fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{NodeRole, ProviderId};
    use crate::wizard::WizardState;

    #[test]
    fn test_phase_progression() {
        let state = WizardState::new();
        assert_eq!(state.phase(), WizardPhase::Empty);

        let state = state.select_provider(ProviderId::Aws);
        // Credentials have not arrived yet.
        assert_eq!(state.phase(), WizardPhase::ProviderSelected);

        let state = state.set_node_count(NodeRole::Worker, 0).unwrap();
        assert_eq!(state.phase(), WizardPhase::ProviderSelected);
    }

    #[test]
    fn test_optional_steps_report_latest_selection() {
        let mut c = Cascade {
            provider: Some(ProviderId::Proxmox),
            ..Cascade::default()
        };
        c.credential_id = Some("pve".to_string());
        c.os_version = Some("15 SP6".to_string());
        c.node_pools = crate::catalog::default_node_pools(ProviderId::Proxmox);
        c.k8s_version = Some("v1.31.2+rke2r1".to_string());
        c.storage_engine = Some(crate::catalog::StorageEngineId::Longhorn);
        // No name, so the cascade is not yet valid.
        assert_eq!(WizardPhase::derive(&c, None), WizardPhase::StorageConfigured);

        c.security_options.push("cis".to_string());
        assert_eq!(WizardPhase::derive(&c, None), WizardPhase::SecurityConfigured);
    }

    #[test]
    fn test_step_numbers_are_ordered() {
        assert!(WizardPhase::Empty.step_number() < WizardPhase::Valid.step_number());
        assert_eq!(
            WizardPhase::Submitted.step_number(),
            WizardPhase::total_steps()
        );
        assert!(WizardPhase::SavedAsTemplate.is_terminal());
        assert!(!WizardPhase::Valid.is_terminal());
    }
}
