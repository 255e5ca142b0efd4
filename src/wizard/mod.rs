//! Provisioning wizard: immutable selection state and the cascade over it

pub mod credentials;
mod phase;
mod state;
mod validation;

pub use credentials::{
    Credential, CredentialMaterial, CredentialRecord, ManagerCredential, ManagerServer,
};
pub use phase::WizardPhase;
pub use state::{AddonSelection, Cascade, FetchTicket, ManagerSelection, WizardState};
pub use validation::{is_valid_cluster_name, ValidationError};
