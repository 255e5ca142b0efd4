//! External collaborators of the wizard
//!
//! The wizard itself never performs I/O. Credentials, management servers and
//! stored templates live in a hosted backend reached through these traits:
//! [`rest::RestBackend`] talks to it over HTTP and [`memory::MemoryBackend`]
//! keeps everything in process.

pub mod memory;
pub mod rest;

use async_trait::async_trait;
use tracing::warn;

use crate::catalog::ProviderId;
use crate::error::Result;
use crate::template::{TemplatePatch, TemplateRecord};
use crate::wizard::{Credential, CredentialRecord, ManagerCredential, ManagerServer};

pub use memory::MemoryBackend;
pub use rest::RestBackend;

/// Provider credentials
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Credentials registered for `provider`; malformed records are skipped
    async fn credentials_for(&self, provider: ProviderId) -> Result<Vec<Credential>>;
}

/// External management servers and their registration credentials
#[async_trait]
pub trait ManagerDirectory: Send + Sync {
    async fn manager_servers(&self) -> Result<Vec<ManagerServer>>;

    async fn manager_server(&self, id: &str) -> Result<ManagerServer>;

    async fn manager_credentials(&self, server_id: &str) -> Result<Vec<ManagerCredential>>;
}

/// Template persistence, pass-through CRUD
///
/// A failed rename or delete leaves the stored template unchanged.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn list_templates(&self) -> Result<Vec<TemplateRecord>>;

    async fn get_template(&self, id: &str) -> Result<TemplateRecord>;

    /// Store a new template and return it with its assigned id
    async fn create_template(&self, record: TemplateRecord) -> Result<TemplateRecord>;

    async fn update_template(&self, id: &str, patch: &TemplatePatch) -> Result<TemplateRecord>;

    async fn delete_template(&self, id: &str) -> Result<()>;
}

/// Typed credentials for `provider`, dropping rows that fail construction
pub(crate) fn credentials_from_records(
    provider: ProviderId,
    records: Vec<CredentialRecord>,
) -> Vec<Credential> {
    records
        .into_iter()
        .filter_map(|record| match Credential::try_from(record) {
            Ok(credential) if credential.provider == provider => Some(credential),
            Ok(credential) => {
                warn!(
                    id = %credential.id,
                    expected = %provider,
                    found = %credential.provider,
                    "skipping credential for another provider"
                );
                None
            }
            Err(e) => {
                warn!(error = %e, "skipping malformed credential record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, provider: &str, details: serde_json::Value) -> CredentialRecord {
        CredentialRecord {
            id: id.to_string(),
            name: id.to_string(),
            provider: provider.to_string(),
            is_default: false,
            details,
        }
    }

    #[test]
    fn test_credentials_from_records_filters_bad_rows() {
        let credentials = credentials_from_records(
            ProviderId::Hetzner,
            vec![
                record("ok", "hetzner", json!({"project": "web"})),
                record("blank", "hetzner", json!({"project": ""})),
                record("foreign", "aws", json!({"access_key_id": "AKIA"})),
            ],
        );
        let ids: Vec<_> = credentials.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["ok"]);
    }
}
