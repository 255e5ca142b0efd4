//! In-process backend
//!
//! Holds credentials, management servers and templates behind a tokio `RwLock`.
//! Used for offline previews and tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::catalog::ProviderId;
use crate::error::{Error, Result};
use crate::template::{TemplatePatch, TemplateRecord};
use crate::wizard::{Credential, CredentialRecord, ManagerCredential, ManagerServer, ValidationError};

use super::{credentials_from_records, CredentialSource, ManagerDirectory, TemplateStore};

#[derive(Debug, Default)]
struct Tables {
    credentials: Vec<CredentialRecord>,
    managers: Vec<ManagerServer>,
    manager_credentials: Vec<ManagerCredential>,
    templates: Vec<TemplateRecord>,
    next_template_id: u64,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_credential(&self, record: CredentialRecord) {
        self.tables.write().await.credentials.push(record);
    }

    pub async fn add_manager(&self, server: ManagerServer, credentials: Vec<ManagerCredential>) {
        let mut tables = self.tables.write().await;
        tables.managers.push(server);
        tables.manager_credentials.extend(credentials);
    }
}

#[async_trait]
impl CredentialSource for MemoryBackend {
    async fn credentials_for(&self, provider: ProviderId) -> Result<Vec<Credential>> {
        let records: Vec<CredentialRecord> = self
            .tables
            .read()
            .await
            .credentials
            .iter()
            .filter(|r| r.provider == provider.as_str())
            .cloned()
            .collect();
        Ok(credentials_from_records(provider, records))
    }
}

#[async_trait]
impl ManagerDirectory for MemoryBackend {
    async fn manager_servers(&self) -> Result<Vec<ManagerServer>> {
        Ok(self.tables.read().await.managers.clone())
    }

    async fn manager_server(&self, id: &str) -> Result<ManagerServer> {
        self.tables
            .read()
            .await
            .managers
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("manager server '{id}'")))
    }

    async fn manager_credentials(&self, server_id: &str) -> Result<Vec<ManagerCredential>> {
        Ok(self
            .tables
            .read()
            .await
            .manager_credentials
            .iter()
            .filter(|c| c.server_id == server_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TemplateStore for MemoryBackend {
    async fn list_templates(&self) -> Result<Vec<TemplateRecord>> {
        let mut templates = self.tables.read().await.templates.clone();
        templates.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(templates)
    }

    async fn get_template(&self, id: &str) -> Result<TemplateRecord> {
        self.tables
            .read()
            .await
            .templates
            .iter()
            .find(|t| t.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("template '{id}'")))
    }

    async fn create_template(&self, mut record: TemplateRecord) -> Result<TemplateRecord> {
        if record.name.trim().is_empty() {
            return Err(Error::ValidationError(vec![ValidationError::new(
                "name",
                "Template name must not be empty",
                "Enter a name for the template.",
            )]));
        }
        let mut tables = self.tables.write().await;
        tables.next_template_id += 1;
        record.id = Some(format!("tpl-{}", tables.next_template_id));
        let now = Utc::now();
        record.created_at.get_or_insert(now);
        record.updated_at.get_or_insert(now);
        tables.templates.push(record.clone());
        info!(id = ?record.id, name = %record.name, "created template");
        Ok(record)
    }

    async fn update_template(&self, id: &str, patch: &TemplatePatch) -> Result<TemplateRecord> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .templates
            .iter_mut()
            .find(|t| t.id.as_deref() == Some(id))
            .ok_or_else(|| Error::NotFound(format!("template '{id}'")))?;
        let updated = patch.apply(slot, Utc::now())?;
        *slot = updated.clone();
        info!(id, "updated template");
        Ok(updated)
    }

    async fn delete_template(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.templates.len();
        tables.templates.retain(|t| t.id.as_deref() != Some(id));
        if tables.templates.len() == before {
            return Err(Error::NotFound(format!("template '{id}'")));
        }
        info!(id, "deleted template");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template(name: &str) -> TemplateRecord {
        TemplateRecord {
            name: name.to_string(),
            provider: "azure".to_string(),
            ..TemplateRecord::default()
        }
    }

    #[tokio::test]
    async fn test_template_crud() {
        let backend = MemoryBackend::new();
        let created = backend.create_template(template("first")).await.unwrap();
        let id = created.id.clone().unwrap();
        assert!(created.created_at.is_some());

        let fetched = backend.get_template(&id).await.unwrap();
        assert_eq!(fetched, created);

        let patch = TemplatePatch {
            name: Some("renamed".to_string()),
            description: Some("shared baseline".to_string()),
        };
        let updated = backend.update_template(&id, &patch).await.unwrap();
        assert_eq!(updated.name, "renamed");
        assert!(updated.updated_at >= created.updated_at);

        backend.delete_template(&id).await.unwrap();
        assert!(matches!(
            backend.get_template(&id).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            backend.delete_template(&id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_rename_leaves_template_untouched() {
        let backend = MemoryBackend::new();
        let created = backend.create_template(template("keep")).await.unwrap();
        let id = created.id.clone().unwrap();

        let patch = TemplatePatch {
            name: Some("  ".to_string()),
            description: Some("ignored".to_string()),
        };
        assert!(backend.update_template(&id, &patch).await.is_err());
        assert_eq!(backend.get_template(&id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let backend = MemoryBackend::new();
        assert!(backend.create_template(template("")).await.is_err());
        assert!(backend.list_templates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_credentials_and_managers() {
        let backend = MemoryBackend::new();
        backend
            .add_credential(CredentialRecord {
                id: "do-1".to_string(),
                name: "Team".to_string(),
                provider: "digitalocean".to_string(),
                is_default: true,
                details: json!({"team": "platform"}),
            })
            .await;
        backend
            .add_manager(
                ManagerServer {
                    id: "r1".to_string(),
                    name: "Rancher".to_string(),
                    url: "https://rancher.local".to_string(),
                },
                vec![ManagerCredential {
                    id: "t1".to_string(),
                    name: "admin".to_string(),
                    server_id: "r1".to_string(),
                    is_default: false,
                }],
            )
            .await;

        let credentials = backend
            .credentials_for(ProviderId::DigitalOcean)
            .await
            .unwrap();
        assert_eq!(credentials.len(), 1);
        assert!(backend
            .credentials_for(ProviderId::Aws)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(backend.manager_servers().await.unwrap().len(), 1);
        assert_eq!(backend.manager_credentials("r1").await.unwrap().len(), 1);
        assert!(backend.manager_server("r2").await.is_err());
    }

    #[test]
    fn test_fresh_backend_is_empty() {
        let backend = MemoryBackend::new();
        assert!(tokio_test::block_on(backend.list_templates()).unwrap().is_empty());
        assert!(tokio_test::block_on(backend.manager_servers()).unwrap().is_empty());
        assert!(tokio_test::block_on(backend.credentials_for(ProviderId::Aws))
            .unwrap()
            .is_empty());
    }
}
