//! HTTP client for the hosted backend
//!
//! The backend exposes each table as a REST resource with row filters in the
//! query string (`?id=eq.tpl-1`). Every request carries the API key both as an
//! `apikey` header and as a bearer token.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::catalog::ProviderId;
use crate::error::{Error, Result};
use crate::settings::BackendSettings;
use crate::template::{TemplatePatch, TemplateRecord};
use crate::wizard::{Credential, CredentialRecord, ManagerCredential, ManagerServer};

use super::{credentials_from_records, CredentialSource, ManagerDirectory, TemplateStore};

/// Hosted backend client
#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    settings: BackendSettings,
}

impl std::fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBackend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

impl RestBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            settings: settings.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(Error::BackendError {
            status: status.as_u16(),
            message,
        })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let request = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*")])
            .query(filters);
        let response = Self::check(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn select_one<T: DeserializeOwned>(&self, table: &str, id: &str) -> Result<T> {
        self.select(table, &[("id", eq(id))])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("{table} row '{id}'")))
    }
}

#[async_trait]
impl CredentialSource for RestBackend {
    #[instrument(skip(self, provider), fields(provider = %provider))]
    async fn credentials_for(&self, provider: ProviderId) -> Result<Vec<Credential>> {
        let records: Vec<CredentialRecord> = self
            .select(
                &self.settings.credentials_table,
                &[("provider", eq(provider.as_str()))],
            )
            .await?;
        debug!(count = records.len(), "fetched credential records");
        Ok(credentials_from_records(provider, records))
    }
}

#[async_trait]
impl ManagerDirectory for RestBackend {
    #[instrument(skip(self))]
    async fn manager_servers(&self) -> Result<Vec<ManagerServer>> {
        self.select(&self.settings.managers_table, &[]).await
    }

    #[instrument(skip(self))]
    async fn manager_server(&self, id: &str) -> Result<ManagerServer> {
        self.select_one(&self.settings.managers_table, id).await
    }

    #[instrument(skip(self))]
    async fn manager_credentials(&self, server_id: &str) -> Result<Vec<ManagerCredential>> {
        self.select(
            &self.settings.manager_credentials_table,
            &[("server_id", eq(server_id))],
        )
        .await
    }
}

#[async_trait]
impl TemplateStore for RestBackend {
    #[instrument(skip(self))]
    async fn list_templates(&self) -> Result<Vec<TemplateRecord>> {
        let request = self
            .client
            .get(self.table_url(&self.settings.templates_table))
            .query(&[("select", "*"), ("order", "updated_at.desc")]);
        let response = Self::check(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip(self))]
    async fn get_template(&self, id: &str) -> Result<TemplateRecord> {
        self.select_one(&self.settings.templates_table, id).await
    }

    #[instrument(skip(self, record), fields(name = %record.name))]
    async fn create_template(&self, record: TemplateRecord) -> Result<TemplateRecord> {
        let request = self
            .client
            .post(self.table_url(&self.settings.templates_table))
            .header("Prefer", "return=representation")
            .json(&record);
        let response = Self::check(self.authorize(request).send().await?).await?;
        let created: Vec<TemplateRecord> = response.json().await?;
        let created = created.into_iter().next().ok_or_else(|| Error::BackendError {
            status: 200,
            message: "insert returned no row".to_string(),
        })?;
        info!(id = ?created.id, "created template");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    async fn update_template(&self, id: &str, patch: &TemplatePatch) -> Result<TemplateRecord> {
        patch.validate()?;
        let mut body = serde_json::to_value(patch)?;
        body["updated_at"] = serde_json::to_value(Utc::now())?;

        let request = self
            .client
            .patch(self.table_url(&self.settings.templates_table))
            .query(&[("id", eq(id))])
            .header("Prefer", "return=representation")
            .json(&body);
        let response = Self::check(self.authorize(request).send().await?).await?;
        let updated: Vec<TemplateRecord> = response.json().await?;
        let updated = updated
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("template '{id}'")))?;
        info!("updated template");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_template(&self, id: &str) -> Result<()> {
        let request = self
            .client
            .delete(self.table_url(&self.settings.templates_table))
            .query(&[("id", eq(id))])
            .header("Prefer", "return=representation");
        let response = Self::check(self.authorize(request).send().await?).await?;
        let deleted: Vec<serde_json::Value> = response.json().await?;
        if deleted.is_empty() {
            return Err(Error::NotFound(format!("template '{id}'")));
        }
        info!("deleted template");
        Ok(())
    }
}
