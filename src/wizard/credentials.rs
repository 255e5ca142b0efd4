//! Provider credentials and external management servers
//!
//! Credential records arrive from the backend as loosely-typed rows. They are
//! converted into [`Credential`] values whose [`CredentialMaterial`] is a closed
//! set of per-provider variants; a record missing a required identifier is
//! rejected at construction time. Only non-secret identifiers are held here, the
//! secret material itself never leaves the backend.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::ProviderId;
use crate::error::Error;

/// Credential row as stored by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: String,
    pub name: String,
    pub provider: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Non-secret identifiers of a credential, one variant per provider family
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CredentialMaterial {
    Aws {
        access_key_id: String,
    },
    Azure {
        subscription_id: String,
        tenant_id: String,
        client_id: String,
    },
    Gcp {
        project_id: String,
    },
    DigitalOcean {
        team: String,
    },
    Oracle {
        tenancy_ocid: String,
        user_ocid: String,
    },
    Hetzner {
        project: String,
    },
    Harvester {
        endpoint: String,
    },
    Vmware {
        endpoint: String,
        datacenter: String,
    },
    Proxmox {
        endpoint: String,
    },
}

impl CredentialMaterial {
    pub fn provider(&self) -> ProviderId {
        match self {
            CredentialMaterial::Aws { .. } => ProviderId::Aws,
            CredentialMaterial::Azure { .. } => ProviderId::Azure,
            CredentialMaterial::Gcp { .. } => ProviderId::Gcp,
            CredentialMaterial::DigitalOcean { .. } => ProviderId::DigitalOcean,
            CredentialMaterial::Oracle { .. } => ProviderId::Oracle,
            CredentialMaterial::Hetzner { .. } => ProviderId::Hetzner,
            CredentialMaterial::Harvester { .. } => ProviderId::Harvester,
            CredentialMaterial::Vmware { .. } => ProviderId::Vmware,
            CredentialMaterial::Proxmox { .. } => ProviderId::Proxmox,
        }
    }

    /// Name of the first required field that is present but blank
    fn blank_field(&self) -> Option<&'static str> {
        let fields: Vec<(&'static str, &str)> = match self {
            CredentialMaterial::Aws { access_key_id } => vec![("access_key_id", access_key_id.as_str())],
            CredentialMaterial::Azure {
                subscription_id,
                tenant_id,
                client_id,
            } => vec![
                ("subscription_id", subscription_id.as_str()),
                ("tenant_id", tenant_id.as_str()),
                ("client_id", client_id.as_str()),
            ],
            CredentialMaterial::Gcp { project_id } => vec![("project_id", project_id.as_str())],
            CredentialMaterial::DigitalOcean { team } => vec![("team", team.as_str())],
            CredentialMaterial::Oracle {
                tenancy_ocid,
                user_ocid,
            } => vec![("tenancy_ocid", tenancy_ocid.as_str()), ("user_ocid", user_ocid.as_str())],
            CredentialMaterial::Hetzner { project } => vec![("project", project.as_str())],
            CredentialMaterial::Harvester { endpoint } | CredentialMaterial::Proxmox { endpoint } => {
                vec![("endpoint", endpoint.as_str())]
            }
            CredentialMaterial::Vmware {
                endpoint,
                datacenter,
            } => vec![("endpoint", endpoint.as_str()), ("datacenter", datacenter.as_str())],
        };
        fields
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
    }
}

/// Reference to provider authentication material, scoped to one provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    pub name: String,
    pub provider: ProviderId,
    pub is_default: bool,
    pub material: CredentialMaterial,
}

impl TryFrom<CredentialRecord> for Credential {
    type Error = Error;

    fn try_from(record: CredentialRecord) -> Result<Self, Self::Error> {
        let invalid = |message: String| Error::InvalidCredential {
            id: record.id.clone(),
            message,
        };

        let provider: ProviderId = record
            .provider
            .parse()
            .map_err(|_| invalid(format!("unknown provider '{}'", record.provider)))?;

        let mut details = match &record.details {
            serde_json::Value::Object(map) => map.clone(),
            serde_json::Value::Null => serde_json::Map::new(),
            other => return Err(invalid(format!("details must be an object, got {other}"))),
        };
        // The provider column is authoritative for the variant.
        details.insert(
            "kind".to_string(),
            serde_json::Value::String(provider.as_str().to_string()),
        );

        let material: CredentialMaterial =
            serde_json::from_value(serde_json::Value::Object(details))
                .map_err(|e| invalid(e.to_string()))?;

        if let Some(field) = material.blank_field() {
            return Err(invalid(format!("required field `{field}` is empty")));
        }

        Ok(Credential {
            id: record.id,
            name: record.name,
            provider,
            is_default: record.is_default,
            material,
        })
    }
}

/// External management server (e.g. a Rancher instance) a cluster can be registered with
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ManagerServer {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Credential for registering clusters with a management server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerCredential {
    pub id: String,
    pub name: String,
    pub server_id: String,
    #[serde(default)]
    pub is_default: bool,
}
