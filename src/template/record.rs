//! Persisted template rows

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::{CustomSize, NodeRole};
use crate::error::{Error, Result};
use crate::wizard::ValidationError;

/// Flat template row as stored by the hosted backend
///
/// Scalar selections are plain columns; node pools, add-ons, security options
/// and the manager binding are JSON columns. Every column other than `name` and
/// `provider` may be missing on rows written by older clients.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub provider: String,
    #[serde(default)]
    pub k8s_distribution: Option<String>,
    #[serde(default)]
    pub k8s_version: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub os_version: Option<String>,
    #[serde(default)]
    pub storage_engine: Option<String>,
    #[serde(default)]
    pub storage_version: Option<String>,
    #[serde(default)]
    pub node_pools: serde_json::Value,
    #[serde(default)]
    pub addons: serde_json::Value,
    #[serde(default)]
    pub security_options: serde_json::Value,
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default)]
    pub credential_id: Option<String>,
    #[serde(default)]
    pub manager: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Element of the `node_pools` JSON column
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolRecord {
    pub role: NodeRole,
    pub count: u32,
    #[serde(default)]
    pub vm_size: Option<String>,
    /// Null whenever `vm_size` is set
    #[serde(default)]
    pub custom_size: Option<CustomSize>,
}

/// Element of the `addons` JSON column; values files are reduced to a flag
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonRecord {
    pub id: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub has_custom_values: bool,
}

/// Rename or re-describe a stored template
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TemplatePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Error::ValidationError(vec![ValidationError::new(
                    "name",
                    "Template name must not be empty",
                    "Enter a name for the template.",
                )]));
            }
        }
        Ok(())
    }

    /// Patched copy of `record`; `record` itself is left untouched
    pub fn apply(&self, record: &TemplateRecord, now: DateTime<Utc>) -> Result<TemplateRecord> {
        self.validate()?;
        let mut updated = record.clone();
        if let Some(name) = &self.name {
            updated.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            updated.description = Some(description.clone());
        }
        updated.updated_at = Some(now);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sparse_row_deserializes() {
        let record: TemplateRecord = serde_json::from_value(json!({
            "id": "tpl-1",
            "name": "Legacy",
            "provider": "aws"
        }))
        .unwrap();
        assert_eq!(record.id.as_deref(), Some("tpl-1"));
        assert!(record.node_pools.is_null());
        assert_eq!(record.created_at, None);
    }

    #[test]
    fn test_patch_rejects_blank_name_without_mutating() {
        let record = TemplateRecord {
            name: "original".to_string(),
            provider: "gcp".to_string(),
            ..TemplateRecord::default()
        };
        let patch = TemplatePatch {
            name: Some("   ".to_string()),
            description: None,
        };
        assert!(patch.apply(&record, Utc::now()).is_err());
        assert_eq!(record.name, "original");
    }

    #[test]
    fn test_patch_bumps_updated_at() {
        let record = TemplateRecord {
            name: "original".to_string(),
            provider: "gcp".to_string(),
            ..TemplateRecord::default()
        };
        let now = Utc::now();
        let patch = TemplatePatch {
            name: Some("renamed".to_string()),
            description: Some("staging clusters".to_string()),
        };
        let updated = patch.apply(&record, now).unwrap();
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.description.as_deref(), Some("staging clusters"));
        assert_eq!(updated.updated_at, Some(now));
        assert!(!patch.is_empty());
        assert!(TemplatePatch::default().is_empty());
    }
}
