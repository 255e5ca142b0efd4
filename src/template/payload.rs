//! Query-string payload handed between wizard pages
//!
//! Node pools, add-ons and security options travel as JSON values inside a
//! URL-encoded query string. Decoding never fails: a missing or malformed entry
//! comes back as an empty list.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::form_urlencoded;

use crate::catalog::NodePool;
use crate::cluster::AddonSpec;
use crate::error::Result;

const NODE_POOLS: &str = "nodePools";
const ADDONS: &str = "addons";
const SECURITY_OPTIONS: &str = "securityOptions";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PagePayload {
    pub node_pools: Vec<NodePool>,
    pub addons: Vec<AddonSpec>,
    pub security_options: Vec<String>,
}

impl PagePayload {
    pub fn to_query(&self) -> Result<String> {
        Ok(form_urlencoded::Serializer::new(String::new())
            .append_pair(NODE_POOLS, &serde_json::to_string(&self.node_pools)?)
            .append_pair(ADDONS, &serde_json::to_string(&self.addons)?)
            .append_pair(SECURITY_OPTIONS, &serde_json::to_string(&self.security_options)?)
            .finish())
    }

    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut payload = PagePayload::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                NODE_POOLS => payload.node_pools = list(NODE_POOLS, &value),
                ADDONS => payload.addons = list(ADDONS, &value),
                SECURITY_OPTIONS => payload.security_options = list(SECURITY_OPTIONS, &value),
                other => debug!(key = other, "ignoring unknown payload key"),
            }
        }
        payload
    }
}

fn list<T: DeserializeOwned + Serialize>(key: &str, raw: &str) -> Vec<T> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        debug!(key, error = %e, "malformed payload entry, using empty list");
        Vec::new()
    })
}
