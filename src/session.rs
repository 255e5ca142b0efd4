//! Async wizard session
//!
//! Drives a [`WizardState`] against the backend collaborators. Cascade steps
//! run under the session lock; backend fetches run with the lock released, so
//! the user can keep editing while a fetch is in flight. A response is applied
//! only if its [`FetchTicket`](crate::wizard::FetchTicket) still matches the
//! state; late answers to a superseded selection are dropped.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::backend::{CredentialSource, ManagerDirectory};
use crate::catalog::ProviderId;
use crate::cluster::ClusterConfiguration;
use crate::error::Result;
use crate::wizard::WizardState;

#[derive(Clone)]
pub struct WizardSession {
    state: Arc<Mutex<WizardState>>,
    credentials: Arc<dyn CredentialSource>,
    managers: Arc<dyn ManagerDirectory>,
}

impl WizardSession {
    pub fn new(
        credentials: Arc<dyn CredentialSource>,
        managers: Arc<dyn ManagerDirectory>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(WizardState::new())),
            credentials,
            managers,
        }
    }

    /// Current state
    pub async fn snapshot(&self) -> WizardState {
        self.state.lock().await.clone()
    }

    /// Apply a synchronous cascade step; on error the state is unchanged
    pub async fn update(
        &self,
        step: impl FnOnce(&WizardState) -> Result<WizardState>,
    ) -> Result<WizardState> {
        let mut state = self.state.lock().await;
        let next = step(&state)?;
        *state = next.clone();
        Ok(next)
    }

    /// Select a provider and load its credentials
    ///
    /// A fetch failure leaves the credential list empty and is returned to the
    /// caller; the provider selection itself stands.
    pub async fn select_provider(&self, provider: ProviderId) -> Result<WizardState> {
        let ticket = {
            let mut state = self.state.lock().await;
            *state = state.select_provider(provider);
            state.credential_ticket()
        };
        let Some(ticket) = ticket else {
            return Ok(self.snapshot().await);
        };

        let fetched = self.credentials.credentials_for(provider).await;

        let mut state = self.state.lock().await;
        match fetched {
            Ok(credentials) => match state.apply_credentials(&ticket, credentials) {
                Some(next) => {
                    debug!(%provider, "applied credentials");
                    *state = next;
                }
                None => warn!(%provider, "discarding credentials for superseded provider selection"),
            },
            Err(e) => {
                warn!(%provider, error = %e, "failed to load credentials");
                return Err(e);
            }
        }
        Ok(state.clone())
    }

    /// Bind (or with `None`, unbind) a management server and load its credentials
    pub async fn select_manager_server(&self, server_id: Option<&str>) -> Result<WizardState> {
        let ticket = {
            let mut state = self.state.lock().await;
            *state = state.select_manager_server(server_id);
            state.manager_ticket()
        };
        let Some(ticket) = ticket else {
            return Ok(self.snapshot().await);
        };

        let fetched = futures::try_join!(
            self.managers.manager_server(&ticket.key),
            self.managers.manager_credentials(&ticket.key),
        );

        let mut state = self.state.lock().await;
        match fetched {
            Ok((server, credentials)) => match state.apply_manager(&ticket, server, credentials) {
                Some(next) => *state = next,
                None => warn!(
                    server_id = %ticket.key,
                    "discarding manager details for superseded selection"
                ),
            },
            Err(e) => {
                warn!(server_id = %ticket.key, error = %e, "failed to load manager details");
                return Err(e);
            }
        }
        Ok(state.clone())
    }

    /// Load a stored configuration into the session
    ///
    /// Static selections are replayed through the cascade; the credential and
    /// management-server bindings are re-fetched and restored when the backend
    /// still offers them.
    pub async fn resume(&self, config: &ClusterConfiguration) -> Result<WizardState> {
        let replayed = WizardState::from_configuration(config);
        let ticket = {
            let mut state = self.state.lock().await;
            *state = replayed;
            state.credential_ticket()
        };

        if let Some(ticket) = ticket {
            let credentials = self.credentials.credentials_for(config.provider).await?;
            let mut state = self.state.lock().await;
            if let Some(next) = state.apply_credentials(&ticket, credentials) {
                *state = next
                    .select_credential(&config.credential_id)
                    .unwrap_or_else(|e| {
                        debug!(error = %e, "stored credential no longer available");
                        next.clone()
                    });
            }
        }

        if let Some(binding) = &config.manager {
            let state = self.select_manager_server(Some(&binding.server_id)).await?;
            let restored = state.select_manager_credential(&binding.credential_id);
            if let Ok(next) = restored {
                *self.state.lock().await = next;
            }
        }

        Ok(self.snapshot().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::error::Error;
    use crate::wizard::{Credential, CredentialMaterial, CredentialRecord, ManagerCredential, ManagerServer};
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Notify;

    /// Answers AWS only after being released; every other provider immediately
    struct GatedCredentials {
        started: Notify,
        release: Notify,
    }

    fn credential(id: &str, provider: ProviderId, material: CredentialMaterial) -> Credential {
        Credential {
            id: id.to_string(),
            name: id.to_string(),
            provider,
            is_default: true,
            material,
        }
    }

    #[async_trait]
    impl CredentialSource for GatedCredentials {
        async fn credentials_for(&self, provider: ProviderId) -> Result<Vec<Credential>> {
            match provider {
                ProviderId::Aws => {
                    self.started.notify_one();
                    self.release.notified().await;
                    Ok(vec![credential(
                        "aws-1",
                        provider,
                        CredentialMaterial::Aws {
                            access_key_id: "AKIA".to_string(),
                        },
                    )])
                }
                ProviderId::Azure => Ok(vec![credential(
                    "az-1",
                    provider,
                    CredentialMaterial::Azure {
                        subscription_id: "s".to_string(),
                        tenant_id: "t".to_string(),
                        client_id: "c".to_string(),
                    },
                )]),
                _ => Err(Error::BackendError {
                    status: 503,
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_late_credentials_do_not_overwrite_newer_provider() {
        let gated = Arc::new(GatedCredentials {
            started: Notify::new(),
            release: Notify::new(),
        });
        let session = WizardSession::new(gated.clone(), Arc::new(MemoryBackend::new()));

        let slow = tokio::spawn({
            let session = session.clone();
            async move { session.select_provider(ProviderId::Aws).await }
        });
        gated.started.notified().await;

        let azure = session.select_provider(ProviderId::Azure).await.unwrap();
        assert_eq!(azure.cascade().credential_id.as_deref(), Some("az-1"));

        gated.release.notify_one();
        let after_slow = slow.await.unwrap().unwrap();

        assert_eq!(after_slow.cascade().provider, Some(ProviderId::Azure));
        assert_eq!(after_slow.cascade().credential_id.as_deref(), Some("az-1"));
        assert_eq!(session.snapshot().await.cascade(), azure.cascade());
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_list_empty() {
        let gated = Arc::new(GatedCredentials {
            started: Notify::new(),
            release: Notify::new(),
        });
        let session = WizardSession::new(gated, Arc::new(MemoryBackend::new()));
        assert!(session.select_provider(ProviderId::Gcp).await.is_err());
        let state = session.snapshot().await;
        assert_eq!(state.cascade().provider, Some(ProviderId::Gcp));
        assert!(state.cascade().credentials.is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_state_on_error() {
        let backend = Arc::new(MemoryBackend::new());
        let session = WizardSession::new(backend.clone(), backend);
        session.select_provider(ProviderId::Aws).await.unwrap();
        let before = session.snapshot().await;
        assert!(session.update(|s| s.select_region("westeurope")).await.is_err());
        assert_eq!(session.snapshot().await.cascade(), before.cascade());
    }

    #[tokio::test]
    async fn test_manager_binding_through_backend() {
        let backend = Arc::new(MemoryBackend::new());
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
        let session = WizardSession::new(backend.clone(), backend);

        let state = session.select_manager_server(Some("r1")).await.unwrap();
        assert_eq!(state.cascade().manager.credential_id.as_deref(), Some("t1"));
        assert!(session.select_manager_server(Some("nope")).await.is_err());

        let cleared = session.select_manager_server(None).await.unwrap();
        assert!(cleared.cascade().manager.credentials.is_empty());
        assert_eq!(cleared.cascade().manager.credential_id, None);
    }

    #[tokio::test]
    async fn test_resume_restores_credential() {
        let backend = Arc::new(MemoryBackend::new());
        for (id, default) in [("hz-1", true), ("hz-2", false)] {
            backend
                .add_credential(CredentialRecord {
                    id: id.to_string(),
                    name: id.to_string(),
                    provider: "hetzner".to_string(),
                    is_default: default,
                    details: json!({"project": "web"}),
                })
                .await;
        }
        let session = WizardSession::new(backend.clone(), backend);
        let state = session.select_provider(ProviderId::Hetzner).await.unwrap();
        let state = state.set_name("web-01").select_credential("hz-2").unwrap();
        let config = crate::cluster::assemble(&state).unwrap();

        let fresh = WizardSession::new(
            session.credentials.clone(),
            session.managers.clone(),
        );
        let resumed = fresh.resume(&config).await.unwrap();
        assert_eq!(resumed.cascade().credential_id.as_deref(), Some("hz-2"));
        assert_eq!(crate::cluster::assemble(&resumed).unwrap(), config);
    }
}
