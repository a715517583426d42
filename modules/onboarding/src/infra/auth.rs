//! HTTP adapter for the hosted auth service (GoTrue-style API).

use anyhow::Context;
use async_trait::async_trait;
use httpkit::HttpClient;
use serde_json::json;
use tracing::instrument;
use url::Url;

use crate::config::StoreConfig;
use crate::contract::model::Identity;
use crate::domain::ports::{IdentityProvider, ProviderError};

/// Identity provider over the backend's `/auth/v1` endpoints.
///
/// Signup uses the low-privilege anon key; the compensating admin delete
/// requires the service key.
pub struct HttpIdentityProvider {
    client: HttpClient,
    base: Url,
    anon_key: String,
    service_key: String,
}

impl HttpIdentityProvider {
    pub fn new(client: HttpClient, cfg: &StoreConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&cfg.base_url)
            .with_context(|| format!("invalid store base URL '{}'", cfg.base_url))?;
        Ok(Self {
            client,
            base,
            anon_key: cfg.anon_key.clone(),
            service_key: cfg.service_key.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::malformed("auth base URL cannot be a base"))?
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    #[instrument(name = "onboarding.http.auth.create_identity", skip_all)]
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError> {
        let url = self.endpoint(&["auth", "v1", "signup"])?;

        let response = self
            .client
            .send(
                self.client
                    .post(url.as_str())
                    .header("apikey", &self.anon_key)
                    .bearer_auth(&self.anon_key)
                    .json(&json!({ "email": email, "password": password })),
            )
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = provider_message(&response.text().await.unwrap_or_default());
            return Err(if status.is_server_error() {
                ProviderError::unavailable(format!("auth signup returned {status}: {message}"))
            } else {
                ProviderError::rejected(message)
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(format!("auth signup body: {e}")))?;

        // The provider has been observed to answer with either a flat `id`
        // or a nested `user.id`.
        let id = body
            .get("id")
            .and_then(|v| v.as_str())
            .or_else(|| body.pointer("/user/id").and_then(|v| v.as_str()));

        match id {
            Some(id) if !id.is_empty() => Ok(Identity {
                id: id.to_string(),
                email: email.to_string(),
            }),
            _ => Err(ProviderError::malformed(
                "identity id missing from signup response",
            )),
        }
    }

    #[instrument(name = "onboarding.http.auth.delete_identity", skip(self))]
    async fn delete_identity(&self, identity_id: &str) -> Result<(), ProviderError> {
        let url = self.endpoint(&["auth", "v1", "admin", "users", identity_id])?;

        let response = self
            .client
            .send(
                self.client
                    .delete(url.as_str())
                    .header("apikey", &self.service_key)
                    .bearer_auth(&self.service_key),
            )
            .await
            .map_err(transport_error)?;

        let status = response.status();
        // Already gone counts as deleted: the compensation is idempotent.
        if status.is_success() || status.as_u16() == 404 {
            return Ok(());
        }

        let message = provider_message(&response.text().await.unwrap_or_default());
        Err(if status.is_server_error() {
            ProviderError::unavailable(format!("identity delete returned {status}: {message}"))
        } else {
            ProviderError::rejected(message)
        })
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::unavailable(format!("auth request timed out: {e}"))
    } else {
        ProviderError::unavailable(format!("auth request failed: {e}"))
    }
}

/// Pull a human-readable message out of a provider error body. The auth
/// service uses different keys depending on the failure class.
fn provider_message(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(s) = v.get(key).and_then(|m| m.as_str()) {
                return s.to_string();
            }
        }
    }
    if body.is_empty() {
        "no error detail provided".to_string()
    } else {
        body.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_prefers_known_keys() {
        assert_eq!(
            provider_message(r#"{"msg":"User already registered"}"#),
            "User already registered"
        );
        assert_eq!(
            provider_message(r#"{"error_description":"bad password"}"#),
            "bad password"
        );
        assert_eq!(provider_message("plain text"), "plain text");
        assert_eq!(provider_message(""), "no error detail provided");
    }
}
