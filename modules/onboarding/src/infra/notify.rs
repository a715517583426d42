//! Best-effort notification sinks: workflow webhook and WhatsApp gateway.
//!
//! Errors from these adapters are logged and discarded by the dispatcher;
//! nothing here may influence the main request outcome.

use anyhow::Context;
use async_trait::async_trait;
use httpkit::HttpClient;
use serde_json::json;
use tracing::instrument;
use url::Url;

use crate::config::{WebhookConfig, WhatsAppConfig};
use crate::domain::ports::{NotificationSink, ProviderError, SignupEvent};

/// Posts the signup event to a workflow-automation webhook.
pub struct WebhookSink {
    client: HttpClient,
    url: Url,
    token: Option<String>,
}

impl WebhookSink {
    pub fn new(client: HttpClient, cfg: &WebhookConfig) -> anyhow::Result<Self> {
        let url = Url::parse(&cfg.url)
            .with_context(|| format!("invalid webhook URL '{}'", cfg.url))?;
        Ok(Self {
            client,
            url,
            token: cfg.token.clone(),
        })
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    fn name(&self) -> &'static str {
        "webhook"
    }

    #[instrument(name = "onboarding.notify.webhook", skip_all)]
    async fn send(&self, event: &SignupEvent) -> Result<(), ProviderError> {
        let mut builder = self.client.post(self.url.as_str()).json(&json!({
            "event": "establishment.created",
            "record_id": event.record_id,
            "identity_id": event.identity_id,
            "name": event.name,
            "company": event.company,
            "phone": event.phone,
            "email": event.email,
            "created_at": event.created_at.to_rfc3339(),
        }));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = self
            .client
            .send(builder)
            .await
            .map_err(|e| ProviderError::unavailable(format!("webhook call failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ProviderError::rejected(format!(
                "webhook returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Sends a short text about the new signup through a WhatsApp gateway.
pub struct WhatsAppSink {
    client: HttpClient,
    base: Url,
    instance_id: String,
    token: String,
    notify_phone: String,
}

impl WhatsAppSink {
    pub fn new(client: HttpClient, cfg: &WhatsAppConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&cfg.base_url)
            .with_context(|| format!("invalid WhatsApp gateway URL '{}'", cfg.base_url))?;
        Ok(Self {
            client,
            base,
            instance_id: cfg.instance_id.clone(),
            token: cfg.token.clone(),
            notify_phone: cfg.notify_phone.clone(),
        })
    }

    fn send_text_url(&self) -> Result<Url, ProviderError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::malformed("WhatsApp gateway URL cannot be a base"))?
            .extend(["instances", &self.instance_id, "token", &self.token, "send-text"]);
        Ok(url)
    }
}

#[async_trait]
impl NotificationSink for WhatsAppSink {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    #[instrument(name = "onboarding.notify.whatsapp", skip_all)]
    async fn send(&self, event: &SignupEvent) -> Result<(), ProviderError> {
        let url = self.send_text_url()?;
        let message = format!(
            "New establishment signup: {} ({}) - {} / {}",
            event.name, event.company, event.email, event.phone
        );

        let response = self
            .client
            .send(self.client.post(url.as_str()).json(&json!({
                "phone": self.notify_phone,
                "message": message,
            })))
            .await
            .map_err(|e| ProviderError::unavailable(format!("whatsapp call failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ProviderError::rejected(format!(
                "whatsapp gateway returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
