use serde::{Deserialize, Serialize};

/// Configuration for the onboarding module.
///
/// The store section is mandatory: serving signup traffic without store
/// credentials would turn every request into a misleading 500, so extraction
/// fails at startup instead. Notification destinations are optional; an
/// absent section disables that sink silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OnboardingConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
    #[serde(default)]
    pub whatsapp: Option<WhatsAppConfig>,
}

/// Hosted backend-as-a-service: auth endpoint plus REST table storage under
/// one base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    pub base_url: String,
    /// Low-privilege key used for the auth signup call.
    pub anon_key: String,
    /// High-privilege key used for server-side reads/writes and the admin
    /// identity delete.
    pub service_key: String,
    #[serde(default = "default_table")]
    pub table: String,
}

/// Workflow-automation webhook destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookConfig {
    pub url: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// WhatsApp-sending gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    pub base_url: String,
    pub instance_id: String,
    pub token: String,
    /// Destination phone (digits only) that receives the signup notice.
    pub notify_phone: String,
}

fn default_table() -> String {
    "establishments".to_string()
}
