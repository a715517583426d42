//! HTTP adapter for the hosted REST table store (PostgREST-style API).

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use httpkit::HttpClient;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use url::Url;

use crate::config::StoreConfig;
use crate::contract::model::{EstablishmentRecord, ValidatedSignup};
use crate::domain::ports::{EstablishmentStore, ProviderError};

/// Postgres unique-violation code as surfaced in the store's error body.
const UNIQUE_VIOLATION_CODE: &str = "23505";

/// Establishment store over the backend's `/rest/v1/{table}` endpoints.
/// All calls use the high-privilege service key; the table carries a unique
/// index on `email`, and its violation is the authoritative duplicate
/// signal.
pub struct HttpEstablishmentStore {
    client: HttpClient,
    base: Url,
    service_key: String,
    table: String,
}

/// Wire representation of one table row. The store assigns `id` (numeric or
/// uuid depending on the schema) and `created_at`.
#[derive(Debug, Deserialize)]
struct EstablishmentRow {
    id: serde_json::Value,
    name: String,
    company: String,
    phone: String,
    email: String,
    identity_id: String,
    created_at: DateTime<Utc>,
}

impl From<EstablishmentRow> for EstablishmentRecord {
    fn from(row: EstablishmentRow) -> Self {
        let id = match row.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        Self {
            id,
            name: row.name,
            company: row.company,
            phone: row.phone,
            email: row.email,
            identity_id: row.identity_id,
            created_at: row.created_at,
        }
    }
}

impl HttpEstablishmentStore {
    pub fn new(client: HttpClient, cfg: &StoreConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&cfg.base_url)
            .with_context(|| format!("invalid store base URL '{}'", cfg.base_url))?;
        Ok(Self {
            client,
            base,
            service_key: cfg.service_key.clone(),
            table: cfg.table.clone(),
        })
    }

    fn table_url(&self) -> Result<Url, ProviderError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::malformed("store base URL cannot be a base"))?
            .extend(["rest", "v1", &self.table]);
        Ok(url)
    }
}

#[async_trait]
impl EstablishmentStore for HttpEstablishmentStore {
    #[instrument(name = "onboarding.http.store.find_by_email", skip(self))]
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<EstablishmentRecord>, ProviderError> {
        let url = self.table_url()?;
        let filter = format!("eq.{email}");

        let response = self
            .client
            .send(
                self.client
                    .get(url.as_str())
                    .query(&[("select", "*"), ("email", filter.as_str())])
                    .header("apikey", &self.service_key)
                    .bearer_auth(&self.service_key),
            )
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            // Any non-success answer on the read path means the duplicate
            // check could not be performed at all.
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::unavailable(format!(
                "store read returned {status}: {}",
                error_message(&message)
            )));
        }

        let rows: Vec<EstablishmentRow> = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(format!("store read body: {e}")))?;

        Ok(rows.into_iter().map(EstablishmentRecord::from).collect())
    }

    #[instrument(name = "onboarding.http.store.insert", skip_all, fields(identity_id = %identity_id))]
    async fn insert(
        &self,
        signup: &ValidatedSignup,
        identity_id: &str,
    ) -> Result<EstablishmentRecord, ProviderError> {
        let url = self.table_url()?;

        let response = self
            .client
            .send(
                self.client
                    .post(url.as_str())
                    .header("apikey", &self.service_key)
                    .bearer_auth(&self.service_key)
                    // Ask the created representation back so the generated
                    // id and created_at are available.
                    .header("Prefer", "return=representation")
                    .json(&json!({
                        "name": signup.name,
                        "company": signup.company,
                        "phone": signup.phone,
                        "email": signup.email,
                        "identity_id": identity_id,
                    })),
            )
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            return Err(if status.as_u16() == 409 || has_unique_violation_code(&body) {
                ProviderError::unique_violation(message)
            } else if status.is_server_error() {
                ProviderError::unavailable(format!("store insert returned {status}: {message}"))
            } else {
                ProviderError::rejected(message)
            });
        }

        // The store answers an insert with an array of created rows.
        let mut rows: Vec<EstablishmentRow> = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(format!("store insert body: {e}")))?;

        match rows.pop() {
            Some(row) => Ok(EstablishmentRecord::from(row)),
            None => Err(ProviderError::malformed(
                "store insert returned no representation",
            )),
        }
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::unavailable(format!("store request timed out: {e}"))
    } else {
        ProviderError::unavailable(format!("store request failed: {e}"))
    }
}

/// The store reports failures as `{"message": ..., "code": ...}`.
fn error_message(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(s) = v.get("message").and_then(|m| m.as_str()) {
            return s.to_string();
        }
    }
    if body.is_empty() {
        "no error detail provided".to_string()
    } else {
        body.chars().take(200).collect()
    }
}

fn has_unique_violation_code(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("code").and_then(|c| c.as_str()).map(str::to_owned))
        .is_some_and(|code| code == UNIQUE_VIOLATION_CODE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_id_is_stringified_for_numeric_and_uuid_ids() {
        let numeric: EstablishmentRow = serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "Padaria Central",
            "company": "Padaria Central LTDA",
            "phone": "11912345678",
            "email": "maria@example.com",
            "identity_id": "ident-1",
            "created_at": "2026-01-02T03:04:05Z"
        }))
        .unwrap();
        assert_eq!(EstablishmentRecord::from(numeric).id, "42");

        let uuid: EstablishmentRow = serde_json::from_value(serde_json::json!({
            "id": "9f0d6f0e-0000-4000-8000-000000000000",
            "name": "Padaria Central",
            "company": "Padaria Central LTDA",
            "phone": "11912345678",
            "email": "maria@example.com",
            "identity_id": "ident-1",
            "created_at": "2026-01-02T03:04:05Z"
        }))
        .unwrap();
        assert_eq!(
            EstablishmentRecord::from(uuid).id,
            "9f0d6f0e-0000-4000-8000-000000000000"
        );
    }

    #[test]
    fn unique_violation_code_detection() {
        assert!(has_unique_violation_code(
            r#"{"code":"23505","message":"duplicate key value"}"#
        ));
        assert!(!has_unique_violation_code(
            r#"{"code":"42501","message":"permission denied"}"#
        ));
        assert!(!has_unique_violation_code("not json"));
    }
}
