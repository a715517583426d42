use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::contract::model::{EstablishmentRecord, Identity, ValidatedSignup};

/// Provider-level failure, before domain interpretation.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// The provider understood and refused the request (4xx).
    #[error("provider rejected the request: {message}")]
    Rejected { message: String },

    /// The provider signalled a duplicate-key conflict.
    #[error("unique constraint violated: {message}")]
    UniqueViolation { message: String },

    /// The provider answered successfully but the response could not be
    /// interpreted (e.g. no identity id in a 200 body).
    #[error("malformed provider response: {message}")]
    Malformed { message: String },

    /// Transport failure, timeout, or a 5xx answer. Safe to retry.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },
}

impl ProviderError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn unique_violation(message: impl Into<String>) -> Self {
        Self::UniqueViolation {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Output port: the external auth service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a login identity for the email/password pair.
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ProviderError>;

    /// Delete an identity; the compensating action when the record insert
    /// that should reference it fails.
    async fn delete_identity(&self, identity_id: &str) -> Result<(), ProviderError>;
}

/// Output port: the external REST table store holding establishment records.
#[async_trait]
pub trait EstablishmentStore: Send + Sync {
    /// Exact-match read by normalized email. Zero rows means absent.
    async fn find_by_email(&self, email: &str)
        -> Result<Vec<EstablishmentRecord>, ProviderError>;

    /// Insert one record referencing the identity and return the created
    /// representation (so the generated id and timestamp are available).
    async fn insert(
        &self,
        signup: &ValidatedSignup,
        identity_id: &str,
    ) -> Result<EstablishmentRecord, ProviderError>;
}

/// Payload handed to notification sinks after a completed signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupEvent {
    pub record_id: String,
    pub identity_id: String,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl SignupEvent {
    pub fn from_record(record: &EstablishmentRecord) -> Self {
        Self {
            record_id: record.id.clone(),
            identity_id: record.identity_id.clone(),
            name: record.name.clone(),
            company: record.company.clone(),
            phone: record.phone.clone(),
            email: record.email.clone(),
            created_at: record.created_at,
        }
    }
}

/// Output port: a best-effort notification destination. Failures are logged
/// by the dispatcher and never reach the caller.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, event: &SignupEvent) -> Result<(), ProviderError>;
}
