use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::contract::model::{
    EmailPresence, EstablishmentRecord, Identity, SignupReceipt, SignupRequest, ValidatedFields,
    ValidationReport,
};
use crate::domain::error::DomainError;
use crate::domain::ports::{
    EstablishmentStore, IdentityProvider, NotificationSink, ProviderError, SignupEvent,
};
use crate::domain::validate;

/// Domain service orchestrating the signup pipeline.
/// Depends only on the output ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn EstablishmentStore>,
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl Service {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn EstablishmentStore>,
        sinks: Vec<Arc<dyn NotificationSink>>,
    ) -> Self {
        Self {
            identity,
            store,
            sinks,
        }
    }

    /// Full signup pipeline: validate → duplicate check → create identity →
    /// insert record → dispatch notifications.
    ///
    /// The steps are strictly sequential; each depends on the previous
    /// result. Notifications are spawned and never awaited by this path.
    #[instrument(
        name = "onboarding.service.signup",
        skip(self, request),
        fields(email = tracing::field::Empty)
    )]
    pub async fn signup(&self, request: SignupRequest) -> Result<SignupReceipt, DomainError> {
        info!("Processing establishment signup");

        let data = validate::validate(&request).map_err(DomainError::validation)?;
        tracing::Span::current().record("email", tracing::field::display(&data.email));

        // Application-level duplicate pre-check. The read and the later
        // insert are not atomic; the store's unique violation on insert is
        // the authoritative signal for the racy window.
        let existing = self
            .store
            .find_by_email(&data.email)
            .await
            .map_err(|e| self.map_read_error(e))?;
        if !existing.is_empty() {
            debug!("Duplicate email found during pre-check");
            return Err(DomainError::duplicate_email(data.email));
        }

        let identity = self
            .identity
            .create_identity(&data.email, &data.password)
            .await
            .map_err(|e| Self::map_identity_error(e, &data.email))?;
        info!(identity_id = %identity.id, "Login identity created");

        let record = match self.store.insert(&data, &identity.id).await {
            Ok(record) => record,
            Err(ProviderError::UniqueViolation { message }) => {
                // Lost the race: another signup inserted the same email
                // between the pre-check and this insert.
                debug!(%message, "Insert hit the unique constraint");
                self.compensate_identity(&identity).await;
                return Err(DomainError::duplicate_email(data.email));
            }
            Err(ProviderError::Rejected { message }) | Err(ProviderError::Malformed { message }) => {
                error!(%message, identity_id = %identity.id, "Record insert rejected after identity creation");
                let rolled_back = self.compensate_identity(&identity).await;
                return Err(DomainError::store_rejected(message, identity.id, rolled_back));
            }
            Err(ProviderError::Unavailable { message }) => {
                error!(%message, identity_id = %identity.id, "Store unavailable after identity creation");
                let rolled_back = self.compensate_identity(&identity).await;
                return Err(DomainError::store_unavailable(message, identity.id, rolled_back));
            }
        };
        info!(record_id = %record.id, "Establishment record created");

        self.dispatch_notifications(SignupEvent::from_record(&record));

        Ok(SignupReceipt {
            identity_id: identity.id,
            record_id: record.id,
            name: record.name,
            company: record.company,
            email: record.email,
            created_at: record.created_at,
        })
    }

    /// Validation-only run: no side effects, always succeeds with a report.
    #[instrument(name = "onboarding.service.validate", skip_all)]
    pub async fn validate_only(&self, request: SignupRequest) -> ValidationReport {
        match validate::validate(&request) {
            Ok(data) => ValidationReport {
                is_valid: true,
                errors: Vec::new(),
                validated: Some(ValidatedFields::from(&data)),
            },
            Err(errors) => ValidationReport {
                is_valid: false,
                errors,
                validated: None,
            },
        }
    }

    /// Duplicate lookup by email. Idempotent: repeated calls with no
    /// intervening write return the same result.
    #[instrument(name = "onboarding.service.check_user", skip(self))]
    pub async fn check_user(&self, email: &str) -> Result<EmailPresence, DomainError> {
        let normalized = validate::normalize_email(email);
        let records = self
            .store
            .find_by_email(&normalized)
            .await
            .map_err(|e| self.map_read_error(e))?;
        Ok(EmailPresence {
            exists: !records.is_empty(),
            count: records.len(),
        })
    }

    /// Fetch establishments registered under an email.
    #[instrument(name = "onboarding.service.find_by_email", skip(self))]
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<EstablishmentRecord>, DomainError> {
        let normalized = validate::normalize_email(email);
        self.store
            .find_by_email(&normalized)
            .await
            .map_err(|e| self.map_read_error(e))
    }

    // --- helpers ---

    /// Compensating action for a failed record insert: delete the identity
    /// created a moment ago so it does not linger without a record.
    /// Returns whether the rollback succeeded.
    async fn compensate_identity(&self, identity: &Identity) -> bool {
        match self.identity.delete_identity(&identity.id).await {
            Ok(()) => {
                info!(identity_id = %identity.id, "Rolled back login identity after failed record insert");
                true
            }
            Err(e) => {
                error!(
                    identity_id = %identity.id,
                    email = %identity.email,
                    error = %e,
                    "Compensating identity delete failed; identity is orphaned"
                );
                false
            }
        }
    }

    /// Fire-and-forget fanout. Each sink runs on its own task; failures are
    /// logged and discarded so they can never delay or fail the response.
    fn dispatch_notifications(&self, event: SignupEvent) {
        for sink in &self.sinks {
            let sink = Arc::clone(sink);
            let event = event.clone();
            tokio::spawn(async move {
                if let Err(e) = sink.send(&event).await {
                    warn!(sink = sink.name(), error = %e, "Notification dispatch failed");
                }
            });
        }
    }

    /// Read-path provider failures are infrastructure errors, never
    /// validation errors: any non-success answer means the check could not
    /// be performed.
    fn map_read_error(&self, e: ProviderError) -> DomainError {
        error!(error = %e, "Store read failed");
        DomainError::upstream(e.to_string())
    }

    fn map_identity_error(e: ProviderError, email: &str) -> DomainError {
        match e {
            ProviderError::Rejected { message } if is_already_registered(&message) => {
                DomainError::duplicate_email(email)
            }
            ProviderError::Rejected { message } => DomainError::auth_rejected(message),
            ProviderError::UniqueViolation { .. } => DomainError::duplicate_email(email),
            ProviderError::Malformed { message } => {
                error!(%message, "Identity provider response could not be interpreted");
                DomainError::IdentityIdMissing
            }
            ProviderError::Unavailable { message } => {
                error!(%message, "Identity provider unavailable");
                DomainError::upstream(message)
            }
        }
    }
}

/// Providers phrase duplicate accounts in slightly different ways; any of
/// these means the email already has a login.
fn is_already_registered(message: &str) -> bool {
    let m = message.to_ascii_lowercase();
    m.contains("already registered") || m.contains("already exists") || m.contains("already been registered")
}
