use async_trait::async_trait;

use crate::contract::error::OnboardingError;
use crate::contract::model::{
    EmailPresence, EstablishmentRecord, SignupRequest, SignupReceipt, ValidationReport,
};

/// Public API trait for the onboarding module.
///
/// This in-process typed surface replaces the subprocess line-protocol tool
/// transport: callers invoke the same operations directly instead of
/// spawning a child process per call.
#[async_trait]
pub trait OnboardingApi: Send + Sync {
    /// Run the full signup pipeline: validate, duplicate check, identity
    /// creation, record insert, best-effort notifications.
    async fn signup(&self, request: SignupRequest) -> Result<SignupReceipt, OnboardingError>;

    /// Validate and normalize a submission without side effects.
    async fn validate(&self, request: SignupRequest) -> Result<ValidationReport, OnboardingError>;

    /// Check whether an establishment already exists for the given email.
    async fn check_user(&self, email: &str) -> Result<EmailPresence, OnboardingError>;

    /// Fetch the establishments registered under an email.
    async fn find_establishments(
        &self,
        email: &str,
    ) -> Result<Vec<EstablishmentRecord>, OnboardingError>;
}
