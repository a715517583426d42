use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::OnboardingApi,
    error::OnboardingError,
    model::{EmailPresence, EstablishmentRecord, SignupReceipt, SignupRequest, ValidationReport},
};
use crate::domain::service::Service;

/// In-process implementation of the OnboardingApi trait that delegates to
/// the domain service. Domain errors are sanitized into contract errors at
/// this boundary.
pub struct OnboardingLocalClient {
    service: Arc<Service>,
}

impl OnboardingLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl OnboardingApi for OnboardingLocalClient {
    async fn signup(&self, request: SignupRequest) -> Result<SignupReceipt, OnboardingError> {
        self.service.signup(request).await.map_err(Into::into)
    }

    async fn validate(&self, request: SignupRequest) -> Result<ValidationReport, OnboardingError> {
        Ok(self.service.validate_only(request).await)
    }

    async fn check_user(&self, email: &str) -> Result<EmailPresence, OnboardingError> {
        self.service.check_user(email).await.map_err(Into::into)
    }

    async fn find_establishments(
        &self,
        email: &str,
    ) -> Result<Vec<EstablishmentRecord>, OnboardingError> {
        self.service.find_by_email(email).await.map_err(Into::into)
    }
}
