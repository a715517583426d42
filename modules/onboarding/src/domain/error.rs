use thiserror::Error;

use crate::contract::error::OnboardingError;
use crate::contract::model::FieldError;

/// Domain-specific errors. Unlike the contract error, these carry full
/// diagnostic detail for server-side logging.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {errors:?}")]
    Validation { errors: Vec<FieldError> },

    #[error("Establishment with email '{email}' already exists")]
    DuplicateEmail { email: String },

    #[error("Identity provider rejected the signup: {message}")]
    AuthRejected { message: String },

    #[error("Identity provider reported success but returned no identity id")]
    IdentityIdMissing,

    #[error("Record insert failed: {message} (identity {identity_id}, rolled_back: {rolled_back})")]
    StoreRejected {
        message: String,
        identity_id: String,
        rolled_back: bool,
    },

    #[error("Store unavailable after identity creation: {message} (identity {identity_id}, rolled_back: {rolled_back})")]
    StoreUnavailable {
        message: String,
        identity_id: String,
        rolled_back: bool,
    },

    #[error("Upstream dependency failure: {message}")]
    Upstream { message: String },
}

impl DomainError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    pub fn auth_rejected(message: impl Into<String>) -> Self {
        Self::AuthRejected {
            message: message.into(),
        }
    }

    pub fn store_rejected(
        message: impl Into<String>,
        identity_id: impl Into<String>,
        rolled_back: bool,
    ) -> Self {
        Self::StoreRejected {
            message: message.into(),
            identity_id: identity_id.into(),
            rolled_back,
        }
    }

    pub fn store_unavailable(
        message: impl Into<String>,
        identity_id: impl Into<String>,
        rolled_back: bool,
    ) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            identity_id: identity_id.into(),
            rolled_back,
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }
}

impl From<DomainError> for OnboardingError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation { errors } => OnboardingError::Validation { errors },
            DomainError::DuplicateEmail { email } => OnboardingError::DuplicateEmail { email },
            DomainError::AuthRejected { message } => OnboardingError::Auth { message },
            DomainError::IdentityIdMissing => {
                OnboardingError::auth("identity provider returned no identity id")
            }
            DomainError::StoreRejected {
                message,
                identity_id,
                rolled_back,
            } => OnboardingError::Store {
                message,
                orphaned_identity: if rolled_back { None } else { Some(identity_id) },
            },
            DomainError::StoreUnavailable {
                identity_id,
                rolled_back,
                ..
            } => OnboardingError::Unavailable {
                orphaned_identity: if rolled_back { None } else { Some(identity_id) },
            },
            DomainError::Upstream { .. } => OnboardingError::Unavailable {
                orphaned_identity: None,
            },
        }
    }
}
