use thiserror::Error;

use crate::contract::model::FieldError;

/// Errors that are safe to expose to other crates and, via the REST layer,
/// to clients. Upstream diagnostic detail never travels through this type;
/// it is logged where it occurs.
#[derive(Error, Debug, Clone)]
pub enum OnboardingError {
    #[error("Validation failed")]
    Validation { errors: Vec<FieldError> },

    #[error("An establishment with email '{email}' already exists")]
    DuplicateEmail { email: String },

    #[error("Identity provider rejected the signup: {message}")]
    Auth { message: String },

    #[error("Establishment record could not be stored: {message}")]
    Store {
        message: String,
        /// Set when the compensating identity delete also failed and a login
        /// identity now exists without an establishment record.
        orphaned_identity: Option<String>,
    },

    #[error("An upstream dependency is unavailable")]
    Unavailable {
        /// Set when the outage struck after identity creation and the
        /// compensating delete also failed.
        orphaned_identity: Option<String>,
    },
}

impl OnboardingError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }
}
