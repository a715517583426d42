//! Mapping of domain errors onto RFC 9457 problem responses.
//!
//! Upstream diagnostic detail stays in the server logs; clients only ever
//! see sanitized titles and machine-readable codes.

use axum::http::StatusCode;
use httpkit::problem::{FieldViolation, Problem, ProblemResponse};

use crate::domain::error::DomainError;

pub fn map_domain_error(error: &DomainError, instance: &str) -> ProblemResponse {
    match error {
        DomainError::Validation { errors } => Problem::new(
            StatusCode::BAD_REQUEST,
            "Validation Failed",
            "One or more fields are invalid",
        )
        .with_code("ONBOARDING_VALIDATION")
        .with_instance(instance)
        .with_errors(
            errors
                .iter()
                .map(|e| FieldViolation {
                    field: e.field.clone(),
                    message: e.message.clone(),
                })
                .collect(),
        )
        .into(),

        DomainError::DuplicateEmail { email } => Problem::new(
            StatusCode::CONFLICT,
            "Duplicate Email",
            format!("An establishment with email '{email}' is already registered"),
        )
        .with_code("ONBOARDING_DUPLICATE_EMAIL")
        .with_instance(instance)
        .into(),

        DomainError::AuthRejected { message } => Problem::new(
            StatusCode::BAD_REQUEST,
            "Signup Rejected",
            message.clone(),
        )
        .with_code("ONBOARDING_AUTH_REJECTED")
        .with_instance(instance)
        .into(),

        DomainError::IdentityIdMissing => Problem::new(
            StatusCode::BAD_REQUEST,
            "Signup Rejected",
            "The identity provider did not return a usable identity",
        )
        .with_code("ONBOARDING_AUTH_REJECTED")
        .with_instance(instance)
        .into(),

        DomainError::StoreRejected {
            message,
            identity_id,
            rolled_back,
        } => {
            let mut problem = Problem::new(
                StatusCode::BAD_REQUEST,
                "Record Creation Failed",
                message.clone(),
            )
            .with_code("ONBOARDING_STORE_REJECTED")
            .with_instance(instance);
            if !rolled_back {
                problem = problem.with_warning(format!(
                    "login identity {identity_id} was created but has no establishment record"
                ));
            }
            problem.into()
        }

        // Outage after identity creation: still a generic 500, but a failed
        // rollback must surface the orphan to the caller.
        DomainError::StoreUnavailable {
            identity_id,
            rolled_back,
            ..
        } => {
            let mut problem = Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "The signup could not be processed right now",
            )
            .with_code("ONBOARDING_INTERNAL")
            .with_instance(instance);
            if !rolled_back {
                problem = problem.with_warning(format!(
                    "login identity {identity_id} was created but has no establishment record"
                ));
            }
            problem.into()
        }

        // Infrastructure detail never reaches the client.
        DomainError::Upstream { .. } => Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "The signup could not be processed right now",
        )
        .with_code("ONBOARDING_INTERNAL")
        .with_instance(instance)
        .into(),
    }
}
