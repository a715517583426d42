use axum::{
    extract::Path,
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use tracing::{error, info};

use crate::api::rest::dto::{
    CheckUserDto, CheckUserReq, EstablishmentDto, EstablishmentLookupDto, SignupReceiptDto,
    SignupRequestDto, ValidationReportDto,
};
use crate::api::rest::error::map_domain_error;
use crate::domain::service::Service;

use httpkit::problem::ProblemResponse;

/// Full signup: validate, create the login identity, persist the record,
/// fan out notifications.
pub async fn signup_establishment(
    Extension(svc): Extension<std::sync::Arc<Service>>,
    uri: Uri,
    Json(req): Json<SignupRequestDto>,
) -> Result<(StatusCode, Json<SignupReceiptDto>), ProblemResponse> {
    info!("Received establishment signup");

    match svc.signup(req.into()).await {
        Ok(receipt) => Ok((StatusCode::CREATED, Json(SignupReceiptDto::from(receipt)))),
        Err(e) => {
            error!("Establishment signup failed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Dry-run validation: always answers 200 with a report, never writes.
pub async fn validate_establishment(
    Extension(svc): Extension<std::sync::Arc<Service>>,
    Json(req): Json<SignupRequestDto>,
) -> Json<ValidationReportDto> {
    let report = svc.validate_only(req.into()).await;
    Json(ValidationReportDto::from(report))
}

/// Duplicate-email lookup.
pub async fn check_user(
    Extension(svc): Extension<std::sync::Arc<Service>>,
    uri: Uri,
    Json(req): Json<CheckUserReq>,
) -> Result<Json<CheckUserDto>, ProblemResponse> {
    match svc.check_user(&req.email).await {
        Ok(presence) => Ok(Json(CheckUserDto::from(presence))),
        Err(e) => {
            error!("Email lookup failed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Fetch establishments registered under an email.
pub async fn get_establishment(
    Extension(svc): Extension<std::sync::Arc<Service>>,
    uri: Uri,
    Path(email): Path<String>,
) -> Result<Json<EstablishmentLookupDto>, ProblemResponse> {
    match svc.find_by_email(&email).await {
        Ok(records) => {
            let establishments: Vec<EstablishmentDto> =
                records.into_iter().map(EstablishmentDto::from).collect();
            Ok(Json(EstablishmentLookupDto {
                found: !establishments.is_empty(),
                establishments,
            }))
        }
        Err(e) => {
            error!("Establishment lookup for {} failed: {}", email, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
