use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Build the onboarding REST surface. The returned router is self-contained
/// and carries the service as an extension.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route(
            "/api/signup-establishment",
            post(handlers::signup_establishment),
        )
        .route(
            "/api/validate-establishment",
            post(handlers::validate_establishment),
        )
        .route("/api/check-user", post(handlers::check_user))
        .route(
            "/api/establishment/{email}",
            get(handlers::get_establishment),
        )
        .layer(Extension(service))
}
