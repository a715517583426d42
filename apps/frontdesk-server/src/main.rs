use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Router};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;

use httpkit::HttpClient;
use onboarding::config::OnboardingConfig;
use onboarding::domain::ports::{EstablishmentStore, IdentityProvider, NotificationSink};
use onboarding::domain::service::Service;
use onboarding::infra::auth::HttpIdentityProvider;
use onboarding::infra::notify::{WebhookSink, WhatsAppSink};
use onboarding::infra::store::HttpEstablishmentStore;
use runtime::{AppConfig, CliArgs};

mod request_id;

/// Request bodies larger than this are rejected before reaching a handler.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Frontdesk - establishment onboarding gateway
#[derive(Parser)]
#[command(name = "frontdesk-server")]
#[command(about = "Frontdesk - establishment onboarding gateway")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Frontdesk Onboarding API",
        description = "Establishment signup gateway"
    ),
    components(schemas(
        onboarding::api::rest::dto::SignupRequestDto,
        onboarding::api::rest::dto::SignupReceiptDto,
        onboarding::api::rest::dto::ValidationReportDto,
        onboarding::api::rest::dto::ValidatedDataDto,
        onboarding::api::rest::dto::FieldErrorDto,
        onboarding::api::rest::dto::CheckUserReq,
        onboarding::api::rest::dto::CheckUserDto,
        onboarding::api::rest::dto::EstablishmentDto,
        onboarding::api::rest::dto::EstablishmentLookupDto,
        httpkit::problem::Problem,
        httpkit::problem::FieldViolation,
    ))
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new("."));
    tracing::info!("Frontdesk server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

/// Wire the onboarding service from configuration.
fn build_service(config: &AppConfig) -> Result<Arc<Service>> {
    // Mandatory settings fail here, at startup, not per request.
    let onboarding_cfg: OnboardingConfig = config
        .module_config("onboarding")
        .context("onboarding module is not configured")?;

    let client = HttpClient::with_timeout(Duration::from_secs(config.http.timeout_sec))?;

    let identity: Arc<dyn IdentityProvider> = Arc::new(HttpIdentityProvider::new(
        client.clone(),
        &onboarding_cfg.store,
    )?);
    let store: Arc<dyn EstablishmentStore> = Arc::new(HttpEstablishmentStore::new(
        client.clone(),
        &onboarding_cfg.store,
    )?);

    let mut sinks: Vec<Arc<dyn NotificationSink>> = Vec::new();
    if let Some(webhook) = &onboarding_cfg.webhook {
        sinks.push(Arc::new(WebhookSink::new(client.clone(), webhook)?));
        tracing::info!("Webhook notifications enabled");
    }
    if let Some(whatsapp) = &onboarding_cfg.whatsapp {
        sinks.push(Arc::new(WhatsAppSink::new(client.clone(), whatsapp)?));
        tracing::info!("WhatsApp notifications enabled");
    }
    if sinks.is_empty() {
        tracing::warn!("No notification destinations configured");
    }

    Ok(Arc::new(Service::new(identity, store, sinks)))
}

/// Assemble the full router: health, OpenAPI document, onboarding routes,
/// and the middleware stack.
fn build_router(config: &AppConfig, service: Arc<Service>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/openapi.json", get(serve_openapi))
        .merge(onboarding::api::rest::routes::router(service))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_sec,
        )))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    if config.server.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    // Outermost: assign the request id first so the trace span can pick it
    // up, and echo it back on the response.
    router
        .layer(PropagateRequestIdLayer::new(request_id::header()))
        .layer(request_id::trace_layer())
        .layer(SetRequestIdLayer::new(
            request_id::header(),
            request_id::UuidRequestId,
        ))
}

async fn run_server(config: AppConfig) -> Result<()> {
    let service = build_service(&config)?;
    let router = build_router(&config, service);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

fn check_config(config: AppConfig) -> Result<()> {
    // Full wiring, including URL parsing of every configured destination.
    let _ = build_service(&config)?;
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Last-resort boundary: a panicking handler becomes a generic problem
/// document instead of a dropped connection. Panic text is logged only.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    use axum::response::IntoResponse;

    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Request handler panicked");

    httpkit::problem::internal_error("The request could not be processed").into_response()
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn serve_openapi() -> Json<Value> {
    Json(serde_json::to_value(ApiDoc::openapi()).unwrap_or_else(|_| json!({})))
}
