use crate::auth::RateLimiter;
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderName, HeaderValue, Request},
    response::Json,
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Duration};
use tokio::{net::TcpListener, task::JoinHandle, time::interval};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{debug, debug_span, info, Span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod handlers;
pub mod session;
pub mod state;

pub use state::{AdminConfig, AdminState};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::login::login,
        handlers::logout::logout,
        handlers::session::session,
    ),
    components(schemas(
        handlers::health::Health,
        handlers::login::LoginRequest,
        handlers::login::LoginResponse,
        handlers::session::SessionResponse,
        handlers::ErrorResponse,
    )),
    tags(
        (name = "admin", description = "Admin panel authentication"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Build the application router with the admin state attached.
#[must_use]
pub fn router(state: Arc<AdminState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/admin/login", post(handlers::login))
        .route("/api/admin/logout", post(handlers::logout))
        .route("/api/admin/session", get(handlers::session))
        .route("/api-docs/openapi.json", get(|| async { Json(openapi()) }))
        .layer(Extension(state))
}

/// Periodically drop expired rate-limit records so idle clients do not
/// accumulate for the life of the process.
pub fn spawn_sweeper(limiter: Arc<RateLimiter>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        // `interval` panics on a zero period.
        let mut ticker = interval(every.max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            let removed = limiter.sweep();
            if removed > 0 {
                debug!(removed, remaining = limiter.tracked_keys(), "Swept rate-limit records");
            }
        }
    })
}

/// Serve the admin API until ctrl-c.
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails
pub async fn new(
    port: u16,
    state: Arc<AdminState>,
    limiter: Arc<RateLimiter>,
    sweep_interval: Duration,
) -> Result<()> {
    let sweeper = spawn_sweeper(limiter, sweep_interval);

    let app = router(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span)),
    );

    let listener = TcpListener::bind(format!("::0:{port}"))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    sweeper.abort();

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let path = request.uri().path();
    let method = request.method().as_str();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    // Headers are left out: the admin cookie would end up in the logs.
    debug_span!("http-request", method, path, request_id)
}
