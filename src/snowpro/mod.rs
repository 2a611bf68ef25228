use crate::client::VerificationClient;
use crate::flow::platform::Destinations;
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::get,
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

pub mod handlers;
pub mod render;

use self::handlers::{health, instructor, reset_password, verify_email};
use self::render::Renderer;

/// Process-wide, read-only state shared by every page.
#[derive(Debug)]
pub struct AppState<C> {
    pub client: C,
    pub renderer: Renderer,
    pub destinations: Destinations,
    pub api_url: String,
}

impl<C: VerificationClient> AppState<C> {
    #[must_use]
    pub fn new(client: C, renderer: Renderer, destinations: Destinations) -> Self {
        Self {
            client,
            renderer,
            destinations,
            api_url: String::new(),
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// All page routes, without the request-id and tracing layers.
pub fn router<C: VerificationClient + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/health", get(health::health::<C>))
        .route("/instructors", get(instructor::instructor::<C>))
        .route("/instructors/:id", get(instructor::instructor::<C>))
        .route("/verify-email", get(verify_email::verify_email::<C>))
        .route(
            "/reset-password",
            get(reset_password::verify_token::<C>).post(reset_password::submit::<C>),
        )
        .layer(Extension(state))
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new<C: VerificationClient + 'static>(port: u16, state: Arc<AppState<C>>) -> Result<()> {
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

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {err}");
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

