//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, security headers)
//! - Map gateway paths onto Gemini exchanges
//! - Serve until the shutdown notice arrives

use std::time::Duration;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, Request, StatusCode, Uri},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::gemini::{GeminiClient, GeminiRequest, GeminiResult};
use crate::http::pages;
use crate::http::request::{encode_query, parse_authority, request_id, CapsuleTarget, UuidRequestId};
use crate::http::response;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::security;

const LINK_REWRITE_JS: &str = include_str!("../../static/gemini_link_rewrite.js");

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub client: GeminiClient,
}

/// Query string accepted on capsule routes.
#[derive(Debug, Default, Deserialize)]
pub struct GatewayQuery {
    /// User input, forwarded as the protocol query.
    pub q: Option<String>,
}

/// HTTP front end for Gemini capsules.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server; fails only if the TLS client cannot be built.
    pub fn new(config: GatewayConfig) -> GeminiResult<Self> {
        let client = GeminiClient::from_config(&config.gemini)?;
        let router = Self::build_router(&config, AppState { client });
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/", get(index))
            .route(pages::LINK_REWRITE_SCRIPT, get(link_rewrite_script))
            .route("/favicon.ico", get(not_found))
            .route("/{authority}", get(add_trailing_slash))
            .route("/{authority}/", get(capsule))
            .route("/{authority}/{*path}", get(capsule))
            .fallback(not_found)
            .with_state(state);

        let router = if config.security.enable_headers {
            router.layer(middleware::from_fn(security::security_headers))
        } else {
            router
        };

        router
            .layer(middleware::from_fn(record_status))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Run the server until `shutdown_rx` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::notified(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

async fn index() -> Html<String> {
    Html(pages::index())
}

async fn link_rewrite_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        LINK_REWRITE_JS,
    )
}

async fn not_found() -> Response {
    let status = StatusCode::NOT_FOUND;
    (status, Html(pages::gateway_error(status, "not_found"))).into_response()
}

/// `/{authority}` → `/{authority}/`, keeping the query string.
async fn add_trailing_slash(uri: Uri) -> Response {
    let authority = uri.path().trim_start_matches('/');
    if parse_authority(authority).is_none() {
        return not_found().await;
    }
    let location = match uri.query() {
        Some(query) => format!("/{authority}/?{query}"),
        None => format!("/{authority}/"),
    };
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Perform one exchange for the capsule addressed by the request path.
async fn capsule(
    State(state): State<AppState>,
    Query(query): Query<GatewayQuery>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let request_id = request_id(&headers);
    let Some(target) = CapsuleTarget::from_gateway_path(uri.path()) else {
        tracing::debug!(request_id = %request_id, path = %uri.path(), "Not a capsule address");
        return not_found().await;
    };

    let mut request = GeminiRequest::new(target.host.clone(), target.path.clone()).port(target.port);
    if let Some(query) = query.q.as_deref().and_then(encode_query) {
        request = request.query(query);
    }

    tracing::debug!(
        request_id = %request_id,
        capsule = %target.authority(),
        path = %target.path,
        "Fetching capsule"
    );

    match state.client.request(&request).await {
        Ok(res) => response::from_gemini(&target, res),
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                capsule = %target.authority(),
                kind = e.kind(),
                error = %e,
                "Gemini exchange failed"
            );
            response::from_error(&e)
        }
    }
}

async fn record_status(req: Request<Body>, next: Next) -> Response {
    let response = next.run(req).await;
    metrics::record_http_response(response.status().as_u16());
    response
}
