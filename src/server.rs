//! HTTP surface: routes, CORS policy and error mapping.

use anyhow::{Context, Result};
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::config::{Config, CorsOrigins};
use crate::content::{ContentService, Language, Lesson, QuizQuestion};
use crate::error::ContentError;

/// Shared read-only state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub content: ContentService,
    pub root_message: Arc<str>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            content: ContentService::new(config.data_dir.clone()),
            root_message: Arc::from(config.root_message.as_str()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Request failure surfaced to the caller as a JSON error body
#[derive(Debug)]
pub enum ApiError {
    Content(ContentError),
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        ApiError::Content(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Content(err) => {
                error!("Content unavailable: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Identifier taken from the last path segment.
///
/// Never rejects: a segment that does not percent-decode to valid UTF-8 is
/// decoded lossily and still used as a lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for LookupId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(LookupId(id)),
            Err(rejection) => {
                debug!("Falling back to lossy path decoding: {}", rejection);
                let raw = parts.uri.path().rsplit('/').next().unwrap_or_default();
                Ok(LookupId(decode_segment_lossy(raw)))
            }
        }
    }
}

/// Percent-decode `raw`, replacing invalid UTF-8 with U+FFFD
pub fn decode_segment_lossy(raw: &str) -> String {
    let bytes = urlencoding::decode_binary(raw.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: state.root_message.to_string(),
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn languages(State(state): State<AppState>) -> Result<Json<Vec<Language>>, ApiError> {
    Ok(Json(state.content.languages().await?))
}

async fn lessons(
    State(state): State<AppState>,
    LookupId(language_id): LookupId,
) -> Result<Json<Vec<Lesson>>, ApiError> {
    Ok(Json(state.content.lessons(&language_id).await?))
}

async fn quiz(
    State(state): State<AppState>,
    LookupId(lesson_id): LookupId,
) -> Result<Json<Vec<QuizQuestion>>, ApiError> {
    Ok(Json(state.content.quiz(&lesson_id).await?))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}

/// Build the CORS layer for the configured origins.
///
/// Credentials are always allowed. Browsers reject `*` alongside credentials,
/// so wildcard mode mirrors the request's origin, method and headers instead.
pub fn cors_layer(origins: &CorsOrigins) -> Result<CorsLayer> {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::mirror_request(),
        CorsOrigins::List(list) => {
            let values = list
                .iter()
                .map(|origin| {
                    HeaderValue::from_str(origin)
                        .with_context(|| format!("Invalid CORS origin: {}", origin))
                })
                .collect::<Result<Vec<_>>>()?;
            AllowOrigin::list(values)
        }
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Assemble the application router
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/languages", get(languages))
        .route("/lessons/:language_id", get(lessons))
        .route("/quiz/:lesson_id", get(quiz))
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the router described by `config`
pub fn app(config: &Config) -> Result<Router> {
    let cors = cors_layer(&config.cors_origins)?;
    let state = AppState::from_config(config);
    info!("Serving content from {}", state.content.data_dir().display());
    Ok(router(state, cors))
}

/// Bind and serve until Ctrl+C or SIGTERM
pub async fn run(config: Config) -> Result<()> {
    let app = app(&config)?;

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
