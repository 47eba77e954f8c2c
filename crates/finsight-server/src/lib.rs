//! Finsight Web Server
//!
//! Axum-based REST API for the Finsight financial wellbeing dashboard.
//!
//! - Profile listing and per-period snapshots with a rule-based summary
//! - Scenario simulation with local fallback
//! - Completion proxy for dashboards that hold their own snapshot
//! - Restrictive CORS policy unless origins are configured
//! - Sanitized error responses

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use finsight_core::{AIBackend, AIClient, Error as CoreError, ProfileStore};

mod handlers;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only, "*" = any origin)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub profiles: ProfileStore,
    pub ai: Option<AIClient>,
    pub config: ServerConfig,
}

/// Create the application router, with the AI backend taken from the environment
pub fn create_router(profiles: ProfileStore, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let ai = AIClient::from_env();
    match ai {
        Some(ref client) => info!(
            "AI backend configured: {} (model: {})",
            client.host(),
            client.model()
        ),
        None => info!("ℹ️  AI backend not configured (set OPENAI_API_KEY to enable AI scenarios)"),
    }
    create_router_with_options(profiles, static_dir, config, ai)
}

/// Create the application router with an explicit AI backend (for testing)
pub fn create_router_with_options(
    profiles: ProfileStore,
    static_dir: Option<&str>,
    config: ServerConfig,
    ai: Option<AIClient>,
) -> Router {
    let state = Arc::new(AppState {
        profiles,
        ai,
        config: config.clone(),
    });

    let api_routes = Router::new()
        .route("/profiles", get(handlers::list_profiles))
        .route("/snapshot", post(handlers::snapshot))
        .route("/simulate", post(handlers::simulate))
        .route(
            "/scenario-completion",
            post(handlers::scenario_completion).fallback(handlers::method_not_allowed),
        );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        cors
    } else if config.allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(AllowOrigin::any())
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Start the server
pub async fn serve_with_config(
    data_dir: PathBuf,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    let profiles = ProfileStore::new(data_dir);
    match profiles.list() {
        Ok(list) if list.is_empty() => warn!(
            "⚠️  No profiles found in {}",
            profiles.data_dir().join("profiles").display()
        ),
        Ok(list) => info!("Loaded {} profile(s)", list.len()),
        Err(e) => warn!("Failed to list profiles: {}", e),
    }

    check_ai_connection().await;

    let app = create_router(profiles, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection() {
    match AIClient::from_env() {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "✅ AI backend connected: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "⚠️  AI backend configured but not responding: {} (model: {}); scenarios will use the local fallback",
                    client.host(),
                    client.model()
                );
            }
        }
        None => {
            info!("ℹ️  AI backend not configured (set OPENAI_API_KEY to enable AI scenarios)");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            detail: None,
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    pub fn method_not_allowed(msg: &str) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Attach a client-visible detail string
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Map a core error to a status code; internals stay in the log
    pub fn from_core(err: CoreError) -> Self {
        match err {
            CoreError::UnknownPeriod(ref period) => {
                Self::bad_request(&format!("Unknown period: {}", period))
            }
            CoreError::NotFound(ref what) => Self::not_found(&format!("Not found: {}", what)),
            CoreError::InvalidData(ref msg) => Self::bad_request(msg),
            other => Self::from(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = match self.detail {
            Some(detail) => serde_json::json!({
                "error": self.message,
                "detail": detail
            }),
            None => serde_json::json!({
                "error": self.message
            }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            detail: None,
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
