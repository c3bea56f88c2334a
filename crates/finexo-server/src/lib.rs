//! Finexo Web Server
//!
//! Axum-based REST API for the Finexo personal finance tracker.
//!
//! Security features:
//! - Bearer JWT authentication (secure by default, use --no-auth for local dev)
//! - Every record read and write is scoped to the authenticated user id
//! - Restrictive CORS policy
//! - Audit logging for all writes
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{debug, error, info, warn};

use finexo_core::db::Database;

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// User id used when authentication is disabled and no header names one
pub const LOCAL_DEV_USER: &str = "local-dev";

/// Header naming the acting user when authentication is disabled
pub const USER_ID_HEADER: &str = "x-user-id";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// HS256 secret that bearer tokens must be signed with
    pub jwt_secret: Option<String>,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            jwt_secret: None,
            allowed_origins: vec![],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// How the acting user was identified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Verified bearer token
    Jwt,
    /// Authentication disabled
    None,
}

/// The user every handler acts on behalf of, set by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub method: AuthMethod,
}

/// Claims read from a bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Expiry (seconds since epoch)
    pub exp: usize,
}

/// Verify an HS256 token and return its subject
pub fn verify_token(token: &str, secret: &str) -> Result<String, String> {
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| format!("JWT validation failed: {}", e))?;

    let sub = data.claims.sub.trim();
    if sub.is_empty() {
        return Err("JWT has an empty subject".to_string());
    }
    Ok(sub.to_string())
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Pick the acting user when authentication is disabled
fn local_user(headers: &HeaderMap) -> String {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(LOCAL_DEV_USER)
        .to_string()
}

/// Authentication middleware - resolves the acting user for every API request
///
/// With `require_auth`, the request must carry `Authorization: Bearer <jwt>`
/// signed with the configured secret; its `sub` claim is the user id.
/// Without it, the user comes from the `X-User-Id` header or falls back to
/// `local-dev`.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = if state.config.require_auth {
        let Some(secret) = state.config.jwt_secret.as_deref() else {
            error!("Authentication required but no JWT secret configured");
            return AppError::internal("Authentication is not configured").into_response();
        };

        let Some(token) = bearer_token(request.headers()) else {
            warn!(path = %request.uri().path(), "Unauthorized request - no token");
            return unauthorized("Token is missing");
        };

        match verify_token(token, secret) {
            Ok(user_id) => {
                debug!(user = %user_id, path = %request.uri().path(), "Authenticated via JWT");
                AuthUser {
                    user_id,
                    method: AuthMethod::Jwt,
                }
            }
            Err(e) => {
                warn!(error = %e, path = %request.uri().path(), "Invalid JWT");
                return unauthorized("Token is invalid or expired");
            }
        }
    } else {
        AuthUser {
            user_id: local_user(request.headers()),
            method: AuthMethod::None,
        }
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Message response
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET / - Health check
async fn health() -> &'static str {
    "Finexo API is running"
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    let api_routes = Router::new()
        // Auth
        .route("/me", get(handlers::get_me))
        // Analytics
        .route("/analytics/monthly", get(handlers::get_monthly_summary))
        .route("/analytics/timeline", get(handlers::get_timeline))
        .route("/analytics/daily", get(handlers::get_daily_breakdown))
        .route("/analytics/search", get(handlers::search_transactions))
        // Incomes
        .route(
            "/income",
            get(handlers::list_incomes).post(handlers::create_income),
        )
        .route(
            "/income/:id",
            put(handlers::update_income).delete(handlers::delete_income),
        )
        // Expenses
        .route(
            "/expense",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/expense/:id",
            put(handlers::update_expense).delete(handlers::delete_expense),
        )
        // Audit log
        .route("/audit", get(handlers::list_audit_log))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Build CORS layer
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let mut app = Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes);

    // The SPA owns "/" when it is served
    if static_dir.is_none() {
        app = app.route("/", get(health));
    }

    let mut app = app
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    } else if config.jwt_secret.is_none() {
        anyhow::bail!("Authentication is enabled but no JWT secret is configured");
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error, surfacing validation and lookup failures to the client
    pub fn from_core(err: finexo_core::Error) -> Self {
        match err {
            finexo_core::Error::InvalidData(msg) => Self::bad_request(&msg),
            finexo_core::Error::NotFound(msg) => Self::not_found(&msg),
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

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
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
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
