//! API Middleware
//!
//! Identity resolution and request logging.

use axum::{
    body::Body,
    extract::{Extension, State},
    http::{header, HeaderMap, HeaderName, Request},
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{CurrentUser, OperationContext};
use crate::error::AppError;
use crate::repository::UserRepository;

/// Header carrying the authenticated user id, set by the upstream gateway
pub const REQUEST_USER_HEADER: &str = "x-request-user-id";

/// Header carrying the per-request id (set by `SetRequestIdLayer`)
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client-supplied correlation id, used when no request id is present
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

// =========================================================================
// Identity Middleware
// =========================================================================

/// Resolve `X-Request-User-Id` into a [`CurrentUser`] and build the
/// [`OperationContext`] for the request.
///
/// Requests without the header pass through anonymously; protected
/// handlers reject them via [`require_user`].
pub async fn auth_middleware(
    State(pool): State<PgPool>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let mut context =
        OperationContext::new().with_correlation_id(correlation_id(request.headers()));

    let user_header = request
        .headers()
        .get(REQUEST_USER_HEADER)
        .map(|v| v.to_str().ok().and_then(|s| Uuid::parse_str(s.trim()).ok()));

    if let Some(parsed) = user_header {
        let user_id = parsed.ok_or_else(|| {
            AppError::InvalidRequest("Invalid X-Request-User-Id header format".to_string())
        })?;

        let user = {
            let mut conn = pool.acquire().await?;
            UserRepository::find_by_id(&mut conn, user_id)
                .await?
                .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))?
        };

        if !user.is_active {
            tracing::warn!(user_id = %user_id, "Rejected request from inactive user");
            return Err(AppError::InactiveUser);
        }

        context = context.with_request_user(user.id);
        request.extensions_mut().insert(CurrentUser::from(user));
    }

    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// The caller on a protected route
pub fn require_user(user: Option<Extension<CurrentUser>>) -> Result<CurrentUser, AppError> {
    user.map(|Extension(user)| user).ok_or(AppError::Unauthorized)
}

/// Correlation id from the request id, the client header, or a fresh one
fn correlation_id(headers: &HeaderMap) -> Uuid {
    [REQUEST_ID_HEADER, CORRELATION_ID_HEADER]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|v| v.to_str().ok())
        .find_map(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4)
}

/// Credentials a client or proxy may forward. The user id header is not
/// secret and stays visible.
const REDACTED_HEADERS: [HeaderName; 3] = [
    header::AUTHORIZATION,
    header::PROXY_AUTHORIZATION,
    header::COOKIE,
];

/// Request headers as loggable pairs, credentials redacted
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if REDACTED_HEADERS.contains(name) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid utf8]")
            };
            (name.to_string(), shown.to_string())
        })
        .collect()
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let headers = mask_headers_for_logging(request.headers());

    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        version = ?version,
        request_id = ?request_id,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        request_id = ?request_id,
        "Request completed"
    );

    response
}
