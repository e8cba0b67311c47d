//! API Routes
//!
//! Router assembly plus the event and registration endpoints.

use axum::{
    extract::{Extension, State},
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::domain::{CurrentUser, OperationContext};
use crate::error::AppError;
use crate::handlers::{EventHandler, RegistrationHandler};
use crate::model::{EventCreate, EventPublic, EventRegistration, EventUpdate, Message, Page, Pagination};
use crate::repository::EventRepository;

use super::extract::{AppJson, AppPath, AppQuery};
use super::middleware::{auth_middleware, logging_middleware, require_user};
use super::{items, users};

// =========================================================================
// API Router
// =========================================================================

/// Create the API router (mounted under `/api/v1`)
pub fn create_router() -> Router<PgPool> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/", get(list_events).post(create_event))
        .route("/events/registered", get(list_registered_events))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/events/:id/register", post(register_for_event))
        .route("/events/:id/unregister", delete(unregister_from_event))
        .merge(users::router())
        .merge(items::router())
}

/// Build the full application: health check, versioned API and layers
pub fn build_app(pool: PgPool, cors_origins: &[String]) -> Router {
    // Order: request id -> trace -> logging -> auth -> handler
    let api = create_router()
        .layer(middleware::from_fn_with_state(pool.clone(), auth_middleware))
        .layer(middleware::from_fn(logging_middleware));

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(pool);

    match cors_layer(cors_origins) {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers(Any),
    )
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// =========================================================================
// Events
// =========================================================================

/// GET /events/
async fn list_events(
    State(pool): State<PgPool>,
    AppQuery(page): AppQuery<Pagination>,
) -> Result<Json<Page<EventPublic>>, AppError> {
    page.validate()?;

    let mut conn = pool.acquire().await?;
    let (events, count) = EventRepository::list(&mut conn, page.skip, page.limit).await?;

    Ok(Json(Page::new(events, count).map(EventPublic::from)))
}

/// GET /events/registered
async fn list_registered_events(
    State(pool): State<PgPool>,
    user: Option<Extension<CurrentUser>>,
) -> Result<Json<Page<EventPublic>>, AppError> {
    let user = require_user(user)?;

    let mut conn = pool.acquire().await?;
    let events = EventRepository::list_registered_by(&mut conn, user.id).await?;

    Ok(Json(Page::all(events).map(EventPublic::from)))
}

/// GET /events/:id
async fn get_event(
    State(pool): State<PgPool>,
    AppPath(event_id): AppPath<Uuid>,
) -> Result<Json<EventPublic>, AppError> {
    let mut conn = pool.acquire().await?;
    let event = EventRepository::find_by_id(&mut conn, event_id)
        .await?
        .ok_or(AppError::EventNotFound(event_id))?;

    Ok(Json(event.into()))
}

/// POST /events/
async fn create_event(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
    AppJson(input): AppJson<EventCreate>,
) -> Result<Json<EventPublic>, AppError> {
    let user = require_user(user)?;

    let event = EventHandler::new(pool).create(input, &user, &context).await?;

    Ok(Json(event.into()))
}

/// PUT /events/:id
async fn update_event(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
    AppPath(event_id): AppPath<Uuid>,
    AppJson(changes): AppJson<EventUpdate>,
) -> Result<Json<EventPublic>, AppError> {
    let user = require_user(user)?;

    let event = EventHandler::new(pool)
        .update(event_id, changes, &user, &context)
        .await?;

    Ok(Json(event.into()))
}

/// DELETE /events/:id
async fn delete_event(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
    AppPath(event_id): AppPath<Uuid>,
) -> Result<Json<Message>, AppError> {
    let user = require_user(user)?;

    EventHandler::new(pool)
        .delete(event_id, &user, &context)
        .await?;

    Ok(Json(Message::new("Event deleted successfully")))
}

// =========================================================================
// Registrations
// =========================================================================

/// POST /events/:id/register
async fn register_for_event(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
    AppPath(event_id): AppPath<Uuid>,
) -> Result<Json<EventRegistration>, AppError> {
    let user = require_user(user)?;

    let registration = RegistrationHandler::new(pool)
        .register(event_id, &user, &context)
        .await?;

    Ok(Json(registration))
}

/// DELETE /events/:id/unregister
async fn unregister_from_event(
    State(pool): State<PgPool>,
    Extension(context): Extension<OperationContext>,
    user: Option<Extension<CurrentUser>>,
    AppPath(event_id): AppPath<Uuid>,
) -> Result<Json<Message>, AppError> {
    let user = require_user(user)?;

    RegistrationHandler::new(pool)
        .unregister(event_id, &user, &context)
        .await?;

    Ok(Json(Message::new("Successfully unregistered from event")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://nobody@127.0.0.1:1/unused")
            .unwrap();
        build_app(pool, &[])
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_protected_routes_require_identity() {
        let event_id = Uuid::new_v4();
        let requests = vec![
            Request::get("/api/v1/events/registered").body(Body::empty()).unwrap(),
            Request::post(format!("/api/v1/events/{}/register", event_id))
                .body(Body::empty())
                .unwrap(),
            Request::delete(format!("/api/v1/events/{}/unregister", event_id))
                .body(Body::empty())
                .unwrap(),
            Request::delete(format!("/api/v1/events/{}", event_id))
                .body(Body::empty())
                .unwrap(),
            Request::get("/api/v1/users/me").body(Body::empty()).unwrap(),
            Request::get("/api/v1/items/").body(Body::empty()).unwrap(),
        ];

        for request in requests {
            let uri = request.uri().clone();
            let (status, body) = send(request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(body["error_code"], "not_authenticated");
        }
    }

    #[tokio::test]
    async fn test_create_event_without_identity() {
        let request = Request::post("/api/v1/events/")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"title":"Meetup","date":"2026-12-01T10:00:00Z","location":"Porto"}"#,
            ))
            .unwrap();

        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_events_rejects_negative_paging() {
        for uri in ["/api/v1/events/?skip=-1", "/api/v1/events?limit=-10"] {
            let (status, body) = send(Request::get(uri).body(Body::empty()).unwrap()).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
            assert_eq!(body["error_code"], "validation_error");
        }
    }

    #[tokio::test]
    async fn test_malformed_user_header() {
        let request = Request::get("/api/v1/events/registered")
            .header("x-request-user-id", "not-a-uuid")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "invalid_request");
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_user_updates_require_identity() {
        let requests = vec![
            json_request(
                "PATCH",
                &format!("/api/v1/users/{}", Uuid::new_v4()),
                r#"{"is_active":false}"#,
            ),
            json_request(
                "PATCH",
                "/api/v1/users/me/password",
                r#"{"current_password":"old-secret","new_password":"new-secret"}"#,
            ),
        ];

        for request in requests {
            let uri = request.uri().clone();
            let (status, body) = send(request).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(body["error_code"], "not_authenticated");
        }
    }

    #[tokio::test]
    async fn test_missing_json_field_uses_error_envelope() {
        let request = json_request("POST", "/api/v1/users/signup", r#"{"email":"a@b.co"}"#);

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["error_code"], "validation_error");
        assert!(body["details"].as_str().unwrap().contains("password"));
    }

    #[tokio::test]
    async fn test_malformed_json_uses_error_envelope() {
        let request = json_request("POST", "/api/v1/users/signup", "{not json");

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "invalid_request");
    }

    #[tokio::test]
    async fn test_malformed_id_uses_error_envelope() {
        let (status, body) = send(
            Request::get("/api/v1/events/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_code"], "validation_error");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_bad_query_uses_error_envelope() {
        let (status, body) = send(
            Request::get("/api/v1/events/?skip=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_code"], "validation_error");
    }

    #[test]
    fn test_cors_layer_requires_origins() {
        assert!(cors_layer(&[]).is_none());
        assert!(cors_layer(&["http://localhost:5173".to_string()]).is_some());
    }
}
