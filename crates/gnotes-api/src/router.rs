//! Route table and middleware stack.

use std::any::Any;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::error::{ErrorBody, PANIC_MESSAGE};
use crate::handlers::{ai, notes, search, views};
use crate::state::AppState;

/// Request bodies above this are rejected.
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState, allowed_origins: Vec<HeaderValue>) -> Router {
    Router::new()
        .route("/", get(views::landing))
        .route("/notes", get(views::notes_view))
        .route("/analytics", get(views::analytics))
        .route("/health", get(views::health))
        .route("/api/v1/notes", get(notes::list_notes).post(notes::create_note))
        .route("/api/v1/notes/validate", post(notes::validate_note))
        .route(
            "/api/v1/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/api/v1/notes/:id/related", get(notes::related_notes))
        .route("/api/v1/notes/:id/summary", post(ai::summarize_note))
        .route("/api/v1/ai/title", post(ai::auto_title))
        .route("/api/v1/ai/expand", post(ai::expand_shorthand))
        .route("/api/v1/ai/status", get(ai::ai_status))
        .route("/api/v1/search", post(search::search))
        .route("/api/v1/search/debug", post(search::search_debug))
        .fallback(unknown_route)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .max_age(Duration::from_secs(3600)),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Unknown paths go back to the landing view.
async fn unknown_route() -> Redirect {
    Redirect::to("/")
}

/// Render a handler panic as a reload prompt.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!(subsystem = "api", panic = detail, "Handler panicked");

    let body = ErrorBody {
        error: PANIC_MESSAGE.to_string(),
        kind: "internal",
        retry: true,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
