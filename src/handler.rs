//! HTTP request handlers for the portfolio API
//!
//! This module implements:
//! - Read-only endpoints over the static profile bundle
//! - Visit recording and visitor analytics
//! - Contact form intake
//!
//! Every JSON response uses the `{success, data | message | error}` envelope.

use std::any::Any;
use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::{header::USER_AGENT, Extensions, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::contact;
use crate::error::AppError;
use crate::model::{ContactRequest, DataResponse, MessageResponse, VisitRequest, UNKNOWN};
use crate::state::AppState;

/// `GET /api/portfolio` - the complete profile bundle
pub async fn get_portfolio(State(state): State<AppState>) -> Response {
    Json(DataResponse::new(state.portfolio.as_ref())).into_response()
}

/// `GET /api/personal`
pub async fn get_personal(State(state): State<AppState>) -> Response {
    Json(DataResponse::new(&state.portfolio.personal)).into_response()
}

/// `GET /api/skills`
pub async fn get_skills(State(state): State<AppState>) -> Response {
    Json(DataResponse::new(&state.portfolio.skills)).into_response()
}

/// `GET /api/journey`
pub async fn get_journey(State(state): State<AppState>) -> Response {
    Json(DataResponse::new(&state.portfolio.journey)).into_response()
}

/// `GET /api/projects`
pub async fn get_projects(State(state): State<AppState>) -> Response {
    Json(DataResponse::new(&state.portfolio.projects)).into_response()
}

/// `GET /api/coding-profiles`
pub async fn get_coding_profiles(State(state): State<AppState>) -> Response {
    Json(DataResponse::new(&state.portfolio.coding_profiles)).into_response()
}

/// `GET /api/contact` - contact details and social links
pub async fn get_contact_info(State(state): State<AppState>) -> Response {
    Json(DataResponse::new(&state.portfolio.contact)).into_response()
}

/// Returns visitor analytics
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": { "totalVisits": 42, "lastVisitors": [...] }
/// }
/// ```
///
/// Served from the durable store when it is readable, otherwise from the
/// in-memory fallback buffer.
pub async fn get_analytics(State(state): State<AppState>) -> Response {
    let analytics = state.recorder.analytics();
    Json(DataResponse::new(analytics)).into_response()
}

/// Records a page visit
///
/// The originating address is taken from `X-Forwarded-For` when present,
/// otherwise from the socket peer. The body (`{"platform": "..."}`) is
/// optional and parsed leniently.
///
/// # Response
///
/// Always **200 OK** with `{"success": true, "message": "Visit recorded"}`,
/// whether the visit reached the durable store or the fallback buffer.
pub async fn record_visit(
    State(state): State<AppState>,
    headers: HeaderMap,
    extensions: Extensions,
    body: Bytes,
) -> Response {
    let address = remote_address(&headers, &extensions);
    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());
    let request: VisitRequest = serde_json::from_slice(&body).unwrap_or_default();

    let outcome = state
        .recorder
        .record_visit(&address, user_agent, request.platform.as_deref());
    tracing::debug!(
        "Visit recorded (durable: {}) from {}",
        outcome.is_durable(),
        outcome.record().location
    );

    Json(MessageResponse::new("Visit recorded")).into_response()
}

/// Accepts a contact form submission
///
/// # Response
///
/// - **200 OK** - message stored
/// - **400 Bad Request** - a field is missing/empty or the body is not JSON
/// - **503 Service Unavailable** - the durable store rejected the write
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    contact::submit_contact(state.store.as_ref(), request)?;

    Ok(Json(MessageResponse::new("Message sent successfully")).into_response())
}

/// `GET /` - service discovery document
pub async fn root() -> Response {
    Json(json!({
        "message": "Portfolio API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "portfolio": "/api/portfolio",
            "personal": "/api/personal",
            "skills": "/api/skills",
            "journey": "/api/journey",
            "projects": "/api/projects",
            "codingProfiles": "/api/coding-profiles",
            "contact": "/api/contact",
            "analytics": "/api/analytics",
        }
    }))
    .into_response()
}

/// Fallback for unknown routes
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Endpoint not found",
        })),
    )
        .into_response()
}

/// Turns a handler panic into the generic 500 envelope
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Unexpected(detail).into_response()
}

/// Raw `X-Forwarded-For` value, else the socket peer, else "Unknown"
fn remote_address(headers: &HeaderMap, extensions: &Extensions) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| {
            extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| UNKNOWN.to_string())
}
