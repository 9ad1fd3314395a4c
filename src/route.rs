//! Route definitions for the portfolio API
//!
//! This module configures all HTTP routes and maps them to their respective
//! handlers, plus the cross-origin policy applied by the binary.

use std::time::Duration;

use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::config::{Config, Environment};
use crate::handler::{
    get_analytics, get_coding_profiles, get_contact_info, get_journey, get_personal,
    get_portfolio, get_projects, get_skills, handle_panic, not_found, record_visit, root,
    submit_contact,
};
use crate::state::AppState;

const DEV_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

/// Creates and configures the application router with all routes
///
/// # Route Definitions
///
/// - `GET /` - Service discovery document
/// - `GET /api/portfolio` - Complete profile bundle
/// - `GET /api/{personal,skills,journey,projects,coding-profiles}` - Bundle slices
/// - `GET /api/contact` - Contact details
/// - `POST /api/contact` - Contact form submission
/// - `GET /api/analytics` - Visit count and last three visitors
/// - `POST /api/analytics/visit` - Record a visit
///
/// Unknown routes answer 404 with the error envelope; handler panics answer
/// 500 with the same envelope.
///
/// # Example Usage
///
/// ```no_run
/// # use portfolio::config::Config;
/// # use portfolio::state::AppState;
/// # use portfolio::route::create_app;
/// let state = AppState::from_config(&Config::default()).unwrap();
/// let app = create_app(state);
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/portfolio", get(get_portfolio))
        .route("/personal", get(get_personal))
        .route("/skills", get(get_skills))
        .route("/journey", get(get_journey))
        .route("/projects", get(get_projects))
        .route("/coding-profiles", get(get_coding_profiles))
        .route("/contact", get(get_contact_info).post(submit_contact))
        .route("/analytics", get(get_analytics))
        .route("/analytics/visit", post(record_visit));

    Router::new()
        .route("/", get(root))
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Cross-origin policy
///
/// Development allows the local frontend dev servers. Production allows only
/// `FRONTEND_URL`; without it no cross-origin request is permitted.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = match config.environment {
        Environment::Development => DEV_ORIGINS
            .into_iter()
            .map(HeaderValue::from_static)
            .collect(),
        Environment::Production => match config.frontend_url.as_deref() {
            Some(url) => match HeaderValue::from_str(url) {
                Ok(origin) => vec![origin],
                Err(err) => {
                    warn!("Ignoring invalid FRONTEND_URL '{url}': {err}");
                    Vec::new()
                }
            },
            None => {
                warn!("FRONTEND_URL not set in production, cross-origin requests disabled");
                Vec::new()
            }
        },
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60))
}
