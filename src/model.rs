//! Data models for the portfolio API
//!
//! This module defines the records persisted by the durable store, the
//! request payloads accepted by the analytics and contact endpoints, and the
//! JSON envelope every API response is wrapped in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder used wherever a visit attribute cannot be determined
pub const UNKNOWN: &str = "Unknown";

/// A single recorded page visit
///
/// Created once at ingestion and never mutated afterwards. Only `ip` is
/// mandatory; every other attribute degrades to [`UNKNOWN`] or is omitted.
///
/// # Example
/// ```json
/// {
///   "ip": "203.0.113.7",
///   "location": "Pune, India",
///   "city": "Pune",
///   "country": "India",
///   "platform": "Win32",
///   "userAgent": "Mozilla/5.0 ...",
///   "timestamp": "2026-01-17T13:40:00Z"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    /// Originating address as observed by the server (may be a forwarded list)
    pub ip: String,

    /// "City, Country", "Country" or "Unknown"
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Client-supplied platform hint
    pub platform: String,

    /// Raw `User-Agent` header value
    pub user_agent: String,

    /// Assigned by the server at ingestion time
    pub timestamp: DateTime<Utc>,
}

/// A contact form submission that passed validation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Request payload for `POST /api/analytics/visit`
///
/// The whole body is optional; the server reads the address and user agent
/// from the transport.
#[derive(Deserialize, Debug, Default)]
pub struct VisitRequest {
    pub platform: Option<String>,
}

/// Request payload for `POST /api/contact`
///
/// Every field is optional at the deserialization layer so that a missing
/// field surfaces as a validation error rather than a framework rejection.
///
/// # Example
/// ```json
/// {
///   "name": "Ada",
///   "email": "ada@example.com",
///   "subject": "Hello",
///   "message": "Loved the projects section"
/// }
/// ```
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Where an analytics answer was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsSource {
    Durable,
    Fallback,
}

/// Visit statistics returned by `GET /api/analytics`
///
/// Both metrics always come from the same [`AnalyticsSource`].
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_visits: u64,

    /// At most three records, most recent first
    pub last_visitors: Vec<VisitRecord>,

    #[serde(skip)]
    pub source: AnalyticsSource,
}

/// Successful response envelope carrying a payload
///
/// Serializes as `{"success": true, "data": ...}`.
#[derive(Serialize, Debug)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Successful response envelope carrying a human-readable message
#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
