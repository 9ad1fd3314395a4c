//! Contact form intake
//!
//! A submission is validated first, then written to the durable store
//! exactly once. There is no fallback: if the write fails, the caller gets
//! [`AppError::PersistenceUnavailable`].

use chrono::Utc;

use crate::database::DurableStore;
use crate::error::AppError;
use crate::model::{ContactMessage, ContactRequest};

/// Checks that every field is present and non-blank
///
/// Returns the message to persist, stamped with the current time.
pub fn validate(request: ContactRequest) -> Result<ContactMessage, AppError> {
    let mut missing = Vec::new();
    let mut take = |field: &'static str, value: Option<String>| -> String {
        match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            Some(v) => v,
            None => {
                missing.push(field);
                String::new()
            }
        }
    };

    let name = take("name", request.name);
    let email = take("email", request.email);
    let subject = take("subject", request.subject);
    let message = take("message", request.message);

    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    Ok(ContactMessage {
        name,
        email,
        subject,
        message,
        timestamp: Utc::now(),
    })
}

/// Validates and persists a contact submission
pub fn submit_contact(
    store: &dyn DurableStore,
    request: ContactRequest,
) -> Result<ContactMessage, AppError> {
    let message = validate(request)?;
    store.insert_contact(&message)?;

    tracing::info!("Contact message stored: {}", message.subject);
    Ok(message)
}
