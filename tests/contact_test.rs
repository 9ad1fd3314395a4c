//! Contact intake against the durable store

mod common;

use common::setup_state;
use portfolio::contact::submit_contact;
use portfolio::error::AppError;
use portfolio::model::ContactRequest;

fn request(message: &str) -> ContactRequest {
    ContactRequest {
        name: Some("Grace".into()),
        email: Some("grace@example.com".into()),
        subject: Some("Collaboration".into()),
        message: Some(message.into()),
    }
}

#[test]
fn test_contact_persisted() {
    let test = setup_state();

    let stored = submit_contact(test.state.store.as_ref(), request("Let's build something")).unwrap();

    assert_eq!(stored.subject, "Collaboration");
    assert_eq!(test.store.contact_writes(), 1);
    assert_eq!(test.store.inner().contact_count().unwrap(), 1);
}

#[test]
fn test_empty_message_rejected_before_persistence() {
    let test = setup_state();

    let err = submit_contact(test.state.store.as_ref(), request("")).unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(test.store.contact_writes(), 0);
}

#[test]
fn test_absent_fields_rejected_before_persistence() {
    let test = setup_state();

    let err = submit_contact(test.state.store.as_ref(), ContactRequest::default()).unwrap_err();

    match err {
        AppError::Validation(msg) => {
            assert_eq!(msg, "Missing required fields: name, email, subject, message")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(test.store.contact_writes(), 0);
}

#[test]
fn test_store_failure_surfaces_without_buffering() {
    let test = setup_state();
    test.store.set_failing(true);

    let err = submit_contact(test.state.store.as_ref(), request("Hello?")).unwrap_err();

    assert!(matches!(err, AppError::PersistenceUnavailable(_)));
    assert_eq!(err.status(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(test.store.contact_writes(), 1);

    // Nothing leaked into the visit fallback buffer, nothing stored
    assert_eq!(test.state.recorder.analytics().total_visits, 0);
    test.store.set_failing(false);
    assert_eq!(test.store.inner().contact_count().unwrap(), 0);
}
