//! Shared test fixtures

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::NamedTempFile;

use portfolio::database::{init_db, DurableStore, RedbStore};
use portfolio::error::StoreError;
use portfolio::geo::GeoLocator;
use portfolio::model::{ContactMessage, VisitRecord};
use portfolio::portfolio::PortfolioData;
use portfolio::state::AppState;

/// Durable store that can be switched into a failing mode and counts calls
pub struct SwitchableStore {
    inner: RedbStore,
    failing: AtomicBool,
    pub visit_writes: AtomicUsize,
    pub contact_writes: AtomicUsize,
}

impl SwitchableStore {
    pub fn new(inner: RedbStore) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
            visit_writes: AtomicUsize::new(0),
            contact_writes: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &RedbStore {
        &self.inner
    }

    pub fn contact_writes(&self) -> usize {
        self.contact_writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl DurableStore for SwitchableStore {
    fn insert_visit(&self, record: &VisitRecord) -> Result<(), StoreError> {
        self.visit_writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.insert_visit(record)
    }

    fn visit_summary(&self, limit: usize) -> Result<(u64, Vec<VisitRecord>), StoreError> {
        self.check()?;
        self.inner.visit_summary(limit)
    }

    fn insert_contact(&self, message: &ContactMessage) -> Result<(), StoreError> {
        self.contact_writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.insert_contact(message)
    }
}

/// A redb store on a temporary file
pub fn temp_store() -> (RedbStore, NamedTempFile) {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let db = init_db(temp_db.path().to_str().unwrap()).expect("Failed to initialize test database");
    (RedbStore::new(db), temp_db)
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<SwitchableStore>,
    _temp_db: NamedTempFile,
}

/// Application state over a switchable temp-file store
pub fn setup_state_with_capacity(capacity: usize) -> TestApp {
    let (inner, temp_db) = temp_store();
    let store = Arc::new(SwitchableStore::new(inner));

    let state = AppState::new(
        store.clone(),
        PortfolioData::embedded().unwrap(),
        GeoLocator::disabled(),
        capacity,
    );

    TestApp {
        state,
        store,
        _temp_db: temp_db,
    }
}

pub fn setup_state() -> TestApp {
    setup_state_with_capacity(1000)
}

/// Helper function to parse response body as JSON
pub async fn response_json(body: Body) -> Value {
    let bytes = body
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();

    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}
