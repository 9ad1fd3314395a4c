//! Durable store: embedded database setup and the store abstraction
//!
//! Visits and contact messages are persisted to an embedded redb database.
//! Handlers never talk to redb directly; they go through [`DurableStore`], so
//! the service can run against an [`OfflineStore`] when the database cannot
//! be opened, and tests can substitute failing stores.

use std::sync::Arc;

use rand::{distr::Alphanumeric, Rng};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};

use crate::error::StoreError;
use crate::model::{ContactMessage, VisitRecord};

/// Visit records
///
/// Key: `"{timestamp_micros:020}:{suffix}"`, so key order is ingestion order
/// Value: JSON-serialized VisitRecord
///
/// Example:
/// - Key: "00001705501234567890:a9X2bQ"
/// - Value: '{"ip":"203.0.113.7","location":"Pune, India",...}'
pub const TABLE_VISITS: TableDefinition<&str, &str> = TableDefinition::new("visits_v1");

/// Contact form submissions, keyed the same way as [`TABLE_VISITS`]
pub const TABLE_CONTACTS: TableDefinition<&str, &str> = TableDefinition::new("contacts_v1");

/// Primary persistence for visits and contact messages
///
/// Implementations must be safe to share across request handlers.
pub trait DurableStore: Send + Sync {
    fn insert_visit(&self, record: &VisitRecord) -> Result<(), StoreError>;

    /// Total number of visits plus the `limit` most recent, newest first,
    /// read from a single consistent snapshot
    fn visit_summary(&self, limit: usize) -> Result<(u64, Vec<VisitRecord>), StoreError>;

    fn insert_contact(&self, message: &ContactMessage) -> Result<(), StoreError>;
}

/// Initializes the embedded database and creates required tables
///
/// # Arguments
///
/// * `db_path` - File path where the database should be stored (e.g., "portfolio.db")
///
/// # Example
///
/// ```no_run
/// # use portfolio::database::init_db;
/// let db = init_db("portfolio.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_VISITS)?;
        write_txn.open_table(TABLE_CONTACTS)?;
    }
    write_txn.commit()?;

    Ok(db)
}

/// Builds a chronologically sortable key for a record created at `micros`
///
/// The random suffix keeps keys unique when two records share a timestamp.
fn record_key(micros: i64) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    format!("{:020}:{}", micros.max(0), suffix)
}

/// [`DurableStore`] backed by a redb database
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    /// Opens (or creates) the database at `db_path`
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        Ok(Self::new(init_db(db_path)?))
    }

    /// Number of stored contact messages
    pub fn contact_count(&self) -> Result<u64, StoreError> {
        let count = || -> Result<u64, redb::Error> {
            let read_txn = self.db.begin_read()?;
            let table = read_txn.open_table(TABLE_CONTACTS)?;
            Ok(table.len()?)
        };

        Ok(count()?)
    }

    fn insert(
        &self,
        table_def: TableDefinition<&str, &str>,
        key: &str,
        value: &str,
    ) -> Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(table_def)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;

        Ok(())
    }

    fn read_visits(&self, limit: usize) -> Result<(u64, Vec<String>), redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_VISITS)?;

        let total = table.len()?;

        // Newest keys sort last
        let mut recent = Vec::with_capacity(limit);
        for entry in table.iter()?.rev().take(limit) {
            let (_, value) = entry?;
            recent.push(value.value().to_string());
        }

        Ok((total, recent))
    }
}

impl DurableStore for RedbStore {
    fn insert_visit(&self, record: &VisitRecord) -> Result<(), StoreError> {
        let value = serde_json::to_string(record)?;
        let key = record_key(record.timestamp.timestamp_micros());

        self.insert(TABLE_VISITS, &key, &value)?;
        Ok(())
    }

    fn visit_summary(&self, limit: usize) -> Result<(u64, Vec<VisitRecord>), StoreError> {
        let (total, raw) = self.read_visits(limit)?;

        let recent = raw
            .iter()
            .map(|value| serde_json::from_str::<VisitRecord>(value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, recent))
    }

    fn insert_contact(&self, message: &ContactMessage) -> Result<(), StoreError> {
        let value = serde_json::to_string(message)?;
        let key = record_key(message.timestamp.timestamp_micros());

        self.insert(TABLE_CONTACTS, &key, &value)?;
        Ok(())
    }
}

/// Store used when the database could not be opened at startup
///
/// Every operation fails with [`StoreError::Unavailable`].
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineStore;

impl DurableStore for OfflineStore {
    fn insert_visit(&self, _record: &VisitRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    fn visit_summary(&self, _limit: usize) -> Result<(u64, Vec<VisitRecord>), StoreError> {
        Err(StoreError::Unavailable)
    }

    fn insert_contact(&self, _message: &ContactMessage) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }
}
