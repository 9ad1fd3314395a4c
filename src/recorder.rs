//! Visit ingestion and analytics
//!
//! A visit is enriched with a coarse location, then written to the durable
//! store. If that write fails for any reason the record goes to the
//! [`FallbackBuffer`] instead; the caller is never told. Analytics reads
//! follow the same rule: durable store first, fallback buffer on failure,
//! never a mix of the two within one answer.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::database::DurableStore;
use crate::fallback::FallbackBuffer;
use crate::geo::GeoLocator;
use crate::model::{Analytics, AnalyticsSource, VisitRecord, UNKNOWN};

/// Number of records returned in [`Analytics::last_visitors`]
pub const RECENT_VISITORS: usize = 3;

/// Which persistence path accepted a visit
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOutcome {
    Durable(VisitRecord),
    Fallback(VisitRecord),
}

impl PersistOutcome {
    pub fn record(&self) -> &VisitRecord {
        match self {
            PersistOutcome::Durable(record) | PersistOutcome::Fallback(record) => record,
        }
    }

    pub fn is_durable(&self) -> bool {
        matches!(self, PersistOutcome::Durable(_))
    }
}

/// Hands out strictly increasing ingestion timestamps
///
/// Wall-clock time is used unless it would not advance past the previous
/// timestamp, in which case the previous value plus one microsecond is used.
#[derive(Debug, Default)]
struct IngestClock {
    last_micros: AtomicI64,
}

impl IngestClock {
    fn next(&self) -> DateTime<Utc> {
        let now = Utc::now().timestamp_micros();
        let previous = self
            .last_micros
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        let assigned = now.max(previous + 1);

        DateTime::from_timestamp_micros(assigned).unwrap_or_else(Utc::now)
    }
}

pub struct VisitRecorder {
    store: Arc<dyn DurableStore>,
    fallback: FallbackBuffer,
    geo: GeoLocator,
    clock: IngestClock,
}

impl VisitRecorder {
    pub fn new(store: Arc<dyn DurableStore>, geo: GeoLocator, fallback: FallbackBuffer) -> Self {
        Self {
            store,
            fallback,
            geo,
            clock: IngestClock::default(),
        }
    }

    /// Builds an enriched record for a visit observed now
    ///
    /// `remote_address` is stored verbatim. Missing user agent and empty
    /// platform hints become "Unknown".
    pub fn build_record(
        &self,
        remote_address: &str,
        user_agent: Option<&str>,
        platform: Option<&str>,
    ) -> VisitRecord {
        let geo = self.geo.lookup(remote_address);

        VisitRecord {
            ip: remote_address.to_string(),
            location: geo.location(),
            city: geo.city,
            country: geo.country,
            platform: non_empty_or_unknown(platform),
            user_agent: non_empty_or_unknown(user_agent),
            timestamp: self.clock.next(),
        }
    }

    /// Enriches and persists a visit
    pub fn record_visit(
        &self,
        remote_address: &str,
        user_agent: Option<&str>,
        platform: Option<&str>,
    ) -> PersistOutcome {
        let record = self.build_record(remote_address, user_agent, platform);
        self.persist_visit(record)
    }

    /// One durable write attempt, or one fallback append on failure
    pub fn persist_visit(&self, record: VisitRecord) -> PersistOutcome {
        match self.store.insert_visit(&record) {
            Ok(()) => {
                tracing::debug!("Visit from {} stored", record.ip);
                PersistOutcome::Durable(record)
            }
            Err(err) => {
                tracing::warn!("Durable store unavailable, buffering visit in memory: {err}");
                if self.fallback.append(record.clone()).is_some() {
                    tracing::debug!(
                        "Fallback buffer full ({}), dropped oldest visit",
                        self.fallback.capacity()
                    );
                }
                PersistOutcome::Fallback(record)
            }
        }
    }

    /// Total visits and the most recent few, from whichever store answers
    pub fn analytics(&self) -> Analytics {
        match self.store.visit_summary(RECENT_VISITORS) {
            Ok((total_visits, last_visitors)) => Analytics {
                total_visits,
                last_visitors,
                source: AnalyticsSource::Durable,
            },
            Err(err) => {
                tracing::warn!("Durable store unavailable, serving analytics from memory: {err}");
                let snapshot = self.fallback.snapshot(RECENT_VISITORS);
                Analytics {
                    total_visits: snapshot.len as u64,
                    last_visitors: snapshot.recent,
                    source: AnalyticsSource::Fallback,
                }
            }
        }
    }
}

fn non_empty_or_unknown(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}
