//! Time-bounded cache of the fetched corpus

use crate::error::{ExamError, ExamResult};
use crate::types::StoredRecord;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

struct Entry {
    fetched_at: Instant,
    records: Arc<Vec<StoredRecord>>,
}

/// Holds the last fetched corpus for `ttl`; [`CorpusCache::invalidate`] drops
/// it immediately (called after every successful save).
pub struct CorpusCache {
    ttl: Duration,
    entry: Mutex<Option<Entry>>,
}

impl CorpusCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Cached corpus if still fresh, otherwise `fetch` and remember the result.
    /// A failed fetch leaves the previous entry in place.
    pub fn get_or_fetch<F>(&self, fetch: F) -> ExamResult<Arc<Vec<StoredRecord>>>
    where
        F: FnOnce() -> ExamResult<Vec<StoredRecord>>,
    {
        let mut entry = self
            .entry
            .lock()
            .map_err(|_| ExamError::Store("corpus cache lock poisoned".to_string()))?;

        if let Some(cached) = entry.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&cached.records));
            }
        }

        let records = Arc::new(fetch()?);
        debug!(rows = records.len(), "refreshed corpus cache");
        *entry = Some(Entry {
            fetched_at: Instant::now(),
            records: Arc::clone(&records),
        });
        Ok(records)
    }

    pub fn invalidate(&self) {
        if let Ok(mut entry) = self.entry.lock() {
            *entry = None;
        }
    }
}
