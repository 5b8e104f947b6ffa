//! In-memory record store for tests and dry runs

use super::RecordStore;
use crate::error::{ExamError, ExamResult};
use crate::types::{ExamRecord, StoredRecord};
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<StoredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with already-stored rows (timestamps kept as given)
    pub fn with_records(records: Vec<StoredRecord>) -> Self {
        Self {
            rows: Mutex::new(records),
        }
    }

    fn rows(&self) -> ExamResult<MutexGuard<'_, Vec<StoredRecord>>> {
        self.rows
            .lock()
            .map_err(|_| ExamError::Store("memory store lock poisoned".to_string()))
    }
}

impl RecordStore for MemoryStore {
    fn replace_exam(&self, exam: &str, records: &[ExamRecord]) -> ExamResult<usize> {
        let created_at = Utc::now();
        let mut rows = self.rows()?;
        rows.retain(|r| r.exam_name != exam);
        rows.extend(records.iter().map(|r| StoredRecord::from_record(r, created_at)));
        Ok(records.len())
    }

    fn fetch_all(&self) -> ExamResult<Vec<StoredRecord>> {
        Ok(self.rows()?.clone())
    }
}
