//! Record store: exam-name keyed replacement and full-corpus fetch

pub mod cache;
pub mod locks;
pub mod memory;
pub mod sqlite;

pub use cache::CorpusCache;
pub use locks::ExamLocks;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::ExamResult;
use crate::types::{ExamRecord, StoredRecord};

/// Backing store for saved exam results.
///
/// Saving an exam replaces every row previously saved under the same exam
/// name. Two distinct exams sharing a name overwrite each other.
pub trait RecordStore: Send + Sync {
    /// Delete all rows of `exam`, then insert `records`; returns rows written
    fn replace_exam(&self, exam: &str, records: &[ExamRecord]) -> ExamResult<usize>;

    /// Every stored row in insertion order
    fn fetch_all(&self) -> ExamResult<Vec<StoredRecord>>;
}
