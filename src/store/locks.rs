//! Per-exam-name save serialization

use crate::error::{ExamError, ExamResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One mutex per exam name. Saves of different exams never block each other.
#[derive(Debug, Default)]
pub struct ExamLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ExamLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, exam: &str) -> ExamResult<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| ExamError::Store("exam lock table poisoned".to_string()))?;
        Ok(locks.entry(exam.to_string()).or_default().clone())
    }

    /// Run `f` while holding the lock for `exam`
    pub fn with_lock<T>(&self, exam: &str, f: impl FnOnce() -> ExamResult<T>) -> ExamResult<T> {
        let handle = self.handle(exam)?;
        let _guard = handle
            .lock()
            .map_err(|_| ExamError::Store(format!("lock for exam '{exam}' poisoned")))?;
        f()
    }
}
