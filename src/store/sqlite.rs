//! SQLite-backed record store

use super::RecordStore;
use crate::error::{ExamError, ExamResult};
use crate::types::{ExamRecord, StoredRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params_from_iter, Connection, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

const INSERT_COLUMNS: [&str; 8] = [
    "exam_name",
    "grade_tier",
    "student_id",
    "full_name",
    "class_label",
    "overall_score",
    "created_at",
    "payload",
];

pub const DEFAULT_CHUNK_SIZE: usize = 300;

/// Bound parameters allowed in one statement by the bundled SQLite
pub const MAX_BOUND_PARAMETERS: usize = 32_766;

/// Largest chunk whose multi-row INSERT stays within the parameter limit
pub const MAX_CHUNK_SIZE: usize = MAX_BOUND_PARAMETERS / INSERT_COLUMNS.len();

pub struct SqliteStore {
    conn: Mutex<Connection>,
    chunk_size: usize,
}

impl SqliteStore {
    /// Open (or create) a database file, creating parent directories
    pub fn open<P: AsRef<Path>>(path: P) -> ExamResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened record store");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> ExamResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> ExamResult<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Rows per INSERT statement, clamped to `1..=MAX_CHUNK_SIZE`
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        self
    }

    fn lock(&self) -> ExamResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ExamError::Store("record store connection lock poisoned".to_string()))
    }
}

fn init_schema(conn: &Connection) -> ExamResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS exam_results(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            exam_name TEXT NOT NULL,
            exam_date TEXT,
            grade_tier INTEGER,
            student_id INTEGER,
            full_name TEXT NOT NULL,
            class_label TEXT,
            overall_score REAL,
            created_at TEXT NOT NULL,
            payload TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_exam_results_exam ON exam_results(exam_name)",
        [],
    )?;
    Ok(())
}

fn insert_sql(rows: usize) -> String {
    let placeholders = format!("({})", vec!["?"; INSERT_COLUMNS.len()].join(", "));
    format!(
        "INSERT INTO exam_results ({}) VALUES {}",
        INSERT_COLUMNS.join(", "),
        vec![placeholders; rows].join(", ")
    )
}

fn record_values(record: &ExamRecord, created_at: &str) -> ExamResult<[Value; 8]> {
    let payload = serde_json::to_string(&record.payload)?;
    Ok([
        Value::Text(record.exam_name.clone()),
        record
            .grade_tier
            .map_or(Value::Null, |t| Value::Integer(i64::from(t))),
        record.student_id.map_or(Value::Null, Value::Integer),
        Value::Text(record.full_name.clone()),
        record
            .class_label
            .clone()
            .map_or(Value::Null, Value::Text),
        record.overall_score.map_or(Value::Null, Value::Real),
        Value::Text(created_at.to_string()),
        Value::Text(payload),
    ])
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<StoredRecord> {
    let created_at: String = row.get(6)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| conversion_error(6, e))?
        .with_timezone(&Utc);
    let payload: String = row.get(7)?;
    let payload = serde_json::from_str(&payload).map_err(|e| conversion_error(7, e))?;

    Ok(StoredRecord {
        exam_name: row.get(0)?,
        grade_tier: row.get(1)?,
        student_id: row.get(2)?,
        full_name: row.get(3)?,
        class_label: row.get(4)?,
        overall_score: row.get(5)?,
        created_at,
        payload,
    })
}

impl RecordStore for SqliteStore {
    fn replace_exam(&self, exam: &str, records: &[ExamRecord]) -> ExamResult<usize> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let deleted = tx.execute("DELETE FROM exam_results WHERE exam_name = ?1", [exam])?;

        let mut written = 0;
        for chunk in records.chunks(self.chunk_size) {
            let mut values = Vec::with_capacity(chunk.len() * INSERT_COLUMNS.len());
            for record in chunk {
                values.extend(record_values(record, &created_at)?);
            }
            written += tx.execute(&insert_sql(chunk.len()), params_from_iter(values.iter()))?;
        }

        tx.commit()?;
        info!(exam, deleted, written, "replaced exam results");
        Ok(written)
    }

    fn fetch_all(&self) -> ExamResult<Vec<StoredRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT exam_name, grade_tier, student_id, full_name, class_label,
                    overall_score, created_at, payload
             FROM exam_results
             ORDER BY id",
        )?;
        let rows = stmt.query_map([], read_row)?;
        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}
