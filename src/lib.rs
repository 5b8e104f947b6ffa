//! ExamTrack - exam result ingestion and analytics
//!
//! Turns school exam exports (a three-band header above an `Öğr.No` row) into
//! typed per-student records, stores one batch per exam, and derives the
//! views a school needs from the stored corpus.
//!
//! # Features
//!
//! - Header reconstruction with forward-filled merged cells and collision-free column names
//! - Grade tier extraction from class labels (`8-A` → 8)
//! - Idempotent per-exam saves to SQLite
//! - Top-N rankings (single exam or averaged across exams), trend verdicts,
//!   per-subject net scores and riser/faller comparisons
//! - Excel report export with charts
//!
//! # Example
//!
//! ```no_run
//! use examtrack::config::AppConfig;
//! use examtrack::core::ExamSelection;
//! use examtrack::tracker::Tracker;
//! use std::path::Path;
//!
//! let tracker = Tracker::open(AppConfig::default())?;
//! let parsed = tracker.parse_file(Path::new("deneme3.xlsx"))?;
//! tracker.save(&parsed)?;
//!
//! let list = tracker.rankings(8, &ExamSelection::All, None, None)?;
//! println!("{} students ranked", list.rows.len());
//! # Ok::<(), examtrack::error::ExamError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod parser;
pub mod report;
pub mod store;
pub mod tracker;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{ExamError, ExamResult};
pub use tracker::Tracker;
pub use types::{Cell, ExamRecord, RawGrid, StoredRecord};
