//! Exam export parsing: header reconstruction and row classification
//!
//! Data flows one way: [`RawGrid`] → [`header::reconstruct`] (clean table and
//! exam name) → [`classify::RowClassifier`] (typed records).

pub mod classify;
pub mod columns;
pub mod grade;
pub mod header;
pub mod taxonomy;

pub use classify::RowClassifier;
pub use columns::make_unique;
pub use grade::GradeTierExtractor;
pub use header::{forward_fill, reconstruct, HeaderBands, ParsedSheet};

use crate::error::ExamResult;
use crate::types::{ExamRecord, RawGrid};
use serde::Serialize;
use tracing::info;

/// One parsed upload: the clean table plus its typed records
#[derive(Debug, Clone, Serialize)]
pub struct ParsedExam {
    pub sheet: ParsedSheet,
    pub records: Vec<ExamRecord>,
}

impl ParsedExam {
    pub fn exam_name(&self) -> &str {
        &self.sheet.exam_name
    }

    pub fn summary_row_count(&self) -> usize {
        self.sheet.summary_rows.len()
    }
}

/// Run the full parse pipeline over a raw grid
pub fn parse_grid(grid: &RawGrid) -> ExamResult<ParsedExam> {
    let sheet = reconstruct(grid)?;
    let records = RowClassifier::new()?.classify(&sheet);
    info!(
        exam = %sheet.exam_name,
        records = records.len(),
        columns = sheet.columns.len(),
        "parsed exam export"
    );
    Ok(ParsedExam { sheet, records })
}
