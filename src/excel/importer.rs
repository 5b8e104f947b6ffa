//! Excel importer: first worksheet of an `.xlsx` file → [`RawGrid`]

use crate::error::{ExamError, ExamResult};
use crate::types::{Cell, RawGrid};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads an exam export workbook into an untyped grid
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read the first worksheet. Only the first sheet is ever considered.
    pub fn read_grid(&self) -> ExamResult<RawGrid> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e| ExamError::Import(format!("Failed to open Excel file: {}", e)))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ExamError::Import("Workbook has no worksheets".to_string()))?
            .map_err(|e| ExamError::Import(format!("Failed to read worksheet: {}", e)))?;

        let grid = grid_from_range(&range);
        debug!(
            path = %self.path.display(),
            rows = grid.height(),
            columns = grid.width(),
            "read worksheet"
        );
        Ok(grid)
    }
}

/// Convert one calamine cell. Errors read as empty; booleans and ISO
/// date/duration strings read as text; Excel dates keep their serial number.
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Place every cell at its absolute sheet position.
///
/// Calamine ranges begin at the first used cell, so leading empty rows and
/// columns are restored before building the grid; "second row" must mean the
/// sheet's second row.
pub fn grid_from_range(range: &Range<Data>) -> RawGrid {
    let Some((top, left)) = range.start() else {
        return RawGrid::from_rows(Vec::new());
    };

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); top as usize];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; left as usize];
        cells.extend(row.iter().map(cell_from_data));
        rows.push(cells);
    }
    RawGrid::from_rows(rows)
}
