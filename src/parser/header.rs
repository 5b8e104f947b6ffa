//! Header reconstruction for three-band exam exports
//!
//! The sheet carries three stacked header rows above the data:
//!
//! ```text
//! row anchor-2 : group        (e.g. "Türkçe" spanning merged cells, "LGS")
//! row anchor-1 : subject      (e.g. "Türkçe", "Puan", "Dereceler")
//! row anchor   : measurement  ("Öğr.No", ..., "D", "Y", "N", "Sınıf", ...)
//! ```
//!
//! Merged cells arrive as one populated cell followed by blanks, so the group
//! and subject bands are forward-filled along the row before naming.

use super::columns::make_unique;
use super::taxonomy::*;
use crate::error::{ExamError, ExamResult};
use crate::types::{Cell, Measurement, RawGrid};
use serde::Serialize;
use tracing::{debug, warn};

/// Carry the last present value forward over absent slots, left to right
pub fn forward_fill<T: Clone>(values: &[Option<T>]) -> Vec<Option<T>> {
    let mut last: Option<T> = None;
    values
        .iter()
        .map(|value| {
            if value.is_some() {
                last = value.clone();
            }
            last.clone()
        })
        .collect()
}

/// The three header bands aligned to the grid's columns
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderBands {
    pub group: Vec<Option<String>>,
    pub subject: Vec<Option<String>>,
    pub measurement: Vec<Option<String>>,
}

impl HeaderBands {
    /// Extract the bands around `anchor`. Bands whose row lies above the
    /// top of the grid are empty.
    ///
    /// Only truly empty cells are absent. A whitespace-only cell is present
    /// as `""`, so forward-fill stops at it.
    pub fn extract(grid: &RawGrid, anchor: usize) -> Self {
        let band = |row: Option<usize>| -> Vec<Option<String>> {
            (0..grid.width())
                .map(|col| match row.and_then(|r| grid.get(r, col)) {
                    None | Some(Cell::Empty) => None,
                    Some(cell) => Some(cell.to_string().trim().to_string()),
                })
                .collect()
        };

        Self {
            group: forward_fill(&band(anchor.checked_sub(2))),
            subject: forward_fill(&band(anchor.checked_sub(1))),
            measurement: band(Some(anchor)),
        }
    }

    fn at(band: &[Option<String>], col: usize) -> &str {
        band.get(col).and_then(|v| v.as_deref()).unwrap_or("")
    }

    /// Semantic names for every column, disambiguated
    pub fn column_names(&self) -> Vec<String> {
        let names: Vec<String> = (0..self.measurement.len())
            .map(|j| match j {
                0 => STUDENT_ID_COLUMN.to_string(),
                1 => FULL_NAME_COLUMN.to_string(),
                2 => CLASS_COLUMN.to_string(),
                _ => column_name(
                    j,
                    Self::at(&self.group, j),
                    Self::at(&self.subject, j),
                    Self::at(&self.measurement, j),
                ),
            })
            .collect();
        make_unique(&names)
    }
}

/// Resolve the name of data column `j` (j >= 3) from its header triple
pub fn column_name(j: usize, group: &str, subject: &str, measurement: &str) -> String {
    if group.to_lowercase() == SCORE_GROUP_TOKEN && subject.to_lowercase() == SCORE_METRIC_TOKEN {
        return OVERALL_SCORE_COLUMN.to_string();
    }

    if subject.to_lowercase() == RANKINGS_TOKEN && RANK_CATEGORIES.contains(&measurement) {
        return format!("{RANK_PREFIX}_{measurement}");
    }

    if Measurement::from_code(measurement).is_some() {
        return format!("{subject}_{measurement}");
    }

    let base = if !subject.is_empty() {
        subject.to_string()
    } else if !group.is_empty() {
        group.to_string()
    } else {
        format!("{GENERIC_COLUMN}_{j}")
    };

    if measurement.is_empty() {
        base
    } else {
        format!("{base}_{measurement}")
    }
}

/// Clean table produced from a raw grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSheet {
    pub exam_name: String,
    #[serde(skip)]
    pub anchor_row: usize,
    pub columns: Vec<String>,
    #[serde(skip)]
    pub rows: Vec<Vec<Cell>>,
    #[serde(skip)]
    pub summary_rows: Vec<Vec<Cell>>,
}

impl ParsedSheet {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Exam name from the second row's first cell, falling back to the default
pub fn exam_name(grid: &RawGrid) -> String {
    grid.get(1, 0)
        .and_then(Cell::text)
        .unwrap_or_else(|| DEFAULT_EXAM_NAME.to_string())
}

/// Index of the first row whose first cell, trimmed, equals the anchor token
pub fn find_anchor(grid: &RawGrid) -> Option<usize> {
    (0..grid.height()).find(|&row| {
        grid.get(row, 0)
            .is_some_and(|cell| cell.to_string().trim() == ANCHOR_TOKEN)
    })
}

/// True when the identifier cell carries one of the summary markers
pub fn is_summary_row(row: &[Cell]) -> bool {
    let Some(first) = row.first() else {
        return false;
    };
    let text = first.to_string();
    SUMMARY_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Reconstruct headers, name columns and split data rows from summary rows
pub fn reconstruct(grid: &RawGrid) -> ExamResult<ParsedSheet> {
    let exam_name = exam_name(grid);

    let anchor_row = find_anchor(grid).ok_or_else(|| ExamError::MissingAnchor {
        token: ANCHOR_TOKEN.to_string(),
    })?;
    debug!(anchor_row, exam = %exam_name, "located header anchor");

    let bands = HeaderBands::extract(grid, anchor_row);
    let columns = bands.column_names();
    debug!(columns = columns.len(), "resolved column names");

    let mut rows = Vec::new();
    let mut summary_rows = Vec::new();
    for row in grid.rows().skip(anchor_row + 1) {
        if row.iter().all(Cell::is_blank) {
            continue;
        }
        if is_summary_row(row) {
            summary_rows.push(row.to_vec());
        } else {
            rows.push(row.to_vec());
        }
    }

    if !summary_rows.is_empty() {
        warn!(
            count = summary_rows.len(),
            exam = %exam_name,
            "excluded summary rows from import"
        );
    }

    Ok(ParsedSheet {
        exam_name,
        anchor_row,
        columns,
        rows,
        summary_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Cell {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::from(s)
        }
    }

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| text(c)).collect()
    }

    #[test]
    fn test_forward_fill_carries_last_value() {
        let filled = forward_fill(&[None, Some(1), None, None, Some(2), None]);
        assert_eq!(filled, vec![None, Some(1), Some(1), Some(1), Some(2), Some(2)]);
    }

    #[test]
    fn test_forward_fill_is_row_local() {
        let grid = RawGrid::from_rows(vec![
            row(&["", "", "", "Türkçe", ""]),
            row(&["", "", "", "", ""]),
            row(&["Öğr.No", "Ad", "Sınıf", "D", "Y"]),
        ]);
        let bands = HeaderBands::extract(&grid, 2);
        assert_eq!(bands.group[4], Some("Türkçe".to_string()));
        assert_eq!(bands.subject[4], None);
    }

    #[test]
    fn test_whitespace_header_cell_stops_forward_fill() {
        let grid = RawGrid::from_rows(vec![
            row(&["", "", "", "Sözel", "", ""]),
            vec![
                Cell::Empty,
                Cell::Empty,
                Cell::Empty,
                Cell::from("Türkçe"),
                Cell::Empty,
                Cell::from(" "),
            ],
            row(&["Öğr.No", "Ad", "Sınıf", "D", "Y", "D"]),
            row(&["1", "Ali", "8-A", "10", "2", "7"]),
        ]);
        let bands = HeaderBands::extract(&grid, 2);
        assert_eq!(bands.subject[4], Some("Türkçe".to_string()));
        assert_eq!(bands.subject[5], Some(String::new()));
        assert_eq!(
            bands.column_names(),
            vec!["OgrNo", "AdSoyad", "Sinif", "Türkçe_D", "Türkçe_Y", "_D"]
        );
    }

    #[test]
    fn test_column_name_overall_score_ignores_measurement() {
        assert_eq!(column_name(3, "LGS", "PUAN", "x"), "LGS_Puan");
        assert_eq!(column_name(3, "lgs", "Puan", ""), "LGS_Puan");
    }

    #[test]
    fn test_column_name_rank_categories() {
        assert_eq!(column_name(9, "", "Dereceler", "İlçe"), "Derece_İlçe");
        assert_eq!(column_name(9, "", "DERECELER", "Genel"), "Derece_Genel");
        // Unknown category falls through to the generic branch
        assert_eq!(column_name(9, "", "Dereceler", "Okul"), "Dereceler_Okul");
    }

    #[test]
    fn test_column_name_measurement_code_wins() {
        assert_eq!(column_name(4, "Sözel", "Türkçe", "D"), "Türkçe_D");
        assert_eq!(column_name(4, "Sayısal", "Matematik", "Y"), "Matematik_Y");
    }

    #[test]
    fn test_column_name_fallback_branch() {
        assert_eq!(column_name(5, "Grup", "Konu", "Oran"), "Konu_Oran");
        assert_eq!(column_name(5, "Grup", "", ""), "Grup");
        assert_eq!(column_name(5, "", "", ""), "Kolon_5");
        assert_eq!(column_name(5, "", "", "%"), "Kolon_5_%");
    }

    #[test]
    fn test_exam_name_defaults() {
        let grid = RawGrid::from_rows(vec![row(&["Okul"])]);
        assert_eq!(exam_name(&grid), "Deneme");

        let grid = RawGrid::from_rows(vec![row(&["Okul"]), row(&["  Deneme-3  "])]);
        assert_eq!(exam_name(&grid), "Deneme-3");
    }

    #[test]
    fn test_missing_anchor_is_fatal() {
        let grid = RawGrid::from_rows(vec![row(&["No", "Ad"]), row(&["1", "Ali"])]);
        let err = reconstruct(&grid).unwrap_err();
        assert!(matches!(err, ExamError::MissingAnchor { .. }));
        assert!(err.to_string().contains("Öğr.No"));
    }

    #[test]
    fn test_anchor_matches_padded_cell() {
        let grid = RawGrid::from_rows(vec![row(&["x"]), row(&["y"]), row(&["  Öğr.No  "])]);
        assert_eq!(find_anchor(&grid), Some(2));
    }

    #[test]
    fn test_anchor_on_first_row_has_empty_bands() {
        let grid = RawGrid::from_rows(vec![
            row(&["Öğr.No", "Ad", "Sınıf", "D"]),
            row(&["1", "Ali", "8-A", "5"]),
        ]);
        let sheet = reconstruct(&grid).unwrap();
        assert_eq!(sheet.columns, vec!["OgrNo", "AdSoyad", "Sinif", "_D"]);
        assert_eq!(sheet.rows.len(), 1);
    }
}
