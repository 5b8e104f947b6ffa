use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

//==============================================================================
// Raw Spreadsheet Cells
//==============================================================================

/// One untyped spreadsheet cell, as read verbatim from a sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Empty cells and whitespace-only text both count as blank
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Trimmed text form, or None for a blank cell
    pub fn text(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        Some(self.to_string().trim().to_string())
    }

    /// Numeric value, parsing text when it holds a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// JSON form used in stored payloads (blank → null)
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Cell::Empty => serde_json::Value::Null,
            Cell::Text(s) if s.trim().is_empty() => serde_json::Value::Null,
            Cell::Text(s) => serde_json::Value::String(s.clone()),
            Cell::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

//==============================================================================
// Raw Grid
//==============================================================================

/// Headerless 2-D grid of cells with fully-empty columns removed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGrid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl RawGrid {
    /// Build a grid from ragged rows: pad to the widest row, then drop
    /// every column whose cells are all blank.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let full_width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let keep: Vec<usize> = (0..full_width)
            .filter(|&c| {
                rows.iter()
                    .any(|row| row.get(c).is_some_and(|cell| !cell.is_blank()))
            })
            .collect();

        let rows: Vec<Vec<Cell>> = rows
            .into_iter()
            .map(|row| {
                keep.iter()
                    .map(|&c| row.get(c).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Self {
            width: keep.len(),
            rows,
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

//==============================================================================
// Measurements
//==============================================================================

/// Per-subject measurement marker from the third header band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Measurement {
    Correct,
    Incorrect,
    Blank,
}

impl Measurement {
    pub const ALL: [Measurement; 3] = [
        Measurement::Correct,
        Measurement::Incorrect,
        Measurement::Blank,
    ];

    /// Single-letter code as printed in the sheet (D/Y/N)
    pub fn code(&self) -> &'static str {
        match self {
            Measurement::Correct => "D",
            Measurement::Incorrect => "Y",
            Measurement::Blank => "N",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.code() == code)
    }

    /// Split a column name like `Matematik_D` into (subject, measurement)
    pub fn split_column(name: &str) -> Option<(String, Measurement)> {
        let (subject, code) = name.rsplit_once('_')?;
        let measurement = Self::from_code(code)?;
        Some((subject.trim().to_string(), measurement))
    }
}

/// Raw correct/incorrect/blank counts for one subject
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectCounts {
    pub correct: Option<f64>,
    pub incorrect: Option<f64>,
    pub blank: Option<f64>,
}

impl SubjectCounts {
    pub fn set(&mut self, measurement: Measurement, value: Option<f64>) {
        match measurement {
            Measurement::Correct => self.correct = value,
            Measurement::Incorrect => self.incorrect = value,
            Measurement::Blank => self.blank = value,
        }
    }
}

//==============================================================================
// Exam Records
//==============================================================================

/// One student's typed result for one exam sitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub student_id: Option<i64>,
    pub full_name: String,
    pub class_label: Option<String>,
    pub grade_tier: Option<u32>,
    pub exam_name: String,
    pub overall_score: Option<f64>,
    pub subjects: BTreeMap<String, SubjectCounts>,
    /// Every original column value, nulls explicit
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// An exam record as materialized back from the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub exam_name: String,
    pub grade_tier: Option<u32>,
    pub student_id: Option<i64>,
    pub full_name: String,
    pub class_label: Option<String>,
    pub overall_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl StoredRecord {
    /// Attach a server-assigned creation timestamp to a parsed record
    pub fn from_record(record: &ExamRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            exam_name: record.exam_name.clone(),
            grade_tier: record.grade_tier,
            student_id: record.student_id,
            full_name: record.full_name.clone(),
            class_label: record.class_label.clone(),
            overall_score: record.overall_score,
            created_at,
            payload: record.payload.clone(),
        }
    }
}
