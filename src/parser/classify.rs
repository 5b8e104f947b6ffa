//! Row classification and type coercion

use super::grade::GradeTierExtractor;
use super::header::ParsedSheet;
use super::taxonomy::*;
use crate::error::ExamResult;
use crate::types::{Cell, ExamRecord, Measurement, SubjectCounts};
use serde_json::Value;
use std::collections::BTreeMap;

/// Column roles resolved once per sheet
#[derive(Debug)]
struct ColumnRoles {
    student_id: Option<usize>,
    full_name: Option<usize>,
    class_label: Option<usize>,
    overall_score: Option<usize>,
    measurements: Vec<(usize, String, Measurement)>,
}

impl ColumnRoles {
    fn resolve(sheet: &ParsedSheet) -> Self {
        let measurements = sheet
            .columns
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| {
                Measurement::split_column(name).map(|(subject, m)| (idx, subject, m))
            })
            .collect();

        Self {
            student_id: sheet.column_index(STUDENT_ID_COLUMN),
            full_name: sheet.column_index(FULL_NAME_COLUMN),
            class_label: sheet.column_index(CLASS_COLUMN),
            overall_score: sheet.column_index(OVERALL_SCORE_COLUMN),
            measurements,
        }
    }

    fn is_numeric(&self, idx: usize) -> bool {
        Some(idx) == self.student_id
            || Some(idx) == self.overall_score
            || self.measurements.iter().any(|(i, _, _)| *i == idx)
    }
}

/// Parse an identifier cell as an integer; fractional values truncate
pub fn coerce_int(cell: &Cell) -> Option<i64> {
    if let Cell::Text(s) = cell {
        if let Ok(n) = s.trim().parse::<i64>() {
            return Some(n);
        }
    }
    cell.as_f64().map(|n| n.trunc() as i64)
}

pub fn coerce_float(cell: &Cell) -> Option<f64> {
    cell.as_f64()
}

fn json_f64(value: Option<f64>) -> Value {
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Turns a clean table into typed exam records
pub struct RowClassifier {
    tiers: GradeTierExtractor,
}

impl RowClassifier {
    pub fn new() -> ExamResult<Self> {
        Ok(Self {
            tiers: GradeTierExtractor::new()?,
        })
    }

    /// Coerce every data row of `sheet`. A malformed cell becomes absent;
    /// it never aborts the batch.
    pub fn classify(&self, sheet: &ParsedSheet) -> Vec<ExamRecord> {
        let roles = ColumnRoles::resolve(sheet);
        sheet
            .rows
            .iter()
            .map(|row| self.classify_row(sheet, &roles, row))
            .collect()
    }

    fn classify_row(&self, sheet: &ParsedSheet, roles: &ColumnRoles, row: &[Cell]) -> ExamRecord {
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).cloned().unwrap_or_default();

        let student_id = coerce_int(&cell(roles.student_id));
        let full_name = cell(roles.full_name).text().unwrap_or_default();
        let class_label = cell(roles.class_label).text();
        let grade_tier = class_label.as_deref().and_then(|c| self.tiers.extract(c));
        let overall_score = roles.overall_score.and_then(|i| row.get(i)).and_then(coerce_float);

        let mut subjects: BTreeMap<String, SubjectCounts> = BTreeMap::new();
        let mut payload = serde_json::Map::new();

        for (idx, column) in sheet.columns.iter().enumerate() {
            let value = row.get(idx).cloned().unwrap_or_default();
            if !roles.is_numeric(idx) {
                payload.insert(column.clone(), value.to_json());
            }
        }

        for (idx, subject, measurement) in &roles.measurements {
            let value = row.get(*idx).and_then(coerce_float);
            subjects
                .entry(subject.clone())
                .or_default()
                .set(*measurement, value);
            payload.insert(sheet.columns[*idx].clone(), json_f64(value));
        }

        if let Some(idx) = roles.student_id {
            payload.insert(
                sheet.columns[idx].clone(),
                student_id.map(Value::from).unwrap_or(Value::Null),
            );
        }
        if let Some(idx) = roles.overall_score {
            payload.insert(sheet.columns[idx].clone(), json_f64(overall_score));
        }
        payload.insert(
            EXAM_NAME_COLUMN.to_string(),
            Value::String(sheet.exam_name.clone()),
        );
        payload.insert(
            GRADE_TIER_COLUMN.to_string(),
            grade_tier.map(Value::from).unwrap_or(Value::Null),
        );

        ExamRecord {
            student_id,
            full_name,
            class_label,
            grade_tier,
            exam_name: sheet.exam_name.clone(),
            overall_score,
            subjects,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sheet(columns: &[&str], rows: Vec<Vec<Cell>>) -> ParsedSheet {
        ParsedSheet {
            exam_name: "Deneme-1".to_string(),
            anchor_row: 2,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            summary_rows: Vec::new(),
        }
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int(&Cell::Number(123.0)), Some(123));
        assert_eq!(coerce_int(&Cell::from(" 77 ")), Some(77));
        assert_eq!(coerce_int(&Cell::from("12.0")), Some(12));
        assert_eq!(coerce_int(&Cell::from("abc")), None);
        assert_eq!(coerce_int(&Cell::Empty), None);
    }

    #[test]
    fn test_classify_typed_fields() {
        let sheet = sheet(
            &["OgrNo", "AdSoyad", "Sinif", "LGS_Puan", "Türkçe_D", "Türkçe_Y", "Türkçe_N"],
            vec![vec![
                Cell::Number(501.0),
                Cell::from("Ayşe Yılmaz"),
                Cell::from("8-A"),
                Cell::Number(455.25),
                Cell::Number(18.0),
                Cell::from("-"),
                Cell::Empty,
            ]],
        );
        let records = RowClassifier::new().unwrap().classify(&sheet);
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.student_id, Some(501));
        assert_eq!(r.full_name, "Ayşe Yılmaz");
        assert_eq!(r.class_label.as_deref(), Some("8-A"));
        assert_eq!(r.grade_tier, Some(8));
        assert_eq!(r.exam_name, "Deneme-1");
        assert_eq!(r.overall_score, Some(455.25));

        let turkce = r.subjects["Türkçe"];
        assert_eq!(turkce.correct, Some(18.0));
        assert_eq!(turkce.incorrect, None);
        assert_eq!(turkce.blank, None);

        assert_eq!(r.payload["Türkçe_Y"], Value::Null);
        assert_eq!(r.payload["Deneme"], Value::String("Deneme-1".to_string()));
        assert_eq!(r.payload["Kademe"], Value::from(8));
        assert_eq!(r.payload["OgrNo"], Value::from(501));
    }

    #[test]
    fn test_unparsable_id_and_score_are_absent() {
        let sheet = sheet(
            &["OgrNo", "AdSoyad", "Sinif", "LGS_Puan"],
            vec![vec![
                Cell::from("?"),
                Cell::from("Ali"),
                Cell::from("A-1"),
                Cell::from("girmedi"),
            ]],
        );
        let records = RowClassifier::new().unwrap().classify(&sheet);
        assert_eq!(records[0].student_id, None);
        assert_eq!(records[0].overall_score, None);
        assert_eq!(records[0].grade_tier, None);
    }

    #[test]
    fn test_missing_score_column_is_tolerated() {
        let sheet = sheet(
            &["OgrNo", "AdSoyad", "Sinif"],
            vec![vec![Cell::Number(1.0), Cell::from("Ali")]],
        );
        let records = RowClassifier::new().unwrap().classify(&sheet);
        assert_eq!(records[0].overall_score, None);
        assert_eq!(records[0].class_label, None);
        assert!(records[0].subjects.is_empty());
    }
}
