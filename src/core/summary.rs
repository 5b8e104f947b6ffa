//! Dashboard headline figures

use crate::types::StoredRecord;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    /// Distinct student names
    pub students: usize,
    pub average: Option<f64>,
    pub max: Option<f64>,
}

pub fn summarize(records: &[StoredRecord]) -> Kpis {
    let students = records
        .iter()
        .map(|r| r.full_name.as_str())
        .collect::<HashSet<_>>()
        .len();
    let scores: Vec<f64> = records.iter().filter_map(|r| r.overall_score).collect();

    let average = (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64);
    let max = scores.iter().copied().reduce(f64::max);

    Kpis {
        students,
        average,
        max,
    }
}
