//! Top-N rankings: single exam and averaged across exams

use crate::report::RankedRow;
use crate::types::StoredRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Which exams a ranking covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamSelection {
    All,
    Single(String),
}

impl ExamSelection {
    pub fn from_option(exam: Option<String>) -> Self {
        exam.map_or(ExamSelection::All, ExamSelection::Single)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Top `limit` records of one exam by overall score, dense rank 1..K
pub fn top_single_exam(records: &[StoredRecord], exam: &str, limit: usize) -> Vec<RankedRow> {
    let mut scored: Vec<(&StoredRecord, f64)> = records
        .iter()
        .filter(|r| r.exam_name == exam)
        .filter_map(|r| r.overall_score.map(|s| (r, s)))
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    scored
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (r, score))| RankedRow {
            rank: i + 1,
            student_id: r.student_id,
            name: r.full_name.clone(),
            class_label: r.class_label.clone(),
            exam_count: None,
            exam_scores: Vec::new(),
            average: Some(round2(score)),
        })
        .collect()
}

/// Uppercased name with runs of whitespace collapsed
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Key that merges one physical student across exam sittings: the student ID
/// when present, otherwise normalized name plus class label.
pub fn merge_key(record: &StoredRecord) -> String {
    match record.student_id {
        Some(id) => id.to_string(),
        None => format!(
            "{} | {}",
            normalize_name(&record.full_name),
            record.class_label.as_deref().unwrap_or("").trim()
        ),
    }
}

/// Most frequent value; ties go to the value seen most recently
pub fn mode_or_last<T: Clone + Eq + std::hash::Hash>(values: &[T]) -> Option<T> {
    let mut stats: HashMap<&T, (usize, usize)> = HashMap::new();
    for (pos, value) in values.iter().enumerate() {
        let entry = stats.entry(value).or_insert((0, pos));
        entry.0 += 1;
        entry.1 = pos;
    }
    stats
        .into_iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(a.1 .1.cmp(&b.1 .1)))
        .map(|(value, _)| value.clone())
}

/// Cross-exam columns and ranked rows
#[derive(Debug, Clone, PartialEq)]
pub struct CrossExamRanking {
    pub exam_names: Vec<String>,
    pub exam_columns: Vec<String>,
    pub rows: Vec<RankedRow>,
}

#[derive(Default)]
struct StudentGroup<'a> {
    records: Vec<&'a StoredRecord>,
}

/// Average-by-student ranking over every exam in `exam_order`.
///
/// Records without an overall score are ignored. Exam columns follow
/// canonical order, numbered among the exams that have any score.
pub fn top_across_exams(
    records: &[StoredRecord],
    exam_order: &[String],
    limit: usize,
) -> CrossExamRanking {
    let scored: Vec<&StoredRecord> = records.iter().filter(|r| r.overall_score.is_some()).collect();

    let mut key_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, StudentGroup> = HashMap::new();
    for &record in &scored {
        let key = merge_key(record);
        if !groups.contains_key(&key) {
            key_order.push(key.clone());
        }
        groups.entry(key).or_default().records.push(record);
    }

    let seen_exams: HashSet<&str> = scored.iter().map(|r| r.exam_name.as_str()).collect();
    let exam_names: Vec<String> = exam_order
        .iter()
        .filter(|e| seen_exams.contains(e.as_str()))
        .cloned()
        .collect();
    let exam_columns: Vec<String> = (1..=exam_names.len()).map(|i| format!("Exam #{i}")).collect();

    let mut rows: Vec<RankedRow> = key_order
        .iter()
        .filter_map(|key| groups.get(key))
        .map(|group| build_row(group, &exam_names))
        .collect();

    rows.sort_by(|a, b| {
        desc(a.average, b.average).then(b.exam_count.cmp(&a.exam_count))
    });
    rows.truncate(limit);
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }

    CrossExamRanking {
        exam_names,
        exam_columns,
        rows,
    }
}

fn build_row(group: &StudentGroup, exam_names: &[String]) -> RankedRow {
    let ids: Vec<i64> = group.records.iter().filter_map(|r| r.student_id).collect();
    let names: Vec<String> = group
        .records
        .iter()
        .map(|r| normalize_name(&r.full_name))
        .collect();
    let classes: Vec<String> = group
        .records
        .iter()
        .filter_map(|r| r.class_label.clone())
        .collect();
    let attended: HashSet<&str> = group.records.iter().map(|r| r.exam_name.as_str()).collect();

    let exam_scores: Vec<Option<f64>> = exam_names
        .iter()
        .map(|exam| {
            let scores: Vec<f64> = group
                .records
                .iter()
                .filter(|r| &r.exam_name == exam)
                .filter_map(|r| r.overall_score)
                .collect();
            if scores.is_empty() {
                None
            } else {
                Some(scores.iter().sum::<f64>() / scores.len() as f64)
            }
        })
        .collect();

    let present: Vec<f64> = exam_scores.iter().flatten().copied().collect();
    let average = if present.is_empty() {
        None
    } else {
        Some(round2(present.iter().sum::<f64>() / present.len() as f64))
    };

    RankedRow {
        rank: 0,
        student_id: mode_or_last(&ids),
        name: mode_or_last(&names).unwrap_or_default(),
        class_label: mode_or_last(&classes),
        exam_count: Some(attended.len()),
        exam_scores: exam_scores.into_iter().map(|s| s.map(round2)).collect(),
        average,
    }
}
