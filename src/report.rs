//! Report data models
//!
//! Typed rows and chart-ready series consumed by the ranked-list and
//! per-student reports (terminal, API and `.xlsx` export).

use crate::core::trend::TrendVerdict;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Parallel x-labels and y-values for one chart
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One ranked student
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub rank: usize,
    pub student_id: Option<i64>,
    pub name: String,
    pub class_label: Option<String>,
    /// Distinct exams attended (cross-exam mode only)
    pub exam_count: Option<usize>,
    /// One slot per exam column (cross-exam mode only)
    pub exam_scores: Vec<Option<f64>>,
    /// Row average in cross-exam mode, the exam score in single-exam mode
    pub average: Option<f64>,
}

/// Top-N list for one grade tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedList {
    pub grade_tier: u32,
    pub title: String,
    /// Column headers for `exam_scores`, e.g. "Exam #1"
    pub exam_columns: Vec<String>,
    /// Exam names behind `exam_columns`, same order
    pub exam_names: Vec<String>,
    pub rows: Vec<RankedRow>,
}

impl RankedList {
    pub fn is_cross_exam(&self) -> bool {
        !self.exam_columns.is_empty()
    }
}

/// One line of a student's chronological score table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub exam_name: String,
    pub class_label: Option<String>,
    pub score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Everything the printable per-student summary shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentReport {
    pub name: String,
    pub grade_tier: u32,
    pub verdict: TrendVerdict,
    pub comment: String,
    pub history: Vec<HistoryRow>,
    pub score_chart: ChartSeries,
    /// Latest exam's net scores, highest first
    pub net_chart: ChartSeries,
}

/// Format a score with two decimals, `-` when absent
pub fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "-".to_string(), |s| format!("{s:.2}"))
}

/// Timestamp as shown in reports (`dd.mm.YYYY HH:MM`)
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%d.%m.%Y %H:%M").to_string()
}
