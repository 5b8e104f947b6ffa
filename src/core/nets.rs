//! Per-subject net scores (correct − incorrect / 3) from raw payloads

use crate::types::Measurement;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Penalty divisor applied to incorrect answers
pub const INCORRECT_PENALTY: f64 = 3.0;

fn count(payload: &Map<String, Value>, subject: &str, measurement: Measurement) -> f64 {
    let key = format!("{}_{}", subject, measurement.code());
    match payload.get(&key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn net(correct: f64, incorrect: f64) -> f64 {
    correct - incorrect / INCORRECT_PENALTY
}

/// Net score per subject, keyed (and so ordered) by subject name.
///
/// A subject is included when any of its correct/incorrect/blank keys is
/// present; a missing count counts as zero.
pub fn net_scores(payload: &Map<String, Value>) -> BTreeMap<String, f64> {
    let subjects: BTreeSet<String> = payload
        .keys()
        .filter_map(|k| Measurement::split_column(k).map(|(subject, _)| subject))
        .collect();

    subjects
        .into_iter()
        .map(|subject| {
            let correct = count(payload, &subject, Measurement::Correct);
            let incorrect = count(payload, &subject, Measurement::Incorrect);
            (subject, net(correct, incorrect))
        })
        .collect()
}
