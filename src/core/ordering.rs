//! Canonical exam order and corpus slicing helpers

use crate::types::StoredRecord;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

/// Exam names ordered by the earliest creation timestamp among their records.
///
/// Ties keep the order in which the exams were first encountered.
pub fn exam_order(records: &[StoredRecord]) -> Vec<String> {
    let mut first_seen: Vec<(&str, DateTime<Utc>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match index.get(record.exam_name.as_str()) {
            Some(&i) => {
                if record.created_at < first_seen[i].1 {
                    first_seen[i].1 = record.created_at;
                }
            }
            None => {
                index.insert(record.exam_name.as_str(), first_seen.len());
                first_seen.push((record.exam_name.as_str(), record.created_at));
            }
        }
    }

    first_seen.sort_by_key(|(_, at)| *at);
    first_seen.into_iter().map(|(name, _)| name.to_string()).collect()
}

/// Exam immediately before `exam` in canonical order
pub fn predecessor<'a>(order: &'a [String], exam: &str) -> Option<&'a str> {
    let pos = order.iter().position(|e| e == exam)?;
    pos.checked_sub(1).map(|p| order[p].as_str())
}

/// Sorted distinct grade tiers present in the corpus
pub fn grade_tiers(records: &[StoredRecord]) -> Vec<u32> {
    records
        .iter()
        .filter_map(|r| r.grade_tier)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct class labels
pub fn class_labels(records: &[StoredRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.class_label.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct full names
pub fn student_names(records: &[StoredRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.full_name.clone())
        .filter(|n| !n.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn for_tier(records: &[StoredRecord], tier: u32) -> Vec<StoredRecord> {
    records
        .iter()
        .filter(|r| r.grade_tier == Some(tier))
        .cloned()
        .collect()
}

/// Keep records whose class label is selected. `None` selects every
/// record that has a class label at all.
pub fn for_classes(records: &[StoredRecord], classes: Option<&[String]>) -> Vec<StoredRecord> {
    records
        .iter()
        .filter(|r| match (&r.class_label, classes) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(label), Some(selected)) => selected.contains(label),
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::record;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exam_order_by_first_seen_timestamp() {
        let records = vec![
            record("Deneme-2", "Ali", Some(400.0), 30),
            record("Deneme-1", "Ali", Some(380.0), 10),
            record("Deneme-2", "Veli", Some(410.0), 5),
            record("Deneme-3", "Ali", Some(420.0), 20),
        ];
        // Deneme-2 first appears at t=5
        assert_eq!(exam_order(&records), vec!["Deneme-2", "Deneme-1", "Deneme-3"]);
    }

    #[test]
    fn test_exam_order_ties_keep_encounter_order() {
        let records = vec![
            record("B", "Ali", None, 10),
            record("A", "Ali", None, 10),
        ];
        assert_eq!(exam_order(&records), vec!["B", "A"]);
    }

    #[test]
    fn test_predecessor() {
        let order = vec!["D1".to_string(), "D2".to_string()];
        assert_eq!(predecessor(&order, "D2"), Some("D1"));
        assert_eq!(predecessor(&order, "D1"), None);
        assert_eq!(predecessor(&order, "D9"), None);
    }

    #[test]
    fn test_class_filter_excludes_absent_labels() {
        let mut a = record("D1", "Ali", Some(1.0), 0);
        a.class_label = Some("8-A".to_string());
        let mut b = record("D1", "Veli", Some(1.0), 0);
        b.class_label = None;
        let mut c = record("D1", "Can", Some(1.0), 0);
        c.class_label = Some("8-B".to_string());
        let records = vec![a, b, c];

        assert_eq!(for_classes(&records, None).len(), 2);
        let only_a = ["8-A".to_string()];
        let picked = for_classes(&records, Some(&only_a));
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].full_name, "Ali");
    }
}
