//! Riser/faller comparison between consecutive exams

use super::ordering::predecessor;
use crate::types::StoredRecord;
use serde::Serialize;
use std::collections::HashMap;

/// One student's score change between two exams
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mover {
    pub name: String,
    pub previous: f64,
    pub current: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoverComparison {
    /// The exam is not among the tier's exams
    UnknownExam { exam: String },
    /// The exam is first in canonical order; nothing to compare
    NoPredecessor { exam: String },
    Compared {
        previous_exam: String,
        current_exam: String,
        risers: Vec<Mover>,
        fallers: Vec<Mover>,
    },
}

/// Compare `exam` with its predecessor in `exam_order`.
///
/// Students are joined by full name, not by student ID.
pub fn compare_with_previous(
    records: &[StoredRecord],
    exam_order: &[String],
    exam: &str,
    limit: usize,
) -> MoverComparison {
    if !exam_order.iter().any(|e| e == exam) {
        return MoverComparison::UnknownExam {
            exam: exam.to_string(),
        };
    }
    let Some(previous_exam) = predecessor(exam_order, exam) else {
        return MoverComparison::NoPredecessor {
            exam: exam.to_string(),
        };
    };

    let mut previous: HashMap<&str, Vec<f64>> = HashMap::new();
    for r in records.iter().filter(|r| r.exam_name == previous_exam) {
        if let Some(score) = r.overall_score {
            previous.entry(r.full_name.as_str()).or_default().push(score);
        }
    }

    let mut joined: Vec<Mover> = Vec::new();
    for r in records.iter().filter(|r| r.exam_name == exam) {
        let Some(current) = r.overall_score else {
            continue;
        };
        for &before in previous.get(r.full_name.as_str()).into_iter().flatten() {
            joined.push(Mover {
                name: r.full_name.clone(),
                previous: before,
                current,
                delta: current - before,
            });
        }
    }

    let mut risers = joined.clone();
    risers.sort_by(|a, b| b.delta.total_cmp(&a.delta));
    risers.truncate(limit);

    let mut fallers = joined;
    fallers.sort_by(|a, b| a.delta.total_cmp(&b.delta));
    fallers.truncate(limit);

    MoverComparison::Compared {
        previous_exam: previous_exam.to_string(),
        current_exam: exam.to_string(),
        risers,
        fallers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::record;
    use pretty_assertions::assert_eq;

    fn order() -> Vec<String> {
        vec!["D1".to_string(), "D2".to_string()]
    }

    #[test]
    fn test_first_exam_has_no_predecessor() {
        let outcome = compare_with_previous(&[], &order(), "D1", 10);
        assert_eq!(
            outcome,
            MoverComparison::NoPredecessor {
                exam: "D1".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_exam_is_reported() {
        let outcome = compare_with_previous(&[], &order(), "D9", 10);
        assert_eq!(
            outcome,
            MoverComparison::UnknownExam {
                exam: "D9".to_string()
            }
        );
    }

    #[test]
    fn test_risers_and_fallers() {
        let records = vec![
            record("D1", "Ali", Some(300.0), 0),
            record("D1", "Veli", Some(400.0), 0),
            record("D1", "Can", Some(350.0), 0),
            record("D1", "Yok", None, 0),
            record("D2", "Ali", Some(360.0), 10),
            record("D2", "Veli", Some(380.0), 10),
            record("D2", "Can", Some(355.0), 10),
            record("D2", "Yok", Some(500.0), 10),
            record("D2", "Yeni", Some(450.0), 10),
        ];
        let MoverComparison::Compared {
            previous_exam,
            risers,
            fallers,
            ..
        } = compare_with_previous(&records, &order(), "D2", 2)
        else {
            panic!("expected comparison");
        };

        assert_eq!(previous_exam, "D1");
        let riser_names: Vec<&str> = risers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(riser_names, vec!["Ali", "Can"]);
        assert_eq!(risers[0].delta, 60.0);
        let faller_names: Vec<&str> = fallers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(faller_names, vec!["Veli", "Can"]);
        assert_eq!(fallers[0].delta, -20.0);
    }

    #[test]
    fn test_join_is_by_name_not_id() {
        let mut before = record("D1", "Ali Kaya", Some(300.0), 0);
        before.student_id = Some(1);
        let mut after = record("D2", "ALI KAYA", Some(320.0), 10);
        after.student_id = Some(1);
        let MoverComparison::Compared { risers, .. } =
            compare_with_previous(&[before, after], &order(), "D2", 10)
        else {
            panic!("expected comparison");
        };
        assert!(risers.is_empty());
    }
}
