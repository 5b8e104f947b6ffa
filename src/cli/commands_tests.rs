use super::*;
use crate::core::test_support::record;
use crate::store::MemoryStore;
use crate::types::StoredRecord;
use tempfile::TempDir;

fn tracker(records: Vec<StoredRecord>) -> Tracker<MemoryStore> {
    Tracker::new(MemoryStore::with_records(records), AppConfig::default())
}

fn sample() -> Vec<StoredRecord> {
    vec![
        record("Deneme-1", "Ali Kaya", Some(380.0), 0),
        record("Deneme-1", "Ayşe Yılmaz", Some(450.5), 0),
        record("Deneme-2", "Ali Kaya", Some(410.0), 60),
        record("Deneme-2", "Ayşe Yılmaz", Some(430.0), 60),
    ]
}

// =========================================================================
// fit Tests
// =========================================================================

#[test]
fn test_fit_pads_short_text() {
    assert_eq!(fit("Ali", 5), "Ali  ");
}

#[test]
fn test_fit_counts_characters_not_bytes() {
    assert_eq!(fit("Öğr", 4), "Öğr ");
}

#[test]
fn test_fit_truncates_long_text() {
    assert_eq!(fit("Mehmet Çelik", 6), "Mehme…");
}

// =========================================================================
// Command Tests
// =========================================================================

#[test]
fn test_exams_lists_every_tier() {
    assert!(exams(&tracker(sample()), None).is_ok());
    assert!(exams(&tracker(Vec::new()), None).is_ok());
}

#[test]
fn test_rank_writes_excel_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("top.xlsx");
    rank(&tracker(sample()), 8, None, Vec::new(), Some(10), Some(path.clone())).unwrap();
    assert!(path.exists());
}

#[test]
fn test_rank_single_exam_with_class_filter() {
    let result = rank(
        &tracker(sample()),
        8,
        Some("Deneme-2".to_string()),
        vec!["8-B".to_string()],
        None,
        None,
    );
    assert!(result.is_ok());
}

#[test]
fn test_rank_empty_selection_writes_no_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bos.xlsx");
    rank(
        &tracker(sample()),
        8,
        Some("Deneme-9".to_string()),
        Vec::new(),
        None,
        Some(path.clone()),
    )
    .unwrap();
    assert!(!path.exists());
}

#[test]
fn test_student_unknown_name_fails() {
    let result = student(&tracker(sample()), 8, "Yok Böyle".to_string(), None);
    assert!(result.is_err());
}

#[test]
fn test_student_writes_excel_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ali.xlsx");
    student(&tracker(sample()), 8, "Ali Kaya".to_string(), Some(path.clone())).unwrap();
    assert!(path.exists());
}

#[test]
fn test_movers_with_and_without_predecessor() {
    let t = tracker(sample());
    assert!(movers(&t, 8, "Deneme-1".to_string()).is_ok());
    assert!(movers(&t, 8, "Deneme-2".to_string()).is_ok());
    assert!(movers(&t, 8, "Deneme-9".to_string()).is_ok());
}

#[test]
fn test_open_tracker_db_override() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("nested/exams.db");
    let tracker = open_tracker(None, Some(db.clone())).unwrap();
    assert_eq!(tracker.config().database, db);
    assert!(db.exists());
}

#[test]
fn test_parse_missing_file_fails() {
    assert!(parse(PathBuf::from("/nonexistent/deneme.xlsx"), 5).is_err());
}
