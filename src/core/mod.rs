//! Aggregation engine: pure views over an exam corpus snapshot

pub mod movers;
pub mod nets;
pub mod ordering;
pub mod ranking;
pub mod summary;
pub mod trend;

pub use movers::{compare_with_previous, Mover, MoverComparison};
pub use nets::net_scores;
pub use ordering::{class_labels, exam_order, grade_tiers, student_names};
pub use ranking::{top_across_exams, top_single_exam, CrossExamRanking, ExamSelection};
pub use summary::{summarize, Kpis};
pub use trend::{classify_trend, TrendVerdict};
