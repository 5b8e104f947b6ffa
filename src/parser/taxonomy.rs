//! Fixed tokens of the three-band header convention

/// First-column literal marking the measurement header row
pub const ANCHOR_TOKEN: &str = "Öğr.No";

/// Exam name used when the sheet carries none
pub const DEFAULT_EXAM_NAME: &str = "Deneme";

/// Replacement for empty or placeholder column labels
pub const GENERIC_COLUMN: &str = "Kolon";

pub const STUDENT_ID_COLUMN: &str = "OgrNo";
pub const FULL_NAME_COLUMN: &str = "AdSoyad";
pub const CLASS_COLUMN: &str = "Sinif";

/// Resolved name of the overall exam score column
pub const OVERALL_SCORE_COLUMN: &str = "LGS_Puan";

/// Derived payload columns
pub const EXAM_NAME_COLUMN: &str = "Deneme";
pub const GRADE_TIER_COLUMN: &str = "Kademe";

pub const SCORE_GROUP_TOKEN: &str = "lgs";
pub const SCORE_METRIC_TOKEN: &str = "puan";
pub const RANKINGS_TOKEN: &str = "dereceler";
pub const RANK_PREFIX: &str = "Derece";

/// Rank categories: class, institution, district, province, overall
pub const RANK_CATEGORIES: [&str; 5] = ["Sınıf", "Kurum", "İlçe", "İl", "Genel"];

/// Identifier-cell markers of trailing summary rows
pub const SUMMARY_MARKERS: [&str; 2] = ["Genel Ortalama", "Kurum Ortalaması"];

/// Number of fixed identifier columns at the left edge
pub const IDENTIFIER_COLUMNS: usize = 3;
