use thiserror::Error;

pub type ExamResult<T> = Result<T, ExamError>;

#[derive(Error, Debug)]
pub enum ExamError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Import error: {0}")]
    Import(String),

    /// The header anchor row could not be located; the upload is rejected as a whole.
    #[error("Header row not found: no row starts with '{token}'")]
    MissingAnchor { token: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
