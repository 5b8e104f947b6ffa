//! Grade tier extraction from class labels ("8-A", "8/B", "8 F", "8F")

use crate::error::{ExamError, ExamResult};
use regex::Regex;
use tracing::debug;

/// Two-stage matcher: digits followed by a separator, then bare leading digits
pub struct GradeTierExtractor {
    separated: Regex,
    bare: Regex,
}

impl GradeTierExtractor {
    pub fn new() -> ExamResult<Self> {
        let separated = Regex::new(r"^\s*(\d+)\s*[-/ ]")
            .map_err(|e| ExamError::Validation(format!("Regex error: {}", e)))?;
        let bare = Regex::new(r"^\s*(\d+)")
            .map_err(|e| ExamError::Validation(format!("Regex error: {}", e)))?;
        Ok(Self { separated, bare })
    }

    /// Grade tier for a class label, or None when the label has no leading
    /// digits. A digit run too large for `u32` is not a grade and also yields
    /// None.
    pub fn extract(&self, label: &str) -> Option<u32> {
        if label.is_empty() {
            return None;
        }
        let captures = self
            .separated
            .captures(label)
            .or_else(|| self.bare.captures(label))?;
        let digits = captures.get(1)?.as_str();
        match digits.parse() {
            Ok(tier) => Some(tier),
            Err(e) => {
                debug!(label, error = %e, "class label digit run is not a grade tier");
                None
            }
        }
    }
}
