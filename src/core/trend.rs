//! Score trend classification for one student

use serde::Serialize;

/// Trend of a student's overall score from first to last sitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendVerdict {
    MarkedImprovement,
    PositiveTrend,
    Stable,
    SlightDecline,
    MarkedDecline,
    InsufficientData,
}

impl TrendVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            TrendVerdict::MarkedImprovement => "marked improvement",
            TrendVerdict::PositiveTrend => "positive trend",
            TrendVerdict::Stable => "stable",
            TrendVerdict::SlightDecline => "slight decline",
            TrendVerdict::MarkedDecline => "marked decline",
            TrendVerdict::InsufficientData => "insufficient data",
        }
    }

    /// Short automated comment printed on the student report
    pub fn comment(&self) -> &'static str {
        match self {
            TrendVerdict::MarkedImprovement => {
                "Marked improvement. Regular study appears to be paying off."
            }
            TrendVerdict::PositiveTrend => "Positive progress. Keeping it consistent matters.",
            TrendVerdict::Stable => {
                "Scores are stable. A plan focused on target subjects would help further progress."
            }
            TrendVerdict::SlightDecline => {
                "A slight decline in recent exams. Missing topics and the revision plan are worth reviewing."
            }
            TrendVerdict::MarkedDecline => {
                "Marked decline. Study routine and exam anxiety should be looked at together."
            }
            TrendVerdict::InsufficientData => "Not enough score data was found for this student.",
        }
    }
}

/// Bucket a score delta. Larger magnitudes are checked first on each side.
pub fn classify_delta(delta: f64) -> TrendVerdict {
    if delta >= 20.0 {
        TrendVerdict::MarkedImprovement
    } else if delta >= 5.0 {
        TrendVerdict::PositiveTrend
    } else if delta <= -20.0 {
        TrendVerdict::MarkedDecline
    } else if delta <= -5.0 {
        TrendVerdict::SlightDecline
    } else {
        TrendVerdict::Stable
    }
}

/// Classify chronologically ordered scores by `last − first` over present scores
pub fn classify_trend(scores: &[Option<f64>]) -> TrendVerdict {
    let mut present = scores.iter().flatten();
    let Some(first) = present.next() else {
        return TrendVerdict::InsufficientData;
    };
    let last = present.last().unwrap_or(first);
    classify_delta(last - first)
}
