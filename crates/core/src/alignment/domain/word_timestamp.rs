use serde::{Deserialize, Serialize};

/// One recognized word with its timing inside the sentence audio, in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordTimestamp {
    #[serde(rename = "word")]
    pub text: String,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub confidence: f32,
}

impl WordTimestamp {
    pub fn new(text: &str, start: f64, end: f64, confidence: f32) -> Self {
        Self {
            text: text.to_string(),
            start,
            end,
            confidence,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn has_finite_timing(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    /// Clamps timing so that `0 <= start <= end`.
    pub fn clamped(&self) -> Self {
        let start = self.start.max(0.0);
        Self {
            text: self.text.clone(),
            start,
            end: self.end.max(start),
            confidence: self.confidence.clamp(0.0, 1.0),
        }
    }
}
