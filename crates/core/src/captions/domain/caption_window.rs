use serde::{Deserialize, Serialize};

/// One on-screen caption: text plus the sentence-relative time it is shown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptionWindow {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub char_count: usize,
}

impl CaptionWindow {
    /// Builds a window, counting characters as Unicode scalar values.
    pub fn new(text: &str, start: f64, end: f64) -> Self {
        Self {
            text: text.to_string(),
            start,
            end: end.max(start),
            char_count: text.chars().count(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// The same window moved by `offset` seconds.
    pub fn shifted(&self, offset: f64) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
            ..self.clone()
        }
    }
}
