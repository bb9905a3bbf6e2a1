use super::caption_window::CaptionWindow;
use crate::shared::constants::{DEGENERATE_SPAN_SECONDS, SCALE_TOLERANCE};
use crate::shared::timing_error::TimingError;

/// Stretches or squeezes caption timing so the track spans the measured
/// audio duration exactly.
///
/// The first window's start stays fixed; every other timestamp is scaled
/// about it.
pub struct DurationRescaler;

impl DurationRescaler {
    /// Like `try_rescale`, but a degenerate target or span leaves the
    /// windows unscaled. `context` names the sentence in the log line.
    pub fn rescale(
        windows: &[CaptionWindow],
        target_duration: f64,
        context: &str,
    ) -> Vec<CaptionWindow> {
        Self::try_rescale(windows, target_duration).unwrap_or_else(|e| {
            log::debug!(
                "{context}: stage=rescale kind={} ({e}); keeping unscaled windows",
                e.kind()
            );
            windows.to_vec()
        })
    }

    pub fn try_rescale(
        windows: &[CaptionWindow],
        target_duration: f64,
    ) -> Result<Vec<CaptionWindow>, TimingError> {
        let (Some(first), Some(last)) = (windows.first(), windows.last()) else {
            return Ok(Vec::new());
        };
        let anchor = first.start;
        let span = last.end - anchor;

        if !target_duration.is_finite() || target_duration <= 0.0 || span <= DEGENERATE_SPAN_SECONDS {
            return Err(TimingError::DegenerateDuration {
                target: target_duration,
                span,
            });
        }

        let scale = target_duration / span;
        if (scale - 1.0).abs() < SCALE_TOLERANCE {
            return Ok(windows.to_vec());
        }

        Ok(windows
            .iter()
            .map(|w| {
                let start = anchor + (w.start - anchor) * scale;
                let end = (anchor + (w.end - anchor) * scale).max(start);
                CaptionWindow { start, end, ..w.clone() }
            })
            .collect())
    }
}
