use super::caption_window::CaptionWindow;
use crate::alignment::domain::aligned_segment::AlignedSegment;
use crate::shared::constants::MIN_WINDOW_SECONDS;

/// Greedily groups timed segments into caption windows near a target length.
///
/// A segment joins the open window when that does not move the window's
/// character count further from `target_chars` and keeps it within
/// `target_chars * max_factor`. Segments longer than the cap on their own are
/// split first, preferring whitespace boundaries, with time interpolated
/// across the pieces.
pub struct CaptionChunker {
    target_chars: usize,
    max_factor: f64,
}

impl CaptionChunker {
    pub fn new(target_chars: usize, max_factor: f64) -> Self {
        Self {
            target_chars: target_chars.max(1),
            max_factor: max_factor.max(1.0),
        }
    }

    /// Upper bound on characters per window.
    pub fn cap(&self) -> f64 {
        self.target_chars as f64 * self.max_factor
    }

    pub fn chunk(&self, segments: &[AlignedSegment]) -> Vec<CaptionWindow> {
        let cap_chars = (self.cap().floor() as usize).max(1);
        let pieces: Vec<AlignedSegment> = segments
            .iter()
            .flat_map(|s| split_oversized(s, cap_chars))
            .collect();

        let mut windows = Vec::new();
        let mut current: Option<WindowBuilder> = None;

        for piece in &pieces {
            let n = piece.char_count();
            let Some(window) = current.as_mut() else {
                if n > 0 {
                    current = Some(WindowBuilder::open(piece));
                }
                continue;
            };
            if n == 0 {
                window.push(piece);
                continue;
            }

            let potential = window.chars + n;
            let over_budget = potential as f64 > self.cap();
            let drifts = potential.abs_diff(self.target_chars) > window.chars.abs_diff(self.target_chars);
            if over_budget || drifts {
                windows.extend(current.take().and_then(WindowBuilder::finish));
                current = Some(WindowBuilder::open(piece));
            } else {
                window.push(piece);
            }
        }

        windows.extend(current.and_then(WindowBuilder::finish));
        windows
    }
}

/// Accumulates the members of the window being built.
struct WindowBuilder {
    text: String,
    start: f64,
    last_end: f64,
    latest_end: f64,
    chars: usize,
}

impl WindowBuilder {
    fn open(segment: &AlignedSegment) -> Self {
        Self {
            text: segment.text.clone(),
            start: segment.start,
            last_end: segment.end,
            latest_end: segment.end,
            chars: segment.char_count(),
        }
    }

    fn push(&mut self, segment: &AlignedSegment) {
        self.text.push_str(&segment.text);
        self.last_end = segment.end;
        self.latest_end = self.latest_end.max(segment.end);
        self.chars += segment.char_count();
    }

    /// `None` when the members hold only whitespace.
    fn finish(self) -> Option<CaptionWindow> {
        let text = self.text.trim();
        if text.is_empty() {
            return None;
        }
        let mut end = self.last_end;
        if end < self.start {
            end = self.latest_end.max(self.start);
            if end <= self.start {
                end = self.start + MIN_WINDOW_SECONDS;
            }
        }
        Some(CaptionWindow::new(text, self.start, end))
    }
}

/// Splits a segment longer than `cap_chars` into pieces of at most that many
/// characters, cutting after whitespace when one is in reach.
fn split_oversized(segment: &AlignedSegment, cap_chars: usize) -> Vec<AlignedSegment> {
    let chars: Vec<char> = segment.text.chars().collect();
    let n = chars.len();
    if n <= cap_chars {
        return vec![segment.clone()];
    }

    let span = segment.end - segment.start;
    let time_at = |pos: usize| segment.start + span * pos as f64 / n as f64;
    let mut pieces = Vec::new();
    let mut pos = 0;
    while pos < n {
        let limit = (pos + cap_chars).min(n);
        let cut = if limit == n {
            n
        } else {
            (pos + 1..=limit)
                .rev()
                .find(|&k| chars[k - 1].is_whitespace())
                .unwrap_or(limit)
        };
        let text: String = chars[pos..cut].iter().collect();
        pieces.push(AlignedSegment::new(&text, time_at(pos), time_at(cut), segment.source));
        pos = cut;
    }
    pieces
}
