//! # Metrics Module - Live Speed and Accuracy
//!
//! Everything here is a pure function of session state and the current wall-clock time.
//! Nothing is cached: hosts recompute metrics whenever they redraw, after each keystroke
//! and on every clock tick while the session runs.
//!
//! ## Formulas
//!
//! - `typed_chars`: sum of all buffer lengths
//! - `correct_chars`: sum of [`count_correct`] over every segment
//! - `wrong_count`: `typed_chars - correct_chars`, never negative
//! - `elapsed_seconds`: whole seconds between the first keystroke and the finish (or now),
//!   at least 1 once started
//! - `wpm`: `typed_chars / 5` words per elapsed minute, at least 1 once started
//! - `accuracy`: percentage of typed characters that are correct, 100 before any input
//! - `progress_percent`: percentage of segments passed

use web_time::Instant;

use crate::AVERAGE_WORD_LENGTH;
use crate::compare::count_correct;
use crate::normalize::Segment;

/// Start and finish timestamps of a session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
}

/// Display values for a session at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    /// Characters currently held in all buffers
    pub typed_chars: usize,
    /// Characters matching their target position
    pub correct_chars: usize,
    /// Typed characters that don't match
    pub wrong_count: usize,
    /// Whole seconds since the first keystroke
    pub elapsed_seconds: u64,
    /// Words per minute, 5 characters per word
    pub wpm: u32,
    /// Percentage (0 - 100) of typed characters that are correct
    pub accuracy: u32,
    /// Percentage (0 - 100) of segments passed
    pub progress_percent: u32,
    /// One-based number of the segment being typed, clamped to the segment count
    pub position: usize,
    /// Total number of segments
    pub segment_count: usize,
    /// True once every segment has been passed
    pub is_finished: bool,
}

impl Metrics {
    /// Calculate metrics for a session snapshot
    ///
    /// * `segments` - All segments of the session
    /// * `buffers` - Typed buffers, one per segment
    /// * `current_index` - Index of the active segment, `segments.len()` once finished
    /// * `timing` - When typing started and finished
    /// * `now` - Current time
    pub fn calculate(
        segments: &[Segment],
        buffers: &[String],
        current_index: usize,
        timing: Timing,
        now: Instant,
    ) -> Self {
        let typed_chars: usize = buffers.iter().map(|buffer| buffer.chars().count()).sum();
        let correct_chars: usize = segments
            .iter()
            .zip(buffers)
            .map(|(segment, buffer)| count_correct(segment.text(), buffer))
            .sum();

        let segment_count = segments.len();
        let is_finished = current_index >= segment_count;
        let completed = if is_finished {
            segment_count
        } else {
            current_index
        };

        let elapsed_seconds = elapsed_seconds(timing, now);

        Self {
            typed_chars,
            correct_chars,
            wrong_count: typed_chars.saturating_sub(correct_chars),
            elapsed_seconds,
            wpm: wpm(typed_chars, elapsed_seconds, timing.started_at.is_some()),
            accuracy: accuracy(correct_chars, typed_chars),
            progress_percent: progress_percent(completed, segment_count),
            position: (completed + 1).min(segment_count),
            segment_count,
            is_finished,
        }
    }
}

/// Whole seconds between start and finish (or `now`)
///
/// Returns 0 before the first keystroke and at least 1 afterwards.
pub fn elapsed_seconds(timing: Timing, now: Instant) -> u64 {
    let Some(started_at) = timing.started_at else {
        return 0;
    };

    let end = timing.finished_at.unwrap_or(now);
    let millis = end.saturating_duration_since(started_at).as_millis() as f64;
    ((millis / 1000.0).round() as u64).max(1)
}

/// Words per minute from typed characters
///
/// Returns 0 before the first keystroke and at least 1 afterwards.
pub fn wpm(typed_chars: usize, elapsed_seconds: u64, started: bool) -> u32 {
    if !started {
        return 0;
    }

    let seconds = elapsed_seconds.max(1) as f64;
    let words = typed_chars as f64 / AVERAGE_WORD_LENGTH as f64;
    ((words / seconds * 60.0).round() as u32).max(1)
}

/// Percentage of typed characters that are correct
pub fn accuracy(correct_chars: usize, typed_chars: usize) -> u32 {
    if typed_chars == 0 {
        return 100;
    }

    (correct_chars as f64 / typed_chars as f64 * 100.0).round() as u32
}

/// Percentage of segments passed
pub fn progress_percent(completed: usize, segment_count: usize) -> u32 {
    if segment_count == 0 {
        return 0;
    }

    ((completed as f64 / segment_count as f64 * 100.0).round() as u32).min(100)
}
