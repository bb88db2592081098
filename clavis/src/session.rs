//! # Session Module - Segment-by-Segment Practice
//!
//! This module provides [`PracticeSession`], the state machine that coordinates all other
//! components for one article (or word list) attempt: normalized segments, one typed buffer
//! per segment, the active segment pointer, timing, caret and lifetime generation.
//!
//! ## Segment lifecycle
//!
//! A segment is `Pending` while it lies ahead of the active one, `Active` while it accepts
//! input and `Done` once the session moved past it. Done buffers are frozen. The session
//! itself is running while a segment is active, and finished once the last one was passed.
//!
#![doc = simple_mermaid::mermaid!("../diagrams/segment_lifecycle.mmd")]
//!
//! ## Input processing
//!
//! Hosts report the full content of the active input surface, not a delta:
//!
#![doc = simple_mermaid::mermaid!("../diagrams/input_flow.mmd")]
//!
//! ## Usage
//!
//! ```rust
//! use clavis::{Feedback, PracticeSession, Configuration, Transition};
//! use web_time::Instant;
//!
//! let mut session = PracticeSession::new("cat-1", &["cat", "dog"], Configuration::default());
//! let now = Instant::now();
//!
//! let outcome = session.input(0, "cag", now).unwrap();
//! assert_eq!(outcome.feedback, Feedback::Wrong);
//! // The default policy moves on once the segment is long enough
//! assert_eq!(outcome.transition, Transition::Advanced { from: 0, to: 1 });
//!
//! // Stale events for the previous segment are ignored
//! assert!(session.input(0, "cat", now).is_none());
//! assert_eq!(session.buffer(0), Some("cag"));
//! ```

use tracing::{debug, trace};
use web_time::Instant;

use crate::auto_space::apply_auto_spaces;
use crate::caret::{Caret, FocusRequest};
use crate::char_len;
use crate::clock::{Generation, TickHandle};
use crate::compare::{chars_equal, is_completed, is_reached};
use crate::config::Configuration;
use crate::metrics::{Metrics, Timing};
use crate::normalize::{Segment, normalize};
use crate::render::{SegmentIterator, SegmentView};

/// Where a segment stands relative to the active one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentStatus {
    /// Lies ahead of the active segment
    Pending,
    /// Accepts input
    Active,
    /// Passed; its buffer is frozen
    Done,
}

/// Cue for the host's key sound player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feedback {
    /// Nothing was added (deletion or unchanged input)
    None,
    /// Correct characters were added
    Key,
    /// At least one added character is wrong
    Wrong,
    /// The added characters completed the segment exactly
    SegmentComplete,
}

/// What an accepted input did to the segment pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// The same segment is still active
    Stayed,
    /// The next segment became active
    Advanced { from: usize, to: usize },
    /// The last segment was passed
    Finished,
}

/// Result of an accepted input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputOutcome {
    pub feedback: Feedback,
    pub transition: Transition,
}

/// Engine state for one article attempt
///
/// # Invariants
///
/// - only the buffer at `current_index` changes while the session runs
/// - `current_index` never decreases except through [`reset`](Self::reset) or
///   [`load`](Self::load)
/// - `started_at` and `finished_at` are set at most once per generation, in that order
///
/// # Thread Safety
///
/// Events must be serialized by the host. A session is driven from one event loop.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    /// Opaque source identity (article or word id)
    identity: String,
    /// Normalized segments, fixed for the session
    segments: Vec<Segment>,
    /// One typed buffer per segment
    buffers: Vec<String>,
    /// Active segment, `segments.len()` once finished
    current_index: usize,
    timing: Timing,
    caret: Caret,
    generation: Generation,
    config: Configuration,
}

impl PracticeSession {
    /// Create a session for the given source identity and raw paragraphs
    ///
    /// Paragraphs are normalized into segments right away. If nothing typeable remains the
    /// session starts out finished. `config` isn't validated here, hosts that read it from
    /// user input should call [`Configuration::validate`] first.
    ///
    /// ```rust
    /// use clavis::{PracticeSession, Configuration};
    ///
    /// let session = PracticeSession::new("empty", &["", "..."], Configuration::default());
    /// assert_eq!(session.segment_count(), 0);
    /// assert!(session.is_finished());
    /// ```
    pub fn new<S: AsRef<str>>(
        identity: impl Into<String>,
        paragraphs: &[S],
        config: Configuration,
    ) -> Self {
        let segments = normalize(paragraphs);
        let identity = identity.into();

        debug!(%identity, segments = segments.len(), "practice session created");

        Self {
            buffers: vec![String::new(); segments.len()],
            identity,
            segments,
            current_index: 0,
            timing: Timing::default(),
            caret: Caret::default(),
            generation: Generation::default(),
            config,
        }
    }

    /// Configure the session with custom settings (builder pattern)
    pub fn with_configuration(mut self, config: Configuration) -> Self {
        self.config = config;
        self
    }

    /// Replace the session if the identity or the content changed
    ///
    /// Returns `true` if the session was rebuilt. Any handle issued before a rebuild is stale
    /// afterwards.
    pub fn load<S: AsRef<str>>(&mut self, identity: &str, paragraphs: &[S]) -> bool {
        let segments = normalize(paragraphs);
        if identity == self.identity && segments == self.segments {
            return false;
        }

        debug!(
            from = %self.identity,
            to = %identity,
            segments = segments.len(),
            "source changed, rebuilding session"
        );

        self.identity = identity.to_string();
        self.segments = segments;
        self.clear();
        true
    }

    /// Return to the initial state, keeping the segments
    ///
    /// Returns a request to focus the first segment at offset 0, if there is one.
    pub fn reset(&mut self) -> Option<FocusRequest> {
        debug!(identity = %self.identity, "session reset");
        self.clear();
        self.focus_request()
    }

    fn clear(&mut self) {
        self.buffers = vec![String::new(); self.segments.len()];
        self.current_index = 0;
        self.timing = Timing::default();
        self.caret.reset();
        self.generation = self.generation.next();
    }

    /// The source identity
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The active configuration
    pub const fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// All segments in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Get a segment by index
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Number of segments
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The typed buffer of a segment
    pub fn buffer(&self, index: usize) -> Option<&str> {
        self.buffers.get(index).map(String::as_str)
    }

    /// Index of the active segment, equal to the segment count once finished
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// The segment accepting input, if any
    pub fn active_segment(&self) -> Option<&Segment> {
        self.segments.get(self.current_index)
    }

    /// True once every segment has been passed (immediately, if there are none)
    pub fn is_finished(&self) -> bool {
        self.current_index >= self.segments.len()
    }

    /// True while a segment accepts input
    pub fn is_running(&self) -> bool {
        !self.is_finished()
    }

    /// True once the first keystroke was processed
    pub const fn has_started(&self) -> bool {
        self.timing.started_at.is_some()
    }

    /// Time of the first keystroke
    pub const fn started_at(&self) -> Option<Instant> {
        self.timing.started_at
    }

    /// Time the last segment was passed
    pub const fn finished_at(&self) -> Option<Instant> {
        self.timing.finished_at
    }

    /// Current lifetime generation
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Status of a segment relative to the active one
    pub fn status(&self, index: usize) -> Option<SegmentStatus> {
        if index >= self.segments.len() {
            return None;
        }

        Some(if index < self.current_index {
            SegmentStatus::Done
        } else if index == self.current_index {
            SegmentStatus::Active
        } else {
            SegmentStatus::Pending
        })
    }

    /// Process the full content of the input surface for segment `index`
    ///
    /// Returns `None` if the event was ignored: the index isn't the active segment (a stale
    /// event from before an advancement) or the session is finished.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use clavis::{PracticeSession, Configuration, Feedback, Transition};
    /// use web_time::Instant;
    ///
    /// let mut session = PracticeSession::new("a", &["a b", "c"], Configuration::default());
    /// let now = Instant::now();
    ///
    /// session.input(0, "a", now).unwrap();
    /// // The space is inserted for the user
    /// let outcome = session.input(0, "ab", now).unwrap();
    ///
    /// assert_eq!(session.buffer(0), Some("a b"));
    /// assert_eq!(outcome.feedback, Feedback::SegmentComplete);
    /// assert_eq!(outcome.transition, Transition::Advanced { from: 0, to: 1 });
    /// ```
    pub fn input(&mut self, index: usize, raw_value: &str, now: Instant) -> Option<InputOutcome> {
        if index != self.current_index || self.is_finished() {
            trace!(
                index,
                current = self.current_index,
                "ignoring input for inactive segment"
            );
            return None;
        }

        if self.timing.started_at.is_none() {
            self.timing.started_at = Some(now);
        }

        let segment = &self.segments[index];
        let target = segment.text();
        let target_len = segment.len();
        let current_len = char_len(&self.buffers[index]);

        let value = strip_line_breaks(raw_value);
        let is_deleting = char_len(&value) < current_len;

        let value = if is_deleting {
            value
        } else {
            apply_auto_spaces(target, &value)
        };

        // Anything past the target is dropped; shorter values are kept whole
        let stored: String = value.chars().take(target_len).collect();
        let reached = is_reached(target, &stored);

        let feedback = if is_deleting {
            Feedback::None
        } else {
            keystroke_feedback(target, &stored, current_len, reached)
        };

        self.caret.follow_input(char_len(&stored), target_len);
        self.buffers[index] = stored;

        let transition = if self
            .config
            .advancement
            .should_advance(target, &self.buffers[index])
        {
            self.advance(now)
        } else {
            Transition::Stayed
        };

        Some(InputOutcome {
            feedback,
            transition,
        })
    }

    /// Move past the active segment
    fn advance(&mut self, now: Instant) -> Transition {
        let from = self.current_index;
        let to = from + 1;

        if to >= self.segments.len() {
            self.timing.finished_at.get_or_insert(now);
            self.current_index = self.segments.len();
            self.generation = self.generation.next();
            debug!(identity = %self.identity, "session finished");
            return Transition::Finished;
        }

        self.current_index = to;
        self.caret.reset();
        debug!(from, to, "advanced to next segment");
        Transition::Advanced { from, to }
    }

    /// Metrics for display at time `now`
    pub fn metrics(&self, now: Instant) -> Metrics {
        Metrics::calculate(
            &self.segments,
            &self.buffers,
            self.current_index,
            self.timing,
            now,
        )
    }

    /// Start a live clock for the running session
    ///
    /// Returns `None` before the first keystroke and once the session is finished.
    pub fn start_clock(&self) -> Option<TickHandle> {
        (self.has_started() && self.is_running())
            .then(|| TickHandle::new(self.generation, self.config.tick_interval()))
    }

    /// Refresh metrics from a clock tick
    ///
    /// Returns `None` if the handle belongs to an earlier generation or the session no longer
    /// runs. The host should cancel its timer in that case.
    pub fn tick(&self, handle: &TickHandle, now: Instant) -> Option<Metrics> {
        if handle.generation() != self.generation || !self.has_started() || self.is_finished() {
            trace!(
                handle = handle.generation().value(),
                current = self.generation.value(),
                "ignoring stale tick"
            );
            return None;
        }

        Some(self.metrics(now))
    }

    /// Caret offset within the active segment's buffer
    pub fn caret_offset(&self) -> usize {
        let buffer_len = self
            .buffers
            .get(self.current_index)
            .map_or(0, |buffer| char_len(buffer));
        self.caret.clamped(buffer_len)
    }

    /// Record the input surface's own selection start
    pub fn set_caret(&mut self, offset: usize) {
        if let Some(buffer) = self.buffers.get(self.current_index) {
            let buffer_len = char_len(buffer);
            self.caret.place(offset, buffer_len);
        }
    }

    /// Where focus should go right now, if anywhere
    ///
    /// Returns `None` once the session is finished or if it has no segments.
    pub fn focus_request(&self) -> Option<FocusRequest> {
        if self.is_finished() {
            return None;
        }

        Some(FocusRequest {
            generation: self.generation,
            segment: self.current_index,
            offset: self.caret_offset(),
        })
    }

    /// Handle pointer activity outside the active input
    ///
    /// Returns the focus request the host should apply, typically on its next frame.
    pub fn on_pointer_outside(&self) -> Option<FocusRequest> {
        let request = self.focus_request();
        if request.is_none() {
            trace!("pointer outside input while not running");
        }
        request
    }

    /// Whether a previously issued focus request still applies
    pub fn is_current(&self, request: &FocusRequest) -> bool {
        request.generation == self.generation
            && request.segment == self.current_index
            && self.is_running()
    }

    /// View of a single segment
    pub fn view(&self, index: usize) -> Option<SegmentView<'_>> {
        let segment = self.segments.get(index)?;
        let input = self.buffers.get(index)?;
        let status = self.status(index)?;
        let caret = (status == SegmentStatus::Active).then(|| self.caret_offset());

        Some(SegmentView {
            segment,
            input,
            status,
            caret,
        })
    }

    /// Iterate over views of all segments
    pub fn render_iter(&self) -> SegmentIterator<'_> {
        self.into()
    }
}

/// Remove line breaks (`\r\n` and `\n`) from a raw input value
fn strip_line_breaks(raw_value: &str) -> String {
    raw_value.replace("\r\n", "").replace('\n', "")
}

/// Classify the characters added by an insertion
fn keystroke_feedback(target: &str, stored: &str, previous_len: usize, reached: bool) -> Feedback {
    let mut has_wrong = false;
    let mut has_correct = false;

    for (expected, typed) in target.chars().zip(stored.chars()).skip(previous_len) {
        if chars_equal(expected, typed) {
            has_correct = true;
        } else {
            has_wrong = true;
        }
    }

    if has_wrong {
        Feedback::Wrong
    } else if has_correct {
        if reached && is_completed(target, stored) {
            Feedback::SegmentComplete
        } else {
            Feedback::Key
        }
    } else {
        Feedback::None
    }
}
