use clavis::{
    Configuration, Feedback, FocusRequest, Metrics, PracticeSession, TickHandle, Transition,
};
use tracing::{debug, info};
use web_time::{Duration, Instant};

use crate::drill::{Drill, Event};

/// Delay before a deferred focus request is applied, one frame at 60Hz
const FRAME_MS: u64 = 16;

/// Drives one session through scripted events on a virtual clock
pub struct Replay {
    session: PracticeSession,
    origin: Instant,
    clock: Option<TickHandle>,
    /// Focus request and the time its frame comes due
    pending_focus: Option<(u64, FocusRequest)>,
    lines: Vec<String>,
    last_ms: u64,
}

/// Everything a replay produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub lines: Vec<String>,
    pub metrics: Metrics,
}

impl Replay {
    pub fn new(drill: &Drill, config: Configuration) -> Self {
        let session =
            PracticeSession::new(drill.article.id.as_str(), &drill.article.paragraphs, config);

        Self {
            session,
            origin: Instant::now(),
            clock: None,
            pending_focus: None,
            lines: Vec::new(),
            last_ms: 0,
        }
    }

    pub const fn session(&self) -> &PracticeSession {
        &self.session
    }

    /// Replay every event of the drill and report the final metrics
    pub fn run(mut self, events: &[Event]) -> Report {
        for event in events {
            self.handle(event);
        }

        // Let the last frame run
        if let Some((due_ms, _)) = self.pending_focus {
            self.apply_pending_focus(due_ms);
        }

        let metrics = self.session.metrics(self.at(self.last_ms));
        Report {
            lines: self.lines,
            metrics,
        }
    }

    /// Handle a single event
    pub fn handle(&mut self, event: &Event) {
        let at_ms = event.at_ms();
        let now = self.at(at_ms);
        self.last_ms = at_ms;

        self.apply_pending_focus(at_ms);
        debug!(kind = event.kind(), at_ms, "replaying event");

        match event {
            Event::Input { segment, value, .. } => self.input(*segment, value, at_ms, now),
            Event::Select { offset, .. } => {
                self.session.set_caret(*offset);
                let caret = self.session.caret_offset();
                self.log(at_ms, format!("select  caret at {caret}"));
            }
            Event::Pointer { .. } => {
                let request = self.session.on_pointer_outside();
                if request.is_none() {
                    self.log(at_ms, "pointer nothing to focus".to_string());
                }
                self.defer_focus(request, at_ms);
            }
            Event::Tick { .. } => self.tick(at_ms, now),
            Event::Reset { .. } => {
                let request = self.session.reset();
                self.defer_focus(request, at_ms);
                self.log(at_ms, "reset   back to the first segment".to_string());
            }
            Event::Load { id, paragraphs, .. } => {
                if self.session.load(id, paragraphs) {
                    let request = self.session.focus_request();
                    self.defer_focus(request, at_ms);
                    let count = self.session.segment_count();
                    self.log(at_ms, format!("load    '{id}' with {count} segments"));
                } else {
                    self.log(at_ms, format!("load    '{id}' unchanged"));
                }
            }
        }
    }

    fn input(&mut self, segment: usize, value: &str, at_ms: u64, now: Instant) {
        let Some(outcome) = self.session.input(segment, value, now) else {
            self.log(at_ms, format!("input   #{segment} {value:?} ignored"));
            return;
        };

        let buffer = self.session.buffer(segment).unwrap_or_default();
        let line = format!(
            "input   #{segment} {buffer:?} {}{}",
            describe_feedback(outcome.feedback),
            describe_transition(outcome.transition)
        );
        self.log(at_ms, line);

        // The new segment's input takes focus on the next frame
        if let Transition::Advanced { .. } = outcome.transition {
            let request = self.session.focus_request();
            self.defer_focus(request, at_ms);
        }

        // A reset or reload leaves the previous handle stale
        let generation = self.session.generation();
        if self
            .clock
            .is_none_or(|handle| handle.generation() != generation)
        {
            self.clock = self.session.start_clock();
            if let Some(handle) = self.clock {
                info!(interval = ?handle.interval(), "live clock started");
            }
        }
    }

    fn tick(&mut self, at_ms: u64, now: Instant) {
        let Some(handle) = self.clock else {
            self.log(at_ms, "tick    no clock running".to_string());
            return;
        };

        match self.session.tick(&handle, now) {
            Some(metrics) => self.log(
                at_ms,
                format!(
                    "tick    {}s {} wpm {}% accuracy",
                    metrics.elapsed_seconds, metrics.wpm, metrics.accuracy
                ),
            ),
            None => {
                self.clock = None;
                self.log(at_ms, "tick    clock cancelled".to_string());
            }
        }
    }

    fn defer_focus(&mut self, request: Option<FocusRequest>, at_ms: u64) {
        self.pending_focus = request.map(|request| (at_ms + FRAME_MS, request));
    }

    fn apply_pending_focus(&mut self, at_ms: u64) {
        let Some((due_ms, request)) = self.pending_focus else {
            return;
        };
        if due_ms > at_ms {
            return;
        }
        self.pending_focus = None;

        if self.session.is_current(&request) {
            self.log(
                due_ms,
                format!(
                    "focus   #{} at offset {}",
                    request.segment(),
                    request.offset()
                ),
            );
        } else {
            self.log(due_ms, "focus   dropped stale request".to_string());
        }
    }

    fn at(&self, at_ms: u64) -> Instant {
        self.origin + Duration::from_millis(at_ms)
    }

    fn log(&mut self, at_ms: u64, line: String) {
        self.lines.push(format!("{at_ms:>7}ms  {line}"));
    }
}

const fn describe_feedback(feedback: Feedback) -> &'static str {
    match feedback {
        Feedback::None => "-",
        Feedback::Key => "key",
        Feedback::Wrong => "wrong",
        Feedback::SegmentComplete => "complete",
    }
}

fn describe_transition(transition: Transition) -> String {
    match transition {
        Transition::Stayed => String::new(),
        Transition::Advanced { from, to } => format!(" (#{from} -> #{to})"),
        Transition::Finished => " (finished)".to_string(),
    }
}

/// Final report lines for a set of metrics
pub fn summary(metrics: &Metrics) -> Vec<String> {
    vec![
        format!(
            "segment   {}/{}{}",
            metrics.position,
            metrics.segment_count,
            if metrics.is_finished { " (finished)" } else { "" }
        ),
        format!("progress  {}%", metrics.progress_percent),
        format!("elapsed   {}s", metrics.elapsed_seconds),
        format!("speed     {} wpm", metrics.wpm),
        format!(
            "accuracy  {}% ({} of {} correct, {} wrong)",
            metrics.accuracy, metrics.correct_chars, metrics.typed_chars, metrics.wrong_count
        ),
    ]
}
