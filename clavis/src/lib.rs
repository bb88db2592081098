//! # Clavis - A typing comparison engine
//!
//! Clavis is the engine behind segment-by-segment article practice: it turns raw paragraphs
//! into comparable practice segments, compares live input against them character by
//! character, decides when a segment is done and the next one becomes active, and derives
//! live speed/accuracy metrics.
//!
//! The engine is host-agnostic. It never renders, plays sounds or owns timers. Collaborators
//! push input events into a [`PracticeSession`] and pull views, metrics and caret positions
//! back out whenever they redraw.
//!
//! ## Quick start
//!
//! ```rust
//! use clavis::{PracticeSession, Configuration};
//! use web_time::Instant;
//!
//! let mut session = PracticeSession::new(
//!     "article-1",
//!     &["Hello, world!", "Bye."],
//!     Configuration::default(),
//! );
//! let now = Instant::now();
//!
//! // Spaces inside a segment are inserted automatically
//! session.input(0, "helloworld", now).unwrap();
//! assert_eq!(session.current_index(), 1);
//!
//! session.input(1, "bye", now).unwrap();
//! assert!(session.is_finished());
//!
//! let metrics = session.metrics(now);
//! assert_eq!(metrics.accuracy, 100);
//! assert_eq!(metrics.progress_percent, 100);
//! ```

pub mod auto_space;
pub mod caret;
pub mod clock;
pub mod compare;
pub mod config;
pub mod metrics;
pub mod normalize;
pub mod render;
pub mod session;

pub use caret::FocusRequest;
pub use clock::{Generation, TickHandle};
pub use config::{AdvancementPolicy, ConfigError, Configuration};
pub use metrics::Metrics;
pub use normalize::Segment;
pub use session::{Feedback, InputOutcome, PracticeSession, SegmentStatus, Transition};

/// Characters per word in the standard WPM convention
pub(crate) const AVERAGE_WORD_LENGTH: usize = 5;

/// Number of characters in a string slice (Unicode scalar values).
pub(crate) fn char_len(string: &str) -> usize {
    string.chars().count()
}
