//! # Clock Module - Cancellable Live-Clock Handles
//!
//! While a session runs, hosts refresh elapsed time and WPM on a periodic timer. The engine
//! owns no timers itself. Instead it hands out a [`TickHandle`] tagged with the session's
//! current [`Generation`]. Resetting, reloading or finishing the session moves to a new
//! generation, so any timer still holding an old handle gets `None` from
//! [`PracticeSession::tick`](crate::PracticeSession::tick) and should cancel itself.
//!
#![doc = simple_mermaid::mermaid!("../diagrams/clock_generations.mmd")]

use web_time::Duration;

/// Monotonic lifetime marker for a session's state
///
/// Every handle the engine hands out is stamped with the generation it was created in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// The generation following this one
    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw counter value
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Permission for a host timer to refresh a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle {
    generation: Generation,
    interval: Duration,
}

impl TickHandle {
    pub(crate) const fn new(generation: Generation, interval: Duration) -> Self {
        Self {
            generation,
            interval,
        }
    }

    /// The generation this handle was issued for
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// How often the host should tick
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_advances() {
        let first = Generation::default();
        let second = first.next();

        assert_eq!(first.value(), 0);
        assert_eq!(second.value(), 1);
        assert!(second > first);
    }

    #[test]
    fn test_generation_wraps() {
        let last = Generation(u64::MAX);
        assert_eq!(last.next(), Generation(0));
    }

    #[test]
    fn test_handle_accessors() {
        let handle = TickHandle::new(Generation(3), Duration::from_secs(1));
        assert_eq!(handle.generation(), Generation(3));
        assert_eq!(handle.interval(), Duration::from_secs(1));
    }
}
