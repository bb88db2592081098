//! # Caret Module - Caret Tracking and Focus Restoration
//!
//! The engine keeps its own idea of where the caret belongs inside the active segment,
//! independent of the cursor of whatever input surface the host uses. Hosts pull it back out
//! as a [`FocusRequest`] whenever the surface may have lost focus or was re-created:
//!
//! - after every keystroke the caret follows the input, capped at the target length
//! - on advancement and reset it moves back to 0
//! - when the user interacts outside the input, the host asks for a focus request and
//!   re-applies it
//!
//! Focus restoration is best effort. A request that arrives late (for example on the next
//! animation frame) is checked with
//! [`PracticeSession::is_current`](crate::PracticeSession::is_current) before use.

use crate::clock::Generation;

/// Desired caret offset within the active segment's buffer
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    offset: usize,
}

impl Caret {
    /// The last known offset
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The offset clamped to a buffer of `buffer_len` characters
    pub fn clamped(&self, buffer_len: usize) -> usize {
        self.offset.min(buffer_len)
    }

    /// Follow a keystroke-driven buffer change
    pub(crate) fn follow_input(&mut self, within_segment_len: usize, target_len: usize) {
        self.offset = within_segment_len.min(target_len);
    }

    /// Move to an explicit offset, e.g. the input surface's selection start
    pub(crate) fn place(&mut self, offset: usize, buffer_len: usize) {
        self.offset = offset.min(buffer_len);
    }

    pub(crate) const fn reset(&mut self) {
        self.offset = 0;
    }
}

/// Instruction for the host to focus the active input and select `offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRequest {
    pub(crate) generation: Generation,
    pub(crate) segment: usize,
    pub(crate) offset: usize,
}

impl FocusRequest {
    /// The segment whose input should receive focus
    pub const fn segment(&self) -> usize {
        self.segment
    }

    /// Where to place the caret within that input
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The session generation the request was made in
    pub const fn generation(&self) -> Generation {
        self.generation
    }
}
