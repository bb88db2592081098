//! Pull-based views for hosts that draw a session.
//!
//! A [`SegmentView`] bundles everything needed to draw one segment. Its characters come with
//! a [`CharClass`] and a caret marker through [`SegmentView::characters`].

use crate::compare::{CharClass, chars_equal, classify, is_completed};
use crate::normalize::Segment;
use crate::session::{PracticeSession, SegmentStatus};

/// Everything needed to draw one segment
#[derive(Debug, Clone, Copy)]
pub struct SegmentView<'a> {
    pub segment: &'a Segment,
    pub input: &'a str,
    pub status: SegmentStatus,
    /// Caret offset, only set for the active segment
    pub caret: Option<usize>,
}

impl<'a> SegmentView<'a> {
    /// Display text of the segment
    pub fn text(&self) -> &'a str {
        self.segment.text()
    }

    pub fn is_active(&self) -> bool {
        self.status == SegmentStatus::Active
    }

    /// The session moved past this segment
    pub fn is_done(&self) -> bool {
        self.status == SegmentStatus::Done
    }

    /// The buffer matches the target exactly
    pub fn is_matched(&self) -> bool {
        is_completed(self.segment.text(), self.input)
    }

    /// True if the caret sits after the last target character
    pub fn caret_at_end(&self) -> bool {
        self.caret.is_some_and(|caret| caret >= self.segment.len())
    }

    /// Classification of every target character
    pub fn classes(&self) -> Vec<CharClass> {
        classify(self.segment.text(), self.input)
    }

    /// Iterate over the target characters with their classification
    pub fn characters(&self) -> CharacterIterator<'a> {
        CharacterIterator {
            target: self.segment.text().chars(),
            input: self.input.chars(),
            caret: self.caret,
            index: 0,
            len: self.segment.len(),
        }
    }
}

/// One target character ready for drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterContext {
    pub char: char,
    pub class: CharClass,
    pub has_caret: bool,
    pub index: usize,
}

/// Iterator over the characters of a segment view
pub struct CharacterIterator<'a> {
    target: std::str::Chars<'a>,
    input: std::str::Chars<'a>,
    caret: Option<usize>,
    index: usize,
    len: usize,
}

impl ExactSizeIterator for CharacterIterator<'_> {}

impl std::iter::FusedIterator for CharacterIterator<'_> {}

impl Iterator for CharacterIterator<'_> {
    type Item = CharacterContext;

    fn next(&mut self) -> Option<Self::Item> {
        let char = self.target.next()?;
        let class = match self.input.next() {
            None => CharClass::Pending,
            Some(typed) if chars_equal(char, typed) => CharClass::Correct,
            Some(_) => CharClass::Wrong,
        };

        let context = CharacterContext {
            char,
            class,
            has_caret: self.caret == Some(self.index),
            index: self.index,
        };

        self.index += 1;
        Some(context)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

/// Iterator over all segment views of a session
pub struct SegmentIterator<'a> {
    session: &'a PracticeSession,
    index: usize,
}

impl<'a> From<&'a PracticeSession> for SegmentIterator<'a> {
    fn from(value: &'a PracticeSession) -> Self {
        Self {
            session: value,
            index: 0,
        }
    }
}

impl ExactSizeIterator for SegmentIterator<'_> {}

impl std::iter::FusedIterator for SegmentIterator<'_> {}

impl<'a> Iterator for SegmentIterator<'a> {
    type Item = SegmentView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let view = self.session.view(self.index)?;
        self.index += 1;
        Some(view)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.session.segment_count().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}
