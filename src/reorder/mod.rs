//! Editors behind the drag-and-drop ordering and matching widgets.
//!
//! Pointer handling lives elsewhere; the widgets call into these through
//! [`Reorder`] and [`Match`], and the editors push every change back to the
//! owning form through an [`AnswerSink`].

pub mod matching;
pub mod ordering;

pub use matching::MatchingEditor;
pub use ordering::{shuffled_order, OrderingEditor};

use crate::{errors::AppResult, models::domain::Answer};

pub trait Reorder {
    /// Moves the item at `source` to `destination`. Returns false when the
    /// move is out of range and nothing changed.
    fn on_reorder(&mut self, source: usize, destination: usize) -> bool;
}

pub trait Match {
    fn on_assign(&mut self, left: &str, right: &str) -> AppResult<()>;

    /// Returns the right-hand item that went back to the pool, if any.
    fn on_unassign(&mut self, left: &str) -> Option<String>;
}

/// Receives the full answer after every change.
pub trait AnswerSink {
    fn answer_changed(&mut self, answer: &Answer);
}

impl<F: FnMut(&Answer)> AnswerSink for F {
    fn answer_changed(&mut self, answer: &Answer) {
        self(answer)
    }
}

/// For editors nobody is listening to.
#[derive(Clone, Copy, Debug, Default)]
pub struct Detached;

impl AnswerSink for Detached {
    fn answer_changed(&mut self, _answer: &Answer) {}
}
