//! Rollback baseline and selection tracking.
//!
//! The baseline is the last widget state known to agree with the controller's
//! value. Text edits snapshot it and may restore it; selection-only changes
//! (arrow keys, clicks) have to be folded into it as they happen, otherwise a
//! rollback would put the caret back where the last text edit left it instead
//! of where the user actually moved it.

use std::cell::RefCell;

use smol_str::SmolStr;

use crate::host::{EditableHost, SessionId};
use crate::types::{TextRange, TextState};

/// Owner of the rollback baseline.
///
/// Borrows of the baseline never outlive a single method call, so host calls
/// made by the engine are free to raise notifications that land back here.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    baseline: RefCell<TextState>,
}

impl SelectionTracker {
    /// Start from empty text with a caret at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current baseline.
    pub fn snapshot(&self) -> TextState {
        self.baseline.borrow().clone()
    }

    pub fn text(&self) -> SmolStr {
        self.baseline.borrow().text().clone()
    }

    pub fn selection(&self) -> TextRange {
        self.baseline.borrow().selection()
    }

    /// Replace the baseline wholesale (rollback, or a fresh commit).
    pub fn restore(&self, state: TextState) {
        *self.baseline.borrow_mut() = state;
    }

    /// Replace the baseline with whatever the host shows right now.
    pub fn commit<H: EditableHost + ?Sized>(&self, host: &H) {
        self.restore(TextState::capture(host));
    }

    /// Update the baseline text, leaving its selection alone.
    pub fn commit_text(&self, text: &str) {
        let mut baseline = self.baseline.borrow_mut();
        *baseline = baseline.with_text(text);
    }

    /// Pull the host's selection into the baseline if the host text agrees
    /// with it. Returns whether the baseline moved.
    pub fn refresh_selection<H: EditableHost + ?Sized>(&self, host: &H) -> bool {
        let text = host.text();
        let selection = host.selection();

        let mut baseline = self.baseline.borrow_mut();
        if *baseline.text() != text || baseline.selection() == selection {
            return false;
        }
        *baseline = baseline.with_selection(selection);
        true
    }

    /// Handle a selection-changed notification.
    ///
    /// Only notifications from the host's active session count, and only while
    /// the host text still equals the baseline text: a mismatch means a text
    /// edit is pending and the baseline is the snapshot it will roll back to.
    pub fn selection_did_change<H: EditableHost + ?Sized>(
        &self,
        host: &H,
        session: SessionId,
    ) -> bool {
        if host.active_session() != Some(session) {
            tracing::trace!(?session, "selection change from another session, ignoring");
            return false;
        }

        let moved = self.refresh_selection(host);
        if moved {
            tracing::trace!(selection = %self.selection(), "tracked selection");
        }
        moved
    }
}
