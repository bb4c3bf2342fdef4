//! In-memory editable widget.
//!
//! `HeadlessEditable` plays the part a native text field plays in a real UI:
//! it owns the buffer and the selection, applies user input, and tells its own
//! listeners about text edits, selection moves and reserved key commands.
//! Programmatic writes from a listener never raise `TextChanged`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use controlled_input_core::{
    EditableHost, EventDisposition, HostCommand, HostEvent, HostListener, SessionId,
    SubscriptionId, TextRange,
};
use smol_str::SmolStr;

use crate::keys::{Key, KeyPress};
use crate::text::{RopeBuffer, TextBuffer};

/// Session ids are unique across widgets so a listener can tell its widget's
/// notifications apart from anyone else's.
static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

#[derive(Default)]
struct EditableState {
    buffer: RefCell<RopeBuffer>,
    selection: Cell<TextRange>,
    session: Cell<Option<SessionId>>,
    listeners: RefCell<Vec<(SubscriptionId, Weak<dyn HostListener>)>>,
    next_subscription: Cell<u64>,
}

/// Handle to an in-memory editable widget. Clones share the same widget.
#[derive(Clone, Default)]
pub struct HeadlessEditable {
    inner: Rc<EditableState>,
}

impl HeadlessEditable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widget pre-filled with `text`, not yet being edited.
    pub fn with_text(text: &str) -> Self {
        let editable = Self::new();
        editable.inner.buffer.borrow_mut().set(text);
        editable
    }

    fn len_chars(&self) -> usize {
        self.inner.buffer.borrow().len_chars()
    }

    /// Focus the widget. Returns the active session, starting one with the
    /// caret at the end of the text if none is active.
    pub fn begin_editing(&self) -> SessionId {
        if let Some(session) = self.inner.session.get() {
            return session;
        }

        let session = SessionId(NEXT_SESSION.fetch_add(1, Ordering::Relaxed));
        self.inner.session.set(Some(session));
        self.inner.selection.set(TextRange::caret(self.len_chars()));
        tracing::trace!(?session, "editing session started");

        self.dispatch(HostEvent::SelectionChanged { session });
        session
    }

    /// Drop focus. Selection reads as `(0, 0)` until editing begins again.
    pub fn end_editing(&self) {
        if let Some(session) = self.inner.session.take() {
            tracing::trace!(?session, "editing session ended");
        }
    }

    pub fn is_editing(&self) -> bool {
        self.inner.session.get().is_some()
    }

    /// Number of live registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }

    // === User input ===

    /// Type text, replacing the selection. The caret lands after the insertion.
    pub fn type_text(&self, text: &str) {
        let session = self.begin_editing();
        let range = self.inner.selection.get();
        if text.is_empty() && range.is_caret() {
            return;
        }

        self.inner.buffer.borrow_mut().replace(range.to_range(), text);
        self.inner
            .selection
            .set(TextRange::caret(range.start + text.chars().count()));
        self.user_edited(session);
    }

    /// Backspace: delete the selection, or the char before the caret.
    pub fn delete_backward(&self) {
        let session = self.begin_editing();
        let range = self.inner.selection.get();
        let target = if !range.is_caret() {
            range.to_range()
        } else if range.start > 0 {
            range.start - 1..range.start
        } else {
            return;
        };

        self.delete_range(session, target);
    }

    /// Forward delete: delete the selection, or the char after the caret.
    pub fn delete_forward(&self) {
        let session = self.begin_editing();
        let range = self.inner.selection.get();
        let target = if !range.is_caret() {
            range.to_range()
        } else if range.start < self.len_chars() {
            range.start..range.start + 1
        } else {
            return;
        };

        self.delete_range(session, target);
    }

    fn delete_range(&self, session: SessionId, target: std::ops::Range<usize>) {
        let start = target.start;
        self.inner.buffer.borrow_mut().delete(target);
        self.inner.selection.set(TextRange::caret(start));
        self.user_edited(session);
    }

    /// Select with mouse or keyboard, without editing.
    pub fn select(&self, range: TextRange) {
        let session = self.begin_editing();
        let range = range.clamp_to(self.len_chars());
        if self.inner.selection.get() == range {
            return;
        }
        self.inner.selection.set(range);
        self.dispatch(HostEvent::SelectionChanged { session });
    }

    pub fn move_left(&self) {
        self.begin_editing();
        let range = self.inner.selection.get();
        let caret = if range.is_caret() {
            range.start.saturating_sub(1)
        } else {
            range.start
        };
        self.select(TextRange::caret(caret));
    }

    pub fn move_right(&self) {
        self.begin_editing();
        let range = self.inner.selection.get();
        let caret = if range.is_caret() {
            range.start + 1
        } else {
            range.end()
        };
        self.select(TextRange::caret(caret));
    }

    /// Press a key.
    ///
    /// Reserved commands (Enter, Escape, Tab) go to listeners first; the
    /// default action only runs if none of them handled it.
    pub fn press_key(&self, press: impl Into<KeyPress>) -> EventDisposition {
        let press = press.into();
        let session = self.begin_editing();

        if let Some(command) = press.command() {
            let disposition = self.dispatch(HostEvent::Command { session, command });
            if disposition.is_handled() {
                tracing::trace!(%command, "command handled by listener");
                return EventDisposition::Handled;
            }
            self.default_command(command);
            return EventDisposition::PassThrough;
        }

        match press.key {
            Key::Char(c) => self.type_text(c.encode_utf8(&mut [0; 4])),
            Key::Backspace => self.delete_backward(),
            Key::Delete => self.delete_forward(),
            Key::ArrowLeft => self.move_left(),
            Key::ArrowRight => self.move_right(),
            Key::Enter | Key::Escape | Key::Tab => {}
        }
        EventDisposition::PassThrough
    }

    fn default_command(&self, command: HostCommand) {
        match command {
            HostCommand::InsertNewline | HostCommand::InsertLineBreak => self.type_text("\n"),
            // Focus traversal and escape propagation are the window's business.
            HostCommand::InsertTab | HostCommand::InsertBacktab | HostCommand::CancelOperation => {}
        }
    }

    fn user_edited(&self, session: SessionId) {
        self.dispatch(HostEvent::TextChanged { session });
        self.dispatch(HostEvent::SelectionChanged { session });
    }

    // === Notifications ===

    /// Deliver an event to this widget's listeners.
    ///
    /// Returns `Handled` if any listener handled it. No internal borrow is held
    /// while listeners run, so they may read and write the widget freely.
    pub fn dispatch(&self, event: HostEvent) -> EventDisposition {
        let listeners: Vec<Rc<dyn HostListener>> = {
            let mut registered = self.inner.listeners.borrow_mut();
            registered.retain(|(_, weak)| weak.strong_count() > 0);
            registered
                .iter()
                .filter_map(|(_, weak)| weak.upgrade())
                .collect()
        };

        tracing::trace!(?event, listeners = listeners.len(), "dispatching host event");

        let mut disposition = EventDisposition::PassThrough;
        for listener in listeners {
            if listener.handle_event(event).is_handled() {
                disposition = EventDisposition::Handled;
            }
        }
        disposition
    }
}

impl EditableHost for HeadlessEditable {
    fn text(&self) -> SmolStr {
        self.inner.buffer.borrow().contents()
    }

    fn selection(&self) -> TextRange {
        match self.inner.session.get() {
            Some(_) => self.inner.selection.get(),
            None => TextRange::default(),
        }
    }

    fn set_text(&self, text: &str) {
        self.inner.buffer.borrow_mut().set(text);

        // Programmatic content changes put the caret at the end.
        let caret = TextRange::caret(text.chars().count());
        let moved = self.inner.selection.replace(caret) != caret;
        if let (true, Some(session)) = (moved, self.inner.session.get()) {
            self.dispatch(HostEvent::SelectionChanged { session });
        }
    }

    fn set_selection(&self, range: TextRange) {
        let Some(session) = self.inner.session.get() else {
            return;
        };
        let range = range.clamp_to(self.len_chars());
        if self.inner.selection.replace(range) != range {
            self.dispatch(HostEvent::SelectionChanged { session });
        }
    }

    fn active_session(&self) -> Option<SessionId> {
        self.inner.session.get()
    }

    fn subscribe(&self, listener: Weak<dyn HostListener>) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push((id, listener));
        tracing::trace!(?id, "listener subscribed");
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.listeners.borrow_mut().retain(|(sub, _)| *sub != id);
        tracing::trace!(?id, "listener unsubscribed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        events: RefCell<Vec<HostEvent>>,
        handle_commands: bool,
    }

    impl HostListener for Recorder {
        fn handle_event(&self, event: HostEvent) -> EventDisposition {
            self.events.borrow_mut().push(event);
            match event {
                HostEvent::Command { .. } if self.handle_commands => EventDisposition::Handled,
                _ => EventDisposition::PassThrough,
            }
        }
    }

    fn recorder(handle_commands: bool) -> Rc<Recorder> {
        Rc::new(Recorder {
            events: RefCell::new(Vec::new()),
            handle_commands,
        })
    }

    fn subscribe(editable: &HeadlessEditable, recorder: &Rc<Recorder>) -> SubscriptionId {
        let listener: Rc<dyn HostListener> = recorder.clone();
        editable.subscribe(Rc::downgrade(&listener))
    }

    #[test]
    fn test_typing_replaces_selection() {
        let editable = HeadlessEditable::with_text("hello world");
        editable.select(TextRange::new(6, 5));
        editable.type_text("rust");
        assert_eq!(editable.text(), "hello rust");
        assert_eq!(editable.selection(), TextRange::caret(10));
    }

    #[test]
    fn test_user_edit_raises_text_then_selection() {
        let editable = HeadlessEditable::new();
        let session = editable.begin_editing();
        let rec = recorder(false);
        subscribe(&editable, &rec);

        editable.type_text("a");

        assert_eq!(
            *rec.events.borrow(),
            vec![
                HostEvent::TextChanged { session },
                HostEvent::SelectionChanged { session },
            ]
        );
    }

    #[test]
    fn test_programmatic_write_raises_no_text_change() {
        let editable = HeadlessEditable::new();
        let session = editable.begin_editing();
        let rec = recorder(false);
        subscribe(&editable, &rec);

        editable.set_text("abc");

        assert_eq!(editable.selection(), TextRange::caret(3));
        assert_eq!(
            *rec.events.borrow(),
            vec![HostEvent::SelectionChanged { session }]
        );
    }

    #[test]
    fn test_selection_without_session() {
        let editable = HeadlessEditable::with_text("abc");
        assert_eq!(editable.selection(), TextRange::caret(0));
        editable.set_selection(TextRange::new(1, 1));
        assert_eq!(editable.selection(), TextRange::caret(0));

        editable.begin_editing();
        assert_eq!(editable.selection(), TextRange::caret(3));
        editable.end_editing();
        assert_eq!(editable.selection(), TextRange::caret(0));
    }

    #[test]
    fn test_sessions_are_unique() {
        let a = HeadlessEditable::new();
        let b = HeadlessEditable::new();
        assert_ne!(a.begin_editing(), b.begin_editing());

        a.end_editing();
        let first = b.begin_editing();
        b.end_editing();
        assert_ne!(b.begin_editing(), first);
    }

    #[test]
    fn test_select_to_end() {
        let editable = HeadlessEditable::with_text("hello");
        editable.select(TextRange::new(1, usize::MAX));
        assert_eq!(editable.selection(), TextRange::new(1, 4));

        editable.set_selection(TextRange::new(0, usize::MAX));
        assert_eq!(editable.selection(), TextRange::new(0, 5));
    }

    #[test]
    fn test_deletes() {
        let editable = HeadlessEditable::with_text("abc");
        editable.begin_editing();
        editable.delete_backward();
        assert_eq!(editable.text(), "ab");
        editable.move_left();
        editable.move_left();
        editable.delete_backward();
        assert_eq!(editable.text(), "ab");
        editable.delete_forward();
        assert_eq!(editable.text(), "b");
        assert_eq!(editable.selection(), TextRange::caret(0));
    }

    #[test]
    fn test_enter_inserts_newline_when_unhandled() {
        let editable = HeadlessEditable::with_text("ab");
        let rec = recorder(false);
        subscribe(&editable, &rec);

        assert_eq!(editable.press_key(Key::Enter), EventDisposition::PassThrough);
        assert_eq!(editable.text(), "ab\n");
    }

    #[test]
    fn test_handled_enter_skips_default() {
        let editable = HeadlessEditable::with_text("ab");
        let rec = recorder(true);
        subscribe(&editable, &rec);

        assert_eq!(editable.press_key(Key::Enter), EventDisposition::Handled);
        assert_eq!(editable.text(), "ab");
    }

    #[test]
    fn test_dropped_listener_is_pruned() {
        let editable = HeadlessEditable::new();
        let rec = recorder(false);
        subscribe(&editable, &rec);
        assert_eq!(editable.listener_count(), 1);

        drop(rec);
        assert_eq!(editable.listener_count(), 0);
        editable.type_text("x");
        assert_eq!(editable.text(), "x");
    }

    #[test]
    fn test_unsubscribe() {
        let editable = HeadlessEditable::new();
        let rec = recorder(false);
        let id = subscribe(&editable, &rec);
        editable.unsubscribe(id);
        editable.type_text("x");
        assert!(rec.events.borrow().is_empty());
    }
}
