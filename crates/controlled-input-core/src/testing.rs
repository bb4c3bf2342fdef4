//! Minimal in-crate host used by unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Weak;

use smol_str::SmolStr;

use crate::host::{
    EditableHost, EventDisposition, HostCommand, HostEvent, HostListener, SessionId,
    SubscriptionId,
};
use crate::types::TextRange;

pub(crate) struct FakeHost {
    text: RefCell<SmolStr>,
    selection: Cell<TextRange>,
    session: Cell<Option<SessionId>>,
    listeners: RefCell<Vec<(SubscriptionId, Weak<dyn HostListener>)>>,
    next_subscription: Cell<u64>,
    pub(crate) set_text_calls: Cell<usize>,
}

impl FakeHost {
    pub(crate) fn new(text: &str, selection: TextRange) -> Self {
        Self {
            text: RefCell::new(text.into()),
            selection: Cell::new(selection),
            session: Cell::new(Some(SessionId(1))),
            listeners: RefCell::new(Vec::new()),
            next_subscription: Cell::new(0),
            set_text_calls: Cell::new(0),
        }
    }

    pub(crate) fn session(&self) -> SessionId {
        self.session.get().unwrap_or(SessionId(0))
    }

    pub(crate) fn end_session(&self) {
        self.session.set(None);
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// User edit: change text and caret, then notify.
    pub(crate) fn user_replace(&self, text: &str, selection: TextRange) -> EventDisposition {
        *self.text.borrow_mut() = text.into();
        self.selection.set(selection);
        self.emit(HostEvent::TextChanged {
            session: self.session(),
        })
    }

    /// User moves the caret without editing.
    pub(crate) fn user_select(&self, selection: TextRange) {
        self.selection.set(selection);
        self.emit(HostEvent::SelectionChanged {
            session: self.session(),
        });
    }

    pub(crate) fn user_command(&self, command: HostCommand) -> EventDisposition {
        self.emit(HostEvent::Command {
            session: self.session(),
            command,
        })
    }

    pub(crate) fn emit(&self, event: HostEvent) -> EventDisposition {
        let listeners: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .filter_map(|(_, weak)| weak.upgrade())
            .collect();

        let mut disposition = EventDisposition::PassThrough;
        for listener in listeners {
            if listener.handle_event(event).is_handled() {
                disposition = EventDisposition::Handled;
            }
        }
        disposition
    }
}

impl EditableHost for FakeHost {
    fn text(&self) -> SmolStr {
        self.text.borrow().clone()
    }

    fn selection(&self) -> TextRange {
        match self.session.get() {
            Some(_) => self.selection.get(),
            None => TextRange::default(),
        }
    }

    fn set_text(&self, text: &str) {
        self.set_text_calls.set(self.set_text_calls.get() + 1);
        *self.text.borrow_mut() = text.into();
        if self.session.get().is_some() {
            self.selection.set(TextRange::caret(text.chars().count()));
            self.emit(HostEvent::SelectionChanged {
                session: self.session(),
            });
        }
    }

    fn set_selection(&self, range: TextRange) {
        if self.session.get().is_none() {
            return;
        }
        let len = self.text.borrow().chars().count();
        self.selection.set(range.clamp_to(len));
        self.emit(HostEvent::SelectionChanged {
            session: self.session(),
        });
    }

    fn active_session(&self) -> Option<SessionId> {
        self.session.get()
    }

    fn subscribe(&self, listener: Weak<dyn HostListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.get());
        self.next_subscription.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.borrow_mut().retain(|(sub, _)| *sub != id);
    }
}
