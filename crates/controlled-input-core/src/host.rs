//! Boundary between the engine and the host editable widget.
//!
//! The host owns the raw editable buffer, glyph layout, focus and key handling.
//! The engine only needs to read and overwrite text and selection, and to hear
//! about edits, selection moves and a few reserved key commands.
//!
//! Host types are handles: every method takes `&self` and the implementation
//! keeps its state behind interior mutability, the same way DOM element handles
//! behave. Engine writes can therefore raise notifications synchronously without
//! tripping over outstanding borrows.

use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::InputError;
use crate::types::TextRange;

/// Identity of one editing session (a field editor attached to the widget).
///
/// Notifications carry the session they originated from so a listener can
/// ignore anything that does not belong to the widget's current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

/// Handle for a registered listener, used to unregister it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// The editable surface the engine reconciles against.
pub trait EditableHost {
    /// Current buffer content.
    fn text(&self) -> SmolStr;

    /// Current selection. `(0, 0)` when no editing session is active.
    fn selection(&self) -> TextRange;

    /// Replace the whole buffer programmatically.
    ///
    /// Must not raise `HostEvent::TextChanged`. The selection is reset the way
    /// the host does for programmatic content changes. May raise
    /// `HostEvent::SelectionChanged`.
    fn set_text(&self, text: &str);

    /// Move the selection programmatically. Ignored when no session is active.
    fn set_selection(&self, range: TextRange);

    /// The session currently editing this widget, if any.
    fn active_session(&self) -> Option<SessionId>;

    /// Register a listener for this widget instance only.
    ///
    /// The host keeps a non-owning reference; a listener that has been dropped
    /// is skipped and eventually pruned.
    fn subscribe(&self, listener: Weak<dyn HostListener>) -> SubscriptionId;

    /// Remove a listener registered with [`EditableHost::subscribe`].
    fn unsubscribe(&self, id: SubscriptionId);
}

impl<T: EditableHost + ?Sized> EditableHost for Rc<T> {
    fn text(&self) -> SmolStr {
        (**self).text()
    }

    fn selection(&self) -> TextRange {
        (**self).selection()
    }

    fn set_text(&self, text: &str) {
        (**self).set_text(text)
    }

    fn set_selection(&self, range: TextRange) {
        (**self).set_selection(range)
    }

    fn active_session(&self) -> Option<SessionId> {
        (**self).active_session()
    }

    fn subscribe(&self, listener: Weak<dyn HostListener>) -> SubscriptionId {
        (**self).subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        (**self).unsubscribe(id)
    }
}

/// Semantic key commands the host can offer to listeners before acting on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HostCommand {
    /// Enter / Return.
    InsertNewline,
    /// Shift+Enter.
    InsertLineBreak,
    /// Tab.
    InsertTab,
    /// Shift+Tab.
    InsertBacktab,
    /// Escape.
    CancelOperation,
}

impl HostCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsertNewline => "insertNewline",
            Self::InsertLineBreak => "insertLineBreak",
            Self::InsertTab => "insertTab",
            Self::InsertBacktab => "insertBacktab",
            Self::CancelOperation => "cancelOperation",
        }
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostCommand {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the trailing colon of selector spellings ("insertNewline:").
        match s.strip_suffix(':').unwrap_or(s) {
            "insertNewline" => Ok(Self::InsertNewline),
            "insertLineBreak" => Ok(Self::InsertLineBreak),
            "insertTab" => Ok(Self::InsertTab),
            "insertBacktab" => Ok(Self::InsertBacktab),
            "cancelOperation" => Ok(Self::CancelOperation),
            other => Err(InputError::UnknownCommand(other.to_string())),
        }
    }
}

/// Notification raised by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// The user changed the text.
    TextChanged { session: SessionId },
    /// The selection moved, by the user or programmatically.
    SelectionChanged { session: SessionId },
    /// A reserved key command, offered before the host's default action.
    Command {
        session: SessionId,
        command: HostCommand,
    },
}

impl HostEvent {
    pub fn session(&self) -> SessionId {
        match self {
            Self::TextChanged { session }
            | Self::SelectionChanged { session }
            | Self::Command { session, .. } => *session,
        }
    }
}

/// What the host should do after a listener saw an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventDisposition {
    /// The listener handled it; suppress the host's default action.
    Handled,
    /// Let the host carry on as usual.
    PassThrough,
}

impl EventDisposition {
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Receiver of host notifications.
pub trait HostListener {
    fn handle_event(&self, event: HostEvent) -> EventDisposition;
}
