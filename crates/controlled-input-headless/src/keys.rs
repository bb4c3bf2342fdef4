//! Key presses and their mapping onto host commands.

use controlled_input_core::HostCommand;

/// Keys the headless widget understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    ArrowLeft,
    ArrowRight,
}

/// A key with the one modifier that changes its meaning here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }

    /// The reserved command this press maps to, if any.
    ///
    /// Reserved commands are offered to listeners before the widget applies
    /// its default action.
    pub fn command(&self) -> Option<HostCommand> {
        match (self.key, self.shift) {
            (Key::Enter, false) => Some(HostCommand::InsertNewline),
            (Key::Enter, true) => Some(HostCommand::InsertLineBreak),
            (Key::Tab, false) => Some(HostCommand::InsertTab),
            (Key::Tab, true) => Some(HostCommand::InsertBacktab),
            (Key::Escape, _) => Some(HostCommand::CancelOperation),
            _ => None,
        }
    }
}

impl From<Key> for KeyPress {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}
