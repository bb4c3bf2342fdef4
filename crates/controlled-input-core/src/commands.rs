//! Reserved key commands and how they map onto controller notifications.

use serde::{Deserialize, Serialize};

use crate::host::HostCommand;

/// Controller-facing commands intercepted from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputCommand {
    /// Confirm the current value (Enter).
    Submit,
    /// Abandon editing (Escape).
    Cancel,
}

/// Which host commands count as submit and which as cancel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandBindings {
    submit: Vec<HostCommand>,
    cancel: Vec<HostCommand>,
}

impl Default for CommandBindings {
    fn default() -> Self {
        Self {
            submit: vec![HostCommand::InsertNewline],
            cancel: vec![HostCommand::CancelOperation],
        }
    }
}

impl CommandBindings {
    pub fn new(submit: Vec<HostCommand>, cancel: Vec<HostCommand>) -> Self {
        Self { submit, cancel }
    }

    /// Resolve a host command. Submit bindings win if a command is bound twice.
    pub fn resolve(&self, command: HostCommand) -> Option<InputCommand> {
        if self.submit.contains(&command) {
            Some(InputCommand::Submit)
        } else if self.cancel.contains(&command) {
            Some(InputCommand::Cancel)
        } else {
            None
        }
    }
}
