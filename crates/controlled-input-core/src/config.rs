use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::commands::CommandBindings;
use crate::error::Result;
use crate::host::HostCommand;

/// Per-input configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputConfig {
    /// Host commands that trigger `on_submit`.
    pub submit_commands: Vec<HostCommand>,
    /// Host commands that trigger `on_press_escape`.
    pub cancel_commands: Vec<HostCommand>,
    /// Restore the pre-edit snapshot before letting a panicking change
    /// callback unwind further.
    pub rollback_on_panic: bool,
    /// Report bound commands as handled even when no callback is registered,
    /// so e.g. Enter never inserts a newline into a single-line field.
    pub suppress_unbound_commands: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            submit_commands: vec![HostCommand::InsertNewline],
            cancel_commands: vec![HostCommand::CancelOperation],
            rollback_on_panic: false,
            suppress_unbound_commands: false,
        }
    }
}

impl InputConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn bindings(&self) -> CommandBindings {
        CommandBindings::new(self.submit_commands.clone(), self.cancel_commands.clone())
    }
}
