//! controlled-input-core: controlled text input reconciliation without framework dependencies.
//!
//! A controlled input displays a value owned by somebody else (the controller).
//! The user edits a live buffer in a host widget, the controller is told about
//! every edit and either commits a value back synchronously or ignores it, in
//! which case the edit is rolled back together with the cursor.
//!
//! This crate provides:
//! - `TextState` / `TextRange` - snapshot value types
//! - `EditableHost` / `HostListener` - the boundary to the widget that owns the buffer
//! - `ControlledTextInput<H>` - the reconciliation engine
//! - `SelectionTracker` - keeps the rollback baseline in step with selection-only changes
//! - `InputConfig` - command bindings and failure policy

pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod tracker;
pub mod types;

#[cfg(test)]
mod testing;

pub use commands::{CommandBindings, InputCommand};
pub use config::InputConfig;
pub use engine::{
    ActionCallback, Callbacks, ChangeCallback, ControlledTextInput, ControlledTextInputBuilder,
    CyclePhase, EditOutcome,
};
pub use error::{InputError, Result};
pub use host::{
    EditableHost, EventDisposition, HostCommand, HostEvent, HostListener, SessionId,
    SubscriptionId,
};
pub use smol_str::SmolStr;
pub use tracker::SelectionTracker;
pub use types::{TextRange, TextState};
