//! Error types for controlled input operations.
//!
//! Reconciliation itself never fails. Errors come from validated constructors,
//! command name parsing and configuration loading.

use miette::Diagnostic;
use thiserror::Error;

use crate::types::TextRange;

/// Errors produced by the controlled input crates.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum InputError {
    /// A selection reaches past the end of the text it belongs to.
    #[error("selection {range} is out of bounds for text of {len} chars")]
    #[diagnostic(
        code(controlled_input::selection_out_of_bounds),
        help("selection offsets are counted in chars, not bytes")
    )]
    SelectionOutOfBounds { range: TextRange, len: usize },

    /// A host command name that is not recognised.
    #[error("unknown host command: {0}")]
    #[diagnostic(code(controlled_input::unknown_command))]
    UnknownCommand(String),

    /// Configuration could not be parsed.
    #[error("invalid input configuration")]
    #[diagnostic(code(controlled_input::config))]
    InvalidConfig(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("failed to read input configuration")]
    #[diagnostic(code(controlled_input::config_io))]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InputError>;
