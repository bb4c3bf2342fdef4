//! Headless host for the controlled input engine.
//!
//! This crate provides an in-memory stand-in for a native text field, so the
//! engine in `controlled-input-core` can be driven without a UI toolkit: in
//! tests, in headless tools, or as the model behind a custom-drawn widget.
//!
//! # Architecture
//!
//! - `text`: ropey-backed buffer with char offsets
//! - `editable`: the widget itself (sessions, listeners, user input)
//! - `keys`: key presses and the reserved commands they map to
//! - `telemetry`: console tracing setup (feature `telemetry`)
//!
//! # Re-exports
//!
//! This crate re-exports `controlled-input-core` for convenience, so consumers
//! only need to depend on `controlled-input-headless`.

// Re-export core crate
pub use controlled_input_core;
pub use controlled_input_core::*;

pub mod editable;
pub mod keys;
pub mod text;

#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use editable::HeadlessEditable;
pub use keys::{Key, KeyPress};
pub use text::{RopeBuffer, TextBuffer};

/// A controlled input attached to a headless widget.
pub type HeadlessInput = ControlledTextInput<HeadlessEditable>;
