//! Snapshot value types: selection ranges and text states.
//!
//! All offsets are in Unicode scalar values (chars), not bytes or UTF-16.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{InputError, Result};
use crate::host::EditableHost;

/// A selection range expressed as a start offset and a length.
///
/// A zero length means a caret at `start`.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub length: usize,
}

impl TextRange {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Zero-length range (caret) at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            length: 0,
        }
    }

    /// Exclusive end offset, saturating at `usize::MAX`.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.length)
    }

    pub fn is_caret(&self) -> bool {
        self.length == 0
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Clamp both ends into `0..=len`.
    pub fn clamp_to(self, len: usize) -> Self {
        let start = self.start.min(len);
        let end = self.end().min(len);
        Self::new(start, end - start)
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.length)
    }
}

impl From<Range<usize>> for TextRange {
    fn from(r: Range<usize>) -> Self {
        let (start, end) = if r.start <= r.end {
            (r.start, r.end)
        } else {
            (r.end, r.start)
        };
        Self::new(start, end - start)
    }
}

impl From<TextRange> for Range<usize> {
    fn from(r: TextRange) -> Self {
        r.to_range()
    }
}

/// Point-in-time snapshot of a widget's content and cursor.
///
/// Snapshots are never mutated in place; the engine builds a new one whenever
/// its baseline moves. `SmolStr` keeps the clone taken for each edit cycle cheap.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawTextState")]
pub struct TextState {
    text: SmolStr,
    selection: TextRange,
}

/// Unchecked wire form; deserialization goes through [`TextState::new`].
#[derive(Deserialize)]
struct RawTextState {
    text: SmolStr,
    selection: TextRange,
}

impl TryFrom<RawTextState> for TextState {
    type Error = InputError;

    fn try_from(raw: RawTextState) -> Result<Self> {
        Self::new(raw.text, raw.selection)
    }
}

impl TextState {
    /// Build a state, checking that the selection fits inside the text.
    pub fn new(text: impl Into<SmolStr>, selection: TextRange) -> Result<Self> {
        let text = text.into();
        let len = text.chars().count();
        if selection.end() > len {
            return Err(InputError::SelectionOutOfBounds {
                range: selection,
                len,
            });
        }
        Ok(Self { text, selection })
    }

    /// Empty text with a caret at offset 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read the current text and selection from a host widget.
    pub fn capture<H: EditableHost + ?Sized>(host: &H) -> Self {
        Self {
            text: host.text(),
            selection: host.selection(),
        }
    }

    pub fn text(&self) -> &SmolStr {
        &self.text
    }

    pub fn selection(&self) -> TextRange {
        self.selection
    }

    /// Same selection, different text.
    ///
    /// The selection is kept as-is even if it no longer fits; the baseline
    /// only holds such a state transiently while the widget catches up.
    pub fn with_text(&self, text: impl Into<SmolStr>) -> Self {
        Self {
            text: text.into(),
            selection: self.selection,
        }
    }

    /// Same text, different selection.
    pub fn with_selection(&self, selection: TextRange) -> Self {
        Self {
            text: self.text.clone(),
            selection,
        }
    }
}
