//! Text buffer abstraction for the headless widget's storage.
//!
//! All offsets are in Unicode scalar values (chars), not bytes or UTF-16.

use std::ops::Range;

use smol_str::{SmolStr, ToSmolStr};

/// A text buffer that supports char-offset editing.
pub trait TextBuffer {
    /// Total length in chars (Unicode scalar values).
    fn len_chars(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Insert text at char offset.
    fn insert(&mut self, char_offset: usize, text: &str);

    /// Delete char range.
    fn delete(&mut self, char_range: Range<usize>);

    /// Replace char range with text.
    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.delete(char_range.clone());
        self.insert(char_range.start, text);
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    /// Whole buffer as SmolStr.
    fn contents(&self) -> SmolStr;
}

/// Ropey-backed text buffer.
#[derive(Clone, Default)]
pub struct RopeBuffer {
    rope: ropey::Rope,
}

impl RopeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }

    /// Replace the entire content.
    pub fn set(&mut self, s: &str) {
        self.rope = ropey::Rope::from_str(s);
    }
}

impl TextBuffer for RopeBuffer {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.rope.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        self.rope.remove(char_range);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    fn contents(&self) -> SmolStr {
        self.rope.slice(..).to_smolstr()
    }
}

impl From<&str> for RopeBuffer {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}
