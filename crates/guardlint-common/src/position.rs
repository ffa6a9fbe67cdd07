//! Line/column positions for byte offsets.
//!
//! The engine works purely in byte offsets. Hosts convert to 0-based
//! line/character pairs through a [`LineMap`] built once per file.

use serde::Serialize;

/// A 0-based line and character (byte column) position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open range between two positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Byte offsets of every line start in a source text.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    line_starts: Vec<u32>,
    text_len: u32,
}

impl LineMap {
    /// Build the line table. Only `\n` terminates a line; a preceding `\r`
    /// stays part of the previous line's content.
    pub fn build(source: &str) -> Self {
        let mut line_starts = Vec::with_capacity(source.len() / 32 + 1);
        line_starts.push(0);
        for nl in memchr::memchr_iter(b'\n', source.as_bytes()) {
            line_starts.push((nl + 1) as u32);
        }
        Self {
            line_starts,
            text_len: source.len() as u32,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to a position. Offsets past the end clamp to the
    /// end of the text.
    pub fn offset_to_position(&self, offset: u32) -> Position {
        let offset = offset.min(self.text_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position::new(line as u32, offset - self.line_starts[line])
    }

    /// Convert a position back to a byte offset, clamping past-the-end lines.
    pub fn position_to_offset(&self, position: Position) -> u32 {
        let Some(&start) = self.line_starts.get(position.line as usize) else {
            return self.text_len;
        };
        (start + position.character).min(self.text_len)
    }

    pub fn range_of(&self, start: u32, length: u32) -> Range {
        Range::new(
            self.offset_to_position(start),
            self.offset_to_position(start + length),
        )
    }
}

#[cfg(test)]
#[path = "../tests/position_tests.rs"]
mod tests;
