//! `BufferCursor`: an in-memory [`Cursor`] implementation over a `&str`
//! buffer, with whitespace-delimited tokenization, `\n`-delimited lines,
//! and an offset stack for save/restore.

use crate::cursor::Cursor;

/// A `Cursor` over an owned buffer of characters, for this crate's own
/// tests and for embedders without a text-buffer integration of their
/// own yet.
#[derive(Debug, Clone)]
pub struct BufferCursor {
    chars: Vec<char>,
    offset: usize,
    stack: Vec<usize>,
}

impl BufferCursor {
    /// Creates a cursor over `text`, positioned at offset 0.
    pub fn new(text: &str) -> BufferCursor {
        BufferCursor {
            chars: text.chars().collect(),
            offset: 0,
            stack: Vec::new(),
        }
    }

    /// Moves the cursor to an arbitrary character offset.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is past the end of the buffer.
    pub fn set_offset(&mut self, offset: usize) {
        assert!(offset <= self.chars.len(), "offset out of bounds");
        self.offset = offset;
    }
}

impl Cursor for BufferCursor {
    fn forward_char(&mut self) -> bool {
        if self.offset < self.chars.len() {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    fn backward_char(&mut self) -> bool {
        if self.offset > 0 {
            self.offset -= 1;
            true
        } else {
            false
        }
    }

    fn forward_line(&mut self) -> bool {
        let start = self.offset;
        self.forward_to_line_end();
        if self.offset < self.chars.len() && self.chars[self.offset] == '\n' {
            self.offset += 1;
        }
        start != self.offset
    }

    fn backward_line(&mut self) -> bool {
        let start = self.offset;
        self.backward_to_line_start();
        if self.offset > 0 && self.chars[self.offset - 1] == '\n' {
            self.offset -= 1;
        }
        start != self.offset
    }

    fn forward_to_line_end(&mut self) -> bool {
        let start = self.offset;
        while self.offset < self.chars.len() && self.chars[self.offset] != '\n' {
            self.offset += 1;
        }
        start != self.offset
    }

    fn backward_to_line_start(&mut self) -> bool {
        let start = self.offset;
        while self.offset > 0 && self.chars[self.offset - 1] != '\n' {
            self.offset -= 1;
        }
        start != self.offset
    }

    fn forward_comment(&mut self) -> bool {
        let start = self.offset;
        while self.offset < self.chars.len()
            && self.chars[self.offset] != '\n'
            && self.chars[self.offset].is_whitespace()
        {
            self.offset += 1;
        }
        start != self.offset
    }

    fn backward_comment(&mut self) -> bool {
        let start = self.offset;
        while self.offset > 0
            && self.chars[self.offset - 1] != '\n'
            && self.chars[self.offset - 1].is_whitespace()
        {
            self.offset -= 1;
        }
        start != self.offset
    }

    fn forward_token(&mut self) -> Option<String> {
        while self.offset < self.chars.len() && self.chars[self.offset].is_whitespace() {
            self.offset += 1;
        }
        if self.offset >= self.chars.len() {
            return None;
        }
        let start = self.offset;
        while self.offset < self.chars.len() && !self.chars[self.offset].is_whitespace() {
            self.offset += 1;
        }
        Some(self.chars[start..self.offset].iter().collect())
    }

    fn backward_token(&mut self) -> Option<String> {
        while self.offset > 0 && self.chars[self.offset - 1].is_whitespace() {
            self.offset -= 1;
        }
        if self.offset == 0 {
            return None;
        }
        let end = self.offset;
        while self.offset > 0 && !self.chars[self.offset - 1].is_whitespace() {
            self.offset -= 1;
        }
        Some(self.chars[self.offset..end].iter().collect())
    }

    fn is_start(&self) -> bool {
        self.offset == 0
    }

    fn is_end(&self) -> bool {
        self.offset >= self.chars.len()
    }

    fn starts_line(&self) -> bool {
        self.offset == 0 || self.chars[self.offset - 1] == '\n'
    }

    fn ends_line(&self) -> bool {
        self.offset >= self.chars.len() || self.chars[self.offset] == '\n'
    }

    fn get_offset(&self) -> usize {
        self.offset
    }

    fn get_line_offset(&self) -> usize {
        let mut start = self.offset;
        while start > 0 && self.chars[start - 1] != '\n' {
            start -= 1;
        }
        self.offset - start
    }

    fn get_char(&self) -> Option<char> {
        self.chars.get(self.offset).copied()
    }

    fn push_context(&mut self) {
        self.stack.push(self.offset);
    }

    fn pop_context(&mut self) {
        self.offset = self
            .stack
            .pop()
            .expect("pop_context without matching push_context");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_token_skips_leading_whitespace() {
        let mut cursor = BufferCursor::new("  foo bar");
        assert_eq!(cursor.forward_token().as_deref(), Some("foo"));
        assert_eq!(cursor.forward_token().as_deref(), Some("bar"));
        assert_eq!(cursor.forward_token(), None);
    }

    #[test]
    fn backward_token_mirrors_forward() {
        let mut cursor = BufferCursor::new("foo bar");
        cursor.set_offset(7);
        assert_eq!(cursor.backward_token().as_deref(), Some("bar"));
        assert_eq!(cursor.backward_token().as_deref(), Some("foo"));
        assert_eq!(cursor.backward_token(), None);
    }

    #[test]
    fn line_offset_tracks_column() {
        let mut cursor = BufferCursor::new("ab\ncd");
        cursor.set_offset(4);
        assert_eq!(cursor.get_line_offset(), 1);
        assert!(!cursor.starts_line());
        cursor.set_offset(3);
        assert!(cursor.starts_line());
    }

    #[test]
    fn push_pop_context_round_trips() {
        let mut cursor = BufferCursor::new("a b c");
        cursor.forward_token();
        let saved = cursor.get_offset();
        cursor.push_context();
        cursor.forward_token();
        assert_ne!(cursor.get_offset(), saved);
        cursor.pop_context();
        assert_eq!(cursor.get_offset(), saved);
    }

    #[test]
    #[should_panic(expected = "pop_context without matching push_context")]
    fn unbalanced_pop_panics() {
        let mut cursor = BufferCursor::new("a");
        cursor.pop_context();
    }
}
