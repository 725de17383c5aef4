//! The capability set the indenter needs from a text buffer, plus a scope
//! guard for the save/restore discipline the rule cascade relies on.

/// Nineteen cursor operations: positional predicates, character/line/
/// token/comment movement, column accessors, and scoped save/restore.
pub trait Cursor {
    /// Moves one character forward. Returns `false` if already at the
    /// end of buffer.
    fn forward_char(&mut self) -> bool;
    /// Moves one character backward. Returns `false` if already at the
    /// start of buffer.
    fn backward_char(&mut self) -> bool;
    /// Moves to the start of the next line. Returns `false` if there is
    /// no next line.
    fn forward_line(&mut self) -> bool;
    /// Moves to the start of the current (or previous) line. Returns
    /// `false` if the cursor does not move.
    fn backward_line(&mut self) -> bool;
    /// Moves to the end of the current line (on the newline character,
    /// if any). Returns `false` if the cursor does not move.
    fn forward_to_line_end(&mut self) -> bool;
    /// Moves to the start of the current line. Returns `false` if the
    /// cursor does not move.
    fn backward_to_line_start(&mut self) -> bool;
    /// Skips whitespace forward, stopping on the first non-whitespace
    /// character or at the end of buffer. Returns `false` if the cursor
    /// does not move.
    fn forward_comment(&mut self) -> bool;
    /// Skips whitespace backward, stopping on the first non-whitespace
    /// character or at the start of buffer. Returns `false` if the
    /// cursor does not move.
    fn backward_comment(&mut self) -> bool;
    /// Moves to the start of the next token, returning the token text
    /// skipped over, or `None` if there is no next token.
    fn forward_token(&mut self) -> Option<String>;
    /// Moves to the end of the previous token, returning the token text
    /// skipped over, or `None` if there is no previous token.
    fn backward_token(&mut self) -> Option<String>;
    /// True if the cursor is at the start of the buffer.
    fn is_start(&self) -> bool;
    /// True if the cursor is at the end of the buffer.
    fn is_end(&self) -> bool;
    /// True if the cursor is at the start of its line.
    fn starts_line(&self) -> bool;
    /// True if the cursor is at the end of its line.
    fn ends_line(&self) -> bool;
    /// The cursor's absolute offset into the buffer.
    fn get_offset(&self) -> usize;
    /// The cursor's offset from the start of its line.
    fn get_line_offset(&self) -> usize;
    /// The character under the cursor, or `None` at the end of buffer.
    fn get_char(&self) -> Option<char>;
    /// Saves the current position to a LIFO stack.
    fn push_context(&mut self);
    /// Restores the position most recently saved by `push_context`.
    ///
    /// # Panics
    ///
    /// Panics if the save/restore stack is empty (unbalanced
    /// `push_context`/`pop_context` is a programming error).
    fn pop_context(&mut self);
}

/// A scoped acquisition of a cursor snapshot, restored on drop
/// regardless of how the enclosing rule returns.
pub struct ScopedCursor<'a> {
    cursor: &'a mut dyn Cursor,
}

impl<'a> ScopedCursor<'a> {
    /// Pushes a new context onto `cursor` and returns a guard that pops
    /// it back off when dropped.
    pub fn new(cursor: &'a mut dyn Cursor) -> ScopedCursor<'a> {
        cursor.push_context();
        ScopedCursor { cursor }
    }

    /// Reborrows the guarded cursor for the remaining lifetime of this
    /// scope.
    pub fn get_mut(&mut self) -> &mut dyn Cursor {
        self.cursor
    }
}

impl<'a> Drop for ScopedCursor<'a> {
    fn drop(&mut self) {
        self.cursor.pop_context();
    }
}

/// Bridges a [`Cursor`] into the walker's
/// [`TokenCursor`](crate::walker::TokenCursor) interface so the indenter
/// can drive `forward_sexp`/`backward_sexp` directly.
pub(crate) struct CursorTokenAdapter<'a> {
    cursor: &'a mut dyn Cursor,
    current: Option<String>,
}

impl<'a> CursorTokenAdapter<'a> {
    /// Wraps `cursor` with no token cached yet; the first walker read
    /// will trigger a move.
    pub(crate) fn new(cursor: &'a mut dyn Cursor) -> CursorTokenAdapter<'a> {
        CursorTokenAdapter {
            cursor,
            current: None,
        }
    }

    /// Wraps `cursor`, priming the adapter with `token` as the text
    /// already under the cursor without moving it — used by the keyword
    /// rule to fold its own already-read token into the walk.
    pub(crate) fn primed(cursor: &'a mut dyn Cursor, token: String) -> CursorTokenAdapter<'a> {
        CursorTokenAdapter {
            cursor,
            current: Some(token),
        }
    }
}

impl<'a> crate::walker::TokenCursor for CursorTokenAdapter<'a> {
    fn advance_forward(&mut self) -> bool {
        match self.cursor.forward_token() {
            Some(token) => {
                self.current = Some(token);
                true
            }
            None => false,
        }
    }

    fn advance_backward(&mut self) -> bool {
        match self.cursor.backward_token() {
            Some(token) => {
                self.current = Some(token);
                true
            }
            None => false,
        }
    }

    fn read_token(&self) -> Option<String> {
        self.current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferCursor;

    #[test]
    fn scope_restores_on_drop() {
        let mut cursor = BufferCursor::new("a b c");
        cursor.forward_token();
        let offset_before = cursor.get_offset();
        {
            let mut scope = ScopedCursor::new(&mut cursor);
            scope.get_mut().forward_token();
            assert_ne!(scope.get_mut().get_offset(), offset_before);
        }
        assert_eq!(cursor.get_offset(), offset_before);
    }

    #[test]
    fn scope_restores_on_early_return() {
        fn probe(cursor: &mut dyn Cursor) -> bool {
            let scope_offset = cursor.get_offset();
            let mut scope = ScopedCursor::new(cursor);
            scope.get_mut().forward_token();
            if scope.get_mut().get_offset() != scope_offset {
                return true;
            }
            false
        }
        let mut cursor = BufferCursor::new("a b");
        let moved = probe(&mut cursor);
        assert!(moved);
        assert_eq!(cursor.get_offset(), 0);
    }
}
