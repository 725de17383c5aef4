//! The indentation rule cascade: `at-beginning-of-buffer`,
//! `line-starts-with-keyword`, `after-keyword`.
//!
//! Three behaviors worth calling out explicitly: `effectively_starts_line`
//! inspects the character at the line's start instead of skipping it (a
//! line whose very first character is non-blank must not look like it
//! "starts" at a later column), `rule_after_keyword` steps in after every
//! keyword's continuation rather than only openers and pair ends (so a
//! continuation after a plain operator still indents one level deeper),
//! and `rule_keyword`'s closer-alignment branch aligns to the parent
//! keyword's virtual indent rather than its raw column (so a closer lines
//! up with its opener's own statement rather than a continuation line the
//! opener happens to sit on).

use crate::cursor::{Cursor, CursorTokenAdapter, ScopedCursor};
use crate::grammar::Grammar;
use crate::prec2::SymbolClass;
use crate::walker::backward_sexp;

/// Computes indentation columns for a single compiled [`Grammar`].
pub struct Indenter {
    grammar: Grammar,
    step: i32,
}

impl Indenter {
    /// Creates an indenter over `grammar`, indenting by `step` columns
    /// per nesting level.
    ///
    /// # Panics
    ///
    /// Panics if `step` is negative.
    pub fn new(grammar: Grammar, step: i32) -> Indenter {
        assert!(step >= 0, "indent step must be non-negative");
        Indenter { grammar, step }
    }

    /// The grammar this indenter was built from.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Computes the column the current line should be indented to,
    /// moving the cursor to the start of that line first. Never fails;
    /// falls back to `0` if no rule fires.
    pub fn calculate(&self, cursor: &mut dyn Cursor) -> i32 {
        cursor.backward_to_line_start();
        self.calculate_raw(cursor).unwrap_or(0)
    }

    fn calculate_raw(&self, cursor: &mut dyn Cursor) -> Option<i32> {
        if let Some(indent) = self.rule_beginning_of_buffer(cursor) {
            return Some(indent);
        }
        if let Some(indent) = self.rule_keyword(cursor) {
            return Some(indent);
        }
        if let Some(indent) = self.rule_after_keyword(cursor) {
            return Some(indent);
        }
        None
    }

    /// Rule 1: at the beginning of the buffer (ignoring leading
    /// comments/whitespace), indent to column 0.
    fn rule_beginning_of_buffer(&self, cursor: &mut dyn Cursor) -> Option<i32> {
        let mut scope = ScopedCursor::new(cursor);
        scope.get_mut().backward_comment();
        if scope.get_mut().is_start() {
            Some(0)
        } else {
            None
        }
    }

    /// Rule 2: the current line starts with a grammar keyword.
    fn rule_keyword(&self, cursor: &mut dyn Cursor) -> Option<i32> {
        let offset = cursor.get_offset();

        let token = {
            let mut scope = ScopedCursor::new(cursor);
            scope.get_mut().forward_token()
        }?;

        let symbol = self.grammar.lookup_terminal(&token)?;
        let level = self.grammar.level(symbol).unwrap();

        if level.class == SymbolClass::Opener {
            if Self::effectively_starts_line(cursor) {
                return None;
            }
            return Some(cursor.get_line_offset() as i32);
        }

        let offset_before_walk = cursor.get_offset();
        let mut scope = ScopedCursor::new(cursor);
        {
            let mut adapter = CursorTokenAdapter::primed(scope.get_mut(), token);
            backward_sexp(&self.grammar, &mut adapter);
        }
        if offset_before_walk == scope.get_mut().get_offset() {
            return None;
        }

        let parent_token = {
            let mut inner = ScopedCursor::new(scope.get_mut());
            inner.get_mut().forward_token()
        }?;

        // Place the cursor at the first non-comment token of the
        // parent's line, for any later `virtual_indent` call.
        if scope.get_mut().ends_line() {
            scope.get_mut().forward_char();
        }
        scope.get_mut().forward_comment();

        let parent_symbol = self.grammar.lookup_terminal(&parent_token);
        let parent_level = parent_symbol.and_then(|s| self.grammar.level(s));

        if let Some(parent_level) = parent_level {
            if level.left_prec == parent_level.left_prec {
                if offset != scope.get_mut().get_offset()
                    && Self::effectively_starts_line(scope.get_mut())
                {
                    return Some(scope.get_mut().get_line_offset() as i32);
                }
                return Some(self.virtual_indent(scope.get_mut()));
            }
        }

        if offset == scope.get_mut().get_offset() && Self::effectively_starts_line(scope.get_mut()) {
            return None;
        }

        // Align with the parent keyword's own statement, not its raw
        // column: a parent that is itself a continuation line (e.g. an
        // opener following another keyword on the same line) must not
        // leak its column into the closer's indent.
        Some(self.virtual_indent(scope.get_mut()))
    }

    /// Rule 3: the cursor is immediately after a grammar keyword. Every
    /// keyword here — not just openers and pair ends — steps its
    /// continuation in by one level.
    fn rule_after_keyword(&self, cursor: &mut dyn Cursor) -> Option<i32> {
        let mut scope = ScopedCursor::new(cursor);
        let token = scope.get_mut().backward_token()?;
        let symbol = self.grammar.lookup_terminal(&token)?;
        let level = self.grammar.level(symbol).unwrap();
        if level.class == SymbolClass::Closer {
            return None;
        }

        if scope.get_mut().ends_line() {
            scope.get_mut().forward_char();
        }
        scope.get_mut().forward_comment();

        Some(self.virtual_indent(scope.get_mut()) + self.step)
    }

    /// The column `cursor` would be indented to, treating a position
    /// that already starts its own line as its own answer rather than
    /// recursing.
    fn virtual_indent(&self, cursor: &mut dyn Cursor) -> i32 {
        if Self::effectively_starts_line(cursor) {
            cursor.get_line_offset() as i32
        } else {
            self.calculate(cursor)
        }
    }

    /// True if `cursor` is at the start of its line, or only whitespace
    /// precedes it on that line. Walks backward past whitespace and stops
    /// as soon as it crosses the line boundary or hits a non-blank
    /// character, so a line's own first character is always examined
    /// (unlike a naive scan that checks `starts_line` right after
    /// stepping back, which would miss a non-blank first character).
    fn effectively_starts_line(cursor: &mut dyn Cursor) -> bool {
        if cursor.starts_line() {
            return true;
        }
        let mut scope = ScopedCursor::new(cursor);
        loop {
            if !scope.get_mut().backward_char() {
                break;
            }
            match scope.get_mut().get_char() {
                Some(' ') | Some('\t') => {
                    if scope.get_mut().starts_line() {
                        break;
                    }
                }
                _ => return false,
            }
        }
        true
    }
}
