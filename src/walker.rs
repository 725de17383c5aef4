//! The stack-based sexp walker: generic forward/backward movement over
//! balanced sub-expressions, driven by a compiled [`Grammar`] and an
//! opaque token cursor.

use crate::grammar::{Grammar, Level};
use crate::prec2::SymbolClass;

/// The minimal token-movement interface the walker needs: advance one
/// token in either direction, and read the token currently under the
/// cursor without moving it.
pub trait TokenCursor {
    /// Advances one token in the forward (left-to-right) direction.
    /// Returns `false` if there is no next token.
    fn advance_forward(&mut self) -> bool;
    /// Advances one token in the backward (right-to-left) direction.
    /// Returns `false` if there is no previous token.
    fn advance_backward(&mut self) -> bool;
    /// The text of the token currently under the cursor, or `None` if
    /// the cursor is not positioned on a token.
    fn read_token(&self) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

fn advance(cursor: &mut dyn TokenCursor, direction: Direction) -> bool {
    match direction {
        Direction::Forward => cursor.advance_forward(),
        Direction::Backward => cursor.advance_backward(),
    }
}

/// Forward selector: `(precedence, is_closer_side)`. Moving forward
/// this reads `right_prec` and flags closers; moving backward it reads
/// `left_prec` and flags openers.
fn op_forward(level: Level, direction: Direction) -> (i32, bool) {
    match direction {
        Direction::Forward => (level.right_prec, level.class == SymbolClass::Closer),
        Direction::Backward => (level.left_prec, level.class == SymbolClass::Opener),
    }
}

/// Backward selector, the mirror of [`op_forward`].
fn op_backward(level: Level, direction: Direction) -> (i32, bool) {
    match direction {
        Direction::Forward => (level.left_prec, level.class == SymbolClass::Opener),
        Direction::Backward => (level.right_prec, level.class == SymbolClass::Closer),
    }
}

fn is_associative(level: Level) -> bool {
    level.left_prec == level.right_prec
}

fn run_sexp(grammar: &Grammar, cursor: &mut dyn TokenCursor, direction: Direction) -> bool {
    if cursor.read_token().is_none() && !advance(cursor, direction) {
        log::trace!("walker: no token to start from");
        return false;
    }

    let mut stack: Vec<Level> = Vec::new();
    loop {
        let Some(text) = cursor.read_token() else {
            return false;
        };
        let Some(level) = grammar.lookup_terminal(&text) else {
            log::trace!("walker: {:?} not in grammar, skipping", text);
            if !advance(cursor, direction) {
                return false;
            }
            continue;
        };

        let (_, back_push) = op_backward(level, direction);
        if back_push {
            log::trace!("walker: push {:?}", text);
            stack.push(level);
            if !advance(cursor, direction) {
                return false;
            }
            continue;
        }

        // Peel: pop every frame that this token's forward precedence
        // cannot reach.
        while let Some(&top) = stack.last() {
            let (fwd_prec, _) = op_forward(level, direction);
            let (top_back_prec, _) = op_backward(top, direction);
            if fwd_prec >= top_back_prec {
                break;
            }
            log::trace!("walker: peel");
            stack.pop();
        }

        if stack.is_empty() {
            log::trace!("walker: matched at outer level");
            return true;
        }

        let top = *stack.last().unwrap();
        let (fwd_prec, _) = op_forward(level, direction);
        let (top_back_prec, _) = op_backward(top, direction);
        if fwd_prec == top_back_prec {
            stack.pop();
        }

        if !stack.is_empty() {
            let (_, fwd_is_closer) = op_forward(level, direction);
            if !fwd_is_closer {
                stack.push(level);
            }
        } else {
            let (_, fwd_is_closer) = op_forward(level, direction);
            if fwd_is_closer {
                log::trace!("walker: matched at outer level");
                return true;
            } else if !is_associative(level) {
                stack.push(level);
            } else if is_associative(top) {
                log::trace!("walker: associative tie, unbalanced");
                return false;
            } else {
                stack.push(top);
            }
        }

        if !advance(cursor, direction) {
            return false;
        }
    }
}

/// Advances `cursor` over one balanced sub-expression moving forward,
/// starting at (or just before) the cursor's current position.
pub fn forward_sexp(grammar: &Grammar, cursor: &mut dyn TokenCursor) -> bool {
    run_sexp(grammar, cursor, Direction::Forward)
}

/// The mirror of [`forward_sexp`], moving backward.
pub fn backward_sexp(grammar: &Grammar, cursor: &mut dyn TokenCursor) -> bool {
    run_sexp(grammar, cursor, Direction::Backward)
}
