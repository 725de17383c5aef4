//! Recoverable error type shared by the three fallible compiler entry
//! points (`bnf_load_from_text`, `bnf_to_prec2`, `prec2_to_grammar`).
//!
//! Invariant violations that indicate a caller bug rather than a bad
//! grammar (adjacent nonterminals in a rule, unbalanced cursor
//! save/restore) are not part of this type; those are asserted in place
//! and documented on the operation that can panic.

use std::fmt;

use thiserror::Error;

/// A position in grammar source text, one-based to match editor
/// conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePos {
    /// One-based line number.
    pub line: u32,
    /// One-based column number.
    pub column: u32,
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Everything that can go wrong while compiling a grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// The grammar source text did not match the ABNF grammar.
    #[error("syntax error at {pos}: {detail}")]
    Syntax {
        /// Where in the source the error was found.
        pos: SourcePos,
        /// Human-readable detail.
        detail: String,
    },
    /// A BNF→PREC2 relation conflicted with an already-recorded one and
    /// no `%precs` override resolved it.
    #[error("conflicting precedence relation for ({left}, {right})")]
    Conflict {
        /// Left operand of the conflicting pair, as grammar-source text.
        left: String,
        /// Right operand of the conflicting pair, as grammar-source text.
        right: String,
    },
    /// PREC2→Grammar compilation found a cycle in the `<` relation over
    /// function variables and could not assign levels.
    #[error("cycle found in prec2 grammar")]
    Cycle,
}
