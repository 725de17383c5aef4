//! A generic, language-agnostic indentation engine based on an
//! operator-precedence formulation of grammars (the "SMIE" approach).
//!
//! From a user-supplied grammar, [`bnf_to_prec2`] and [`prec2_to_grammar`]
//! compile a compact numeric precedence table (a [`grammar::Grammar`]).
//! [`walker::forward_sexp`]/[`walker::backward_sexp`] then walk buffered
//! source text by balanced sub-expressions using that table, and
//! [`indenter::Indenter`] computes the indentation column for a line.
//!
//! The textual grammar parser ([`parser::bnf_load_from_text`]) and the
//! in-memory [`buffer::BufferCursor`] are included as the minimal
//! collaborators a library needs to be useful standalone; a real editor
//! integration supplies its own [`cursor::Cursor`] implementation instead.

#![deny(missing_docs,
        missing_copy_implementations,
        trivial_casts,
        trivial_numeric_casts,
        unused_import_braces,
        unused_qualifications)]

#![cfg_attr(test, deny(warnings))]

mod bnf;
mod bnf_to_prec2;
mod buffer;
mod cursor;
mod error;
mod grammar;
mod indenter;
mod parser;
mod prec2;
mod precs;
mod symbol;
mod walker;

pub use bnf::{BnfGrammar, Rule};
pub use bnf_to_prec2::bnf_to_prec2;
pub use buffer::BufferCursor;
pub use cursor::{Cursor, ScopedCursor};
pub use error::{GrammarError, SourcePos};
pub use grammar::{prec2_to_grammar, Grammar, Level};
pub use indenter::Indenter;
pub use parser::bnf_load_from_text;
pub use prec2::{Prec2Grammar, Prec2Relation, SymbolClass};
pub use precs::{merge_precs, Associativity, PrecsGrammar};
pub use symbol::{Symbol, SymbolKind, SymbolPool};
pub use walker::{backward_sexp, forward_sexp, TokenCursor};
