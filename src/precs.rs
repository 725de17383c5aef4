//! User-supplied associativity resolvers (`%precs` blocks) and their
//! merge into an override PREC2 grammar.

use crate::prec2::{Prec2Grammar, Prec2Relation};
use crate::symbol::{Symbol, SymbolPool};

/// The four resolver kinds a `%precs` line can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Associativity {
    /// `left`: operators bind to the left; self-pairs are `GT`.
    Left,
    /// `right`: operators bind to the right; self-pairs are `LT`.
    Right,
    /// `assoc`: operators are mutually associative; self-pairs are `EQ`.
    Assoc,
    /// `non-assoc`: no self-relation is emitted at all.
    NonAssoc,
}

impl Associativity {
    /// The relation a self-pair within one resolver line receives, or
    /// `None` for `NonAssoc`, which emits no self-relation.
    fn self_relation(self) -> Option<Prec2Relation> {
        match self {
            Associativity::Left => Some(Prec2Relation::Gt),
            Associativity::Right => Some(Prec2Relation::Lt),
            Associativity::Assoc => Some(Prec2Relation::Eq),
            Associativity::NonAssoc => None,
        }
    }
}

/// One ordered list of `(kind, operators)` lines, exactly one `%precs`
/// block's worth.
#[derive(Debug, Clone)]
pub struct PrecsGrammar {
    pool: SymbolPool,
    lines: Vec<(Associativity, Vec<Symbol>)>,
}

impl PrecsGrammar {
    /// Creates an empty resolver list backed by `pool`.
    pub fn new(pool: SymbolPool) -> PrecsGrammar {
        PrecsGrammar {
            pool,
            lines: Vec::new(),
        }
    }

    /// The symbol pool this resolver's symbols were interned from.
    pub fn pool(&self) -> &SymbolPool {
        &self.pool
    }

    /// Appends one resolver line, e.g. `left "+" "-"`.
    pub fn add(&mut self, kind: Associativity, symbols: impl IntoIterator<Item = Symbol>) {
        let symbols: Vec<Symbol> = symbols.into_iter().collect();
        log::trace!("precs: add {:?} {:?}", kind, symbols);
        self.lines.push((kind, symbols));
    }

    /// Iterates the resolver lines in declaration order; order matters
    /// for cross-line precedence — lines earlier in the list bind tighter
    /// than later lines.
    pub fn lines(&self) -> impl Iterator<Item = (Associativity, &[Symbol])> {
        self.lines.iter().map(|(kind, ops)| (*kind, ops.as_slice()))
    }
}

/// Merges one or more `%precs` blocks into a single override PREC2
/// grammar, treating every resolver's lines as one combined ordered list:
/// earlier lines across *and within* resolvers bind tighter than later
/// ones.
pub fn merge_precs(pool: &SymbolPool, resolvers: &[PrecsGrammar]) -> Prec2Grammar {
    let mut prec2 = Prec2Grammar::new(pool.clone());
    let lines: Vec<(Associativity, &[Symbol])> =
        resolvers.iter().flat_map(|r| r.lines()).collect();

    // Internal: every pair within one line, including self-pairs.
    for &(kind, ops) in &lines {
        if let Some(selfrule) = kind.self_relation() {
            for &a in ops {
                for &b in ops {
                    prec2.set_relation(a, b, selfrule);
                }
            }
        }
    }

    // Cross-line: earlier lines bind tighter (GT) than later lines, both
    // directions recorded.
    for i in 0..lines.len() {
        for j in (i + 1)..lines.len() {
            let (_, tighter) = lines[i];
            let (_, looser) = lines[j];
            for &a in tighter {
                for &b in looser {
                    prec2.set_relation(a, b, Prec2Relation::Gt);
                    prec2.set_relation(b, a, Prec2Relation::Lt);
                }
            }
        }
    }

    log::debug!(
        "precs: merged {} resolver line(s) into override prec2",
        lines.len()
    );
    prec2
}
