//! The PREC2 grammar: a flat binary relation over terminal pairs, plus the
//! open/close pair set and symbol-class map derived alongside it.

use std::collections::{HashMap, HashSet};

use crate::symbol::{Symbol, SymbolPool};

/// The three relations PREC2 can record between an ordered pair of
/// terminals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Prec2Relation {
    /// `a = b`: same precedence.
    Eq,
    /// `a < b`: `b` binds tighter.
    Lt,
    /// `a > b`: `a` binds tighter.
    Gt,
}

/// A terminal's role as a bracket-like delimiter, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolClass {
    /// The left edge of a bracket-like construct.
    Opener,
    /// The right edge of a bracket-like construct.
    Closer,
    /// Neither.
    #[default]
    Neither,
}

/// `(left, right) → relation`, a class map, a pair set, and a closer-ends
/// set, keyed on interned symbol identity.
#[derive(Debug, Clone)]
pub struct Prec2Grammar {
    pool: SymbolPool,
    relations: HashMap<(Symbol, Symbol), Prec2Relation>,
    classes: HashMap<Symbol, SymbolClass>,
    pairs: HashSet<(Symbol, Symbol)>,
    closer_ends: HashSet<Symbol>,
}

impl Prec2Grammar {
    /// Creates an empty PREC2 grammar backed by `pool`.
    pub fn new(pool: SymbolPool) -> Prec2Grammar {
        Prec2Grammar {
            pool,
            relations: HashMap::new(),
            classes: HashMap::new(),
            pairs: HashSet::new(),
            closer_ends: HashSet::new(),
        }
    }

    /// The symbol pool this grammar's symbols were interned from.
    pub fn pool(&self) -> &SymbolPool {
        &self.pool
    }

    /// The recorded relation between `a` and `b`, if any has been set.
    pub fn relation(&self, a: Symbol, b: Symbol) -> Option<Prec2Relation> {
        self.relations.get(&(a, b)).copied()
    }

    /// Unconditionally records (or overwrites) the relation between `a`
    /// and `b`. Conflict checking, where wanted, is the caller's
    /// responsibility (see `bnf_to_prec2`'s use of this for override
    /// grammars, where overwriting is exactly the point).
    pub fn set_relation(&mut self, a: Symbol, b: Symbol, relation: Prec2Relation) {
        log::trace!("prec2: {:?} {:?} {:?}", a, relation, b);
        self.relations.insert((a, b), relation);
    }

    /// Iterates every recorded relation as `(left, right, relation)`.
    pub fn relations(&self) -> impl Iterator<Item = (Symbol, Symbol, Prec2Relation)> + '_ {
        self.relations
            .iter()
            .map(|(&(a, b), &rel)| (a, b, rel))
    }

    /// The class recorded for `symbol`, defaulting to `Neither` if never
    /// marked.
    pub fn class_of(&self, symbol: Symbol) -> SymbolClass {
        self.classes.get(&symbol).copied().unwrap_or_default()
    }

    /// Marks `symbol`'s class. A symbol already marked `Opener` or `Closer`
    /// is left unchanged by a later `Neither` (classes only ever get more
    /// specific during compilation).
    pub fn set_class(&mut self, symbol: Symbol, class: SymbolClass) {
        if class == SymbolClass::Neither && self.classes.contains_key(&symbol) {
            return;
        }
        self.classes.insert(symbol, class);
    }

    /// Records `(opener, closer)` as a discovered bracket pair.
    pub fn add_pair(&mut self, opener: Symbol, closer: Symbol) {
        self.pairs.insert((opener, closer));
    }

    /// Every discovered `(opener, closer)` pair.
    pub fn pairs(&self) -> impl Iterator<Item = (Symbol, Symbol)> + '_ {
        self.pairs.iter().copied()
    }

    /// Marks `symbol` as appearing at the closing end of a pair-bearing
    /// rule (a narrower set than `class_of(symbol) == Closer`: every
    /// rule-final closer is in this set, but a symbol can be classed
    /// `Closer` from one rule while never ending a rule in another).
    pub fn mark_closer_end(&mut self, symbol: Symbol) {
        self.closer_ends.insert(symbol);
    }

    /// True if `symbol` was ever recorded as a rule-final closer.
    pub fn is_closer_end(&self, symbol: Symbol) -> bool {
        self.closer_ends.contains(&symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    #[test]
    fn relations_round_trip() {
        let pool = SymbolPool::new();
        let a = pool.intern("a", SymbolKind::Terminal);
        let b = pool.intern("b", SymbolKind::Terminal);
        let mut prec2 = Prec2Grammar::new(pool);
        assert_eq!(prec2.relation(a, b), None);
        prec2.set_relation(a, b, Prec2Relation::Lt);
        assert_eq!(prec2.relation(a, b), Some(Prec2Relation::Lt));
    }

    #[test]
    fn class_does_not_downgrade() {
        let pool = SymbolPool::new();
        let a = pool.intern("(", SymbolKind::Terminal);
        let mut prec2 = Prec2Grammar::new(pool);
        prec2.set_class(a, SymbolClass::Opener);
        prec2.set_class(a, SymbolClass::Neither);
        assert_eq!(prec2.class_of(a), SymbolClass::Opener);
    }

    #[test]
    fn pair_and_closer_end_tracking() {
        let pool = SymbolPool::new();
        let open = pool.intern("(", SymbolKind::Terminal);
        let close = pool.intern(")", SymbolKind::Terminal);
        let mut prec2 = Prec2Grammar::new(pool);
        prec2.add_pair(open, close);
        prec2.mark_closer_end(close);
        assert!(prec2.pairs().any(|(o, c)| o == open && c == close));
        assert!(prec2.is_closer_end(close));
    }
}
