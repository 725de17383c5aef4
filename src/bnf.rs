//! The BNF grammar: a user-facing mapping from nonterminal to its
//! alternatives, each an ordered sequence of symbols.

use std::collections::HashMap;

use crate::symbol::{Symbol, SymbolKind, SymbolPool};

/// An ordered, nonempty sequence of symbols whose head is a nonterminal
/// (the LHS) and whose tail is the RHS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    lhs: Symbol,
    rhs: Vec<Symbol>,
}

impl Rule {
    /// The nonterminal this rule produces.
    pub fn lhs(&self) -> Symbol {
        self.lhs
    }

    /// The sequence of symbols this rule expands to.
    pub fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }
}

/// A mapping from nonterminal to the set of rules sharing that LHS.
///
/// Alternatives are kept in insertion order; order is not semantically
/// significant but makes output deterministic for the "Grammar text
/// equivalence" and "Determinism" testable properties.
#[derive(Debug, Clone)]
pub struct BnfGrammar {
    pool: SymbolPool,
    rules: HashMap<Symbol, Vec<Rule>>,
    order: Vec<Symbol>,
}

impl BnfGrammar {
    /// Creates an empty grammar backed by `pool`.
    pub fn new(pool: SymbolPool) -> BnfGrammar {
        BnfGrammar {
            pool,
            rules: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// The symbol pool this grammar's symbols were interned from.
    pub fn pool(&self) -> &SymbolPool {
        &self.pool
    }

    /// Inserts a rule `lhs -> rhs`.
    ///
    /// # Panics
    ///
    /// Panics (a programming error, per the error design) if `rhs` is
    /// empty, if `lhs` is not a nonterminal, or if two adjacent RHS
    /// symbols are both nonterminals.
    pub fn add_rule(&mut self, lhs: Symbol, rhs: impl IntoIterator<Item = Symbol>) {
        let rhs: Vec<Symbol> = rhs.into_iter().collect();
        assert!(!rhs.is_empty(), "rule RHS must be nonempty");
        assert_eq!(
            self.pool.kind_of(lhs),
            SymbolKind::NonTerminal,
            "rule LHS must be a nonterminal"
        );
        for pair in rhs.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(
                !(self.pool.kind_of(a) == SymbolKind::NonTerminal
                    && self.pool.kind_of(b) == SymbolKind::NonTerminal),
                "adjacent RHS symbols may not both be nonterminals"
            );
        }
        log::trace!("bnf: add rule {:?} -> {:?}", lhs, rhs);
        if !self.rules.contains_key(&lhs) {
            self.order.push(lhs);
        }
        self.rules.entry(lhs).or_default().push(Rule { lhs, rhs });
    }

    /// Iterates the alternatives sharing `lhs`, in insertion order.
    pub fn alternatives(&self, lhs: Symbol) -> &[Rule] {
        self.rules.get(&lhs).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates every rule in the grammar, nonterminal by nonterminal in
    /// first-insertion order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.order.iter().flat_map(move |lhs| self.alternatives(*lhs).iter())
    }

    /// Every nonterminal that has at least one rule.
    pub fn nonterminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.order.iter().copied()
    }
}
