//! Compiles a [`BnfGrammar`] (plus optional associativity resolvers) into
//! a [`Prec2Grammar`].

use std::collections::HashMap;

use bit_vec::BitVec;

use crate::bnf::BnfGrammar;
use crate::error::GrammarError;
use crate::prec2::{Prec2Grammar, Prec2Relation, SymbolClass};
use crate::precs::{merge_precs, PrecsGrammar};
use crate::symbol::{Symbol, SymbolKind, SymbolPool};

/// A dense bitset of terminals over one pool's index space, used to
/// represent `FIRST(A)`/`LAST(A)` without repeated hashing.
#[derive(Clone)]
struct OpSet {
    bits: BitVec,
}

impl OpSet {
    fn new(universe: usize) -> OpSet {
        OpSet {
            bits: BitVec::from_elem(universe, false),
        }
    }

    fn insert(&mut self, symbol: Symbol) {
        self.bits.set(symbol.index(), true);
    }

    /// Unions `other` in, returning whether anything new was added.
    fn union_with(&mut self, other: &OpSet) -> bool {
        let mut grew = false;
        for i in 0..self.bits.len() {
            if other.bits[i] && !self.bits[i] {
                self.bits.set(i, true);
                grew = true;
            }
        }
        grew
    }

    fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, set)| set.then(|| Symbol::from_index(i)))
    }
}

/// Step 1: FIRST and LAST operator sets for every nonterminal, by
/// fixpoint iteration.
fn compute_first_last(bnf: &BnfGrammar) -> (HashMap<Symbol, OpSet>, HashMap<Symbol, OpSet>) {
    let pool = bnf.pool();
    let universe = pool.len();
    let mut first_sets: HashMap<Symbol, OpSet> = HashMap::new();
    let mut last_sets: HashMap<Symbol, OpSet> = HashMap::new();

    for nt in bnf.nonterminals() {
        let mut first = OpSet::new(universe);
        let mut last = OpSet::new(universe);
        for rule in bnf.alternatives(nt) {
            let rhs = rule.rhs();
            if let Some(&head) = rhs.first() {
                if pool.kind_of(head).is_terminal() {
                    first.insert(head);
                }
            }
            if let Some(&tail) = rhs.last() {
                if pool.kind_of(tail).is_terminal() {
                    last.insert(tail);
                }
            }
        }
        first_sets.insert(nt, first);
        last_sets.insert(nt, last);
    }

    loop {
        let mut changed = false;
        for nt in bnf.nonterminals() {
            for rule in bnf.alternatives(nt) {
                let rhs = rule.rhs();
                if let Some(&head) = rhs.first() {
                    if pool.kind_of(head) == SymbolKind::NonTerminal {
                        let addition = first_sets[&head].clone();
                        changed |= first_sets.get_mut(&nt).unwrap().union_with(&addition);
                    }
                }
                if let Some(&tail) = rhs.last() {
                    if pool.kind_of(tail) == SymbolKind::NonTerminal {
                        let addition = last_sets[&tail].clone();
                        changed |= last_sets.get_mut(&nt).unwrap().union_with(&addition);
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }

    log::debug!(
        "bnf_to_prec2: computed FIRST/LAST sets for {} nonterminal(s)",
        first_sets.len()
    );
    (first_sets, last_sets)
}

/// Step 4: records `a rel b`, consulting `override_prec2` on conflict.
fn add_relation(
    prec2: &mut Prec2Grammar,
    pool: &SymbolPool,
    override_prec2: &Prec2Grammar,
    a: Symbol,
    b: Symbol,
    relation: Prec2Relation,
) -> Result<(), GrammarError> {
    if let Some(existing) = prec2.relation(a, b) {
        if existing == relation {
            return Ok(());
        }
        if let Some(resolved) = override_prec2.relation(a, b) {
            log::trace!(
                "bnf_to_prec2: conflict on ({:?}, {:?}) resolved by override to {:?}",
                a,
                b,
                resolved
            );
            prec2.set_relation(a, b, resolved);
            return Ok(());
        }
        return Err(GrammarError::Conflict {
            left: pool.name_of(a).unwrap_or_default(),
            right: pool.name_of(b).unwrap_or_default(),
        });
    }
    prec2.set_relation(a, b, relation);
    Ok(())
}

/// Step 2: emits the relations implied by position `i` of one rule's
/// RHS. The four cases are not mutually exclusive — a terminal followed
/// by a nonterminal can satisfy both the `EQ`-skipping-a-nonterminal case
/// and the `LT`-into-FIRST case in the same position.
#[allow(clippy::too_many_arguments)]
fn emit_relations_at(
    pool: &SymbolPool,
    rhs: &[Symbol],
    i: usize,
    first_sets: &HashMap<Symbol, OpSet>,
    last_sets: &HashMap<Symbol, OpSet>,
    prec2: &mut Prec2Grammar,
    override_prec2: &Prec2Grammar,
) -> Result<(), GrammarError> {
    let a = rhs[i];
    let kind_a = pool.kind_of(a);
    let Some(&b) = rhs.get(i + 1) else {
        return Ok(());
    };
    let kind_b = pool.kind_of(b);

    if kind_a.is_terminal() && kind_b.is_terminal() {
        add_relation(prec2, pool, override_prec2, a, b, Prec2Relation::Eq)?;
    }

    if kind_a.is_terminal() && kind_b == SymbolKind::NonTerminal {
        if let Some(&c) = rhs.get(i + 2) {
            if pool.kind_of(c).is_terminal() {
                add_relation(prec2, pool, override_prec2, a, c, Prec2Relation::Eq)?;
            }
        }
        for d in first_sets[&b].iter() {
            add_relation(prec2, pool, override_prec2, a, d, Prec2Relation::Lt)?;
        }
    }

    if kind_a == SymbolKind::NonTerminal && kind_b.is_terminal() {
        for e in last_sets[&a].iter() {
            add_relation(prec2, pool, override_prec2, e, b, Prec2Relation::Gt)?;
        }
    }

    Ok(())
}

/// Step 3: pairs and classes for one rule's RHS.
///
/// A rule whose first and (rule-final) last symbol are the same
/// terminal — e.g. `s: "#" e "#"` — is not a bracket pair and is
/// skipped: the opener and its own closer would be the same symbol,
/// which classing as both would be meaningless.
fn mark_pairs(pool: &SymbolPool, rhs: &[Symbol], prec2: &mut Prec2Grammar) {
    let (Some(&first_sym), Some(&last_sym)) = (rhs.first(), rhs.last()) else {
        return;
    };
    if first_sym == last_sym || !pool.kind_of(first_sym).is_terminal() {
        return;
    }
    let terminal_count = rhs.iter().filter(|&&s| pool.kind_of(s).is_terminal()).count();
    if terminal_count < 2 {
        return;
    }
    prec2.set_class(first_sym, SymbolClass::Opener);
    let last_index = rhs.len() - 1;
    for (idx, &c) in rhs.iter().enumerate().skip(1) {
        if pool.kind_of(c).is_terminal() {
            prec2.add_pair(first_sym, c);
            if idx == last_index {
                prec2.set_class(c, SymbolClass::Closer);
                prec2.mark_closer_end(c);
            }
        }
    }
}

/// Compiles `bnf` into a [`Prec2Grammar`], consulting `resolvers` to
/// settle any relation conflicts that arise.
pub fn bnf_to_prec2(
    bnf: &BnfGrammar,
    resolvers: &[PrecsGrammar],
) -> Result<Prec2Grammar, GrammarError> {
    let pool = bnf.pool();
    let override_prec2 = merge_precs(pool, resolvers);
    let (first_sets, last_sets) = compute_first_last(bnf);
    let mut prec2 = Prec2Grammar::new(pool.clone());

    for nt in bnf.nonterminals() {
        for rule in bnf.alternatives(nt) {
            let rhs = rule.rhs();
            for i in 0..rhs.len() {
                emit_relations_at(
                    pool,
                    rhs,
                    i,
                    &first_sets,
                    &last_sets,
                    &mut prec2,
                    &override_prec2,
                )?;
            }
            mark_pairs(pool, rhs, &mut prec2);
        }
    }

    log::debug!(
        "bnf_to_prec2: emitted {} relation(s), {} pair(s)",
        prec2.relations().count(),
        prec2.pairs().count()
    );
    Ok(prec2)
}
