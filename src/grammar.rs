//! Compiles a [`Prec2Grammar`] into the final [`Grammar`]: a `Level` per
//! terminal, built by allocating two function variables per terminal,
//! coalescing equalities with a union-find, and assigning integer levels
//! by repeated topological "peel".

use std::collections::{HashMap, HashSet};

use crate::error::GrammarError;
use crate::prec2::{Prec2Grammar, Prec2Relation, SymbolClass};
use crate::symbol::{Symbol, SymbolKind, SymbolPool};

/// `F(a)` is the left-function, `G(a)` the right-function of terminal
/// `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum FuncVar {
    F(Symbol),
    G(Symbol),
}

/// A small disjoint-set over [`FuncVar`]s with path compression, used to
/// coalesce `EQ`-linked function variables.
#[derive(Debug, Default)]
struct UnionFind {
    parent: HashMap<FuncVar, FuncVar>,
}

impl UnionFind {
    fn find(&mut self, x: FuncVar) -> FuncVar {
        let parent = *self.parent.entry(x).or_insert(x);
        if parent == x {
            x
        } else {
            let root = self.find(parent);
            self.parent.insert(x, root);
            root
        }
    }

    /// Unions `a` and `b`. The smaller-by-`Ord` representative wins, so
    /// coalescing is deterministic regardless of union order.
    fn union(&mut self, a: FuncVar, b: FuncVar) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        if ra < rb {
            self.parent.insert(rb, ra);
        } else {
            self.parent.insert(ra, rb);
        }
    }
}

/// The gap left between successive topological batches, leaving room for
/// later associativity-driven insertions without renumbering the whole
/// grammar.
const LEVEL_BATCH_GAP: i32 = 10;

/// A terminal's two integer precedence levels and its bracket role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    /// The terminal's left (`f`) precedence.
    pub left_prec: i32,
    /// The terminal's right (`g`) precedence.
    pub right_prec: i32,
    /// The terminal's bracket role.
    pub class: SymbolClass,
}

/// The compiled grammar: one [`Level`] per terminal, plus the pair set
/// and closer-ends set carried verbatim from PREC2.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Grammar {
    // Not serialized: a pool is reconstructed by whatever re-interns the
    // symbols a deserialized grammar's indices refer to; shipping the
    // whole pool alongside every persisted grammar would defeat the
    // point of persisting only the compiled levels.
    #[cfg_attr(feature = "serialize", serde(skip))]
    pool: SymbolPool,
    levels: HashMap<Symbol, Level>,
    pairs: HashSet<(Symbol, Symbol)>,
    closer_ends: HashSet<Symbol>,
}

impl Grammar {
    /// The symbol pool this grammar's symbols were interned from.
    pub fn pool(&self) -> &SymbolPool {
        &self.pool
    }

    /// The level assigned to `symbol`, if it is a known terminal.
    pub fn level(&self, symbol: Symbol) -> Option<Level> {
        self.levels.get(&symbol).copied()
    }

    /// Every `(terminal, level)` pair in the grammar.
    pub fn levels(&self) -> impl Iterator<Item = (Symbol, Level)> + '_ {
        self.levels.iter().map(|(&s, &l)| (s, l))
    }

    /// Every discovered `(opener, closer)` pair.
    pub fn pairs(&self) -> impl Iterator<Item = (Symbol, Symbol)> + '_ {
        self.pairs.iter().copied()
    }

    /// True if `symbol` was ever recorded as a rule-final closer.
    pub fn is_closer_end(&self, symbol: Symbol) -> bool {
        self.closer_ends.contains(&symbol)
    }

    /// Resolves raw token text to the terminal or terminal-variable
    /// symbol it names in this grammar, without interning a new symbol
    /// if the text names none.
    pub fn lookup_terminal(&self, text: &str) -> Option<Symbol> {
        self.pool
            .lookup(text, SymbolKind::Terminal)
            .or_else(|| self.pool.lookup(text, SymbolKind::TerminalVariable))
            .filter(|symbol| self.levels.contains_key(symbol))
    }
}

/// Compiles `prec2` into a [`Grammar`], or fails with
/// `GrammarError::Cycle` if the `<` relation over function variables
/// contains a cycle.
pub fn prec2_to_grammar(prec2: &Prec2Grammar) -> Result<Grammar, GrammarError> {
    let pool = prec2.pool();
    let mut uf = UnionFind::default();
    let mut edges: HashSet<(FuncVar, FuncVar)> = HashSet::new();

    // Step 2: materialise equalities into the union-find and collect raw
    // inequalities (not yet canonicalized).
    let mut raw_inequalities: Vec<(FuncVar, FuncVar)> = Vec::new();
    for (a, b, relation) in prec2.relations() {
        match relation {
            Prec2Relation::Eq => uf.union(FuncVar::F(a), FuncVar::G(b)),
            Prec2Relation::Lt => raw_inequalities.push((FuncVar::F(a), FuncVar::G(b))),
            Prec2Relation::Gt => raw_inequalities.push((FuncVar::G(b), FuncVar::F(a))),
        }
    }

    // Step 3: coalesce. Every inequality is rewritten to use its
    // endpoints' canonical representative.
    for (smaller, larger) in raw_inequalities {
        edges.insert((uf.find(smaller), uf.find(larger)));
    }

    // Step 4: topological assignment in batches, gap of 10 between
    // batches.
    let mut assigned: HashMap<FuncVar, i32> = HashMap::new();
    let mut counter = 0;
    let mut remaining = edges;
    let mut batches = 0;
    while !remaining.is_empty() {
        let larger_sides: HashSet<FuncVar> = remaining.iter().map(|&(_, l)| l).collect();
        let mut candidates: Vec<FuncVar> = remaining
            .iter()
            .flat_map(|&(s, l)| [s, l])
            .filter(|v| !larger_sides.contains(v))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if candidates.is_empty() {
            log::debug!("prec2_to_grammar: cycle detected after {} batch(es)", batches);
            return Err(GrammarError::Cycle);
        }
        candidates.sort();
        for &v in &candidates {
            assigned.entry(v).or_insert_with(|| {
                let level = counter;
                counter += 1;
                level
            });
        }
        counter += LEVEL_BATCH_GAP;
        remaining.retain(|&(s, _)| !candidates.contains(&s));
        batches += 1;
    }
    log::debug!(
        "prec2_to_grammar: assigned {} function variable(s) in {} batch(es)",
        assigned.len(),
        batches
    );

    // Step 5: function variables untouched by any relation still need a
    // level; hand out fresh increasing ones, grouped by their (possibly
    // singleton) union-find class.
    let mut terminals: Vec<Symbol> = pool.symbols().into_iter().filter(|&s| pool.kind_of(s).is_terminal()).collect();
    terminals.sort();
    for &t in &terminals {
        for var in [FuncVar::F(t), FuncVar::G(t)] {
            let root = uf.find(var);
            assigned.entry(root).or_insert_with(|| {
                let level = counter;
                counter += 1;
                level
            });
        }
    }

    // Step 6: publish.
    let mut levels = HashMap::new();
    for &t in &terminals {
        let left_prec = assigned[&uf.find(FuncVar::F(t))];
        let right_prec = assigned[&uf.find(FuncVar::G(t))];
        levels.insert(
            t,
            Level {
                left_prec,
                right_prec,
                class: prec2.class_of(t),
            },
        );
    }

    Ok(Grammar {
        pool: pool.clone(),
        levels,
        pairs: prec2.pairs().collect(),
        closer_ends: terminals.iter().copied().filter(|&t| prec2.is_closer_end(t)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    #[test]
    fn empty_prec2_yields_empty_grammar() {
        let pool = SymbolPool::new();
        let prec2 = Prec2Grammar::new(pool);
        let grammar = prec2_to_grammar(&prec2).unwrap();
        assert_eq!(grammar.levels().count(), 0);
    }

    #[test]
    fn lt_relation_orders_left_and_right_prec() {
        let pool = SymbolPool::new();
        let a = pool.intern("+", SymbolKind::Terminal);
        let b = pool.intern("x", SymbolKind::Terminal);
        let mut prec2 = Prec2Grammar::new(pool);
        prec2.set_relation(a, b, Prec2Relation::Lt);
        let grammar = prec2_to_grammar(&prec2).unwrap();
        let la = grammar.level(a).unwrap();
        let lb = grammar.level(b).unwrap();
        assert!(la.left_prec < lb.right_prec);
    }

    #[test]
    fn eq_relation_ties_left_and_right_prec() {
        let pool = SymbolPool::new();
        let a = pool.intern("(", SymbolKind::Terminal);
        let b = pool.intern(")", SymbolKind::Terminal);
        let mut prec2 = Prec2Grammar::new(pool);
        prec2.set_relation(a, b, Prec2Relation::Eq);
        let grammar = prec2_to_grammar(&prec2).unwrap();
        assert_eq!(grammar.level(a).unwrap().left_prec, grammar.level(b).unwrap().right_prec);
    }

    #[test]
    fn mutually_contradictory_relations_are_a_cycle() {
        // a and b each self-tie their own left/right function (as a
        // self-associative operator would), then assert a < b and b < a
        // simultaneously: f_a = g_a, f_b = g_b, f_a < g_b, f_b < g_a,
        // which collapses to a two-node cycle once canonicalized.
        let pool = SymbolPool::new();
        let a = pool.intern("+", SymbolKind::Terminal);
        let b = pool.intern("-", SymbolKind::Terminal);
        let mut prec2 = Prec2Grammar::new(pool);
        prec2.set_relation(a, a, Prec2Relation::Eq);
        prec2.set_relation(b, b, Prec2Relation::Eq);
        prec2.set_relation(a, b, Prec2Relation::Lt);
        prec2.set_relation(b, a, Prec2Relation::Lt);
        assert!(matches!(prec2_to_grammar(&prec2), Err(GrammarError::Cycle)));
    }
}
