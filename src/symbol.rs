//! Interned grammar symbols and their owning pool.
//!
//! A [`Symbol`] is a small `Copy` handle into a [`SymbolPool`]; two symbols
//! compare equal iff they were interned from the same pool under the same
//! `(name, kind)` pair. The pool is the only place symbols are hashed or
//! compared structurally — everywhere else, identity (the handle itself)
//! is enough.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// The three kinds a symbol can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolKind {
    /// A literal token, e.g. `"+"`.
    Terminal,
    /// A placeholder token with varying lexical text but one grammar role,
    /// e.g. an identifier class.
    TerminalVariable,
    /// A grammar category, e.g. `expr`.
    NonTerminal,
}

impl SymbolKind {
    /// True for [`SymbolKind::Terminal`] and [`SymbolKind::TerminalVariable`].
    pub fn is_terminal(self) -> bool {
        matches!(self, SymbolKind::Terminal | SymbolKind::TerminalVariable)
    }
}

/// A handle to an interned `(name, kind)` pair, stable for the lifetime of
/// the [`SymbolPool`] it came from.
///
/// Ordered by interning index so that callers needing a deterministic
/// iteration order (the PREC2→Grammar compiler's topological batches, in
/// particular) can sort on it instead of relying on hash-map order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol(u32);

impl Symbol {
    pub(crate) fn from_index(index: usize) -> Symbol {
        Symbol(index as u32)
    }

    /// The symbol's position in its pool's table, stable for the life of
    /// the pool. Used internally as a dense array/bitset index; never
    /// exposed as a public numeric value since identity, not ordinal
    /// position, is the supported comparison.
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct Record {
    name: Box<str>,
    kind: SymbolKind,
}

#[derive(Debug, Default)]
struct PoolInner {
    records: Vec<Record>,
    by_key: HashMap<(Box<str>, SymbolKind), Symbol>,
}

/// Owns the backing storage for every symbol interned from it.
///
/// Cheaply cloneable: clones share the same storage via an atomically
/// refcounted handle, so the four grammar stages (BNF, PRECS, PREC2,
/// Grammar) can each hold their own `SymbolPool` value while referring to
/// the same symbols. The pool is freed once the last clone drops.
#[derive(Debug, Clone)]
pub struct SymbolPool {
    inner: Arc<RwLock<PoolInner>>,
}

impl Default for SymbolPool {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolPool {
    /// Creates a fresh, empty pool.
    pub fn new() -> SymbolPool {
        SymbolPool {
            inner: Arc::new(RwLock::new(PoolInner::default())),
        }
    }

    /// Returns the canonical symbol for `(name, kind)`, interning it if
    /// this is the first time the pair has been seen.
    pub fn intern(&self, name: &str, kind: SymbolKind) -> Symbol {
        let key = (Box::<str>::from(name), kind);
        if let Some(&sym) = self.inner.read().unwrap().by_key.get(&key) {
            return sym;
        }
        let mut inner = self.inner.write().unwrap();
        // Re-check: another writer may have interned the same key between
        // the read lock above and this write lock.
        if let Some(&sym) = inner.by_key.get(&key) {
            return sym;
        }
        let sym = Symbol::from_index(inner.records.len());
        inner.records.push(Record {
            name: key.0.clone(),
            kind,
        });
        inner.by_key.insert(key, sym);
        sym
    }

    /// Looks up the `(name, kind)` pair a symbol was interned from, if this
    /// pool owns it.
    pub fn name_of(&self, symbol: Symbol) -> Option<String> {
        self.inner
            .read()
            .unwrap()
            .records
            .get(symbol.index())
            .map(|r| r.name.to_string())
    }

    /// The kind a symbol was interned with.
    ///
    /// # Panics
    ///
    /// Panics if `symbol` was not interned from this pool — holding a
    /// symbol from a foreign pool and asking this one about it is a
    /// programming error.
    pub fn kind_of(&self, symbol: Symbol) -> SymbolKind {
        self.inner
            .read()
            .unwrap()
            .records
            .get(symbol.index())
            .unwrap_or_else(|| panic!("symbol {:?} was not interned from this pool", symbol))
            .kind
    }

    /// Number of distinct symbols interned so far.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().records.len()
    }

    /// True if no symbol has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every symbol interned so far, in interning order.
    ///
    /// Used by the PREC2→Grammar compiler to allocate a function-variable
    /// pair for every terminal in the pool.
    pub fn symbols(&self) -> Vec<Symbol> {
        let inner = self.inner.read().unwrap();
        (0..inner.records.len()).map(Symbol::from_index).collect()
    }

    /// Looks up the symbol already interned for `(name, kind)`, without
    /// interning a new one if absent. Used by the walker to classify raw
    /// token text against the grammar without mutating the pool while
    /// walking.
    pub fn lookup(&self, name: &str, kind: SymbolKind) -> Option<Symbol> {
        let key = (Box::<str>::from(name), kind);
        self.inner.read().unwrap().by_key.get(&key).copied()
    }

    /// Every symbol interned so far with the given kind, in interning
    /// order.
    pub fn symbols_of_kind(&self, kind: SymbolKind) -> Vec<Symbol> {
        let inner = self.inner.read().unwrap();
        inner
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.kind == kind)
            .map(|(index, _)| Symbol::from_index(index))
            .collect()
    }
}
