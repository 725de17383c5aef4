//! A small arithmetic grammar with `#`-delimited statements, `+` and `x`
//! operators, and parenthesized grouping, built two ways: once from
//! grammar-source text and once through direct `add_rule` calls, so
//! integration tests can exercise text/builder equivalence as well as
//! end-to-end compilation and walking.

use smie::{BnfGrammar, SymbolKind, SymbolPool};

/// The grammar-source text, verbatim.
pub const TEXT: &str = r#"
    s: "#" e "#" ;
    e: e "+" t | t ;
    t: t "x" f | f ;
    f: N | "(" e ")" ;
"#;

/// The same grammar, built directly through `BnfGrammar::add_rule`.
pub fn build(pool: SymbolPool) -> BnfGrammar {
    let s = pool.intern("s", SymbolKind::NonTerminal);
    let e = pool.intern("e", SymbolKind::NonTerminal);
    let t = pool.intern("t", SymbolKind::NonTerminal);
    let f = pool.intern("f", SymbolKind::NonTerminal);
    let hash = pool.intern("#", SymbolKind::Terminal);
    let plus = pool.intern("+", SymbolKind::Terminal);
    let times = pool.intern("x", SymbolKind::Terminal);
    let lparen = pool.intern("(", SymbolKind::Terminal);
    let rparen = pool.intern(")", SymbolKind::Terminal);
    let n = pool.intern("N", SymbolKind::TerminalVariable);

    let mut bnf = BnfGrammar::new(pool);
    bnf.add_rule(s, [hash, e, hash]);
    bnf.add_rule(e, [e, plus, t]);
    bnf.add_rule(e, [t]);
    bnf.add_rule(t, [t, times, f]);
    bnf.add_rule(t, [f]);
    bnf.add_rule(f, [n]);
    bnf.add_rule(f, [lparen, e, rparen]);
    bnf
}
