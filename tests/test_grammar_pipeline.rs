//! End-to-end BNF→PREC2→Grammar compilation: opener/closer classing,
//! associativity resolvers, cycle rejection, determinism, precedence
//! ordering, and pair integrity.

mod grammars;

use smie::{
    bnf_load_from_text, bnf_to_prec2, prec2_to_grammar, Associativity, GrammarError, PrecsGrammar,
    Prec2Relation, SymbolClass, SymbolKind, SymbolPool,
};

fn compile(pool: SymbolPool, text: &str, resolvers: &[PrecsGrammar]) -> smie::Grammar {
    let (bnf, _) = bnf_load_from_text(pool, text).unwrap();
    let prec2 = bnf_to_prec2(&bnf, resolvers).unwrap();
    prec2_to_grammar(&prec2).unwrap()
}

/// Parens are an opener/closer pair, "#" is neither.
#[test]
fn openers_and_closers_are_classed() {
    let pool = SymbolPool::new();
    let grammar = compile(pool.clone(), grammars::arith::TEXT, &[]);

    let lparen = pool.intern("(", SymbolKind::Terminal);
    let rparen = pool.intern(")", SymbolKind::Terminal);
    let hash = pool.intern("#", SymbolKind::Terminal);

    assert_eq!(grammar.level(lparen).unwrap().class, SymbolClass::Opener);
    assert_eq!(grammar.level(rparen).unwrap().class, SymbolClass::Closer);
    assert!(grammar.pairs().any(|(o, c)| o == lparen && c == rparen));
    assert_eq!(grammar.level(hash).unwrap().class, SymbolClass::Neither);
}

/// A `%precs { left "+" "x"; }` resolver makes "+" left-associative and
/// resolves the BNF conflict between "+" and "x" that would otherwise be
/// unconstrained.
#[test]
fn associativity_resolver_settles_conflict() {
    let pool = SymbolPool::new();
    let text = format!("{}\n%precs {{ left \"+\" \"x\" ; }}", grammars::arith::TEXT);
    let (bnf, precs) = bnf_load_from_text(pool.clone(), &text).unwrap();
    let prec2 = bnf_to_prec2(&bnf, std::slice::from_ref(&precs)).unwrap();
    let grammar = prec2_to_grammar(&prec2).unwrap();

    let plus = pool.intern("+", SymbolKind::Terminal);
    let level = grammar.level(plus).unwrap();
    assert!(level.left_prec > level.right_prec, "+ should be left-associative");
}

/// A PREC2 with both `a < b` and `b < a` is a cycle, once `a` and `b` are
/// each self-tied (as a real associative operator would be) so that `f_a`
/// and `f_b` cannot simply be assigned independent levels.
#[test]
fn contradictory_relations_are_rejected_as_a_cycle() {
    let pool = SymbolPool::new();
    let a = pool.intern("a", SymbolKind::Terminal);
    let b = pool.intern("b", SymbolKind::Terminal);
    let mut prec2 = smie::Prec2Grammar::new(pool);
    prec2.set_relation(a, a, Prec2Relation::Eq);
    prec2.set_relation(b, b, Prec2Relation::Eq);
    prec2.set_relation(a, b, Prec2Relation::Lt);
    prec2.set_relation(b, a, Prec2Relation::Lt);
    assert_eq!(prec2_to_grammar(&prec2).unwrap_err(), GrammarError::Cycle);
}

#[test]
fn empty_grammar_compiles_to_empty_grammar() {
    let pool = SymbolPool::new();
    let bnf = smie::BnfGrammar::new(pool);
    let prec2 = bnf_to_prec2(&bnf, &[]).unwrap();
    assert_eq!(prec2.relations().count(), 0);
    let grammar = prec2_to_grammar(&prec2).unwrap();
    assert_eq!(grammar.levels().count(), 0);
}

/// Repeated compilation of the same inputs yields structurally equal
/// output.
#[test]
fn compilation_is_deterministic() {
    let pool = SymbolPool::new();
    let (bnf, _) = bnf_load_from_text(pool, grammars::arith::TEXT).unwrap();

    let prec2_a = bnf_to_prec2(&bnf, &[]).unwrap();
    let prec2_b = bnf_to_prec2(&bnf, &[]).unwrap();
    let mut relations_a: Vec<_> = prec2_a.relations().collect();
    let mut relations_b: Vec<_> = prec2_b.relations().collect();
    relations_a.sort_by_key(|&(a, b, _)| (a, b));
    relations_b.sort_by_key(|&(a, b, _)| (a, b));
    assert_eq!(relations_a, relations_b);

    let grammar_a = prec2_to_grammar(&prec2_a).unwrap();
    let grammar_b = prec2_to_grammar(&prec2_b).unwrap();
    let mut levels_a: Vec<_> = grammar_a.levels().collect();
    let mut levels_b: Vec<_> = grammar_b.levels().collect();
    levels_a.sort_by_key(|&(s, _)| s);
    levels_b.sort_by_key(|&(s, _)| s);
    assert_eq!(levels_a, levels_b);
}

/// Every `a < b` in PREC2 becomes `left_prec(a) < right_prec(b)` in the
/// compiled grammar, and every `a = b` becomes
/// `left_prec(a) == right_prec(b)`.
#[test]
fn precedence_ordering_matches_prec2_relations() {
    let pool = SymbolPool::new();
    let (bnf, _) = bnf_load_from_text(pool.clone(), grammars::arith::TEXT).unwrap();
    let prec2 = bnf_to_prec2(&bnf, &[]).unwrap();
    let grammar = prec2_to_grammar(&prec2).unwrap();

    for (a, b, relation) in prec2.relations() {
        let la = grammar.level(a).unwrap();
        let lb = grammar.level(b).unwrap();
        match relation {
            Prec2Relation::Lt => assert!(la.left_prec < lb.right_prec),
            Prec2Relation::Gt => assert!(la.left_prec > lb.right_prec),
            Prec2Relation::Eq => assert_eq!(la.left_prec, lb.right_prec),
        }
    }
}

/// Every `(opener, closer)` pair has an opener classed `Opener` and a
/// closer that is either classed `Closer` or recorded in the closer-ends
/// set.
#[test]
fn pair_integrity_holds() {
    let pool = SymbolPool::new();
    let (bnf, _) = bnf_load_from_text(pool, grammars::arith::TEXT).unwrap();
    let prec2 = bnf_to_prec2(&bnf, &[]).unwrap();
    let grammar = prec2_to_grammar(&prec2).unwrap();

    for (opener, closer) in grammar.pairs() {
        assert_eq!(grammar.level(opener).unwrap().class, SymbolClass::Opener);
        let closer_level = grammar.level(closer).unwrap();
        assert!(closer_level.class == SymbolClass::Closer || grammar.is_closer_end(closer));
    }
}

#[test]
fn non_assoc_resolver_emits_no_self_relation() {
    let pool = SymbolPool::new();
    let eq = pool.intern("==", SymbolKind::Terminal);
    let mut precs = PrecsGrammar::new(pool.clone());
    precs.add(Associativity::NonAssoc, [eq]);
    let prec2 = smie::merge_precs(&pool, &[precs]);
    assert_eq!(prec2.relation(eq, eq), None);
}
