use smie::{BnfGrammar, Rule, Symbol};

/// Asserts that two `BnfGrammar`s contain the same rules, grouped by LHS,
/// in the same order — used to compare a text-loaded grammar against one
/// built directly through `add_rule`.
pub fn assert_eq_rules<'a, I, J>(i: I, j: J)
where
    I: Iterator<Item = &'a Rule>,
    J: Iterator<Item = &'a Rule>,
{
    let rules_i: Vec<(Symbol, Vec<Symbol>)> =
        i.map(|rule| (rule.lhs(), rule.rhs().to_vec())).collect();
    let rules_j: Vec<(Symbol, Vec<Symbol>)> =
        j.map(|rule| (rule.lhs(), rule.rhs().to_vec())).collect();
    assert_eq!(rules_i, rules_j);
}

/// A token cursor over a whitespace-split token list, for walker tests
/// that want to drive `forward_sexp`/`backward_sexp` directly without a
/// full `Cursor`/buffer round trip.
pub struct TokenListCursor {
    tokens: Vec<String>,
    pos: usize,
}

impl TokenListCursor {
    pub fn at(text: &str, pos: usize) -> TokenListCursor {
        TokenListCursor {
            tokens: text.split_whitespace().map(str::to_string).collect(),
            pos,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn token_at(&self, pos: usize) -> Option<&str> {
        self.tokens.get(pos).map(String::as_str)
    }
}

impl smie::TokenCursor for TokenListCursor {
    fn advance_forward(&mut self) -> bool {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn advance_backward(&mut self) -> bool {
        if self.pos > 0 {
            self.pos -= 1;
            true
        } else {
            false
        }
    }

    fn read_token(&self) -> Option<String> {
        self.tokens.get(self.pos).cloned()
    }
}
