//! A small hand-written reader for the grammar-source text format: BNF
//! rules terminated by `;`, alternatives separated by `|`, and an
//! optional trailing `%precs { ... }` block of associativity
//! declarations. The format is regular enough that a hand-rolled lexer
//! plus recursive-descent reader is the proportionate choice over a
//! generated parser.

use crate::bnf::BnfGrammar;
use crate::error::{GrammarError, SourcePos};
use crate::precs::{Associativity, PrecsGrammar};
use crate::symbol::{Symbol, SymbolKind, SymbolPool};

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Nonterminal(String),
    TerminalVar(String),
    Terminal(String),
    Colon,
    Semicolon,
    Pipe,
    LBrace,
    RBrace,
    PercentPrecs,
    Eof,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    pos: SourcePos,
}

struct Lexer<'a> {
    chars: Vec<char>,
    index: usize,
    line: u32,
    column: u32,
    _text: &'a str,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Lexer<'a> {
        Lexer {
            chars: text.chars().collect(),
            index: 0,
            line: 1,
            column: 1,
            _text: text,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn pos(&self) -> SourcePos {
        SourcePos {
            line: self.line,
            column: self.column,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn error(&self, detail: impl Into<String>) -> GrammarError {
        GrammarError::Syntax {
            pos: self.pos(),
            detail: detail.into(),
        }
    }

    fn next_token(&mut self) -> Result<Token, GrammarError> {
        self.skip_whitespace();
        let pos = self.pos();
        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos,
            });
        };

        if c == '"' {
            self.bump();
            let mut text = String::new();
            loop {
                match self.bump() {
                    Some('"') => break,
                    Some(c) if (' '..='!').contains(&c) || ('#'..='~').contains(&c) => {
                        text.push(c)
                    }
                    Some(c) => {
                        return Err(self.error(format!("invalid character {:?} in terminal", c)))
                    }
                    None => return Err(self.error("unterminated terminal literal")),
                }
            }
            return Ok(Token {
                kind: TokenKind::Terminal(text),
                pos,
            });
        }

        if c.is_ascii_lowercase() {
            let mut text = String::new();
            while matches!(self.peek(), Some(c) if c.is_ascii_lowercase()) {
                text.push(self.bump().unwrap());
            }
            return Ok(Token {
                kind: TokenKind::Nonterminal(text),
                pos,
            });
        }

        if c.is_ascii_uppercase() {
            let mut text = String::new();
            while matches!(self.peek(), Some(c) if c.is_ascii_uppercase()) {
                text.push(self.bump().unwrap());
            }
            return Ok(Token {
                kind: TokenKind::TerminalVar(text),
                pos,
            });
        }

        match c {
            ':' => {
                self.bump();
                Ok(Token {
                    kind: TokenKind::Colon,
                    pos,
                })
            }
            ';' => {
                self.bump();
                Ok(Token {
                    kind: TokenKind::Semicolon,
                    pos,
                })
            }
            '|' => {
                self.bump();
                Ok(Token {
                    kind: TokenKind::Pipe,
                    pos,
                })
            }
            '{' => {
                self.bump();
                Ok(Token {
                    kind: TokenKind::LBrace,
                    pos,
                })
            }
            '}' => {
                self.bump();
                Ok(Token {
                    kind: TokenKind::RBrace,
                    pos,
                })
            }
            '%' => {
                const KEYWORD: &str = "%precs";
                for expected in KEYWORD.chars() {
                    match self.bump() {
                        Some(c) if c == expected => {}
                        _ => return Err(self.error("expected '%precs'")),
                    }
                }
                Ok(Token {
                    kind: TokenKind::PercentPrecs,
                    pos,
                })
            }
            other => Err(self.error(format!("unexpected character {:?}", other))),
        }
    }
}

/// A BNF rule and `%precs` resolver reader over the grammar-source text
/// format.
struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: Token,
    pool: SymbolPool,
}

impl<'a> Parser<'a> {
    fn new(pool: SymbolPool, text: &'a str) -> Result<Parser<'a>, GrammarError> {
        let mut lexer = Lexer::new(text);
        let lookahead = lexer.next_token()?;
        Ok(Parser {
            lexer,
            lookahead,
            pool,
        })
    }

    fn advance(&mut self) -> Result<Token, GrammarError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), GrammarError> {
        if &self.lookahead.kind == kind {
            self.advance()?;
            Ok(())
        } else {
            Err(GrammarError::Syntax {
                pos: self.lookahead.pos,
                detail: format!("expected {:?}, found {:?}", kind, self.lookahead.kind),
            })
        }
    }

    fn parse_symbol(&mut self) -> Result<Option<Symbol>, GrammarError> {
        let symbol = match &self.lookahead.kind {
            TokenKind::Nonterminal(name) => {
                self.pool.intern(name, SymbolKind::NonTerminal)
            }
            TokenKind::TerminalVar(name) => {
                self.pool.intern(name, SymbolKind::TerminalVariable)
            }
            TokenKind::Terminal(name) => self.pool.intern(name, SymbolKind::Terminal),
            _ => return Ok(None),
        };
        self.advance()?;
        Ok(Some(symbol))
    }

    fn parse_symbols(&mut self) -> Result<Vec<Symbol>, GrammarError> {
        let mut symbols = Vec::new();
        while let Some(symbol) = self.parse_symbol()? {
            symbols.push(symbol);
        }
        Ok(symbols)
    }

    /// Parses one `rule`, installing every alternative into `bnf`.
    fn parse_rule(&mut self, bnf: &mut BnfGrammar) -> Result<(), GrammarError> {
        let pos = self.lookahead.pos;
        let TokenKind::Nonterminal(name) = self.lookahead.kind.clone() else {
            return Err(GrammarError::Syntax {
                pos,
                detail: "expected a nonterminal to start a rule".into(),
            });
        };
        let lhs = self.pool.intern(&name, SymbolKind::NonTerminal);
        self.advance()?;
        self.expect(&TokenKind::Colon)?;

        loop {
            let alt_pos = self.lookahead.pos;
            let rhs = self.parse_symbols()?;
            if rhs.is_empty() {
                return Err(GrammarError::Syntax {
                    pos: alt_pos,
                    detail: "a rule alternative must have at least one symbol".into(),
                });
            }
            for pair in rhs.windows(2) {
                if self.pool.kind_of(pair[0]) == SymbolKind::NonTerminal
                    && self.pool.kind_of(pair[1]) == SymbolKind::NonTerminal
                {
                    return Err(GrammarError::Syntax {
                        pos: alt_pos,
                        detail: "adjacent RHS symbols may not both be nonterminals".into(),
                    });
                }
            }
            bnf.add_rule(lhs, rhs);
            if self.lookahead.kind == TokenKind::Pipe {
                self.advance()?;
                continue;
            }
            break;
        }
        self.expect(&TokenKind::Semicolon)?;
        Ok(())
    }

    fn parse_associativity(&mut self) -> Result<Associativity, GrammarError> {
        let pos = self.lookahead.pos;
        let TokenKind::Nonterminal(name) = self.lookahead.kind.clone() else {
            return Err(GrammarError::Syntax {
                pos,
                detail: "expected one of left, right, assoc, nonassoc".into(),
            });
        };
        let kind = match name.as_str() {
            "left" => Associativity::Left,
            "right" => Associativity::Right,
            "assoc" => Associativity::Assoc,
            "nonassoc" => Associativity::NonAssoc,
            other => {
                return Err(GrammarError::Syntax {
                    pos,
                    detail: format!("unknown associativity {:?}", other),
                })
            }
        };
        self.advance()?;
        Ok(kind)
    }

    /// Parses one `prec` line into `precs`.
    fn parse_prec(&mut self, precs: &mut PrecsGrammar) -> Result<(), GrammarError> {
        let kind = self.parse_associativity()?;
        let mut ops = Vec::new();
        loop {
            let pos = self.lookahead.pos;
            match &self.lookahead.kind {
                TokenKind::Terminal(name) => {
                    ops.push(self.pool.intern(name, SymbolKind::Terminal));
                    self.advance()?;
                }
                TokenKind::Semicolon => break,
                other => {
                    return Err(GrammarError::Syntax {
                        pos,
                        detail: format!("expected a quoted terminal, found {:?}", other),
                    })
                }
            }
        }
        self.expect(&TokenKind::Semicolon)?;
        precs.add(kind, ops);
        Ok(())
    }

    /// Parses one `resolver` block into `precs`.
    fn parse_resolver(&mut self, precs: &mut PrecsGrammar) -> Result<(), GrammarError> {
        self.expect(&TokenKind::PercentPrecs)?;
        self.expect(&TokenKind::LBrace)?;
        while self.lookahead.kind != TokenKind::RBrace {
            self.parse_prec(precs)?;
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(())
    }

    fn parse_grammar(&mut self, bnf: &mut BnfGrammar, precs: &mut PrecsGrammar) -> Result<(), GrammarError> {
        while matches!(self.lookahead.kind, TokenKind::Nonterminal(_)) {
            self.parse_rule(bnf)?;
        }
        while self.lookahead.kind == TokenKind::PercentPrecs {
            self.parse_resolver(precs)?;
        }
        if self.lookahead.kind != TokenKind::Eof {
            return Err(GrammarError::Syntax {
                pos: self.lookahead.pos,
                detail: format!("unexpected trailing input {:?}", self.lookahead.kind),
            });
        }
        Ok(())
    }
}

/// Parses `text` as grammar-source into a [`BnfGrammar`] and whatever
/// `%precs` resolvers it declares, both
/// backed by `pool`.
pub fn bnf_load_from_text(
    pool: SymbolPool,
    text: &str,
) -> Result<(BnfGrammar, PrecsGrammar), GrammarError> {
    let mut bnf = BnfGrammar::new(pool.clone());
    let mut precs = PrecsGrammar::new(pool.clone());
    let mut parser = Parser::new(pool, text)?;
    parser.parse_grammar(&mut bnf, &mut precs)?;
    Ok((bnf, precs))
}
