use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display, rc::Rc};

use crate::{Position, Span};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("def", TokenKind::Def);
        map.insert("extern", TokenKind::Extern);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    Identifier,

    // Reserved
    Def,
    Extern,

    /// Any other single character: operators and punctuation.
    Char(char),
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Char(c) => write!(f, "'{}'", c),
            _ => write!(f, "{:?}", self),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Token {
    /// Creates the end-of-input token at byte offset `pos`.
    pub fn eof(pos: u32, file: Rc<String>) -> Self {
        Token {
            kind: TokenKind::EOF,
            value: String::from("EOF"),
            span: Span {
                start: Position(pos, Rc::clone(&file)),
                end: Position(pos, file),
            },
        }
    }

    pub fn is_char(&self, c: char) -> bool {
        self.kind == TokenKind::Char(c)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Identifier | TokenKind::Number => write!(f, "{} ({})", self.kind, self.value),
            _ => write!(f, "{}", self.kind),
        }
    }
}

/// Supplies tokens to the parser one at a time.
///
/// Once the input is exhausted a source keeps returning `EOF`.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

/// A [`TokenSource`] over an already tokenized input.
pub struct TokenStream {
    tokens: std::vec::IntoIter<Token>,
    eof: Token,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>, file: Rc<String>) -> Self {
        let end = tokens.last().map(|token| token.span.end.0).unwrap_or(0);

        TokenStream {
            tokens: tokens.into_iter(),
            eof: Token::eof(end, file),
        }
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Token {
        match self.tokens.next() {
            Some(token) => {
                if token.kind == TokenKind::EOF {
                    self.eof = token.clone();
                }
                token
            }
            None => self.eof.clone(),
        }
    }
}
