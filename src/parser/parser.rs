//! Parser state for building the Abstract Syntax Tree.
//!
//! The parser keeps a one-token lookahead over a [`TokenSource`]: the
//! current token is the one every production inspects, and it is only
//! replaced when a production explicitly consumes it. The production
//! functions themselves live in [`super::expr`] and [`super::proto`].

use std::{mem, rc::Rc};

use crate::{
    ast::ast::Item,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind, TokenSource, TokenStream},
    Position,
};

use super::{
    precedence::PrecedenceTable,
    proto::{parse_definition, parse_extern, parse_top_level_expr},
};

/// The main parser structure that maintains parsing state.
pub struct Parser<S: TokenSource> {
    /// Where tokens come from
    source: S,
    /// The token currently looked at
    current: Token,
    /// Binary operator precedences, read-only while parsing
    precedence: PrecedenceTable,
}

impl<S: TokenSource> Parser<S> {
    /// Creates a parser and primes it with the first token of `source`.
    pub fn new(mut source: S, precedence: PrecedenceTable) -> Self {
        let current = source.next_token();

        Parser {
            source,
            current,
            precedence,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Token {
        let next = self.source.next_token();
        mem::replace(&mut self.current, next)
    }

    /// Returns true if the current token is the single character `c`.
    pub fn at_char(&self, c: char) -> bool {
        self.current.is_char(c)
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns the precedence of the current token, or -1 when it is not a
    /// binary operator installed in the precedence table.
    pub fn get_token_precedence(&self) -> i32 {
        match self.current_token_kind() {
            TokenKind::Char(c) if c.is_ascii() => self.precedence.precedence(c).unwrap_or(-1),
            _ => -1,
        }
    }

    pub fn precedence_table(&self) -> &PrecedenceTable {
        &self.precedence
    }

    /// Returns the source position of the current token.
    pub fn get_position(&self) -> Position {
        self.current.span.start.clone()
    }

    /// Builds an error about the current token without consuming it.
    pub fn unexpected(&self, error: fn(String) -> ErrorImpl) -> Error {
        Error::new(error(self.current.value.clone()), self.get_position())
    }
}

impl Parser<TokenStream> {
    /// Creates a parser over an already tokenized input.
    pub fn from_tokens(tokens: Vec<Token>, file: Rc<String>, precedence: PrecedenceTable) -> Self {
        Parser::new(TokenStream::new(tokens, file), precedence)
    }
}

/// Parses a stream of tokens into top-level items.
///
/// Stray `;` tokens between items are skipped. Parsing stops at the first
/// error; use the driver for error recovery.
///
/// # Returns
///
/// A tuple containing:
/// - The Parser instance (positioned at the failing token on error)
/// - Result containing either the parsed items or the first Error
pub fn parse(
    tokens: Vec<Token>,
    file: Rc<String>,
    precedence: PrecedenceTable,
) -> (Parser<TokenStream>, Result<Vec<Item>, Error>) {
    let mut parser = Parser::from_tokens(tokens, file, precedence);
    let mut items = vec![];

    while parser.has_tokens() {
        let item = match parser.current_token_kind() {
            TokenKind::Char(';') => {
                parser.advance();
                continue;
            }
            TokenKind::Def => parse_definition(&mut parser).map(Item::Definition),
            TokenKind::Extern => parse_extern(&mut parser).map(Item::Extern),
            _ => parse_top_level_expr(&mut parser).map(Item::Expression),
        };

        match item {
            Ok(item) => items.push(item),
            Err(error) => return (parser, Err(error)),
        }
    }

    (parser, Ok(items))
}
