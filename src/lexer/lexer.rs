use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_SPAN, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, String);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // Tried in order; the first pattern matching at the current position wins.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^[a-zA-Z][a-zA-Z0-9]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(r"^([0-9]+(\.[0-9]*)?|\.[0-9]+)").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new(r"^\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^#[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^[^\s\p{Cc}]").unwrap(), handler: char_handler },
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }
}

fn number_handler(lexer: &mut Lexer, matched: String) {
    lexer.push(MK_TOKEN!(TokenKind::Number, matched.clone(), MK_SPAN!(lexer, matched.len())));
    lexer.advance_n(matched.len());
}

fn skip_handler(lexer: &mut Lexer, matched: String) {
    lexer.advance_n(matched.len());
}

fn char_handler(lexer: &mut Lexer, matched: String) {
    let c = matched.chars().next().unwrap_or('\0');

    lexer.push(MK_TOKEN!(TokenKind::Char(c), matched.clone(), MK_SPAN!(lexer, matched.len())));
    lexer.advance_n(matched.len());
}

fn symbol_handler(lexer: &mut Lexer, matched: String) {
    let kind = RESERVED_LOOKUP
        .get(matched.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, matched.clone(), MK_SPAN!(lexer, matched.len())));
    lexer.advance_n(matched.len());
}

/// Splits `source` into tokens, always terminated by an `EOF` token.
///
/// Identifiers are alphanumeric and start with a letter, `def` and `extern`
/// are reserved, `#` starts a comment running to the end of the line, and
/// every other printable character becomes a [`TokenKind::Char`] token.
/// Control characters outside whitespace are rejected.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let found = PATTERNS.iter().find_map(|pattern| {
            pattern
                .regex
                .find(lex.remainder())
                .map(|m| (pattern.handler, m.end()))
        });

        match found {
            Some((handler, len)) => {
                let matched = lex.remainder()[..len].to_string();
                handler(&mut lex, matched);
            }
            None => {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken {
                        token: lex.at().escape_default().to_string(),
                    },
                    Position(lex.pos as u32, lex.file()),
                ));
            }
        }
    }

    let end = lex.pos as u32;
    let file = lex.file();
    lex.push(Token::eof(end, file));
    Ok(lex.tokens)
}
