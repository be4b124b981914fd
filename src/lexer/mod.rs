//! Lexical analysis module.
//!
//! This module contains the lexer (tokenizer) that converts source text
//! into the token stream the parser consumes. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of the `def`/`extern` keywords, identifiers and numbers
//! - Single-character operator and punctuation tokens
//! - Token position tracking for error reporting
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;
