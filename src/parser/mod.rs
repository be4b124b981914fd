//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the recursive-descent parser that transforms a
//! stream of tokens into AST nodes, one production per function:
//!
//! - Expression parsing (literals, variables, calls, parentheses)
//! - Binary operator chains via precedence climbing
//! - Prototypes, definitions, externs and top-level expressions
//!
//! A failing production reports what it expected and leaves the offending
//! token in place; skipping input is up to the caller.

pub mod expr;
pub mod parser;
pub mod precedence;
pub mod proto;

#[cfg(test)]
mod tests;
