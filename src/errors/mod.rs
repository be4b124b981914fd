//! Error types and error handling for the front end.
//!
//! This module defines the single error type used by every phase:
//!
//! - Error structures with source position information
//! - Lexing, parsing and lowering error variants
//! - Error names and suggestions for diagnostics

pub mod errors;

#[cfg(test)]
mod tests;
