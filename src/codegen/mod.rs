//! Code generation module.
//!
//! This module lowers AST nodes into an intermediate representation
//! through the [`backend::Backend`] trait. It contains:
//!
//! - The backend contract and the per-function variable environment
//! - Lowering of expressions, prototypes and function definitions
//! - An in-memory recording IR backend
//! - An LLVM backend (behind the `llvm` feature)

pub mod backend;
pub mod environment;
pub mod ir;
#[cfg(feature = "llvm")]
pub mod llvm;
pub mod lower;
