//! Top-level driver: one form at a time, with single-token error recovery.

pub mod driver;
