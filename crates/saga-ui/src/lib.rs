//! Terminal UI helpers for the saga CLI.
//!
//! Provides terminal detection and severity-colored message styling.

pub mod styles;
pub mod terminal;

pub use styles::Severity;
