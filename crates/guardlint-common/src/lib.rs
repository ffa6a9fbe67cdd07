//! Common types and utilities for guardlint.
//!
//! This crate provides foundational types used across all guardlint crates:
//! - Lint diagnostics (`Diagnostic`, `DiagnosticCategory`)
//! - Analysis limits and thresholds
//! - Position/Range types for line/column source locations

// Diagnostics produced by lint rules and by the parser
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, format_message};

// Centralized limits and thresholds
pub mod limits;

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position, Range};
