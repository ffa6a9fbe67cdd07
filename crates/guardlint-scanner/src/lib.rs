//! Scanner/tokenizer for the guardlint reference front end.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types (node kinds continue in the parser crate)
//! - `ScannerState` - Tokenizer state machine
//! - Character classification utilities

pub mod char_codes;
pub use char_codes::{is_identifier_part, is_identifier_start, is_line_break, is_white_space};

pub mod syntax_kind;
pub use syntax_kind::{SyntaxKind, keyword_kind, token_text};

pub mod scanner_impl;
pub use scanner_impl::{ScannerDiagnostic, ScannerSnapshot, ScannerState};
