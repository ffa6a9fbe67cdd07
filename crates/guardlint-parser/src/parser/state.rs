//! Parser state: token cursor, diagnostics and recursion guard.
//!
//! `ParserState` is a recursive-descent parser over `ScannerState`. The
//! grammar lives in `state_statements` and `state_expressions`; this module
//! holds the shared machinery those methods build on.

use super::base::{NodeIndex, NodeList};
use super::node::{IdentifierData, NodeArena, NodeFlags};
use guardlint_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use guardlint_common::limits::MAX_PARSER_RECURSION_DEPTH;
use guardlint_scanner::{ScannerSnapshot, ScannerState, SyntaxKind, token_text};
use tracing::trace;

/// A syntax error found while parsing. Parsing always continues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub start: u32,
    pub length: u32,
    pub message: String,
    pub code: u32,
}

/// Saved parser position for speculative parsing.
pub(crate) struct ParserSnapshot {
    scanner: ScannerSnapshot,
    current_token: SyntaxKind,
    prev_token_end: u32,
    diagnostic_count: usize,
    last_error_pos: Option<u32>,
}

pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) parse_diagnostics: Vec<ParseDiagnostic>,
    pub(crate) current_token: SyntaxKind,
    /// End offset of the most recently consumed token.
    pub(crate) prev_token_end: u32,
    recursion_depth: u32,
    /// Set while parsing a `for` initializer, where `in` ends the expression.
    pub(crate) disallow_in: bool,
    /// Start of the last reported error; suppresses cascades at one position.
    last_error_pos: Option<u32>,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        let estimated_nodes = source_text.len() / 4;
        ParserState {
            scanner: ScannerState::new(source_text),
            arena: NodeArena::with_capacity(estimated_nodes),
            file_name,
            parse_diagnostics: Vec::new(),
            current_token: SyntaxKind::Unknown,
            prev_token_end: 0,
            recursion_depth: 0,
            disallow_in: false,
            last_error_pos: None,
        }
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn get_diagnostics(&self) -> &[ParseDiagnostic] {
        &self.parse_diagnostics
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    /// Start of the current token.
    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        u32_from_usize(self.scanner.get_token_start())
    }

    #[inline]
    pub(crate) fn current_token_end(&self) -> u32 {
        u32_from_usize(self.scanner.get_token_end())
    }

    #[inline]
    pub(crate) fn token_value(&self) -> &str {
        self.scanner.get_token_value()
    }

    #[inline]
    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    /// Current token is the contextual word `text` (scanned as an identifier).
    #[inline]
    pub(crate) fn is_contextual(&self, text: &str) -> bool {
        self.current_token == SyntaxKind::Identifier && self.scanner.get_token_value() == text
    }

    /// Consume the current token and advance.
    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.current_token_end();
        self.current_token = self.scanner.scan();
        self.current_token
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report `'<kind>' expected.` without consuming.
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        let message = format_message(diagnostic_messages::TOKEN_EXPECTED, &[token_text(kind)]);
        self.parse_error_at_current_token(&message, diagnostic_codes::TOKEN_EXPECTED);
        false
    }

    /// Automatic semicolon insertion: a `;`, `}`, end of file or a preceding
    /// line break terminates a statement.
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.current_token,
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) -> bool {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return true;
        }
        if self.can_parse_semicolon() {
            return true;
        }
        self.parse_expected(SyntaxKind::SemicolonToken)
    }

    // =========================================================================
    // Speculative parsing
    // =========================================================================

    pub(crate) fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            scanner: self.scanner.snapshot(),
            current_token: self.current_token,
            prev_token_end: self.prev_token_end,
            diagnostic_count: self.parse_diagnostics.len(),
            last_error_pos: self.last_error_pos,
        }
    }

    pub(crate) fn restore(&mut self, snapshot: ParserSnapshot) {
        self.scanner.restore(snapshot.scanner);
        self.current_token = snapshot.current_token;
        self.prev_token_end = snapshot.prev_token_end;
        self.parse_diagnostics.truncate(snapshot.diagnostic_count);
        self.last_error_pos = snapshot.last_error_pos;
    }

    /// Run `f` and rewind to the current position afterwards.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut ParserState) -> T) -> T {
        let snapshot = self.snapshot();
        let result = f(self);
        self.restore(snapshot);
        result
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn parse_error_at(&mut self, start: u32, length: u32, message: &str, code: u32) {
        if self.last_error_pos == Some(start) {
            return;
        }
        self.last_error_pos = Some(start);
        trace!(start, code, message, "parse error");
        self.parse_diagnostics.push(ParseDiagnostic {
            start,
            length,
            message: message.to_string(),
            code,
        });
    }

    pub(crate) fn parse_error_at_current_token(&mut self, message: &str, code: u32) {
        let start = self.token_pos();
        let length = self.current_token_end().saturating_sub(start);
        self.parse_error_at(start, length, message, code);
    }

    /// Move scanner diagnostics into the parse diagnostics, sorted by position.
    pub(crate) fn collect_scanner_diagnostics(&mut self) {
        for diag in self.scanner.get_scanner_diagnostics() {
            let code = if diag.message.starts_with("Unterminated string") {
                diagnostic_codes::UNTERMINATED_STRING_LITERAL
            } else if diag.message.starts_with("Unterminated template") {
                diagnostic_codes::UNTERMINATED_TEMPLATE_LITERAL
            } else if diag.message.starts_with("'*/'") {
                diagnostic_codes::COMMENT_NOT_TERMINATED
            } else {
                diagnostic_codes::UNEXPECTED_TOKEN
            };
            self.parse_diagnostics.push(ParseDiagnostic {
                start: u32_from_usize(diag.pos),
                length: u32_from_usize(diag.length),
                message: diag.message.to_string(),
                code,
            });
        }
        self.parse_diagnostics.sort_by_key(|d| d.start);
    }

    // =========================================================================
    // Recursion guard
    // =========================================================================

    /// Returns false (and reports once) when the nesting limit is reached.
    pub(crate) fn enter_recursion(&mut self) -> bool {
        if self.recursion_depth >= MAX_PARSER_RECURSION_DEPTH {
            self.parse_error_at_current_token(
                diagnostic_messages::MAXIMUM_NESTING_DEPTH_EXCEEDED,
                diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED,
            );
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    #[inline]
    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }

    // =========================================================================
    // Shared node helpers
    // =========================================================================

    pub(crate) fn make_node_list(&self, nodes: Vec<NodeIndex>, pos: u32) -> NodeList {
        NodeList::with_nodes(nodes, pos, self.prev_token_end.max(pos))
    }

    /// Parse an identifier, reporting and synthesizing a missing one otherwise.
    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::Identifier) {
            return self.parse_identifier_name();
        }
        self.parse_error_at_current_token(
            diagnostic_messages::IDENTIFIER_EXPECTED,
            diagnostic_codes::IDENTIFIER_EXPECTED,
        );
        self.create_missing_identifier()
    }

    /// Parse an identifier or keyword used as a name (`a.new`, `{ if: 1 }`).
    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        if !self.current_token.is_identifier_or_keyword() {
            self.parse_error_at_current_token(
                diagnostic_messages::IDENTIFIER_EXPECTED,
                diagnostic_codes::IDENTIFIER_EXPECTED,
            );
            return self.create_missing_identifier();
        }
        let start = self.token_pos();
        let end = self.current_token_end();
        let escaped_text = self.token_value().to_string();
        self.next_token();
        self.arena.add_identifier(
            SyntaxKind::Identifier as u16,
            start,
            end,
            IdentifierData { escaped_text },
        )
    }

    pub(crate) fn create_missing_identifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let index = self.arena.add_identifier(
            SyntaxKind::Identifier as u16,
            pos,
            pos,
            IdentifierData::default(),
        );
        self.arena.add_flags(index, NodeFlags::MISSING);
        index
    }
}

#[inline]
pub(crate) fn u32_from_usize(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
