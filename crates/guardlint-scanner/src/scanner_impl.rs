//! Scanner state machine.
//!
//! The scanner is pull-based: the parser calls [`ScannerState::scan`] to
//! advance and reads the current token through the getters. Trivia
//! (whitespace and comments) is skipped but remembered through
//! `has_preceding_line_break` so the parser can apply semicolon insertion.

use crate::char_codes::{is_identifier_part, is_identifier_start, is_line_break, is_white_space};
use crate::syntax_kind::{SyntaxKind, keyword_kind};
use std::sync::Arc;

/// A lexical error. Scanning continues after reporting it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannerDiagnostic {
    pub pos: usize,
    pub length: usize,
    pub message: &'static str,
}

/// Saved scanner position, used for parser look-ahead.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    full_start: usize,
    token_value: String,
    preceding_line_break: bool,
    diagnostic_count: usize,
}

pub struct ScannerState {
    text: Arc<str>,
    pos: usize,
    end: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    preceding_line_break: bool,
    diagnostics: Vec<ScannerDiagnostic>,
}

impl ScannerState {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            pos: 0,
            end,
            full_start: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            preceding_line_break: false,
            diagnostics: Vec::new(),
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    #[inline]
    pub fn source_text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn source_text_arc(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    #[inline]
    pub fn get_token(&self) -> SyntaxKind {
        self.token
    }

    /// Start of the current token, after leading trivia.
    #[inline]
    pub fn get_token_start(&self) -> usize {
        self.token_start
    }

    /// Start of the current token including leading trivia.
    #[inline]
    pub fn get_token_full_start(&self) -> usize {
        self.full_start
    }

    #[inline]
    pub fn get_token_end(&self) -> usize {
        self.pos
    }

    /// Cooked value: identifier name, unquoted string contents, or numeric text.
    #[inline]
    pub fn get_token_value(&self) -> &str {
        &self.token_value
    }

    #[inline]
    pub fn get_token_text(&self) -> &str {
        &self.text[self.token_start..self.pos]
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    pub fn get_scanner_diagnostics(&self) -> &[ScannerDiagnostic] {
        &self.diagnostics
    }

    // =========================================================================
    // Look-ahead support
    // =========================================================================

    pub fn snapshot(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            full_start: self.full_start,
            token_value: self.token_value.clone(),
            preceding_line_break: self.preceding_line_break,
            diagnostic_count: self.diagnostics.len(),
        }
    }

    pub fn restore(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.full_start = snapshot.full_start;
        self.token_value = snapshot.token_value;
        self.preceding_line_break = snapshot.preceding_line_break;
        self.diagnostics.truncate(snapshot.diagnostic_count);
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[inline]
    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    fn error(&mut self, pos: usize, length: usize, message: &'static str) {
        self.diagnostics.push(ScannerDiagnostic {
            pos,
            length,
            message,
        });
    }

    /// Skip whitespace and comments, recording line breaks.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek_char() {
            if is_line_break(ch) {
                self.preceding_line_break = true;
                self.pos += ch.len_utf8();
            } else if is_white_space(ch) {
                self.pos += ch.len_utf8();
            } else if ch == '/' && self.peek_byte_at(1) == Some(b'/') {
                while let Some(c) = self.peek_char() {
                    if is_line_break(c) {
                        break;
                    }
                    self.pos += c.len_utf8();
                }
            } else if ch == '/' && self.peek_byte_at(1) == Some(b'*') {
                let start = self.pos;
                self.pos += 2;
                let mut closed = false;
                while let Some(c) = self.peek_char() {
                    if c == '*' && self.peek_byte_at(1) == Some(b'/') {
                        self.pos += 2;
                        closed = true;
                        break;
                    }
                    if is_line_break(c) {
                        self.preceding_line_break = true;
                    }
                    self.pos += c.len_utf8();
                }
                if !closed {
                    self.error(start, self.pos - start, "'*/' expected.");
                }
            } else {
                break;
            }
        }
    }

    /// Advance to the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start = self.pos;
        self.preceding_line_break = false;
        self.token_value.clear();
        self.skip_trivia();
        self.token_start = self.pos;

        let Some(ch) = self.peek_char() else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };

        self.token = if is_identifier_start(ch) {
            self.scan_identifier()
        } else if ch.is_ascii_digit() || (ch == '.' && self.next_is_digit(1)) {
            self.scan_number()
        } else if ch == '"' || ch == '\'' {
            self.scan_string(ch)
        } else if ch == '`' {
            self.scan_template()
        } else {
            self.scan_punctuation(ch)
        };
        self.token
    }

    fn next_is_digit(&self, offset: usize) -> bool {
        self.peek_byte_at(offset).is_some_and(|b| b.is_ascii_digit())
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !is_identifier_part(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        let text = &self.text[start..self.pos];
        self.token_value.push_str(text);
        keyword_kind(text).unwrap_or(SyntaxKind::Identifier)
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        if self.peek_byte_at(0) == Some(b'0')
            && matches!(self.peek_byte_at(1), Some(b'x' | b'X' | b'b' | b'B' | b'o' | b'O'))
        {
            self.pos += 2;
            while self
                .peek_byte_at(0)
                .is_some_and(|b| b.is_ascii_hexdigit() || b == b'_')
            {
                self.pos += 1;
            }
        } else {
            while self
                .peek_byte_at(0)
                .is_some_and(|b| b.is_ascii_digit() || b == b'_')
            {
                self.pos += 1;
            }
            if self.peek_byte_at(0) == Some(b'.') && self.next_is_digit(1) {
                self.pos += 1;
                while self.peek_byte_at(0).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
            if matches!(self.peek_byte_at(0), Some(b'e' | b'E')) {
                let sign = usize::from(matches!(self.peek_byte_at(1), Some(b'+' | b'-')));
                if self.next_is_digit(1 + sign) {
                    self.pos += 1 + sign;
                    while self.peek_byte_at(0).is_some_and(|b| b.is_ascii_digit()) {
                        self.pos += 1;
                    }
                }
            }
        }
        // BigInt suffix
        if self.peek_byte_at(0) == Some(b'n') {
            self.pos += 1;
        }
        let text = &self.text[start..self.pos];
        self.token_value.push_str(text);
        SyntaxKind::NumericLiteral
    }

    fn scan_escape(&mut self) {
        // Positioned on the character after the backslash.
        let Some(c) = self.peek_char() else {
            return;
        };
        self.pos += c.len_utf8();
        let cooked = match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            'b' => '\u{0008}',
            'f' => '\u{000C}',
            'v' => '\u{000B}',
            '\r' => {
                if self.peek_byte_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
                return;
            }
            '\n' => return,
            other => other,
        };
        self.token_value.push(cooked);
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        loop {
            let Some(c) = self.peek_char() else {
                self.error(start, self.pos - start, "Unterminated string literal.");
                break;
            };
            if c == quote {
                self.pos += 1;
                break;
            }
            if is_line_break(c) {
                self.error(start, self.pos - start, "Unterminated string literal.");
                break;
            }
            self.pos += c.len_utf8();
            if c == '\\' {
                self.scan_escape();
            } else {
                self.token_value.push(c);
            }
        }
        SyntaxKind::StringLiteral
    }

    /// Template literals are scanned as a single token. Substitutions are
    /// skipped with brace balancing; their contents are not tokenized.
    fn scan_template(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        let mut depth = 0u32;
        loop {
            let Some(c) = self.peek_char() else {
                self.error(start, self.pos - start, "Unterminated template literal.");
                break;
            };
            self.pos += c.len_utf8();
            match c {
                '`' if depth == 0 => break,
                '\\' => self.scan_escape(),
                '$' if depth == 0 && self.peek_byte_at(0) == Some(b'{') => {
                    self.pos += 1;
                    depth = 1;
                }
                '{' if depth > 0 => depth += 1,
                '}' if depth > 0 => depth -= 1,
                _ if depth == 0 => self.token_value.push(c),
                _ => {}
            }
        }
        SyntaxKind::NoSubstitutionTemplateLiteral
    }

    fn scan_punctuation(&mut self, ch: char) -> SyntaxKind {
        let b1 = self.peek_byte_at(1);
        let b2 = self.peek_byte_at(2);
        let (kind, len) = match ch {
            '{' => (SyntaxKind::OpenBraceToken, 1),
            '}' => (SyntaxKind::CloseBraceToken, 1),
            '(' => (SyntaxKind::OpenParenToken, 1),
            ')' => (SyntaxKind::CloseParenToken, 1),
            '[' => (SyntaxKind::OpenBracketToken, 1),
            ']' => (SyntaxKind::CloseBracketToken, 1),
            ';' => (SyntaxKind::SemicolonToken, 1),
            ',' => (SyntaxKind::CommaToken, 1),
            ':' => (SyntaxKind::ColonToken, 1),
            '~' => (SyntaxKind::TildeToken, 1),
            '^' => (SyntaxKind::CaretToken, 1),
            '@' => (SyntaxKind::AtToken, 1),
            '%' => (SyntaxKind::PercentToken, 1),
            '.' => {
                if b1 == Some(b'.') && b2 == Some(b'.') {
                    (SyntaxKind::DotDotDotToken, 3)
                } else {
                    (SyntaxKind::DotToken, 1)
                }
            }
            '?' => match b1 {
                // `a?.5:1` is a conditional, not optional chaining.
                Some(b'.') if !b2.is_some_and(|b| b.is_ascii_digit()) => {
                    (SyntaxKind::QuestionDotToken, 2)
                }
                Some(b'?') if b2 == Some(b'=') => (SyntaxKind::QuestionQuestionEqualsToken, 3),
                Some(b'?') => (SyntaxKind::QuestionQuestionToken, 2),
                _ => (SyntaxKind::QuestionToken, 1),
            },
            '<' => match b1 {
                Some(b'=') => (SyntaxKind::LessThanEqualsToken, 2),
                _ => (SyntaxKind::LessThanToken, 1),
            },
            // `>>` is never produced so that nested type arguments close cleanly.
            '>' => match b1 {
                Some(b'=') => (SyntaxKind::GreaterThanEqualsToken, 2),
                _ => (SyntaxKind::GreaterThanToken, 1),
            },
            '=' => match (b1, b2) {
                (Some(b'='), Some(b'=')) => (SyntaxKind::EqualsEqualsEqualsToken, 3),
                (Some(b'='), _) => (SyntaxKind::EqualsEqualsToken, 2),
                (Some(b'>'), _) => (SyntaxKind::EqualsGreaterThanToken, 2),
                _ => (SyntaxKind::EqualsToken, 1),
            },
            '!' => match (b1, b2) {
                (Some(b'='), Some(b'=')) => (SyntaxKind::ExclamationEqualsEqualsToken, 3),
                (Some(b'='), _) => (SyntaxKind::ExclamationEqualsToken, 2),
                _ => (SyntaxKind::ExclamationToken, 1),
            },
            '+' => match b1 {
                Some(b'+') => (SyntaxKind::PlusPlusToken, 2),
                Some(b'=') => (SyntaxKind::PlusEqualsToken, 2),
                _ => (SyntaxKind::PlusToken, 1),
            },
            '-' => match b1 {
                Some(b'-') => (SyntaxKind::MinusMinusToken, 2),
                Some(b'=') => (SyntaxKind::MinusEqualsToken, 2),
                _ => (SyntaxKind::MinusToken, 1),
            },
            '*' => match b1 {
                Some(b'=') => (SyntaxKind::AsteriskEqualsToken, 2),
                _ => (SyntaxKind::AsteriskToken, 1),
            },
            '/' => match b1 {
                Some(b'=') => (SyntaxKind::SlashEqualsToken, 2),
                _ => (SyntaxKind::SlashToken, 1),
            },
            '&' => match b1 {
                Some(b'&') => (SyntaxKind::AmpersandAmpersandToken, 2),
                _ => (SyntaxKind::AmpersandToken, 1),
            },
            '|' => match b1 {
                Some(b'|') => (SyntaxKind::BarBarToken, 2),
                _ => (SyntaxKind::BarToken, 1),
            },
            other => {
                let len = other.len_utf8();
                self.error(self.pos, len, "Invalid character.");
                (SyntaxKind::Unknown, len)
            }
        };
        self.pos += len;
        kind
    }
}
