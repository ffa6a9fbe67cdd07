//! Diagnostic types shared by the engine and its hosts.
//!
//! A diagnostic is immutable once created: one per unguarded call site per
//! rule. Message templates use `{0}`, `{1}`, ... placeholders filled in by
//! [`format_message`].

use serde::{Deserialize, Serialize};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

impl DiagnosticCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Suggestion => "suggestion",
            Self::Message => "message",
        }
    }
}

/// A lint diagnostic anchored at a byte range of one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    /// Stable identifier of the rule that produced this diagnostic.
    pub rule_id: String,
    pub message_text: String,
    /// Human-readable hint describing how to correct the problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    #[must_use]
    pub fn warning(
        file: impl Into<String>,
        start: u32,
        length: u32,
        rule_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            start,
            length,
            rule_id: rule_id.into(),
            message_text: message.into(),
            correction: None,
            category: DiagnosticCategory::Warning,
        }
    }

    /// Attach a correction hint.
    #[must_use]
    pub fn with_correction(mut self, correction: impl Into<String>) -> Self {
        self.correction = Some(correction.into());
        self
    }

    /// Override the category.
    #[must_use]
    pub const fn with_category(mut self, category: DiagnosticCategory) -> Self {
        self.category = category;
        self
    }

    /// Exclusive end offset of the diagnostic range.
    #[inline]
    pub const fn end(&self) -> u32 {
        self.start + self.length
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Codes of parse diagnostics produced by the reference front end.
/// Values follow the TypeScript compiler's numbering for the same errors.
pub mod diagnostic_codes {
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1002;
    pub const IDENTIFIER_EXPECTED: u32 = 1003;
    pub const TOKEN_EXPECTED: u32 = 1005;
    pub const UNEXPECTED_TOKEN: u32 = 1012;
    pub const EXPRESSION_EXPECTED: u32 = 1109;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1128;
    pub const UNTERMINATED_TEMPLATE_LITERAL: u32 = 1160;
    pub const COMMENT_NOT_TERMINATED: u32 = 1010;
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: u32 = 1440;
}

/// Message templates for the codes in [`diagnostic_codes`].
pub mod diagnostic_messages {
    pub const IDENTIFIER_EXPECTED: &str = "Identifier expected.";
    pub const TOKEN_EXPECTED: &str = "'{0}' expected.";
    pub const UNEXPECTED_TOKEN: &str = "Unexpected token.";
    pub const EXPRESSION_EXPECTED: &str = "Expression expected.";
    pub const DECLARATION_OR_STATEMENT_EXPECTED: &str = "Declaration or statement expected.";
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: &str = "Maximum nesting depth exceeded.";
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
