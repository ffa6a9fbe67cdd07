//! Token kinds.
//!
//! Node kinds produced by the parser share the same `u16` space and start at
//! `SyntaxKind::LAST_TOKEN + 1` (see `guardlint_parser::syntax_kind_ext`).

use serde::Serialize;

#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SyntaxKind {
    Unknown = 0,
    EndOfFileToken,

    // Literals
    NumericLiteral,
    StringLiteral,
    NoSubstitutionTemplateLiteral,

    // Identifiers
    Identifier,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    QuestionDotToken,
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsToken,
    ExclamationEqualsEqualsToken,
    EqualsGreaterThanToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,
    QuestionToken,
    QuestionQuestionToken,
    ColonToken,
    AtToken,

    // Assignment
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    SlashEqualsToken,
    QuestionQuestionEqualsToken,

    // Reserved words
    AwaitKeyword,
    BreakKeyword,
    CatchKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DoKeyword,
    ElseKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FinallyKeyword,
    ForKeyword,
    FunctionKeyword,
    IfKeyword,
    InstanceOfKeyword,
    InKeyword,
    LetKeyword,
    NewKeyword,
    NullKeyword,
    ReturnKeyword,
    SuperKeyword,
    ThisKeyword,
    ThrowKeyword,
    TrueKeyword,
    TryKeyword,
    TypeOfKeyword,
    VarKeyword,
    VoidKeyword,
    WhileKeyword,
    YieldKeyword,
}

impl SyntaxKind {
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::AwaitKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::YieldKeyword;
    pub const LAST_TOKEN: SyntaxKind = SyntaxKind::YieldKeyword;

    #[inline]
    pub fn is_keyword(self) -> bool {
        (Self::FIRST_KEYWORD as u16..=Self::LAST_KEYWORD as u16).contains(&(self as u16))
    }

    /// Keywords that may still be used as property names (`a.new`, `{ if: 1 }`).
    #[inline]
    pub fn is_identifier_or_keyword(self) -> bool {
        self == SyntaxKind::Identifier || self.is_keyword()
    }

    #[inline]
    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::EqualsToken
                | SyntaxKind::PlusEqualsToken
                | SyntaxKind::MinusEqualsToken
                | SyntaxKind::AsteriskEqualsToken
                | SyntaxKind::SlashEqualsToken
                | SyntaxKind::QuestionQuestionEqualsToken
        )
    }

    /// Convert a raw `u16` back into a token kind. Returns `None` for node
    /// kinds, which live above `LAST_TOKEN`.
    pub fn try_from_u16(value: u16) -> Option<SyntaxKind> {
        if value > Self::LAST_TOKEN as u16 {
            return None;
        }
        TOKEN_KINDS.get(value as usize).copied()
    }
}

const TOKEN_KINDS: [SyntaxKind; SyntaxKind::LAST_TOKEN as usize + 1] = {
    use SyntaxKind::*;
    [
        Unknown,
        EndOfFileToken,
        NumericLiteral,
        StringLiteral,
        NoSubstitutionTemplateLiteral,
        Identifier,
        OpenBraceToken,
        CloseBraceToken,
        OpenParenToken,
        CloseParenToken,
        OpenBracketToken,
        CloseBracketToken,
        DotToken,
        DotDotDotToken,
        SemicolonToken,
        CommaToken,
        QuestionDotToken,
        LessThanToken,
        GreaterThanToken,
        LessThanEqualsToken,
        GreaterThanEqualsToken,
        EqualsEqualsToken,
        EqualsEqualsEqualsToken,
        ExclamationEqualsToken,
        ExclamationEqualsEqualsToken,
        EqualsGreaterThanToken,
        PlusToken,
        MinusToken,
        AsteriskToken,
        SlashToken,
        PercentToken,
        PlusPlusToken,
        MinusMinusToken,
        AmpersandToken,
        BarToken,
        CaretToken,
        ExclamationToken,
        TildeToken,
        AmpersandAmpersandToken,
        BarBarToken,
        QuestionToken,
        QuestionQuestionToken,
        ColonToken,
        AtToken,
        EqualsToken,
        PlusEqualsToken,
        MinusEqualsToken,
        AsteriskEqualsToken,
        SlashEqualsToken,
        QuestionQuestionEqualsToken,
        AwaitKeyword,
        BreakKeyword,
        CatchKeyword,
        ClassKeyword,
        ConstKeyword,
        ContinueKeyword,
        DoKeyword,
        ElseKeyword,
        ExtendsKeyword,
        FalseKeyword,
        FinallyKeyword,
        ForKeyword,
        FunctionKeyword,
        IfKeyword,
        InstanceOfKeyword,
        InKeyword,
        LetKeyword,
        NewKeyword,
        NullKeyword,
        ReturnKeyword,
        SuperKeyword,
        ThisKeyword,
        ThrowKeyword,
        TrueKeyword,
        TryKeyword,
        TypeOfKeyword,
        VarKeyword,
        VoidKeyword,
        WhileKeyword,
        YieldKeyword,
    ]
};

/// Look up the keyword kind for an identifier-shaped word.
pub fn keyword_kind(text: &str) -> Option<SyntaxKind> {
    let kind = match text {
        "await" => SyntaxKind::AwaitKeyword,
        "break" => SyntaxKind::BreakKeyword,
        "catch" => SyntaxKind::CatchKeyword,
        "class" => SyntaxKind::ClassKeyword,
        "const" => SyntaxKind::ConstKeyword,
        "continue" => SyntaxKind::ContinueKeyword,
        "do" => SyntaxKind::DoKeyword,
        "else" => SyntaxKind::ElseKeyword,
        "extends" => SyntaxKind::ExtendsKeyword,
        "false" => SyntaxKind::FalseKeyword,
        "finally" => SyntaxKind::FinallyKeyword,
        "for" => SyntaxKind::ForKeyword,
        "function" => SyntaxKind::FunctionKeyword,
        "if" => SyntaxKind::IfKeyword,
        "instanceof" => SyntaxKind::InstanceOfKeyword,
        "in" => SyntaxKind::InKeyword,
        "let" => SyntaxKind::LetKeyword,
        "new" => SyntaxKind::NewKeyword,
        "null" => SyntaxKind::NullKeyword,
        "return" => SyntaxKind::ReturnKeyword,
        "super" => SyntaxKind::SuperKeyword,
        "this" => SyntaxKind::ThisKeyword,
        "throw" => SyntaxKind::ThrowKeyword,
        "true" => SyntaxKind::TrueKeyword,
        "try" => SyntaxKind::TryKeyword,
        "typeof" => SyntaxKind::TypeOfKeyword,
        "var" => SyntaxKind::VarKeyword,
        "void" => SyntaxKind::VoidKeyword,
        "while" => SyntaxKind::WhileKeyword,
        "yield" => SyntaxKind::YieldKeyword,
        _ => return None,
    };
    Some(kind)
}

/// Fixed source text of a punctuation or keyword token, for diagnostics.
pub fn token_text(kind: SyntaxKind) -> &'static str {
    use SyntaxKind::*;
    match kind {
        OpenBraceToken => "{",
        CloseBraceToken => "}",
        OpenParenToken => "(",
        CloseParenToken => ")",
        OpenBracketToken => "[",
        CloseBracketToken => "]",
        DotToken => ".",
        DotDotDotToken => "...",
        SemicolonToken => ";",
        CommaToken => ",",
        QuestionDotToken => "?.",
        LessThanToken => "<",
        GreaterThanToken => ">",
        LessThanEqualsToken => "<=",
        GreaterThanEqualsToken => ">=",
        EqualsEqualsToken => "==",
        EqualsEqualsEqualsToken => "===",
        ExclamationEqualsToken => "!=",
        ExclamationEqualsEqualsToken => "!==",
        EqualsGreaterThanToken => "=>",
        PlusToken => "+",
        MinusToken => "-",
        AsteriskToken => "*",
        SlashToken => "/",
        PercentToken => "%",
        PlusPlusToken => "++",
        MinusMinusToken => "--",
        AmpersandToken => "&",
        BarToken => "|",
        CaretToken => "^",
        ExclamationToken => "!",
        TildeToken => "~",
        AmpersandAmpersandToken => "&&",
        BarBarToken => "||",
        QuestionToken => "?",
        QuestionQuestionToken => "??",
        ColonToken => ":",
        AtToken => "@",
        EqualsToken => "=",
        PlusEqualsToken => "+=",
        MinusEqualsToken => "-=",
        AsteriskEqualsToken => "*=",
        SlashEqualsToken => "/=",
        QuestionQuestionEqualsToken => "??=",
        AwaitKeyword => "await",
        BreakKeyword => "break",
        CatchKeyword => "catch",
        ClassKeyword => "class",
        ConstKeyword => "const",
        ContinueKeyword => "continue",
        DoKeyword => "do",
        ElseKeyword => "else",
        ExtendsKeyword => "extends",
        FalseKeyword => "false",
        FinallyKeyword => "finally",
        ForKeyword => "for",
        FunctionKeyword => "function",
        IfKeyword => "if",
        InstanceOfKeyword => "instanceof",
        InKeyword => "in",
        LetKeyword => "let",
        NewKeyword => "new",
        NullKeyword => "null",
        ReturnKeyword => "return",
        SuperKeyword => "super",
        ThisKeyword => "this",
        ThrowKeyword => "throw",
        TrueKeyword => "true",
        TryKeyword => "try",
        TypeOfKeyword => "typeof",
        VarKeyword => "var",
        VoidKeyword => "void",
        WhileKeyword => "while",
        YieldKeyword => "yield",
        EndOfFileToken => "end of file",
        Identifier => "identifier",
        NumericLiteral | StringLiteral | NoSubstitutionTemplateLiteral => "literal",
        Unknown => "unknown token",
    }
}
