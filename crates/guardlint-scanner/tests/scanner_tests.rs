//! Tests for the scanner.
use guardlint_scanner::{ScannerState, SyntaxKind};

fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = ScannerState::new(source);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.get_token_text().to_string()));
    }
    tokens
}

fn kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

#[test]
fn test_keywords_and_identifiers() {
    assert_eq!(
        kinds("if (!this.isClosed) return;"),
        vec![
            SyntaxKind::IfKeyword,
            SyntaxKind::OpenParenToken,
            SyntaxKind::ExclamationToken,
            SyntaxKind::ThisKeyword,
            SyntaxKind::DotToken,
            SyntaxKind::Identifier,
            SyntaxKind::CloseParenToken,
            SyntaxKind::ReturnKeyword,
            SyntaxKind::SemicolonToken,
        ]
    );
}

#[test]
fn test_contextual_words_scan_as_identifiers() {
    assert_eq!(
        kinds("async of get"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::Identifier,
            SyntaxKind::Identifier
        ]
    );
}

#[test]
fn test_multi_character_operators() {
    assert_eq!(
        kinds("=== !== == != => && || ?? ?. ... <= >= ??="),
        vec![
            SyntaxKind::EqualsEqualsEqualsToken,
            SyntaxKind::ExclamationEqualsEqualsToken,
            SyntaxKind::EqualsEqualsToken,
            SyntaxKind::ExclamationEqualsToken,
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::AmpersandAmpersandToken,
            SyntaxKind::BarBarToken,
            SyntaxKind::QuestionQuestionToken,
            SyntaxKind::QuestionDotToken,
            SyntaxKind::DotDotDotToken,
            SyntaxKind::LessThanEqualsToken,
            SyntaxKind::GreaterThanEqualsToken,
            SyntaxKind::QuestionQuestionEqualsToken,
        ]
    );
}

#[test]
fn test_nested_type_arguments_close_separately() {
    assert_eq!(
        kinds("Map<string, List<int>>"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::CommaToken,
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::GreaterThanToken,
        ]
    );
}

#[test]
fn test_question_dot_before_digit_is_conditional() {
    assert_eq!(
        kinds("a?.5:1"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::ColonToken,
            SyntaxKind::NumericLiteral,
        ]
    );
}

#[test]
fn test_string_value_is_cooked() {
    let mut scanner = ScannerState::new(r#"'it\'s' "a\nb""#);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_token_value(), "it's");
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_token_value(), "a\nb");
}

#[test]
fn test_template_with_substitution_is_one_token() {
    let tokens = scan_all("`hello ${user.name} {x}` + 1");
    assert_eq!(tokens[0].0, SyntaxKind::NoSubstitutionTemplateLiteral);
    assert_eq!(tokens[0].1, "`hello ${user.name} {x}`");
    assert_eq!(tokens[1].0, SyntaxKind::PlusToken);
}

#[test]
fn test_comments_are_trivia_and_line_breaks_recorded() {
    let mut scanner = ScannerState::new("a // trailing\n/* block\n */ b");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(!scanner.has_preceding_line_break());
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert!(scanner.has_preceding_line_break());
    assert_eq!(scanner.get_token_value(), "b");
}

#[test]
fn test_numbers() {
    let tokens = scan_all("1 2.5 0xFF 1e10 3n .5");
    assert!(
        tokens
            .iter()
            .all(|(k, _)| *k == SyntaxKind::NumericLiteral)
    );
    assert_eq!(tokens.len(), 6);
}

#[test]
fn test_unterminated_string_reports_diagnostic() {
    let mut scanner = ScannerState::new("'abc\nx");
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_scanner_diagnostics().len(), 1);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
}

#[test]
fn test_snapshot_restore() {
    let mut scanner = ScannerState::new("a b c");
    scanner.scan();
    let snapshot = scanner.snapshot();
    scanner.scan();
    scanner.scan();
    assert_eq!(scanner.get_token_value(), "c");
    scanner.restore(snapshot);
    assert_eq!(scanner.get_token_value(), "a");
    scanner.scan();
    assert_eq!(scanner.get_token_value(), "b");
}

#[test]
fn test_token_kind_round_trip_through_u16() {
    for kind in [
        SyntaxKind::Unknown,
        SyntaxKind::Identifier,
        SyntaxKind::QuestionQuestionEqualsToken,
        SyntaxKind::AwaitKeyword,
        SyntaxKind::YieldKeyword,
    ] {
        assert_eq!(SyntaxKind::try_from_u16(kind as u16), Some(kind));
    }
    assert_eq!(SyntaxKind::try_from_u16(SyntaxKind::LAST_TOKEN as u16 + 1), None);
}
