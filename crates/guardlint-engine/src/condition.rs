//! Condition matcher.
//!
//! Decides whether a boolean expression protects a subject. The question is
//! asked in one of two forms:
//! - positive: when the condition is true, the subject is safe
//!   (`!this.isClosed`, `mounted && ready`)
//! - negative: when the condition is false, the subject is safe
//!   (`this.isClosed`, `!mounted || cancelled`)
//!
//! Matching is structural. Subjects are compared as reference chains
//! (`this`, `a`, `this.a.b`); only a receiver that is not a reference chain
//! falls back to comparing whitespace-normalized source text. Either way the
//! subject must match before a predicate name counts, so `a.isOpen` never
//! protects `b`.

use crate::context::AnalysisContext;
use crate::rule::Predicate;
use guardlint_common::limits::MAX_REFERENCE_CHAIN_DEPTH;
use guardlint_parser::{NodeIndex, syntax_kind_ext};
use guardlint_scanner::SyntaxKind;
use smallvec::SmallVec;

/// The expression a guard must test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subject {
    /// The implicit `this` of a bare call (`emit(x)`).
    ImplicitThis,
    Expr(NodeIndex),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Form {
    Positive,
    Negative,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum SubjectKey<'a> {
    Chain(SmallVec<[&'a str; 4]>),
    Text(String),
}

/// Matcher for one subject and one predicate set.
pub struct ConditionMatcher<'c, 'a> {
    ctx: &'c AnalysisContext<'a>,
    predicates: &'c [Predicate],
    subject: Option<SubjectKey<'a>>,
}

impl<'c, 'a> ConditionMatcher<'c, 'a> {
    pub fn new(
        ctx: &'c AnalysisContext<'a>,
        subject: Subject,
        predicates: &'c [Predicate],
    ) -> ConditionMatcher<'c, 'a> {
        let subject = match subject {
            Subject::ImplicitThis => Some(SubjectKey::Chain(SmallVec::from_slice(&["this"]))),
            Subject::Expr(expr) => subject_key(ctx, expr),
        };
        ConditionMatcher {
            ctx,
            predicates,
            subject,
        }
    }

    pub fn matches(&self, condition: NodeIndex, form: Form) -> bool {
        match form {
            Form::Positive => self.affirms(condition),
            Form::Negative => self.denies(condition),
        }
    }

    /// The condition being true implies the subject is safe.
    pub fn affirms(&self, condition: NodeIndex) -> bool {
        self.subject.is_some() && self.implies_safe(condition, true, 0)
    }

    /// The condition being false implies the subject is safe.
    pub fn denies(&self, condition: NodeIndex) -> bool {
        self.subject.is_some() && self.implies_safe(condition, false, 0)
    }

    fn implies_safe(&self, expr: NodeIndex, when: bool, depth: u32) -> bool {
        if depth > MAX_REFERENCE_CHAIN_DEPTH {
            return false;
        }
        let arena = self.ctx.arena;
        let expr = self.ctx.skip_parens(expr);
        let Some(node) = arena.get(expr) else {
            return false;
        };

        if node.kind == syntax_kind_ext::PREFIX_UNARY_EXPRESSION {
            return match arena.get_unary_expr(node) {
                Some(unary) if unary.operator == SyntaxKind::ExclamationToken as u16 => {
                    self.implies_safe(unary.operand, !when, depth + 1)
                }
                _ => false,
            };
        }

        if let Some(binary) = arena.get_binary_expr(node) {
            let (left, right) = (binary.left, binary.right);
            return match SyntaxKind::try_from_u16(binary.operator_token) {
                Some(SyntaxKind::AmpersandAmpersandToken) => {
                    if when {
                        self.implies_safe(left, true, depth + 1)
                            || self.implies_safe(right, true, depth + 1)
                    } else {
                        self.implies_safe(left, false, depth + 1)
                            && self.implies_safe(right, false, depth + 1)
                    }
                }
                Some(SyntaxKind::BarBarToken) => {
                    if when {
                        self.implies_safe(left, true, depth + 1)
                            && self.implies_safe(right, true, depth + 1)
                    } else {
                        self.implies_safe(left, false, depth + 1)
                            || self.implies_safe(right, false, depth + 1)
                    }
                }
                Some(
                    SyntaxKind::EqualsEqualsToken | SyntaxKind::EqualsEqualsEqualsToken,
                ) => self.compared_to_boolean(left, right, when, depth),
                Some(
                    SyntaxKind::ExclamationEqualsToken | SyntaxKind::ExclamationEqualsEqualsToken,
                ) => self.compared_to_boolean(left, right, !when, depth),
                _ => false,
            };
        }

        self.predicate_test(expr)
            .is_some_and(|predicate| predicate.safe_when == when)
    }

    /// `e == true`, `false === e` and friends. `equal` is whether the
    /// comparison itself holds.
    fn compared_to_boolean(
        &self,
        left: NodeIndex,
        right: NodeIndex,
        equal: bool,
        depth: u32,
    ) -> bool {
        if let Some(value) = self.boolean_literal(right) {
            return self.implies_safe(left, equal == value, depth + 1);
        }
        if let Some(value) = self.boolean_literal(left) {
            return self.implies_safe(right, equal == value, depth + 1);
        }
        false
    }

    fn boolean_literal(&self, expr: NodeIndex) -> Option<bool> {
        let kind = self.ctx.node(self.ctx.skip_parens(expr))?.kind;
        if kind == SyntaxKind::TrueKeyword as u16 {
            Some(true)
        } else if kind == SyntaxKind::FalseKeyword as u16 {
            Some(false)
        } else {
            None
        }
    }

    /// `subject.p`, `subject?.p`, `subject.p()`, or bare `p` / `p()` when the
    /// subject is `this`.
    fn predicate_test(&self, expr: NodeIndex) -> Option<&'c Predicate> {
        let arena = self.ctx.arena;
        let mut expr = self.ctx.skip_parens(expr);
        let mut node = arena.get(expr)?;

        if node.kind == syntax_kind_ext::CALL_EXPRESSION {
            let call = arena.get_call_expr(node)?;
            if call.arguments.as_ref().is_some_and(|args| !args.is_empty()) {
                return None;
            }
            expr = self.ctx.skip_parens(call.expression);
            node = arena.get(expr)?;
        }

        let (name, object) = if node.kind == syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION {
            let access = arena.get_access_expr(node)?;
            (
                arena.identifier_text(access.name_or_argument)?,
                Some(access.expression),
            )
        } else {
            (arena.identifier_text(expr)?, None)
        };

        let predicate = self.predicates.iter().find(|p| p.name == name)?;
        let key = match object {
            Some(object) => subject_key(self.ctx, object)?,
            None => SubjectKey::Chain(SmallVec::from_slice(&["this"])),
        };
        (self.subject.as_ref() == Some(&key)).then_some(predicate)
    }
}

/// Convenience wrapper over [`ConditionMatcher`].
pub fn matches(
    ctx: &AnalysisContext<'_>,
    condition: NodeIndex,
    subject: Subject,
    predicates: &[Predicate],
    form: Form,
) -> bool {
    ConditionMatcher::new(ctx, subject, predicates).matches(condition, form)
}

fn subject_key<'a>(ctx: &AnalysisContext<'a>, expr: NodeIndex) -> Option<SubjectKey<'a>> {
    if let Some(chain) = reference_chain(ctx, expr) {
        return Some(SubjectKey::Chain(chain));
    }
    let text = ctx.text_of(ctx.skip_parens(expr))?;
    let normalized: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    (!normalized.is_empty()).then_some(SubjectKey::Text(normalized))
}

/// `this.a.b` as `["this", "a", "b"]`. Optional and plain access compare
/// equal; anything else is not a reference chain.
fn reference_chain<'a>(ctx: &AnalysisContext<'a>, expr: NodeIndex) -> Option<SmallVec<[&'a str; 4]>> {
    let arena = ctx.arena;
    let mut segments: SmallVec<[&'a str; 4]> = SmallVec::new();
    let mut current = expr;
    for _ in 0..MAX_REFERENCE_CHAIN_DEPTH {
        current = ctx.skip_parens(current);
        let node = arena.get(current)?;
        if node.kind == SyntaxKind::ThisKeyword as u16 {
            segments.push("this");
            segments.reverse();
            return Some(segments);
        }
        if node.kind == SyntaxKind::Identifier as u16 {
            segments.push(arena.identifier_text(current)?);
            segments.reverse();
            return Some(segments);
        }
        if node.kind != syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION {
            return None;
        }
        let access = arena.get_access_expr(node)?;
        segments.push(arena.identifier_text(access.name_or_argument)?);
        current = access.expression;
    }
    None
}

/// The condition a fix writes: `!this.isClosed`, `mounted`, `sink.isOpen`.
pub fn positive_condition_text(
    ctx: &AnalysisContext<'_>,
    subject: Subject,
    predicate: &Predicate,
) -> String {
    let bang = if predicate.safe_when { "" } else { "!" };
    match subject {
        Subject::ImplicitThis => format!("{bang}{}", predicate.name),
        Subject::Expr(expr) => {
            let receiver = ctx.text_of(expr).unwrap_or("this").trim();
            format!("{bang}{receiver}.{}", predicate.name)
        }
    }
}

#[cfg(test)]
#[path = "../tests/condition_tests.rs"]
mod tests;
