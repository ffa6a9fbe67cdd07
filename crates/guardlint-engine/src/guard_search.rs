//! Guard search.
//!
//! Decides whether a matched call site is protected, by walking its ancestor
//! chain instead of building a control-flow graph. Condition guards are
//! recognized in four shapes:
//! - `DirectIf`: `if (<affirms>) { site }` or `if (<denies>) {} else { site }`
//! - `EarlyReturn`: `if (<denies>) return;` earlier in the nearest enclosing
//!   block
//! - `Conditional`: `<affirms> ? site : x`, `<affirms> && site`, `<denies> || site`
//! - `NestedCallback`: any of the above, found inside a function literal
//!   passed to a continuation combinator
//!
//! The walk never leaves the innermost enclosing function. One recognized
//! guard is taken to dominate every path to the call; guards inside loops or
//! behind other branches are accepted as well. Early exits are only looked
//! for in the first statement list above the call.

use crate::condition::{ConditionMatcher, Subject};
use crate::context::{AnalysisContext, CallSite};
use crate::rule::{GuardSpec, Predicate};
use guardlint_common::limits::MAX_TREE_WALK_ITERATIONS;
use guardlint_parser::{NodeIndex, syntax_kind_ext};
use guardlint_scanner::SyntaxKind;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuardKind {
    DirectIf,
    EarlyReturn,
    Conditional,
    Wrapper,
    NestedCallback,
}

/// A recognized guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardMatch {
    pub kind: GuardKind,
    /// Function (or source file) the search was confined to.
    pub scope: NodeIndex,
    /// The guarding node: an `if`, a conditional, a logical expression or a
    /// wrapper call.
    pub guard: NodeIndex,
}

/// Subject a condition guard must test for `site`.
pub fn subject_of(site: &CallSite<'_>) -> Subject {
    site.receiver.map_or(Subject::ImplicitThis, Subject::Expr)
}

pub struct GuardSearch<'c, 'a> {
    ctx: &'c AnalysisContext<'a>,
}

impl<'c, 'a> GuardSearch<'c, 'a> {
    pub const fn new(ctx: &'c AnalysisContext<'a>) -> GuardSearch<'c, 'a> {
        GuardSearch { ctx }
    }

    pub fn find_guard(&self, site: &CallSite<'_>, guard: &GuardSpec) -> Option<GuardMatch> {
        match guard {
            GuardSpec::Condition { predicates } => {
                self.find_condition_guard(site.node, subject_of(site), predicates)
            }
            GuardSpec::Wrapper { wrappers, .. } => self.find_wrapper(site.node, wrappers),
        }
    }

    pub fn find_condition_guard(
        &self,
        site: NodeIndex,
        subject: Subject,
        predicates: &[Predicate],
    ) -> Option<GuardMatch> {
        let matcher = ConditionMatcher::new(self.ctx, subject, predicates);
        match self.ctx.enclosing_function(site) {
            Some(function) if self.ctx.is_combinator_callback(function) => {
                // The callback runs later; only its own body can protect it.
                self.search_scope(site, function, &matcher)
                    .map(|found| GuardMatch {
                        kind: GuardKind::NestedCallback,
                        ..found
                    })
            }
            Some(function) => self.search_scope(site, function, &matcher),
            None => self.search_scope(site, self.ctx.root, &matcher),
        }
    }

    /// Ascend from `site` up to and including `scope`.
    fn search_scope(
        &self,
        site: NodeIndex,
        scope: NodeIndex,
        matcher: &ConditionMatcher<'_, '_>,
    ) -> Option<GuardMatch> {
        let arena = self.ctx.arena;
        let mut child = site;
        let mut current = self.ctx.parent(site);
        let mut iterations = 0;
        let mut block_scanned = false;

        while current.is_some() && iterations < MAX_TREE_WALK_ITERATIONS {
            iterations += 1;
            let node = arena.get(current)?;
            let found = |kind, guard| {
                Some(GuardMatch {
                    kind,
                    scope,
                    guard,
                })
            };

            if let Some(if_stmt) = arena.get_if_statement(node) {
                if child == if_stmt.then_statement && matcher.affirms(if_stmt.expression) {
                    return found(GuardKind::DirectIf, current);
                }
                if child == if_stmt.else_statement && matcher.denies(if_stmt.expression) {
                    return found(GuardKind::DirectIf, current);
                }
            } else if let Some(cond) = arena.get_conditional_expr(node) {
                if child == cond.when_true && matcher.affirms(cond.condition) {
                    return found(GuardKind::Conditional, current);
                }
                if child == cond.when_false && matcher.denies(cond.condition) {
                    return found(GuardKind::Conditional, current);
                }
            } else if let Some(binary) = arena.get_binary_expr(node) {
                if child == binary.right {
                    let op = binary.operator_token;
                    if op == SyntaxKind::AmpersandAmpersandToken as u16
                        && matcher.affirms(binary.left)
                    {
                        return found(GuardKind::Conditional, current);
                    }
                    if op == SyntaxKind::BarBarToken as u16 && matcher.denies(binary.left) {
                        return found(GuardKind::Conditional, current);
                    }
                }
            } else if !block_scanned
                && let Some(statements) = self.statement_list(current)
            {
                block_scanned = true;
                let position = statements.iter().position(|&s| s == child);
                if let Some(position) = position {
                    for &earlier in statements[..position].iter().rev() {
                        if self.is_early_exit_guard(earlier, matcher) {
                            return found(GuardKind::EarlyReturn, earlier);
                        }
                    }
                }
            }

            if current == scope {
                break;
            }
            child = current;
            current = self.ctx.parent(current);
        }
        trace!(site = site.0, "no condition guard in scope");
        None
    }

    fn statement_list(&self, index: NodeIndex) -> Option<&'a [NodeIndex]> {
        let arena = self.ctx.arena;
        let node = arena.get(index)?;
        if let Some(block) = arena.get_block(node) {
            return Some(block.statements.nodes.as_slice());
        }
        arena
            .get_source_file(node)
            .map(|sf| sf.statements.nodes.as_slice())
    }

    /// `if (<denies>) return;` or `if (<affirms>) {...} else return;`
    fn is_early_exit_guard(&self, statement: NodeIndex, matcher: &ConditionMatcher<'_, '_>) -> bool {
        let arena = self.ctx.arena;
        let Some(if_stmt) = arena.get(statement).and_then(|n| arena.get_if_statement(n)) else {
            return false;
        };
        (matcher.denies(if_stmt.expression) && self.exits(if_stmt.then_statement, 0))
            || (if_stmt.else_statement.is_some()
                && matcher.affirms(if_stmt.expression)
                && self.exits(if_stmt.else_statement, 0))
    }

    /// Does `statement` unconditionally leave the enclosing block?
    fn exits(&self, statement: NodeIndex, depth: u32) -> bool {
        if depth > MAX_TREE_WALK_ITERATIONS {
            return false;
        }
        let arena = self.ctx.arena;
        let Some(node) = arena.get(statement) else {
            return false;
        };
        match node.kind {
            k if k == syntax_kind_ext::RETURN_STATEMENT
                || k == syntax_kind_ext::THROW_STATEMENT
                || k == syntax_kind_ext::BREAK_STATEMENT
                || k == syntax_kind_ext::CONTINUE_STATEMENT =>
            {
                true
            }
            k if k == syntax_kind_ext::BLOCK => arena
                .get_block(node)
                .and_then(|block| block.statements.nodes.last().copied())
                .is_some_and(|last| self.exits(last, depth + 1)),
            k if k == syntax_kind_ext::IF_STATEMENT => arena.get_if_statement(node).is_some_and(|s| {
                s.else_statement.is_some()
                    && self.exits(s.then_statement, depth + 1)
                    && self.exits(s.else_statement, depth + 1)
            }),
            _ => false,
        }
    }

    /// Walk from a leaf toward the list slot that holds it, looking for a
    /// call to one of `wrappers` on the way.
    pub fn find_wrapper(&self, site: NodeIndex, wrappers: &[String]) -> Option<GuardMatch> {
        let arena = self.ctx.arena;
        let mut current = self.ctx.parent(site);
        let mut iterations = 0;

        while current.is_some() && iterations < MAX_TREE_WALK_ITERATIONS {
            iterations += 1;
            let node = arena.get(current)?;
            if node.is_function_like() || node.kind == syntax_kind_ext::ARRAY_LITERAL_EXPRESSION {
                break;
            }
            if let Some(call) = self.ctx.call_site(current)
                && wrappers.iter().any(|w| w == call.name)
            {
                return Some(GuardMatch {
                    kind: GuardKind::Wrapper,
                    scope: self.ctx.parent(current),
                    guard: current,
                });
            }
            current = self.ctx.parent(current);
        }
        None
    }
}
