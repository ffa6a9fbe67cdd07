//! Rule evaluator.
//!
//! Binds one rule declaration to one parsed file: walk the tree in document
//! order, match call sites against the operation matcher, check
//! applicability, ask the guard search, and report what is left.

use crate::condition::positive_condition_text;
use crate::context::{AnalysisContext, CallSite};
use crate::guard_search::{GuardSearch, subject_of};
use crate::rule::{Applicability, GuardSpec, ReceiverRequirement, RuleDeclaration};
use crate::suspension::has_suspension_before;
use guardlint_common::limits::{MAX_TRAVERSAL_NODES, MAX_TREE_WALK_ITERATIONS};
use guardlint_common::{Diagnostic, format_message};
use guardlint_parser::{NodeIndex, syntax_kind_ext};
use rustc_hash::FxHashSet;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, debug_span, error, trace};

/// Diagnostics of one rule over one file, in document order.
pub fn evaluate(ctx: &AnalysisContext<'_>, rule: &RuleDeclaration) -> Vec<Diagnostic> {
    let _span = debug_span!("evaluate", rule = %rule.id, file = ctx.file_name).entered();
    let search = GuardSearch::new(ctx);
    let mut seen: FxHashSet<u32> = FxHashSet::default();
    let mut diagnostics = Vec::new();

    for index in document_order(ctx) {
        let Some(site) = match_operation(ctx, rule, index) else {
            continue;
        };
        if let Some(guard) = search.find_guard(&site, &rule.guard) {
            trace!(site = index.0, kind = ?guard.kind, "guarded");
            continue;
        }
        let Some(node) = ctx.node(index) else {
            continue;
        };
        if !seen.insert(node.pos) {
            continue;
        }
        diagnostics.push(build_diagnostic(ctx, rule, &site, node.pos, node.width()));
    }

    debug!(count = diagnostics.len(), "rule evaluated");
    diagnostics
}

/// Diagnostics of every rule, sorted by (offset, rule id).
///
/// A rule that panics is logged and skipped; the others still run.
pub fn evaluate_all(ctx: &AnalysisContext<'_>, rules: &[RuleDeclaration]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for rule in rules {
        match catch_unwind(AssertUnwindSafe(|| evaluate(ctx, rule))) {
            Ok(found) => diagnostics.extend(found),
            Err(_) => {
                error!(rule = %rule.id, file = ctx.file_name, "rule panicked; skipping it");
            }
        }
    }
    diagnostics.sort_by(|a, b| (a.start, &a.rule_id).cmp(&(b.start, &b.rule_id)));
    diagnostics.dedup_by(|a, b| a.start == b.start && a.rule_id == b.rule_id);
    diagnostics
}

/// Does `index` match the rule's operation matcher, receiver requirement
/// and applicability?
pub fn match_operation<'a>(
    ctx: &AnalysisContext<'a>,
    rule: &RuleDeclaration,
    index: NodeIndex,
) -> Option<CallSite<'a>> {
    let site = ctx.call_site(index)?;
    let matcher = &rule.matcher;
    if !matcher.matches_name(site.name) {
        return None;
    }

    let receiver_ok = match &matcher.receiver {
        ReceiverRequirement::Any => true,
        ReceiverRequirement::This => site.receiver.is_none_or(|r| ctx.is_this(r)),
        ReceiverRequirement::Unqualified => site.receiver.is_none(),
        ReceiverRequirement::Typed { types } => {
            let resolved = site.receiver.and_then(|r| ctx.types.static_type_name(r));
            match resolved {
                Some(name) => types.iter().any(|t| t == name),
                None => {
                    trace!(operation = site.name, "receiver type unresolved; skipping");
                    false
                }
            }
        }
    };
    if !receiver_ok {
        return None;
    }

    is_applicable(ctx, &site, &matcher.applicability).then_some(site)
}

fn is_applicable(ctx: &AnalysisContext<'_>, site: &CallSite<'_>, applicability: &Applicability) -> bool {
    match applicability {
        Applicability::Always => true,
        Applicability::AsyncFunction => ctx
            .enclosing_function(site.node)
            .and_then(|f| ctx.node(f))
            .is_some_and(|f| f.is_async()),
        Applicability::AfterSuspension => follows_suspension(ctx, site.node),
        Applicability::ContainerSlot { containers, slot } => {
            container_slot(ctx, site.node, containers, slot).is_some()
        }
    }
}

/// A call runs after a suspension when it sits in a continuation callback,
/// or when an `await`/`yield` completes before it in its function. Plain
/// closures (`items.forEach((i) => ...)`) are looked through: the
/// suspension may precede the closure in the outer function.
fn follows_suspension(ctx: &AnalysisContext<'_>, site: NodeIndex) -> bool {
    let mut offset = ctx.node(site).map_or(0, |n| n.pos);
    let mut function = ctx.enclosing_function(site);
    let mut iterations = 0;

    while let Some(current) = function {
        iterations += 1;
        if iterations > MAX_TREE_WALK_ITERATIONS {
            return false;
        }
        if ctx.is_combinator_callback(current) {
            return true;
        }
        if has_suspension_before(ctx, current, offset) {
            return true;
        }
        let Some(node) = ctx.node(current) else {
            return false;
        };
        if !node.is_function_literal() {
            return false;
        }
        offset = node.pos;
        function = ctx.enclosing_function(current);
    }
    false
}

/// The container call whose `slot` list holds `leaf`, looking through
/// intermediate calls (`Padding({ child: leaf })`) but not through other
/// lists or functions.
pub fn container_slot(
    ctx: &AnalysisContext<'_>,
    leaf: NodeIndex,
    containers: &[String],
    slot: &str,
) -> Option<NodeIndex> {
    let arena = ctx.arena;
    let mut current = ctx.parent(leaf);
    let mut iterations = 0;

    while current.is_some() && iterations < MAX_TREE_WALK_ITERATIONS {
        iterations += 1;
        let node = arena.get(current)?;
        if node.is_function_like() {
            return None;
        }
        if node.kind == syntax_kind_ext::ARRAY_LITERAL_EXPRESSION {
            let property_index = ctx.parent(current);
            let property = arena.get(property_index)?;
            if property.kind != syntax_kind_ext::PROPERTY_ASSIGNMENT {
                return None;
            }
            let assignment = arena.get_property_assignment(property)?;
            if assignment.initializer != current
                || arena.identifier_text(assignment.name) != Some(slot)
            {
                return None;
            }
            let object = ctx.parent(property_index);
            let container = ctx.call_taking_argument(object)?;
            return containers
                .iter()
                .any(|c| c == container.name)
                .then_some(container.node);
        }
        current = ctx.parent(current);
    }
    None
}

fn build_diagnostic(
    ctx: &AnalysisContext<'_>,
    rule: &RuleDeclaration,
    site: &CallSite<'_>,
    start: u32,
    length: u32,
) -> Diagnostic {
    let guard_text = match &rule.guard {
        GuardSpec::Condition { predicates } => predicates
            .first()
            .map(|p| positive_condition_text(ctx, subject_of(site), p))
            .unwrap_or_default(),
        GuardSpec::Wrapper { preferred, .. } => preferred.clone(),
    };
    let args = [site.name, guard_text.as_str()];
    let mut diagnostic = Diagnostic::warning(
        ctx.file_name,
        start,
        length,
        rule.id.as_str(),
        format_message(&rule.message, &args),
    )
    .with_category(rule.category);
    if let Some(correction) = &rule.correction {
        diagnostic = diagnostic.with_correction(format_message(correction, &args));
    }
    diagnostic
}

/// Pre-order, left-to-right node sequence of the file.
fn document_order(ctx: &AnalysisContext<'_>) -> Vec<NodeIndex> {
    let mut order = Vec::new();
    let mut stack = vec![ctx.root];
    while let Some(index) = stack.pop() {
        if order.len() >= MAX_TRAVERSAL_NODES {
            trace!("document walk hit the traversal limit");
            break;
        }
        order.push(index);
        stack.extend(ctx.arena.children_of(index).into_iter().rev());
    }
    order
}
