//! Suspension-point scanner.
//!
//! Collects the `await` and `yield` expressions of one function body in
//! document order. Nested function literals, methods and classes have their
//! own suspension scope and are not entered.

use crate::context::AnalysisContext;
use guardlint_common::limits::MAX_TRAVERSAL_NODES;
use guardlint_parser::parser::node::Node;
use guardlint_parser::{NodeIndex, syntax_kind_ext};
use tracing::trace;

/// Start offsets of every suspension operator under `body`.
pub fn suspension_points(ctx: &AnalysisContext<'_>, body: NodeIndex) -> Vec<u32> {
    suspension_nodes(ctx, body)
        .into_iter()
        .map(|node| node.pos)
        .collect()
}

/// Does a suspension in `function`'s own body complete before `offset`?
///
/// `await riskyOp()` does not count for `riskyOp()` itself: the call runs
/// before the suspension it feeds.
pub fn has_suspension_before(ctx: &AnalysisContext<'_>, function: NodeIndex, offset: u32) -> bool {
    let Some(body) = ctx.function_body(function) else {
        return false;
    };
    suspension_nodes(ctx, body)
        .iter()
        .any(|node| node.end <= offset)
}

fn suspension_nodes<'a>(ctx: &AnalysisContext<'a>, body: NodeIndex) -> Vec<&'a Node> {
    let arena = ctx.arena;
    let mut found = Vec::new();
    let mut stack = vec![body];
    let mut visited = 0usize;

    while let Some(index) = stack.pop() {
        visited += 1;
        if visited > MAX_TRAVERSAL_NODES {
            trace!(visited, "suspension scan hit the traversal limit");
            break;
        }
        let Some(node) = arena.get(index) else {
            continue;
        };
        if index != body
            && (node.is_function_like() || node.kind == syntax_kind_ext::CLASS_DECLARATION)
        {
            continue;
        }
        if node.kind == syntax_kind_ext::AWAIT_EXPRESSION
            || node.kind == syntax_kind_ext::YIELD_EXPRESSION
        {
            found.push(node);
        }
        stack.extend(arena.children_of(index).into_iter().rev());
    }
    found
}
