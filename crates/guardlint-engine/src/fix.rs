//! Fix synthesis.
//!
//! Turns an unguarded call site into a text edit that inserts the missing
//! guard. The shape depends on where the call sits:
//! - expression statement: wrap it in `if (<guard>) { ... }`
//! - arrow expression body: `<guard> ? <call> : null`
//! - wrapper rules: `<Wrapper>(<leaf>)`
//!
//! Any other context gets no fix. Statement wraps are insertions around the
//! statement rather than a replacement of it, so a diagnosed call nested in
//! the statement keeps its own non-overlapping fix. A statement that is the
//! unbraced body of an `if`, `else` or loop is wrapped in braces as well, so
//! a following `else` keeps its binding.

use crate::condition::positive_condition_text;
use crate::context::{AnalysisContext, CallSite};
use crate::evaluator::match_operation;
use crate::guard_search::subject_of;
use crate::rule::{GuardSpec, RuleDeclaration};
use guardlint_common::{Diagnostic, format_message};
use guardlint_parser::{NodeIndex, syntax_kind_ext};
use serde::Serialize;
use tracing::trace;

/// Replace `length` bytes at `start` with `new_text`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub start: u32,
    pub length: u32,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(start: u32, length: u32, new_text: impl Into<String>) -> TextEdit {
        TextEdit {
            start,
            length,
            new_text: new_text.into(),
        }
    }

    pub const fn end(&self) -> u32 {
        self.start + self.length
    }
}

/// An advisory fix for one diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub rule_id: String,
    pub description: String,
    pub edits: Vec<TextEdit>,
}

/// Build the fix for `diagnostic`, if its context has a known shape.
pub fn synthesize(
    ctx: &AnalysisContext<'_>,
    rule: &RuleDeclaration,
    diagnostic: &Diagnostic,
) -> Option<Fix> {
    if diagnostic.rule_id != rule.id {
        return None;
    }
    let site = locate_site(ctx, rule, diagnostic)?;
    let source = ctx.source_text();

    let (edits, guard_text) = match &rule.guard {
        GuardSpec::Wrapper { preferred, .. } => {
            let node = ctx.node(site.node)?;
            let leaf = ctx.text_of(site.node)?;
            let edit = TextEdit::new(node.pos, node.width(), format!("{preferred}({leaf})"));
            (vec![edit], preferred.clone())
        }
        GuardSpec::Condition { predicates } => {
            let predicate = predicates.first()?;
            let condition = positive_condition_text(ctx, subject_of(&site), predicate);
            let edits = condition_edits(ctx, source, site.node, &condition)?;
            (edits, condition)
        }
    };

    let description = match &rule.correction {
        Some(template) => format_message(template, &[site.name, guard_text.as_str()]),
        None => format!("Guard '{}' with '{guard_text}'", site.name),
    };
    Some(Fix {
        rule_id: rule.id.clone(),
        description,
        edits,
    })
}

/// The call or `new` node a diagnostic was reported on.
fn locate_site<'a>(
    ctx: &AnalysisContext<'a>,
    rule: &RuleDeclaration,
    diagnostic: &Diagnostic,
) -> Option<CallSite<'a>> {
    let end = diagnostic.end();
    ctx.arena
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.pos == diagnostic.start && n.end == end)
        .find_map(|(i, _)| match_operation(ctx, rule, NodeIndex(i as u32)))
}

fn condition_edits(
    ctx: &AnalysisContext<'_>,
    source: &str,
    site: NodeIndex,
    condition: &str,
) -> Option<Vec<TextEdit>> {
    let arena = ctx.arena;

    // `await op()` is treated like `op()`.
    let mut expression = site;
    let mut parent = ctx.parent(site);
    if let Some(parent_node) = arena.get(parent)
        && parent_node.kind == syntax_kind_ext::AWAIT_EXPRESSION
    {
        expression = parent;
        parent = ctx.parent(parent);
    }
    let parent_node = arena.get(parent)?;

    if let Some(statement) = arena.get_expr_statement(parent_node)
        && statement.expression == expression
    {
        let braced = !arena
            .get(ctx.parent(parent))
            .is_some_and(|n| n.kind == syntax_kind_ext::BLOCK || n.kind == syntax_kind_ext::SOURCE_FILE);
        return wrap_statement(source, parent_node.pos, parent_node.end, condition, braced);
    }

    if parent_node.kind == syntax_kind_ext::ARROW_FUNCTION
        && arena.get_function(parent_node)?.body == expression
    {
        let node = arena.get(expression)?;
        let original = ctx.text_of(expression)?;
        return Some(vec![TextEdit::new(
            node.pos,
            node.width(),
            format!("{condition} ? {original} : null"),
        )]);
    }

    trace!(site = site.0, "no fix shape for this context");
    None
}

/// `if (<condition>) {` + the statement on its own indented line + `}`, or
/// the single-line form when the statement shares its line with other code.
/// `braced` adds an enclosing block for statements that are not in a
/// statement list.
fn wrap_statement(
    source: &str,
    start: u32,
    end: u32,
    condition: &str,
    braced: bool,
) -> Option<Vec<TextEdit>> {
    let (start_usize, end_usize) = (start as usize, end as usize);
    let statement = source.get(start_usize..end_usize)?;
    let line_start = source[..start_usize].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[end_usize..]
        .find('\n')
        .map_or(source.len(), |i| end_usize + i);
    let prefix = &source[line_start..start_usize];
    let suffix = &source[end_usize..line_end];

    if braced {
        return Some(vec![
            TextEdit::new(start, 0, format!("{{ if ({condition}) {{ ")),
            TextEdit::new(end, 0, " } }"),
        ]);
    }
    if !prefix.trim().is_empty() || !suffix.trim().is_empty() {
        return Some(vec![
            TextEdit::new(start, 0, format!("if ({condition}) {{ ")),
            TextEdit::new(end, 0, " }"),
        ]);
    }

    let unit = indent_unit(source, prefix);
    let mut edits = vec![TextEdit::new(
        start,
        0,
        format!("if ({condition}) {{\n{prefix}{unit}"),
    )];
    edits.extend(
        statement
            .match_indices('\n')
            .map(|(i, _)| TextEdit::new(start + i as u32 + 1, 0, unit.clone())),
    );
    edits.push(TextEdit::new(end, 0, format!("\n{prefix}}}")));
    Some(edits)
}

/// One level of indentation: a tab if the line uses tabs, otherwise the
/// smallest space indentation used in the file (two spaces if none).
fn indent_unit(source: &str, line_indent: &str) -> String {
    if line_indent.contains('\t') {
        return "\t".to_string();
    }
    let smallest = source
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .filter(|&width| width > 0)
        .min()
        .unwrap_or(2);
    " ".repeat(smallest)
}

/// Result of applying a batch of edits to one text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedEdits {
    pub text: String,
    pub applied: usize,
    pub skipped: usize,
}

/// Apply `edits` in offset order. An edit overlapping one already applied,
/// or reaching past the end of the text, is skipped.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> AppliedEdits {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.start, e.length));

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0usize;
    let (mut applied, mut skipped) = (0, 0);
    for edit in sorted {
        let (start, end) = (edit.start as usize, edit.end() as usize);
        if start < cursor
            || end > text.len()
            || !text.is_char_boundary(start)
            || !text.is_char_boundary(end)
        {
            skipped += 1;
            continue;
        }
        output.push_str(&text[cursor..start]);
        output.push_str(&edit.new_text);
        cursor = end;
        applied += 1;
    }
    output.push_str(&text[cursor..]);
    AppliedEdits {
        text: output,
        applied,
        skipped,
    }
}

/// Apply whole fixes in the given order. A fix with an edit overlapping an
/// edit of a fix already accepted is skipped entirely; `applied` and
/// `skipped` count fixes.
pub fn apply_fixes<'f>(text: &str, fixes: impl IntoIterator<Item = &'f Fix>) -> AppliedEdits {
    let mut accepted: Vec<TextEdit> = Vec::new();
    let (mut applied, mut skipped) = (0, 0);
    for fix in fixes {
        let conflicts = fix.edits.iter().any(|edit| {
            edit.end() as usize > text.len()
                || accepted
                    .iter()
                    .any(|other| edit.start < other.end() && other.start < edit.end())
        });
        if conflicts {
            trace!(rule = %fix.rule_id, "fix overlaps an accepted fix");
            skipped += 1;
            continue;
        }
        accepted.extend(fix.edits.iter().cloned());
        applied += 1;
    }
    AppliedEdits {
        text: apply_edits(text, &accepted).text,
        applied,
        skipped,
    }
}
