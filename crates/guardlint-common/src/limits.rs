//! Centralized limits and thresholds for guardlint.
//!
//! Every upward or downward tree walk in the parser and the engine is bounded
//! by one of these constants so that malformed or adversarial input can never
//! hang an analysis pass. When a limit is hit the walk gives up and the caller
//! treats the result as "unknown", which the engine maps to "no guard found".

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum recursion depth of the recursive-descent parser.
///
/// Each nested expression or statement adds a frame. Past this depth the
/// parser reports a diagnostic and produces a missing node instead of
/// recursing further.
///
/// ```typescript
/// // Deeply nested parenthesized expressions:
/// const x = ((((((((((((((((((((((((((((((1)))))))))))))))))))))))))))))));
/// ```
pub const MAX_PARSER_RECURSION_DEPTH: u32 = 1_000;

/// Maximum depth when rendering or comparing reference chains
/// (`a.b.c.d ...`) in the condition matcher.
pub const MAX_REFERENCE_CHAIN_DEPTH: u32 = 256;

// =============================================================================
// Operation Count Limits
// =============================================================================

/// Maximum iterations for parent-pointer walks.
///
/// Ancestor walks follow `ExtendedNodeInfo::parent` links. A well-formed
/// arena never has cycles, but the bound keeps a corrupted tree from looping.
pub const MAX_TREE_WALK_ITERATIONS: u32 = 10_000;

/// Maximum number of nodes visited by one document-order traversal.
pub const MAX_TRAVERSAL_NODES: usize = 5_000_000;
