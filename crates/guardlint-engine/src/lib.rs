//! Guard-verification engine.
//!
//! Finds call sites that are only safe under a runtime condition and checks,
//! from the surrounding syntax alone, whether that condition is established:
//! - `rule` - rule declarations as serde data
//! - `context` - per-file analysis context and the `TypeOracle` seam
//! - `condition` - structural matcher for guard conditions
//! - `suspension` - `await`/`yield` points of a function body
//! - `guard_search` - ancestor-chain guard recognition
//! - `evaluator` - `evaluate` / `evaluate_all`
//! - `fix` - fix synthesis and edit application
//! - `builtin_rules` - the default rule catalogue
//!
//! The engine borrows a parsed tree for one pass and keeps no state between
//! passes; files can be analyzed concurrently.

pub mod builtin_rules;
pub mod condition;
pub mod context;
pub mod evaluator;
pub mod fix;
pub mod guard_search;
pub mod rule;
pub mod suspension;

pub use builtin_rules::builtin_rules;
pub use condition::{ConditionMatcher, Form, Subject};
pub use context::{AnalysisContext, CallSite, NoTypeInfo, TypeOracle};
pub use evaluator::{evaluate, evaluate_all};
pub use fix::{AppliedEdits, Fix, TextEdit, apply_edits, apply_fixes, synthesize};
pub use guard_search::{GuardKind, GuardMatch, GuardSearch};
pub use rule::{
    Applicability, GuardSpec, OperationMatcher, Predicate, ReceiverRequirement, RuleDeclaration,
};
pub use suspension::suspension_points;
