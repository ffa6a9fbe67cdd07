//! Rule declarations.
//!
//! A rule is plain data: which calls it looks at (`OperationMatcher`), what
//! protects them (`GuardSpec`), and how the resulting diagnostic reads. One
//! generic evaluator interprets every declaration, so domain catalogues and
//! `guardlint.json` files describe rules in the same serde shape.
//!
//! Message and correction templates take two placeholders: `{0}` is the
//! operation name, `{1}` the positive guard condition as it would be written
//! at the call site (`!this.isClosed`).

use guardlint_common::DiagnosticCategory;
use serde::{Deserialize, Serialize};

/// A complete rule declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDeclaration {
    /// Stable identifier, e.g. `emit-after-await`.
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<String>,
    #[serde(default = "default_category")]
    pub category: DiagnosticCategory,
    pub matcher: OperationMatcher,
    pub guard: GuardSpec,
}

const fn default_category() -> DiagnosticCategory {
    DiagnosticCategory::Warning
}

/// Which call or `new` expressions a rule inspects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationMatcher {
    /// Callee names (the last name of the callee expression).
    pub operations: Vec<String>,
    #[serde(default)]
    pub receiver: ReceiverRequirement,
    #[serde(default)]
    pub applicability: Applicability,
}

impl OperationMatcher {
    pub fn matches_name(&self, name: &str) -> bool {
        self.operations.iter().any(|op| op == name)
    }
}

/// Constraint on the receiver of a matched call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReceiverRequirement {
    /// Any receiver, explicit or implicit.
    #[default]
    Any,
    /// `op()` or `this.op()`.
    This,
    /// Explicit receiver whose static type head name is one of `types`.
    Typed { types: Vec<String> },
    /// No receiver: a bare call or a constructor (`Text('a')`, `new Text('a')`).
    Unqualified,
}

/// Context in which a matched call is considered risky at all.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Applicability {
    #[default]
    Always,
    /// Inside an `async` function.
    AsyncFunction,
    /// After an `await`/`yield` earlier in the same function, or inside a
    /// continuation callback.
    AfterSuspension,
    /// Directly inside the `slot` list of a call to one of `containers`
    /// (`Row({ children: [<here>] })`).
    ContainerSlot {
        containers: Vec<String>,
        slot: String,
    },
}

/// What makes a matched call safe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GuardSpec {
    /// A boolean test on the call's receiver. The first predicate is the
    /// one a fix writes.
    Condition { predicates: Vec<Predicate> },
    /// The call must be nested inside a call to one of `wrappers`.
    Wrapper {
        wrappers: Vec<String>,
        preferred: String,
    },
}

/// A property or zero-argument method on the subject, with the value that
/// means "safe". `isClosed` is safe when `false`, `mounted` when `true`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Predicate {
    pub name: String,
    pub safe_when: bool,
}

impl Predicate {
    pub fn new(name: impl Into<String>, safe_when: bool) -> Predicate {
        Predicate {
            name: name.into(),
            safe_when,
        }
    }
}

impl RuleDeclaration {
    /// Parse a list of declarations from JSON.
    pub fn list_from_json(text: &str) -> serde_json::Result<Vec<RuleDeclaration>> {
        serde_json::from_str(text)
    }
}
