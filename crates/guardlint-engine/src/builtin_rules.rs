//! Built-in rule catalogue.
//!
//! Every rule here is an ordinary [`RuleDeclaration`]; a `guardlint.json`
//! file can declare more of the same shape.

use crate::rule::{
    Applicability, GuardSpec, OperationMatcher, Predicate, ReceiverRequirement, RuleDeclaration,
};
use guardlint_common::DiagnosticCategory;

pub const EMIT_AFTER_AWAIT: &str = "emit-after-await";
pub const ADD_TO_CLOSED_CONTROLLER: &str = "add-to-closed-controller";
pub const SET_STATE_AFTER_AWAIT: &str = "set-state-after-await";
pub const UNCONSTRAINED_TEXT_IN_ROW: &str = "unconstrained-text-in-row";

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

pub fn emit_after_await() -> RuleDeclaration {
    RuleDeclaration {
        id: EMIT_AFTER_AWAIT.to_string(),
        description: "Emitting state after an asynchronous gap may hit a closed bloc.".to_string(),
        message: "'{0}' may run after the bloc is closed; check '{1}' first.".to_string(),
        correction: Some("Wrap the call in 'if ({1})'.".to_string()),
        category: DiagnosticCategory::Warning,
        matcher: OperationMatcher {
            operations: names(&["emit"]),
            receiver: ReceiverRequirement::This,
            applicability: Applicability::AfterSuspension,
        },
        guard: GuardSpec::Condition {
            predicates: vec![Predicate::new("isClosed", false)],
        },
    }
}

pub fn add_to_closed_controller() -> RuleDeclaration {
    RuleDeclaration {
        id: ADD_TO_CLOSED_CONTROLLER.to_string(),
        description: "Adding to a stream controller or sink that may be closed throws.".to_string(),
        message: "'{0}' on a controller that may be closed; check '{1}' first.".to_string(),
        correction: Some("Wrap the call in 'if ({1})'.".to_string()),
        category: DiagnosticCategory::Warning,
        matcher: OperationMatcher {
            operations: names(&["add", "addError", "close"]),
            receiver: ReceiverRequirement::Typed {
                types: names(&["StreamController", "Sink", "EventSink", "StreamSink"]),
            },
            applicability: Applicability::Always,
        },
        guard: GuardSpec::Condition {
            predicates: vec![Predicate::new("isClosed", false), Predicate::new("isOpen", true)],
        },
    }
}

pub fn set_state_after_await() -> RuleDeclaration {
    RuleDeclaration {
        id: SET_STATE_AFTER_AWAIT.to_string(),
        description: "Calling setState after an asynchronous gap may hit an unmounted widget."
            .to_string(),
        message: "'{0}' may run after the widget is unmounted; check '{1}' first.".to_string(),
        correction: Some("Wrap the call in 'if ({1})'.".to_string()),
        category: DiagnosticCategory::Warning,
        matcher: OperationMatcher {
            operations: names(&["setState"]),
            receiver: ReceiverRequirement::This,
            applicability: Applicability::AfterSuspension,
        },
        guard: GuardSpec::Condition {
            predicates: vec![Predicate::new("mounted", true)],
        },
    }
}

pub fn unconstrained_text_in_row() -> RuleDeclaration {
    RuleDeclaration {
        id: UNCONSTRAINED_TEXT_IN_ROW.to_string(),
        description: "Text placed directly in a Row can overflow its width.".to_string(),
        message: "'{0}' in a Row has no width constraint; wrap it in '{1}'.".to_string(),
        correction: Some("Wrap with '{1}'.".to_string()),
        category: DiagnosticCategory::Warning,
        matcher: OperationMatcher {
            operations: names(&["Text", "RichText"]),
            receiver: ReceiverRequirement::Unqualified,
            applicability: Applicability::ContainerSlot {
                containers: names(&["Row"]),
                slot: "children".to_string(),
            },
        },
        guard: GuardSpec::Wrapper {
            wrappers: names(&["Expanded", "Flexible"]),
            preferred: "Expanded".to_string(),
        },
    }
}

/// All built-in rules, in a stable order.
pub fn builtin_rules() -> Vec<RuleDeclaration> {
    vec![
        emit_after_await(),
        add_to_closed_controller(),
        set_state_after_await(),
        unconstrained_text_in_row(),
    ]
}
