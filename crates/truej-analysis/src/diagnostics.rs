//! Creation of diagnostics reported by the analysis passes.

use truej_grammar::Diagnostic;
use truej_grammar::Span;

/// The component name attached to proof-related diagnostics.
const PROVER_COMPONENT: &str = "Prover";

/// The component name attached to definedness diagnostics.
const DEFINEDNESS_COMPONENT: &str = "Definedness";

/// Creates an "unsupported proof" diagnostic.
///
/// The statement is the original source form of the smallest failing
/// conjunct.
pub fn unsupported_proof(statement: &str, span: Span) -> Diagnostic {
    Diagnostic::error(format!(
        "The code does not support the proof of the statement: {statement}"
    ))
    .with_component(PROVER_COMPONENT)
    .with_highlight(span)
}

/// Creates a "prover reached an internal limit" diagnostic.
pub fn prover_limit(statement: &str, span: Span) -> Diagnostic {
    Diagnostic::error(format!(
        "The prover reached an internal limit. Consider adding a lemma to help prove the \
         statement: \n    {statement}"
    ))
    .with_component(PROVER_COMPONENT)
    .with_highlight(span)
}

/// Creates a "value name not defined on a branch" diagnostic.
///
/// The branch is `then` or `else`, naming the branch of the `if`
/// statement on which the value name is not defined.
pub fn undefined_on_branch(name: &str, branch: &str, span: Span) -> Diagnostic {
    Diagnostic::error(format!(
        "value name {name} is not defined for the {branch}-branch of the if statement"
    ))
    .with_component(DEFINEDNESS_COMPONENT)
    .with_highlight(span)
}

/// Creates an "unknown value name" diagnostic.
pub fn unknown_value_name(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(format!("value name {name} is not declared"))
        .with_component(DEFINEDNESS_COMPONENT)
        .with_highlight(span)
}
