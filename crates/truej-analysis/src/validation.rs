//! Validation of branch definitions for value names.
//!
//! A post-decorated value name assigned on only one branch of an `if`
//! statement has no defined final value on the other branch; a later
//! reference to that value name is refused here, before the proof pass
//! runs. Methods with branch-definition errors are not submitted to the
//! prover.

use std::collections::HashSet;

use truej_ast::AstNode;
use truej_ast::Assignment;
use truej_ast::Document;
use truej_ast::Expr;
use truej_ast::IfStatement;
use truej_ast::MethodDefinition;
use truej_ast::Statement;
use truej_ast::VisitReason;
use truej_ast::Visitor;
use truej_ast::visitor;
use truej_grammar::Diagnostic;
use truej_grammar::Span;
use truej_grammar::SyntaxKind;
use truej_grammar::SyntaxNode;

use crate::diagnostics;
use crate::names;

/// The outcome of branch-definition validation.
#[derive(Debug, Default)]
pub struct ValidationOutcome {
    /// The diagnostics produced by validation.
    pub diagnostics: Vec<Diagnostic>,
    /// The method nodes that failed validation.
    pub failed_methods: HashSet<SyntaxNode>,
}

/// Checks the branch definitions of every method in the document.
pub fn check(document: &Document) -> ValidationOutcome {
    let mut visitor = BranchDefinitions::default();
    visitor::visit(document, &mut visitor);
    visitor.outcome
}

/// The visitor implementing the branch-definition check.
#[derive(Default)]
struct BranchDefinitions {
    /// The stack of methods being visited.
    methods: Vec<MethodDefinition>,
    /// The accumulated outcome.
    outcome: ValidationOutcome,
}

impl Visitor for BranchDefinitions {
    fn method_definition(&mut self, reason: VisitReason, definition: &MethodDefinition) {
        match reason {
            VisitReason::Enter => self.methods.push(definition.clone()),
            VisitReason::Exit => {
                self.methods.pop();
            }
        }
    }

    fn statement(&mut self, reason: VisitReason, statement: &Statement) {
        if reason != VisitReason::Enter {
            return;
        }

        if let Statement::If(statement) = statement {
            self.check_if(statement);
        }
    }
}

impl BranchDefinitions {
    /// Checks a single `if` statement for one-branch definitions that
    /// are referenced afterwards.
    fn check_if(&mut self, statement: &IfStatement) {
        let Some(method) = self.methods.last() else {
            return;
        };

        let then_defined = defined_names(&statement.then_branch());
        let else_defined = statement
            .else_branch()
            .map(|branch| defined_names(&branch))
            .unwrap_or_default();

        let end = statement.span().end();
        let mut missing: Vec<(String, &str)> = Vec::new();
        for name in then_defined.difference(&else_defined) {
            missing.push((name.clone(), "else"));
        }
        for name in else_defined.difference(&then_defined) {
            missing.push((name.clone(), "then"));
        }
        missing.sort();

        for (name, branch) in missing {
            if let Some(span) = reference_after(method, end, &name) {
                self.outcome
                    .diagnostics
                    .push(diagnostics::undefined_on_branch(
                        &format!("{name}'"),
                        branch,
                        span,
                    ));
                self.outcome
                    .failed_methods
                    .insert(method.syntax().clone());
            }
        }
    }
}

/// Collects the base names whose final value is definitely assigned by
/// the given statement.
fn defined_names(statement: &Statement) -> HashSet<String> {
    match statement {
        Statement::Assignment(assignment) => target_name(assignment).into_iter().collect(),
        Statement::Block(block) => {
            let mut defined = HashSet::new();
            let mut local = HashSet::new();
            for statement in block.statements() {
                if let Statement::LocalDeclaration(decl) = &statement {
                    for declarator in decl.declarators() {
                        let token = declarator.name();
                        local.insert(names::base_name(token.text()).to_string());
                    }
                }

                defined.extend(defined_names(&statement));
            }

            // Names declared in the block are not visible after it.
            defined.retain(|name| !local.contains(name));
            defined
        }
        Statement::LocalDeclaration(decl) => decl
            .declarators()
            .filter(|declarator| declarator.initializer().is_some())
            .map(|declarator| names::base_name(declarator.name().text()).to_string())
            .collect(),
        Statement::If(statement) => match statement.else_branch() {
            Some(else_branch) => {
                let then_defined = defined_names(&statement.then_branch());
                let else_defined = defined_names(&else_branch);
                then_defined
                    .intersection(&else_defined)
                    .cloned()
                    .collect()
            }
            None => HashSet::new(),
        },
        // A `while` body may not run at all.
        Statement::While(_)
        | Statement::Return(_)
        | Statement::Means(_)
        | Statement::Empty(_) => HashSet::new(),
    }
}

/// Gets the base name assigned by an assignment, if its target is a
/// post- or mid-decorated value name.
fn target_name(assignment: &Assignment) -> Option<String> {
    let token = match assignment.target() {
        Expr::Name(name) => name.token(),
        Expr::Access(access) => access.member().token(),
        _ => return None,
    };

    match token.kind() {
        SyntaxKind::PostValueName | SyntaxKind::MidValueName => {
            Some(names::base_name(token.text()).to_string())
        }
        _ => None,
    }
}

/// Finds a reference to the final value of the given base name after the
/// given source offset within the method.
///
/// Assignment targets and declarator names are definitions, not
/// references, and are skipped.
fn reference_after(method: &MethodDefinition, offset: usize, base: &str) -> Option<Span> {
    for node in method.syntax().descendants() {
        if node.kind() != SyntaxKind::NameRefNode {
            continue;
        }

        let span: Span = node.text_range().into();
        if span.start() < offset {
            continue;
        }

        let token = match node.first_token() {
            Some(token)
                if matches!(
                    token.kind(),
                    SyntaxKind::PostValueName | SyntaxKind::MidValueName
                ) =>
            {
                token
            }
            _ => continue,
        };

        if names::base_name(token.text()) != base {
            continue;
        }

        if is_assignment_target(&node) {
            continue;
        }

        return Some(span);
    }

    None
}

/// Determines if the given name reference node is the target of an
/// assignment statement.
fn is_assignment_target(node: &SyntaxNode) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };

    match parent.kind() {
        SyntaxKind::AssignmentNode => Assignment::cast(parent)
            .map(|assignment| assignment.target().syntax() == node)
            .unwrap_or(false),
        // The member of `this.x' = e;`.
        SyntaxKind::AccessExprNode => is_assignment_target(&parent),
        _ => false,
    }
}
