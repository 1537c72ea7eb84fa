//! Implementation for AST visitation.
//!
//! An AST visitor is called back for each node encountered during a
//! depth-first traversal of a [`Document`]; callbacks correspond to
//! syntactic categories rather than to individual [`SyntaxKind`]s, which
//! keeps visitors small for passes that only care about a few constructs.
//!
//! Each visited node receives a [`VisitReason::Enter`] call and a
//! matching [`VisitReason::Exit`] call.

use rowan::WalkEvent;

use crate::AstNode;
use crate::ClassDefinition;
use crate::Document;
use crate::Expr;
use crate::FieldDeclaration;
use crate::MethodDefinition;
use crate::Statement;
use crate::SyntaxKind;

/// The reason a visitor callback is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitReason {
    /// The visit has entered the node.
    Enter,
    /// The visit has exited the node.
    Exit,
}

/// A trait used to implement an AST visitor.
#[allow(unused_variables)]
pub trait Visitor {
    /// Visits the root document node.
    fn document(&mut self, reason: VisitReason, document: &Document) {}

    /// Visits a class definition node.
    fn class_definition(&mut self, reason: VisitReason, definition: &ClassDefinition) {}

    /// Visits a field declaration node.
    fn field_declaration(&mut self, reason: VisitReason, declaration: &FieldDeclaration) {}

    /// Visits a method definition node.
    fn method_definition(&mut self, reason: VisitReason, definition: &MethodDefinition) {}

    /// Visits a statement node.
    fn statement(&mut self, reason: VisitReason, statement: &Statement) {}

    /// Visits an expression node.
    fn expr(&mut self, reason: VisitReason, expr: &Expr) {}
}

/// Visits the given document with the given visitor.
pub fn visit<V: Visitor>(document: &Document, visitor: &mut V) {
    for event in document.syntax().preorder() {
        let (reason, node) = match event {
            WalkEvent::Enter(node) => (VisitReason::Enter, node),
            WalkEvent::Leave(node) => (VisitReason::Exit, node),
        };

        match node.kind() {
            SyntaxKind::RootNode => {
                let document = Document::cast(node).expect("root node should cast");
                visitor.document(reason, &document);
            }
            SyntaxKind::ClassDefinitionNode => {
                let definition = ClassDefinition::cast(node).expect("class node should cast");
                visitor.class_definition(reason, &definition);
            }
            SyntaxKind::FieldDeclarationNode => {
                let declaration = FieldDeclaration::cast(node).expect("field node should cast");
                visitor.field_declaration(reason, &declaration);
            }
            SyntaxKind::MethodDefinitionNode => {
                let definition = MethodDefinition::cast(node).expect("method node should cast");
                visitor.method_definition(reason, &definition);
            }
            kind if Statement::can_cast(kind) => {
                let statement = Statement::cast(node).expect("statement node should cast");
                visitor.statement(reason, &statement);
            }
            kind if Expr::can_cast(kind) => {
                let expr = Expr::cast(node).expect("expression node should cast");
                visitor.expr(reason, &expr);
            }
            _ => {}
        }
    }
}
