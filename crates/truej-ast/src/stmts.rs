//! AST representations for statements.

use crate::AstNode;
use crate::Declarator;
use crate::Expr;
use crate::SyntaxKind;
use crate::SyntaxNode;
use crate::Type;
use crate::support;

/// Represents a statement appearing in a block.
///
/// A local declaration is also a block statement; the distinction between
/// declarations and "true" statements is made where it matters (e.g. in
/// the bottom-up block scan of the proof pass).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Statement {
    /// The statement is a nested block.
    Block(Block),
    /// The statement is a local declaration.
    LocalDeclaration(LocalDeclaration),
    /// The statement is an assignment statement.
    Assignment(Assignment),
    /// The statement is an `if` statement.
    If(IfStatement),
    /// The statement is a `while` statement.
    While(WhileStatement),
    /// The statement is a `return` statement.
    Return(ReturnStatement),
    /// The statement is a `means` statement.
    Means(MeansStatement),
    /// The statement is an empty statement.
    Empty(EmptyStatement),
}

impl AstNode for Statement {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::BlockNode
                | SyntaxKind::LocalDeclarationNode
                | SyntaxKind::AssignmentNode
                | SyntaxKind::IfStatementNode
                | SyntaxKind::WhileStatementNode
                | SyntaxKind::ReturnStatementNode
                | SyntaxKind::MeansStatementNode
                | SyntaxKind::EmptyStatementNode
        )
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::BlockNode => Some(Self::Block(Block(syntax))),
            SyntaxKind::LocalDeclarationNode => {
                Some(Self::LocalDeclaration(LocalDeclaration(syntax)))
            }
            SyntaxKind::AssignmentNode => Some(Self::Assignment(Assignment(syntax))),
            SyntaxKind::IfStatementNode => Some(Self::If(IfStatement(syntax))),
            SyntaxKind::WhileStatementNode => Some(Self::While(WhileStatement(syntax))),
            SyntaxKind::ReturnStatementNode => Some(Self::Return(ReturnStatement(syntax))),
            SyntaxKind::MeansStatementNode => Some(Self::Means(MeansStatement(syntax))),
            SyntaxKind::EmptyStatementNode => Some(Self::Empty(EmptyStatement(syntax))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Block(s) => s.syntax(),
            Self::LocalDeclaration(s) => s.syntax(),
            Self::Assignment(s) => s.syntax(),
            Self::If(s) => s.syntax(),
            Self::While(s) => s.syntax(),
            Self::Return(s) => s.syntax(),
            Self::Means(s) => s.syntax(),
            Self::Empty(s) => s.syntax(),
        }
    }
}

/// Represents a block of statements.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block(pub(crate) SyntaxNode);

impl Block {
    /// Gets the statements of the block, in source order.
    pub fn statements(&self) -> impl Iterator<Item = Statement> + use<> {
        support::children(&self.0)
    }
}

impl AstNode for Block {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::BlockNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::BlockNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a local declaration statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocalDeclaration(SyntaxNode);

impl LocalDeclaration {
    /// Gets the declared type of the local declaration.
    pub fn ty(&self) -> Type {
        support::child(&self.0).expect("local declaration should have a type")
    }

    /// Gets the declarators of the local declaration.
    pub fn declarators(&self) -> impl Iterator<Item = Declarator> + use<> {
        support::children(&self.0)
    }
}

impl AstNode for LocalDeclaration {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::LocalDeclarationNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::LocalDeclarationNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents an assignment statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Assignment(SyntaxNode);

impl Assignment {
    /// Gets the target of the assignment.
    pub fn target(&self) -> Expr {
        support::children(&self.0)
            .next()
            .expect("assignment should have a target")
    }

    /// Gets the assigned value expression.
    pub fn value(&self) -> Expr {
        support::children(&self.0)
            .nth(1)
            .expect("assignment should have a value")
    }
}

impl AstNode for Assignment {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::AssignmentNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::AssignmentNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents an `if` statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IfStatement(SyntaxNode);

impl IfStatement {
    /// Gets the condition expression of the `if` statement.
    pub fn condition(&self) -> Expr {
        support::child(&self.0).expect("`if` statement should have a condition")
    }

    /// Gets the then-branch statement of the `if` statement.
    pub fn then_branch(&self) -> Statement {
        support::children(&self.0)
            .next()
            .expect("`if` statement should have a then-branch")
    }

    /// Gets the else-branch statement of the `if` statement, if present.
    pub fn else_branch(&self) -> Option<Statement> {
        support::children(&self.0).nth(1)
    }
}

impl AstNode for IfStatement {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::IfStatementNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::IfStatementNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a `while` statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WhileStatement(SyntaxNode);

impl WhileStatement {
    /// Gets the condition expression of the `while` statement.
    pub fn condition(&self) -> Expr {
        support::child(&self.0).expect("`while` statement should have a condition")
    }

    /// Gets the body statement of the `while` statement.
    pub fn body(&self) -> Statement {
        support::children(&self.0)
            .next()
            .expect("`while` statement should have a body")
    }
}

impl AstNode for WhileStatement {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::WhileStatementNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::WhileStatementNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a `return` statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReturnStatement(SyntaxNode);

impl ReturnStatement {
    /// Gets the returned expression, if present.
    pub fn value(&self) -> Option<Expr> {
        support::child(&self.0)
    }
}

impl AstNode for ReturnStatement {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::ReturnStatementNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::ReturnStatementNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a `means` statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MeansStatement(SyntaxNode);

impl MeansStatement {
    /// Gets the asserted predicate expression of the `means` statement.
    pub fn predicate(&self) -> Expr {
        support::child(&self.0).expect("`means` statement should have a predicate")
    }
}

impl AstNode for MeansStatement {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::MeansStatementNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::MeansStatementNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents an empty statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmptyStatement(SyntaxNode);

impl AstNode for EmptyStatement {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::EmptyStatementNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::EmptyStatementNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}
