//! AST representations for expressions.

use crate::AstNode;
use crate::SyntaxKind;
use crate::SyntaxNode;
use crate::SyntaxToken;
use crate::Type;
use crate::decls::is_name_token;
use crate::support;

/// Represents an expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// The expression is a literal.
    Literal(LiteralExpr),
    /// The expression is a name reference.
    Name(NameRef),
    /// The expression is a `this` reference.
    This(ThisRef),
    /// The expression is a parenthesized expression.
    Parenthesized(ParenthesizedExpr),
    /// The expression is a conditional (`? :`) expression.
    Conditional(ConditionalExpr),
    /// The expression is an `instanceof` expression.
    Instanceof(InstanceofExpr),
    /// The expression is a logical not expression.
    LogicalNot(LogicalNotExpr),
    /// The expression is an arithmetic negation expression.
    Negation(NegationExpr),
    /// The expression is a binary operation.
    Binary(BinaryExpr),
    /// The expression is a call expression.
    Call(CallExpr),
    /// The expression is an index expression.
    Index(IndexExpr),
    /// The expression is an access expression.
    Access(AccessExpr),
}

impl AstNode for Expr {
    fn can_cast(kind: SyntaxKind) -> bool {
        LiteralExpr::can_cast(kind)
            || BinaryExpr::can_cast(kind)
            || matches!(
                kind,
                SyntaxKind::NameRefNode
                    | SyntaxKind::ThisRefNode
                    | SyntaxKind::ParenthesizedExprNode
                    | SyntaxKind::ConditionalExprNode
                    | SyntaxKind::InstanceofExprNode
                    | SyntaxKind::LogicalNotExprNode
                    | SyntaxKind::NegationExprNode
                    | SyntaxKind::CallExprNode
                    | SyntaxKind::IndexExprNode
                    | SyntaxKind::AccessExprNode
            )
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if LiteralExpr::can_cast(syntax.kind()) {
            return Some(Self::Literal(
                LiteralExpr::cast(syntax).expect("literal expr should cast"),
            ));
        }

        if BinaryExpr::can_cast(syntax.kind()) {
            return Some(Self::Binary(
                BinaryExpr::cast(syntax).expect("binary expr should cast"),
            ));
        }

        match syntax.kind() {
            SyntaxKind::NameRefNode => Some(Self::Name(NameRef(syntax))),
            SyntaxKind::ThisRefNode => Some(Self::This(ThisRef(syntax))),
            SyntaxKind::ParenthesizedExprNode => {
                Some(Self::Parenthesized(ParenthesizedExpr(syntax)))
            }
            SyntaxKind::ConditionalExprNode => Some(Self::Conditional(ConditionalExpr(syntax))),
            SyntaxKind::InstanceofExprNode => Some(Self::Instanceof(InstanceofExpr(syntax))),
            SyntaxKind::LogicalNotExprNode => Some(Self::LogicalNot(LogicalNotExpr(syntax))),
            SyntaxKind::NegationExprNode => Some(Self::Negation(NegationExpr(syntax))),
            SyntaxKind::CallExprNode => Some(Self::Call(CallExpr(syntax))),
            SyntaxKind::IndexExprNode => Some(Self::Index(IndexExpr(syntax))),
            SyntaxKind::AccessExprNode => Some(Self::Access(AccessExpr(syntax))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Literal(e) => e.syntax(),
            Self::Name(e) => e.syntax(),
            Self::This(e) => e.syntax(),
            Self::Parenthesized(e) => e.syntax(),
            Self::Conditional(e) => e.syntax(),
            Self::Instanceof(e) => e.syntax(),
            Self::LogicalNot(e) => e.syntax(),
            Self::Negation(e) => e.syntax(),
            Self::Binary(e) => e.syntax(),
            Self::Call(e) => e.syntax(),
            Self::Index(e) => e.syntax(),
            Self::Access(e) => e.syntax(),
        }
    }
}

/// Represents a literal expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralExpr {
    /// The literal is an integer.
    Integer(LiteralInteger),
    /// The literal is a float.
    Float(LiteralFloat),
    /// The literal is a boolean.
    Boolean(LiteralBoolean),
}

impl AstNode for LiteralExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::LiteralIntegerNode
                | SyntaxKind::LiteralFloatNode
                | SyntaxKind::LiteralBooleanNode
        )
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::LiteralIntegerNode => Some(Self::Integer(LiteralInteger(syntax))),
            SyntaxKind::LiteralFloatNode => Some(Self::Float(LiteralFloat(syntax))),
            SyntaxKind::LiteralBooleanNode => Some(Self::Boolean(LiteralBoolean(syntax))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Integer(e) => e.syntax(),
            Self::Float(e) => e.syntax(),
            Self::Boolean(e) => e.syntax(),
        }
    }
}

/// Represents a literal integer expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LiteralInteger(SyntaxNode);

impl AstNode for LiteralInteger {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::LiteralIntegerNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::LiteralIntegerNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a literal float expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LiteralFloat(SyntaxNode);

impl AstNode for LiteralFloat {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::LiteralFloatNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::LiteralFloatNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a literal boolean expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LiteralBoolean(SyntaxNode);

impl LiteralBoolean {
    /// Gets the value of the literal.
    pub fn value(&self) -> bool {
        support::token(&self.0, SyntaxKind::TrueKeyword).is_some()
    }
}

impl AstNode for LiteralBoolean {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::LiteralBooleanNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::LiteralBooleanNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a name reference expression.
///
/// The referenced name may be an undecorated identifier or any of the
/// three decorated value-name forms.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NameRef(SyntaxNode);

impl NameRef {
    /// Gets the name token of the reference.
    pub fn token(&self) -> SyntaxToken {
        support::token_matching(&self.0, is_name_token)
            .expect("name reference should have a name token")
    }
}

impl AstNode for NameRef {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::NameRefNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::NameRefNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a `this` reference expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ThisRef(SyntaxNode);

impl AstNode for ThisRef {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::ThisRefNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::ThisRefNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a parenthesized expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParenthesizedExpr(SyntaxNode);

impl ParenthesizedExpr {
    /// Gets the inner expression of the parenthesized expression.
    pub fn inner(&self) -> Expr {
        support::child(&self.0).expect("parenthesized expression should have an inner expression")
    }
}

impl AstNode for ParenthesizedExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::ParenthesizedExprNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::ParenthesizedExprNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a conditional (`? :`) expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConditionalExpr(SyntaxNode);

impl ConditionalExpr {
    /// Gets the condition expression.
    pub fn condition(&self) -> Expr {
        support::children(&self.0)
            .next()
            .expect("conditional expression should have a condition")
    }

    /// Gets the then-arm expression.
    pub fn then_arm(&self) -> Expr {
        support::children(&self.0)
            .nth(1)
            .expect("conditional expression should have a then-arm")
    }

    /// Gets the else-arm expression.
    pub fn else_arm(&self) -> Expr {
        support::children(&self.0)
            .nth(2)
            .expect("conditional expression should have an else-arm")
    }
}

impl AstNode for ConditionalExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::ConditionalExprNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::ConditionalExprNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents an `instanceof` expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceofExpr(SyntaxNode);

impl InstanceofExpr {
    /// Gets the tested operand expression.
    pub fn operand(&self) -> Expr {
        support::child(&self.0).expect("`instanceof` expression should have an operand")
    }

    /// Gets the tested type.
    pub fn ty(&self) -> Type {
        support::child(&self.0).expect("`instanceof` expression should have a type")
    }
}

impl AstNode for InstanceofExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::InstanceofExprNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::InstanceofExprNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a logical not expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LogicalNotExpr(SyntaxNode);

impl LogicalNotExpr {
    /// Gets the operand expression.
    pub fn operand(&self) -> Expr {
        support::child(&self.0).expect("logical not expression should have an operand")
    }
}

impl AstNode for LogicalNotExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::LogicalNotExprNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::LogicalNotExprNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents an arithmetic negation expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NegationExpr(SyntaxNode);

impl NegationExpr {
    /// Gets the operand expression.
    pub fn operand(&self) -> Expr {
        support::child(&self.0).expect("negation expression should have an operand")
    }
}

impl AstNode for NegationExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::NegationExprNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::NegationExprNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a binary operation expression.
///
/// The operation is discriminated by the node's [`SyntaxKind`]; the
/// relational, equality, logical, and arithmetic binary forms all share
/// this representation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BinaryExpr(SyntaxNode);

impl BinaryExpr {
    /// Gets the left-hand side operand of the operation.
    pub fn lhs(&self) -> Expr {
        support::children(&self.0)
            .next()
            .expect("binary expression should have a left-hand side")
    }

    /// Gets the right-hand side operand of the operation.
    pub fn rhs(&self) -> Expr {
        support::children(&self.0)
            .nth(1)
            .expect("binary expression should have a right-hand side")
    }

    /// Determines if the operation is a conjunction (`&` or `&&`).
    pub fn is_conjunction(&self) -> bool {
        self.0.kind() == SyntaxKind::ConjunctExprNode
    }
}

impl AstNode for BinaryExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::ConjunctExprNode
                | SyntaxKind::DisjunctExprNode
                | SyntaxKind::ImplicationExprNode
                | SyntaxKind::ReverseImplicationExprNode
                | SyntaxKind::BiconditionalExprNode
                | SyntaxKind::BiconditionalNegationExprNode
                | SyntaxKind::EqualityExprNode
                | SyntaxKind::InequalityExprNode
                | SyntaxKind::LessExprNode
                | SyntaxKind::LessEqualExprNode
                | SyntaxKind::GreaterExprNode
                | SyntaxKind::GreaterEqualExprNode
                | SyntaxKind::AdditionExprNode
                | SyntaxKind::SubtractionExprNode
                | SyntaxKind::MultiplicationExprNode
                | SyntaxKind::DivisionExprNode
                | SyntaxKind::ModuloExprNode
        )
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if Self::can_cast(syntax.kind()) {
            Some(Self(syntax))
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a call expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallExpr(SyntaxNode);

impl CallExpr {
    /// Gets the callee expression.
    pub fn callee(&self) -> Expr {
        support::children(&self.0)
            .next()
            .expect("call expression should have a callee")
    }

    /// Gets the argument expressions of the call.
    pub fn arguments(&self) -> impl Iterator<Item = Expr> + use<> {
        support::children(&self.0).skip(1)
    }
}

impl AstNode for CallExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::CallExprNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::CallExprNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents an index expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndexExpr(SyntaxNode);

impl IndexExpr {
    /// Gets the indexed base expression.
    pub fn base(&self) -> Expr {
        support::children(&self.0)
            .next()
            .expect("index expression should have a base")
    }

    /// Gets the index expression.
    pub fn index(&self) -> Expr {
        support::children(&self.0)
            .nth(1)
            .expect("index expression should have an index")
    }
}

impl AstNode for IndexExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::IndexExprNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::IndexExprNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents an access expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccessExpr(SyntaxNode);

impl AccessExpr {
    /// Gets the base expression of the access.
    pub fn base(&self) -> Expr {
        support::children(&self.0)
            .next()
            .expect("access expression should have a base")
    }

    /// Gets the accessed member name.
    pub fn member(&self) -> NameRef {
        support::children(&self.0)
            .filter_map(|e| match e {
                Expr::Name(name) => Some(name),
                _ => None,
            })
            .last()
            .expect("access expression should have a member name")
    }
}

impl AstNode for AccessExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::AccessExprNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::AccessExprNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}
