//! AST representations for class-level declarations.

use crate::AstNode;
use crate::Block;
use crate::Expr;
use crate::MeansStatement;
use crate::SyntaxKind;
use crate::SyntaxNode;
use crate::SyntaxToken;
use crate::support;

/// Determines if the given kind is a value name token kind.
///
/// This includes the undecorated identifier form and the `return`
/// keyword, which names a method's result in claims.
pub fn is_name_token(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Ident
            | SyntaxKind::PreValueName
            | SyntaxKind::PostValueName
            | SyntaxKind::MidValueName
            | SyntaxKind::ReturnKeyword
    )
}

/// Represents a class definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassDefinition(SyntaxNode);

impl ClassDefinition {
    /// Gets the name token of the class.
    pub fn name(&self) -> SyntaxToken {
        support::token(&self.0, SyntaxKind::Ident).expect("class should have a name")
    }

    /// Gets the field declarations of the class.
    pub fn fields(&self) -> impl Iterator<Item = FieldDeclaration> + use<> {
        support::children(&self.0)
    }

    /// Gets the method definitions of the class.
    pub fn methods(&self) -> impl Iterator<Item = MethodDefinition> + use<> {
        support::children(&self.0)
    }
}

impl AstNode for ClassDefinition {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::ClassDefinitionNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::ClassDefinitionNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a field declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDeclaration(SyntaxNode);

impl FieldDeclaration {
    /// Gets the declared type of the field declaration.
    pub fn ty(&self) -> Type {
        support::child(&self.0).expect("field declaration should have a type")
    }

    /// Gets the declarators of the field declaration.
    pub fn declarators(&self) -> impl Iterator<Item = Declarator> + use<> {
        support::children(&self.0)
    }
}

impl AstNode for FieldDeclaration {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::FieldDeclarationNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::FieldDeclarationNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a method definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDefinition(SyntaxNode);

impl MethodDefinition {
    /// Gets the return type of the method.
    pub fn return_type(&self) -> Type {
        support::child(&self.0).expect("method should have a return type")
    }

    /// Gets the name token of the method.
    pub fn name(&self) -> SyntaxToken {
        support::token(&self.0, SyntaxKind::Ident).expect("method should have a name")
    }

    /// Gets the parameters of the method.
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + use<> {
        support::children(&self.0)
    }

    /// Gets the body block of the method.
    pub fn body(&self) -> Block {
        support::child(&self.0).expect("method should have a body")
    }

    /// Gets the trailing `means` statement of the method, if present.
    pub fn means(&self) -> Option<MeansStatement> {
        support::child(&self.0)
    }
}

impl AstNode for MethodDefinition {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::MethodDefinitionNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::MethodDefinitionNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a method parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter(SyntaxNode);

impl Parameter {
    /// Gets the declared type of the parameter.
    pub fn ty(&self) -> Type {
        support::child(&self.0).expect("parameter should have a type")
    }

    /// Gets the name token of the parameter.
    pub fn name(&self) -> SyntaxToken {
        support::token_matching(&self.0, is_name_token).expect("parameter should have a name")
    }
}

impl AstNode for Parameter {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::ParameterNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::ParameterNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a declarator within a field or local declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Declarator(SyntaxNode);

impl Declarator {
    /// Gets the name token of the declarator.
    ///
    /// The token may be an undecorated identifier or a post- or
    /// mid-decorated value name.
    pub fn name(&self) -> SyntaxToken {
        support::token_matching(&self.0, is_name_token).expect("declarator should have a name")
    }

    /// Gets the initializer expression of the declarator, if present.
    pub fn initializer(&self) -> Option<Expr> {
        support::child(&self.0)
    }
}

impl AstNode for Declarator {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::DeclaratorNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::DeclaratorNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// The type is a primitive type.
    Primitive(PrimitiveType),
    /// The type is a reference to a named type.
    Ref(TypeRef),
}

impl Type {
    /// Gets the spelled name of the type (e.g. `int` or `Boolean`).
    pub fn name(&self) -> String {
        match self {
            Self::Primitive(ty) => ty.text().trim().to_string(),
            Self::Ref(ty) => ty.text().trim().to_string(),
        }
    }
}

impl AstNode for Type {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::PrimitiveTypeNode | SyntaxKind::TypeRefNode
        )
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::PrimitiveTypeNode => Some(Self::Primitive(PrimitiveType(syntax))),
            SyntaxKind::TypeRefNode => Some(Self::Ref(TypeRef(syntax))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Primitive(ty) => ty.syntax(),
            Self::Ref(ty) => ty.syntax(),
        }
    }
}

/// Represents a primitive type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveType(SyntaxNode);

impl AstNode for PrimitiveType {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::PrimitiveTypeNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::PrimitiveTypeNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

/// Represents a reference to a named type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef(SyntaxNode);

impl AstNode for TypeRef {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::TypeRefNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::TypeRefNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}
