//! Support helpers for AST accessors.

use crate::AstNode;
use crate::SyntaxKind;
use crate::SyntaxNode;
use crate::SyntaxToken;

/// Gets the first child node that can be cast to the expected type.
pub fn child<T: AstNode>(parent: &SyntaxNode) -> Option<T> {
    parent.children().find_map(T::cast)
}

/// Gets all child nodes that can be cast to the expected type.
pub fn children<T: AstNode>(parent: &SyntaxNode) -> impl Iterator<Item = T> + use<T> {
    parent.children().filter_map(T::cast)
}

/// Gets the first token child of the given kind.
pub fn token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|it| it.kind() == kind)
}

/// Gets the first token child whose kind satisfies the given predicate.
pub fn token_matching(
    parent: &SyntaxNode,
    predicate: impl Fn(SyntaxKind) -> bool,
) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|it| predicate(it.kind()))
}
