//! An abstract syntax tree for TrueJ compilation units.
//!
//! The AST implementation is a facade over the concrete syntax tree
//! (CST) implemented by [`SyntaxTree`] from `truej-grammar`.
//!
//! An AST is cheap to construct and may be cheaply cloned at any level.
//!
//! However, an AST (and the underlying CST) are immutable; analysis
//! passes that need to rewrite source keep their rewrites in side tables
//! keyed by node identity rather than mutating the tree.
//!
//! # Examples
//!
//! An example of parsing TrueJ source into an AST:
//!
//! ```rust
//! use truej_ast::Document;
//!
//! let (document, diagnostics) = Document::parse("class Empty { }");
//! assert!(diagnostics.is_empty());
//! ```

use truej_grammar::SyntaxTree;

pub use truej_grammar::Diagnostic;
pub use truej_grammar::Label;
pub use truej_grammar::Severity;
pub use truej_grammar::Span;
pub use truej_grammar::SyntaxElement;
pub use truej_grammar::SyntaxKind;
pub use truej_grammar::SyntaxNode;
pub use truej_grammar::SyntaxToken;
pub use truej_grammar::TrueJLanguage;

pub mod support;
pub mod visitor;

mod decls;
mod exprs;
mod stmts;

pub use decls::*;
pub use exprs::*;
pub use stmts::*;
pub use visitor::VisitReason;
pub use visitor::Visitor;

/// A trait implemented by AST nodes.
pub trait AstNode: Sized {
    /// Determines if the kind can be cast to this representation.
    fn can_cast(kind: SyntaxKind) -> bool;

    /// Casts the given syntax node to this representation.
    ///
    /// Returns `None` if the node cannot be cast.
    fn cast(syntax: SyntaxNode) -> Option<Self>;

    /// Gets the underlying syntax node of this representation.
    fn syntax(&self) -> &SyntaxNode;

    /// Gets the span of the node.
    fn span(&self) -> Span {
        self.syntax().text_range().into()
    }

    /// Gets the source text of the node.
    fn text(&self) -> String {
        self.syntax().text().to_string()
    }
}

/// Represents a TrueJ compilation unit document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Document(SyntaxNode);

impl Document {
    /// Parses TrueJ source to produce a document.
    ///
    /// A document is always returned, even for invalid TrueJ source.
    ///
    /// The list of diagnostics encountered during the parse is also
    /// returned; if the list is empty, the document is syntactically
    /// correct.
    pub fn parse(source: &str) -> (Self, Vec<Diagnostic>) {
        let (tree, diagnostics) = SyntaxTree::parse(source);
        (
            Self::cast(tree.into_syntax()).expect("tree should cast to a document"),
            diagnostics,
        )
    }

    /// Gets the class definitions of the document.
    pub fn classes(&self) -> impl Iterator<Item = ClassDefinition> + use<> {
        support::children(&self.0)
    }
}

impl AstNode for Document {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::RootNode
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::RootNode => Some(Self(syntax)),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}
