//! A crate for lexing and parsing TrueJ source.
//!
//! TrueJ is a Java-like source language extended with decorated *value
//! names* (`'x`, `x'`, `x'tag`) and `means` statements, so that every
//! executable carries a machine-checkable logical meaning.
//!
//! This crate produces a concrete syntax tree (CST) in which every token
//! of the source is represented; the tree is suitable both for the proof
//! pass (which needs node identity, spans, and original source text) and
//! for eventual Java emission.
//!
//! # Examples
//!
//! ```rust
//! # use truej_grammar::SyntaxTree;
//! let (tree, diagnostics) = SyntaxTree::parse("class Empty { }");
//! assert!(diagnostics.is_empty());
//! ```

mod diagnostic;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod tree;

pub use diagnostic::Diagnostic;
pub use diagnostic::Label;
pub use diagnostic::Severity;
pub use diagnostic::Span;
pub use tree::SyntaxElement;
pub use tree::SyntaxKind;
pub use tree::SyntaxNode;
pub use tree::SyntaxNodeChildren;
pub use tree::SyntaxToken;
pub use tree::SyntaxTree;
pub use tree::TrueJLanguage;
