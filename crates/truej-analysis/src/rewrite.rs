//! The rewrite table: node identity to current textual rendering.
//!
//! The proof pass never mutates the syntax tree; instead each visited
//! node may substitute its span's text here. Reading a node's text
//! returns the most recent substitution, while the unmodified source is
//! always recoverable for user-facing error messages.

use std::collections::HashMap;

use rowan::NodeOrToken;
use truej_grammar::SyntaxElement;
use truej_grammar::SyntaxKind;
use truej_grammar::SyntaxNode;
use truej_grammar::SyntaxToken;

/// A mapping from parse-node identity to the current textual rendering
/// of that node's span.
#[derive(Debug, Default)]
pub struct RewriteTable {
    /// The substituted entries.
    entries: HashMap<SyntaxElement, String>,
}

impl RewriteTable {
    /// Creates a new, empty rewrite table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitutes the text of a node.
    pub fn substitute(&mut self, node: &SyntaxNode, text: impl Into<String>) {
        self.entries
            .insert(NodeOrToken::Node(node.clone()), text.into());
    }

    /// Replaces the text of a single token.
    pub fn replace(&mut self, token: &SyntaxToken, text: impl Into<String>) {
        self.entries
            .insert(NodeOrToken::Token(token.clone()), text.into());
    }

    /// Gets the current text of a node.
    ///
    /// If the node has been substituted, the substitution is returned;
    /// otherwise the node's children are rendered in order, honoring any
    /// nested substitutions.
    pub fn source(&self, node: &SyntaxNode) -> String {
        let mut text = String::new();
        self.render(&NodeOrToken::Node(node.clone()), &mut text);
        text
    }

    /// Gets the unmodified source of a node, for user-facing messages.
    pub fn original_source(&self, node: &SyntaxNode) -> String {
        node.text().to_string()
    }

    /// Serializes the rewrite table in source order from the given root.
    ///
    /// This is the transcript of the pass: the exact stream of rewritten
    /// text presented to the prover, with unvisited spans rendered as
    /// they appear in source.
    pub fn transcript(&self, root: &SyntaxNode) -> String {
        self.source(root)
    }

    /// Renders an element, honoring the deepest applicable substitution.
    fn render(&self, element: &SyntaxElement, into: &mut String) {
        if let Some(text) = self.entries.get(element) {
            into.push_str(text);
            return;
        }

        match element {
            NodeOrToken::Node(node) => {
                for child in node.children_with_tokens() {
                    self.render(&child, into);
                }
            }
            NodeOrToken::Token(token) => into.push_str(&token_text(token)),
        }
    }
}

/// Reserved hook for injecting type facts inside quantified scopes.
///
/// Quantifier expansion is not implemented; until it is, the hook
/// returns the claim unchanged, and claims whose proofs depend on the
/// types of bound variables may fail.
pub fn expand_forall(claim: String) -> String {
    claim
}

/// Gets the rendered text of an unsubstituted token.
///
/// Two textual conventions of the prover's input format are applied
/// here: `//` comments become `%` line comments, and float literals
/// starting with `.` are prefixed with `0`.
fn token_text(token: &SyntaxToken) -> String {
    let text = token.text();
    match token.kind() {
        SyntaxKind::Comment => format!("%{rest}", rest = text.strip_prefix("//").unwrap_or(text)),
        SyntaxKind::Float if text.starts_with('.') => format!("0{text}"),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use truej_ast::AstNode;
    use truej_ast::Document;
    use truej_ast::Statement;

    use super::*;

    /// Parses a single-method class and returns its first statement.
    fn first_statement(source: &str) -> (Document, SyntaxNode) {
        let (document, diagnostics) = Document::parse(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let class = document.classes().next().unwrap();
        let method = class.methods().next().unwrap();
        let statement = method.body().statements().next().unwrap();
        let node = statement.syntax().clone();
        let _ = Statement::cast(node.clone()).unwrap();
        (document, node)
    }

    #[test]
    fn substitution_shadows_children() {
        let (document, statement) =
            first_statement("class C { int a, b; void m() { a' = 'b; } }");

        let mut table = RewriteTable::new();
        assert_eq!(table.source(&statement), "a' = 'b;");
        assert_eq!(table.original_source(&statement), "a' = 'b;");

        table.substitute(&statement, "('this.a^' = 'this.^b')");
        assert_eq!(table.source(&statement), "('this.a^' = 'this.^b')");
        assert_eq!(table.original_source(&statement), "a' = 'b;");

        let transcript = table.transcript(document.syntax());
        assert!(transcript.contains("('this.a^' = 'this.^b')"));
        assert!(!transcript.contains("a' = 'b;"));
    }

    #[test]
    fn comment_and_float_conventions() {
        let (document, _) =
            first_statement("class C { double d; void m() { d' = .5; } // note\n }");

        let table = RewriteTable::new();
        let transcript = table.transcript(document.syntax());
        assert!(transcript.contains("0.5"));
        assert!(transcript.contains("% note"));
    }
}
