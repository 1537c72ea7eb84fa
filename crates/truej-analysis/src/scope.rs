//! Implementation of scopes for TrueJ compilation units.

use std::collections::HashMap;

use indexmap::IndexMap;
use truej_ast::AstNode;
use truej_ast::Block;
use truej_ast::ClassDefinition;
use truej_ast::Document;
use truej_ast::MethodDefinition;
use truej_ast::Statement;
use truej_grammar::SyntaxNode;

use crate::names;

/// An identifier of a scope within a [`Scopes`] collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

/// Represents information about a declared variable.
#[derive(Debug, Clone)]
pub struct VarInfo {
    /// The scope in which the variable was declared.
    pub scope: ScopeId,
    /// The declared type of the variable, as spelled in source.
    pub ty: String,
}

/// Represents a single scope.
#[derive(Debug)]
pub struct Scope {
    /// The label of the scope.
    ///
    /// The label is empty for executable-local scopes and `this` for
    /// the instance scope of a class.
    label: String,
    /// The parent of the scope, if any.
    parent: Option<ScopeId>,
    /// The variables declared in the scope.
    names: IndexMap<String, VarInfo>,
}

impl Scope {
    /// Gets the label of the scope.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Gets the parent of the scope.
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }
}

/// The scope tree of a compilation unit.
#[derive(Debug, Default)]
pub struct Scopes {
    /// The scopes of the tree.
    scopes: Vec<Scope>,
    /// A map from the CST node introducing a scope to its identifier.
    by_node: HashMap<SyntaxNode, ScopeId>,
}

impl Scopes {
    /// Builds the scope tree for the given document.
    pub fn build(document: &Document) -> Self {
        let mut scopes = Self::default();

        for class in document.classes() {
            let class_scope = scopes.push("this", None, class.syntax());

            for field in class.fields() {
                let ty = field.ty().name();
                for declarator in field.declarators() {
                    let token = declarator.name();
                    scopes.declare(class_scope, names::base_name(token.text()), &ty);
                }
            }

            for method in class.methods() {
                let method_scope = scopes.push("", Some(class_scope), method.syntax());

                for parameter in method.parameters() {
                    let ty = parameter.ty().name();
                    let token = parameter.name();
                    scopes.declare(method_scope, names::base_name(token.text()), &ty);
                }

                scopes.block(method_scope, &method.body());
            }
        }

        scopes
    }

    /// Records the declarations of a block into a fresh child scope.
    fn block(&mut self, parent: ScopeId, block: &Block) {
        let scope = self.push("", Some(parent), block.syntax());

        for statement in block.statements() {
            self.statement(scope, &statement);
        }
    }

    /// Records the declarations introduced by a statement.
    fn statement(&mut self, scope: ScopeId, statement: &Statement) {
        match statement {
            Statement::Block(block) => self.block(scope, block),
            Statement::LocalDeclaration(decl) => {
                let ty = decl.ty().name();
                for declarator in decl.declarators() {
                    let token = declarator.name();
                    self.declare(scope, names::base_name(token.text()), &ty);
                }
            }
            Statement::If(statement) => {
                self.statement(scope, &statement.then_branch());
                if let Some(else_branch) = statement.else_branch() {
                    self.statement(scope, &else_branch);
                }
            }
            Statement::While(statement) => {
                self.statement(scope, &statement.body());
            }
            Statement::Assignment(_)
            | Statement::Return(_)
            | Statement::Means(_)
            | Statement::Empty(_) => {}
        }
    }

    /// Pushes a new scope introduced by the given node.
    fn push(&mut self, label: &str, parent: Option<ScopeId>, node: &SyntaxNode) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            label: label.to_string(),
            parent,
            names: IndexMap::new(),
        });
        self.by_node.insert(node.clone(), id);
        id
    }

    /// Declares a variable in the given scope.
    fn declare(&mut self, scope: ScopeId, name: &str, ty: &str) {
        self.scopes[scope.0].names.insert(
            name.to_string(),
            VarInfo {
                scope,
                ty: ty.to_string(),
            },
        );
    }

    /// Gets a scope by identifier.
    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Gets the scope containing the given node.
    ///
    /// The node's ancestors are climbed until a scope-introducing node
    /// is found.
    pub fn scope_of(&self, node: &SyntaxNode) -> Option<ScopeId> {
        let mut current = Some(node.clone());
        while let Some(node) = current {
            if let Some(id) = self.by_node.get(&node) {
                return Some(*id);
            }
            current = node.parent();
        }

        None
    }

    /// Looks up a variable by name, resolving through parent scopes.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&VarInfo> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.0];
            if let Some(info) = scope.names.get(name) {
                return Some(info);
            }
            current = scope.parent;
        }

        None
    }

    /// Gets the scope prefix of a declared variable.
    ///
    /// The prefix is determined solely by the declaring scope's label:
    /// an empty label yields an empty prefix, a label `this` yields
    /// `this.`.
    pub fn prefix(&self, info: &VarInfo) -> String {
        let label = self.get(info.scope).label();
        if label.is_empty() {
            String::new()
        } else {
            format!("{label}.")
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use truej_ast::Document;

    use super::*;

    #[test]
    fn fields_and_locals() {
        let (document, diagnostics) = Document::parse(
            "class Pair {
               int a, b;
               void sort(int bound) {
                 int temp' = 'a;
                 a' = temp';
               }
             }",
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");

        let scopes = Scopes::build(&document);
        let class = document.classes().next().unwrap();
        let method = class.methods().next().unwrap();
        let body = method.body();

        let class_scope = scopes.scope_of(class.syntax()).unwrap();
        let body_scope = scopes.scope_of(body.syntax()).unwrap();

        let a = scopes.lookup(body_scope, "a").unwrap();
        assert_eq!(a.ty, "int");
        assert_eq!(scopes.prefix(a), "this.");
        assert_eq!(scopes.get(a.scope).label(), "this");
        assert_eq!(a.scope, class_scope);

        let temp = scopes.lookup(body_scope, "temp").unwrap();
        assert_eq!(scopes.prefix(temp), "");

        let bound = scopes.lookup(body_scope, "bound").unwrap();
        assert_eq!(scopes.prefix(bound), "");

        assert!(scopes.lookup(class_scope, "temp").is_none());
    }
}
