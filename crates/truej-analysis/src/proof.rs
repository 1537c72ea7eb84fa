//! The proof pass: translation of executable constructs into
//! predicate-logic text and discharge of `means` statements.
//!
//! The pass is a rewriting tree-walker. Each visited construct may
//! rewrite its span in the [`RewriteTable`] and assume its formula into
//! the current [`KnowledgeBase`] frame; a block collapses its children
//! into a single formula via the bottom-up scan of [`ProofPass::block`];
//! a `means` statement is discharged by querying the prover, falling
//! back to conjunct decomposition to blame the first failing conjunct.

use std::collections::HashSet;

use anyhow::Result;
use anyhow::bail;
use tracing::debug;
use truej_ast::Assignment;
use truej_ast::AstNode;
use truej_ast::Block;
use truej_ast::ClassDefinition;
use truej_ast::Document;
use truej_ast::Expr;
use truej_ast::IfStatement;
use truej_ast::LiteralExpr;
use truej_ast::LocalDeclaration;
use truej_ast::MeansStatement;
use truej_ast::MethodDefinition;
use truej_ast::NameRef;
use truej_ast::ReturnStatement;
use truej_ast::Statement;
use truej_ast::WhileStatement;
use truej_grammar::Diagnostic;
use truej_grammar::SyntaxKind;
use truej_grammar::SyntaxNode;
use truej_prover::Prover;
use truej_prover::Verdict;

use crate::config::Config;
use crate::diagnostics;
use crate::kb::KnowledgeBase;
use crate::names;
use crate::names::Decoration;
use crate::operators;
use crate::rewrite;
use crate::rewrite::RewriteTable;
use crate::scope::ScopeId;
use crate::scope::Scopes;

/// The output of the proof pass.
#[derive(Debug, Clone)]
pub struct ProofOutcome {
    /// The diagnostics produced by the pass, in traversal order.
    pub diagnostics: Vec<Diagnostic>,
    /// The serialized rewrite table: the text presented to the prover.
    pub transcript: String,
}

/// The proof pass over a resolved compilation unit.
pub struct ProofPass<'a, P: Prover> {
    /// The scope tree of the compilation unit.
    scopes: &'a Scopes,
    /// The analysis configuration.
    config: &'a Config,
    /// The rewrite table of the pass.
    table: RewriteTable,
    /// The knowledge base of the pass.
    kb: KnowledgeBase<P>,
    /// The diagnostics produced so far.
    diagnostics: Vec<Diagnostic>,
    /// The return type of the method currently being checked.
    return_type: Option<String>,
}

impl<'a, P: Prover> ProofPass<'a, P> {
    /// Creates a new proof pass over the given scopes, configuration,
    /// and prover.
    pub fn new(scopes: &'a Scopes, config: &'a Config, prover: P) -> Self {
        Self {
            scopes,
            config,
            table: RewriteTable::new(),
            kb: KnowledgeBase::new(prover),
            diagnostics: Vec::new(),
            return_type: None,
        }
    }

    /// Checks every class of the document.
    ///
    /// Methods in the `skip` set (those refused by an earlier pass) are
    /// not submitted to the prover.
    ///
    /// User-level proof failures are reported through the outcome's
    /// diagnostics; the error return is reserved for internal
    /// translation failures, which abort the pass.
    pub fn check(
        mut self,
        document: &Document,
        skip: &HashSet<SyntaxNode>,
    ) -> Result<ProofOutcome> {
        for class in document.classes() {
            self.class(&class, skip)?;
        }

        Ok(ProofOutcome {
            diagnostics: self.diagnostics,
            transcript: self.table.transcript(document.syntax()),
        })
    }

    /// Checks a single class definition.
    fn class(&mut self, class: &ClassDefinition, skip: &HashSet<SyntaxNode>) -> Result<()> {
        self.kb.push();
        let result = self.class_members(class, skip);
        self.kb.pop();
        result
    }

    /// Checks the members of a class inside the class frame.
    fn class_members(
        &mut self,
        class: &ClassDefinition,
        skip: &HashSet<SyntaxNode>,
    ) -> Result<()> {
        for field in class.fields() {
            let ty = field.ty().name();
            for declarator in field.declarators() {
                let token = declarator.name();
                let atom = self.declared_atom(field.syntax(), token.kind(), token.text());
                self.kb.assume_type(&format!("type({ty}, {atom})"))?;
            }
        }

        for method in class.methods() {
            if skip.contains(method.syntax()) {
                debug!(
                    method = method.name().text(),
                    "skipping method refused by an earlier pass"
                );
                continue;
            }

            self.method(&method)?;
        }

        Ok(())
    }

    /// Checks a single method definition.
    ///
    /// The knowledge base depth is restored on every exit path.
    fn method(&mut self, method: &MethodDefinition) -> Result<()> {
        let depth = self.kb.depth();
        self.kb.push();
        self.return_type = Some(method.return_type().name());
        let result = self.method_body(method);
        self.return_type = None;
        self.kb.pop();
        debug_assert_eq!(self.kb.depth(), depth, "unbalanced knowledge base");
        result
    }

    /// Checks a method's parameters, body, and trailing `means`
    /// statement inside the method frame.
    fn method_body(&mut self, method: &MethodDefinition) -> Result<()> {
        for parameter in method.parameters() {
            let ty = parameter.ty().name();
            let token = parameter.name();
            let atom = self.declared_atom(parameter.syntax(), token.kind(), token.text());
            self.kb.assume_type(&format!("type({ty}, {atom})"))?;
        }

        self.block(&method.body())?;

        if let Some(means) = method.means() {
            self.means_statement(&means)?;
        }

        Ok(())
    }

    /// Runs a function inside a fresh child knowledge base frame.
    ///
    /// The frame is popped on every exit path.
    fn with_child_kb<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.kb.push();
        let result = f(self);
        self.kb.pop();
        result
    }

    /// Translates a single statement, leaving its formula in the rewrite
    /// table and assuming it in the current frame.
    fn statement(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Block(block) => self.block(block),
            Statement::LocalDeclaration(decl) => self.local_declaration(decl),
            Statement::Assignment(assignment) => self.assignment(assignment),
            Statement::If(statement) => self.if_statement(statement),
            Statement::While(statement) => self.while_statement(statement),
            Statement::Return(statement) => self.return_statement(statement),
            Statement::Means(means) => self.means_statement(means),
            Statement::Empty(statement) => {
                self.table.substitute(statement.syntax(), "true");
                Ok(())
            }
        }
    }

    /// Translates a block.
    ///
    /// The block's statements are visited top-down inside a child frame
    /// so that inner proofs see the correct accumulating knowledge base;
    /// the block's own formula is then assembled by a bottom-up scan in
    /// which the last `means` statement quenches the formulas of the
    /// statements above it. Braces become parentheses.
    fn block(&mut self, block: &Block) -> Result<()> {
        let statements: Vec<Statement> = block.statements().collect();

        self.with_child_kb(|pass| {
            for statement in &statements {
                pass.statement(statement)?;
            }

            Ok(())
        })?;

        let mut parts = Vec::new();
        let mut quenched = false;
        for statement in statements.iter().rev() {
            match statement {
                Statement::Means(_) if !quenched => {
                    parts.push(self.table.source(statement.syntax()));
                    quenched = true;
                }
                // Above a means statement only type facts remain live,
                // and those were already recorded in the knowledge base.
                _ if quenched => {}
                _ => {
                    let text = self.table.source(statement.syntax());
                    if text != "true" {
                        parts.push(text);
                    }
                }
            }
        }
        parts.reverse();

        let meaning = if parts.is_empty() {
            "true".to_string()
        } else {
            format!("({parts})", parts = parts.join(" /\\ "))
        };

        self.table.substitute(block.syntax(), &meaning);
        self.kb.assume(&meaning)
    }

    /// Translates a local declaration statement.
    ///
    /// Every declarator contributes a type fact; an initialized
    /// declarator additionally contributes `(v' = e)`, lifted to `===`
    /// when the declared type is boolean.
    fn local_declaration(&mut self, decl: &LocalDeclaration) -> Result<()> {
        let ty = decl.ty().name();
        let boolean = matches!(ty.as_str(), "boolean" | "Boolean");

        let mut parts = Vec::new();
        for declarator in decl.declarators() {
            let token = declarator.name();
            let atom = self.declared_atom(decl.syntax(), token.kind(), token.text());
            self.kb.assume_type(&format!("type({ty}, {atom})"))?;

            if let Some(initializer) = declarator.initializer() {
                let value = self.expr(&initializer)?;
                let op = if boolean { "===" } else { "=" };
                let part = format!("({atom} {op} {value})");
                self.kb.assume(&part)?;
                parts.push(part);
            }
        }

        let text = match parts.len() {
            0 => "true".to_string(),
            1 => parts.remove(0),
            _ => format!("({parts})", parts = parts.join(" /\\ ")),
        };
        self.table.substitute(decl.syntax(), text);
        Ok(())
    }

    /// Translates an assignment statement into `(t = e)`, lifted to
    /// `===` over boolean operands.
    fn assignment(&mut self, assignment: &Assignment) -> Result<()> {
        let target_expr = assignment.target();
        let value_expr = assignment.value();
        let target = self.expr(&target_expr)?;
        let value = self.expr(&value_expr)?;

        let scope = self.scope_for(assignment.syntax());
        let boolean = operators::is_boolean(&target_expr, self.scopes, scope)
            || operators::is_boolean(&value_expr, self.scopes, scope);
        let op = if boolean { "===" } else { "=" };

        let text = format!("({target} {op} {value})");
        self.table.substitute(assignment.syntax(), &text);
        self.kb.assume(&text)
    }

    /// Translates an `if` statement into
    /// `((c /\ [[S1]]) \/ (-c /\ [[S2]]))`, with the else-arm reduced to
    /// `-c` when absent.
    ///
    /// Each branch is visited inside a child frame that first assumes
    /// its guard, so an assignment inside a branch has its guard visible
    /// to the prover.
    fn if_statement(&mut self, statement: &IfStatement) -> Result<()> {
        let condition = self.expr(&statement.condition())?;
        let negated = format!("(- {condition})");

        let then_branch = statement.then_branch();
        self.with_child_kb(|pass| {
            pass.kb.assume(&condition)?;
            pass.statement(&then_branch)
        })?;
        let then_text = self.table.source(then_branch.syntax());

        let text = match statement.else_branch() {
            Some(else_branch) => {
                self.with_child_kb(|pass| {
                    pass.kb.assume(&negated)?;
                    pass.statement(&else_branch)
                })?;
                let else_text = self.table.source(else_branch.syntax());
                format!("(({condition} /\\ {then_text}) \\/ ({negated} /\\ {else_text}))")
            }
            None => format!("(({condition} /\\ {then_text}) \\/ {negated})"),
        };

        self.table.substitute(statement.syntax(), &text);
        self.kb.assume(&text)
    }

    /// Translates a `while` statement into `(c /\ [[S]])`.
    ///
    /// The translation deliberately omits loop invariants; contexts
    /// requiring total-correctness reasoning must not rely on it.
    fn while_statement(&mut self, statement: &WhileStatement) -> Result<()> {
        let condition = self.expr(&statement.condition())?;

        let body = statement.body();
        self.with_child_kb(|pass| {
            pass.kb.assume(&condition)?;
            pass.statement(&body)
        })?;
        let body_text = self.table.source(body.syntax());

        let text = format!("({condition} /\\ {body_text})");
        self.table.substitute(statement.syntax(), &text);
        self.kb.assume(&text)
    }

    /// Translates a `return` statement.
    fn return_statement(&mut self, statement: &ReturnStatement) -> Result<()> {
        let text = match statement.value() {
            Some(value_expr) => {
                let value = self.expr(&value_expr)?;
                let scope = self.scope_for(statement.syntax());
                let boolean = self
                    .return_type
                    .as_deref()
                    .map(|ty| matches!(ty, "boolean" | "Boolean"))
                    .unwrap_or(false)
                    || operators::is_boolean(&value_expr, self.scopes, scope);
                let op = if boolean { "===" } else { "=" };

                if self.config.require_decorated_final_value() {
                    format!("('return^' {op} {value})")
                } else {
                    format!("(('return^' {op} {value}) /\\ (return {op} {value}))")
                }
            }
            None => "true".to_string(),
        };

        self.table.substitute(statement.syntax(), &text);
        if text != "true" {
            self.kb.assume(&text)?;
        }

        Ok(())
    }

    /// Discharges a `means` statement.
    ///
    /// On success, the current frame's prior assumptions are replaced by
    /// the proven claim; on failure, the claim is decomposed into
    /// conjuncts and the first unprovable conjunct is blamed at its
    /// original source.
    fn means_statement(&mut self, means: &MeansStatement) -> Result<()> {
        let predicate = means.predicate();
        let text = rewrite::expand_forall(self.expr(&predicate)?);
        self.table.substitute(means.syntax(), &text);

        match self.kb.substitute_if_proven(&text)? {
            Verdict::ProvenTrue => {
                debug!(claim = text.as_str(), "means statement proven");
                Ok(())
            }
            _ => {
                self.decompose(&predicate)?;
                Ok(())
            }
        }
    }

    /// Recursively attempts each conjunct of a failed claim, preserving
    /// the left-to-right order of conjuncts as they appear in source.
    ///
    /// Returns `false` when a conjunct was blamed and the decomposition
    /// must stop.
    fn decompose(&mut self, expr: &Expr) -> Result<bool> {
        match expr {
            Expr::Binary(binary) if binary.is_conjunction() => {
                if !self.decompose(&binary.lhs())? {
                    return Ok(false);
                }

                self.decompose(&binary.rhs())
            }
            Expr::Parenthesized(paren) => self.decompose(&paren.inner()),
            _ => {
                let text = self.table.source(expr.syntax());
                match self.kb.assume_if_proven(&text)? {
                    Verdict::ProvenTrue => Ok(true),
                    Verdict::Unsupported => {
                        let original = self.table.original_source(expr.syntax());
                        self.diagnostics.push(diagnostics::unsupported_proof(
                            original.trim(),
                            expr.span(),
                        ));
                        Ok(false)
                    }
                    Verdict::ReachedLimit => {
                        let original = self.table.original_source(expr.syntax());
                        self.diagnostics
                            .push(diagnostics::prover_limit(original.trim(), expr.span()));
                        Ok(false)
                    }
                }
            }
        }
    }

    /// Reconstructs an expression as a fully parenthesized prover term,
    /// substituting the rewritten text of every visited subexpression.
    fn expr(&mut self, expr: &Expr) -> Result<String> {
        match expr {
            Expr::Literal(LiteralExpr::Integer(literal)) => Ok(literal.text().trim().to_string()),
            Expr::Literal(LiteralExpr::Boolean(literal)) => Ok(literal.text().trim().to_string()),
            Expr::Literal(LiteralExpr::Float(literal)) => {
                let text = literal.text().trim().to_string();
                if text.starts_with('.') {
                    let token = literal
                        .syntax()
                        .first_token()
                        .expect("float literal should have a token");
                    let text = format!("0{text}");
                    self.table.replace(&token, &text);
                    self.table.substitute(literal.syntax(), &text);
                    Ok(text)
                } else {
                    Ok(text)
                }
            }
            Expr::Name(name) => self.name_ref(name),
            Expr::This(_) => Ok("this".to_string()),
            Expr::Parenthesized(paren) => {
                let inner = self.expr(&paren.inner())?;
                let text = format!("({inner})");
                self.table.substitute(paren.syntax(), &text);
                Ok(text)
            }
            Expr::Conditional(_) => {
                bail!("cannot translate a conditional expression in a proof context")
            }
            Expr::Instanceof(expr) => {
                let operand = self.expr(&expr.operand())?;
                let ty = expr.ty().name();
                let text = format!("instanceof({operand}, {ty})");
                self.table.substitute(expr.syntax(), &text);
                Ok(text)
            }
            Expr::LogicalNot(expr) => {
                let operand = self.expr(&expr.operand())?;
                let text = format!("(- {operand})");
                self.table.substitute(expr.syntax(), &text);
                Ok(text)
            }
            Expr::Negation(expr) => {
                let operand = self.expr(&expr.operand())?;
                let text = format!("(- {operand})");
                self.table.substitute(expr.syntax(), &text);
                Ok(text)
            }
            Expr::Binary(binary) => {
                let lhs_expr = binary.lhs();
                let rhs_expr = binary.rhs();
                let lhs = self.expr(&lhs_expr)?;
                let rhs = self.expr(&rhs_expr)?;

                let scope = self.scope_for(binary.syntax());
                let boolean = operators::is_boolean(&lhs_expr, self.scopes, scope)
                    || operators::is_boolean(&rhs_expr, self.scopes, scope);
                let op = operators::binary_prover_op(binary.syntax().kind(), boolean);

                let text = format!("({lhs} {op} {rhs})");
                self.table.substitute(binary.syntax(), &text);
                Ok(text)
            }
            Expr::Call(call) => {
                let callee = self.expr(&call.callee())?;
                let mut args = Vec::new();
                for arg in call.arguments() {
                    args.push(self.expr(&arg)?);
                }

                let text = format!("{callee}({args})", args = args.join(", "));
                self.table.substitute(call.syntax(), &text);
                Ok(text)
            }
            Expr::Index(index) => {
                let base = self.expr(&index.base())?;
                let idx = self.expr(&index.index())?;
                let text = format!("index({base}, {idx})");
                self.table.substitute(index.syntax(), &text);
                Ok(text)
            }
            Expr::Access(access) => match access.base() {
                Expr::This(_) => {
                    let member = access.member();
                    let token = member.token();
                    if matches!(
                        names::decoration_of(token.kind(), token.text()),
                        Decoration::None
                    ) {
                        // An undecorated field access is left untouched.
                        return Ok(access.text().trim().to_string());
                    }

                    let atom = self.name_ref(&member)?;
                    self.table.substitute(access.syntax(), &atom);
                    Ok(atom)
                }
                _ => bail!("cannot translate an access expression with a computed base"),
            },
        }
    }

    /// Rewrites a value name reference into its prover atom.
    ///
    /// Undecorated identifiers are left untouched so that bare variable
    /// references (e.g. loop bounds) pass through unchanged.
    fn name_ref(&mut self, name: &NameRef) -> Result<String> {
        let token = name.token();
        let decoration = names::decoration_of(token.kind(), token.text());
        if matches!(decoration, Decoration::None) {
            return Ok(token.text().to_string());
        }

        let base = names::base_name(token.text());
        let scope = self.scope_for(name.syntax());
        // `return` is implicitly declared by the enclosing method and
        // carries no scope prefix.
        let prefix = if base == "return" {
            String::new()
        } else {
            match self.scopes.lookup(scope, base) {
                Some(info) => self.scopes.prefix(info),
                None => {
                    self.diagnostics.push(diagnostics::unknown_value_name(
                        token.text(),
                        token.text_range().into(),
                    ));
                    String::new()
                }
            }
        };

        let atom = names::atom(&prefix, base, &decoration);
        self.table.replace(&token, &atom);
        self.table.substitute(name.syntax(), &atom);
        Ok(atom)
    }

    /// Translates a declared name into the atom used in its type fact.
    ///
    /// The atom carries the declarator's written decoration; undecorated
    /// declarators use the post-decorated form, the value the enclosing
    /// construct produces.
    fn declared_atom(&self, context: &SyntaxNode, kind: SyntaxKind, text: &str) -> String {
        let decoration = match names::decoration_of(kind, text) {
            Decoration::None => Decoration::Post,
            decoration => decoration,
        };

        let base = names::base_name(text);
        let prefix = match self
            .scopes
            .scope_of(context)
            .and_then(|scope| self.scopes.lookup(scope, base))
        {
            Some(info) => self.scopes.prefix(info),
            None => String::new(),
        };

        names::atom(&prefix, base, &decoration)
    }

    /// Gets the scope containing the given node.
    fn scope_for(&self, node: &SyntaxNode) -> ScopeId {
        self.scopes
            .scope_of(node)
            .expect("node should be contained in a scope")
    }
}
