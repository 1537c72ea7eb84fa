//! Translation of surface operators to prover operators.

use truej_ast::AstNode;
use truej_ast::Expr;
use truej_ast::LiteralExpr;
use truej_grammar::SyntaxKind;

use crate::names;
use crate::scope::ScopeId;
use crate::scope::Scopes;

/// Determines if a type name spells a boolean type.
fn is_boolean_type(ty: &str) -> bool {
    matches!(ty, "boolean" | "Boolean")
}

/// Gets the prover operator for a binary expression node.
///
/// The `boolean` flag selects the boolean column of the operator table;
/// it matters only for equality and inequality, which lift to `===` and
/// `=#=` over boolean operands.
pub(crate) fn binary_prover_op(kind: SyntaxKind, boolean: bool) -> &'static str {
    match kind {
        SyntaxKind::ConjunctExprNode => "/\\",
        SyntaxKind::DisjunctExprNode => "\\/",
        SyntaxKind::ImplicationExprNode => "==>",
        SyntaxKind::ReverseImplicationExprNode => "<==",
        SyntaxKind::BiconditionalExprNode => "===",
        SyntaxKind::BiconditionalNegationExprNode => "=#=",
        SyntaxKind::EqualityExprNode => {
            if boolean {
                "==="
            } else {
                "="
            }
        }
        SyntaxKind::InequalityExprNode => {
            if boolean {
                "=#="
            } else {
                "#="
            }
        }
        SyntaxKind::LessExprNode => "<",
        SyntaxKind::LessEqualExprNode => "=<",
        SyntaxKind::GreaterExprNode => ">",
        SyntaxKind::GreaterEqualExprNode => ">=",
        SyntaxKind::AdditionExprNode => "+",
        SyntaxKind::SubtractionExprNode => "-",
        SyntaxKind::MultiplicationExprNode => "*",
        SyntaxKind::DivisionExprNode => "/",
        SyntaxKind::ModuloExprNode => "%",
        _ => panic!("node kind is not a binary operator"),
    }
}

/// Determines structurally if an expression is boolean-valued.
///
/// Function calls and dot-expressions with unresolved bases default to
/// non-boolean; this is a known gap carried from the original design.
pub(crate) fn is_boolean(expr: &Expr, scopes: &Scopes, scope: ScopeId) -> bool {
    match expr {
        Expr::Literal(LiteralExpr::Boolean(_)) => true,
        Expr::Literal(_) => false,
        Expr::Name(name) => {
            let token = name.token();
            let base = names::base_name(token.text());
            scopes
                .lookup(scope, base)
                .map(|info| is_boolean_type(&info.ty))
                .unwrap_or(false)
        }
        Expr::This(_) => false,
        Expr::Parenthesized(expr) => is_boolean(&expr.inner(), scopes, scope),
        // A conditional is judged by its then-arm.
        Expr::Conditional(expr) => is_boolean(&expr.then_arm(), scopes, scope),
        Expr::Instanceof(_) => true,
        Expr::LogicalNot(_) => true,
        Expr::Negation(_) => false,
        Expr::Binary(expr) => !matches!(
            expr.syntax().kind(),
            SyntaxKind::AdditionExprNode
                | SyntaxKind::SubtractionExprNode
                | SyntaxKind::MultiplicationExprNode
                | SyntaxKind::DivisionExprNode
                | SyntaxKind::ModuloExprNode
        ),
        // TODO: decide booleanness of calls from the callee's return type
        // once method signatures are collected.
        Expr::Call(_) => false,
        Expr::Index(expr) => is_boolean(&expr.base(), scopes, scope),
        Expr::Access(expr) => match expr.base() {
            Expr::This(_) => {
                let token = expr.member().token();
                let base = names::base_name(token.text());
                scopes
                    .lookup(scope, base)
                    .map(|info| is_boolean_type(&info.ty))
                    .unwrap_or(false)
            }
            _ => false,
        },
    }
}
