//! Module for the TrueJ grammar functions.

use super::Diagnostic;
use super::lexer::Token;
use super::lexer::TokenSet;
use super::parser::CompletedMarker;
use super::parser::Event;
use super::parser::Marker;
use super::parser::Parser;
use super::parser::expected_found;
use super::parser::unmatched;
use super::tree::SyntaxKind;

/// Helper macros for the parser implementation.
mod macros {
    /// A macro for expecting the next token be a particular token.
    ///
    /// Returns a diagnostic if the token is not the specified token.
    macro_rules! expected {
        ($parser:ident, $marker:ident, $token:expr) => {
            if let Err(e) = $parser.expect($token) {
                return Err(($marker, e));
            }
        };
        ($parser:ident, $marker:ident, $token:expr, $name:literal) => {
            if let Err(e) = $parser.expect_with_name($token, $name) {
                return Err(($marker, e));
            }
        };
    }

    /// A macro for expecting the next token be in the given token set.
    ///
    /// Returns an error if the token is not the specified token.
    macro_rules! expected_in {
        ($parser:ident, $marker:ident, $set:ident $(, $names:literal)+ $(,)?) => {
            if let Err(e) = $parser.expect_in($set, &[$($names),+]) {
                return Err(($marker, e));
            }
        };
    }

    /// A macro for expecting that a given function parses the next node.
    ///
    /// Returns an error if the given function returns an error.
    macro_rules! expected_fn {
        ($parser:ident, $marker:ident, $func:ident) => {
            let inner = $parser.start();
            if let Err((inner, e)) = $func($parser, inner) {
                inner.abandon($parser);
                return Err(($marker, e));
            }
        };
    }

    pub(crate) use expected;
    pub(crate) use expected_fn;
    pub(crate) use expected_in;
}

use macros::expected;
use macros::expected_fn;
use macros::expected_in;

/// The recovery set at the top level of a compilation unit.
const TOP_RECOVERY_SET: TokenSet = TokenSet::new(&[Token::ClassKeyword as u8]);

/// A set of tokens that may start a type.
const TYPE_START_SET: TokenSet = TokenSet::new(&[
    Token::BooleanKeyword as u8,
    Token::IntKeyword as u8,
    Token::DoubleKeyword as u8,
    Token::VoidKeyword as u8,
    Token::Ident as u8,
]);

/// The recovery set for class members.
const MEMBER_RECOVERY_SET: TokenSet =
    TYPE_START_SET.union(TokenSet::new(&[Token::CloseBrace as u8]));

/// A set of tokens that may name a declarator.
const DECLARATOR_NAME_SET: TokenSet = TokenSet::new(&[
    Token::Ident as u8,
    Token::PostValueName as u8,
    Token::MidValueName as u8,
]);

/// The recovery set for statements.
const STATEMENT_RECOVERY_SET: TokenSet = TokenSet::new(&[
    Token::Semicolon as u8,
    Token::CloseBrace as u8,
    Token::OpenBrace as u8,
    Token::IfKeyword as u8,
    Token::WhileKeyword as u8,
    Token::ReturnKeyword as u8,
    Token::MeansKeyword as u8,
]);

/// The set of tokens until a close parenthesis.
const UNTIL_CLOSE_PAREN: TokenSet = TokenSet::new(&[Token::CloseParen as u8]);

/// The recovery set for expressions.
const EXPR_RECOVERY_SET: TokenSet = TokenSet::new(&[
    Token::CloseParen as u8,
    Token::Semicolon as u8,
    Token::Comma as u8,
]);

/// The recovery set for parameters.
const PARAM_RECOVERY_SET: TokenSet =
    TokenSet::new(&[Token::CloseParen as u8, Token::Comma as u8]);

/// A set of tokens that may start an atomic expression.
const ATOM_EXPECTED_SET: TokenSet = TokenSet::new(&[
    Token::Integer as u8,
    Token::Float as u8,
    Token::TrueKeyword as u8,
    Token::FalseKeyword as u8,
    Token::Ident as u8,
    Token::PreValueName as u8,
    Token::PostValueName as u8,
    Token::MidValueName as u8,
    Token::ThisKeyword as u8,
    // The undecorated final value of a method may be referenced in
    // claims when the compatibility switch allows it.
    Token::ReturnKeyword as u8,
    Token::OpenParen as u8,
]);

/// A set of tokens for prefix operators.
const PREFIX_OPERATOR_EXPECTED_SET: TokenSet =
    TokenSet::new(&[Token::Exclamation as u8, Token::Minus as u8]);

/// A set of tokens for infix operators.
const INFIX_OPERATOR_EXPECTED_SET: TokenSet = TokenSet::new(&[
    Token::QuestionMark as u8,
    Token::Implication as u8,
    Token::ReverseImplication as u8,
    Token::Biconditional as u8,
    Token::BiconditionalNegation as u8,
    Token::Pipe as u8,
    Token::LogicalOr as u8,
    Token::Ampersand as u8,
    Token::LogicalAnd as u8,
    Token::Assignment as u8,
    Token::NotEqual as u8,
    Token::Less as u8,
    Token::LessEqual as u8,
    Token::Greater as u8,
    Token::GreaterEqual as u8,
    Token::InstanceofKeyword as u8,
    Token::Plus as u8,
    Token::Minus as u8,
    Token::Asterisk as u8,
    Token::Slash as u8,
    Token::Percent as u8,
]);

/// A set of tokens for postfix operators.
const POSTFIX_OPERATOR_EXPECTED_SET: TokenSet = TokenSet::new(&[
    Token::OpenParen as u8,
    Token::OpenBracket as u8,
    Token::Dot as u8,
]);

/// Represents the associativity of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Associativity {
    /// The operation is left-associative.
    Left,
    /// The operation is right-associative.
    Right,
}

/// Gets the infix precedence, syntax kind, and associativity of the given
/// token.
///
/// The conditional (`? :`) and `instanceof` operations are special-cased
/// by the caller and do not appear here.
fn infix_precedence(token: Token) -> (u8, SyntaxKind, Associativity) {
    match token {
        Token::Implication => (2, SyntaxKind::ImplicationExprNode, Associativity::Left),
        Token::ReverseImplication => (
            2,
            SyntaxKind::ReverseImplicationExprNode,
            Associativity::Left,
        ),
        Token::Biconditional => (2, SyntaxKind::BiconditionalExprNode, Associativity::Left),
        Token::BiconditionalNegation => (
            2,
            SyntaxKind::BiconditionalNegationExprNode,
            Associativity::Left,
        ),
        Token::Pipe | Token::LogicalOr => (3, SyntaxKind::DisjunctExprNode, Associativity::Left),
        Token::Ampersand | Token::LogicalAnd => {
            (4, SyntaxKind::ConjunctExprNode, Associativity::Left)
        }
        Token::Assignment => (5, SyntaxKind::EqualityExprNode, Associativity::Left),
        Token::NotEqual => (5, SyntaxKind::InequalityExprNode, Associativity::Left),
        Token::Less => (6, SyntaxKind::LessExprNode, Associativity::Left),
        Token::LessEqual => (6, SyntaxKind::LessEqualExprNode, Associativity::Left),
        Token::Greater => (6, SyntaxKind::GreaterExprNode, Associativity::Left),
        Token::GreaterEqual => (6, SyntaxKind::GreaterEqualExprNode, Associativity::Left),
        Token::Plus => (7, SyntaxKind::AdditionExprNode, Associativity::Left),
        Token::Minus => (7, SyntaxKind::SubtractionExprNode, Associativity::Left),
        Token::Asterisk => (8, SyntaxKind::MultiplicationExprNode, Associativity::Left),
        Token::Slash => (8, SyntaxKind::DivisionExprNode, Associativity::Left),
        Token::Percent => (8, SyntaxKind::ModuloExprNode, Associativity::Left),
        _ => panic!("token is not an infix operator"),
    }
}

/// Gets the prefix precedence, syntax kind, and associativity of the given
/// token.
fn prefix_precedence(token: Token) -> (u8, SyntaxKind, Associativity) {
    match token {
        Token::Exclamation => (9, SyntaxKind::LogicalNotExprNode, Associativity::Right),
        Token::Minus => (9, SyntaxKind::NegationExprNode, Associativity::Right),
        _ => panic!("token is not a prefix operator"),
    }
}

/// The precedence of postfix operations (call, index, access).
const POSTFIX_PRECEDENCE: u8 = 10;

/// The precedence of the conditional (`? :`) operation.
const CONDITIONAL_PRECEDENCE: u8 = 1;

/// The precedence of the `instanceof` operation.
const INSTANCEOF_PRECEDENCE: u8 = 6;

/// Parses a TrueJ compilation unit.
///
/// Returns the parser events that result from parsing the unit along with
/// any diagnostics.
pub fn compilation_unit(mut parser: Parser<'_>) -> (Vec<Event>, Vec<Diagnostic>) {
    let root = parser.start();
    while parser.peek().is_some() {
        let marker = parser.start();
        if let Err((marker, e)) = class_definition(&mut parser, marker) {
            parser.recover(e, TOP_RECOVERY_SET);
            marker.abandon(&mut parser);
        }
    }

    // Flush any remaining buffered trivia before finishing
    assert!(parser.next().is_none(), "parser should be at end of input");
    root.complete(&mut parser, SyntaxKind::RootNode);
    let output = parser.finish();
    (output.events, output.diagnostics)
}

/// Parses a class definition.
fn class_definition(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    expected!(parser, marker, Token::ClassKeyword);
    expected!(parser, marker, Token::Ident, "class name");
    let open = match parser.expect(Token::OpenBrace) {
        Ok(span) => span,
        Err(e) => return Err((marker, e)),
    };

    loop {
        match parser.peek() {
            Some((Token::CloseBrace, _)) => {
                parser.next();
                break;
            }
            Some(_) => {
                let member = parser.start();
                if let Err((member, e)) = class_member(parser, member) {
                    parser.recover(e, MEMBER_RECOVERY_SET);
                    member.abandon(parser);
                }
            }
            None => {
                return Err((
                    marker,
                    unmatched("`{` symbol", open, "`}` symbol", "end of input", parser.span()),
                ));
            }
        }
    }

    marker.complete(parser, SyntaxKind::ClassDefinitionNode);
    Ok(())
}

/// Parses a class member (a field declaration or a method definition).
///
/// The two forms share a leading type; the member kind is decided by the
/// token following the member name.
fn class_member(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    expected_fn!(parser, marker, ty);

    let is_method = matches!(
        parser.peek2(),
        Some(p) if p.first.0 == Token::Ident && p.second.0 == Token::OpenParen
    );

    if is_method {
        method_definition(parser, marker)
    } else {
        field_declaration(parser, marker)
    }
}

/// Parses a method definition; the return type has already been parsed.
fn method_definition(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    expected!(parser, marker, Token::Ident, "method name");
    expected!(parser, marker, Token::OpenParen);
    parser.delimited(
        Some(Token::Comma),
        UNTIL_CLOSE_PAREN,
        PARAM_RECOVERY_SET,
        parameter,
    );
    expected!(parser, marker, Token::CloseParen);
    expected_fn!(parser, marker, block);

    // A trailing `means` statement gives the method's meaning.
    if let Some((Token::MeansKeyword, _)) = parser.peek() {
        expected_fn!(parser, marker, means_statement);
    }

    marker.complete(parser, SyntaxKind::MethodDefinitionNode);
    Ok(())
}

/// Parses a method parameter.
fn parameter(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    expected_fn!(parser, marker, ty);
    expected_in!(parser, marker, DECLARATOR_NAME_SET, "parameter name");
    marker.complete(parser, SyntaxKind::ParameterNode);
    Ok(())
}

/// Parses a field declaration; the field type has already been parsed.
fn field_declaration(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    loop {
        expected_fn!(parser, marker, declarator);
        if !parser.next_if(Token::Comma) {
            break;
        }
    }

    expected!(parser, marker, Token::Semicolon);
    marker.complete(parser, SyntaxKind::FieldDeclarationNode);
    Ok(())
}

/// Parses a declarator within a field or local declaration.
fn declarator(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    expected_in!(
        parser,
        marker,
        DECLARATOR_NAME_SET,
        "variable name",
        "post-decorated value name",
    );

    if parser.next_if(Token::Assignment) {
        expected_fn!(parser, marker, expr);
    }

    marker.complete(parser, SyntaxKind::DeclaratorNode);
    Ok(())
}

/// Parses a type.
fn ty(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    match parser.peek() {
        Some((
            Token::BooleanKeyword | Token::IntKeyword | Token::DoubleKeyword | Token::VoidKeyword,
            _,
        )) => {
            parser.next();
            marker.complete(parser, SyntaxKind::PrimitiveTypeNode);
            Ok(())
        }
        Some((Token::Ident, _)) => {
            parser.next();
            marker.complete(parser, SyntaxKind::TypeRefNode);
            Ok(())
        }
        found => {
            let (found, span) = found
                .map(|(t, s)| (Some(t.describe()), s))
                .unwrap_or_else(|| (None, parser.span()));
            Err((marker, expected_found("type", found, span)))
        }
    }
}

/// Parses a block.
fn block(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    let open = match parser.expect(Token::OpenBrace) {
        Ok(span) => span,
        Err(e) => return Err((marker, e)),
    };

    loop {
        match parser.peek() {
            Some((Token::CloseBrace, _)) => {
                parser.next();
                break;
            }
            Some(_) => {
                let statement = parser.start();
                if let Err((statement, e)) = block_statement(parser, statement) {
                    parser.recover(e, STATEMENT_RECOVERY_SET);
                    statement.abandon(parser);
                }
            }
            None => {
                return Err((
                    marker,
                    unmatched("`{` symbol", open, "`}` symbol", "end of input", parser.span()),
                ));
            }
        }
    }

    marker.complete(parser, SyntaxKind::BlockNode);
    Ok(())
}

/// Parses a single block statement (a statement or a local declaration).
fn block_statement(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    match parser.peek() {
        Some((Token::OpenBrace, _)) => block(parser, marker),
        Some((Token::IfKeyword, _)) => if_statement(parser, marker),
        Some((Token::WhileKeyword, _)) => while_statement(parser, marker),
        Some((Token::ReturnKeyword, _)) => return_statement(parser, marker),
        Some((Token::MeansKeyword, _)) => means_statement(parser, marker),
        Some((Token::Semicolon, _)) => empty_statement(parser, marker),
        Some((
            Token::BooleanKeyword | Token::IntKeyword | Token::DoubleKeyword | Token::VoidKeyword,
            _,
        )) => local_declaration(parser, marker),
        Some((Token::PostValueName | Token::MidValueName | Token::ThisKeyword, _)) => {
            assignment(parser, marker)
        }
        Some((Token::Ident, _)) => {
            // An identifier may start a local declaration with a type
            // reference or an assignment to an undecorated variable.
            match parser.peek2() {
                Some(p) if p.second.0 == Token::Assignment => assignment(parser, marker),
                _ => local_declaration(parser, marker),
            }
        }
        found => {
            let (found, span) = found
                .map(|(t, s)| (Some(t.describe()), s))
                .unwrap_or_else(|| (None, parser.span()));
            Err((marker, expected_found("statement", found, span)))
        }
    }
}

/// Parses a local declaration statement.
fn local_declaration(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    expected_fn!(parser, marker, ty);

    loop {
        expected_fn!(parser, marker, declarator);
        if !parser.next_if(Token::Comma) {
            break;
        }
    }

    expected!(parser, marker, Token::Semicolon);
    marker.complete(parser, SyntaxKind::LocalDeclarationNode);
    Ok(())
}

/// Parses an assignment statement.
fn assignment(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    expected_fn!(parser, marker, assignment_target);
    expected!(parser, marker, Token::Assignment);
    expected_fn!(parser, marker, expr);
    expected!(parser, marker, Token::Semicolon);
    marker.complete(parser, SyntaxKind::AssignmentNode);
    Ok(())
}

/// Parses the target of an assignment statement.
///
/// The target is a value name, optionally qualified by `this.`.
fn assignment_target(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    match parser.peek() {
        Some((Token::ThisKeyword, _)) => {
            let this = parser.start();
            parser.next();
            this.complete(parser, SyntaxKind::ThisRefNode);
            expected!(parser, marker, Token::Dot);
            expected_fn!(parser, marker, name_ref);
            marker.complete(parser, SyntaxKind::AccessExprNode);
            Ok(())
        }
        _ => name_ref(parser, marker),
    }
}

/// Parses a name reference from any name token.
fn name_ref(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    match parser.peek() {
        Some((
            Token::Ident | Token::PreValueName | Token::PostValueName | Token::MidValueName,
            _,
        )) => {
            parser.next();
            marker.complete(parser, SyntaxKind::NameRefNode);
            Ok(())
        }
        found => {
            let (found, span) = found
                .map(|(t, s)| (Some(t.describe()), s))
                .unwrap_or_else(|| (None, parser.span()));
            Err((marker, expected_found("value name", found, span)))
        }
    }
}

/// Parses an `if` statement.
fn if_statement(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    parser.require(Token::IfKeyword);
    expected!(parser, marker, Token::OpenParen);
    expected_fn!(parser, marker, expr);
    expected!(parser, marker, Token::CloseParen);
    expected_fn!(parser, marker, block_statement);

    if parser.next_if(Token::ElseKeyword) {
        expected_fn!(parser, marker, block_statement);
    }

    marker.complete(parser, SyntaxKind::IfStatementNode);
    Ok(())
}

/// Parses a `while` statement.
fn while_statement(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    parser.require(Token::WhileKeyword);
    expected!(parser, marker, Token::OpenParen);
    expected_fn!(parser, marker, expr);
    expected!(parser, marker, Token::CloseParen);
    expected_fn!(parser, marker, block_statement);
    marker.complete(parser, SyntaxKind::WhileStatementNode);
    Ok(())
}

/// Parses a `return` statement.
fn return_statement(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    parser.require(Token::ReturnKeyword);

    if !matches!(parser.peek(), Some((Token::Semicolon, _))) {
        expected_fn!(parser, marker, expr);
    }

    expected!(parser, marker, Token::Semicolon);
    marker.complete(parser, SyntaxKind::ReturnStatementNode);
    Ok(())
}

/// Parses a `means` statement.
fn means_statement(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    parser.require(Token::MeansKeyword);
    expected!(parser, marker, Token::OpenParen);
    expected_fn!(parser, marker, expr);
    expected!(parser, marker, Token::CloseParen);
    expected!(parser, marker, Token::Semicolon);
    marker.complete(parser, SyntaxKind::MeansStatementNode);
    Ok(())
}

/// Parses an empty statement.
fn empty_statement(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    parser.require(Token::Semicolon);
    marker.complete(parser, SyntaxKind::EmptyStatementNode);
    Ok(())
}

/// Parses an expression.
#[inline]
fn expr(parser: &mut Parser<'_>, marker: Marker) -> Result<(), (Marker, Diagnostic)> {
    expr_with_precedence(parser, marker, 0)?;
    Ok(())
}

/// Parses an expression with the given minimum precedence.
///
/// See <https://matklad.github.io/2020/04/13/simple-but-powerful-pratt-parsing.html>
fn expr_with_precedence(
    parser: &mut Parser<'_>,
    marker: Marker,
    min_precedence: u8,
) -> Result<CompletedMarker, (Marker, Diagnostic)> {
    // First parse an atom or a prefix operation as the left-hand side
    let mut lhs = match parser.peek() {
        Some((token, _)) if ATOM_EXPECTED_SET.contains(token.into_raw()) => {
            let lhs = parser.start();
            match atom_expr(parser, lhs, token) {
                Ok(lhs) => lhs,
                Err((lhs, e)) => {
                    lhs.abandon(parser);
                    return Err((marker, e));
                }
            }
        }
        Some((token, _)) if PREFIX_OPERATOR_EXPECTED_SET.contains(token.into_raw()) => {
            let prefix = parser.start();
            parser.next();
            let rhs = parser.start();
            let (precedence, kind, associativity) = prefix_precedence(token);
            match expr_with_precedence(
                parser,
                rhs,
                // Add one to the precedence for left-associative operators
                match associativity {
                    Associativity::Left => precedence + 1,
                    Associativity::Right => precedence,
                },
            ) {
                Ok(_) => prefix.complete(parser, kind),
                Err((rhs, e)) => {
                    prefix.abandon(parser);
                    rhs.abandon(parser);
                    return Err((marker, e));
                }
            }
        }
        found => {
            let (found, span) = found
                .map(|(t, s)| (Some(t.describe()), s))
                .unwrap_or_else(|| (None, parser.span()));
            return Err((marker, expected_found("expression", found, span)));
        }
    };

    // Extend the parent chain of the left-hand side to the provided marker.
    lhs = lhs.extend_to(parser, marker);

    loop {
        // Check for either an infix or postfix operation
        match parser.peek() {
            Some((Token::QuestionMark, _)) => {
                if CONDITIONAL_PRECEDENCE < min_precedence {
                    break;
                }

                let conditional = lhs.precede(parser);
                parser.next();
                lhs = match conditional_rest(parser, conditional) {
                    Ok(marker) => marker,
                    Err(e) => return Err(e),
                };
            }
            Some((Token::InstanceofKeyword, _)) => {
                if INSTANCEOF_PRECEDENCE < min_precedence {
                    break;
                }

                let instanceof = lhs.precede(parser);
                parser.next();
                lhs = match instanceof_rest(parser, instanceof) {
                    Ok(marker) => marker,
                    Err(e) => return Err(e),
                };
            }
            Some((token, _)) if INFIX_OPERATOR_EXPECTED_SET.contains(token.into_raw()) => {
                // The operation is an infix operation; check the precedence
                // level
                let (precedence, kind, associativity) = infix_precedence(token);
                if precedence < min_precedence {
                    break;
                }

                let infix = lhs.precede(parser);
                parser.next();

                // Recurse for the right-hand side
                let rhs = parser.start();
                if let Err((rhs, e)) = expr_with_precedence(
                    parser,
                    rhs,
                    // Add one to the precedence for left-associative operators
                    match associativity {
                        Associativity::Left => precedence + 1,
                        Associativity::Right => precedence,
                    },
                ) {
                    rhs.abandon(parser);
                    return Err((infix, e));
                }

                lhs = infix.complete(parser, kind);
            }
            Some((token, _)) if POSTFIX_OPERATOR_EXPECTED_SET.contains(token.into_raw()) => {
                if POSTFIX_PRECEDENCE < min_precedence {
                    break;
                }

                // Call the operation-specific parse function
                let postfix = lhs.precede(parser);
                let res = match token {
                    Token::OpenParen => call_expr(parser, postfix),
                    Token::OpenBracket => index_expr(parser, postfix),
                    Token::Dot => access_expr(parser, postfix),
                    _ => panic!("unexpected postfix operator"),
                };

                lhs = match res {
                    Ok(marker) => marker,
                    Err(e) => return Err(e),
                };
            }
            _ => break,
        }
    }

    Ok(lhs)
}

/// Parses the remainder of a conditional (`? :`) expression.
///
/// The condition and `?` have already been consumed.
fn conditional_rest(
    parser: &mut Parser<'_>,
    marker: Marker,
) -> Result<CompletedMarker, (Marker, Diagnostic)> {
    let arm = parser.start();
    if let Err((arm, e)) = expr(parser, arm) {
        arm.abandon(parser);
        return Err((marker, e));
    }

    expected!(parser, marker, Token::Colon);

    let arm = parser.start();
    if let Err((arm, e)) = expr(parser, arm) {
        arm.abandon(parser);
        return Err((marker, e));
    }

    Ok(marker.complete(parser, SyntaxKind::ConditionalExprNode))
}

/// Parses the remainder of an `instanceof` expression.
///
/// The operand and `instanceof` keyword have already been consumed.
fn instanceof_rest(
    parser: &mut Parser<'_>,
    marker: Marker,
) -> Result<CompletedMarker, (Marker, Diagnostic)> {
    let target = parser.start();
    if let Err((target, e)) = ty(parser, target) {
        target.abandon(parser);
        return Err((marker, e));
    }

    Ok(marker.complete(parser, SyntaxKind::InstanceofExprNode))
}

/// Parses an atomic expression such as a literal or a name reference.
fn atom_expr(
    parser: &mut Parser<'_>,
    marker: Marker,
    peeked: Token,
) -> Result<CompletedMarker, (Marker, Diagnostic)> {
    match peeked {
        Token::Integer => {
            parser.next();
            Ok(marker.complete(parser, SyntaxKind::LiteralIntegerNode))
        }
        Token::Float => {
            parser.next();
            Ok(marker.complete(parser, SyntaxKind::LiteralFloatNode))
        }
        Token::TrueKeyword | Token::FalseKeyword => {
            parser.next();
            Ok(marker.complete(parser, SyntaxKind::LiteralBooleanNode))
        }
        Token::Ident
        | Token::PreValueName
        | Token::PostValueName
        | Token::MidValueName
        | Token::ReturnKeyword => {
            parser.next();
            Ok(marker.complete(parser, SyntaxKind::NameRefNode))
        }
        Token::ThisKeyword => {
            parser.next();
            Ok(marker.complete(parser, SyntaxKind::ThisRefNode))
        }
        Token::OpenParen => paren_expr(parser, marker),
        _ => unreachable!(),
    }
}

/// Parses a parenthesized expression.
fn paren_expr(
    parser: &mut Parser<'_>,
    marker: Marker,
) -> Result<CompletedMarker, (Marker, Diagnostic)> {
    let open = match parser.expect(Token::OpenParen) {
        Ok(span) => span,
        Err(e) => return Err((marker, e)),
    };

    expected_fn!(parser, marker, expr);

    match parser.next() {
        Some((Token::CloseParen, _)) => {
            Ok(marker.complete(parser, SyntaxKind::ParenthesizedExprNode))
        }
        found => {
            let (found, span) = found
                .map(|(t, s)| (t.describe(), s))
                .unwrap_or_else(|| ("end of input", parser.span()));

            Err((
                marker,
                unmatched("`(` symbol", open, "`)` symbol", found, span),
            ))
        }
    }
}

/// Parses a call expression.
///
/// The callee has already been parsed.
fn call_expr(
    parser: &mut Parser<'_>,
    marker: Marker,
) -> Result<CompletedMarker, (Marker, Diagnostic)> {
    parser.require(Token::OpenParen);
    parser.delimited(
        Some(Token::Comma),
        UNTIL_CLOSE_PAREN,
        EXPR_RECOVERY_SET,
        expr,
    );
    expected!(parser, marker, Token::CloseParen);
    Ok(marker.complete(parser, SyntaxKind::CallExprNode))
}

/// Parses an index expression.
///
/// The base has already been parsed.
fn index_expr(
    parser: &mut Parser<'_>,
    marker: Marker,
) -> Result<CompletedMarker, (Marker, Diagnostic)> {
    parser.require(Token::OpenBracket);
    expected_fn!(parser, marker, expr);
    expected!(parser, marker, Token::CloseBracket);
    Ok(marker.complete(parser, SyntaxKind::IndexExprNode))
}

/// Parses an access expression.
///
/// The base has already been parsed.
fn access_expr(
    parser: &mut Parser<'_>,
    marker: Marker,
) -> Result<CompletedMarker, (Marker, Diagnostic)> {
    parser.require(Token::Dot);
    expected_fn!(parser, marker, name_ref);
    Ok(marker.complete(parser, SyntaxKind::AccessExprNode))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::SyntaxTree;

    #[test]
    fn empty_class() {
        let (tree, diagnostics) = SyntaxTree::parse("class Empty { }");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(format!("{tree}"), "class Empty { }");
    }

    #[test]
    fn swap_method() {
        let source = "class BlockMeaning1 {
  int a, b, startingA;

  void swap() {
    startingA' = 'a;
    a' = 'b;
    b' = startingA';
  }
  means(startingA' = 'a & a' = 'b & b' = startingA');
}
";
        let (tree, diagnostics) = SyntaxTree::parse(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(format!("{tree}"), source);
    }

    #[test]
    fn if_else_statement() {
        let source = "class Pair {
  int a, b;

  void sort() {
    if ('a > 'b) { a' = 'b; b' = 'a; } else { a' = 'a; b' = 'b; }
    means (a' <= b');
  }
}
";
        let (tree, diagnostics) = SyntaxTree::parse(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(format!("{tree}"), source);
    }

    #[test]
    fn missing_semicolon() {
        let (_, diagnostics) = SyntaxTree::parse("class C { void m() { a' = 'b } }");
        assert!(!diagnostics.is_empty());
    }
}
