//! Parsing of the textual formula vocabulary emitted by the proof pass.

use crate::formula::CmpOp;
use crate::formula::Formula;
use crate::formula::FormulaError;
use crate::formula::Term;

/// Represents a token of the formula text.
#[derive(Debug, Clone, PartialEq)]
enum Tok {
    /// A quoted atom; the quotes are stripped.
    Atom(String),
    /// A bare identifier.
    Ident(String),
    /// An integer numeral.
    Int(i64),
    /// A decimal numeral.
    Dec(String),
    /// The `(` symbol.
    Open,
    /// The `)` symbol.
    Close,
    /// The `,` symbol.
    Comma,
    /// An operator.
    Op(&'static str),
}

/// The operators of the vocabulary, longest first so that maximal munch
/// applies.
const OPERATORS: &[&str] = &[
    "===", "==>", "=#=", "<==", "/\\", "\\/", "#=", "=<", "<=", ">=", "=", "<", ">", "+", "-",
    "*", "/", "%",
];

/// Tokenizes formula text.
fn tokenize(source: &str) -> Result<Vec<Tok>, FormulaError> {
    let mut tokens = Vec::new();
    let mut rest = source;

    'outer: while !rest.is_empty() {
        let c = rest.chars().next().expect("non-empty");

        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
            continue;
        }

        // `%` starts a line comment
        if c == '%' {
            match rest.find('\n') {
                Some(index) => {
                    rest = &rest[index + 1..];
                    continue;
                }
                None => break,
            }
        }

        if c == '\'' {
            let inner = &rest[1..];
            match inner.find('\'') {
                Some(index) => {
                    tokens.push(Tok::Atom(inner[..index].to_string()));
                    rest = &inner[index + 1..];
                    continue;
                }
                None => return Err(FormulaError::new("unterminated quoted atom")),
            }
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let end = rest
                .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                .unwrap_or(rest.len());
            tokens.push(Tok::Ident(rest[..end].to_string()));
            rest = &rest[end..];
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && rest[1..].starts_with(|c: char| c.is_ascii_digit()))
        {
            let mut end = 0;
            let mut seen_dot = false;
            for (i, c) in rest.char_indices() {
                if c.is_ascii_digit() {
                    end = i + 1;
                } else if c == '.' && !seen_dot {
                    seen_dot = true;
                    end = i + 1;
                } else {
                    break;
                }
            }

            let text = &rest[..end];
            if seen_dot {
                tokens.push(Tok::Dec(text.to_string()));
            } else {
                tokens.push(Tok::Int(text.parse().map_err(|_| {
                    FormulaError::new(format!("integer literal `{text}` is out of range"))
                })?));
            }
            rest = &rest[end..];
            continue;
        }

        match c {
            '(' => {
                tokens.push(Tok::Open);
                rest = &rest[1..];
                continue;
            }
            ')' => {
                tokens.push(Tok::Close);
                rest = &rest[1..];
                continue;
            }
            ',' => {
                tokens.push(Tok::Comma);
                rest = &rest[1..];
                continue;
            }
            _ => {}
        }

        for op in OPERATORS {
            if rest.starts_with(op) {
                tokens.push(Tok::Op(op));
                rest = &rest[op.len()..];
                continue 'outer;
            }
        }

        return Err(FormulaError::new(format!("unexpected character `{c}`")));
    }

    Ok(tokens)
}

/// The intermediate parse representation.
///
/// The vocabulary does not syntactically separate terms from formulas
/// (an atom may be an integer-valued variable or a boolean proposition,
/// and `-` is both logical negation and arithmetic negation), so parsing
/// first builds this neutral tree and then resolves each node as a
/// formula or a term from context.
#[derive(Debug, Clone, PartialEq)]
enum Ast {
    /// An atom (quoted or bare).
    Atom(String),
    /// An integer numeral.
    Int(i64),
    /// A decimal numeral.
    Dec(String),
    /// A functor application.
    App(String, Vec<Ast>),
    /// The `true` literal.
    True,
    /// The `false` literal.
    False,
    /// A `-` negation.
    Neg(Box<Ast>),
    /// A binary operation.
    Binary(&'static str, Box<Ast>, Box<Ast>),
}

/// Implements the formula text parser.
struct FormulaParser {
    /// The tokens being parsed.
    tokens: Vec<Tok>,
    /// The current position in the token list.
    pos: usize,
}

impl FormulaParser {
    /// Peeks at the next token.
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    /// Consumes the next token.
    fn next(&mut self) -> Option<Tok> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Gets the binding power of an infix operator.
    fn binding_power(op: &str) -> u8 {
        match op {
            "==>" | "<==" => 1,
            "===" | "=#=" => 2,
            "\\/" => 3,
            "/\\" => 4,
            "=" | "#=" | "<" | "=<" | "<=" | ">" | ">=" => 5,
            "+" | "-" => 6,
            "*" | "/" | "%" => 7,
            _ => unreachable!("unknown operator"),
        }
    }

    /// Parses an expression with the given minimum binding power.
    fn expr(&mut self, min_bp: u8) -> Result<Ast, FormulaError> {
        let mut lhs = self.primary()?;

        while let Some(Tok::Op(op)) = self.peek() {
            let op = *op;
            let bp = Self::binding_power(op);
            if bp < min_bp {
                break;
            }

            self.next();
            let rhs = self.expr(bp + 1)?;
            lhs = Ast::Binary(op, Box::new(lhs), Box::new(rhs));
        }

        Ok(lhs)
    }

    /// Parses a primary expression.
    fn primary(&mut self) -> Result<Ast, FormulaError> {
        match self.next() {
            Some(Tok::Atom(name)) => Ok(Ast::Atom(name)),
            Some(Tok::Ident(name)) => match name.as_str() {
                "true" => Ok(Ast::True),
                "false" => Ok(Ast::False),
                _ => {
                    if self.peek() == Some(&Tok::Open) {
                        self.next();
                        let mut args = Vec::new();
                        if self.peek() != Some(&Tok::Close) {
                            loop {
                                args.push(self.expr(0)?);
                                match self.next() {
                                    Some(Tok::Comma) => continue,
                                    Some(Tok::Close) => break,
                                    _ => {
                                        return Err(FormulaError::new(
                                            "expected `,` or `)` in argument list",
                                        ));
                                    }
                                }
                            }
                        } else {
                            self.next();
                        }
                        Ok(Ast::App(name, args))
                    } else {
                        Ok(Ast::Atom(name))
                    }
                }
            },
            Some(Tok::Int(value)) => Ok(Ast::Int(value)),
            Some(Tok::Dec(value)) => Ok(Ast::Dec(value)),
            Some(Tok::Open) => {
                let inner = self.expr(0)?;
                match self.next() {
                    Some(Tok::Close) => Ok(inner),
                    _ => Err(FormulaError::new("expected `)`")),
                }
            }
            Some(Tok::Op("-")) => {
                let operand = self.expr(8)?;
                Ok(Ast::Neg(Box::new(operand)))
            }
            Some(token) => Err(FormulaError::new(format!("unexpected token {token:?}"))),
            None => Err(FormulaError::new("unexpected end of formula")),
        }
    }
}

/// Resolves an intermediate node as a formula.
fn to_formula(ast: Ast) -> Result<Formula, FormulaError> {
    match ast {
        Ast::True => Ok(Formula::True),
        Ast::False => Ok(Formula::False),
        Ast::Atom(name) => Ok(Formula::Prop(Term::Atom(name))),
        Ast::App(name, args) => Ok(Formula::Pred(
            name,
            args.into_iter().map(to_term).collect::<Result<_, _>>()?,
        )),
        Ast::Int(_) | Ast::Dec(_) => {
            Err(FormulaError::new("expected a formula, found a numeral"))
        }
        Ast::Neg(inner) => Ok(Formula::Not(Box::new(to_formula(*inner)?))),
        Ast::Binary(op, lhs, rhs) => match op {
            "/\\" => Ok(Formula::and(to_formula(*lhs)?, to_formula(*rhs)?)),
            "\\/" => Ok(Formula::or(to_formula(*lhs)?, to_formula(*rhs)?)),
            "==>" => Ok(Formula::Implies(
                Box::new(to_formula(*lhs)?),
                Box::new(to_formula(*rhs)?),
            )),
            "<==" => Ok(Formula::Implies(
                Box::new(to_formula(*rhs)?),
                Box::new(to_formula(*lhs)?),
            )),
            "===" => Ok(Formula::Iff(
                Box::new(to_formula(*lhs)?),
                Box::new(to_formula(*rhs)?),
            )),
            "=#=" => Ok(Formula::Xor(
                Box::new(to_formula(*lhs)?),
                Box::new(to_formula(*rhs)?),
            )),
            "=" => Ok(Formula::Cmp(CmpOp::Eq, to_term(*lhs)?, to_term(*rhs)?)),
            "#=" => Ok(Formula::Cmp(CmpOp::Ne, to_term(*lhs)?, to_term(*rhs)?)),
            "<" => Ok(Formula::Cmp(CmpOp::Lt, to_term(*lhs)?, to_term(*rhs)?)),
            "=<" | "<=" => Ok(Formula::Cmp(CmpOp::Le, to_term(*lhs)?, to_term(*rhs)?)),
            ">" => Ok(Formula::Cmp(CmpOp::Gt, to_term(*lhs)?, to_term(*rhs)?)),
            ">=" => Ok(Formula::Cmp(CmpOp::Ge, to_term(*lhs)?, to_term(*rhs)?)),
            "+" | "-" | "*" | "/" | "%" => {
                Err(FormulaError::new("expected a formula, found a term"))
            }
            _ => unreachable!("unknown operator"),
        },
    }
}

/// Resolves an intermediate node as a term.
fn to_term(ast: Ast) -> Result<Term, FormulaError> {
    match ast {
        Ast::Atom(name) => Ok(Term::Atom(name)),
        Ast::Int(value) => Ok(Term::Int(value)),
        Ast::Dec(value) => Ok(Term::Dec(value)),
        Ast::App(name, args) => Ok(Term::App(
            name,
            args.into_iter().map(to_term).collect::<Result<_, _>>()?,
        )),
        Ast::Neg(inner) => Ok(Term::App("-".to_string(), vec![to_term(*inner)?])),
        Ast::Binary(op @ ("+" | "-" | "*" | "/" | "%"), lhs, rhs) => Ok(Term::App(
            op.to_string(),
            vec![to_term(*lhs)?, to_term(*rhs)?],
        )),
        Ast::True | Ast::False | Ast::Binary(..) => {
            Err(FormulaError::new("expected a term, found a formula"))
        }
    }
}

/// Parses formula text into a [`Formula`].
pub(crate) fn parse_formula(source: &str) -> Result<Formula, FormulaError> {
    let tokens = tokenize(source)?;
    let mut parser = FormulaParser { tokens, pos: 0 };
    let ast = parser.expr(0)?;
    if parser.pos != parser.tokens.len() {
        return Err(FormulaError::new("trailing tokens after formula"));
    }

    to_formula(ast)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn conjunction_of_equalities() {
        let formula = parse_formula("('a^' = '^b') /\\ ('b^' = '^a')").unwrap();
        assert_eq!(
            formula,
            Formula::and(
                Formula::eq(Term::atom("a^"), Term::atom("^b")),
                Formula::eq(Term::atom("b^"), Term::atom("^a")),
            )
        );
    }

    #[test]
    fn negation_of_proposition() {
        let formula = parse_formula("(- 'this.^flag')").unwrap();
        assert_eq!(
            formula,
            Formula::not(Formula::Prop(Term::atom("this.^flag")))
        );
    }

    #[test]
    fn type_fact() {
        let formula = parse_formula("type(int, 'this.a^')").unwrap();
        assert_eq!(
            formula,
            Formula::Pred(
                "type".to_string(),
                vec![Term::atom("int"), Term::atom("this.a^")]
            )
        );
    }

    #[test]
    fn comparison_precedence() {
        // `=` binds tighter than `/\`, which binds tighter than `\/`.
        let formula = parse_formula("a = b /\\ c = d \\/ e = f").unwrap();
        assert_eq!(
            formula,
            Formula::or(
                Formula::and(
                    Formula::eq(Term::atom("a"), Term::atom("b")),
                    Formula::eq(Term::atom("c"), Term::atom("d")),
                ),
                Formula::eq(Term::atom("e"), Term::atom("f")),
            )
        );
    }

    #[test]
    fn arithmetic_terms() {
        let formula = parse_formula("('x^' = ('^x' + 1))").unwrap();
        assert_eq!(
            formula,
            Formula::eq(
                Term::atom("x^"),
                Term::App("+".to_string(), vec![Term::atom("^x"), Term::Int(1)]),
            )
        );
    }

    #[test]
    fn comment_lines_are_skipped() {
        let formula = parse_formula("% a note\n(a = b)").unwrap();
        assert_eq!(formula, Formula::eq(Term::atom("a"), Term::atom("b")));
    }

    #[test]
    fn unterminated_atom_is_an_error() {
        assert!(parse_formula("'a^").is_err());
    }
}
