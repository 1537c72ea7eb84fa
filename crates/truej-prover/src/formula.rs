//! The formula representation accepted by provers.

use std::fmt;
use std::str::FromStr;

use crate::text;

/// Represents an error produced when parsing formula text.
///
/// The proof pass only submits text it produced itself, so a formula
/// error indicates an internal translation fault rather than a user
/// mistake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaError {
    /// The error message.
    message: String,
}

impl FormulaError {
    /// Creates a new formula error with the given message.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid formula: {message}", message = self.message)
    }
}

impl std::error::Error for FormulaError {}

/// Represents a term denoting a non-boolean value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// An atom, e.g. `this.a^` (rendered quoted) or `return` (rendered
    /// bare).
    Atom(String),
    /// An integer numeral.
    Int(i64),
    /// A decimal numeral, kept as written.
    Dec(String),
    /// A functor application, e.g. `(a + 1)` or `index(a, i)`.
    App(String, Vec<Term>),
}

impl Term {
    /// Creates an atom term.
    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(name.into())
    }

    /// Creates an integer numeral term.
    pub fn int(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Determines if an atom name can be rendered without quotes.
fn is_plain_atom(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.chars().next().expect("non-empty").is_ascii_digit()
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(name) => {
                if is_plain_atom(name) {
                    write!(f, "{name}")
                } else {
                    write!(f, "'{name}'")
                }
            }
            Self::Int(value) => write!(f, "{value}"),
            Self::Dec(value) => write!(f, "{value}"),
            Self::App(functor, args) => {
                // Binary arithmetic renders infix; everything else as a
                // functor application.
                if args.len() == 2 && matches!(functor.as_str(), "+" | "-" | "*" | "/" | "%") {
                    write!(
                        f,
                        "({lhs} {functor} {rhs})",
                        lhs = args[0],
                        rhs = args[1]
                    )
                } else if args.len() == 1 && functor == "-" {
                    write!(f, "(- {arg})", arg = args[0])
                } else {
                    write!(f, "{functor}(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ")")
                }
            }
        }
    }
}

/// Represents a comparison operator between terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    /// Equality (`=`).
    Eq,
    /// Disequality (`#=`).
    Ne,
    /// Strictly less than (`<`).
    Lt,
    /// Less than or equal to (`=<`).
    Le,
    /// Strictly greater than (`>`).
    Gt,
    /// Greater than or equal to (`>=`).
    Ge,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "#="),
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "=<"),
            Self::Gt => write!(f, ">"),
            Self::Ge => write!(f, ">="),
        }
    }
}

/// Represents a formula in the prover's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    /// A tautology.
    True,
    /// A contradiction.
    False,
    /// A term asserted as a proposition (a boolean-valued atom).
    Prop(Term),
    /// An applied predicate, e.g. the `type(int, a^)` facts.
    Pred(String, Vec<Term>),
    /// A comparison between two terms.
    Cmp(CmpOp, Term, Term),
    /// A negation (`-`).
    Not(Box<Formula>),
    /// A conjunction (`/\`).
    And(Box<Formula>, Box<Formula>),
    /// A disjunction (`\/`).
    Or(Box<Formula>, Box<Formula>),
    /// An implication (`==>`).
    Implies(Box<Formula>, Box<Formula>),
    /// A biconditional (`===`).
    Iff(Box<Formula>, Box<Formula>),
    /// A biconditional negation (`=#=`).
    Xor(Box<Formula>, Box<Formula>),
}

impl Formula {
    /// Parses a formula from its textual form.
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        text::parse_formula(source)
    }

    /// Creates a conjunction of two formulas.
    pub fn and(lhs: Formula, rhs: Formula) -> Formula {
        Self::And(Box::new(lhs), Box::new(rhs))
    }

    /// Creates a disjunction of two formulas.
    pub fn or(lhs: Formula, rhs: Formula) -> Formula {
        Self::Or(Box::new(lhs), Box::new(rhs))
    }

    /// Creates a negation of a formula.
    pub fn not(formula: Formula) -> Formula {
        Self::Not(Box::new(formula))
    }

    /// Creates an equality between two terms.
    pub fn eq(lhs: Term, rhs: Term) -> Formula {
        Self::Cmp(CmpOp::Eq, lhs, rhs)
    }

    /// Creates a conjunction of the given formulas.
    ///
    /// Returns [`Formula::True`] when the iterator is empty.
    pub fn conjoin(formulas: impl IntoIterator<Item = Formula>) -> Formula {
        let mut iter = formulas.into_iter();
        match iter.next() {
            Some(first) => iter.fold(first, Self::and),
            None => Self::True,
        }
    }
}

impl FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::Prop(term) => write!(f, "{term}"),
            Self::Pred(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Self::Cmp(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
            Self::Not(inner) => write!(f, "(- {inner})"),
            Self::And(lhs, rhs) => write!(f, "({lhs} /\\ {rhs})"),
            Self::Or(lhs, rhs) => write!(f, "({lhs} \\/ {rhs})"),
            Self::Implies(lhs, rhs) => write!(f, "({lhs} ==> {rhs})"),
            Self::Iff(lhs, rhs) => write!(f, "({lhs} === {rhs})"),
            Self::Xor(lhs, rhs) => write!(f, "({lhs} =#= {rhs})"),
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn display_round_trip() {
        let source = "(('this.a^' = 'this.^b') /\\ (- (x > 1)))";
        let formula = Formula::parse(source).expect("formula should parse");
        let rendered = format!("{formula}");
        assert_eq!(
            Formula::parse(&rendered).expect("rendering should re-parse"),
            formula
        );
    }

    #[test]
    fn atom_quoting() {
        assert_eq!(format!("{}", Term::atom("return")), "return");
        assert_eq!(format!("{}", Term::atom("this.a^")), "'this.a^'");
    }
}
