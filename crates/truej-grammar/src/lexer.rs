//! Module for the lexer implementation.

use logos::Logos;

use super::Span;
use super::tree::SyntaxKind;

/// Represents a set of tokens as a bitset.
///
/// As Rust does not currently support const functions in traits,
/// `TokenSet` operates on "raw" forms of tokens (i.e. `u8`).
///
/// This allows sets of tokens to be created in const contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenSet(u128);

impl TokenSet {
    /// An empty token set.
    pub const EMPTY: Self = Self(0);

    /// Constructs a token set from a slice of tokens.
    pub const fn new(tokens: &[u8]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < tokens.len() {
            bits |= Self::mask(tokens[i]);
            i += 1;
        }
        Self(bits)
    }

    /// Unions two token sets together.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Checks if the token is contained in the set.
    pub const fn contains(&self, token: u8) -> bool {
        self.0 & Self::mask(token) != 0
    }

    /// Masks the given token to a `u128`.
    const fn mask(token: u8) -> u128 {
        1u128 << (token as usize)
    }
}

/// Represents a token for lexing TrueJ source.
///
/// Identifiers and the three decorated value-name forms are separate
/// tokens; maximal munch resolves `x'` against `x'tag` and a bare `x`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Token {
    /// Contiguous whitespace.
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    /// A comment.
    #[regex(r"//[^\r\n]*", allow_greedy = true)]
    Comment,

    /// A literal float token.
    ///
    /// Forms starting with `.` are permitted; the proof pass prefixes
    /// them with `0` before they reach the prover.
    #[regex(r"[0-9]*\.[0-9]+")]
    Float,

    /// A literal integer token.
    #[regex(r"[0-9]+")]
    Integer,

    /// An identifier token.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    /// A pre-decorated value name token (`'x`).
    #[regex(r"'[a-zA-Z_][a-zA-Z0-9_]*")]
    PreValueName,

    /// A post-decorated value name token (`x'`).
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*'")]
    PostValueName,

    /// A mid-decorated value name token (`x'tag`).
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*'[a-zA-Z0-9_]+")]
    MidValueName,

    /// The `boolean` type keyword token.
    #[token("boolean")]
    BooleanKeyword,

    /// The `class` keyword token.
    #[token("class")]
    ClassKeyword,

    /// The `double` type keyword token.
    #[token("double")]
    DoubleKeyword,

    /// The `else` keyword token.
    #[token("else")]
    ElseKeyword,

    /// The `false` keyword token.
    #[token("false")]
    FalseKeyword,

    /// The `if` keyword token.
    #[token("if")]
    IfKeyword,

    /// The `instanceof` keyword token.
    #[token("instanceof")]
    InstanceofKeyword,

    /// The `int` type keyword token.
    #[token("int")]
    IntKeyword,

    /// The `means` keyword token.
    #[token("means")]
    MeansKeyword,

    /// The `return` keyword token.
    #[token("return")]
    ReturnKeyword,

    /// The `this` keyword token.
    #[token("this")]
    ThisKeyword,

    /// The `true` keyword token.
    #[token("true")]
    TrueKeyword,

    /// The `void` keyword token.
    #[token("void")]
    VoidKeyword,

    /// The `while` keyword token.
    #[token("while")]
    WhileKeyword,

    /// The `{` symbol token.
    #[token("{")]
    OpenBrace,

    /// The `}` symbol token.
    #[token("}")]
    CloseBrace,

    /// The `[` symbol token.
    #[token("[")]
    OpenBracket,

    /// The `]` symbol token.
    #[token("]")]
    CloseBracket,

    /// The `(` symbol token.
    #[token("(")]
    OpenParen,

    /// The `)` symbol token.
    #[token(")")]
    CloseParen,

    /// The `;` symbol token.
    #[token(";")]
    Semicolon,

    /// The `,` symbol token.
    #[token(",")]
    Comma,

    /// The `.` symbol token.
    #[token(".")]
    Dot,

    /// The `:` symbol token.
    #[token(":")]
    Colon,

    /// The `?` symbol token.
    #[token("?")]
    QuestionMark,

    /// The `=` symbol token.
    ///
    /// TrueJ uses `=` both for assignment statements and for equality
    /// inside claims.
    #[token("=")]
    Assignment,

    /// The `!=` symbol token.
    #[token("!=")]
    NotEqual,

    /// The `<` symbol token.
    #[token("<")]
    Less,

    /// The `<=` symbol token.
    #[token("<=")]
    LessEqual,

    /// The `>` symbol token.
    #[token(">")]
    Greater,

    /// The `>=` symbol token.
    #[token(">=")]
    GreaterEqual,

    /// The `!` symbol token.
    #[token("!")]
    Exclamation,

    /// The `&` symbol token.
    #[token("&")]
    Ampersand,

    /// The `&&` symbol token.
    #[token("&&")]
    LogicalAnd,

    /// The `|` symbol token.
    #[token("|")]
    Pipe,

    /// The `||` symbol token.
    #[token("||")]
    LogicalOr,

    /// The `===` symbol token (biconditional).
    #[token("===")]
    Biconditional,

    /// The `==>` symbol token (implication).
    #[token("==>")]
    Implication,

    /// The `<==` symbol token (reverse implication).
    #[token("<==")]
    ReverseImplication,

    /// The `=!=` symbol token (biconditional negation).
    #[token("=!=")]
    BiconditionalNegation,

    /// The `+` symbol token.
    #[token("+")]
    Plus,

    /// The `-` symbol token.
    #[token("-")]
    Minus,

    /// The `*` symbol token.
    #[token("*")]
    Asterisk,

    /// The `/` symbol token.
    #[token("/")]
    Slash,

    /// The `%` symbol token.
    #[token("%")]
    Percent,

    // WARNING: this must always be the last variant.
    /// The exclusive maximum token value.
    MAX,
}

/// Asserts that Token can fit in a TokenSet.
const _: () = assert!(Token::MAX as u8 <= 128);

impl Token {
    /// Converts the token into its syntax representation.
    pub fn into_syntax(self) -> SyntaxKind {
        match self {
            Self::Whitespace => SyntaxKind::Whitespace,
            Self::Comment => SyntaxKind::Comment,
            Self::Float => SyntaxKind::Float,
            Self::Integer => SyntaxKind::Integer,
            Self::Ident => SyntaxKind::Ident,
            Self::PreValueName => SyntaxKind::PreValueName,
            Self::PostValueName => SyntaxKind::PostValueName,
            Self::MidValueName => SyntaxKind::MidValueName,
            Self::BooleanKeyword => SyntaxKind::BooleanKeyword,
            Self::ClassKeyword => SyntaxKind::ClassKeyword,
            Self::DoubleKeyword => SyntaxKind::DoubleKeyword,
            Self::ElseKeyword => SyntaxKind::ElseKeyword,
            Self::FalseKeyword => SyntaxKind::FalseKeyword,
            Self::IfKeyword => SyntaxKind::IfKeyword,
            Self::InstanceofKeyword => SyntaxKind::InstanceofKeyword,
            Self::IntKeyword => SyntaxKind::IntKeyword,
            Self::MeansKeyword => SyntaxKind::MeansKeyword,
            Self::ReturnKeyword => SyntaxKind::ReturnKeyword,
            Self::ThisKeyword => SyntaxKind::ThisKeyword,
            Self::TrueKeyword => SyntaxKind::TrueKeyword,
            Self::VoidKeyword => SyntaxKind::VoidKeyword,
            Self::WhileKeyword => SyntaxKind::WhileKeyword,
            Self::OpenBrace => SyntaxKind::OpenBrace,
            Self::CloseBrace => SyntaxKind::CloseBrace,
            Self::OpenBracket => SyntaxKind::OpenBracket,
            Self::CloseBracket => SyntaxKind::CloseBracket,
            Self::OpenParen => SyntaxKind::OpenParen,
            Self::CloseParen => SyntaxKind::CloseParen,
            Self::Semicolon => SyntaxKind::Semicolon,
            Self::Comma => SyntaxKind::Comma,
            Self::Dot => SyntaxKind::Dot,
            Self::Colon => SyntaxKind::Colon,
            Self::QuestionMark => SyntaxKind::QuestionMark,
            Self::Assignment => SyntaxKind::Assignment,
            Self::NotEqual => SyntaxKind::NotEqual,
            Self::Less => SyntaxKind::Less,
            Self::LessEqual => SyntaxKind::LessEqual,
            Self::Greater => SyntaxKind::Greater,
            Self::GreaterEqual => SyntaxKind::GreaterEqual,
            Self::Exclamation => SyntaxKind::Exclamation,
            Self::Ampersand => SyntaxKind::Ampersand,
            Self::LogicalAnd => SyntaxKind::LogicalAnd,
            Self::Pipe => SyntaxKind::Pipe,
            Self::LogicalOr => SyntaxKind::LogicalOr,
            Self::Biconditional => SyntaxKind::Biconditional,
            Self::Implication => SyntaxKind::Implication,
            Self::ReverseImplication => SyntaxKind::ReverseImplication,
            Self::BiconditionalNegation => SyntaxKind::BiconditionalNegation,
            Self::Plus => SyntaxKind::Plus,
            Self::Minus => SyntaxKind::Minus,
            Self::Asterisk => SyntaxKind::Asterisk,
            Self::Slash => SyntaxKind::Slash,
            Self::Percent => SyntaxKind::Percent,
            Self::MAX => unreachable!(),
        }
    }

    /// Converts the token into its "raw" representation.
    pub fn into_raw(self) -> u8 {
        self as u8
    }

    /// Converts from a raw token into the parser token.
    pub fn from_raw(token: u8) -> Self {
        assert!(token < Self::MAX as u8, "invalid token value");
        unsafe { std::mem::transmute::<u8, Self>(token) }
    }

    /// Describes the token.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Whitespace => "whitespace",
            Self::Comment => "comment",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Ident => "identifier",
            Self::PreValueName => "pre-decorated value name",
            Self::PostValueName => "post-decorated value name",
            Self::MidValueName => "mid-decorated value name",
            Self::BooleanKeyword => "`boolean` type keyword",
            Self::ClassKeyword => "`class` keyword",
            Self::DoubleKeyword => "`double` type keyword",
            Self::ElseKeyword => "`else` keyword",
            Self::FalseKeyword => "`false` keyword",
            Self::IfKeyword => "`if` keyword",
            Self::InstanceofKeyword => "`instanceof` keyword",
            Self::IntKeyword => "`int` type keyword",
            Self::MeansKeyword => "`means` keyword",
            Self::ReturnKeyword => "`return` keyword",
            Self::ThisKeyword => "`this` keyword",
            Self::TrueKeyword => "`true` keyword",
            Self::VoidKeyword => "`void` keyword",
            Self::WhileKeyword => "`while` keyword",
            Self::OpenBrace => "`{` symbol",
            Self::CloseBrace => "`}` symbol",
            Self::OpenBracket => "`[` symbol",
            Self::CloseBracket => "`]` symbol",
            Self::OpenParen => "`(` symbol",
            Self::CloseParen => "`)` symbol",
            Self::Semicolon => "`;` symbol",
            Self::Comma => "`,` symbol",
            Self::Dot => "`.` symbol",
            Self::Colon => "`:` symbol",
            Self::QuestionMark => "`?` symbol",
            Self::Assignment => "`=` symbol",
            Self::NotEqual => "`!=` symbol",
            Self::Less => "`<` symbol",
            Self::LessEqual => "`<=` symbol",
            Self::Greater => "`>` symbol",
            Self::GreaterEqual => "`>=` symbol",
            Self::Exclamation => "`!` symbol",
            Self::Ampersand => "`&` symbol",
            Self::LogicalAnd => "`&&` symbol",
            Self::Pipe => "`|` symbol",
            Self::LogicalOr => "`||` symbol",
            Self::Biconditional => "`===` symbol",
            Self::Implication => "`==>` symbol",
            Self::ReverseImplication => "`<==` symbol",
            Self::BiconditionalNegation => "`=!=` symbol",
            Self::Plus => "`+` symbol",
            Self::Minus => "`-` symbol",
            Self::Asterisk => "`*` symbol",
            Self::Slash => "`/` symbol",
            Self::Percent => "`%` symbol",
            Self::MAX => unreachable!(),
        }
    }

    /// Determines if the token is trivia that should be skipped over
    /// by the parser.
    ///
    /// Trivia tokens are still added to the concrete syntax tree.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }
}

/// The result type for the lexer.
pub type LexerResult<T> = Result<T, ()>;

/// Records information for a lexer peek operation.
///
/// See the [Lexer::peek] method.
#[derive(Debug, Clone, Copy)]
struct Peeked {
    /// The result of the peek operation.
    result: LexerResult<Token>,
    /// The span of the result.
    span: Span,
}

/// Implements a TrueJ lexer.
///
/// A lexer produces a stream of tokens from a TrueJ source string.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct Lexer<'a> {
    /// The underlying logos lexer.
    lexer: logos::Lexer<'a, Token>,
    /// The peeked token.
    peeked: Option<Peeked>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source string.
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Token::lexer(source),
            peeked: None,
        }
    }

    /// Gets the source string of the given span.
    pub fn source(&self, span: Span) -> &'a str {
        &self.lexer.source()[span.start()..span.end()]
    }

    /// Gets the length of the source.
    pub fn source_len(&self) -> usize {
        self.lexer.source().len()
    }

    /// Gets the current span of the lexer.
    pub fn span(&self) -> Span {
        self.lexer.span().into()
    }

    /// Peeks at the next token.
    pub fn peek(&mut self) -> Option<(LexerResult<Token>, Span)> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next().map(|r| Peeked {
                result: r,
                span: self.lexer.span().into(),
            });
        }

        self.peeked.map(|p| (p.result, p.span))
    }
}

impl Iterator for Lexer<'_> {
    type Item = (LexerResult<Token>, Span);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(peeked) = self.peeked.take() {
            return Some((peeked.result, peeked.span));
        }

        self.lexer.next().map(|r| (r, self.lexer.span().into()))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn map((t, s): (LexerResult<Token>, Span)) -> (LexerResult<Token>, std::ops::Range<usize>) {
        (t, s.start()..s.end())
    }

    fn kinds(source: &str) -> Vec<Token> {
        Lexer::new(source)
            .map(|(r, _)| r.expect("token should lex"))
            .filter(|t| !t.is_trivia())
            .collect()
    }

    #[test]
    fn decorated_value_names() {
        assert_eq!(
            kinds("a 'a a' a'temp"),
            vec![
                Token::Ident,
                Token::PreValueName,
                Token::PostValueName,
                Token::MidValueName,
            ],
        );
    }

    #[test]
    fn assignment_between_value_names() {
        let mut lexer = Lexer::new("b' = 'aa;");
        assert_eq!(
            lexer.next().map(map).unwrap(),
            (Ok(Token::PostValueName), 0..2)
        );
        assert_eq!(
            lexer.next().map(map).unwrap(),
            (Ok(Token::Whitespace), 2..3)
        );
        assert_eq!(
            lexer.next().map(map).unwrap(),
            (Ok(Token::Assignment), 3..4)
        );
        assert_eq!(
            lexer.next().map(map).unwrap(),
            (Ok(Token::Whitespace), 4..5)
        );
        assert_eq!(
            lexer.next().map(map).unwrap(),
            (Ok(Token::PreValueName), 5..8)
        );
        assert_eq!(lexer.next().map(map).unwrap(), (Ok(Token::Semicolon), 8..9));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn compound_operators() {
        assert_eq!(
            kinds("= == === ==> <== =!= <= != && ||"),
            vec![
                Token::Assignment,
                Token::Assignment,
                Token::Assignment,
                Token::Biconditional,
                Token::Implication,
                Token::ReverseImplication,
                Token::BiconditionalNegation,
                Token::LessEqual,
                Token::NotEqual,
                Token::LogicalAnd,
                Token::LogicalOr,
            ],
        );
    }

    #[test]
    fn leading_dot_float() {
        assert_eq!(kinds(".5 0.5 17"), vec![
            Token::Float,
            Token::Float,
            Token::Integer,
        ]);
    }

    #[test]
    fn keywords_and_idents() {
        assert_eq!(kinds("means meansX class classy"), vec![
            Token::MeansKeyword,
            Token::Ident,
            Token::ClassKeyword,
            Token::Ident,
        ]);
    }

    #[test]
    fn comment_is_trivia() {
        let tokens: Vec<_> = Lexer::new("a // note\nb")
            .map(|(r, _)| r.unwrap())
            .collect();
        assert_eq!(tokens, vec![
            Token::Ident,
            Token::Whitespace,
            Token::Comment,
            Token::Whitespace,
            Token::Ident,
        ]);
    }
}
