//! Module for the concrete syntax tree (CST) representation.

use std::borrow::Cow;
use std::fmt;

use rowan::GreenNodeBuilder;
use rowan::GreenNodeData;

use super::Diagnostic;
use super::grammar;
use super::lexer::Lexer;
use super::parser::Event;
use super::parser::Parser;

/// Represents the kind of syntax element (node or token) in a TrueJ
/// concrete syntax tree (CST).
///
/// Nodes have at least one token child and represent a syntactic
/// construct.
///
/// Tokens are terminal and represent any span of the source.
///
/// This enumeration is a union of all supported TrueJ tokens and nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    /// The token is unknown to TrueJ.
    Unknown,
    /// A whitespace token.
    Whitespace,
    /// A comment token.
    Comment,
    /// A literal float token.
    Float,
    /// A literal integer token.
    Integer,
    /// An identifier token.
    Ident,
    /// A pre-decorated value name token (`'x`).
    PreValueName,
    /// A post-decorated value name token (`x'`).
    PostValueName,
    /// A mid-decorated value name token (`x'tag`).
    MidValueName,
    /// The `boolean` type keyword token.
    BooleanKeyword,
    /// The `class` keyword token.
    ClassKeyword,
    /// The `double` type keyword token.
    DoubleKeyword,
    /// The `else` keyword token.
    ElseKeyword,
    /// The `false` keyword token.
    FalseKeyword,
    /// The `if` keyword token.
    IfKeyword,
    /// The `instanceof` keyword token.
    InstanceofKeyword,
    /// The `int` type keyword token.
    IntKeyword,
    /// The `means` keyword token.
    MeansKeyword,
    /// The `return` keyword token.
    ReturnKeyword,
    /// The `this` keyword token.
    ThisKeyword,
    /// The `true` keyword token.
    TrueKeyword,
    /// The `void` keyword token.
    VoidKeyword,
    /// The `while` keyword token.
    WhileKeyword,
    /// The `{` symbol token.
    OpenBrace,
    /// The `}` symbol token.
    CloseBrace,
    /// The `[` symbol token.
    OpenBracket,
    /// The `]` symbol token.
    CloseBracket,
    /// The `(` symbol token.
    OpenParen,
    /// The `)` symbol token.
    CloseParen,
    /// The `;` symbol token.
    Semicolon,
    /// The `,` symbol token.
    Comma,
    /// The `.` symbol token.
    Dot,
    /// The `:` symbol token.
    Colon,
    /// The `?` symbol token.
    QuestionMark,
    /// The `=` symbol token.
    Assignment,
    /// The `!=` symbol token.
    NotEqual,
    /// The `<` symbol token.
    Less,
    /// The `<=` symbol token.
    LessEqual,
    /// The `>` symbol token.
    Greater,
    /// The `>=` symbol token.
    GreaterEqual,
    /// The `!` symbol token.
    Exclamation,
    /// The `&` symbol token.
    Ampersand,
    /// The `&&` symbol token.
    LogicalAnd,
    /// The `|` symbol token.
    Pipe,
    /// The `||` symbol token.
    LogicalOr,
    /// The `===` symbol token.
    Biconditional,
    /// The `==>` symbol token.
    Implication,
    /// The `<==` symbol token.
    ReverseImplication,
    /// The `=!=` symbol token.
    BiconditionalNegation,
    /// The `+` symbol token.
    Plus,
    /// The `-` symbol token.
    Minus,
    /// The `*` symbol token.
    Asterisk,
    /// The `/` symbol token.
    Slash,
    /// The `%` symbol token.
    Percent,

    /// Abandoned nodes are nodes that encountered errors.
    ///
    /// Children of abandoned nodes are re-parented to the parent of
    /// the abandoned node.
    ///
    /// As this is an internal implementation of error recovery,
    /// hide this variant from the documentation.
    #[doc(hidden)]
    Abandoned,
    /// Represents the TrueJ compilation unit root node.
    RootNode,
    /// Represents a class definition node.
    ClassDefinitionNode,
    /// Represents a field declaration node.
    FieldDeclarationNode,
    /// Represents a method definition node.
    MethodDefinitionNode,
    /// Represents a method parameter node.
    ParameterNode,
    /// Represents a declarator node within a declaration.
    DeclaratorNode,
    /// Represents a primitive type node.
    PrimitiveTypeNode,
    /// Represents a type reference node.
    TypeRefNode,
    /// Represents a block node.
    BlockNode,
    /// Represents a local declaration statement node.
    LocalDeclarationNode,
    /// Represents an assignment statement node.
    AssignmentNode,
    /// Represents an `if` statement node.
    IfStatementNode,
    /// Represents a `while` statement node.
    WhileStatementNode,
    /// Represents a `return` statement node.
    ReturnStatementNode,
    /// Represents a `means` statement node.
    MeansStatementNode,
    /// Represents an empty statement node.
    EmptyStatementNode,
    /// Represents a literal integer node.
    LiteralIntegerNode,
    /// Represents a literal float node.
    LiteralFloatNode,
    /// Represents a literal boolean node.
    LiteralBooleanNode,
    /// Represents a name reference expression node.
    NameRefNode,
    /// Represents a `this` reference expression node.
    ThisRefNode,
    /// Represents a parenthesized expression node.
    ParenthesizedExprNode,
    /// Represents a conditional (`? :`) expression node.
    ConditionalExprNode,
    /// Represents an `instanceof` expression node.
    InstanceofExprNode,
    /// Represents a logical not expression node.
    LogicalNotExprNode,
    /// Represents an arithmetic negation expression node.
    NegationExprNode,
    /// Represents a conjunction (`&` or `&&`) expression node.
    ConjunctExprNode,
    /// Represents a disjunction (`|` or `||`) expression node.
    DisjunctExprNode,
    /// Represents an implication (`==>`) expression node.
    ImplicationExprNode,
    /// Represents a reverse implication (`<==`) expression node.
    ReverseImplicationExprNode,
    /// Represents a biconditional (`===`) expression node.
    BiconditionalExprNode,
    /// Represents a biconditional negation (`=!=`) expression node.
    BiconditionalNegationExprNode,
    /// Represents an equality (`=`) expression node.
    EqualityExprNode,
    /// Represents an inequality (`!=`) expression node.
    InequalityExprNode,
    /// Represents a "less than" expression node.
    LessExprNode,
    /// Represents a "less than or equal to" expression node.
    LessEqualExprNode,
    /// Represents a "greater than" expression node.
    GreaterExprNode,
    /// Represents a "greater than or equal to" expression node.
    GreaterEqualExprNode,
    /// Represents an addition expression node.
    AdditionExprNode,
    /// Represents a subtraction expression node.
    SubtractionExprNode,
    /// Represents a multiplication expression node.
    MultiplicationExprNode,
    /// Represents a division expression node.
    DivisionExprNode,
    /// Represents a modulo expression node.
    ModuloExprNode,
    /// Represents a call expression node.
    CallExprNode,
    /// Represents an index expression node.
    IndexExprNode,
    /// Represents an access expression node.
    AccessExprNode,

    // WARNING: this must always be the last variant.
    /// The exclusive maximum syntax kind value.
    MAX,
}

impl SyntaxKind {
    /// Describes the syntax kind.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Unknown => unreachable!(),
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
            Self::Abandoned => unreachable!(),
            Self::RootNode => "compilation unit",
            Self::ClassDefinitionNode => "class definition",
            Self::FieldDeclarationNode => "field declaration",
            Self::MethodDefinitionNode => "method definition",
            Self::ParameterNode => "parameter",
            Self::DeclaratorNode => "declarator",
            Self::PrimitiveTypeNode => "primitive type",
            Self::TypeRefNode => "type reference",
            Self::BlockNode => "block",
            Self::LocalDeclarationNode => "local declaration",
            Self::AssignmentNode => "assignment statement",
            Self::IfStatementNode => "`if` statement",
            Self::WhileStatementNode => "`while` statement",
            Self::ReturnStatementNode => "`return` statement",
            Self::MeansStatementNode => "`means` statement",
            Self::EmptyStatementNode => "empty statement",
            Self::LiteralIntegerNode => "literal integer",
            Self::LiteralFloatNode => "literal float",
            Self::LiteralBooleanNode => "literal boolean",
            Self::NameRefNode => "name reference expression",
            Self::ThisRefNode => "`this` reference expression",
            Self::ParenthesizedExprNode => "parenthesized expression",
            Self::ConditionalExprNode => "conditional expression",
            Self::InstanceofExprNode => "`instanceof` expression",
            Self::LogicalNotExprNode => "logical not expression",
            Self::NegationExprNode => "negation expression",
            Self::ConjunctExprNode => "conjunction expression",
            Self::DisjunctExprNode => "disjunction expression",
            Self::ImplicationExprNode => "implication expression",
            Self::ReverseImplicationExprNode => "reverse implication expression",
            Self::BiconditionalExprNode => "biconditional expression",
            Self::BiconditionalNegationExprNode => "biconditional negation expression",
            Self::EqualityExprNode => "equality expression",
            Self::InequalityExprNode => "inequality expression",
            Self::LessExprNode => "less than expression",
            Self::LessEqualExprNode => "less than or equal to expression",
            Self::GreaterExprNode => "greater than expression",
            Self::GreaterEqualExprNode => "greater than or equal to expression",
            Self::AdditionExprNode => "addition expression",
            Self::SubtractionExprNode => "subtraction expression",
            Self::MultiplicationExprNode => "multiplication expression",
            Self::DivisionExprNode => "division expression",
            Self::ModuloExprNode => "modulo expression",
            Self::CallExprNode => "call expression",
            Self::IndexExprNode => "index expression",
            Self::AccessExprNode => "access expression",
            Self::MAX => unreachable!(),
        }
    }

    /// Returns whether the [`SyntaxKind`] is trivia.
    pub fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

/// Represents the TrueJ language for use with `rowan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrueJLanguage;

impl rowan::Language for TrueJLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::MAX as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Represents a node in the concrete syntax tree.
pub type SyntaxNode = rowan::SyntaxNode<TrueJLanguage>;
/// Represents a token in the concrete syntax tree.
pub type SyntaxToken = rowan::SyntaxToken<TrueJLanguage>;
/// Represents an element (node or token) in the concrete syntax tree.
pub type SyntaxElement = rowan::SyntaxElement<TrueJLanguage>;
/// Represents node children in the concrete syntax tree.
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<TrueJLanguage>;

/// Constructs a concrete syntax tree from a list of parser events.
pub fn construct_tree(source: &str, mut events: Vec<Event>) -> SyntaxNode {
    let mut builder = GreenNodeBuilder::default();
    let mut ancestors = Vec::new();

    for i in 0..events.len() {
        match std::mem::replace(&mut events[i], Event::abandoned()) {
            Event::NodeStarted {
                kind,
                forward_parent,
            } => {
                // Walk the forward parent chain, if there is one, and push
                // each forward parent to the ancestors list
                ancestors.push(kind);
                let mut idx = i;
                let mut fp: Option<usize> = forward_parent;
                while let Some(distance) = fp {
                    idx += distance;
                    fp = match std::mem::replace(&mut events[idx], Event::abandoned()) {
                        Event::NodeStarted {
                            kind,
                            forward_parent,
                        } => {
                            ancestors.push(kind);
                            forward_parent
                        }
                        _ => unreachable!(),
                    };
                }

                // As the current node was pushed first and then its ancestors,
                // walk the list in reverse to start the "oldest" ancestor first
                for kind in ancestors.drain(..).rev() {
                    if kind != SyntaxKind::Abandoned {
                        builder.start_node(kind.into());
                    }
                }
            }
            Event::NodeFinished => builder.finish_node(),
            Event::Token { kind, span } => {
                builder.token(kind.into(), &source[span.start()..span.end()])
            }
        }
    }

    SyntaxNode::new_root(builder.finish())
}

/// Represents an untyped concrete syntax tree.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SyntaxTree(SyntaxNode);

impl SyntaxTree {
    /// Parses TrueJ source to produce a syntax tree.
    ///
    /// A syntax tree is always returned, even for invalid TrueJ source.
    ///
    /// Additionally, the list of diagnostics encountered during the parse
    /// is returned; if the list is empty, the tree is syntactically
    /// correct.
    ///
    /// However, additional validation is required to ensure the source is
    /// a valid TrueJ compilation unit.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use truej_grammar::SyntaxTree;
    /// let (tree, diagnostics) = SyntaxTree::parse("class Empty { }");
    /// assert!(diagnostics.is_empty());
    /// println!("{tree:#?}");
    /// ```
    pub fn parse(source: &str) -> (Self, Vec<Diagnostic>) {
        let parser = Parser::new(Lexer::new(source));
        let (events, mut diagnostics) = grammar::compilation_unit(parser);
        diagnostics.sort();
        (Self(construct_tree(source, events)), diagnostics)
    }

    /// Gets the root syntax node of the tree.
    pub fn root(&self) -> &SyntaxNode {
        &self.0
    }

    /// Gets a copy of the underlying root green node for the tree.
    pub fn green(&self) -> Cow<'_, GreenNodeData> {
        self.0.green()
    }

    /// Converts the tree into a syntax node.
    pub fn into_syntax(self) -> SyntaxNode {
        self.0
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
