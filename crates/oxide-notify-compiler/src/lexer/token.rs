//! Token types for the SQL lexer.

use super::Span;

/// Declares [`Keyword`] with its spelling, once per keyword.
macro_rules! keywords {
    ($($variant:ident => $text:literal),* $(,)?) => {
        /// Reserved SQL keywords.
        ///
        /// Words that only carry meaning in one position (`NULLS`, `FIRST`,
        /// `CONFLICT`, `DO`, `NOTHING`, `REPLACE`, ...) are lexed as
        /// identifiers and matched contextually by the parser, so they stay
        /// usable as column names.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum Keyword {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )*
        }

        impl Keyword {
            /// Attempts to parse a keyword from a string (case-insensitive).
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($text => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Returns the keyword as a string.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }
    };
}

keywords! {
    Select => "SELECT", From => "FROM", Where => "WHERE", Group => "GROUP",
    Order => "ORDER", By => "BY", Having => "HAVING", Limit => "LIMIT",
    Offset => "OFFSET", Distinct => "DISTINCT", All => "ALL", As => "AS",

    Join => "JOIN", Inner => "INNER", Left => "LEFT", Right => "RIGHT",
    Full => "FULL", Outer => "OUTER", Cross => "CROSS", On => "ON", Using => "USING",

    Insert => "INSERT", Into => "INTO", Values => "VALUES", Update => "UPDATE",
    Set => "SET", Delete => "DELETE", Default => "DEFAULT",

    And => "AND", Or => "OR", Not => "NOT", In => "IN", Between => "BETWEEN",
    Like => "LIKE", Is => "IS", Null => "NULL", True => "TRUE", False => "FALSE",
    Exists => "EXISTS",

    Case => "CASE", When => "WHEN", Then => "THEN", Else => "ELSE", End => "END",
    Cast => "CAST",

    Asc => "ASC", Desc => "DESC",
}

/// Comment delimiter style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `-- ...` up to (not including) the end of the line.
    Line,
    /// `/* ... */`
    Block,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal (e.g., 42)
    Integer(i64),
    /// Float literal (e.g., 3.14)
    Float(f64),
    /// String literal (e.g., 'hello')
    String(String),
    /// Blob literal (e.g., X'1234')
    Blob(Vec<u8>),

    // Identifiers and keywords
    /// Identifier (e.g., column_name)
    Identifier(String),
    /// SQL keyword
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ~
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// {
    LeftBrace,
    /// }
    RightBrace,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ?
    Question,

    // Trivia (only produced by `Lexer::next_token_with_trivia`)
    /// A comment, with its delimiters.
    Comment(CommentStyle, String),
    /// A run of whitespace.
    Whitespace,

    // Special
    /// End of input
    Eof,
    /// Invalid/unknown token
    Error(String),
}

impl TokenKind {
    /// Returns true for comments and whitespace.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment(..) | Self::Whitespace)
    }
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}
