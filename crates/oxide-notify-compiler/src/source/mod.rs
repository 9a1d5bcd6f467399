//! The `.sq` source file as a flat list of sibling nodes.
//!
//! Named statements are parsed into the SQL AST. Comments and whitespace are
//! kept as nodes of their own so annotations can be found by walking
//! backwards from a statement. Unlabeled statements (schema DDL and the
//! like) are kept as opaque text.

mod reader;

use crate::ast::Statement;
use crate::lexer::{CommentStyle, Span};
use crate::parser::ParseError;

/// A comment node with its delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Line or block comment.
    pub style: CommentStyle,
    /// Raw text, delimiters included.
    pub text: String,
    /// Location in the file.
    pub span: Span,
}

impl Comment {
    /// The comment text with its delimiters removed, not trimmed.
    #[must_use]
    pub fn body(&self) -> &str {
        match self.style {
            CommentStyle::Line => self.text.strip_prefix("--").unwrap_or(&self.text),
            CommentStyle::Block => self
                .text
                .strip_prefix("/*")
                .and_then(|t| t.strip_suffix("*/"))
                .unwrap_or(&self.text),
        }
    }
}

/// One SQL statement inside a named statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    /// Statement text without the terminating `;`, trimmed.
    pub sql: String,
    /// The parsed statement.
    pub statement: Statement,
    /// Location of the statement text in the file.
    pub span: Span,
}

/// The body of a named statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementBody {
    /// `name: <sql>;`
    Single(SqlStatement),
    /// `name { <sql>; <sql>; }`, run in one transaction.
    Block(Vec<SqlStatement>),
}

/// A labeled statement.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedStatement {
    /// The label.
    pub name: String,
    /// The statement or block.
    pub body: StatementBody,
    /// Location from the label to the terminator.
    pub span: Span,
}

impl NamedStatement {
    /// The inner statements, one for a single statement.
    #[must_use]
    pub fn statements(&self) -> &[SqlStatement] {
        match &self.body {
            StatementBody::Single(statement) => core::slice::from_ref(statement),
            StatementBody::Block(statements) => statements,
        }
    }
}

/// A top-level node of a source file.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A line or block comment.
    Comment(Comment),
    /// A run of whitespace.
    Whitespace(Span),
    /// A labeled statement.
    Statement(NamedStatement),
    /// Anything else, up to and including its `;`.
    Other(Span),
}

impl Node {
    /// Returns true for comments and whitespace.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment(_) | Self::Whitespace(_))
    }
}

/// A parsed `.sq` file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    nodes: Vec<Node>,
}

impl SourceFile {
    /// Parses a source file.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError`, positioned relative to the start of the file,
    /// for an unterminated or malformed named statement or an invalid token.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        reader::read(source).map(|nodes| Self { nodes })
    }

    /// All nodes in source order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Named statements with their node index, in source order.
    pub fn statements(&self) -> impl Iterator<Item = (usize, &NamedStatement)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| match node {
                Node::Statement(statement) => Some((index, statement)),
                _ => None,
            })
    }

    /// The contiguous run of comment and whitespace nodes immediately
    /// before the node at `index`, in source order.
    #[must_use]
    pub fn leading_trivia(&self, index: usize) -> &[Node] {
        let before = &self.nodes[..index.min(self.nodes.len())];
        let start = before
            .iter()
            .rposition(|node| !node.is_trivia())
            .map_or(0, |i| i + 1);
        &before[start..]
    }
}
