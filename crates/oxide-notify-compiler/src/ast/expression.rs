//! Expression AST types.

use crate::lexer::Span;

use super::SelectStatement;

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// String literal.
    String(String),
    /// Blob literal.
    Blob(Vec<u8>),
    /// Boolean literal.
    Boolean(bool),
    /// NULL literal.
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // String
    Concat,
    Like,
    NotLike,

    // Bitwise
    BitAnd,
    BitOr,
    LeftShift,
    RightShift,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Unary plus (+)
    Plus,
    /// Logical NOT
    Not,
    /// Bitwise NOT (~)
    BitNot,
}

/// A function call such as `COUNT(*)` or `coalesce(a, b)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// The function name, as written.
    pub name: String,
    /// The arguments.
    pub args: Vec<Expr>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
}

/// A bind parameter placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// `Some(name)` for `:name`, `None` for `?`.
    pub name: Option<String>,
    /// 1-based position among the statement's `?` placeholders (0 for named).
    pub position: usize,
    /// Source span of the placeholder.
    pub span: Span,
}

/// The right-hand side of an `IN` expression.
#[derive(Debug, Clone, PartialEq)]
pub enum InList {
    /// `IN (a, b, c)`
    Values(Vec<Expr>),
    /// `IN (SELECT ...)`
    Subquery(Box<SelectStatement>),
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A column reference, optionally qualified.
    Column {
        /// Table name or alias.
        table: Option<String>,
        /// Column name.
        name: String,
        /// Source span.
        span: Span,
    },

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },

    /// A function call.
    Function(FunctionCall),

    /// A scalar subquery.
    Subquery(Box<SelectStatement>),

    /// `[NOT] EXISTS (SELECT ...)`
    Exists {
        /// The subquery.
        query: Box<SelectStatement>,
        /// Whether this is NOT EXISTS.
        negated: bool,
    },

    /// IS [NOT] NULL.
    IsNull {
        /// The expression to check.
        expr: Box<Expr>,
        /// Whether this is IS NOT NULL.
        negated: bool,
    },

    /// [NOT] IN.
    In {
        /// The expression to check.
        expr: Box<Expr>,
        /// The values or subquery.
        list: InList,
        /// Whether this is NOT IN.
        negated: bool,
    },

    /// [NOT] BETWEEN.
    Between {
        /// The expression to check.
        expr: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// Whether this is NOT BETWEEN.
        negated: bool,
    },

    /// CASE expression.
    Case {
        /// The operand (simple CASE).
        operand: Option<Box<Expr>>,
        /// WHEN/THEN clauses.
        when_clauses: Vec<(Expr, Expr)>,
        /// ELSE clause.
        else_clause: Option<Box<Expr>>,
    },

    /// `CAST(expr AS type)`
    Cast {
        /// Expression to cast.
        expr: Box<Expr>,
        /// Target type name, as written.
        type_name: String,
    },

    /// Parenthesized expression.
    Paren(Box<Expr>),

    /// Parenthesized list of expressions, e.g. a row value `(a, b)`.
    Tuple(Vec<Expr>),

    /// A bind parameter.
    Parameter(Parameter),

    /// `*` or `table.*`.
    Wildcard {
        /// Table qualifier.
        table: Option<String>,
    },
}

impl Expr {
    /// Creates a binary expression.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }
}
