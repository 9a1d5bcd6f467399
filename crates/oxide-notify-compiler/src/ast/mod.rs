//! Abstract Syntax Tree (AST) types for SQL statements.

mod analysis;
mod expression;
mod statement;

pub use analysis::{Analysis, BindParameter, Placeholder};
pub use expression::{BinaryOp, Expr, FunctionCall, InList, Literal, Parameter, UnaryOp};
pub use statement::{
    Assignment, ConflictResolution, DeleteStatement, InsertSource, InsertStatement, JoinClause,
    JoinType, NullOrdering, OrderBy, OrderDirection, SelectColumn, SelectStatement, Statement,
    TableRef, UpdateStatement, Upsert, UpsertAction,
};
