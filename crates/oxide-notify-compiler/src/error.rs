//! Error types for `.sq` compilation.

use crate::parser::ParseError;

/// Errors that abort compilation of a source file.
///
/// Compilation is all-or-nothing: any of these means no code is produced
/// for the file.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// The file is not valid `.sq` syntax.
    #[error("Syntax error in '{file}': {error}")]
    Syntax {
        /// Name of the source file.
        file: String,
        /// The underlying parse error, positioned within the file.
        error: ParseError,
    },

    /// A key template references a parameter the statement does not declare.
    #[error("unresolved parameter `:{parameter}` in key annotation on statement `{statement}`")]
    UnresolvedParameter {
        /// The annotated statement.
        statement: String,
        /// The first parameter that could not be resolved.
        parameter: String,
    },

    /// Two statements in one file share a name.
    #[error("Duplicate statement '{name}' in '{file}'")]
    DuplicateStatement {
        /// Name of the source file.
        file: String,
        /// The repeated statement name.
        name: String,
    },

    /// A statement's generated method name is already taken, by the
    /// constructor (`existing` is `None`) or by another statement.
    #[error("Statement '{statement}' in '{file}' generates method '{method}', which is already defined")]
    MethodCollision {
        /// Name of the source file.
        file: String,
        /// The statement whose method clashes.
        statement: String,
        /// The generated method name.
        method: String,
        /// The statement that generated the method first, if any.
        existing: Option<String>,
    },

    /// A transaction block contains a SELECT.
    #[error("Statement '{statement}' is a transaction block and cannot contain SELECT")]
    ReadInTransaction {
        /// The block's name.
        statement: String,
    },

    /// A transaction block has no statements.
    #[error("Transaction block '{statement}' is empty")]
    EmptyTransaction {
        /// The block's name.
        statement: String,
    },
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, CompileError>;
