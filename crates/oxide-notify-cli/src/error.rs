//! Error types for the command-line tool.

use std::path::PathBuf;

use oxide_notify_compiler::CompileError;

/// Errors that stop a `generate` or `check` run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Reading or writing a file failed.
    #[error("IO error on '{path}': {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The options file is not valid.
    #[error("Invalid options file '{path}': {source}")]
    Config {
        /// Path to the options file.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },

    /// The input directory does not exist.
    #[error("Input directory not found: {0}")]
    InputNotFound(PathBuf),

    /// Two source files map to the same module name.
    #[error("'{first}' and '{second}' both generate module '{module}'")]
    DuplicateModule {
        /// The clashing module name.
        module: String,
        /// The first file.
        first: PathBuf,
        /// The second file.
        second: PathBuf,
    },

    /// One source file failed to compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Some source files failed to compile; each was logged.
    #[error("{failed} of {total} file(s) failed to compile")]
    Failed {
        /// Files that failed.
        failed: usize,
        /// Files compiled.
        total: usize,
    },
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for the command-line tool.
pub type Result<T> = std::result::Result<T, CliError>;
