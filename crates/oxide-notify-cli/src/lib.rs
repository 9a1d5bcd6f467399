//! # oxide-notify-cli
//!
//! Library side of the `oxide-notify` binary: discovers `.sq` files,
//! compiles them with [`oxide_notify_compiler`], and writes or explains the
//! result.

pub mod commands;
pub mod config;
mod error;

pub use commands::{compile_dir, discover, explain, generate, Compiled};
pub use config::load_options;
pub use error::{CliError, Result};
