//! # oxide-notify-compiler
//!
//! Compiles `.sq` files of named SQL statements into Rust accessors wired
//! to a change-notification registry.
//!
//! Each named statement gets a method on a generated struct. Reads return a
//! [`Query`](https://docs.rs/oxide-notify-runtime) that listens under a set
//! of topic keys; mutations notify their keys after they succeed. Keys are
//! the tables a statement touches unless annotations declare others:
//!
//! ```sql
//! -- @CustomKey conversation_:conversation_id
//! selectByConversation:
//! SELECT * FROM messages WHERE conversation_id = :conversation_id;
//!
//! -- @NotifyCustomKey conversation_:conversation_id
//! insertMessage:
//! INSERT INTO messages (conversation_id, body) VALUES (:conversation_id, :body);
//! ```
//!
//! Annotations are honored only when [`CompilerOptions::custom_keys`] is
//! set.
//!
//! ```rust
//! use oxide_notify_compiler::{compile, CompilerOptions, KeySource};
//!
//! let source = "-- @CustomKey all_users\nselectAll:\nSELECT * FROM users;";
//! let options = CompilerOptions::default().with_custom_keys(true);
//! let generated = compile("User.sq", source, &options).unwrap();
//!
//! assert_eq!(generated.struct_name, "UserQueries");
//! assert!(matches!(generated.plans[0].keys, KeySource::Custom(_)));
//! ```

pub mod ast;
pub mod codegen;
pub mod keys;
pub mod lexer;
pub mod parser;
pub mod source;

mod compile;
mod error;
mod options;

pub use codegen::{KeySource, StatementKind, StatementPlan};
pub use compile::{compile, GeneratedFile};
pub use error::{CompileError, Result};
pub use keys::{Annotation, AnnotationKind, KeyExpression, Part, RenderError};
pub use options::CompilerOptions;
pub use parser::{ParseError, Parser};
pub use source::SourceFile;
