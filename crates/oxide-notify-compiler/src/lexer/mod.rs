//! SQL lexer.
//!
//! A hand-written lexer producing a stream of tokens. Comments and
//! whitespace are available as trivia tokens for the source-file parser.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{CommentStyle, Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
