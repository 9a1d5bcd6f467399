//! SQL statement parser.
//!
//! Parses the DML subset that `.sq` files label: SELECT, INSERT (including
//! REPLACE and upserts), UPDATE and DELETE.

mod error;
mod parser;
mod pratt;

pub use error::ParseError;
pub use parser::Parser;
