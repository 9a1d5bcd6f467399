//! Listener planning and Rust code generation.

mod plan;
mod rust;

pub use plan::{plan_statement, KeySource, PlannedSql, StatementKind, StatementPlan};
pub use rust::{generate_module, method_name, to_pascal_case, to_snake_case};
