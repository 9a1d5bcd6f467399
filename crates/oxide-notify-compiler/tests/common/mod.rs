#![allow(dead_code)]

use oxide_notify_compiler::{
    compile, CompileError, CompilerOptions, GeneratedFile, KeySource, StatementPlan,
};

/// The message fixture shared with the runtime crate's tests.
pub const MESSAGE_SQ: &str = include_str!("../../../oxide-notify-runtime/tests/fixtures/Message.sq");

/// The accessors the runtime crate's tests run against.
pub const MESSAGE_RS: &str =
    include_str!("../../../oxide-notify-runtime/tests/fixtures/message_queries.rs");

/// Statements whose parameters share names with generated locals.
pub const LEDGER_SQ: &str = include_str!("../../../oxide-notify-runtime/tests/fixtures/Ledger.sq");

pub const LEDGER_RS: &str =
    include_str!("../../../oxide-notify-runtime/tests/fixtures/ledger_queries.rs");

pub fn options(custom_keys: bool) -> CompilerOptions {
    CompilerOptions::default().with_custom_keys(custom_keys)
}

pub fn compile_ok(file_name: &str, source: &str, custom_keys: bool) -> GeneratedFile {
    compile(file_name, source, &options(custom_keys))
        .unwrap_or_else(|e| panic!("Failed to compile {file_name}: {e}"))
}

pub fn compile_err(file_name: &str, source: &str, custom_keys: bool) -> CompileError {
    compile(file_name, source, &options(custom_keys))
        .expect_err(&format!("Expected compile error for {file_name}"))
}

pub fn plan<'a>(generated: &'a GeneratedFile, name: &str) -> &'a StatementPlan {
    generated
        .plans
        .iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("No statement named {name}"))
}

/// Renders a plan's keys with every parameter bound to `value_of(name)`.
pub fn resolve(plan: &StatementPlan, bound: &[(&str, &str)]) -> Vec<String> {
    plan.keys
        .resolve(|name| {
            bound
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| (*v).to_string())
        })
        .unwrap_or_else(|e| panic!("Failed to resolve keys of {}: {e}", plan.name))
}

pub fn tables(names: &[&str]) -> KeySource {
    KeySource::Tables(names.iter().map(ToString::to_string).collect())
}

/// Removes every annotation line from `source`.
pub fn strip_annotations(source: &str) -> String {
    source
        .lines()
        .filter(|line| !line.trim_start().starts_with("-- @"))
        .map(|line| format!("{line}\n"))
        .collect()
}
