//! The `.sq` to Rust compilation pipeline.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, info};

use crate::codegen::{
    generate_module, method_name, plan_statement, to_pascal_case, to_snake_case, StatementPlan,
};
use crate::error::{CompileError, Result};
use crate::options::CompilerOptions;
use crate::source::SourceFile;

/// The output of compiling one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Module name for the generated file, e.g. `user` for `User.sq`.
    pub module_name: String,
    /// Name of the generated struct, e.g. `UserQueries`.
    pub struct_name: String,
    /// One plan per named statement, in source order.
    pub plans: Vec<StatementPlan>,
    /// The generated Rust source.
    pub source: String,
}

/// Compiles a `.sq` file into a Rust module.
///
/// Every statement is planned before anything is rendered, so an error in
/// any statement means no output for the whole file.
///
/// # Errors
///
/// Returns a [`CompileError`] for invalid syntax, duplicate statement
/// names or generated method names, malformed transaction blocks, or key
/// annotations referencing undeclared parameters.
pub fn compile(file_name: &str, source: &str, options: &CompilerOptions) -> Result<GeneratedFile> {
    let file = SourceFile::parse(source).map_err(|error| CompileError::Syntax {
        file: file_name.to_string(),
        error,
    })?;

    let mut seen = HashSet::new();
    // The constructor is always generated.
    let mut methods = HashMap::from([(String::from("new"), None)]);
    let mut plans = vec![];
    for (index, statement) in file.statements() {
        if !seen.insert(statement.name.as_str()) {
            return Err(CompileError::DuplicateStatement {
                file: file_name.to_string(),
                name: statement.name.clone(),
            });
        }
        let method = method_name(&statement.name);
        if let Some(existing) = methods.get(&method) {
            return Err(CompileError::MethodCollision {
                file: file_name.to_string(),
                statement: statement.name.clone(),
                method,
                existing: existing.clone(),
            });
        }
        methods.insert(method, Some(statement.name.clone()));
        plans.push(plan_statement(&file, index, statement, options)?);
    }

    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let module_name = to_snake_case(stem);
    let struct_name = format!("{}{}", to_pascal_case(stem), options.struct_suffix);

    debug!(file = %file_name, statements = plans.len(), "Planned file");
    let generated = generate_module(file_name, &struct_name, &plans);
    info!(file = %file_name, module = %module_name, "Generated {}", struct_name);

    Ok(GeneratedFile {
        module_name,
        struct_name,
        plans,
        source: generated,
    })
}
