//! The `generate` and `check` commands.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use oxide_notify_compiler::{compile, CompilerOptions, GeneratedFile, KeySource, StatementKind};
use tracing::{debug, error, info};

use crate::error::{CliError, Result};

/// A compiled source file and where it came from.
#[derive(Debug)]
pub struct Compiled {
    /// Path of the `.sq` file.
    pub path: PathBuf,
    /// The compiler's output.
    pub generated: GeneratedFile,
}

/// Finds every `.sq` file under `dir`, sorted by path.
///
/// # Errors
///
/// Returns an error if `dir` does not exist or cannot be read.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CliError::InputNotFound(dir.to_path_buf()));
    }
    let mut files = vec![];
    let mut pending = vec![dir.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| CliError::io(&dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| CliError::io(&dir, e))?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "sq") {
                files.push(path);
            }
        }
    }
    files.sort();
    debug!(dir = %dir.display(), files = files.len(), "Discovered source files");
    Ok(files)
}

/// Compiles every `.sq` file under `dir`.
///
/// Every file is attempted; failures are logged one by one and reported
/// together.
///
/// # Errors
///
/// Returns [`CliError::Failed`] if any file failed to compile, or an IO
/// error if the directory or a file cannot be read.
pub fn compile_dir(dir: &Path, options: &CompilerOptions) -> Result<Vec<Compiled>> {
    let paths = discover(dir)?;
    let total = paths.len();
    let mut compiled = vec![];
    let mut failed = 0;

    for path in paths {
        let source = fs::read_to_string(&path).map_err(|e| CliError::io(&path, e))?;
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        match compile(&file_name, &source, options) {
            Ok(generated) => compiled.push(Compiled { path, generated }),
            Err(e) => {
                error!(file = %path.display(), "{}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Failed { failed, total });
    }
    Ok(compiled)
}

/// Compiles `input` and writes one module per file plus a `mod.rs` into
/// `out`. Nothing is written unless every file compiles.
///
/// # Errors
///
/// Returns an error if compilation fails, two files map to the same module
/// name, or the output cannot be written.
pub fn generate(input: &Path, out: &Path, options: &CompilerOptions) -> Result<Vec<PathBuf>> {
    let compiled = compile_dir(input, options)?;

    let mut modules: HashMap<&str, &Path> = HashMap::new();
    for file in &compiled {
        if let Some(first) = modules.insert(&file.generated.module_name, &file.path) {
            return Err(CliError::DuplicateModule {
                module: file.generated.module_name.clone(),
                first: first.to_path_buf(),
                second: file.path.clone(),
            });
        }
    }

    fs::create_dir_all(out).map_err(|e| CliError::io(out, e))?;
    let mut written = vec![];
    for file in &compiled {
        let target = out.join(format!("{}.rs", file.generated.module_name));
        fs::write(&target, &file.generated.source).map_err(|e| CliError::io(&target, e))?;
        debug!(file = %target.display(), "Wrote module");
        written.push(target);
    }

    let target = out.join("mod.rs");
    fs::write(&target, module_index(&compiled)).map_err(|e| CliError::io(&target, e))?;
    written.push(target);

    info!(
        files = compiled.len(),
        out = %out.display(),
        "Generated accessors"
    );
    Ok(written)
}

/// The `mod.rs` declaring every generated module.
fn module_index(compiled: &[Compiled]) -> String {
    let mut index = String::from("// Generated by oxide-notify. Do not edit.\n\n");
    for file in compiled {
        let _ = writeln!(index, "mod {};", file.generated.module_name);
    }
    index.push('\n');
    for file in compiled {
        let _ = writeln!(
            index,
            "pub use {}::{};",
            file.generated.module_name, file.generated.struct_name
        );
    }
    index
}

/// Describes the statements of a compiled file and the keys each one
/// listens under or notifies. Template parameters show as `<name>`.
#[must_use]
pub fn explain(file: &Compiled) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({})",
        file.path.display(),
        file.generated.struct_name
    );
    for plan in &file.generated.plans {
        let verb = match plan.kind {
            StatementKind::Read => "listens on",
            StatementKind::Mutation | StatementKind::Transaction => "notifies",
        };
        let origin = match plan.keys {
            KeySource::Tables(_) => "tables",
            KeySource::Custom(_) => "custom",
        };
        let keys = plan
            .keys
            .resolve(|name| Some(format!("<{name}>")))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {} {verb} [{}] ({origin})",
            plan.name,
            keys.join(", ")
        );
    }
    out
}
