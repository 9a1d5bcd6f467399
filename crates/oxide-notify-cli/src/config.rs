//! Compiler options from an optional JSON file and command-line flags.

use std::path::Path;

use oxide_notify_compiler::CompilerOptions;
use tracing::debug;

use crate::error::{CliError, Result};

/// Loads options from `path` if given, then applies flag overrides.
///
/// `custom_keys` only ever turns the feature on; leaving the flag unset
/// keeps whatever the file says.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid options
/// object.
pub fn load_options(path: Option<&Path>, custom_keys: bool) -> Result<CompilerOptions> {
    let mut options = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
            serde_json::from_str(&text).map_err(|source| CliError::Config {
                path: path.to_path_buf(),
                source,
            })?
        }
        None => CompilerOptions::default(),
    };
    if custom_keys {
        options.custom_keys = true;
    }
    debug!(
        custom_keys = options.custom_keys,
        struct_suffix = %options.struct_suffix,
        "Loaded options"
    );
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn options_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file() {
        let options = load_options(None, false).unwrap();
        assert_eq!(options, CompilerOptions::default());
    }

    #[test]
    fn test_file_values() {
        let file = options_file(r#"{"custom_keys": true, "struct_suffix": "Store"}"#);
        let options = load_options(Some(file.path()), false).unwrap();
        assert!(options.custom_keys);
        assert_eq!(options.struct_suffix, "Store");
    }

    #[test]
    fn test_flag_overrides_file() {
        let file = options_file(r#"{"custom_keys": false}"#);
        let options = load_options(Some(file.path()), true).unwrap();
        assert!(options.custom_keys);
    }

    #[test]
    fn test_invalid_file() {
        let file = options_file(r#"{"custom_keys": "yes"}"#);
        let err = load_options(Some(file.path()), false).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_options(Some(Path::new("/nonexistent/options.json")), false).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
