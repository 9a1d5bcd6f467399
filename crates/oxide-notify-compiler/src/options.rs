//! Compiler options.

use serde::Deserialize;

/// Options controlling code generation.
///
/// Deserializable from a JSON options file; missing fields take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct CompilerOptions {
    /// Honor `@CustomKey` and `@NotifyCustomKey` annotations. When off,
    /// annotations are ignored and table names are used as keys.
    pub custom_keys: bool,
    /// Suffix appended to the file stem to name the generated struct.
    pub struct_suffix: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            custom_keys: false,
            struct_suffix: String::from("Queries"),
        }
    }
}

impl CompilerOptions {
    /// Returns a copy with custom keys turned on.
    #[must_use]
    pub fn with_custom_keys(mut self, enabled: bool) -> Self {
        self.custom_keys = enabled;
        self
    }
}
