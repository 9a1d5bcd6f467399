//! Topic key expressions: `all_users` or `conversation_:conversation_id`.

use core::fmt;

use tracing::warn;

use crate::error::CompileError;

/// A piece of a key template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Literal text copied into the key.
    Text(String),
    /// A bind parameter whose value is substituted at call time.
    Parameter(String),
}

/// A parsed key expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyExpression {
    /// A key with no parameter references.
    Literal(String),
    /// Text mixed with `:name` parameter references.
    Template(Vec<Part>),
}

/// Failure to render a key at call time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The lookup had no value for a referenced parameter.
    #[error("no value bound for key parameter `:{0}`")]
    Unbound(String),
}

impl KeyExpression {
    /// Parses an expression. Input is trimmed first.
    ///
    /// A `:` not followed by an identifier character is dropped along with
    /// the empty reference.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let (expression, dropped) = Self::scan(input);
        if dropped > 0 {
            warn!(
                expression = %input.trim(),
                dropped,
                "Dropped empty parameter reference in key expression"
            );
        }
        expression
    }

    /// Parses `input`, returning the expression and the number of empty
    /// references dropped.
    pub(crate) fn scan(input: &str) -> (Self, usize) {
        let input = input.trim();
        if !input.contains(':') {
            return (Self::Literal(input.to_string()), 0);
        }

        let mut parts = vec![];
        let mut text = String::new();
        let mut dropped = 0;
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            if c != ':' {
                text.push(c);
                continue;
            }
            if !text.is_empty() {
                parts.push(Part::Text(core::mem::take(&mut text)));
            }
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if !is_name_char(c) {
                    break;
                }
                name.push(c);
                chars.next();
            }
            if name.is_empty() {
                dropped += 1;
            } else {
                parts.push(Part::Parameter(name));
            }
        }
        if !text.is_empty() {
            parts.push(Part::Text(text));
        }

        (Self::Template(parts), dropped)
    }

    /// Names of referenced parameters in order, duplicates included.
    #[must_use]
    pub fn referenced_parameters(&self) -> Vec<&str> {
        match self {
            Self::Literal(_) => vec![],
            Self::Template(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    Part::Parameter(name) => Some(name.as_str()),
                    Part::Text(_) => None,
                })
                .collect(),
        }
    }

    /// True if the key is the same for every call.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Literal(_) => true,
            Self::Template(parts) => parts.iter().all(|p| matches!(p, Part::Text(_))),
        }
    }

    /// The key text, if the expression is constant.
    #[must_use]
    pub fn constant_text(&self) -> Option<String> {
        match self {
            Self::Literal(text) => Some(text.clone()),
            Self::Template(_) if self.is_constant() => Some(self.to_string()),
            Self::Template(_) => None,
        }
    }

    /// Renders the key, looking up each parameter's value.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Unbound`] for the first parameter the lookup
    /// has no value for.
    pub fn render<F>(&self, mut lookup: F) -> Result<String, RenderError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        match self {
            Self::Literal(text) => Ok(text.clone()),
            Self::Template(parts) => {
                let mut key = String::new();
                for part in parts {
                    match part {
                        Part::Text(text) => key.push_str(text),
                        Part::Parameter(name) => {
                            let value = lookup(name)
                                .ok_or_else(|| RenderError::Unbound(name.clone()))?;
                            key.push_str(&value);
                        }
                    }
                }
                Ok(key)
            }
        }
    }

    /// Checks every referenced parameter against the statement's declared
    /// bind parameters. Matching is exact and case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnresolvedParameter`] naming `statement` and
    /// the first undeclared parameter.
    pub fn validate(&self, statement: &str, declared: &[&str]) -> Result<(), CompileError> {
        match self
            .referenced_parameters()
            .into_iter()
            .find(|name| !declared.contains(name))
        {
            Some(parameter) => Err(CompileError::UnresolvedParameter {
                statement: statement.to_string(),
                parameter: parameter.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for KeyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.write_str(text),
            Self::Template(parts) => {
                for part in parts {
                    match part {
                        Part::Text(text) => f.write_str(text)?,
                        Part::Parameter(name) => write!(f, ":{name}")?,
                    }
                }
                Ok(())
            }
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
