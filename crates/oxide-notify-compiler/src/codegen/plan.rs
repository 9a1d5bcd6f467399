//! Per-statement listener planning.
//!
//! Decides, for each named statement, which topic keys it listens under
//! (reads) or notifies (mutations and blocks).

use tracing::debug;

use crate::ast::{Analysis, BindParameter, Statement};
use crate::error::{CompileError, Result};
use crate::keys::{extract_annotations, AnnotationKind, KeyExpression, RenderError};
use crate::options::CompilerOptions;
use crate::source::{NamedStatement, SourceFile, StatementBody};

/// What a named statement does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// A single SELECT.
    Read,
    /// A single INSERT, UPDATE or DELETE.
    Mutation,
    /// A block of mutations run in one transaction.
    Transaction,
}

impl StatementKind {
    /// The annotation kind that applies to this statement.
    #[must_use]
    pub const fn annotation(self) -> AnnotationKind {
        match self {
            Self::Read => AnnotationKind::CustomKey,
            Self::Mutation | Self::Transaction => AnnotationKind::NotifyCustomKey,
        }
    }
}

/// Where a statement's topic keys come from. Never a mix of both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// One key per table: tables read for reads, tables written otherwise.
    Tables(Vec<String>),
    /// Declared keys, in source order.
    Custom(Vec<KeyExpression>),
}

impl KeySource {
    /// True if the keys come from annotations.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Number of keys, before rendering.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Tables(tables) => tables.len(),
            Self::Custom(keys) => keys.len(),
        }
    }

    /// True if there are no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders the concrete keys for a set of bound values.
    ///
    /// # Errors
    ///
    /// Returns a `RenderError` if a template references a parameter the
    /// lookup cannot supply.
    pub fn resolve<F>(&self, mut lookup: F) -> core::result::Result<Vec<String>, RenderError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        match self {
            Self::Tables(tables) => Ok(tables.clone()),
            Self::Custom(keys) => keys.iter().map(|key| key.render(&mut lookup)).collect(),
        }
    }
}

/// One SQL statement to execute, with the parameters it binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSql {
    /// The statement text with every placeholder rewritten to `?N`, `N`
    /// being the parameter's position in `parameters`.
    pub sql: String,
    /// Parameter names in SQLite binding order.
    pub parameters: Vec<String>,
}

/// Everything code generation needs for one named statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementPlan {
    /// The statement's label.
    pub name: String,
    /// Read, mutation or transaction.
    pub kind: StatementKind,
    /// Parameters of the generated method, in first-appearance order.
    pub parameters: Vec<BindParameter>,
    /// Statements to run, in order.
    pub statements: Vec<PlannedSql>,
    /// Keys to listen under or notify.
    pub keys: KeySource,
}

/// Plans the statement at `index` of `file`.
///
/// # Errors
///
/// Returns a `CompileError` for a block that is empty or contains a
/// SELECT, or for a key annotation referencing an undeclared parameter.
pub fn plan_statement(
    file: &SourceFile,
    index: usize,
    statement: &NamedStatement,
    options: &CompilerOptions,
) -> Result<StatementPlan> {
    let kind = classify(statement)?;

    // `?` placeholders are named after the block's named parameters are known.
    let named: Vec<String> = statement
        .statements()
        .iter()
        .flat_map(|sql| {
            Analysis::of(&sql.statement)
                .named_parameters()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();

    let mut analysis = Analysis::default();
    let mut statements = vec![];
    for sql in statement.statements() {
        let inner = Analysis::with_reserved(&sql.statement, &named);
        statements.push(PlannedSql {
            sql: number_placeholders(&sql.sql, &inner),
            parameters: inner.parameter_names().map(str::to_string).collect(),
        });
        analysis.merge(&inner);
    }

    let keys = if options.custom_keys {
        custom_keys(file, index, statement, kind, &analysis)?
    } else {
        vec![]
    };

    let keys = if keys.is_empty() {
        let tables = match kind {
            StatementKind::Read => analysis.read_tables.clone(),
            StatementKind::Mutation | StatementKind::Transaction => {
                analysis.written_tables.clone()
            }
        };
        KeySource::Tables(tables)
    } else {
        KeySource::Custom(keys)
    };

    debug!(
        statement = %statement.name,
        kind = ?kind,
        custom = keys.is_custom(),
        keys = keys.len(),
        "Planned statement"
    );

    Ok(StatementPlan {
        name: statement.name.clone(),
        kind,
        parameters: analysis.parameters,
        statements,
        keys,
    })
}

fn classify(statement: &NamedStatement) -> Result<StatementKind> {
    match &statement.body {
        StatementBody::Single(sql) if sql.statement.is_query() => Ok(StatementKind::Read),
        StatementBody::Single(_) => Ok(StatementKind::Mutation),
        StatementBody::Block(statements) if statements.is_empty() => {
            Err(CompileError::EmptyTransaction {
                statement: statement.name.clone(),
            })
        }
        StatementBody::Block(statements) => {
            if statements
                .iter()
                .any(|s| matches!(s.statement, Statement::Select(_)))
            {
                return Err(CompileError::ReadInTransaction {
                    statement: statement.name.clone(),
                });
            }
            Ok(StatementKind::Transaction)
        }
    }
}

/// Rewrites `:name` and `?` placeholders to numbered `?N` form, which is
/// what the SQLite driver binds by position.
fn number_placeholders(sql: &str, analysis: &Analysis) -> String {
    let mut placeholders: Vec<_> = analysis.placeholders.iter().collect();
    placeholders.sort_by_key(|p| p.span.start);

    let mut out = String::with_capacity(sql.len());
    let mut last = 0;
    for placeholder in placeholders {
        let Some(position) = analysis
            .parameters
            .iter()
            .position(|p| p.name == placeholder.name)
        else {
            continue;
        };
        out.push_str(&sql[last..placeholder.span.start]);
        out.push('?');
        out.push_str(&(position + 1).to_string());
        last = placeholder.span.end;
    }
    out.push_str(&sql[last..]);
    out
}

/// Annotations relevant to `kind`, validated against the declared
/// parameters.
fn custom_keys(
    file: &SourceFile,
    index: usize,
    statement: &NamedStatement,
    kind: StatementKind,
    analysis: &Analysis,
) -> Result<Vec<KeyExpression>> {
    let declared: Vec<&str> = analysis.parameter_names().collect();
    let wanted = kind.annotation();

    let mut keys = vec![];
    for annotation in extract_annotations(file, index) {
        if annotation.kind != wanted {
            debug!(
                statement = %statement.name,
                annotation = annotation.kind.prefix().trim(),
                "Ignoring annotation that does not apply to this statement"
            );
            continue;
        }
        annotation.expression.validate(&statement.name, &declared)?;
        keys.push(annotation.expression);
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(source: &str, custom_keys: bool) -> Result<StatementPlan> {
        let file = SourceFile::parse(source).unwrap();
        let (index, statement) = file.statements().next().unwrap();
        let options = CompilerOptions::default().with_custom_keys(custom_keys);
        plan_statement(&file, index, statement, &options)
    }

    #[test]
    fn test_read_defaults_to_read_tables() {
        let plan = plan(
            "q: SELECT * FROM messages m JOIN users u ON u.id = m.author;",
            true,
        )
        .unwrap();
        assert_eq!(plan.kind, StatementKind::Read);
        assert_eq!(
            plan.keys,
            KeySource::Tables(vec![String::from("messages"), String::from("users")])
        );
    }

    #[test]
    fn test_custom_keys_replace_tables() {
        let plan = plan(
            "-- @CustomKey all_users\nselectAll: SELECT * FROM users;",
            true,
        )
        .unwrap();
        assert_eq!(
            plan.keys,
            KeySource::Custom(vec![KeyExpression::parse("all_users")])
        );
    }

    #[test]
    fn test_disabled_ignores_annotations_without_validation() {
        let plan = plan(
            "-- @CustomKey user_:missing\nselectAll: SELECT * FROM users;",
            false,
        )
        .unwrap();
        assert_eq!(plan.keys, KeySource::Tables(vec![String::from("users")]));
    }

    #[test]
    fn test_irrelevant_kind_ignored() {
        let first = plan(
            "-- @NotifyCustomKey everything\nselectAll: SELECT * FROM users;",
            true,
        )
        .unwrap();
        assert!(!first.keys.is_custom());

        let plan = plan(
            "-- @CustomKey everything\ndeleteAll: DELETE FROM users;",
            true,
        )
        .unwrap();
        assert_eq!(plan.keys, KeySource::Tables(vec![String::from("users")]));
    }

    #[test]
    fn test_mutation_notify_key() {
        let plan = plan(
            "-- @NotifyCustomKey conversation_:conversation_id\n\
             insertMessage: INSERT INTO messages (conversation_id, body) VALUES (:conversation_id, :body);",
            true,
        )
        .unwrap();
        assert_eq!(plan.kind, StatementKind::Mutation);
        let keys = plan
            .keys
            .resolve(|name| (name == "conversation_id").then(|| String::from("c1")))
            .unwrap();
        assert_eq!(keys, vec!["conversation_c1"]);
    }

    #[test]
    fn test_unresolved_parameter() {
        let err = plan(
            "-- @CustomKey conversation_:invalid_param\n\
             selectByConversation: SELECT * FROM messages WHERE conversation_id = :conversation_id;",
            true,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CompileError::UnresolvedParameter {
                statement: String::from("selectByConversation"),
                parameter: String::from("invalid_param"),
            }
        );
    }

    #[test]
    fn test_transaction_plan() {
        let plan = plan(
            "archive {\n\
               INSERT INTO archive (id) SELECT id FROM messages WHERE id = :id;\n\
               DELETE FROM messages WHERE id = :id AND owner = :owner;\n\
             }",
            true,
        )
        .unwrap();
        assert_eq!(plan.kind, StatementKind::Transaction);
        assert_eq!(
            plan.keys,
            KeySource::Tables(vec![String::from("archive"), String::from("messages")])
        );
        let names: Vec<_> = plan.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "owner"]);
        assert_eq!(plan.statements[0].parameters, vec!["id"]);
        assert_eq!(plan.statements[1].parameters, vec!["id", "owner"]);
        assert_eq!(
            plan.statements[1].sql,
            "DELETE FROM messages WHERE id = ?1 AND owner = ?2"
        );
    }

    #[test]
    fn test_placeholders_numbered_by_binding_order() {
        let plan = plan(
            "q: SELECT * FROM t WHERE a = :a OR b = ? OR c = :a LIMIT :limit;",
            false,
        )
        .unwrap();
        assert_eq!(
            plan.statements[0].sql,
            "SELECT * FROM t WHERE a = ?1 OR b = ?2 OR c = ?1 LIMIT ?3"
        );
        assert_eq!(plan.statements[0].parameters, vec!["a", "value1", "limit"]);
    }

    #[test]
    fn test_positional_does_not_merge_with_named() {
        let plan = plan("q: SELECT * FROM t WHERE a = :value1 OR b = ?;", false).unwrap();
        assert_eq!(plan.statements[0].sql, "SELECT * FROM t WHERE a = ?1 OR b = ?2");
        assert_eq!(plan.statements[0].parameters, vec!["value1", "value2"]);
        assert_eq!(plan.parameters.len(), 2);
    }

    #[test]
    fn test_block_positional_avoids_later_named() {
        let plan = plan(
            "b {\n  DELETE FROM t WHERE id = ?;\n  DELETE FROM u WHERE id = :value1;\n}",
            false,
        )
        .unwrap();
        assert_eq!(plan.statements[0].parameters, vec!["value2"]);
        assert_eq!(plan.statements[1].parameters, vec!["value1"]);
        assert_eq!(
            plan.parameters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            vec!["value2", "value1"]
        );
    }

    #[test]
    fn test_block_errors() {
        assert_eq!(
            plan("b { SELECT 1; }", true).unwrap_err(),
            CompileError::ReadInTransaction {
                statement: String::from("b")
            }
        );
        assert_eq!(
            plan("b { }", true).unwrap_err(),
            CompileError::EmptyTransaction {
                statement: String::from("b")
            }
        );
    }

    #[test]
    fn test_resolve_reports_unbound() {
        let keys = KeySource::Custom(vec![KeyExpression::parse("user_:user_id")]);
        assert_eq!(
            keys.resolve(|_| None),
            Err(RenderError::Unbound(String::from("user_id")))
        );
    }
}
