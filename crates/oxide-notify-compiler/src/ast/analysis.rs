//! Table and bind-parameter analysis over a parsed statement.
//!
//! Default topic keys are table names, and key templates are validated
//! against a statement's bind parameters; both lists come from here.

use std::collections::{HashMap, HashSet};

use super::expression::{Expr, InList, Parameter};
use super::statement::{
    InsertSource, JoinClause, SelectStatement, Statement, TableRef, UpsertAction,
};
use crate::lexer::Span;

/// A declared bind parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindParameter {
    /// Parameter name. Positional `?` placeholders are named `value{n}`,
    /// where `n` is the placeholder's position unless a named parameter
    /// already uses that name.
    pub name: String,
    /// True for `?` placeholders.
    pub positional: bool,
}

impl BindParameter {
    fn from_placeholder(param: &Parameter) -> Self {
        match &param.name {
            Some(name) => Self {
                name: name.clone(),
                positional: false,
            },
            // Renamed by `Analysis::name_positionals`.
            None => Self {
                name: format!("?{}", param.position),
                positional: true,
            },
        }
    }
}

/// One occurrence of a placeholder in the statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The bind parameter it refers to.
    pub name: String,
    /// Location in the parsed text, `:` included.
    pub span: Span,
}

/// Facts about one statement (or a block of statements).
///
/// Every list is deduplicated and kept in order of first appearance. For
/// parameters that is also SQLite's binding order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Tables the statement reads from.
    pub read_tables: Vec<String>,
    /// Tables the statement writes to.
    pub written_tables: Vec<String>,
    /// Bind parameters.
    pub parameters: Vec<BindParameter>,
    /// Every placeholder occurrence in textual order. Only meaningful for
    /// a single statement; [`merge`](Self::merge) leaves it alone.
    pub placeholders: Vec<Placeholder>,
}

impl Analysis {
    /// Analyzes a single statement.
    #[must_use]
    pub fn of(statement: &Statement) -> Self {
        Self::with_reserved(statement, &[])
    }

    /// Analyzes a single statement whose `?` placeholders may not take any
    /// name in `reserved`. Used for blocks, where the other statements'
    /// named parameters share the method's argument list.
    #[must_use]
    pub fn with_reserved(statement: &Statement, reserved: &[String]) -> Self {
        let mut analysis = Self::default();
        analysis.statement(statement);
        analysis.name_positionals(reserved);
        analysis
    }

    /// Names of the parameters written as `:name`.
    pub fn named_parameters(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| !p.positional)
            .map(|p| p.name.as_str())
    }

    /// Folds another analysis into this one, keeping first-appearance order.
    pub fn merge(&mut self, other: &Self) {
        for table in &other.read_tables {
            push_unique(&mut self.read_tables, table);
        }
        for table in &other.written_tables {
            push_unique(&mut self.written_tables, table);
        }
        for param in &other.parameters {
            if !self.has_parameter(&param.name) {
                self.parameters.push(param.clone());
            }
        }
    }

    /// Returns true if a parameter with exactly this name is declared.
    #[must_use]
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    /// Declared parameter names, in binding order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Select(select) => self.select(select),
            Statement::Insert(insert) => {
                push_unique(&mut self.written_tables, &insert.table);
                match &insert.source {
                    InsertSource::Values(rows) => {
                        for row in rows {
                            row.iter().for_each(|e| self.expr(e));
                        }
                    }
                    InsertSource::Query(query) => self.select(query),
                    InsertSource::DefaultValues => {}
                }
                if let Some(upsert) = &insert.upsert {
                    if let UpsertAction::Update {
                        assignments,
                        where_clause,
                    } = &upsert.action
                    {
                        assignments.iter().for_each(|a| self.expr(&a.value));
                        self.opt_expr(where_clause.as_ref());
                    }
                }
            }
            Statement::Update(update) => {
                push_unique(&mut self.written_tables, &update.table);
                update.assignments.iter().for_each(|a| self.expr(&a.value));
                if let Some(from) = &update.from {
                    self.table_ref(from);
                }
                self.opt_expr(update.where_clause.as_ref());
            }
            Statement::Delete(delete) => {
                push_unique(&mut self.written_tables, &delete.table);
                self.opt_expr(delete.where_clause.as_ref());
            }
        }
    }

    fn select(&mut self, select: &SelectStatement) {
        select.columns.iter().for_each(|c| self.expr(&c.expr));
        if let Some(from) = &select.from {
            self.table_ref(from);
        }
        self.opt_expr(select.where_clause.as_ref());
        select.group_by.iter().for_each(|e| self.expr(e));
        self.opt_expr(select.having.as_ref());
        select.order_by.iter().for_each(|o| self.expr(&o.expr));
        self.opt_expr(select.limit.as_ref());
        self.opt_expr(select.offset.as_ref());
    }

    fn table_ref(&mut self, table_ref: &TableRef) {
        match table_ref {
            TableRef::Table { name, .. } => push_unique(&mut self.read_tables, name),
            TableRef::Subquery { query, .. } => self.select(query),
            TableRef::Join { left, join } => {
                self.table_ref(left);
                let JoinClause { table, on, .. } = join.as_ref();
                self.table_ref(table);
                self.opt_expr(on.as_ref());
            }
        }
    }

    fn opt_expr(&mut self, expr: Option<&Expr>) {
        if let Some(expr) = expr {
            self.expr(expr);
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) | Expr::Column { .. } | Expr::Wildcard { .. } => {}
            Expr::Parameter(param) => {
                let span = param.span;
                let param = BindParameter::from_placeholder(param);
                self.placeholders.push(Placeholder {
                    name: param.name.clone(),
                    span,
                });
                if !self.has_parameter(&param.name) {
                    self.parameters.push(param);
                }
            }
            Expr::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::Unary { operand, .. } => self.expr(operand),
            Expr::Function(call) => call.args.iter().for_each(|e| self.expr(e)),
            Expr::Subquery(query) | Expr::Exists { query, .. } => self.select(query),
            Expr::IsNull { expr, .. } | Expr::Cast { expr, .. } | Expr::Paren(expr) => {
                self.expr(expr);
            }
            Expr::In { expr, list, .. } => {
                self.expr(expr);
                match list {
                    InList::Values(values) => values.iter().for_each(|e| self.expr(e)),
                    InList::Subquery(query) => self.select(query),
                }
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                self.expr(expr);
                self.expr(low);
                self.expr(high);
            }
            Expr::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                if let Some(operand) = operand {
                    self.expr(operand);
                }
                for (when, then) in when_clauses {
                    self.expr(when);
                    self.expr(then);
                }
                if let Some(else_clause) = else_clause {
                    self.expr(else_clause);
                }
            }
            Expr::Tuple(items) => items.iter().for_each(|e| self.expr(e)),
        }
    }
}

impl Analysis {
    /// Gives each `?` the name `value{n}`, counting up from its position
    /// past every named parameter, `reserved` name and earlier `?`.
    fn name_positionals(&mut self, reserved: &[String]) {
        let mut taken: HashSet<String> = self
            .named_parameters()
            .map(str::to_string)
            .chain(reserved.iter().cloned())
            .collect();
        let mut renames = HashMap::new();
        for param in self.parameters.iter_mut().filter(|p| p.positional) {
            let mut n: usize = param.name.trim_start_matches('?').parse().unwrap_or(1);
            let mut name = format!("value{n}");
            while taken.contains(&name) {
                n += 1;
                name = format!("value{n}");
            }
            taken.insert(name.clone());
            renames.insert(std::mem::replace(&mut param.name, name.clone()), name);
        }
        for placeholder in &mut self.placeholders {
            if let Some(name) = renames.get(&placeholder.name) {
                placeholder.name.clone_from(name);
            }
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
