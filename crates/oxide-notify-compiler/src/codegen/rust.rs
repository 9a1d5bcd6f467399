//! Rust source generation.
//!
//! Renders a list of [`StatementPlan`]s as a module containing one struct
//! with a method per statement, wired to the runtime's listener registry.

use std::collections::HashMap;

use super::plan::{KeySource, PlannedSql, StatementKind, StatementPlan};
use crate::keys::{KeyExpression, Part};

/// Generates the Rust module for one source file.
///
/// * `file_name` - Source file name, used in the header comment.
/// * `struct_name` - Name of the generated struct.
/// * `plans` - One plan per named statement, in source order.
#[must_use]
pub fn generate_module(file_name: &str, struct_name: &str, plans: &[StatementPlan]) -> String {
    let mut methods = String::new();
    for plan in plans {
        methods.push('\n');
        methods.push_str(&render_method(plan));
    }

    format!(
        "// Generated by oxide-notify from {file_name}. Do not edit.\n\
         \n\
         use oxide_notify_runtime::sqlx::sqlite::SqliteRow;\n\
         use oxide_notify_runtime::{{Database, Query, Result, ToSqlValue}};\n\
         \n\
         /// Statements declared in `{file_name}`.\n\
         #[derive(Clone)]\n\
         pub struct {struct_name} {{\n\
         \x20   db: Database,\n\
         }}\n\
         \n\
         impl {struct_name} {{\n\
         \x20   /// Wraps a database handle.\n\
         \x20   pub fn new(db: Database) -> Self {{\n\
         \x20       Self {{ db }}\n\
         \x20   }}\n\
         {methods}\
         }}\n"
    )
}

/// Converts a file stem like `user_profile` or `UserProfile` into
/// `UserProfile`.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = true;
    for c in s.chars() {
        if c == '_' || c == '-' || c == ' ' || c == '.' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Converts `selectAll`, `HTTPStatus` or `select_all` into snake case.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' || c == '.' {
            result.push('_');
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower)
            {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }
    result
}

/// Escapes a name that collides with a Rust keyword.
fn rust_ident(name: &str) -> String {
    const KEYWORDS: &[&str] = &[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
        "move", "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "type",
        "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "gen",
        "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
    ];
    match name {
        // Cannot be raw identifiers.
        "self" | "Self" | "super" | "crate" => format!("{name}_"),
        _ if KEYWORDS.contains(&name) => format!("r#{name}"),
        _ => name.to_string(),
    }
}

/// Locals declared by every generated method body.
const LOCALS: &[&str] = &["keys", "rows", "tx"];

/// The method generated for a statement label.
#[must_use]
pub fn method_name(statement: &str) -> String {
    rust_ident(&to_snake_case(statement))
}

/// Maps SQL parameter names to distinct Rust argument names.
///
/// Arguments never reuse a name from [`LOCALS`]; a clash gets a numeric
/// suffix like any other collision.
struct Arguments {
    names: HashMap<String, String>,
    order: Vec<String>,
}

impl Arguments {
    fn new(plan: &StatementPlan) -> Self {
        let mut names = HashMap::new();
        let mut order: Vec<String> = vec![];
        for param in &plan.parameters {
            let base = to_snake_case(&param.name);
            let mut ident = rust_ident(&base);
            let mut n = 2;
            while LOCALS.contains(&ident.as_str()) || order.contains(&ident) {
                ident = rust_ident(&format!("{base}_{n}"));
                n += 1;
            }
            names.insert(param.name.clone(), ident.clone());
            order.push(ident);
        }
        Self { names, order }
    }

    fn ident(&self, param: &str) -> String {
        self.names
            .get(param)
            .cloned()
            .unwrap_or_else(|| rust_ident(param))
    }

    fn signature(&self) -> String {
        self.order
            .iter()
            .map(|ident| format!(", {ident}: impl ToSqlValue"))
            .collect()
    }

    /// Converts every argument to a `SqlValue` once, up front.
    fn conversions(&self) -> String {
        self.order
            .iter()
            .map(|ident| format!("\x20       let {ident} = {ident}.to_sql_value();\n"))
            .collect()
    }

    fn values(&self, parameters: &[String]) -> String {
        let values: Vec<_> = parameters
            .iter()
            .map(|p| format!("{}.clone()", self.ident(p)))
            .collect();
        format!("vec![{}]", values.join(", "))
    }
}

fn render_method(plan: &StatementPlan) -> String {
    let args = Arguments::new(plan);
    let method = method_name(&plan.name);
    let signature = args.signature();
    let conversions = args.conversions();
    let keys = render_keys(&plan.keys, &args);

    match plan.kind {
        StatementKind::Read => {
            let sql = plan
                .statements
                .first()
                .map(|s| (rust_string(&s.sql), args.values(&s.parameters)));
            let (sql, values) = sql.unwrap_or_else(|| (rust_string(""), String::from("vec![]")));
            format!(
                "\x20   /// Runs `{name}`. The returned query listens on {listens}.\n\
                 \x20   pub fn {method}(&self{signature}) -> Query<Vec<SqliteRow>> {{\n\
                 {conversions}\
                 \x20       let keys = {keys};\n\
                 \x20       self.db.query(keys, {sql}, {values})\n\
                 \x20   }}\n",
                name = plan.name,
                listens = describe_keys(&plan.keys),
            )
        }
        StatementKind::Mutation => {
            let statement = plan.statements.first().map_or_else(
                || String::from("0"),
                |s| {
                    format!(
                        "self.db.execute({}, {}).await?",
                        rust_string(&s.sql),
                        args.values(&s.parameters)
                    )
                },
            );
            format!(
                "\x20   /// Runs `{name}`, then notifies {notifies}.\n\
                 \x20   pub async fn {method}(&self{signature}) -> Result<u64> {{\n\
                 {conversions}\
                 \x20       let keys = {keys};\n\
                 \x20       let rows = {statement};\n\
                 \x20       self.db.notify(&keys);\n\
                 \x20       Ok(rows)\n\
                 \x20   }}\n",
                name = plan.name,
                notifies = describe_keys(&plan.keys),
            )
        }
        StatementKind::Transaction => {
            let body: String = plan
                .statements
                .iter()
                .map(|s| render_transaction_step(s, &args))
                .collect();
            format!(
                "\x20   /// Runs `{name}` in one transaction, then notifies {notifies}\n\
                 \x20   /// once it commits.\n\
                 \x20   pub async fn {method}(&self{signature}) -> Result<u64> {{\n\
                 {conversions}\
                 \x20       let keys = {keys};\n\
                 \x20       let mut tx = self.db.begin().await?;\n\
                 \x20       let mut rows = 0;\n\
                 {body}\
                 \x20       tx.notify(&keys);\n\
                 \x20       tx.commit().await?;\n\
                 \x20       Ok(rows)\n\
                 \x20   }}\n",
                name = plan.name,
                notifies = describe_keys(&plan.keys),
            )
        }
    }
}

fn render_transaction_step(statement: &PlannedSql, args: &Arguments) -> String {
    format!(
        "\x20       rows += tx.execute({}, {}).await?;\n",
        rust_string(&statement.sql),
        args.values(&statement.parameters)
    )
}

/// Renders the `Vec<String>` expression of a statement's keys.
fn render_keys(keys: &KeySource, args: &Arguments) -> String {
    let items: Vec<String> = match keys {
        KeySource::Tables(tables) => tables
            .iter()
            .map(|t| format!("String::from({})", rust_string(t)))
            .collect(),
        KeySource::Custom(keys) => keys.iter().map(|k| render_key(k, args)).collect(),
    };
    if items.is_empty() {
        return String::from("Vec::<String>::new()");
    }
    format!("vec![{}]", items.join(", "))
}

fn render_key(key: &KeyExpression, args: &Arguments) -> String {
    if let Some(text) = key.constant_text() {
        return format!("String::from({})", rust_string(&text));
    }
    let KeyExpression::Template(parts) = key else {
        return format!("String::from({})", rust_string(&key.to_string()));
    };

    let mut template = String::new();
    let mut values = vec![];
    for part in parts {
        match part {
            Part::Text(text) => template.push_str(&text.replace('{', "{{").replace('}', "}}")),
            Part::Parameter(name) => {
                template.push_str("{}");
                values.push(format!("{}.key_fragment()", args.ident(name)));
            }
        }
    }
    format!("format!({}, {})", rust_string(&template), values.join(", "))
}

/// Human-readable key list for doc comments.
fn describe_keys(keys: &KeySource) -> String {
    let names: Vec<String> = match keys {
        KeySource::Tables(tables) => tables.clone(),
        KeySource::Custom(keys) => keys.iter().map(ToString::to_string).collect(),
    };
    if names.is_empty() {
        return String::from("no keys");
    }
    names
        .iter()
        .map(|n| format!("`{n}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders `s` as a Rust string literal.
fn rust_string(s: &str) -> String {
    format!("\"{}\"", s.escape_default())
}
