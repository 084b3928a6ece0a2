//! Builds parameterized SELECT, COUNT, INSERT and UPDATE statements over named tables.
//! Rows come back as a single `jsonb` column so callers never depend on column types.

use super::params::BindValue;
use crate::store::{value_text, Filter, Row, Select};
use serde_json::Value;

/// Alias every statement gives its target table.
const ALIAS: &str = "t";

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

fn column(name: &str) -> String {
    format!("{}.{}", ALIAS, quoted(name))
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }

    fn predicate(&mut self, f: &Filter) -> String {
        match f {
            Filter::Eq { column: col, value: Value::Bool(b) } => {
                let n = self.push_param(BindValue::Bool(*b));
                format!("{} = ${}", column(col), n)
            }
            Filter::Eq { column: col, value } => {
                let text = value_text(value).unwrap_or_default();
                let n = self.push_param(BindValue::Text(text));
                format!("{}::text = ${}", column(col), n)
            }
            Filter::EqIgnoreCase { column: col, value } => {
                let n = self.push_param(BindValue::Text(value.clone()));
                format!("lower({}::text) = lower(${})", column(col), n)
            }
            Filter::AnyContains { columns, needle } => {
                if columns.is_empty() {
                    return "FALSE".to_string();
                }
                let n = self.push_param(BindValue::Text(like_pattern(needle)));
                let parts: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{}::text ILIKE ${}", column(c), n))
                    .collect();
                format!("({})", parts.join(" OR "))
            }
        }
    }

    fn where_clause(&mut self, filters: &[Filter]) -> String {
        let parts: Vec<String> = filters.iter().map(|f| self.predicate(f)).collect();
        if parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", parts.join(" AND "))
        }
    }
}

/// SELECT rows as jsonb with filters, optional ORDER BY, LIMIT and OFFSET. LIMIT is capped at 1000.
pub fn select(schema: &str, query: &Select) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, &query.table);
    let where_clause = q.where_clause(&query.filters);
    let order_clause = query
        .order
        .as_ref()
        .map(|o| {
            let dir = if o.descending { "DESC NULLS LAST" } else { "ASC" };
            format!(" ORDER BY {} {}", column(&o.column), dir)
        })
        .unwrap_or_default();
    let limit_clause = query.limit.map(|n| format!(" LIMIT {}", n.min(1000))).unwrap_or_default();
    let offset_clause = query.offset.map(|n| format!(" OFFSET {}", n)).unwrap_or_default();
    q.sql = format!(
        "SELECT to_jsonb({alias}) AS \"row\" FROM {} {alias}{}{}{}{}",
        table,
        where_clause,
        order_clause,
        limit_clause,
        offset_clause,
        alias = ALIAS
    );
    q
}

/// COUNT(*) with the same filters as `query`; paging and ordering are ignored.
pub fn count(schema: &str, query: &Select) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, &query.table);
    let where_clause = q.where_clause(&query.filters);
    q.sql = format!("SELECT COUNT(*) AS \"total\" FROM {} {}{}", table, ALIAS, where_clause);
    q
}

/// INSERT one row; null values are skipped so the table defaults apply.
pub fn insert(schema: &str, table: &str, row: &Row) -> QueryBuf {
    let mut q = QueryBuf::new();
    let target = qualified_table(schema, table);
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (name, value) in row {
        if value.is_null() {
            continue;
        }
        let n = q.push_param(BindValue::from_json(value));
        cols.push(quoted(name));
        placeholders.push(format!("${}", n));
    }
    q.sql = if cols.is_empty() {
        format!(
            "INSERT INTO {} AS {alias} DEFAULT VALUES RETURNING to_jsonb({alias}) AS \"row\"",
            target,
            alias = ALIAS
        )
    } else {
        format!(
            "INSERT INTO {} AS {alias} ({}) VALUES ({}) RETURNING to_jsonb({alias}) AS \"row\"",
            target,
            cols.join(", "),
            placeholders.join(", "),
            alias = ALIAS
        )
    };
    q
}

/// UPDATE matching rows: SET every key of `set` (nulls included).
pub fn update(schema: &str, table: &str, filters: &[Filter], set: &Row) -> QueryBuf {
    let mut q = QueryBuf::new();
    let target = qualified_table(schema, table);
    let mut sets = Vec::new();
    for (name, value) in set {
        let n = q.push_param(BindValue::from_json(value));
        sets.push(format!("{} = ${}", quoted(name), n));
    }
    let where_clause = q.where_clause(filters);
    q.sql = format!(
        "UPDATE {} AS {alias} SET {}{} RETURNING to_jsonb({alias}) AS \"row\"",
        target,
        sets.join(", "),
        where_clause,
        alias = ALIAS
    );
    q
}

/// Column names of a table from information_schema. Params: schema, table.
pub fn table_columns(schema: &str, table: &str) -> QueryBuf {
    QueryBuf {
        sql: "SELECT column_name::text FROM information_schema.columns WHERE table_schema = $1 AND table_name = $2"
            .to_string(),
        params: vec![BindValue::Text(schema.to_string()), BindValue::Text(table.to_string())],
    }
}
