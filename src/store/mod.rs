//! Generic query client over named tables. Rows travel as JSON objects so the
//! service layer never depends on the exact live schema.

mod postgres;
mod schema;

pub use postgres::PgStore;
pub use schema::{ColumnProbe, SchemaCache, TableShape};

use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

pub type Row = Map<String, Value>;

/// One WHERE predicate. Values are always bound as parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Exact match. Booleans compare as booleans, everything else as text.
    Eq { column: String, value: Value },
    /// Case-insensitive text match.
    EqIgnoreCase { column: String, value: String },
    /// Case-insensitive substring match against any of the columns.
    AnyContains { columns: Vec<String>, needle: String },
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Filter::Eq {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn eq_ignore_case(column: &str, value: &str) -> Self {
        Filter::EqIgnoreCase {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    pub fn any_contains(columns: &[&str], needle: &str) -> Self {
        Filter::AnyContains {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            needle: needle.to_string(),
        }
    }

    /// Columns the predicate touches.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Filter::Eq { column, .. } | Filter::EqIgnoreCase { column, .. } => vec![column.as_str()],
            Filter::AnyContains { columns, .. } => columns.iter().map(String::as_str).collect(),
        }
    }

    /// Evaluate against a row with the same semantics as the SQL rendering.
    /// A key absent from the row never matches.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Filter::Eq { column, value: Value::Bool(b) } => {
                row.get(column).and_then(loose_bool) == Some(*b)
            }
            Filter::Eq { column, value } => {
                let want = value_text(value);
                want.is_some() && row.get(column).and_then(value_text) == want
            }
            Filter::EqIgnoreCase { column, value } => row
                .get(column)
                .and_then(value_text)
                .map(|s| s.to_lowercase() == value.to_lowercase())
                .unwrap_or(false),
            Filter::AnyContains { columns, needle } => {
                let needle = needle.to_lowercase();
                columns.iter().any(|c| {
                    row.get(c)
                        .and_then(value_text)
                        .map(|s| s.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
            }
        }
    }
}

/// Object value as a row; anything else becomes an empty row.
pub fn into_row(v: Value) -> Row {
    match v {
        Value::Object(m) => m,
        _ => Row::new(),
    }
}

/// Text rendering of a scalar, matching PostgreSQL's `::text` cast for the common types.
pub fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Boolean from a bool, "true"/"false" text, or 1/0.
pub fn loose_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "t" | "1" | "yes" => Some(true),
            "false" | "f" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// SELECT description: table, predicates (AND-ed), ordering, paging and whether an exact total is wanted.
#[derive(Clone, Debug, PartialEq)]
pub struct Select {
    pub table: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub count: bool,
}

impl Select {
    pub fn from(table: &str) -> Self {
        Select {
            table: table.to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
            offset: None,
            count: false,
        }
    }

    pub fn filter(mut self, f: Filter) -> Self {
        self.filters.push(f);
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_count(mut self) -> Self {
        self.count = true;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct Rows {
    pub rows: Vec<Row>,
    /// Exact match count ignoring paging; only set when [`Select::count`] was requested.
    pub total: Option<u64>,
}

#[async_trait]
pub trait Datastore: Send + Sync {
    /// Column names of a table as visible to this client's role.
    async fn columns(&self, table: &str) -> Result<HashSet<String>, StoreError>;

    async fn select(&self, query: &Select) -> Result<Rows, StoreError>;

    /// Insert one row. Null values are omitted so column defaults apply. Returns the stored row.
    async fn insert(&self, table: &str, row: &Row) -> Result<Row, StoreError>;

    /// Update matching rows. Returns the updated rows.
    async fn update(&self, table: &str, filters: &[Filter], set: &Row) -> Result<Vec<Row>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// The two clients every request may use plus the shared column probe.
#[derive(Clone)]
pub struct Datastores {
    /// Read-restricted role; used by every public read.
    pub public: Arc<dyn Datastore>,
    /// Privileged role; used for form submissions.
    pub admin: Arc<dyn Datastore>,
    pub schema: Arc<SchemaCache>,
}

impl Datastores {
    pub fn new(public: Arc<dyn Datastore>, admin: Arc<dyn Datastore>) -> Self {
        Datastores {
            public,
            admin,
            schema: Arc::new(SchemaCache::default()),
        }
    }

    /// Column shape of a table as seen by the public client (cached).
    pub async fn shape(&self, table: &str) -> Result<Arc<TableShape>, StoreError> {
        self.schema.shape(self.public.as_ref(), table).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::into_row as row;
    use serde_json::json;

    #[test]
    fn eq_compares_text_and_bool() {
        let r = row(json!({"id": 42, "featured": true, "slug": "oak-table"}));
        assert!(Filter::eq("id", "42").matches(&r));
        assert!(Filter::eq("slug", "oak-table").matches(&r));
        assert!(Filter::eq("featured", true).matches(&r));
        assert!(!Filter::eq("featured", false).matches(&r));
        assert!(!Filter::eq("missing", "x").matches(&r));
    }

    #[test]
    fn eq_ignore_case_and_contains() {
        let r = row(json!({"email": "Ann@Studio.Test", "title": "Carrara Marble Tile"}));
        assert!(Filter::eq_ignore_case("email", "ann@studio.test").matches(&r));
        assert!(Filter::any_contains(&["description", "title"], "marble").matches(&r));
        assert!(!Filter::any_contains(&["description"], "marble").matches(&r));
    }

    #[test]
    fn loose_bool_forms() {
        assert_eq!(loose_bool(&json!("true")), Some(true));
        assert_eq!(loose_bool(&json!(0)), Some(false));
        assert_eq!(loose_bool(&json!("maybe")), None);
        assert_eq!(loose_bool(&Value::Null), None);
    }
}
