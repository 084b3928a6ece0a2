//! PostgreSQL implementation of [`Datastore`] over a lazily connected sqlx pool.

use super::{Datastore, Filter, Row, Rows, Select};
use crate::error::StoreError;
use crate::sql::{self, BindValue, QueryBuf};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row as _};
use std::collections::HashSet;

pub struct PgStore {
    pool: PgPool,
    schema: String,
}

impl PgStore {
    /// Build a pool without connecting; the first query opens the connection.
    pub fn connect_lazy(database_url: &str, schema: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_url)?;
        Ok(PgStore {
            pool,
            schema: schema.to_string(),
        })
    }

    async fn fetch_rows(&self, q: &QueryBuf) -> Result<Vec<Row>, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(&q.sql, &q.params).fetch_all(&self.pool).await?;
        rows.iter().map(row_object).collect()
    }
}

fn bind_all<'q>(sql: &'q str, params: &[BindValue]) -> Query<'q, Postgres, PgArguments> {
    let mut query = sqlx::query(sql);
    for p in params {
        query = match p {
            BindValue::Null => query.bind(Option::<String>::None),
            BindValue::Bool(b) => query.bind(*b),
            BindValue::I64(n) => query.bind(*n),
            BindValue::F64(n) => query.bind(*n),
            BindValue::Text(s) => query.bind(s.clone()),
            BindValue::Json(v) => query.bind(v.clone()),
        };
    }
    query
}

fn row_object(row: &PgRow) -> Result<Row, StoreError> {
    let value: Value = row.try_get("row")?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Other(format!("expected a json object row, got {}", other))),
    }
}

#[async_trait]
impl Datastore for PgStore {
    async fn columns(&self, table: &str) -> Result<HashSet<String>, StoreError> {
        let q = sql::table_columns(&self.schema, table);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(&q.sql, &q.params).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|r| r.try_get::<String, _>("column_name").map_err(StoreError::from))
            .collect()
    }

    async fn select(&self, query: &Select) -> Result<Rows, StoreError> {
        let rows = self.fetch_rows(&sql::select(&self.schema, query)).await?;
        let total = if query.count {
            let q = sql::count(&self.schema, query);
            tracing::debug!(sql = %q.sql, params = ?q.params, "query");
            let row = bind_all(&q.sql, &q.params).fetch_one(&self.pool).await?;
            let n: i64 = row.try_get("total")?;
            Some(n.max(0) as u64)
        } else {
            None
        };
        Ok(Rows { rows, total })
    }

    async fn insert(&self, table: &str, row: &Row) -> Result<Row, StoreError> {
        let q = sql::insert(&self.schema, table, row);
        self.fetch_rows(&q)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Other(format!("insert into {} returned no row", table)))
    }

    async fn update(&self, table: &str, filters: &[Filter], set: &Row) -> Result<Vec<Row>, StoreError> {
        if set.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_rows(&sql::update(&self.schema, table, filters, set)).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
