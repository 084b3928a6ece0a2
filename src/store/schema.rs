//! Column capability probe, filled once per table and kept for the process lifetime.

use super::Datastore;
use crate::error::StoreError;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnProbe {
    Available,
    Missing,
}

/// Known columns of a table. An empty probe result (table hidden from the role's
/// `information_schema` view) is treated as unknown: every column probes `Available`
/// and drift is caught at query time instead.
#[derive(Clone, Debug, Default)]
pub struct TableShape {
    columns: Option<HashSet<String>>,
}

impl TableShape {
    pub fn known(columns: HashSet<String>) -> Self {
        TableShape {
            columns: (!columns.is_empty()).then_some(columns),
        }
    }

    pub fn unknown() -> Self {
        TableShape { columns: None }
    }

    pub fn probe(&self, column: &str) -> ColumnProbe {
        match &self.columns {
            Some(cols) if !cols.contains(column) => ColumnProbe::Missing,
            _ => ColumnProbe::Available,
        }
    }

    pub fn has(&self, column: &str) -> bool {
        self.probe(column) == ColumnProbe::Available
    }
}

#[derive(Default)]
pub struct SchemaCache {
    tables: RwLock<HashMap<String, Arc<TableShape>>>,
}

impl SchemaCache {
    pub async fn shape(&self, store: &dyn Datastore, table: &str) -> Result<Arc<TableShape>, StoreError> {
        if let Some(shape) = self.cached(table) {
            return Ok(shape);
        }
        let columns = store.columns(table).await?;
        tracing::debug!(table, columns = columns.len(), "probed table columns");
        let shape = Arc::new(TableShape::known(columns));
        if let Ok(mut tables) = self.tables.write() {
            tables.insert(table.to_string(), Arc::clone(&shape));
        }
        Ok(shape)
    }

    /// Forget a table's shape so the next request probes again.
    pub fn invalidate(&self, table: &str) {
        if let Ok(mut tables) = self.tables.write() {
            tables.remove(table);
        }
    }

    fn cached(&self, table: &str) -> Option<Arc<TableShape>> {
        self.tables.read().ok()?.get(table).cloned()
    }
}
