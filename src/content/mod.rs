//! Public content contracts and the row normalization behind them.
//!
//! Rows arrive as loose JSON because the live tables drift (legacy column names,
//! numbers stored as text, arrays stored as comma lists). Every accessor here
//! tolerates that and falls back to a defined default.

mod blog;
mod product;
mod project;
mod service;

pub use blog::BlogPost;
pub use product::{PriceUnit, Product};
pub use project::Project;
pub use service::Service;

use crate::media::MediaUrls;
use crate::store::{loose_bool, value_text, Row};
use serde::Serialize;
use serde_json::{Map, Value};

/// How a kind decides that a row is visible to the public.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Publication {
    /// `status = 'published'`; rows from tables without a status column are live.
    Status,
    /// `status = 'published'`, else the legacy boolean `published`; rows with neither are hidden.
    StatusOrLegacyFlag,
}

/// Optional list filters a kind accepts from the query string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListFilter {
    Category,
    Featured,
    InStock,
}

#[derive(Clone, Copy, Debug)]
pub struct ContentKind {
    pub table: &'static str,
    /// Used in not-found messages and logs.
    pub label: &'static str,
    pub publication: Publication,
    pub filters: &'static [ListFilter],
}

/// A publicly exposed content type with a stable JSON shape.
pub trait Content: Serialize + Send + Sized {
    const KIND: ContentKind;

    fn from_row(row: &Row, media: &MediaUrls) -> Self;
}

/// First non-empty text among `keys`.
pub(crate) fn text(row: &Row, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .filter(|v| !v.is_array() && !v.is_object())
        .filter_map(value_text)
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

pub(crate) fn text_or_empty(row: &Row, keys: &[&str]) -> String {
    text(row, keys).unwrap_or_default()
}

/// Row id rendered as text (ids may be integers or uuids).
pub(crate) fn id(row: &Row) -> String {
    text_or_empty(row, &["id"])
}

/// Display title: `title → name → id`.
pub(crate) fn title(row: &Row) -> String {
    text(row, &["title", "name"]).unwrap_or_else(|| id(row))
}

/// URL slug, falling back to the id for records without one.
pub(crate) fn slug(row: &Row) -> String {
    text(row, &["slug"]).unwrap_or_else(|| id(row))
}

pub(crate) fn flag(row: &Row, key: &str, default: bool) -> bool {
    row.get(key).and_then(loose_bool).unwrap_or(default)
}

pub(crate) fn number(row: &Row, key: &str) -> Option<f64> {
    match row.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Array of strings, a JSON-encoded array in a string, or a comma-separated list.
pub(crate) fn string_list(row: &Row, key: &str) -> Vec<String> {
    match row.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(value_text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.starts_with('[') {
                if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(s) {
                    return items.iter().filter_map(value_text).filter(|s| !s.is_empty()).collect();
                }
            }
            s.split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect()
        }
        _ => Vec::new(),
    }
}

/// JSON object column, or a string holding one; anything else is empty.
pub(crate) fn object(row: &Row, key: &str) -> Map<String, Value> {
    match row.get(key) {
        Some(Value::Object(m)) => m.clone(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(m)) => m,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

/// Featured image key, else the first gallery key.
pub(crate) fn card_key(featured: Option<&str>, gallery: &[String]) -> Option<String> {
    featured
        .map(str::to_string)
        .or_else(|| gallery.first().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::into_row as row;
    use serde_json::json;

    #[test]
    fn title_fallback_chain() {
        assert_eq!(title(&row(json!({"id": 7, "title": "Oak", "name": "x"}))), "Oak");
        assert_eq!(title(&row(json!({"id": 7, "title": " ", "name": "Walnut"}))), "Walnut");
        assert_eq!(title(&row(json!({"id": 7, "title": null}))), "7");
    }

    #[test]
    fn slug_falls_back_to_id() {
        assert_eq!(slug(&row(json!({"id": "abc", "slug": ""}))), "abc");
        assert_eq!(slug(&row(json!({"id": "abc", "slug": "oak-table"}))), "oak-table");
    }

    #[test]
    fn string_list_shapes() {
        assert_eq!(string_list(&row(json!({"tags": ["a", " b ", ""]})), "tags"), vec!["a", "b"]);
        assert_eq!(string_list(&row(json!({"tags": "a, b"})), "tags"), vec!["a", "b"]);
        assert_eq!(string_list(&row(json!({"tags": "[\"x\",\"y\"]"})), "tags"), vec!["x", "y"]);
        assert!(string_list(&row(json!({})), "tags").is_empty());
    }

    #[test]
    fn numbers_from_text() {
        assert_eq!(number(&row(json!({"price": "1250.50"})), "price"), Some(1250.5));
        assert_eq!(number(&row(json!({"price": 99})), "price"), Some(99.0));
        assert_eq!(number(&row(json!({"price": "n/a"})), "price"), None);
    }
}
