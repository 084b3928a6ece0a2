//! Published-content reads that survive schema drift.
//!
//! Each criterion is pushed to the datastore when its column is known to exist and
//! evaluated in memory otherwise. A column that disappears after probing is caught
//! once per request as [`StoreError::UndefinedColumn`]: the probe is dropped and
//! the query is retried unfiltered, with criteria and lookup filters evaluated in memory.

use crate::content::{Content, ListFilter, Publication};
use crate::error::{AppError, StoreError};
use crate::media::MediaUrls;
use crate::store::{loose_bool, value_text, Datastores, Filter, Row, Select, TableShape};
use std::collections::HashMap;

pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;
const ORDER_COLUMN: &str = "created_at";

/// Query-string parameters of a list endpoint, parsed leniently.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub in_stock: Option<bool>,
}

impl ListParams {
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let flag = |k: &str| params.get(k).and_then(|v| loose_bool(&serde_json::Value::String(v.clone())));
        ListParams {
            limit: params.get("limit").and_then(|v| v.trim().parse().ok()),
            offset: params.get("offset").and_then(|v| v.trim().parse().ok()),
            category: params
                .get("category")
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty() && c != "all"),
            featured: flag("featured"),
            in_stock: flag("in_stock"),
        }
    }

    pub fn page(&self) -> Page {
        Page {
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: self.offset.unwrap_or(0),
            with_total: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
    pub with_total: bool,
}

impl Page {
    pub fn single() -> Self {
        Page {
            limit: 1,
            offset: 0,
            with_total: false,
        }
    }
}

/// One visibility or list condition.
#[derive(Clone, Debug, PartialEq)]
pub enum Criterion {
    Published(Publication),
    Category(String),
    Featured(bool),
    InStock(bool),
}

impl Criterion {
    /// Datastore filter when every column it needs is available.
    pub fn push_down(&self, shape: &TableShape) -> Option<Filter> {
        match self {
            Criterion::Published(Publication::Status) => {
                shape.has("status").then(|| Filter::eq("status", "published"))
            }
            Criterion::Published(Publication::StatusOrLegacyFlag) => {
                if shape.has("status") {
                    Some(Filter::eq("status", "published"))
                } else if shape.has("published") {
                    Some(Filter::eq("published", true))
                } else {
                    None
                }
            }
            Criterion::Category(c) => shape.has("category").then(|| Filter::eq("category", c.as_str())),
            Criterion::Featured(f) => shape.has("featured").then(|| Filter::eq("featured", *f)),
            Criterion::InStock(s) => shape.has("in_stock").then(|| Filter::eq("in_stock", *s)),
        }
    }

    /// In-memory evaluation. A row without the column gets the fallback policy:
    /// unknown `featured` is false, unknown `in_stock` is true, unknown category never matches.
    pub fn admits(&self, row: &Row) -> bool {
        match self {
            Criterion::Published(Publication::Status) => match row.get("status") {
                None => true,
                Some(v) => value_text(v).as_deref() == Some("published"),
            },
            Criterion::Published(Publication::StatusOrLegacyFlag) => match (row.get("status"), row.get("published")) {
                (Some(v), _) => value_text(v).as_deref() == Some("published"),
                (None, Some(p)) => loose_bool(p) == Some(true),
                (None, None) => false,
            },
            Criterion::Category(c) => row.get("category").and_then(value_text).as_deref() == Some(c.as_str()),
            Criterion::Featured(f) => row.get("featured").and_then(loose_bool).unwrap_or(false) == *f,
            Criterion::InStock(s) => row.get("in_stock").and_then(loose_bool).unwrap_or(true) == *s,
        }
    }
}

/// Publication plus whichever list filters the kind honors and the request set.
pub fn list_criteria(publication: Publication, filters: &[ListFilter], params: &ListParams) -> Vec<Criterion> {
    let mut out = vec![Criterion::Published(publication)];
    for f in filters {
        match f {
            ListFilter::Category => out.extend(params.category.clone().map(Criterion::Category)),
            ListFilter::Featured => out.extend(params.featured.map(Criterion::Featured)),
            ListFilter::InStock => out.extend(params.in_stock.map(Criterion::InStock)),
        }
    }
    out
}

#[derive(Clone, Debug, Default)]
pub struct Fetched {
    pub rows: Vec<Row>,
    pub total: u64,
}

/// Rows of `table` matching `base` and `criteria`, newest first, paged.
pub async fn fetch(
    db: &Datastores,
    table: &str,
    base: &[Filter],
    criteria: &[Criterion],
    page: Page,
) -> Result<Fetched, AppError> {
    let shape = db.shape(table).await?;
    let mut pushed = Vec::new();
    let mut deferred = Vec::new();
    for c in criteria {
        match c.push_down(&shape) {
            Some(f) => pushed.push(f),
            None => deferred.push(c),
        }
    }
    if !deferred.is_empty() {
        tracing::debug!(table, deferred = deferred.len(), "filtering missing columns in memory");
    }
    let order = shape.has(ORDER_COLUMN).then_some(ORDER_COLUMN);
    let pushed: Vec<Filter> = base.iter().cloned().chain(pushed).collect();
    match run(db, table, pushed, &deferred, &[], order, page).await {
        Err(e) if e.is_undefined_column() => {
            tracing::warn!(table, error = %e, "column vanished since probe; retrying unfiltered");
            db.schema.invalidate(table);
            let all: Vec<&Criterion> = criteria.iter().collect();
            Ok(run(db, table, Vec::new(), &all, base, None, page).await?)
        }
        other => Ok(other?),
    }
}

/// One query: `pushed` goes to the datastore, `deferred` criteria and `local`
/// filters are applied to the returned rows before paging.
async fn run(
    db: &Datastores,
    table: &str,
    pushed: Vec<Filter>,
    deferred: &[&Criterion],
    local: &[Filter],
    order: Option<&str>,
    page: Page,
) -> Result<Fetched, StoreError> {
    let mut select = Select::from(table);
    for f in pushed {
        select = select.filter(f);
    }
    if let Some(col) = order {
        select = select.order_desc(col);
    }
    if deferred.is_empty() && local.is_empty() {
        let mut select = select.limit(page.limit).offset(page.offset);
        if page.with_total {
            select = select.with_count();
        }
        let out = db.public.select(&select).await?;
        let total = out.total.unwrap_or(out.rows.len() as u64);
        return Ok(Fetched { rows: out.rows, total });
    }
    let out = db.public.select(&select).await?;
    let mut rows: Vec<Row> = out
        .rows
        .into_iter()
        .filter(|r| local.iter().all(|f| f.matches(r)) && deferred.iter().all(|c| c.admits(r)))
        .collect();
    if order.is_none() {
        sort_newest_first(&mut rows);
    }
    let total = rows.len() as u64;
    let rows = rows
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect();
    Ok(Fetched { rows, total })
}

/// ISO timestamps sort lexically; rows without one go last.
fn sort_newest_first(rows: &mut [Row]) {
    rows.sort_by(|a, b| {
        let ka = a.get(ORDER_COLUMN).and_then(value_text);
        let kb = b.get(ORDER_COLUMN).and_then(value_text);
        kb.cmp(&ka)
    });
}

#[derive(Clone, Debug)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

pub async fn list<T: Content>(db: &Datastores, media: &MediaUrls, params: &ListParams) -> Result<Listing<T>, AppError> {
    let kind = T::KIND;
    let page = params.page();
    let criteria = list_criteria(kind.publication, kind.filters, params);
    let fetched = fetch(db, kind.table, &[], &criteria, page).await?;
    Ok(Listing {
        items: fetched.rows.iter().map(|r| T::from_row(r, media)).collect(),
        total: fetched.total,
        limit: page.limit,
        offset: page.offset,
    })
}

/// Lookup by slug, then by id (records without a slug stay reachable).
pub async fn get<T: Content>(db: &Datastores, media: &MediaUrls, slug: &str) -> Result<T, AppError> {
    let kind = T::KIND;
    let criteria = [Criterion::Published(kind.publication)];
    let shape = db.shape(kind.table).await?;
    if shape.has("slug") {
        let by_slug = fetch(db, kind.table, &[Filter::eq("slug", slug)], &criteria, Page::single()).await?;
        if let Some(row) = by_slug.rows.first() {
            return Ok(T::from_row(row, media));
        }
    }
    let by_id = fetch(db, kind.table, &[Filter::eq("id", slug)], &criteria, Page::single()).await?;
    by_id
        .rows
        .first()
        .map(|row| T::from_row(row, media))
        .ok_or_else(|| AppError::NotFound(format!("{} not found", kind.label)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::into_row as row;
    use serde_json::json;

    fn shape(cols: &[&str]) -> TableShape {
        TableShape::known(cols.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn missing_featured_column_excludes_when_filtering_true() {
        let r = row(json!({"id": 1, "title": "Oak"}));
        assert!(!Criterion::Featured(true).admits(&r));
        assert!(Criterion::Featured(false).admits(&r));
    }

    #[test]
    fn missing_in_stock_means_purchasable() {
        let r = row(json!({"id": 1}));
        assert!(Criterion::InStock(true).admits(&r));
        assert!(!Criterion::InStock(false).admits(&r));
        assert!(Criterion::InStock(true).admits(&row(json!({"in_stock": null}))));
    }

    #[test]
    fn blog_publication_fallbacks() {
        let c = Criterion::Published(Publication::StatusOrLegacyFlag);
        assert!(c.admits(&row(json!({"status": "published"}))));
        assert!(!c.admits(&row(json!({"status": "draft", "published": true}))));
        assert!(c.admits(&row(json!({"published": true}))));
        assert!(!c.admits(&row(json!({"published": false}))));
        assert!(!c.admits(&row(json!({"title": "x"}))));
    }

    #[test]
    fn status_publication_missing_column_is_live() {
        let c = Criterion::Published(Publication::Status);
        assert!(c.admits(&row(json!({"id": 1}))));
        assert!(!c.admits(&row(json!({"status": "draft"}))));
        assert!(!c.admits(&row(json!({"status": null}))));
    }

    #[test]
    fn push_down_follows_shape() {
        let s = shape(&["id", "published", "category"]);
        assert_eq!(
            Criterion::Published(Publication::StatusOrLegacyFlag).push_down(&s),
            Some(Filter::eq("published", true))
        );
        assert_eq!(Criterion::Published(Publication::Status).push_down(&s), None);
        assert_eq!(Criterion::Featured(true).push_down(&s), None);
        assert!(Criterion::Category("tiles".into()).push_down(&s).is_some());
    }

    #[test]
    fn criteria_respect_kind_filters() {
        let params = ListParams {
            category: Some("tiles".into()),
            featured: Some(true),
            in_stock: Some(true),
            ..Default::default()
        };
        let c = list_criteria(Publication::StatusOrLegacyFlag, &[ListFilter::Category], &params);
        assert_eq!(
            c,
            vec![
                Criterion::Published(Publication::StatusOrLegacyFlag),
                Criterion::Category("tiles".into())
            ]
        );
    }

    #[test]
    fn params_parse_leniently_and_clamp() {
        let q: HashMap<String, String> = [("limit", "500"), ("offset", "x"), ("featured", "true"), ("category", "all")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let p = ListParams::from_query(&q);
        assert_eq!(p.featured, Some(true));
        assert_eq!(p.category, None);
        assert_eq!(p.offset, None);
        assert_eq!(p.page(), Page { limit: 100, offset: 0, with_total: true });
    }

    #[test]
    fn newest_first_without_datastore_order() {
        let mut rows = vec![
            row(json!({"id": 1, "created_at": "2024-01-01T00:00:00Z"})),
            row(json!({"id": 2})),
            row(json!({"id": 3, "created_at": "2024-06-01T00:00:00Z"})),
        ];
        sort_newest_first(&mut rows);
        let ids: Vec<_> = rows.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(3), json!(1), json!(2)]);
    }
}
