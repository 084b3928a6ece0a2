//! Best-effort search over products, projects, journal posts and the static pages.
//! A failing table is logged and skipped; whatever else matched is still returned.

use super::catalog::{fetch, Criterion, Page};
use crate::content::{BlogPost, Content, Product, Project};
use crate::error::AppError;
use crate::media::MediaUrls;
use crate::store::{Datastores, Filter};
use serde::Serialize;
use std::cmp::Ordering;

pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Product,
    Project,
    Article,
    Page,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(rename = "type")]
    pub result_type: ResultType,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image: Option<String>,
    pub category: Option<String>,
}

pub struct StaticPage {
    pub title: &'static str,
    pub description: &'static str,
    pub path: &'static str,
}

pub const STATIC_PAGES: &[StaticPage] = &[
    StaticPage {
        title: "Services",
        description: "Interior design, space planning, styling and turnkey fit-out services",
        path: "/services",
    },
    StaticPage {
        title: "About",
        description: "Our studio, our team and our approach to interior design and decor",
        path: "/about",
    },
    StaticPage {
        title: "Contact",
        description: "Get in touch, book a consultation or request a quote",
        path: "/contact",
    },
    StaticPage {
        title: "Products",
        description: "Furniture, tiles, lighting, wall finishes and decor for every room",
        path: "/products",
    },
    StaticPage {
        title: "Work",
        description: "Residential and commercial interior projects we have delivered",
        path: "/work",
    },
    StaticPage {
        title: "Journal",
        description: "Design ideas, trends, guides and inspiration from the studio",
        path: "/journal",
    },
];

/// Text columns searched per table; only those present on the live table are used.
const PRODUCT_COLUMNS: &[&str] = &["title", "name", "description", "category"];
const PROJECT_COLUMNS: &[&str] = &["title", "description", "location"];
const BLOG_COLUMNS: &[&str] = &["title", "excerpt", "content", "category"];

pub fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

pub async fn search(db: &Datastores, media: &MediaUrls, query: &str, limit: u32) -> Vec<SearchResult> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let (products, projects, posts) = tokio::join!(
        matching::<Product>(db, media, PRODUCT_COLUMNS, query, limit),
        matching::<Project>(db, media, PROJECT_COLUMNS, query, limit),
        matching::<BlogPost>(db, media, BLOG_COLUMNS, query, limit),
    );
    let mut results = Vec::new();
    results.extend(products.unwrap_or_default().into_iter().map(product_result));
    results.extend(projects.unwrap_or_default().into_iter().map(project_result));
    results.extend(posts.unwrap_or_default().into_iter().map(article_result));
    results.extend(page_results(query));
    rank(&mut results, query);
    results.truncate(limit as usize);
    results
}

/// One table's matches; `None` when the table could not be searched.
async fn matching<T: Content>(
    db: &Datastores,
    media: &MediaUrls,
    columns: &[&str],
    query: &str,
    limit: u32,
) -> Option<Vec<T>> {
    match table_matches::<T>(db, media, columns, query, limit).await {
        Ok(items) => Some(items),
        Err(e) => {
            tracing::warn!(table = T::KIND.table, error = %e, "search skipped table");
            None
        }
    }
}

async fn table_matches<T: Content>(
    db: &Datastores,
    media: &MediaUrls,
    columns: &[&str],
    query: &str,
    limit: u32,
) -> Result<Vec<T>, AppError> {
    let kind = T::KIND;
    let shape = db.shape(kind.table).await?;
    let present: Vec<&str> = columns.iter().copied().filter(|c| shape.has(c)).collect();
    let criteria = [Criterion::Published(kind.publication)];
    let page = Page {
        limit,
        offset: 0,
        with_total: false,
    };
    let fetched = fetch(db, kind.table, &[Filter::any_contains(&present, query)], &criteria, page).await?;
    Ok(fetched.rows.iter().map(|r| T::from_row(r, media)).collect())
}

fn product_result(p: Product) -> SearchResult {
    SearchResult {
        url: format!("/products/{}", p.slug),
        id: p.id,
        result_type: ResultType::Product,
        title: p.title,
        description: p.description,
        image: Some(p.image),
        category: p.category,
    }
}

fn project_result(p: Project) -> SearchResult {
    SearchResult {
        url: format!("/work/{}", p.slug),
        id: p.id,
        result_type: ResultType::Project,
        title: p.title,
        description: p.description,
        image: Some(p.image),
        category: p.category,
    }
}

fn article_result(p: BlogPost) -> SearchResult {
    SearchResult {
        url: format!("/journal/{}", p.slug),
        id: p.id,
        result_type: ResultType::Article,
        title: p.title,
        description: p.excerpt,
        image: Some(p.featured_image),
        category: p.category,
    }
}

pub fn page_results(query: &str) -> Vec<SearchResult> {
    let needle = query.to_lowercase();
    STATIC_PAGES
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&needle) || p.description.to_lowercase().contains(&needle))
        .map(|p| SearchResult {
            id: format!("page-{}", p.path.trim_start_matches('/')),
            result_type: ResultType::Page,
            title: p.title.to_string(),
            description: p.description.to_string(),
            url: p.path.to_string(),
            image: None,
            category: None,
        })
        .collect()
}

/// Titles starting with the query first, then alphabetical by title.
pub fn rank(results: &mut [SearchResult], query: &str) {
    let needle = query.trim().to_lowercase();
    results.sort_by(|a, b| {
        let ta = a.title.to_lowercase();
        let tb = b.title.to_lowercase();
        match (ta.starts_with(&needle), tb.starts_with(&needle)) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => ta.cmp(&tb),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str) -> SearchResult {
        SearchResult {
            id: title.to_string(),
            result_type: ResultType::Product,
            title: title.to_string(),
            description: String::new(),
            url: String::new(),
            image: None,
            category: None,
        }
    }

    #[test]
    fn starts_with_beats_contains() {
        let mut r = vec![result("Imported Marble"), result("Marble Tile")];
        rank(&mut r, "marble");
        assert_eq!(r[0].title, "Marble Tile");
    }

    #[test]
    fn ties_are_alphabetical() {
        let mut r = vec![result("Oak Table"), result("Brass Lamp"), result("oak shelf")];
        rank(&mut r, "oak");
        let titles: Vec<_> = r.iter().map(|x| x.title.as_str()).collect();
        assert_eq!(titles, vec!["oak shelf", "Oak Table", "Brass Lamp"]);
    }

    #[test]
    fn pages_match_title_or_description() {
        let pages = page_results("consultation");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].url, "/contact");
        assert_eq!(page_results("JOURNAL")[0].result_type, ResultType::Page);
        assert!(page_results("zzz").is_empty());
    }

    #[test]
    fn limit_clamped() {
        assert_eq!(clamp_limit(None), 20);
        assert_eq!(clamp_limit(Some(500)), 50);
        assert_eq!(clamp_limit(Some(0)), 1);
    }
}
