//! robots.txt and sitemap.xml.

use crate::state::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

/// Public routes listed in the sitemap: (path, change frequency, priority).
pub const SITEMAP_ROUTES: &[(&str, &str, &str)] = &[
    ("/", "weekly", "1.0"),
    ("/about", "monthly", "0.8"),
    ("/services", "monthly", "0.9"),
    ("/products", "daily", "0.9"),
    ("/work", "weekly", "0.8"),
    ("/journal", "weekly", "0.7"),
    ("/contact", "monthly", "0.6"),
    ("/consultation", "monthly", "0.6"),
    ("/quote", "monthly", "0.6"),
];

pub fn robots_txt(site_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /api/\nDisallow: /checkout\n\nSitemap: {}/sitemap.xml\n",
        site_url.trim_end_matches('/')
    )
}

pub fn sitemap_xml(site_url: &str, lastmod: &str) -> String {
    let base = site_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for (path, changefreq, priority) in SITEMAP_ROUTES {
        let loc = if *path == "/" { base.to_string() } else { format!("{}{}", base, path) };
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
            loc, lastmod, changefreq, priority
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

/// GET /robots.txt
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&state.settings.site_url),
    )
}

/// GET /sitemap.xml
pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let lastmod = chrono::Utc::now().format("%Y-%m-%d").to_string();
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap_xml(&state.settings.site_url, &lastmod),
    )
}
