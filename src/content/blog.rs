use super::{id, number, slug, string_list, text, text_or_empty, title, Content, ContentKind, ListFilter, Publication};
use crate::media::MediaUrls;
use crate::store::Row;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

const WORDS_PER_MINUTE: usize = 200;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex"));

#[derive(Clone, Debug, Serialize)]
pub struct BlogPost {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// HTML, passed through verbatim.
    pub content: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub featured_image: String,
    pub published_at: Option<String>,
    /// Minutes.
    pub read_time: u32,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub created_at: Option<String>,
}

/// Reading time of an HTML body at 200 words per minute, at least one minute.
pub fn estimate_read_time(html: &str) -> u32 {
    let words = TAG.replace_all(html, " ").split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

impl Content for BlogPost {
    const KIND: ContentKind = ContentKind {
        table: "blog_posts",
        label: "Blog post",
        publication: Publication::StatusOrLegacyFlag,
        filters: &[ListFilter::Category],
    };

    fn from_row(row: &Row, media: &MediaUrls) -> Self {
        let content = text_or_empty(row, &["content"]);
        let read_time = number(row, "read_time")
            .filter(|m| *m >= 1.0)
            .map(|m| m.round() as u32)
            .unwrap_or_else(|| estimate_read_time(&content));
        BlogPost {
            id: id(row),
            slug: slug(row),
            title: title(row),
            excerpt: text_or_empty(row, &["excerpt"]),
            category: text(row, &["category"]),
            tags: string_list(row, "tags"),
            author: text(row, &["author", "author_name"]),
            featured_image: media.blog(text(row, &["featured_image_key", "featured_image"]).as_deref()),
            published_at: text(row, &["published_at", "publish_date", "created_at"]),
            read_time,
            seo_title: text(row, &["seo_title", "meta_title"]),
            seo_description: text(row, &["seo_description", "meta_description"]),
            created_at: text(row, &["created_at"]),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::into_row as row;
    use serde_json::json;

    const BASE: &str = "https://cdn.studio.test/storage/v1/object/public";

    #[test]
    fn read_time_from_content() {
        assert_eq!(estimate_read_time(""), 1);
        let body = format!("<p>{}</p>", "word ".repeat(401));
        assert_eq!(estimate_read_time(&body), 3);
    }

    #[test]
    fn image_key_preferred_over_legacy() {
        let media = MediaUrls::new(BASE);
        let post = BlogPost::from_row(
            &row(json!({
                "id": 3, "slug": "warm-minimalism", "title": "Warm minimalism",
                "featured_image_key": "posts/warm.jpg", "featured_image": "legacy/warm.jpg",
                "publish_date": "2024-03-01", "read_time": 6
            })),
            &media,
        );
        assert_eq!(post.featured_image, format!("{}/blog/posts/warm.jpg", BASE));
        assert_eq!(post.published_at.as_deref(), Some("2024-03-01"));
        assert_eq!(post.read_time, 6);
    }

    #[test]
    fn legacy_image_when_key_missing() {
        let media = MediaUrls::new(BASE);
        let post = BlogPost::from_row(&row(json!({"id": 4, "featured_image": "legacy/a.jpg"})), &media);
        assert_eq!(post.featured_image, format!("{}/blog/legacy/a.jpg", BASE));
    }
}
