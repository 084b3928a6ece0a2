use super::{flag, id, number, slug, text, text_or_empty, title, Content, ContentKind, ListFilter, Publication};
use crate::media::MediaUrls;
use crate::store::Row;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct Service {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub image: String,
    pub featured: bool,
    pub sort_order: Option<i64>,
    pub created_at: Option<String>,
}

impl Content for Service {
    const KIND: ContentKind = ContentKind {
        table: "services",
        label: "Service",
        publication: Publication::Status,
        filters: &[ListFilter::Category, ListFilter::Featured],
    };

    fn from_row(row: &Row, media: &MediaUrls) -> Self {
        Service {
            id: id(row),
            slug: slug(row),
            title: title(row),
            description: text_or_empty(row, &["description"]),
            category: text(row, &["category"]),
            icon: text(row, &["icon"]),
            image: media.media(text(row, &["featured_image", "image"]).as_deref()),
            featured: flag(row, "featured", false),
            sort_order: number(row, "sort_order").map(|n| n as i64),
            created_at: text(row, &["created_at"]),
        }
    }
}
