use super::{card_key, flag, id, slug, string_list, text, text_or_empty, title, Content, ContentKind, ListFilter, Publication};
use crate::media::MediaUrls;
use crate::store::Row;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct Project {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub location: Option<String>,
    pub client_name: Option<String>,
    pub completion_date: Option<String>,
    pub image: String,
    pub featured_image: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub featured: bool,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub created_at: Option<String>,
}

impl Content for Project {
    const KIND: ContentKind = ContentKind {
        table: "projects",
        label: "Project",
        publication: Publication::Status,
        filters: &[ListFilter::Category, ListFilter::Featured],
    };

    fn from_row(row: &Row, media: &MediaUrls) -> Self {
        let gallery = string_list(row, "images");
        let featured_key = text(row, &["featured_image"]);
        Project {
            id: id(row),
            slug: slug(row),
            title: title(row),
            description: text_or_empty(row, &["description"]),
            category: text(row, &["category"]),
            location: text(row, &["location"]),
            client_name: text(row, &["client_name", "client"]),
            completion_date: text(row, &["completion_date"]),
            image: media.media(card_key(featured_key.as_deref(), &gallery).as_deref()),
            featured_image: featured_key.as_deref().map(|k| media.media(Some(k))),
            images: gallery.iter().map(|k| media.media(Some(k))).collect(),
            tags: string_list(row, "tags"),
            featured: flag(row, "featured", false),
            seo_title: text(row, &["seo_title", "meta_title"]),
            seo_description: text(row, &["seo_description", "meta_description"]),
            created_at: text(row, &["created_at"]),
        }
    }
}
