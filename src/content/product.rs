use super::{
    card_key, flag, id, number, object, slug, string_list, text, text_or_empty, title, Content, ContentKind,
    ListFilter, Publication,
};
use crate::media::MediaUrls;
use crate::store::Row;
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_CURRENCY: &str = "KES";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceUnit {
    PerSqm,
    Unit,
}

impl PriceUnit {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("per_sqm") | Some("per sqm") | Some("sqm") | Some("per_m2") => PriceUnit::PerSqm,
            _ => PriceUnit::Unit,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Product {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub price: f64,
    pub currency: String,
    pub price_unit: PriceUnit,
    pub is_imported: bool,
    /// Card image: featured image, else first gallery image, else the placeholder.
    pub image: String,
    pub featured_image: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub featured: bool,
    pub in_stock: bool,
    pub specifications: Map<String, Value>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Content for Product {
    const KIND: ContentKind = ContentKind {
        table: "products",
        label: "Product",
        publication: Publication::Status,
        filters: &[ListFilter::Category, ListFilter::Featured, ListFilter::InStock],
    };

    fn from_row(row: &Row, media: &MediaUrls) -> Self {
        let gallery = string_list(row, "images");
        let featured_key = text(row, &["featured_image"]);
        Product {
            id: id(row),
            slug: slug(row),
            title: title(row),
            description: text_or_empty(row, &["description"]),
            category: text(row, &["category"]),
            subcategory: text(row, &["subcategory"]),
            price: number(row, "price").unwrap_or(0.0),
            currency: text(row, &["currency"]).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            price_unit: PriceUnit::parse(text(row, &["price_unit"]).as_deref()),
            is_imported: flag(row, "is_imported", false),
            image: media.media(card_key(featured_key.as_deref(), &gallery).as_deref()),
            featured_image: featured_key.as_deref().map(|k| media.media(Some(k))),
            images: gallery.iter().map(|k| media.media(Some(k))).collect(),
            tags: string_list(row, "tags"),
            featured: flag(row, "featured", false),
            in_stock: flag(row, "in_stock", true),
            specifications: object(row, "specifications"),
            seo_title: text(row, &["seo_title", "meta_title"]),
            seo_description: text(row, &["seo_description", "meta_description"]),
            created_at: text(row, &["created_at"]),
            updated_at: text(row, &["updated_at"]),
        }
    }
}
