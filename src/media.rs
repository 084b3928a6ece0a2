//! Storage key to public URL mapping for the object-storage service.

/// Served when a record has no image at all.
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.jpg";

pub const MEDIA_BUCKET: &str = "media";
pub const BLOG_BUCKET: &str = "blog";

/// Resolve a storage key into a displayable URL.
///
/// Absolute URLs pass through unchanged, so resolving twice is harmless.
pub fn public_media_url(base_url: &str, key: Option<&str>, bucket: &str) -> String {
    let Some(key) = key.map(str::trim).filter(|k| !k.is_empty()) else {
        return PLACEHOLDER_IMAGE.to_string();
    };
    if key.starts_with("http://") || key.starts_with("https://") {
        return key.to_string();
    }
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        bucket,
        key.trim_start_matches('/')
    )
}

/// Resolver bound to the configured storage base URL.
#[derive(Clone, Debug)]
pub struct MediaUrls {
    base_url: String,
}

impl MediaUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        MediaUrls {
            base_url: base_url.into(),
        }
    }

    pub fn resolve(&self, key: Option<&str>, bucket: &str) -> String {
        public_media_url(&self.base_url, key, bucket)
    }

    pub fn media(&self, key: Option<&str>) -> String {
        self.resolve(key, MEDIA_BUCKET)
    }

    /// Journal imagery lives in its own bucket.
    pub fn blog(&self, key: Option<&str>) -> String {
        self.resolve(key, BLOG_BUCKET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://cdn.studio.test/storage/v1/object/public";

    #[test]
    fn missing_key_is_placeholder() {
        assert_eq!(public_media_url(BASE, None, MEDIA_BUCKET), PLACEHOLDER_IMAGE);
        assert_eq!(public_media_url(BASE, Some(""), MEDIA_BUCKET), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn absolute_url_is_unchanged() {
        assert_eq!(public_media_url(BASE, Some("https://x/y.jpg"), MEDIA_BUCKET), "https://x/y.jpg");
        assert_eq!(public_media_url(BASE, Some("http://x/y.jpg"), BLOG_BUCKET), "http://x/y.jpg");
    }

    #[test]
    fn key_is_joined_with_bucket() {
        assert_eq!(
            public_media_url(BASE, Some("products/a.jpg"), "media"),
            format!("{}/media/products/a.jpg", BASE)
        );
    }

    #[test]
    fn leading_slashes_and_trailing_base_slash() {
        let urls = MediaUrls::new(format!("{}/", BASE));
        assert_eq!(urls.blog(Some("//posts/cover.png")), format!("{}/blog/posts/cover.png", BASE));
    }
}
