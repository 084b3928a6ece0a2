//! HTTP handlers: public content reads, search, form submissions and SEO files.

pub mod inquiries;
pub mod newsletter;
pub mod orders;
pub mod public;
pub mod search;
pub mod seo;
