//! Request validation, published-content reads, order encoding and search.

pub mod catalog;
pub mod orders;
pub mod search;
pub mod validation;
pub use catalog::{ListParams, Listing};
pub use validation::{InquiryRequest, NewsletterRequest, OrderRequest, RequestValidator};
