//! Request extractors that reject with the standard error envelope.

mod json;

pub use json::JsonBody;
