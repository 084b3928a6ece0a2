//! Interiors site: public content, search and form API over PostgreSQL.

pub mod case;
pub mod content;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod media;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use error::{AppError, FieldError, SettingsError, StoreError};
pub use media::{public_media_url, MediaUrls};
pub use routes::{api_routes, app, common_routes, seo_routes};
pub use settings::{DatastoreStatus, Settings};
pub use state::AppState;
pub use store::{Datastore, Datastores, PgStore};
