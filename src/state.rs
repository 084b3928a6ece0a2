//! Shared application state for all routes.

use crate::error::AppError;
use crate::media::MediaUrls;
use crate::settings::Settings;
use crate::store::Datastores;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub media: MediaUrls,
    /// `None` when the datastore URL is missing or unusable; requests then fail fast.
    datastores: Option<Datastores>,
    unavailable: &'static str,
}

impl AppState {
    pub fn new(settings: Settings, datastores: Datastores) -> Self {
        AppState {
            media: MediaUrls::new(settings.media_base_url.clone()),
            settings: Arc::new(settings),
            datastores: Some(datastores),
            unavailable: "",
        }
    }

    /// State that answers every datastore-backed route with a configuration error.
    pub fn unconfigured(settings: Settings, reason: &'static str) -> Self {
        AppState {
            media: MediaUrls::new(settings.media_base_url.clone()),
            settings: Arc::new(settings),
            datastores: None,
            unavailable: reason,
        }
    }

    pub fn datastores(&self) -> Result<&Datastores, AppError> {
        self.datastores
            .as_ref()
            .ok_or_else(|| AppError::Configuration(self.unavailable.to_string()))
    }
}
