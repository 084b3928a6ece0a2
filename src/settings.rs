//! Process settings from environment (after `.env` is loaded by the binary).

use crate::error::SettingsError;
use std::str::FromStr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SITE_URL: &str = "http://localhost:3000";
const DEFAULT_SCHEMA: &str = "public";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Fragments that mark a datastore URL copied from a template and never filled in.
const PLACEHOLDER_MARKERS: &[&str] = &["your-", "placeholder", "changeme", "<", "example.com"];

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: String,
    /// Connection URL for the read-restricted role.
    pub database_url: Option<String>,
    /// Connection URL for the privileged role used by form submissions.
    pub database_admin_url: Option<String>,
    pub database_schema: String,
    pub max_connections: u32,
    pub site_url: String,
    pub media_base_url: String,
    pub max_body_bytes: usize,
}

/// Outcome of checking a datastore URL before any connection is attempted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatastoreStatus {
    Missing,
    Placeholder,
    InvalidScheme,
    Ready(String),
}

impl DatastoreStatus {
    pub fn classify(url: Option<&str>) -> Self {
        let Some(url) = url.map(str::trim).filter(|s| !s.is_empty()) else {
            return DatastoreStatus::Missing;
        };
        let lower = url.to_lowercase();
        if PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m)) {
            return DatastoreStatus::Placeholder;
        }
        if !(lower.starts_with("postgres://") || lower.starts_with("postgresql://")) {
            return DatastoreStatus::InvalidScheme;
        }
        DatastoreStatus::Ready(url.to_string())
    }

    /// Human-readable reason for logs; `None` when ready.
    pub fn problem(&self) -> Option<&'static str> {
        match self {
            DatastoreStatus::Missing => Some("DATABASE_URL is not set"),
            DatastoreStatus::Placeholder => Some("DATABASE_URL still holds a placeholder value"),
            DatastoreStatus::InvalidScheme => Some("DATABASE_URL must use the postgres:// scheme"),
            DatastoreStatus::Ready(_) => None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let site_url = var("SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.into());
        let site_url = site_url.trim_end_matches('/').to_string();
        let media_base_url = var("MEDIA_BASE_URL")
            .unwrap_or_else(|| format!("{}/storage/v1/object/public", site_url));
        Ok(Settings {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            database_url: var("DATABASE_URL"),
            database_admin_url: var("DATABASE_ADMIN_URL"),
            database_schema: var("DATABASE_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into()),
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            site_url,
            media_base_url,
            max_body_bytes: parse_or("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
        })
    }

    pub fn datastore_status(&self) -> DatastoreStatus {
        DatastoreStatus::classify(self.database_url.as_deref())
    }

    /// Admin URL when set and usable, otherwise the public one.
    pub fn admin_datastore_status(&self) -> DatastoreStatus {
        match DatastoreStatus::classify(self.database_admin_url.as_deref()) {
            DatastoreStatus::Missing => self.datastore_status(),
            other => other,
        }
    }
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| SettingsError::Invalid {
            key,
            message: e.to_string(),
        }),
    }
}
