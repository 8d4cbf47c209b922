//! Environment-backed application configuration
//!
//! Environment variables (a `.env` file is honoured when present):
//! - BOOKGEN_BACKEND_URL: image/story backend origin
//! - BOOKGEN_PUBLIC_APP_URL: public app origin used to build the logo URL
//! - BOOKGEN_APP_NAME: display name of the app
//! - BOOKGEN_BARCODE_ISBN: barcode value printed on back covers
//! - BOOKGEN_PROMPTS_FILE: optional JSON prompt catalog
//! - BOOKGEN_HTTP_TIMEOUT_SECS: request timeout, 0 disables it

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::errors::{SharedError, SharedResult};

pub const DEFAULT_BACKEND_URL: &str = "https://image-edit-five.vercel.app";
pub const DEFAULT_APP_NAME: &str = "Drawtopia";
/// Placeholder until real ISBNs are assigned per book
pub const DEFAULT_BARCODE_ISBN: &str = "978-0-000-00000-0";
/// Logo location relative to the public app origin
pub const LOGO_PATH: &str = "/assets/logo.png";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend_url: String,
    pub public_app_url: Option<String>,
    pub app_name: String,
    pub barcode_isbn: String,
    pub prompts_file: Option<PathBuf>,
    pub http_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            public_app_url: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            barcode_isbn: DEFAULT_BARCODE_ISBN.to_string(),
            prompts_file: None,
            http_timeout: Some(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> SharedResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> SharedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let backend_url = match non_empty("BOOKGEN_BACKEND_URL") {
            Some(raw) => normalize_origin("BOOKGEN_BACKEND_URL", &raw)?,
            None => defaults.backend_url,
        };

        let public_app_url = non_empty("BOOKGEN_PUBLIC_APP_URL")
            .map(|raw| normalize_origin("BOOKGEN_PUBLIC_APP_URL", &raw))
            .transpose()?;

        let http_timeout = match non_empty("BOOKGEN_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| SharedError::InvalidConfig {
                    field: "BOOKGEN_HTTP_TIMEOUT_SECS".to_string(),
                    value: raw.clone(),
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => defaults.http_timeout,
        };

        Ok(Self {
            backend_url,
            public_app_url,
            app_name: non_empty("BOOKGEN_APP_NAME").unwrap_or(defaults.app_name),
            barcode_isbn: non_empty("BOOKGEN_BARCODE_ISBN").unwrap_or(defaults.barcode_isbn),
            prompts_file: non_empty("BOOKGEN_PROMPTS_FILE").map(PathBuf::from),
            http_timeout,
        })
    }
}

/// Join the fixed logo path onto a public app origin
pub fn logo_url_for(origin: &str) -> SharedResult<String> {
    let invalid = |source| SharedError::InvalidUrl {
        input: origin.to_string(),
        source,
    };
    let base = Url::parse(origin).map_err(invalid)?;
    let logo = base.join(LOGO_PATH).map_err(invalid)?;
    Ok(logo.to_string())
}

/// Validate an origin URL and drop any trailing slash
fn normalize_origin(field: &str, raw: &str) -> SharedResult<String> {
    let parsed = Url::parse(raw).map_err(|source| SharedError::InvalidUrl {
        input: raw.to_string(),
        source,
    })?;
    if parsed.cannot_be_a_base() {
        return Err(SharedError::InvalidConfig {
            field: field.to_string(),
            value: raw.to_string(),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}
