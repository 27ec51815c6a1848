//! Runtime configuration, resolved once at process start.

use std::env;
use std::path::PathBuf;

use crate::error::{ReportError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.gosquared.com/people/v1";

/// The two static values attached to every upstream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub site_token: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when either value is missing; report runs then fail individually.
    pub credentials: Option<Credentials>,
    pub base_url: String,
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `ECOSEND_API_KEY` (required for report runs)
    /// - `ECOSEND_SITE_TOKEN` (required for report runs)
    /// - `ECOSEND_BASE_URL` (default: GoSquared People v1)
    /// - `REPORT_OUTPUT_DIR` (default: current directory)
    pub fn from_env() -> Self {
        let config = Self::from_lookup(|key| env::var(key).ok());
        if config.credentials.is_none() {
            log::warn!(
                "API credentials not set; add ECOSEND_API_KEY and ECOSEND_SITE_TOKEN to the environment or .env"
            );
        }
        config
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let credentials = match (non_empty("ECOSEND_API_KEY"), non_empty("ECOSEND_SITE_TOKEN")) {
            (Some(api_key), Some(site_token)) => Some(Credentials {
                api_key,
                site_token,
            }),
            _ => None,
        };

        Self {
            credentials,
            base_url: non_empty("ECOSEND_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            output_dir: non_empty("REPORT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn require_credentials(&self) -> Result<&Credentials> {
        self.credentials.as_ref().ok_or_else(|| {
            ReportError::MissingCredentials(
                "set ECOSEND_API_KEY and ECOSEND_SITE_TOKEN".to_string(),
            )
        })
    }
}
