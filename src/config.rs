//! Backend Configuration
//!
//! Where the hosted backend lives and how to authenticate to it.
//! Defaults come from the build environment; the settings page can
//! override them per browser.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::storage;

const STORAGE_KEY: &str = "team-board.backend";

const DEFAULT_DEMO_EMAIL: &str = "demo@teamboard.app";
const DEFAULT_DEMO_PASSWORD: &str = "team-board-demo";

/// Phoenix protocol version spoken by the realtime socket
const REALTIME_VSN: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abcd.supabase.co`
    pub url: String,
    /// Public anon key sent as `apikey`
    pub anon_key: String,
    #[serde(default = "default_demo_email")]
    pub demo_email: String,
    #[serde(default = "default_demo_password")]
    pub demo_password: String,
}

fn default_demo_email() -> String {
    option_env!("TEAM_BOARD_DEMO_EMAIL").unwrap_or(DEFAULT_DEMO_EMAIL).to_string()
}

fn default_demo_password() -> String {
    option_env!("TEAM_BOARD_DEMO_PASSWORD").unwrap_or(DEFAULT_DEMO_PASSWORD).to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}

impl BackendConfig {
    pub fn new(url: &str, anon_key: &str) -> Self {
        Self {
            url: url.trim().to_string(),
            anon_key: anon_key.trim().to_string(),
            demo_email: default_demo_email(),
            demo_password: default_demo_password(),
        }
    }

    /// Values baked in at compile time
    pub fn from_build_env() -> Self {
        Self::new(
            option_env!("TEAM_BOARD_URL").unwrap_or(""),
            option_env!("TEAM_BOARD_ANON_KEY").unwrap_or(""),
        )
    }

    /// Stored override if present, else build defaults
    pub fn load() -> Self {
        storage::read_json(STORAGE_KEY).unwrap_or_else(Self::from_build_env)
    }

    pub fn save(&self) -> Result<(), String> {
        storage::write_json(STORAGE_KEY, self)
    }

    /// Drop the stored override
    pub fn reset() -> Self {
        storage::remove(STORAGE_KEY);
        Self::from_build_env()
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }

    fn base(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// PostgREST endpoint for a table
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base(), table)
    }

    /// Auth endpoint under `/auth/v1`
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base(), path.trim_start_matches('/'))
    }

    /// Realtime websocket endpoint
    pub fn realtime_url(&self) -> Result<String, ApiError> {
        let base = self.base();
        let host = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            return Err(ApiError::Config(format!("unsupported backend URL '{}'", self.url)));
        };
        Ok(format!(
            "{}/realtime/v1/websocket?apikey={}&vsn={}",
            host,
            utf8_percent_encode(&self.anon_key, NON_ALPHANUMERIC),
            REALTIME_VSN
        ))
    }
}
