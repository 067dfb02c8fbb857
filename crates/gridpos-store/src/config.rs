//! # Options Bundle
//!
//! Deployment configuration, read from a JSON options file. The server
//! re-reads this file on every request so an operator can repoint the
//! sheet or the event bus without a restart; only the auth token cache
//! survives across reads.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{StoreError, StoreResult};

/// Default location of the options file.
pub const DEFAULT_OPTIONS_PATH: &str = "/data/options.json";

/// Environment variable overriding the options file location.
pub const OPTIONS_PATH_ENV: &str = "GRIDPOS_OPTIONS";

/// Environment variable supplying the event bus token when the options
/// file leaves it out.
pub const BUS_TOKEN_ENV: &str = "GRIDPOS_BUS_TOKEN";

/// Deployment options.
#[derive(Debug, Clone, Deserialize)]
pub struct Options {
    /// Identifier of the backing sheet.
    pub sheet_id: String,

    /// Path to the service-account key file.
    pub service_account_key: PathBuf,

    /// Event name fired after a recorded sale.
    #[serde(default = "default_event")]
    pub event: String,

    /// Base URL of the event bus. Notifications are skipped entirely
    /// when this is absent.
    #[serde(default)]
    pub bus_url: Option<String>,

    /// Bearer token for the event bus.
    #[serde(default)]
    pub bus_token: Option<String>,

    /// Override for the store API base URL (test servers, proxies).
    #[serde(default)]
    pub store_base_url: Option<String>,
}

fn default_event() -> String {
    "pos_sale".to_string()
}

impl Options {
    /// Resolves the options file path: env override, then the default.
    pub fn path_from_env() -> PathBuf {
        std::env::var(OPTIONS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OPTIONS_PATH))
    }

    /// Loads and parses the options file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Options(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut options: Options = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Options(format!("invalid options file: {e}")))?;
        if options.bus_token.is_none() {
            options.bus_token = std::env::var(BUS_TOKEN_ENV).ok();
        }
        Ok(options)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
