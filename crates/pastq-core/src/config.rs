//! Configuration module
//!
//! Environment-driven settings for the client and CLI. Call sites load a
//! `.env` file first (dotenvy) and then read the typed config from the
//! process environment.

use std::env;
use std::path::PathBuf;

// Common constants
pub const DEFAULT_API_BASE: &str = "https://jabumarket.com.ng/lss_api";
pub const DEFAULT_LIST_LIMIT: u32 = 400;
pub const DEFAULT_SNAPSHOT_FILE: &str = "resources.json";

/// Client configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the remote API.
    pub api_base: String,
    /// Default `limit` query param for the list endpoint.
    pub list_limit: u32,
    /// Override for the local state directory (token, drafts, photos).
    /// `None` means the platform data directory.
    pub state_dir: Option<PathBuf>,
    /// Static catalog snapshot used when the remote list is unreachable.
    pub snapshot_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let api_base = get("PASTQ_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let list_limit = get("PASTQ_LIST_LIMIT")
            .and_then(|v| v.trim().parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_LIST_LIMIT);

        let state_dir = get("PASTQ_STATE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let snapshot_path = get("PASTQ_SNAPSHOT")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_FILE));

        Config {
            api_base: api_base.trim_end_matches('/').to_string(),
            list_limit,
            state_dir,
            snapshot_path,
        }
    }
}
