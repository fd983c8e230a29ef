use anyhow::{Result, anyhow};
use std::path::PathBuf;

/// Environment variables read at start-up.
pub mod env_keys {
    pub const CONFIG_DIR: &str = "PR_VIEW_CONFIG_DIR";
    pub const HOME: &str = "HOME";
    pub const API_URL: &str = "GITHUB_API_URL";
    pub const TOKEN: &str = "GITHUB_TOKEN";
    pub const LOG: &str = "PR_VIEW_LOG";
}

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Process-wide settings, resolved once and handed to the store and the
/// GitHub client explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory holding `repos.json`.
    pub config_dir: PathBuf,
    /// Base URL of the GitHub REST API, without a trailing slash.
    pub api_base_url: String,
    pub token: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    ///
    /// - `PR_VIEW_CONFIG_DIR` wins over `$HOME/.config/pr-view`.
    /// - Blank values count as unset.
    /// - Returns an `Err` if no config directory can be determined.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config_dir = match non_blank(env_keys::CONFIG_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => non_blank(env_keys::HOME)
                .map(|home| PathBuf::from(home).join(".config").join("pr-view"))
                .ok_or_else(|| {
                    anyhow!(
                        "Cannot determine config directory: set {} or {}",
                        env_keys::CONFIG_DIR,
                        env_keys::HOME
                    )
                })?,
        };

        let api_base_url = non_blank(env_keys::API_URL)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let token = non_blank(env_keys::TOKEN).map(|t| t.trim().to_string());

        Ok(Settings {
            config_dir,
            api_base_url,
            token,
        })
    }
}
