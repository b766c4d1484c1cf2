/*
[INPUT]:  YAML configuration file and OPENSRS_* environment variables
[OUTPUT]: ClientConfig ready for OpensrsClient
[POS]:    Configuration layer - CLI settings
[UPDATE]: When adding environment overrides
*/

use anyhow::{Context, Result};
use opensrs_client::ClientConfig;
use std::path::Path;

pub const USERNAME_ENV: &str = "OPENSRS_USERNAME";
pub const KEY_ENV: &str = "OPENSRS_KEY";

/// Load configuration from `path`, then apply environment overrides
pub fn load_settings(path: &Path) -> Result<ClientConfig> {
    let path_str = path.to_str().context("config path must be valid utf-8")?;
    let config = ClientConfig::from_file(path_str).context("load config")?;
    Ok(apply_overrides(config, |name| std::env::var(name).ok()))
}

/// Credentials from the environment win over the file
pub fn apply_overrides(
    mut config: ClientConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ClientConfig {
    if let Some(username) = lookup(USERNAME_ENV).filter(|value| !value.is_empty()) {
        config.username = username;
    }
    if let Some(key) = lookup(KEY_ENV).filter(|value| !value.is_empty()) {
        config.key = key;
    }
    config
}
