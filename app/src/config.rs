//! App configuration for the remote product catalog.

use directories::ProjectDirs;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Connection settings for the product catalog service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog endpoint returning product records.
    pub endpoint: String,
    /// Bearer token sent with every catalog request. Comes from the config
    /// file or the `CATALOG_API_TOKEN` environment variable, never from
    /// source.
    #[serde(default)]
    pub api_token: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://dummyjson.com/products".to_string(),
            api_token: String::new(),
        }
    }
}

impl CatalogConfig {
    /// Load the catalog config, if present, and apply the environment
    /// override for the token.
    pub fn load() -> Self {
        let mut config = read_config_file().unwrap_or_default();
        if let Ok(token) = std::env::var("CATALOG_API_TOKEN") {
            config.api_token = token;
        }
        config
    }
}

fn read_config_file() -> Option<CatalogConfig> {
    let path = config_path()?;
    let text = fs::read_to_string(&path).ok()?;
    match toml::from_str(&text) {
        Ok(config) => {
            info!("Catalog config loaded from {}", path.display());
            Some(config)
        }
        Err(e) => {
            error!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

fn config_path() -> Option<PathBuf> {
    let proj_dirs = ProjectDirs::from("me", "liesegang", "sheet_editor")?;
    Some(proj_dirs.config_dir().join("catalog.toml"))
}
