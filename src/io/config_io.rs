use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

pub const CONFIG_FILE: &str = "workplan.toml";

/// Error type for config and state IO
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not a workplan project (no {CONFIG_FILE} in {0}); run `wp init`")]
    NotInitialized(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid state file: {0}")]
    StateParse(#[from] serde_json::Error),
}

/// Read workplan.toml from the project root.
pub fn read_config(root: &Path) -> Result<AppConfig, StoreError> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Err(StoreError::NotInitialized(root.to_path_buf()));
    }
    let text = fs::read_to_string(&path).map_err(|e| StoreError::Read {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Write the default workplan.toml. Returns false when one already exists
/// and `force` is not set.
pub fn write_default_config(root: &Path, force: bool) -> Result<bool, StoreError> {
    let path = root.join(CONFIG_FILE);
    if path.exists() && !force {
        return Ok(false);
    }
    let text = toml::to_string_pretty(&AppConfig::default())
        .expect("default config always serializes");
    fs::write(&path, text).map_err(|e| StoreError::Write { path, source: e })?;
    Ok(true)
}
