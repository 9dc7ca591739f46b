use bigboard_core::config::{discover, CONFIG_FILENAME};
use bigboard_core::BoardError;
use std::path::{Path, PathBuf};

/// Resolve the config file to load.
///
/// Priority:
/// 1. `--config` flag / `BIGBOARD_CONFIG` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `bigboard.yaml`
/// 3. `~/.config/bigboard.yaml`
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    discover(&cwd).ok_or_else(|| BoardError::ConfigNotFound.into())
}

/// Where `config init` writes: the explicit path, or `bigboard.yaml` in `cwd`.
pub fn init_target(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(CONFIG_FILENAME),
    }
}
