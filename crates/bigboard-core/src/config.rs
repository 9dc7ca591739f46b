use crate::error::{BoardError, Result};
use crate::layout::LayoutConfig;
use crate::trello::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const CONFIG_FILENAME: &str = "bigboard.yaml";

pub const ENV_API_KEY: &str = "TRELLO_API_KEY";
pub const ENV_TOKEN: &str = "TRELLO_TOKEN";
pub const ENV_WEBHOOK_SECRET: &str = "TRELLO_WEBHOOK_SECRET";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// TrelloConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrelloConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for TrelloConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            token: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// WebhookConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Public URL Trello calls back; also part of the signed payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    /// OAuth secret used to sign deliveries. Unset disables verification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default = "default_webhook_description")]
    pub description: String,
}

fn default_webhook_description() -> String {
    "big board sticker sync".to_string()
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            callback_url: None,
            secret: None,
            description: default_webhook_description(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Accept `GET /webhook/update_board?card=<id>` for local debugging.
    #[serde(default)]
    pub dev_mode: bool,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            dev_mode: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub trello: TrelloConfig,
    /// Board name → Trello board id.
    #[serde(default)]
    pub boards: BTreeMap<String, String>,
    #[serde(default = "default_primary_board")]
    pub primary_board: String,
    #[serde(default = "default_proposals_board")]
    pub proposals_board: String,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_version() -> u32 {
    1
}

fn default_primary_board() -> String {
    "big_board".to_string()
}

fn default_proposals_board() -> String {
    "proposals".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            trello: TrelloConfig::default(),
            boards: BTreeMap::new(),
            primary_board: default_primary_board(),
            proposals_board: default_proposals_board(),
            webhook: WebhookConfig::default(),
            layout: LayoutConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BoardError::ConfigNotFound);
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load `path` and layer credentials from the process environment.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let mut cfg = Self::load(path)?;
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        persist_yaml(path, &serde_yaml::to_string(self)?, true)?;
        Ok(())
    }

    /// Like `save`, but leaves an existing file alone and returns false.
    pub fn save_new(&self, path: &Path) -> Result<bool> {
        persist_yaml(path, &serde_yaml::to_string(self)?, false)
    }

    /// Override secrets with non-empty values from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_API_KEY) {
            self.trello.api_key = Some(v);
        }
        if let Some(v) = get(ENV_TOKEN) {
            self.trello.token = Some(v);
        }
        if let Some(v) = get(ENV_WEBHOOK_SECRET) {
            self.webhook.secret = Some(v);
        }
    }

    pub fn board_id(&self, name: &str) -> Result<&str> {
        self.boards
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| BoardError::BoardNotFound(name.to_string()))
    }

    pub fn primary_board_id(&self) -> Result<&str> {
        self.board_id(&self.primary_board)
    }

    pub fn proposals_board_id(&self) -> Result<&str> {
        self.board_id(&self.proposals_board)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut push = |level: WarnLevel, message: String| {
            warnings.push(ConfigWarning { level, message })
        };

        if self.trello.api_key.is_none() || self.trello.token.is_none() {
            push(
                WarnLevel::Error,
                format!("Trello credentials missing: set {ENV_API_KEY} and {ENV_TOKEN}"),
            );
        }

        if !self.boards.contains_key(&self.primary_board) {
            push(
                WarnLevel::Error,
                format!("primary_board '{}' is not listed under boards", self.primary_board),
            );
        }

        if !self.boards.contains_key(&self.proposals_board) {
            push(
                WarnLevel::Warning,
                format!(
                    "proposals_board '{}' is not listed under boards; proposal intake is disabled",
                    self.proposals_board
                ),
            );
        }

        match &self.webhook.callback_url {
            None => push(
                WarnLevel::Warning,
                "webhook.callback_url is unset; setup will not register a webhook".to_string(),
            ),
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => push(
                WarnLevel::Error,
                format!("webhook.callback_url '{url}' is not an http(s) URL"),
            ),
            Some(_) => {}
        }

        if self.webhook.callback_url.is_some() && self.webhook.secret.is_none() {
            push(
                WarnLevel::Warning,
                format!("no webhook secret ({ENV_WEBHOOK_SECRET}); deliveries are not verified"),
            );
        }

        let layout = &self.layout;
        if layout.compact_threshold >= layout.dense_threshold {
            push(
                WarnLevel::Warning,
                format!(
                    "layout.compact_threshold ({}) should be below layout.dense_threshold ({})",
                    layout.compact_threshold, layout.dense_threshold
                ),
            );
        }
        if layout.step <= 0.0 || layout.compact_step <= 0.0 || layout.dense_step <= 0.0 {
            push(
                WarnLevel::Error,
                "layout steps must be positive".to_string(),
            );
        }
        if layout.max_rotation > 180 || layout.max_rotation < 0 {
            push(
                WarnLevel::Warning,
                format!("layout.max_rotation={} is unusual", layout.max_rotation),
            );
        }

        if self.server.dev_mode {
            push(
                WarnLevel::Warning,
                "server.dev_mode accepts unsigned GET webhooks; disable in production".to_string(),
            );
        }

        warnings
    }
}

/// Write through a sibling tempfile so a reader never sees half a config.
fn persist_yaml(path: &Path, yaml: &str, overwrite: bool) -> Result<bool> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(yaml.as_bytes())?;

    let placed = if overwrite {
        tmp.persist(path)
    } else {
        tmp.persist_noclobber(path)
    };
    match placed {
        Ok(_) => Ok(true),
        Err(e) if !overwrite && e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.error.into()),
    }
}

/// Walk upward from `start` looking for `bigboard.yaml`, then fall back to
/// `~/.config/bigboard.yaml` if it exists.
pub fn discover(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => break,
        }
    }

    let home_candidate = home::home_dir()?.join(".config").join(CONFIG_FILENAME);
    home_candidate.is_file().then_some(home_candidate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
