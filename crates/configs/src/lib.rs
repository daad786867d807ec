use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use common::utils::logging::LogFormat;
use serde::Deserialize;

pub const DEFAULT_DATABASE_PATH: &str = "tasks.db";
pub const DEFAULT_API_TOKEN: &str = "dev-token-change-me";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8000, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    /// Shared secret expected in `Authorization: Bearer <token>` on mutating routes.
    #[serde(default)]
    pub api_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Requests slower than this are logged at WARN.
    #[serde(default = "default_slow_request_ms")]
    pub slow_request_ms: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: LogFormat::Text, slow_request_ms: default_slow_request_ms() }
    }
}

fn default_max_connections() -> u32 { 5 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_log_level() -> String { "info".into() }
fn default_slow_request_ms() -> u64 { 500 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load once at process start: optional TOML file, then environment overrides, then validation.
    /// A missing file falls back to defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path).map_err(|e| anyhow!("cannot read config file {path}: {e}"))?
        } else {
            AppConfig::default()
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override fields from environment variables looked up through `get`.
    pub fn apply_env<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = get("SERVER_HOST") { self.server.host = host; }
        if let Some(port) = get("SERVER_PORT").and_then(|p| p.parse().ok()) { self.server.port = port; }
        if let Some(w) = get("TOKIO_WORKER_THREADS").and_then(|v| v.parse().ok()) { self.server.worker_threads = Some(w); }

        if let Some(url) = get("DATABASE_URL") {
            self.database.url = url;
        } else if let Some(path) = get("DATABASE_PATH") {
            self.database.url = sqlite_url_for_path(&path);
        }

        if let Some(token) = get("API_TOKEN") { self.auth.api_token = token; }

        if let Some(level) = get("LOG_LEVEL") { self.logging.level = level; }
        if let Some(format) = get("LOG_FORMAT") {
            match format.parse() {
                Ok(f) => self.logging.format = f,
                Err(e) => tracing::warn!(error = %e, "ignoring LOG_FORMAT"),
            }
        }
        if let Some(ms) = get("SLOW_REQUEST_MS").and_then(|v| v.parse().ok()) { self.logging.slow_request_ms = ms; }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize();
        self.database.validate()?;
        self.auth.normalize();
        self.logging.validate()?;
        Ok(())
    }

    /// True when the API token was not configured and the development default is in use.
    pub fn uses_default_token(&self) -> bool {
        self.auth.api_token == DEFAULT_API_TOKEN
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

/// `sqlite://<path>?mode=rwc`, creating the file on first connect.
pub fn sqlite_url_for_path(path: &str) -> String {
    format!("sqlite://{}?mode=rwc", path.trim())
}

impl DatabaseConfig {
    pub fn normalize(&mut self) {
        if self.url.trim().is_empty() {
            self.url = sqlite_url_for_path(DEFAULT_DATABASE_PATH);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml, DATABASE_URL or DATABASE_PATH"));
        }
        if !self.url.to_lowercase().starts_with("sqlite:") {
            return Err(anyhow!("database.url must start with sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }

    /// In-memory databases live and die with a single connection.
    pub fn is_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// Filesystem location of the SQLite file, if the URL names one.
    pub fn file_path(&self) -> Option<PathBuf> {
        if self.is_memory() {
            return None;
        }
        let rest = self.url.strip_prefix("sqlite://").or_else(|| self.url.strip_prefix("sqlite:"))?;
        let path = rest.split('?').next().unwrap_or_default();
        if path.is_empty() { None } else { Some(PathBuf::from(path)) }
    }
}

impl AuthConfig {
    fn normalize(&mut self) {
        let trimmed = self.api_token.trim();
        self.api_token = if trimmed.is_empty() { DEFAULT_API_TOKEN.to_string() } else { trimmed.to_string() };
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<()> {
        if self.level.trim().is_empty() {
            return Err(anyhow!("logging.level must not be empty"));
        }
        Ok(())
    }
}
