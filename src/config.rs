use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const APP_DIR: &str = "marketplace-insights";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub database: DatabaseConfig,

    pub ollama: OllamaConfig,

    pub api: ApiConfig,

    pub server: ServerConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Forces `debug` logging regardless of `log_level`.
    pub debug: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            debug: false,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Store location, e.g. `sqlite:data` or `sqlite::memory:`.
    pub url: String,

    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data".to_string(),
            name: "marketplace_insights".to_string(),
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn connection_string(&self) -> String {
        crate::db::connection_string(&self.url, &self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,

    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub title: String,

    pub description: String,

    pub version: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            title: "Agentic Marketplace Insights API".to_string(),
            description: "AI-powered product insights using Ollama".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// `"*"` reflects any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    /// `"text"` or `"json"`.
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            log_format: "text".to_string(),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Defaults, then the first config file found, then `.env` and the process environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;

        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from: {}", path.display());
        }
        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(name) = lookup("DATABASE_NAME") {
            self.database.name = name;
        }
        if let Some(base_url) = lookup("OLLAMA_BASE_URL") {
            self.ollama.base_url = base_url;
        }
        if let Some(model) = lookup("OLLAMA_MODEL") {
            self.ollama.model = model;
        }
        if let Some(title) = lookup("API_TITLE") {
            self.api.title = title;
        }
        if let Some(version) = lookup("API_VERSION") {
            self.api.version = version;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.general.log_level = level;
        }
        if let Some(debug) = lookup("DEBUG") {
            self.general.debug = parse_bool(&debug)
                .with_context(|| format!("DEBUG must be a boolean, got '{debug}'"))?;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("SERVER_PORT must be a port number, got '{port}'"))?;
        }
        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(APP_DIR).join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(format!(".{APP_DIR}")).join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.ollama.base_url)
            .with_context(|| format!("Invalid Ollama base URL: {}", self.ollama.base_url))?;

        if self.ollama.model.trim().is_empty() {
            anyhow::bail!("Ollama model name cannot be empty");
        }

        if self.database.name.trim().is_empty() {
            anyhow::bail!("Database name cannot be empty");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("min_db_connections cannot exceed max_db_connections");
        }

        Ok(())
    }

    /// Filter directive for the log subscriber.
    #[must_use]
    pub fn effective_log_level(&self) -> &str {
        if self.general.debug {
            "debug"
        } else {
            &self.general.log_level
        }
    }
}
