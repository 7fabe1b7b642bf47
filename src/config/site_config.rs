//! Site-level configuration
//!
//! Defines the dev server address, build input/output, file watching,
//! rendering and logging settings.

use crate::components::RenderOptions;
use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Embedded default configuration file
pub const DEFAULT_CONFIG: &str = include_str!("../../ihjs.config.toml");

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "ihjs.config.toml";

/// Top-level site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SiteConfig {
    /// Dev server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Build input and output
    #[serde(default)]
    pub build: BuildConfig,
    /// File watching for the dev loop
    #[serde(default)]
    pub watch: WatchConfig,
    /// Rendering options
    #[serde(default)]
    pub render: RenderConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SiteConfig {
    /// Load configuration, falling back to built-in defaults.
    ///
    /// Lookup order: `ihjs.config.toml` in the current directory,
    /// `~/.ihjs/ihjs.config.toml`, then the path in `IHJS_CONFIG`.
    pub fn load() -> Result<Self> {
        if let Some(config) = Self::load_from_dir(Path::new("."))? {
            return Ok(config);
        }

        if let Some(base_dirs) = BaseDirs::new() {
            let home_config = base_dirs.home_dir().join(".ihjs").join(CONFIG_FILE_NAME);
            if home_config.is_file() {
                return Self::load_from_file(&home_config);
            }
        }

        if let Ok(config_path) = std::env::var("IHJS_CONFIG") {
            return Self::load_from_file(Path::new(&config_path));
        }

        tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        Ok(Self::default())
    }

    /// Load `ihjs.config.toml` from a directory, if present
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        Self::load_from_file(&path).map(Some)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {}: {}", path.display(), e))
    }

    /// Parse the embedded default configuration
    pub fn embedded_default() -> Result<Self> {
        toml::from_str(DEFAULT_CONFIG)
            .map_err(|e| anyhow::anyhow!("Failed to parse embedded default config: {}", e))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(anyhow::anyhow!("Server host cannot be empty"));
        }

        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port must be greater than 0"));
        }

        if self.build.output.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Build output directory cannot be empty"));
        }

        if self.watch.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(anyhow::anyhow!(
                "At least one watch extension must be configured"
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(anyhow::anyhow!("Invalid log level: {}", self.logging.level)),
        }

        Ok(())
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Fails on a value that cannot be parsed, leaving the overrides read so
    /// far applied. Runs before logging is installed, so nothing is logged here.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.trim().is_empty())
        }

        if let Some(host) = var("IHJS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("IHJS_PORT") {
            self.server.port = port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid IHJS_PORT value '{}'", port))?;
        }
        if let Some(app) = var("IHJS_APP") {
            self.build.app = PathBuf::from(app);
        }
        if let Some(output) = var("IHJS_OUTPUT") {
            self.build.output = PathBuf::from(output);
        }
        if let Some(escape) = var("IHJS_ESCAPE") {
            match escape.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.render.escape = true,
                "0" | "false" | "no" | "off" => self.render.escape = false,
                _ => {
                    return Err(anyhow::anyhow!(
                        "Invalid IHJS_ESCAPE value '{}' (expected true or false)",
                        escape
                    ))
                }
            }
        }
        if let Some(level) = var("IHJS_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        Ok(())
    }

    /// Get a summary of the configuration
    pub fn summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("Configuration loaded:\n");
        summary.push_str(&format!("Server: {}\n", self.server.bind_address()));
        summary.push_str(&format!("App File: {}\n", self.build.app.display()));
        summary.push_str(&format!("Output: {}\n", self.build.output.display()));
        summary.push_str(&format!(
            "Watch Extensions: {}\n",
            self.watch.extensions.join(", ")
        ));
        summary.push_str(&format!("Escape Output: {}\n", self.render.escape));
        summary.push_str(&format!("Logging Level: {}\n", self.logging.level));
        summary
    }
}

/// Dev server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Page file providing the `index` entry point
    #[serde(default = "default_app")]
    pub app: PathBuf,
    /// Output directory for `index.html`
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_app() -> PathBuf {
    PathBuf::from("app.toml")
}

fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            app: default_app(),
            output: default_output(),
        }
    }
}

/// File watching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// File extensions (without the dot) that trigger a reload
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Debounce window in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_extensions() -> Vec<String> {
    vec!["toml".to_string(), "json".to_string()]
}

fn default_debounce_ms() -> u64 {
    200
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl WatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Escape attribute values and text content
    #[serde(default = "default_escape")]
    pub escape: bool,
}

fn default_escape() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            escape: default_escape(),
        }
    }
}

impl RenderConfig {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            escape: self.escape,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
