pub mod site_config;

// Re-export common types for convenience
pub use site_config::{
    BuildConfig, LoggingConfig, RenderConfig, ServerConfig, SiteConfig, WatchConfig,
    CONFIG_FILE_NAME, DEFAULT_CONFIG,
};
