//! Command-line interface: `dev`, `build` and `init`

pub mod scaffold;

use crate::app::AppFile;
use crate::build::{build_site, BuildReport};
use crate::config::SiteConfig;
use crate::error::AppError;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ihjs")]
#[command(about = "Static site generator with a hot-reloading dev server", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ihjs.config.toml lookup)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the dev server with hot reload
    Dev {
        /// Page file (defaults to app.toml)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind
        #[arg(long)]
        host: Option<String>,
    },

    /// Build the static site into the output directory
    Build {
        /// Page file (defaults to app.toml)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Initialize a new project directory
    Init {
        /// Project name (creates a directory)
        #[arg(value_name = "NAME")]
        name: String,
    },
}

impl Cli {
    /// Resolve configuration: explicit `--config`, then the usual lookup,
    /// then environment overrides
    pub fn load_config(&self) -> Result<SiteConfig> {
        let mut config = match &self.config {
            Some(path) => SiteConfig::load_from_file(path)?,
            None => SiteConfig::load()?,
        };
        config.apply_env_overrides()?;
        if self.verbose > 0 {
            config.logging.level = match self.verbose {
                1 => "debug",
                _ => "trace",
            }
            .to_string();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Install the tracing subscriber, merging `RUST_LOG` with the configured level
pub fn init_logging(level: &str) {
    let default_directive = format!("ihjs={}", level.to_lowercase());
    let env_override = std::env::var("RUST_LOG").unwrap_or_default();
    let combined_filter = if env_override.trim().is_empty() {
        default_directive
    } else if env_override.contains("ihjs") {
        env_override
    } else {
        format!("{},{}", env_override, default_directive)
    };

    tracing_subscriber::fmt()
        .with_env_filter(combined_filter)
        .with_target(true)
        .init();
}

/// Run a parsed command
pub async fn execute(command: Commands, config: SiteConfig) -> Result<()> {
    match command {
        Commands::Dev { file, port, host } => {
            let file = file.unwrap_or_else(|| config.build.app.clone());
            let mut server = config.server.clone();
            if let Some(port) = port {
                server.port = port;
            }
            if let Some(host) = host {
                server.host = host;
            }
            run_dev(&file, server, &config).await
        }
        Commands::Build { file, output } => {
            let file = file.unwrap_or_else(|| config.build.app.clone());
            let output = output.unwrap_or_else(|| config.build.output.clone());
            println!("Building project from file: {}", file.display());
            let report = run_build(&file, &output, &config)?;
            println!(
                "{}",
                format!("Success! Generated at: {}", report.output_file.display()).green()
            );
            Ok(())
        }
        Commands::Init { name } => {
            println!("Creating project directory: {}...", name);
            scaffold::init_project(Path::new("."), &name)?;
            println!(
                "{}",
                format!("Project '{}' created successfully!", name).green()
            );
            println!("To get started:");
            println!("{}", format!("cd {}", name).cyan());
            println!("{}", "ihjs dev".cyan());
            Ok(())
        }
    }
}

/// Build `index.html` from a page file
pub fn run_build(file: &Path, output: &Path, config: &SiteConfig) -> Result<BuildReport> {
    let app = AppFile::open(file).map_err(|e| match e {
        AppError::NotFound(_) => anyhow::anyhow!(
            "File '{}' not found. Are you in the right directory?",
            file.display()
        ),
        other => anyhow::Error::new(other).context("Error loading page file"),
    })?;

    build_site(&app, output, &config.render.options()).map_err(|e| match e {
        AppError::MissingEntryPoint(_) => {
            anyhow::anyhow!("Missing index entry point in {}", file.display())
        }
        AppError::Io(io) => anyhow::Error::new(io).context(format!(
            "Failed to write {}",
            output.join(crate::build::INDEX_FILE).display()
        )),
        other => anyhow::Error::new(other).context("Error during rendering"),
    })
}

#[cfg(feature = "dev-server")]
async fn run_dev(
    file: &Path,
    server: crate::config::ServerConfig,
    config: &SiteConfig,
) -> Result<()> {
    use crate::server::{DevServer, WatchSpec};
    use crate::watch::WatchFilter;
    use std::sync::Arc;

    let app = match AppFile::open(file) {
        Ok(app) => app,
        Err(AppError::NotFound(_)) => {
            eprintln!(
                "{}",
                "Hint: Use 'ihjs init <name>' to create a new project.".yellow()
            );
            return Err(anyhow::anyhow!("File '{}' not found!", file.display()));
        }
        Err(other) => return Err(other.into()),
    };

    let root = app.watch_root();
    let filter = WatchFilter::new(&config.watch.extensions)
        .ignore_dir(root.join(&config.build.output));
    let spec = WatchSpec {
        root,
        filter,
        debounce: config.watch.debounce(),
    };

    println!("\nLive Server: http://{}", server.bind_address());

    DevServer::new(server, Arc::new(app), config.render.options())
        .with_watch(spec)
        .run_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Dev server stopped")
}

#[cfg(not(feature = "dev-server"))]
async fn run_dev(
    _file: &Path,
    _server: crate::config::ServerConfig,
    _config: &SiteConfig,
) -> Result<()> {
    Err(anyhow::anyhow!(
        "The dev server requires the 'dev-server' feature. Rebuild with: cargo build --features dev-server"
    ))
}
