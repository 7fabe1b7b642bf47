//! Entry points: where the harness gets the root node from
//!
//! An [`AppFile`] is a TOML or JSON page document re-read on every call, so
//! edits show up on the next render without restarting anything. Rust callers
//! can hand the harness any `Fn() -> Node` closure instead.

pub mod page;

use crate::components::Node;
use crate::error::AppError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use page::{node_from_value, root_from_document, ENTRY_POINT};

/// Produces the root node of the site
pub trait EntryPoint: Send + Sync {
    /// Build the root node
    fn index(&self) -> Result<Node, AppError>;

    /// Human-readable source, used in logs
    fn describe(&self) -> String {
        "index()".to_string()
    }
}

impl<F> EntryPoint for F
where
    F: Fn() -> Node + Send + Sync,
{
    fn index(&self) -> Result<Node, AppError> {
        Ok(self())
    }
}

/// Serialization format of a page file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    Toml,
    Json,
}

impl PageFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(PageFormat::Toml),
            "json" => Some(PageFormat::Json),
            _ => None,
        }
    }

    pub fn parse(&self, source: &str) -> Result<Value, String> {
        match self {
            PageFormat::Toml => toml::from_str(source).map_err(|e| e.to_string()),
            PageFormat::Json => serde_json::from_str(source).map_err(|e| e.to_string()),
        }
    }
}

/// Page file on disk
#[derive(Debug, Clone)]
pub struct AppFile {
    path: PathBuf,
    format: PageFormat,
}

impl AppFile {
    /// Open a page file, checking that it exists and has a known extension
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        if !path.is_file() {
            return Err(AppError::NotFound(path));
        }
        let format =
            PageFormat::from_path(&path).ok_or_else(|| AppError::UnsupportedFormat(path.clone()))?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> PageFormat {
        self.format
    }

    /// Directory whose changes should trigger a reload
    pub fn watch_root(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Read and parse the document from disk
    pub fn load_document(&self) -> Result<Value, AppError> {
        let source = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(self.path.clone())
            } else {
                AppError::Io(e)
            }
        })?;

        self.format.parse(&source).map_err(|message| AppError::Parse {
            path: self.path.clone(),
            message,
        })
    }
}

impl EntryPoint for AppFile {
    fn index(&self) -> Result<Node, AppError> {
        debug!("Loading page file {}", self.path.display());
        let document = self.load_document()?;
        let root = root_from_document(&document, &self.path.display().to_string())?;
        debug!(
            "Built tree with {} nodes from {}",
            root.node_count(),
            self.path.display()
        );
        Ok(root)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
