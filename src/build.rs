//! One-shot static build

use crate::app::EntryPoint;
use crate::components::RenderOptions;
use crate::error::AppError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File written into the output directory
pub const INDEX_FILE: &str = "index.html";

/// Outcome of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Path of the generated `index.html`
    pub output_file: PathBuf,
    /// Bytes written
    pub bytes: usize,
    /// Nodes in the rendered tree
    pub nodes: usize,
}

/// Render the entry point once and write `index.html` into `output_dir`.
///
/// The directory is created when absent; an existing `index.html` is
/// overwritten. Nothing is written if obtaining the tree fails.
pub fn build_site(
    entry: &dyn EntryPoint,
    output_dir: &Path,
    options: &RenderOptions,
) -> Result<BuildReport, AppError> {
    debug!("Building {} into {}", entry.describe(), output_dir.display());

    let root = entry.index()?;
    let html = root.render_with(options);

    std::fs::create_dir_all(output_dir)?;
    let output_file = output_dir.join(INDEX_FILE);
    std::fs::write(&output_file, &html)?;

    info!(
        "Wrote {} ({} bytes, {} nodes)",
        output_file.display(),
        html.len(),
        root.node_count()
    );

    Ok(BuildReport {
        output_file,
        bytes: html.len(),
        nodes: root.node_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{div, heading, text};
    use tempfile::TempDir;

    #[test]
    fn test_build_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("nested").join("dist");
        let entry = || div().children(vec![heading("Hi", 2), text("there")]);

        let report = build_site(&entry, &output, &RenderOptions::default()).unwrap();

        assert_eq!(report.output_file, output.join("index.html"));
        assert_eq!(report.nodes, 3);
        let written = std::fs::read_to_string(&report.output_file).unwrap();
        assert_eq!(written, "<div><h2>Hi</h2><span>there</span></div>");
        assert_eq!(report.bytes, written.len());
    }

    #[test]
    fn test_build_overwrites_existing_index() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "stale").unwrap();

        let entry = || text("fresh");
        build_site(&entry, dir.path(), &RenderOptions::default()).unwrap();

        let written = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert_eq!(written, "<span>fresh</span>");
    }

    #[test]
    fn test_build_writes_nothing_on_error() {
        struct Broken;
        impl EntryPoint for Broken {
            fn index(&self) -> Result<crate::components::Node, AppError> {
                Err(AppError::MissingEntryPoint("broken".into()))
            }
        }

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("dist");
        let err = build_site(&Broken, &output, &RenderOptions::default()).unwrap_err();

        assert!(err.is_missing_entry_point());
        assert!(!output.exists());
    }
}
