//! `ihjs init`: new project skeleton

use crate::config::{CONFIG_FILE_NAME, DEFAULT_CONFIG};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Starter page written to `app.toml`
pub const STARTER_APP: &str = r#"# Page definition. The `index` table is the root node of the site.
#
# Every node is a table: `kind` is "container" (default), "text" or "heading";
# `tag`, `children`, `content` and `level` are structural; any other key is an
# HTML attribute (`class_name` is written as `class`).

[index]
class_name = "min-h-screen bg-gray-50 flex items-center justify-center"

[[index.children]]
class_name = "p-8 bg-white shadow-lg rounded-xl text-center"

[[index.children.children]]
kind = "heading"
content = "Welcome to IHJS! 🚀"
level = 1
class_name = "text-3xl font-bold text-blue-600 mb-4"

[[index.children.children]]
kind = "text"
content = "This is your new static site project."
class_name = "text-gray-600 mb-6 block"

[[index.children.children]]
kind = "text"
content = "Edit app.toml to get started."
class_name = "text-sm text-gray-400 italic"
"#;

const GITIGNORE: &str = "dist/\n";

/// Create `<parent>/<name>` with a starter page, config and empty asset folders.
///
/// Fails without touching anything when the directory already exists.
pub fn init_project(parent: &Path, name: &str) -> Result<PathBuf> {
    if name.trim().is_empty() {
        bail!("Project name cannot be empty");
    }

    let project = parent.join(name);
    if project.exists() {
        bail!("Directory '{}' already exists!", name);
    }

    fs::create_dir_all(&project)
        .with_context(|| format!("Failed to create {}", project.display()))?;
    fs::create_dir(project.join("assets"))?;
    fs::create_dir(project.join("components"))?;

    fs::write(project.join("app.toml"), STARTER_APP)?;
    fs::write(project.join(CONFIG_FILE_NAME), DEFAULT_CONFIG)?;
    fs::write(project.join(".gitignore"), GITIGNORE)?;

    Ok(project)
}
