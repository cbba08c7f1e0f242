//! `.env` generation for new projects.
//!
//! The storefront's build tooling reads its backend connection settings from
//! a `.env` file in the project root. The file is rendered from an embedded
//! template so the generated copy carries the same commentary everywhere.

use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_TEMPLATE: &str = include_str!("../resources/env.hbs");

/// What `write_env_file` did with the target path.
#[derive(Debug, PartialEq, Eq)]
pub enum EnvFile {
    Written(PathBuf),
    /// A `.env` was already there; it is never clobbered.
    AlreadyExists(PathBuf),
}

/// Render and write `<directory>/.env` pointing the project at `backend_url`.
pub fn write_env_file(directory: &Path, backend_url: &str) -> Result<EnvFile> {
    let path = directory.join(".env");
    if path.exists() {
        return Ok(EnvFile::AlreadyExists(path));
    }

    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_template_string("env", ENV_TEMPLATE)?;

    let rendered = handlebars.render(
        "env",
        &json!({
            "version": env!("CARGO_PKG_VERSION"),
            "generated": chrono::Utc::now().to_rfc3339(),
            "backend_url": backend_url,
        }),
    )?;

    fs::write(&path, rendered)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(EnvFile::Written(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_backend_url() {
        let temp = TempDir::new().unwrap();
        let outcome = write_env_file(temp.path(), "https://magento.test/").unwrap();

        let path = temp.path().join(".env");
        assert_eq!(outcome, EnvFile::Written(path.clone()));
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("MAGENTO_BACKEND_URL=https://magento.test/"));
    }

    #[test]
    fn test_existing_env_file_is_kept() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        fs::write(&path, "MAGENTO_BACKEND_URL=https://mine.test/\n").unwrap();

        let outcome = write_env_file(temp.path(), "https://other.test/").unwrap();
        assert_eq!(outcome, EnvFile::AlreadyExists(path.clone()));
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "MAGENTO_BACKEND_URL=https://mine.test/\n"
        );
    }
}
