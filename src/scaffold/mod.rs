//! Project scaffolding from bundled templates.
//!
//! A template is a directory tree shipped with the CLI. Creating a project
//! walks that tree and materializes each entry into the target directory:
//! directories are created, `package.json` is rewritten with the new
//! project's metadata, lockfiles are filtered by package manager, and
//! everything else is copied byte-for-byte.
//!
//! Some template files would interfere with tooling in the repository that
//! hosts the templates if they kept their real names; `babel.config.js`, for
//! instance, is found by any build running above it. Those files carry a
//! `SCAFFOLD_ONLY_` marker in the template and lose it on copy.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Marker stripped from every path segment when a template is materialized.
pub const MARKER_PREFIX: &str = "SCAFFOLD_ONLY_";

/// Templates that ship with the CLI.
pub const BUNDLED_TEMPLATES: &[&str] = &["venia-starter"];

/// Package manager the generated project is configured for.
///
/// Decides which lockfile survives the copy and which binary runs the
/// dependency install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NpmClient {
    Npm,
    Yarn,
}

impl NpmClient {
    /// Name of the client binary on PATH.
    pub fn command(&self) -> &'static str {
        match self {
            NpmClient::Npm => "npm",
            NpmClient::Yarn => "yarn",
        }
    }

    /// Lockfile this client owns.
    pub fn lockfile(&self) -> &'static str {
        match self {
            NpmClient::Npm => "package-lock.json",
            NpmClient::Yarn => "yarn.lock",
        }
    }
}

impl fmt::Display for NpmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Metadata stamped into the generated project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub name: String,
    pub author: String,
    pub npm_client: NpmClient,
}

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("unknown template '{0}' (bundled templates: venia-starter)")]
    UnknownTemplate(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed package.json at {}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Materializes bundled templates into new project directories.
pub struct Scaffold {
    scaffolds_root: PathBuf,
}

impl Scaffold {
    pub fn new(scaffolds_root: impl AsRef<Path>) -> Self {
        Self {
            scaffolds_root: scaffolds_root.as_ref().to_path_buf(),
        }
    }

    /// Scaffolds shipped with the installed binary.
    ///
    /// Resolution order: `BUILDPACK_SCAFFOLDS` override, a `scaffolds/`
    /// directory next to the executable, then the crate tree (dev builds).
    pub fn bundled() -> Self {
        if let Ok(root) = std::env::var("BUILDPACK_SCAFFOLDS") {
            return Self::new(root);
        }
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let root = dir.join("scaffolds");
                if root.is_dir() {
                    return Self::new(root);
                }
            }
        }
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("scaffolds"))
    }

    /// Root directory of a bundled template.
    pub fn template_dir(&self, template: &str) -> Result<PathBuf, ScaffoldError> {
        let dir = self.scaffolds_root.join(template);
        if !BUNDLED_TEMPLATES.contains(&template) || !dir.is_dir() {
            return Err(ScaffoldError::UnknownTemplate(template.to_string()));
        }
        Ok(dir)
    }

    /// Materialize `template` into `directory`, stamping `descriptor` into
    /// the project manifest.
    ///
    /// Fails fast: the first entry that cannot be transferred aborts the
    /// call, and entries already written stay on disk for diagnosis.
    pub fn create_project(
        &self,
        template: &str,
        directory: &Path,
        descriptor: &ProjectDescriptor,
    ) -> Result<(), ScaffoldError> {
        fs::create_dir_all(directory).map_err(|e| io_error(directory, e))?;
        let template_dir = self.template_dir(template)?;

        // Sorted traversal keeps reruns byte-identical; walkdir yields a
        // directory before anything inside it, so parents always exist by
        // the time their children are written.
        for entry in WalkDir::new(&template_dir).sort_by_file_name() {
            let entry = entry.map_err(walk_error)?;
            let relative = entry
                .path()
                .strip_prefix(&template_dir)
                .expect("walk entries are rooted at the template dir");
            if relative.as_os_str().is_empty() {
                // The template root maps to `directory`, already created.
                continue;
            }
            let target = directory.join(strip_marker(relative));
            transfer(&entry, &target, descriptor)?;
        }
        Ok(())
    }
}

/// Transfer one walked entry to its output path.
fn transfer(
    entry: &walkdir::DirEntry,
    target: &Path,
    descriptor: &ProjectDescriptor,
) -> Result<(), ScaffoldError> {
    if entry.file_type().is_dir() {
        return fs::create_dir_all(target).map_err(|e| io_error(target, e));
    }

    // Dispatch on the output name: the marker may be hiding a manifest or
    // lockfile from the template repository's own tooling.
    let filename = target
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    match filename {
        "package.json" => write_manifest(entry.path(), target, descriptor),
        "package-lock.json" if descriptor.npm_client != NpmClient::Npm => Ok(()),
        "yarn.lock" if descriptor.npm_client != NpmClient::Yarn => Ok(()),
        _ => fs::copy(entry.path(), target)
            .map(|_| ())
            .map_err(|e| io_error(entry.path(), e)),
    }
}

/// Overlay the descriptor's `name` and `author` onto the template manifest
/// and write it with stable 2-space indentation. Every other field passes
/// through untouched.
fn write_manifest(
    source: &Path,
    target: &Path,
    descriptor: &ProjectDescriptor,
) -> Result<(), ScaffoldError> {
    let raw = fs::read_to_string(source).map_err(|e| io_error(source, e))?;
    let mut manifest: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw)
        .map_err(|e| ScaffoldError::ManifestParse {
            path: source.to_path_buf(),
            source: e,
        })?;

    manifest.insert(
        "name".to_string(),
        serde_json::Value::String(descriptor.name.clone()),
    );
    manifest.insert(
        "author".to_string(),
        serde_json::Value::String(descriptor.author.clone()),
    );

    let mut serialized =
        serde_json::to_string_pretty(&manifest).expect("JSON maps always serialize");
    serialized.push('\n');
    fs::write(target, serialized).map_err(|e| io_error(target, e))
}

/// Remove every occurrence of the marker from every segment of a relative
/// path. Segments that are not valid UTF-8 cannot contain the marker and
/// pass through unchanged.
fn strip_marker(relative: &Path) -> PathBuf {
    relative
        .components()
        .map(|component| {
            let segment = component.as_os_str();
            match segment.to_str() {
                Some(s) if s.contains(MARKER_PREFIX) => {
                    OsString::from(s.replace(MARKER_PREFIX, ""))
                }
                _ => segment.to_os_string(),
            }
        })
        .collect()
}

fn io_error(path: &Path, source: io::Error) -> ScaffoldError {
    ScaffoldError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn walk_error(error: walkdir::Error) -> ScaffoldError {
    let path = error.path().map(Path::to_path_buf).unwrap_or_default();
    match error.into_io_error() {
        Some(source) => ScaffoldError::Io { path, source },
        None => ScaffoldError::Io {
            path,
            source: io::Error::new(io::ErrorKind::Other, "filesystem loop detected"),
        },
    }
}
