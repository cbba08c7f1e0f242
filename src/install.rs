//! Dependency installation with the chosen package manager.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::scaffold::NpmClient;

/// Locate the client binary on PATH.
pub fn detect(client: NpmClient) -> Option<PathBuf> {
    which::which(client.command()).ok()
}

/// Run `<client> install` in `directory` with inherited stdio. A non-zero
/// exit is a failure.
pub fn run_install(client: NpmClient, directory: &Path) -> Result<()> {
    let program = detect(client)
        .with_context(|| format!("'{}' was not found on PATH", client.command()))?;

    let status = Command::new(program)
        .arg("install")
        .current_dir(directory)
        .status()
        .with_context(|| format!("failed to launch {} install", client.command()))?;

    if !status.success() {
        bail!("{} install exited with {status}", client.command());
    }
    Ok(())
}
