use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;

use buildpack::custom_origin;

pub fn execute(directory: &str, name: Option<&str>) -> Result<()> {
    let dir = PathBuf::from(shellexpand::tilde(directory).into_owned());
    let name = match name {
        Some(name) => name.to_string(),
        None => dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| directory.to_string()),
    };

    let origin = custom_origin::provision(&dir, &name)
        .context("failed to provision a custom secure origin")?;

    println!(
        "{}",
        format!("✨ Created custom origin https://{}", origin.host).green()
    );
    println!("   Certificate: {}", origin.cert.display());
    println!(
        "   Add '127.0.0.1 {}' to your hosts file to resolve it locally",
        origin.host
    );

    Ok(())
}
