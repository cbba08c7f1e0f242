use anyhow::Result;
use colored::*;
use std::path::PathBuf;

use buildpack::backends;
use buildpack::env_file::{self, EnvFile};

pub fn execute(directory: &str, backend_url: Option<&str>) -> Result<()> {
    let directory = PathBuf::from(shellexpand::tilde(directory).into_owned());

    let backend_url = match backend_url {
        Some(url) => url.to_string(),
        None => {
            let fallback = backends::default_backend()?;
            println!(
                "{} no --backend-url given, using sample backend '{}'",
                "⚠️".yellow(),
                fallback.name
            );
            fallback.url
        }
    };

    match env_file::write_env_file(&directory, &backend_url)? {
        EnvFile::Written(path) => {
            println!("{}", format!("✨ Wrote {}", path.display()).green())
        }
        EnvFile::AlreadyExists(path) => println!(
            "{} {} already exists, leaving it untouched",
            "⚠️".yellow(),
            path.display()
        ),
    }

    Ok(())
}
