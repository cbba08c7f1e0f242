use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use buildpack::backends;
use buildpack::custom_origin;
use buildpack::env_file::{self, EnvFile};
use buildpack::install;
use buildpack::scaffold::{NpmClient, ProjectDescriptor, Scaffold};

#[derive(Args, Debug)]
pub struct InitProjectArgs {
    /// Template to clone and customize (bundled: venia-starter)
    pub template: String,

    /// Directory to create and fill with the project files
    pub directory: String,

    /// Short name for the package.json "name" field (defaults to the
    /// directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Author for the package.json "author" field
    #[arg(short, long)]
    pub author: Option<String>,

    /// URL of the Magento instance to use as a backend
    #[arg(short, long)]
    pub backend_url: Option<String>,

    /// Package manager to configure the project for
    #[arg(long, value_enum, default_value_t = NpmClient::Npm)]
    pub npm_client: NpmClient,

    /// Skip creating a custom secure host and certificate
    #[arg(long)]
    pub no_custom_origin: bool,

    /// Skip installing dependencies after creating the project
    #[arg(long)]
    pub no_install: bool,
}

pub fn run(args: InitProjectArgs) -> Result<()> {
    let directory = PathBuf::from(shellexpand::tilde(&args.directory).into_owned());
    let name = args.name.clone().unwrap_or_else(|| {
        directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.directory.clone())
    });

    println!(
        "{}",
        format!("\n🛠  Creating PWA project '{name}'...").bright_cyan()
    );
    if let Some(path) = install::detect(args.npm_client) {
        println!("  ✓ {}: {}", args.npm_client, path.display());
    }

    let descriptor = ProjectDescriptor {
        name: name.clone(),
        author: args.author.clone().unwrap_or_default(),
        npm_client: args.npm_client,
    };

    Scaffold::bundled()
        .create_project(&args.template, &directory, &descriptor)
        .with_context(|| format!("failed to materialize template '{}'", args.template))?;
    println!("  ✓ Copied '{}' template", args.template);

    write_project_state(&directory, &args.template, &descriptor)?;

    let backend_url = match &args.backend_url {
        Some(url) => url.clone(),
        None => {
            let fallback = backends::default_backend()?;
            println!(
                "  {} no --backend-url given, using sample backend '{}'",
                "⚠️".yellow(),
                fallback.name
            );
            fallback.url
        }
    };
    match env_file::write_env_file(&directory, &backend_url)? {
        EnvFile::Written(path) => println!("  ✓ Wrote {}", path.display()),
        EnvFile::AlreadyExists(path) => {
            println!("  {} kept existing {}", "⚠️".yellow(), path.display())
        }
    }

    if !args.no_custom_origin {
        let origin = custom_origin::provision(&directory, &name)
            .context("failed to provision a custom secure origin")?;
        println!("  ✓ Created custom origin https://{}", origin.host);
        println!(
            "    Add '127.0.0.1 {}' to your hosts file to resolve it locally",
            origin.host
        );
    }

    if !args.no_install {
        install::run_install(args.npm_client, &directory)
            .with_context(|| format!("failed to install dependencies for '{name}'"))?;
        println!("  ✓ Installed dependencies with {}", args.npm_client);
    }

    println!(
        "\n{}",
        format!(
            "✨ Created a new PWA project '{name}' in {}",
            directory.display()
        )
        .green()
    );
    println!("\nNext steps:");
    println!("  1. cd {}", args.directory);
    if args.no_install {
        println!("  2. {} install", args.npm_client);
        println!("  3. {} run watch", args.npm_client);
    } else {
        println!("  2. {} run watch", args.npm_client);
    }

    Ok(())
}

/// Record what the project was created from, next to the other state the
/// CLI keeps in `.buildpack/`.
fn write_project_state(
    directory: &Path,
    template: &str,
    descriptor: &ProjectDescriptor,
) -> Result<()> {
    let state_dir = directory.join(".buildpack");
    fs::create_dir_all(&state_dir)
        .with_context(|| format!("failed to create {}", state_dir.display()))?;

    let state = json!({
        "name": descriptor.name,
        "author": descriptor.author,
        "npmClient": descriptor.npm_client,
        "template": template,
        "created": chrono::Utc::now().to_rfc3339(),
    });

    let path = state_dir.join("project.json");
    let mut serialized = serde_json::to_string_pretty(&state)?;
    serialized.push('\n');
    fs::write(&path, serialized).with_context(|| format!("failed to write {}", path.display()))
}
