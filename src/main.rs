use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "buildpack", author, version = env!("CARGO_PKG_VERSION"), about = "Create and configure Magento PWA storefront projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a PWA project in <DIRECTORY> based on <TEMPLATE>
    InitProject {
        #[command(flatten)]
        args: commands::init_project::InitProjectArgs,
    },

    /// Write a .env file for an existing project
    CreateEnvFile {
        /// Project root directory
        directory: String,

        /// URL of the Magento instance to use as a backend
        #[arg(short, long)]
        backend_url: Option<String>,
    },

    /// Create a custom secure host and certificate for an existing project
    InitCustomOrigin {
        /// Project root directory
        directory: String,

        /// Hostname base (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::InitProject { args } => {
            commands::init_project::run(args)?;
        }
        Commands::CreateEnvFile {
            directory,
            backend_url,
        } => {
            commands::create_env_file::execute(&directory, backend_url.as_deref())?;
        }
        Commands::InitCustomOrigin { directory, name } => {
            commands::init_custom_origin::execute(&directory, name.as_deref())?;
        }
    }

    Ok(())
}
