//! avs - Android device build specification compiler.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use avs::commands;
use avs::config::Config;

#[derive(Parser)]
#[command(name = "avs")]
#[command(about = "Android device build specification compiler")]
#[command(
    after_help = "QUICK START:\n  avs init acme widget   Scaffold acme/widget\n  avs validate acme/widget\n  avs update acme/widget Regenerate after editing config.json\n  avs clean acme/widget  Remove generated files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a device directory <vendor>/<device>
    #[command(alias = "i")]
    Init {
        vendor: String,
        device: String,
        /// Start from this spec instead of the bundled profile
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a device directory (writes nothing)
    #[command(alias = "v")]
    Validate {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Validate, then regenerate a device directory
    #[command(alias = "u")]
    Update {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Remove the files generated in a device directory
    #[command(alias = "c")]
    Clean {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
    /// Show the files tracked for a device directory
    State {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    // Load .env if present
    dotenvy::dotenv().ok();
    let config = Config::load(&cwd);

    match cli.command {
        Commands::Init {
            vendor,
            device,
            config: template,
        } => {
            commands::cmd_init(&cwd, &vendor, &device, template.as_deref())?;
        }

        Commands::Validate { dir } => {
            commands::cmd_validate(&dir, &config)?;
        }

        Commands::Update { dir } => {
            commands::cmd_update(&dir, &config)?;
        }

        Commands::Clean { dir } => {
            commands::cmd_clean(&dir)?;
        }

        Commands::Show { what } => match what {
            ShowTarget::Config => {
                commands::cmd_show(&cwd, commands::show::ShowTarget::Config, &config)?;
            }
            ShowTarget::State { dir } => {
                commands::cmd_show(&dir, commands::show::ShowTarget::State, &config)?;
            }
        },
    }

    Ok(())
}
