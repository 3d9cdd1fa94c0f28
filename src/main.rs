use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use sweep::commands::{completions, scan};
use sweep::config::CliOverrides;

#[derive(Parser)]
#[command(name = "sweep")]
#[command(about = "Find and prune stale branches across a Bitbucket workspace", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report stale branches in every repository of the workspace
    ///
    /// Reads BITBUCKET_TOKEN and BITBUCKET_WORKSPACE from the environment.
    Scan {
        /// Delete stale branches that are not protected
        #[arg(long)]
        delete: bool,

        /// Days without commits after which a branch is stale (default: 90)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        threshold_days: Option<u32>,

        /// Extra branch name to protect from deletion (repeatable)
        #[arg(short, long = "protect", value_name = "BRANCH")]
        protect: Vec<String>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    sweep::logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            delete,
            threshold_days,
            protect,
            config,
        } => scan::execute(
            config,
            CliOverrides {
                threshold_days,
                delete,
                protect,
            },
        ),
        Commands::Completions { shell } => {
            completions::execute(&mut Cli::command(), shell);
            Ok(())
        }
    }
}
