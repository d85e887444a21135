use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use curlfetch::commands;
use curlfetch::commands::get::GetOptions;

/// Exit status used when the user interrupts a transfer (128 + SIGINT).
const EXIT_INTERRUPTED: i32 = 130;

#[derive(Parser)]
#[clap(name = "curlfetch")]
#[clap(about = "Download a single file through curl with live progress")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Show debug logging
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download SOURCE to DESTINATION
    Get {
        /// URL or path understood by curl
        source: String,
        /// File to write
        destination: PathBuf,
        /// Do not show the progress line
        #[clap(long)]
        no_progress: bool,
        /// Transfer tool to run instead of the configured one
        #[clap(long)]
        curl: Option<String>,
        /// Do not follow redirects
        #[clap(long)]
        no_location: bool,
        /// Extra arguments passed to curl (after `--`)
        #[clap(last = true)]
        extra: Vec<String>,
    },
    /// Check that the transfer tool is available
    Doctor,
    /// Show or edit the configuration
    Config {
        #[clap(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the current configuration
    Show,
    /// Set the transfer tool used for downloads
    SetCurl {
        /// Program name or path
        path: String,
    },
    /// Restore the default configuration
    Reset,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Get {
            source,
            destination,
            no_progress,
            curl,
            no_location,
            extra,
        } => {
            let options = GetOptions {
                curl_path: curl,
                no_progress,
                no_location,
                extra_args: extra,
            };
            commands::get::fetch(&source, &destination, &options).await
        }
        Commands::Doctor => commands::doctor::check_environment(),
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show_config(),
            ConfigCommands::SetCurl { path } => commands::config::set_curl_path(&path),
            ConfigCommands::Reset => commands::config::reset_config(),
        },
    };

    if let Err(e) = result {
        if e.is_interrupted() {
            eprintln!("Interrupted");
            std::process::exit(EXIT_INTERRUPTED);
        }
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
