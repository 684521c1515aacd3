//! tilestitch CLI - Command-line interface
//!
//! Downloads the map tiles covering a bounding box and writes them as
//! stitched PNG mosaics.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use console::style;
use tilestitch::config::ConfigFile;
use tilestitch::logging::{init_logging, LogConfig};

use commands::config::ConfigCommands;
use commands::download::DownloadArgs;
use commands::locate::LocateArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "tilestitch")]
#[command(version = tilestitch::VERSION)]
#[command(about = "Stitch web map tiles covering a bounding box into PNG mosaics")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download a bounding box as PNG mosaics
    Download(DownloadArgs),

    /// Show the tile covering a point
    Locate(LocateArgs),

    /// View or change configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Create the configuration file
    Init,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("error:").red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Config and init must work even when the file is broken
    match cli.command {
        Commands::Config { command } => return commands::config::run(command),
        Commands::Init => return commands::init::run(),
        _ => {}
    }

    let config = ConfigFile::load()?;
    let log_config = LogConfig::new(&config.logging.directory).with_verbose(cli.verbose);
    let _guard = match init_logging(&log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("{} {}", style("warning:").yellow(), e);
            None
        }
    };

    match cli.command {
        Commands::Download(args) => commands::download::run(args, &config),
        Commands::Locate(args) => commands::locate::run(args, &config),
        Commands::Config { .. } | Commands::Init => Ok(()),
    }
}
