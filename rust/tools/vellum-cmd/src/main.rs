use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod utils;

#[derive(Parser)]
#[command(name = "vellum-cmd")]
#[command(about = "Command-line utility for vellum buffers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a finished buffer and display its layout
    Inspect {
        /// Increase verbosity (-v also dumps field bytes, each -v raises the log level)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,

        /// Expected 4-character file identifier
        #[arg(long)]
        ident: Option<String>,

        /// The buffer starts with a 32-bit length prefix
        #[arg(long)]
        size_prefixed: bool,

        /// Path of the buffer file
        path: String,
    },
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            verbose,
            ident,
            size_prefixed,
            path,
        } => {
            setup_logging(verbose);
            commands::inspect::run(verbose, ident, size_prefixed, path)
        }
    }
}
