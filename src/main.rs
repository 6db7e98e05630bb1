use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

mod audio;
mod book;
mod cmds;
mod export;
mod import;
mod navigator;
mod session;
mod speech;
mod state;
mod util;
mod voices;

use cmds::{export::ExportArgs, read::ReadArgs};
use state::{AppState, VoiceOptions};

/// Listen to text and PDF documents, or turn them into per-page audio files.
#[derive(Debug, Parser)]
#[command(name = "audiobook", version)]
struct Cli {
    #[command(flatten)]
    voice: VoiceOptions,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Read a document aloud, page by page
    Read(ReadArgs),
    /// Save every page of a document as an audio file
    Export(ExportArgs),
    /// List the available voice models
    Voices,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logger = match util::logging::init(&util::logging::log_dir()) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to initialise logger: {err}");
            None
        }
    };
    info!("Starting audiobook");

    let state = AppState::initialise(cli.voice);
    let result = match &cli.command {
        Commands::Read(args) => cmds::read::run(&state, args),
        Commands::Export(args) => cmds::export::run(&state, args),
        Commands::Voices => cmds::voices::run(&state),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // The logger already mirrors errors to stderr.
            error!("{err:#}");
            if logger.is_none() {
                eprintln!("Error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
