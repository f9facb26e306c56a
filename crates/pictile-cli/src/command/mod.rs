use std::path::PathBuf;

use clap::{Parser, Subcommand};

use self::{play::PlayArg, scores::ScoresArg, shuffle::ShuffleArg};
use crate::logging;

mod play;
mod scores;
mod shuffle;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Image sliding-tile puzzle", long_about = None)]
pub struct CommandArgs {
    /// Write logs to this file instead of stderr (`play` always logs to a file)
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play the puzzle in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Show saved scores, best first
    Scores(#[clap(flatten)] ScoresArg),
    /// Print a shuffled arrangement without playing it
    Shuffle(#[clap(flatten)] ShuffleArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let mode = args.mode.unwrap_or(Mode::Play(PlayArg::default()));

    let log_file = match (&mode, args.log_file) {
        (_, Some(path)) => Some(path),
        (Mode::Play(_), None) => Some(PathBuf::from(play::DEFAULT_LOG_FILE)),
        (_, None) => None,
    };
    logging::init(log_file.as_deref())?;

    match mode {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Scores(arg) => scores::run(&arg)?,
        Mode::Shuffle(arg) => shuffle::run(&arg)?,
    }
    Ok(())
}
