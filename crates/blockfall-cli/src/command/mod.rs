use clap::{Parser, Subcommand};

use self::{play::PlayArg, top_score::TopScoreArg};

mod play;
mod top_score;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a game in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Show or reset the saved top score
    TopScore(#[clap(flatten)] TopScoreArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::TopScore(arg) => top_score::run(&arg)?,
    }
    Ok(())
}
