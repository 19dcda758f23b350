use std::path::PathBuf;

use crate::top_score::{DEFAULT_TOP_SCORE_FILE, TopScoreStore};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TopScoreArg {
    /// File the top score is kept in
    #[clap(long, default_value = DEFAULT_TOP_SCORE_FILE)]
    top_score_file: PathBuf,
    /// Delete the saved top score
    #[clap(long)]
    reset: bool,
}

pub(crate) fn run(arg: &TopScoreArg) -> anyhow::Result<()> {
    let TopScoreArg {
        top_score_file,
        reset,
    } = arg;

    let store = TopScoreStore::new(top_score_file);
    if *reset {
        if store.clear()? {
            println!("Top score reset ({})", store.path().display());
        } else {
            println!("No top score saved at {}", store.path().display());
        }
        return Ok(());
    }

    match store.load()? {
        Some(record) => println!(
            "Top score: {} (recorded {})",
            record.top_score,
            record.recorded_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => println!("No top score saved at {}", store.path().display()),
    }
    Ok(())
}
