use std::path::PathBuf;

use blockfall_engine::{GameSession, GameState, PieceSeed, Playfield};

use crate::{
    command::play::app::PlayApp,
    top_score::{DEFAULT_TOP_SCORE_FILE, TopScoreRecord, TopScoreStore},
    tui::Tui,
};

mod app;
mod input;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence, as 32 hex digits (random if omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// File the top score is kept in
    #[clap(long, default_value = DEFAULT_TOP_SCORE_FILE)]
    top_score_file: PathBuf,
    /// Hide the landing preview
    #[clap(long)]
    no_ghost: bool,
    /// Do not write a new top score back to the file
    #[clap(long)]
    no_save: bool,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            top_score_file: PathBuf::from(DEFAULT_TOP_SCORE_FILE),
            no_ghost: false,
            no_save: false,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        top_score_file,
        no_ghost,
        no_save,
    } = arg;

    let store = TopScoreStore::new(top_score_file);
    let saved_top_score = store.load_score()?;
    let state = match seed {
        Some(seed) => GameState::with_playfield(*seed, Playfield::EMPTY, saved_top_score),
        None => GameState::with_top_score(saved_top_score),
    };

    let mut app = PlayApp::new(GameSession::with_state(state), !*no_ghost);
    Tui::new().run(&mut app)?;

    let top_score = app.session().state().top_score();
    if top_score > saved_top_score {
        if *no_save {
            println!("New top score: {top_score} (not saved)");
        } else {
            store.save(&TopScoreRecord::now(top_score))?;
            println!("New top score: {top_score}");
        }
    }
    Ok(())
}
