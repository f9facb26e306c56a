use std::{path::PathBuf, sync::mpsc};

use pictile_engine::{GridSize, PuzzleSession, SessionConfig, ShuffleSeed};

use self::app::PlayApp;
use crate::{
    source::{self, SourceSpec},
    store::{DEFAULT_SCORES_FILE, ScoreStore},
    tui::Tui,
};

mod app;

pub(crate) const DEFAULT_LOG_FILE: &str = "./data/pictile.log";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Tiles per side; 3 to 6 can also be picked in game
    #[clap(long, default_value_t = GridSize::DEFAULT)]
    grid_size: GridSize,
    /// Local image to play with; remote sources are only tried if it fails
    #[clap(long)]
    image: Option<PathBuf>,
    /// Image file or http(s) URL to try, in order (replaces the built-in URLs)
    #[clap(long = "source", value_name = "PATH_OR_URL")]
    sources: Vec<SourceSpec>,
    /// 32-digit hex seed for the first shuffle
    #[clap(long)]
    seed: Option<ShuffleSeed>,
    /// Only check for a solution when asked (`d` key)
    #[clap(long)]
    manual_check: bool,
    /// File the scores of solved puzzles are appended to
    #[clap(long, default_value = DEFAULT_SCORES_FILE)]
    scores_file: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            grid_size: GridSize::DEFAULT,
            image: None,
            sources: vec![],
            seed: None,
            manual_check: false,
            scores_file: PathBuf::from(DEFAULT_SCORES_FILE),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        grid_size,
        image,
        sources,
        seed,
        manual_check,
        scores_file,
    } = arg;

    let session = PuzzleSession::new(SessionConfig {
        grid_size: *grid_size,
        auto_check: !manual_check,
        seed: *seed,
    });
    let store = ScoreStore::new(scores_file.clone());
    let specs = SourceSpec::chain_order(image.clone(), sources);
    tracing::info!(
        grid_size = %grid_size,
        sources = specs.len(),
        auto_check = !manual_check,
        "starting play session"
    );

    let (tx, rx) = mpsc::channel();
    source::spawn_loader(specs.clone(), tx.clone());

    let mut app = PlayApp::new(session, store, specs, tx);
    Tui::new(rx).run(&mut app)?;

    tracing::info!(wins = app.wins(), "play session ended");
    Ok(())
}
