use std::sync::Arc;

use chrono::Utc;
use image::RgbaImage;

use crate::{
    PartitionError,
    core::{Board, GridSize},
    engine::{
        partitioner::{CropExtractor, TileExtractor, partition_with},
        score::ScoreRecord,
        session_stats::SessionStats,
        shuffle::{ShuffleRng, ShuffleSeed, SlotPicker, shuffle},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum SessionState {
    /// No puzzle on the table.
    Idle,
    /// Puzzle shuffled, clock running, swaps accepted.
    Running,
    /// Puzzle solved; counters frozen until reset.
    Won,
}

/// Settings fixed for the lifetime of a [`PuzzleSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub grid_size: GridSize,
    /// Check for a solution after every swap. When off, only [`PuzzleSession::check`]
    /// can win the game.
    pub auto_check: bool,
    /// Seed for the first game's shuffle. Later games use fresh random seeds.
    pub seed: Option<ShuffleSeed>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::DEFAULT,
            auto_check: true,
            seed: None,
        }
    }
}

/// Result of [`PuzzleSession::swap`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SwapOutcome {
    /// No game is running; nothing changed.
    NotRunning,
    /// Both slots are the same; nothing changed and no move was counted.
    SameTile,
    /// The tiles were exchanged and one move was counted.
    Moved,
    /// The swap completed the picture.
    Solved(ScoreRecord),
}

/// Result of an explicit [`PuzzleSession::check`] request.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum CheckOutcome {
    NotRunning,
    NotSolved { misplaced: usize },
    Solved(ScoreRecord),
}

/// One player's game: lifecycle, board and counters.
///
/// All mutation goes through `&mut self`, one trigger at a time (image
/// ready, swap, timer tick, check, reset), so every method observes a
/// complete board.
///
/// ```text
/// Idle ──start──→ Running ──solved──→ Won
///   ↑               │                  │
///   └────reset──────┴──────reset───────┘
/// ```
///
/// # Example
///
/// ```
/// use image::RgbaImage;
/// use pictile_engine::{PuzzleSession, SessionConfig, SessionState};
///
/// let mut session = PuzzleSession::new(SessionConfig::default());
/// assert!(session.start().is_err()); // no image yet
///
/// session.set_image(RgbaImage::new(400, 300));
/// session.start().unwrap();
/// assert_eq!(session.state(), SessionState::Running);
/// assert_eq!(session.board().unwrap().tile_count(), 16);
///
/// session.tick();
/// assert_eq!(session.stats().elapsed().as_secs(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    config: SessionConfig,
    state: SessionState,
    image: Option<Arc<RgbaImage>>,
    board: Option<Board>,
    stats: SessionStats,
    pending_seed: Option<ShuffleSeed>,
    seed: Option<ShuffleSeed>,
    last_score: Option<ScoreRecord>,
}

impl PuzzleSession {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            image: None,
            board: None,
            stats: SessionStats::new(),
            pending_seed: config.seed,
            seed: None,
            last_score: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        self.config.grid_size
    }

    #[must_use]
    pub fn auto_check(&self) -> bool {
        self.config.auto_check
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Board of the current game. `None` while idle.
    #[must_use]
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    #[must_use]
    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_deref()
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Seed the current game was shuffled with, if it came from [`start`](Self::start).
    #[must_use]
    pub fn seed(&self) -> Option<ShuffleSeed> {
        self.seed
    }

    /// Score of the most recent win, if the session is in `Won`.
    #[must_use]
    pub fn last_score(&self) -> Option<&ScoreRecord> {
        self.last_score.as_ref()
    }

    /// Stores a freshly loaded source image.
    ///
    /// A game already in progress keeps its tiles; the image is used from
    /// the next start on.
    pub fn set_image(&mut self, image: RgbaImage) {
        self.image = Some(Arc::new(image));
    }

    /// Starts a new game with a random (or configured) shuffle.
    pub fn start(&mut self) -> Result<(), PartitionError> {
        let mut rng = self
            .pending_seed
            .map_or_else(ShuffleRng::new, ShuffleRng::with_seed);
        self.start_with(&mut CropExtractor, &mut rng)?;
        self.pending_seed = None;
        self.seed = Some(rng.seed());
        tracing::debug!(seed = %rng.seed(), "shuffle seed");
        Ok(())
    }

    /// Starts a new game with explicit tile extraction and shuffle sources.
    ///
    /// Partitioning happens before anything is changed: on error the
    /// session, including a game in progress, is left exactly as it was.
    /// On success any previous game is replaced.
    pub fn start_with<E, P>(
        &mut self,
        extractor: &mut E,
        picker: &mut P,
    ) -> Result<(), PartitionError>
    where
        E: TileExtractor + ?Sized,
        P: SlotPicker + ?Sized,
    {
        let image = self.image.as_ref().ok_or(PartitionError::ImageNotReady)?;
        let mut board = partition_with(image, self.config.grid_size, extractor)?;
        shuffle(&mut board, picker);

        if self.state.is_running() {
            tracing::info!(moves = self.stats.move_count(), "game restarted");
        }
        self.board = Some(board);
        self.stats = SessionStats::new();
        self.seed = None;
        self.last_score = None;
        self.state = SessionState::Running;
        tracing::info!(grid_size = %self.config.grid_size, "game started");
        Ok(())
    }

    /// Exchanges the tiles in two slots and counts the move.
    ///
    /// A self-swap changes nothing and is not counted. With auto-check on,
    /// a swap that completes the picture wins the game.
    ///
    /// # Panics
    ///
    /// Panics if a slot is outside the board.
    pub fn swap(&mut self, a: usize, b: usize) -> SwapOutcome {
        let Some(board) = self.board.as_mut().filter(|_| self.state.is_running()) else {
            return SwapOutcome::NotRunning;
        };
        if !board.swap_slots(a, b) {
            return SwapOutcome::SameTile;
        }
        self.stats.record_move();
        tracing::trace!(a, b, moves = self.stats.move_count(), "tiles swapped");

        if self.config.auto_check && board.is_solved() {
            return SwapOutcome::Solved(self.win());
        }
        SwapOutcome::Moved
    }

    /// Explicit "I'm done" request from the player.
    pub fn check(&mut self) -> CheckOutcome {
        let Some(board) = self.board.as_ref().filter(|_| self.state.is_running()) else {
            return CheckOutcome::NotRunning;
        };
        if board.is_solved() {
            CheckOutcome::Solved(self.win())
        } else {
            CheckOutcome::NotSolved {
                misplaced: board.misplaced_count(),
            }
        }
    }

    /// Advances the clock by one second. Ignored unless a game is running.
    pub fn tick(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.stats.record_second();
        true
    }

    /// Drops the board and counters and returns to `Idle`.
    ///
    /// The loaded image is kept so a new game can start right away.
    pub fn reset(&mut self) {
        if self.state.is_running() {
            tracing::info!(
                moves = self.stats.move_count(),
                elapsed = %self.stats.elapsed(),
                "game abandoned"
            );
        }
        self.state = SessionState::Idle;
        self.board = None;
        self.stats = SessionStats::new();
        self.last_score = None;
        self.seed = None;
    }

    /// Changes the grid size.
    ///
    /// A running game is reset and a new one is started at the new size;
    /// otherwise the size applies to the next start. If the new game cannot
    /// be built, the session is left idle at the new size.
    pub fn set_grid_size(&mut self, grid_size: GridSize) -> Result<(), PartitionError> {
        if grid_size == self.config.grid_size {
            return Ok(());
        }
        self.config.grid_size = grid_size;
        if !self.state.is_running() {
            return Ok(());
        }
        self.reset();
        self.start()
    }

    fn win(&mut self) -> ScoreRecord {
        let record = ScoreRecord {
            grid_size: self.config.grid_size,
            move_count: self.stats.move_count(),
            elapsed: self.stats.elapsed(),
            recorded_at: Utc::now(),
        };
        self.state = SessionState::Won;
        self.last_score = Some(record.clone());
        tracing::info!(
            grid_size = %record.grid_size,
            moves = record.move_count,
            elapsed = %record.elapsed,
            "puzzle solved"
        );
        record
    }
}
