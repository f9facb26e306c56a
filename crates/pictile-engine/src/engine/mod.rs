//! Puzzle logic on top of the core data structures.
//!
//! - [`partition`] - Cuts a source image into a solved [`Board`](crate::Board)
//! - [`shuffle`] - Fisher–Yates permutation of the board's slots
//! - [`PuzzleSession`] - Game lifecycle, moves, timer and win detection
//! - [`SessionStats`] - Move count and elapsed time
//! - [`ScoreRecord`] - What a win produces for the score list
//! - [`SourceChain`] - Fallback chain of image sources
//!
//! # Game Flow
//!
//! 1. Feed a decoded image to [`PuzzleSession::set_image`] (usually the
//!    result of a [`SourceChain`])
//! 2. [`PuzzleSession::start`] partitions and shuffles the image
//! 3. The player swaps tiles with [`PuzzleSession::swap`]; a clock calls
//!    [`PuzzleSession::tick`] once per second
//! 4. The game is won when the board is back in order, either detected
//!    after a swap or on [`PuzzleSession::check`]
//! 5. The returned [`ScoreRecord`] is handed to whatever stores scores
//!
//! # Example
//!
//! ```
//! use image::RgbaImage;
//! use pictile_engine::{
//!     GridSize, PuzzleSession, SessionConfig, SlotPicker, SwapOutcome, engine::CropExtractor,
//! };
//!
//! /// Always swaps slot `i` with slot 0.
//! struct Rotate;
//!
//! impl SlotPicker for Rotate {
//!     fn pick(&mut self, _upper: usize) -> usize {
//!         0
//!     }
//! }
//!
//! let mut session = PuzzleSession::new(SessionConfig {
//!     grid_size: GridSize::new(2).unwrap(),
//!     ..SessionConfig::default()
//! });
//! session.set_image(RgbaImage::new(64, 64));
//! session.start_with(&mut CropExtractor, &mut Rotate).unwrap();
//! assert_eq!(session.board().unwrap().arrangement(), vec![1, 2, 3, 0]);
//!
//! session.swap(0, 3);
//! session.swap(1, 3);
//! if let SwapOutcome::Solved(score) = session.swap(2, 3) {
//!     println!("solved in {} moves", score.move_count);
//! }
//! assert!(session.state().is_won());
//! ```

pub use self::{
    image_source::*, partitioner::*, puzzle_session::*, score::*, session_stats::*, shuffle::*,
};

mod image_source;
mod partitioner;
mod puzzle_session;
mod score;
mod session_stats;
mod shuffle;
