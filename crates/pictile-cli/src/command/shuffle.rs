use pictile_engine::{Board, GridSize, ShuffleRng, ShuffleSeed, shuffle};
use serde::Serialize;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ShuffleArg {
    /// Tiles per side
    #[clap(long, default_value_t = GridSize::DEFAULT)]
    grid_size: GridSize,
    /// 32-digit hex seed (random if omitted)
    #[clap(long)]
    seed: Option<ShuffleSeed>,
}

/// A shuffled board as printed by `shuffle`.
///
/// `arrangement[slot]` is the 0-based original index of the tile in `slot`.
#[derive(Debug, Serialize)]
struct ShuffledBoard {
    grid_size: GridSize,
    seed: ShuffleSeed,
    arrangement: Vec<usize>,
    rows: Vec<Vec<usize>>,
    misplaced: usize,
}

pub(crate) fn run(arg: &ShuffleArg) -> anyhow::Result<()> {
    let ShuffleArg { grid_size, seed } = arg;

    let mut rng = seed.map_or_else(ShuffleRng::new, ShuffleRng::with_seed);
    let mut board = Board::numbered(*grid_size);
    shuffle(&mut board, &mut rng);

    let shuffled = ShuffledBoard {
        grid_size: *grid_size,
        seed: rng.seed(),
        arrangement: board.arrangement(),
        rows: board
            .rows()
            .map(|row| row.iter().map(pictile_engine::Tile::original_index).collect())
            .collect(),
        misplaced: board.misplaced_count(),
    };
    Output::stdout().write_json(&shuffled)
}
