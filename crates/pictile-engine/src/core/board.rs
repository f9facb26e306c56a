use std::fmt;

use super::{
    grid_size::GridSize,
    tile::{Tile, TileImage},
};

/// The tiles of one puzzle, stored in slot order.
///
/// `tiles()[p]` is always the tile occupying slot `p`, and its
/// `current_index()` is always `p`. Together with the fact that tiles are
/// only ever moved by exchanging two slots, this keeps the current indices
/// a permutation of `0..N²` at all times.
///
/// # Example
///
/// ```
/// use pictile_engine::{Board, GridSize};
///
/// let mut board = Board::numbered(GridSize::new(2).unwrap());
/// assert!(board.is_solved());
///
/// assert!(board.swap_slots(0, 3));
/// assert_eq!(board.arrangement(), vec![3, 1, 2, 0]);
/// assert!(!board.is_solved());
/// ```
#[derive(Clone, PartialEq)]
pub struct Board {
    grid_size: GridSize,
    tiles: Vec<Tile>,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("grid_size", &self.grid_size)
            .field("arrangement", &self.arrangement())
            .finish()
    }
}

impl Board {
    /// Builds a solved board from tiles given in original order.
    pub(crate) fn from_tiles(grid_size: GridSize, tiles: Vec<Tile>) -> Self {
        assert_eq!(tiles.len(), grid_size.tile_count());
        for (slot, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.original_index(), slot);
            assert_eq!(tile.current_index(), slot);
        }
        Self { grid_size, tiles }
    }

    /// Solved board made only of numbered placeholder tiles.
    ///
    /// Useful when no image is involved, e.g. for previewing a shuffle.
    #[must_use]
    pub fn numbered(grid_size: GridSize) -> Self {
        let tiles = (0..grid_size.tile_count())
            .map(|index| Tile::new(index, TileImage::placeholder(index)))
            .collect();
        Self::from_tiles(grid_size, tiles)
    }

    #[must_use]
    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Tiles in slot order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Returns the tile occupying `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is outside the board.
    #[must_use]
    pub fn tile_at(&self, slot: usize) -> &Tile {
        &self.tiles[slot]
    }

    /// Returns the slot currently holding the tile whose home is `original_index`.
    #[must_use]
    pub fn slot_of(&self, original_index: usize) -> Option<usize> {
        self.tiles
            .iter()
            .position(|tile| tile.original_index() == original_index)
    }

    /// Iterates over the board one row of tiles at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.grid_size.get())
    }

    /// Original index of the tile in each slot.
    #[must_use]
    pub fn arrangement(&self) -> Vec<usize> {
        self.tiles.iter().map(Tile::original_index).collect()
    }

    /// Exchanges the tiles in slots `a` and `b`.
    ///
    /// Returns `false` without touching the board when `a == b`.
    ///
    /// # Panics
    ///
    /// Panics if either slot is outside the board.
    pub fn swap_slots(&mut self, a: usize, b: usize) -> bool {
        let len = self.tiles.len();
        assert!(a < len, "slot {a} is outside a board of {len} tiles");
        assert!(b < len, "slot {b} is outside a board of {len} tiles");
        if a == b {
            return false;
        }
        self.tiles.swap(a, b);
        self.tiles[a].set_current_index(a);
        self.tiles[b].set_current_index(b);
        true
    }

    /// Returns `true` if every slot holds the tile that belongs there.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.tiles.iter().all(Tile::is_in_place)
    }

    #[must_use]
    pub fn misplaced_count(&self) -> usize {
        self.tiles.iter().filter(|tile| !tile.is_in_place()).count()
    }
}
