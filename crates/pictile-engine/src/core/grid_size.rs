use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::InvalidGridSizeError;

/// Number of tiles per row and per column of a puzzle board.
///
/// A board of grid size `N` holds `N²` tiles. Slots are numbered row-major,
/// so the slot at row `r`, column `c` is `r * N + c`.
///
/// # Example
///
/// ```
/// use pictile_engine::GridSize;
///
/// let size = GridSize::new(3).unwrap();
/// assert_eq!(size.tile_count(), 9);
/// assert_eq!(size.slot_at(1, 2), 5);
/// assert_eq!(size.row_col(5), (1, 2));
/// assert!(GridSize::new(1).is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
#[display("{_0}x{_0}")]
#[serde(try_from = "usize", into = "usize")]
pub struct GridSize(usize);

impl GridSize {
    pub const MIN: usize = 2;

    /// Largest accepted size. Keeps `N²` tile indices far from overflow.
    pub const MAX: usize = 1024;

    /// Grid sizes offered to the player.
    pub const PRESETS: [GridSize; 4] = [GridSize(3), GridSize(4), GridSize(5), GridSize(6)];

    pub const DEFAULT: GridSize = GridSize(4);

    pub fn new(size: usize) -> Result<Self, InvalidGridSizeError> {
        if !(Self::MIN..=Self::MAX).contains(&size) {
            return Err(InvalidGridSizeError { size });
        }
        Ok(Self(size))
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    #[must_use]
    pub const fn tile_count(self) -> usize {
        self.0 * self.0
    }

    #[must_use]
    pub const fn slot_at(self, row: usize, col: usize) -> usize {
        row * self.0 + col
    }

    #[must_use]
    pub const fn row_col(self, slot: usize) -> (usize, usize) {
        (slot / self.0, slot % self.0)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<usize> for GridSize {
    type Error = InvalidGridSizeError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<GridSize> for usize {
    fn from(size: GridSize) -> Self {
        size.0
    }
}

/// Accepts either `N` or `NxN`.
impl FromStr for GridSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let n = match s.split_once(['x', 'X']) {
            Some((rows, cols)) => {
                if rows.trim() != cols.trim() {
                    return Err(format!("grid must be square, got {s}"));
                }
                rows.trim()
            }
            None => s,
        };
        let n = n
            .parse::<usize>()
            .map_err(|e| format!("invalid grid size {s:?}: {e}"))?;
        Self::new(n).map_err(|e| e.to_string())
    }
}
