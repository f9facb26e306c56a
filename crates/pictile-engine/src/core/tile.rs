use image::{Rgba, RgbaImage};

/// Fill color of placeholder tiles (`#3498db`).
pub const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([0x34, 0x98, 0xdb, 0xff]);

/// Visual content of a tile.
///
/// Tiles normally carry the square sub-image cut out of the source image.
/// When extraction fails, the tile is drawn as a solid color with its
/// 1-based number instead.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum TileImage {
    Raster(RgbaImage),
    Placeholder { label: usize, color: Rgba<u8> },
}

impl TileImage {
    /// Placeholder for the tile whose correct slot is `original_index`.
    #[must_use]
    pub fn placeholder(original_index: usize) -> Self {
        Self::Placeholder {
            label: original_index + 1,
            color: PLACEHOLDER_COLOR,
        }
    }

    /// Text drawn on top of the tile, if any.
    #[must_use]
    pub fn label(&self) -> Option<usize> {
        match self {
            Self::Raster(_) => None,
            Self::Placeholder { label, .. } => Some(*label),
        }
    }

    /// Samples the tile at normalized coordinates `u`, `v` in `[0, 1)`.
    ///
    /// Coordinates outside the range are clamped to the tile edge.
    #[must_use]
    pub fn sample(&self, u: f32, v: f32) -> Rgba<u8> {
        match self {
            Self::Placeholder { color, .. } => *color,
            Self::Raster(image) => {
                let (width, height) = image.dimensions();
                if width == 0 || height == 0 {
                    return PLACEHOLDER_COLOR;
                }
                let x = scale_coord(u, width);
                let y = scale_coord(v, height);
                *image.get_pixel(x, y)
            }
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn scale_coord(t: f32, len: u32) -> u32 {
    let scaled = (t.clamp(0.0, 1.0) * len as f32) as u32;
    scaled.min(len - 1)
}

/// One square piece of the puzzle.
///
/// `original_index` is the slot the tile belongs in and never changes.
/// `current_index` is the slot it occupies right now; only the board
/// updates it, when tiles are shuffled or swapped.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    original_index: usize,
    current_index: usize,
    image: TileImage,
}

impl Tile {
    pub(crate) fn new(original_index: usize, image: TileImage) -> Self {
        Self {
            original_index,
            current_index: original_index,
            image,
        }
    }

    #[must_use]
    pub fn original_index(&self) -> usize {
        self.original_index
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub(crate) fn set_current_index(&mut self, slot: usize) {
        self.current_index = slot;
    }

    #[must_use]
    pub fn image(&self) -> &TileImage {
        &self.image
    }

    #[must_use]
    pub fn is_in_place(&self) -> bool {
        self.original_index == self.current_index
    }
}
