pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "grid size must be between {} and {}, got {size}",
    GridSize::MIN,
    GridSize::MAX
)]
pub struct InvalidGridSizeError {
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PartitionError {
    #[display("source image is not loaded yet")]
    ImageNotReady,
    #[display("image {width}x{height} is too small for a {grid_size} grid")]
    ImageTooSmall {
        width: u32,
        height: u32,
        grid_size: GridSize,
    },
}

/// Per-tile content extraction failure.
///
/// Never fails a partition: the affected tile is replaced by a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("failed to render tile {index}: {reason}")]
pub struct TileRenderError {
    pub index: usize,
    pub reason: String,
}

/// Failure of a single image source in a fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{source_name}: {reason}")]
pub struct SourceError {
    pub source_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("all {attempts} image sources failed to load")]
pub struct AllSourcesExhaustedError {
    pub attempts: usize,
}
