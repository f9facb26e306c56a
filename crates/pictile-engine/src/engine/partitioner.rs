use image::{RgbaImage, imageops};

use crate::{
    PartitionError, TileRenderError,
    core::{Board, GridSize, Tile, TileImage},
};

/// Square region of the source image covered by one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRegion {
    /// Row-major index of the tile, which is also its original slot.
    pub index: usize,
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

/// Cuts the content of a single tile out of the source image.
pub trait TileExtractor {
    fn extract(
        &mut self,
        image: &RgbaImage,
        region: TileRegion,
    ) -> Result<RgbaImage, TileRenderError>;
}

/// Extracts tiles by copying the region's pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct CropExtractor;

impl TileExtractor for CropExtractor {
    fn extract(
        &mut self,
        image: &RgbaImage,
        region: TileRegion,
    ) -> Result<RgbaImage, TileRenderError> {
        let (width, height) = image.dimensions();
        let fits = region.x.checked_add(region.size).is_some_and(|r| r <= width)
            && region.y.checked_add(region.size).is_some_and(|b| b <= height);
        if !fits {
            return Err(TileRenderError {
                index: region.index,
                reason: format!(
                    "region {}x{}+{}+{} exceeds image bounds {width}x{height}",
                    region.size, region.size, region.x, region.y
                ),
            });
        }
        Ok(imageops::crop_imm(image, region.x, region.y, region.size, region.size).to_image())
    }
}

/// Edge length in pixels of each tile when `image` is cut into `grid_size`.
///
/// Tiles are square, so the shorter image side decides. Pixels right of or
/// below the covered square are not part of any tile.
pub fn tile_edge(image: &RgbaImage, grid_size: GridSize) -> Result<u32, PartitionError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PartitionError::ImageNotReady);
    }
    let n = u32::try_from(grid_size.get()).unwrap_or(u32::MAX);
    let edge = width.min(height) / n;
    if edge == 0 {
        return Err(PartitionError::ImageTooSmall {
            width,
            height,
            grid_size,
        });
    }
    Ok(edge)
}

/// Regions of all tiles in row-major order, starting at the top-left corner.
pub fn tile_regions(
    image: &RgbaImage,
    grid_size: GridSize,
) -> Result<Vec<TileRegion>, PartitionError> {
    let edge = tile_edge(image, grid_size)?;
    let n = u32::try_from(grid_size.get()).unwrap_or(u32::MAX);
    let regions = (0..n)
        .flat_map(|row| (0..n).map(move |col| (row, col)))
        .enumerate()
        .map(|(index, (row, col))| TileRegion {
            index,
            x: col * edge,
            y: row * edge,
            size: edge,
        })
        .collect();
    Ok(regions)
}

/// Cuts `image` into a solved board of `grid_size` tiles.
///
/// See [`partition_with`].
pub fn partition(image: &RgbaImage, grid_size: GridSize) -> Result<Board, PartitionError> {
    partition_with(image, grid_size, &mut CropExtractor)
}

/// Cuts `image` into a solved board using a custom tile extractor.
///
/// Either a complete board is returned or nothing is. A tile the extractor
/// fails on becomes a numbered placeholder, and the failure is only logged.
pub fn partition_with<E>(
    image: &RgbaImage,
    grid_size: GridSize,
    extractor: &mut E,
) -> Result<Board, PartitionError>
where
    E: TileExtractor + ?Sized,
{
    let regions = tile_regions(image, grid_size)?;
    let mut fallbacks = 0;
    let tiles = regions
        .into_iter()
        .map(|region| {
            let content = match extractor.extract(image, region) {
                Ok(raster) => TileImage::Raster(raster),
                Err(error) => {
                    tracing::warn!(%error, "using placeholder tile");
                    fallbacks += 1;
                    TileImage::placeholder(region.index)
                }
            };
            Tile::new(region.index, content)
        })
        .collect();

    tracing::debug!(
        %grid_size,
        width = image.width(),
        height = image.height(),
        fallbacks,
        "image partitioned"
    );
    Ok(Board::from_tiles(grid_size, tiles))
}
