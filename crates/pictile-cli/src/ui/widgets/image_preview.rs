use image::RgbaImage;
use pictile_engine::PLACEHOLDER_COLOR;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

/// The part of the source image the puzzle is cut from (the top-left
/// square), shown before a game starts.
#[derive(Debug)]
pub struct ImagePreview<'a> {
    image: &'a RgbaImage,
    block: Option<BlockWidget<'a>>,
}

impl<'a> ImagePreview<'a> {
    pub fn new(image: &'a RgbaImage) -> Self {
        Self { image, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }
}

impl Widget for ImagePreview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let rows = area.height.min(area.width / 2);
        let area = area.centered(Constraint::Length(rows * 2), Constraint::Length(rows));

        let side = self.image.width().min(self.image.height());
        if side == 0 {
            return;
        }
        super::paint_half_blocks(area, buf, |u, v| {
            let x = scale(u, side);
            let y = scale(v, side);
            self.image
                .get_pixel_checked(x, y)
                .copied()
                .unwrap_or(PLACEHOLDER_COLOR)
        });
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn scale(t: f32, side: u32) -> u32 {
    ((t * side as f32) as u32).min(side - 1)
}
