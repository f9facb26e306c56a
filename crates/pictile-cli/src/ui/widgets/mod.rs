use image::Rgba;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, image_preview::*, key_binding_display::*, session_display::*,
    session_stats_display::*,
};

mod board_display;
mod image_preview;
mod key_binding_display;
mod session_display;
mod session_stats_display;

mod color {
    use ratatui::style::Color;

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(64, 64, 64);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const DIM: Style = fg_bg(color::GRAY, color::BLACK);

    pub const TILE_BORDER: Style = fg_bg(color::DARK_GRAY, color::BLACK);
    pub const CURSOR_BORDER: Style = fg_bg(color::YELLOW, color::BLACK);
    pub const SELECTED_BORDER: Style =
        fg_bg(color::CYAN, color::BLACK).add_modifier(Modifier::BOLD);

    pub const INFO: Style = fg_bg(color::WHITE, color::BLACK);
    pub const WARNING: Style = fg_bg(color::YELLOW, color::BLACK);
    pub const ERROR: Style = fg_bg(color::RED, color::BLACK);

    pub const SOLVED_POPUP: Style = fg_bg(color::BLACK, color::GREEN);
}

/// Terminal color for an image pixel. Alpha is ignored.
fn pixel_color(pixel: Rgba<u8>) -> Color {
    let Rgba([r, g, b, _]) = pixel;
    Color::Rgb(r, g, b)
}

/// Fills `area` with `▀` cells, two pixels per cell: the foreground is the
/// upper pixel and the background the lower one.
///
/// `sample` receives normalized coordinates of the pixel center.
fn paint_half_blocks<F>(area: Rect, buf: &mut Buffer, sample: F)
where
    F: Fn(f32, f32) -> Rgba<u8>,
{
    let width = f32::from(area.width);
    let height = f32::from(area.height) * 2.0;
    for dy in 0..area.height {
        let v_top = (f32::from(dy) * 2.0 + 0.5) / height;
        let v_bottom = (f32::from(dy) * 2.0 + 1.5) / height;
        for dx in 0..area.width {
            let u = (f32::from(dx) + 0.5) / width;
            if let Some(cell) = buf.cell_mut((area.x + dx, area.y + dy)) {
                cell.set_symbol("▀")
                    .set_fg(pixel_color(sample(u, v_top)))
                    .set_bg(pixel_color(sample(u, v_bottom)));
            }
        }
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
