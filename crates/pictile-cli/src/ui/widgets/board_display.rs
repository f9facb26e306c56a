use std::iter;

use pictile_engine::{Board, PLACEHOLDER_COLOR, Tile};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block as BlockWidget, BlockExt, BorderType, Widget},
};

use crate::ui::widgets::{color, style};

/// The puzzle grid, each tile drawn in its own frame.
///
/// The frame of the tile under the cursor and of the selected tile are
/// highlighted.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    cursor: Option<usize>,
    selected: Option<usize>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            cursor: None,
            selected: None,
            block: None,
        }
    }

    pub fn cursor(self, slot: usize) -> Self {
        Self {
            cursor: Some(slot),
            ..self
        }
    }

    pub fn selected(self, slot: Option<usize>) -> Self {
        Self {
            selected: slot,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    /// Picture rows per tile that fit in `area` (tiles are twice as wide).
    fn tile_rows(&self, area: Rect) -> u16 {
        let n = u16::try_from(self.board.grid_size().get()).unwrap_or(u16::MAX);
        let by_height = (area.height / n).saturating_sub(2);
        let by_width = (area.width / n).saturating_sub(2) / 2;
        by_height.min(by_width)
    }

    fn tile_frame(&self, slot: usize) -> BlockWidget<'static> {
        let frame = BlockWidget::bordered();
        match (self.selected == Some(slot), self.cursor == Some(slot)) {
            (true, true) => frame
                .border_type(BorderType::Thick)
                .border_style(style::SELECTED_BORDER),
            (true, false) => frame
                .border_type(BorderType::Double)
                .border_style(style::SELECTED_BORDER),
            (false, true) => frame
                .border_type(BorderType::Thick)
                .border_style(style::CURSOR_BORDER),
            (false, false) => frame.border_style(style::TILE_BORDER),
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let rows = self.tile_rows(area);
        if rows == 0 {
            Line::styled("terminal too small", style::DIM)
                .centered()
                .render(area.centered_vertically(Constraint::Length(1)), buf);
            return;
        }

        let n = self.board.grid_size().get();
        let horizontal = Layout::horizontal(iter::repeat_n(Constraint::Length(rows * 2 + 2), n))
            .flex(Flex::Center);
        let vertical =
            Layout::vertical(iter::repeat_n(Constraint::Length(rows + 2), n)).flex(Flex::Center);

        let grid_cells = vertical
            .split(area)
            .iter()
            .flat_map(|row| horizontal.split(*row).to_vec())
            .collect::<Vec<_>>();

        for (slot, (cell, tile)) in iter::zip(grid_cells, self.board.tiles()).enumerate() {
            let frame = self.tile_frame(slot);
            let inner = frame.inner(cell);
            frame.render(cell, buf);
            render_tile(tile, inner, buf);
        }
    }
}

fn render_tile(tile: &Tile, area: Rect, buf: &mut Buffer) {
    let image = tile.image();
    super::paint_half_blocks(area, buf, |u, v| image.sample(u, v));
    if let Some(label) = image.label() {
        let label_style = Style::new()
            .fg(color::WHITE)
            .bg(super::pixel_color(PLACEHOLDER_COLOR));
        Line::styled(label.to_string(), label_style)
            .centered()
            .render(area.centered_vertically(Constraint::Length(1)), buf);
    }
}

#[cfg(test)]
mod tests {
    use pictile_engine::GridSize;

    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_placeholder_labels_are_drawn() {
        let board = Board::numbered(GridSize::new(2).unwrap());
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        BoardDisplay::new(&board).render(area, &mut buf);

        let text = buffer_text(&buf);
        for label in ["1", "2", "3", "4"] {
            assert!(text.contains(label), "missing label {label}");
        }
    }

    #[test]
    fn test_cursor_frame_uses_thick_border() {
        let board = Board::numbered(GridSize::new(2).unwrap());
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        BoardDisplay::new(&board).cursor(0).render(area, &mut buf);

        assert!(buffer_text(&buf).contains('┏'));
    }

    #[test]
    fn test_tiny_area_shows_message() {
        let board = Board::numbered(GridSize::new(6).unwrap());
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);
        BoardDisplay::new(&board).render(area, &mut buf);

        assert!(buffer_text(&buf).contains("too small"));
    }
}
