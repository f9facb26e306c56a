use std::iter;

use pictile_engine::PuzzleSession;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

pub struct SessionStatsDisplay<'a> {
    session: &'a PuzzleSession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(session: &'a PuzzleSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&PuzzleSession) -> String),
    LabelValue(&'static str, &'static dyn Fn(&PuzzleSession) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("MOVES:"),
    Row::FullValue(&|session| session.stats().move_count().to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|session| session.stats().elapsed().to_string()),
    Row::Empty,
    Row::LabelValue("STATE:", &|session| session.state().to_string().to_uppercase()),
    Row::LabelValue("GRID:", &|session| session.grid_size().to_string()),
    Row::LabelValue("CHECK:", &|session| {
        if session.auto_check() {
            "AUTO".to_owned()
        } else {
            "MANUAL".to_owned()
        }
    }),
];

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
