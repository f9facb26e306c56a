use pictile_engine::{PuzzleSession, SessionState};
use ratatui::{
    layout::{Constraint, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Paragraph, Widget, Wrap},
};

use crate::ui::widgets::{BoardDisplay, ImagePreview, SessionStatsDisplay, color, style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// Message shown to the player under the stats panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    fn style(&self) -> Style {
        match self.kind {
            NoticeKind::Info => style::INFO,
            NoticeKind::Warning => style::WARNING,
            NoticeKind::Error => style::ERROR,
        }
    }
}

/// Whole play screen except the help bar.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a PuzzleSession,
    cursor: usize,
    selected: Option<usize>,
    source: Option<&'a str>,
    notice: Option<&'a Notice>,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a PuzzleSession, cursor: usize) -> Self {
        Self {
            session,
            cursor,
            selected: None,
            source: None,
            notice: None,
        }
    }

    pub fn selected(self, selected: Option<usize>) -> Self {
        Self { selected, ..self }
    }

    pub fn source(self, source: Option<&'a str>) -> Self {
        Self { source, ..self }
    }

    pub fn notice(self, notice: Option<&'a Notice>) -> Self {
        Self { notice, ..self }
    }

    fn border_color(&self) -> ratatui::style::Color {
        match self.session.state() {
            SessionState::Idle => color::GRAY,
            SessionState::Running => color::WHITE,
            SessionState::Won => color::GREEN,
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let border_style = self.border_color();
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(Padding::horizontal(1))
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let session_stats = SessionStatsDisplay::new(self.session).block(panel("STATS"));
        let [board_area, side_column] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(session_stats.width()),
        ])
        .spacing(1)
        .areas(area);
        let [stats_area, source_area, notice_area] = Layout::vertical([
            Constraint::Length(session_stats.height()),
            Constraint::Length(6),
            Constraint::Fill(1),
        ])
        .areas(side_column);

        let board_block = panel("PICTILE");
        if let Some(board) = self.session.board() {
            BoardDisplay::new(board)
                .cursor(self.cursor)
                .selected(self.selected)
                .block(board_block)
                .render(board_area, buf);
        } else if let Some(image) = self.session.image() {
            ImagePreview::new(image)
                .block(board_block)
                .render(board_area, buf);
        } else {
            let inner = board_block.inner(board_area);
            board_block.render(board_area, buf);
            Line::styled("Loading image...", style::DIM)
                .centered()
                .render(inner.centered_vertically(Constraint::Length(1)), buf);
        }

        session_stats.render(stats_area, buf);
        Paragraph::new(self.source.unwrap_or("-"))
            .style(style::DIM)
            .wrap(Wrap { trim: true })
            .block(panel("IMAGE"))
            .render(source_area, buf);
        if let Some(notice) = self.notice {
            Paragraph::new(notice.text.as_str())
                .style(notice.style())
                .wrap(Wrap { trim: true })
                .render(notice_area, buf);
        }

        if let Some(score) = self.session.last_score() {
            let popup_style = style::SOLVED_POPUP;
            let text = Text::from(vec![
                Line::from("SOLVED!"),
                Line::from(format!("{} moves in {}", score.move_count, score.elapsed)),
            ])
            .style(popup_style)
            .centered();
            let area = board_area.centered(Constraint::Length(28), Constraint::Length(4));
            let block = Block::new().style(popup_style);
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(2)), buf);
        }
    }
}
