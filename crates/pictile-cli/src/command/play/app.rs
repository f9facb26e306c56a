use std::{sync::mpsc::Sender, time::Duration};

use crossterm::event::{Event, KeyCode, KeyModifiers};
use pictile_engine::{
    CheckOutcome, GridSize, LoadStep, PartitionError, PuzzleSession, ScoreRecord, SwapOutcome,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    source::{self, LoaderEvent, SourceSpec},
    store::ScoreStore,
    tui::{App, Tui},
    ui::widgets::{KeyBinding, KeyBindingDisplay, Notice, SessionDisplay},
};

const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

/// Help label for the digit keys of [`GridSize::PRESETS`].
const GRID_KEYS: &str = "3-6";

fn preset_for_key(key: char) -> Option<GridSize> {
    let digit = usize::try_from(key.to_digit(10)?).ok()?;
    GridSize::PRESETS.into_iter().find(|size| size.get() == digit)
}

/// Terminal front-end of a [`PuzzleSession`].
///
/// Tiles are swapped by selecting one with the cursor and then confirming
/// a second one.
#[derive(Debug)]
pub struct PlayApp {
    session: PuzzleSession,
    store: ScoreStore,
    specs: Vec<SourceSpec>,
    loader_tx: Sender<LoaderEvent>,
    loading: bool,
    source: Option<String>,
    cursor: usize,
    selected: Option<usize>,
    notice: Option<Notice>,
    wins: usize,
    is_exiting: bool,
}

impl PlayApp {
    /// Creates the app. The caller has already started a loader for `specs`.
    pub fn new(
        session: PuzzleSession,
        store: ScoreStore,
        specs: Vec<SourceSpec>,
        loader_tx: Sender<LoaderEvent>,
    ) -> Self {
        Self {
            session,
            store,
            specs,
            loader_tx,
            loading: true,
            source: None,
            cursor: 0,
            selected: None,
            notice: None,
            wins: 0,
            is_exiting: false,
        }
    }

    pub fn wins(&self) -> usize {
        self.wins
    }

    fn start(&mut self, tui: &mut Tui<LoaderEvent>) {
        match self.session.start() {
            Ok(()) => {
                tui.restart_tick();
                self.selected = None;
                self.clamp_cursor();
                self.notice = Some(Notice::info(
                    "Shuffled! Swap tiles until the picture is whole.",
                ));
            }
            Err(PartitionError::ImageNotReady) => {
                self.notice = Some(Notice::warning(
                    "Please wait for the image to load or pass --image.",
                ));
            }
            Err(e) => {
                tracing::warn!(%e, "could not start game");
                self.notice = Some(Notice::error(format!("Cannot start: {e}")));
            }
        }
    }

    fn reset(&mut self) {
        self.session.reset();
        self.selected = None;
        self.notice = Some(Notice::info("Game reset. Press s to start."));
    }

    fn change_grid_size(&mut self, tui: &mut Tui<LoaderEvent>, grid_size: GridSize) {
        let was_running = self.session.state().is_running();
        match self.session.set_grid_size(grid_size) {
            Ok(()) => {
                self.selected = None;
                self.clamp_cursor();
                if was_running {
                    tui.restart_tick();
                    self.notice = Some(Notice::info(format!("Restarted at {grid_size}.")));
                } else {
                    self.notice = Some(Notice::info(format!("Grid size set to {grid_size}.")));
                }
            }
            Err(e) => {
                self.selected = None;
                self.clamp_cursor();
                self.notice = Some(Notice::error(format!("Cannot start a {grid_size} game: {e}")));
            }
        }
    }

    fn press_tile(&mut self) {
        if !self.session.state().is_running() {
            return;
        }
        let Some(first) = self.selected.take() else {
            self.selected = Some(self.cursor);
            return;
        };
        match self.session.swap(first, self.cursor) {
            SwapOutcome::NotRunning | SwapOutcome::SameTile | SwapOutcome::Moved => {}
            SwapOutcome::Solved(score) => self.on_win(&score),
        }
    }

    fn check(&mut self) {
        match self.session.check() {
            CheckOutcome::NotRunning => {}
            CheckOutcome::NotSolved { misplaced } => {
                self.notice = Some(Notice::warning(format!(
                    "The puzzle is not solved yet ({misplaced} tiles out of place). Keep trying!"
                )));
            }
            CheckOutcome::Solved(score) => self.on_win(&score),
        }
    }

    fn on_win(&mut self, score: &ScoreRecord) {
        self.wins += 1;
        self.selected = None;
        self.notice = match self.store.append(score) {
            Ok(()) => Some(Notice::info(
                "Congratulations! Score saved. Press s to play again.",
            )),
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "failed to save score");
                Some(Notice::error(format!("Solved, but the score was not saved: {e:#}")))
            }
        };
    }

    fn reload_image(&mut self) {
        if self.loading {
            return;
        }
        self.loading = true;
        source::spawn_loader(self.specs.clone(), self.loader_tx.clone());
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let grid_size = self.session.grid_size();
        let n = grid_size.get();
        let (row, col) = grid_size.row_col(self.cursor);
        let row = row.saturating_add_signed(d_row).min(n - 1);
        let col = col.saturating_add_signed(d_col).min(n - 1);
        self.cursor = grid_size.slot_at(row, col);
    }

    fn clamp_cursor(&mut self) {
        let tile_count = self.session.grid_size().tile_count();
        if self.cursor >= tile_count {
            self.cursor = tile_count - 1;
        }
    }

    fn key_bindings(&self) -> [KeyBinding; 8] {
        let state = self.session.state();
        let running = state.is_running();
        [
            KeyBinding::new(&["←↓↑→", "hjkl"], "Move").enabled(running),
            KeyBinding::new(&["Space"], "Pick/Swap").enabled(running),
            KeyBinding::new(&["s"], if running { "Restart" } else { "Start" })
                .enabled(self.session.has_image()),
            KeyBinding::new(&["d"], "Done").enabled(running),
            KeyBinding::new(&["r"], "Reset").enabled(!state.is_idle()),
            KeyBinding::new(&[GRID_KEYS], "Grid"),
            KeyBinding::new(&["i"], "New image").enabled(!self.loading),
            KeyBinding::new(&["q"], "Quit"),
        ]
    }
}

impl App for PlayApp {
    type Message = LoaderEvent;

    fn init(&mut self, tui: &mut Tui<LoaderEvent>) {
        tui.set_tick_interval(Some(CLOCK_INTERVAL));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, tui: &mut Tui<LoaderEvent>, event: &Event) {
        let Some(key) = event.as_key_press_event() else {
            return;
        };
        let running = self.session.state().is_running();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.is_exiting = true;
            }
            KeyCode::Char('q') => self.is_exiting = true,
            KeyCode::Left | KeyCode::Char('h') if running => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') if running => self.move_cursor(0, 1),
            KeyCode::Up | KeyCode::Char('k') if running => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') if running => self.move_cursor(1, 0),
            KeyCode::Char(' ') | KeyCode::Enter => self.press_tile(),
            KeyCode::Esc => self.selected = None,
            KeyCode::Char('s') => self.start(tui),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('d') => self.check(),
            KeyCode::Char('i') => self.reload_image(),
            KeyCode::Char(key) => {
                if let Some(grid_size) = preset_for_key(key) {
                    self.change_grid_size(tui, grid_size);
                }
            }
            _ => {}
        }
    }

    fn handle_message(&mut self, _tui: &mut Tui<LoaderEvent>, message: LoaderEvent) {
        match message {
            LoaderEvent::Attempting { name } => {
                self.notice = Some(Notice::info(format!("Loading image from {name}...")));
            }
            LoaderEvent::Step(LoadStep::Ready { index, image }) => {
                let source = self
                    .specs
                    .get(index)
                    .map_or_else(|| "unknown".to_owned(), ToString::to_string);
                self.session.set_image(image);
                self.notice = Some(if self.session.state().is_running() {
                    Notice::info("New image ready. It is used from the next start.")
                } else {
                    Notice::info("Image ready. Press s to start.")
                });
                self.loading = false;
                self.source = Some(source);
            }
            LoaderEvent::Step(LoadStep::Failed { error, .. }) => {
                self.notice = Some(Notice::warning(format!("{error}. Trying the next one...")));
            }
            LoaderEvent::Step(LoadStep::Exhausted(error)) => {
                self.loading = false;
                let text = if self.session.has_image() {
                    format!("{error}. Keeping the previous image.")
                } else {
                    format!("{error}. Try your own image with --image.")
                };
                self.notice = Some(Notice::error(text));
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        let session_display = SessionDisplay::new(&self.session, self.cursor)
            .selected(self.selected)
            .source(self.source.as_deref())
            .notice(self.notice.as_ref());
        frame.render_widget(session_display, main_area);

        let bindings = self.key_bindings();
        frame.render_widget(KeyBindingDisplay::new(&bindings), help_area);
    }

    fn update(&mut self, _tui: &mut Tui<LoaderEvent>) {
        self.session.tick();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crossterm::event::KeyEvent;
    use image::RgbaImage;
    use pictile_engine::{AllSourcesExhaustedError, SessionConfig, SessionState, SourceError};

    use super::*;
    use crate::ui::widgets::NoticeKind;

    struct Harness {
        app: PlayApp,
        tui: Tui<LoaderEvent>,
        _dir: tempfile::TempDir,
    }

    impl Harness {
        fn new(grid_size: usize) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let session = PuzzleSession::new(SessionConfig {
                grid_size: GridSize::new(grid_size).unwrap(),
                ..SessionConfig::default()
            });
            let store = ScoreStore::new(dir.path().join("scores.jsonl"));
            let (tx, rx) = mpsc::channel();
            Self {
                app: PlayApp::new(session, store, vec![], tx),
                tui: Tui::new(rx),
                _dir: dir,
            }
        }

        fn key(&mut self, code: KeyCode) {
            let event = Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
            self.app.handle_event(&mut self.tui, &event);
        }

        fn image_ready(&mut self) {
            self.app.handle_message(
                &mut self.tui,
                LoaderEvent::Step(LoadStep::Ready {
                    index: 0,
                    image: RgbaImage::new(60, 60),
                }),
            );
        }

        /// Picks the tile at `a`, then swaps it with the tile at `b`.
        fn swap(&mut self, a: usize, b: usize) {
            self.app.cursor = a;
            self.key(KeyCode::Char(' '));
            self.app.cursor = b;
            self.key(KeyCode::Char(' '));
        }
    }

    #[test]
    fn test_start_waits_for_image() {
        let mut h = Harness::new(3);
        h.key(KeyCode::Char('s'));
        assert!(h.app.session.state().is_idle());
        assert_eq!(h.app.notice.as_ref().unwrap().kind, NoticeKind::Warning);

        h.image_ready();
        h.key(KeyCode::Char('s'));
        assert!(h.app.session.state().is_running());
    }

    #[test]
    fn test_solving_saves_score() {
        let mut h = Harness::new(2);
        h.image_ready();
        h.key(KeyCode::Char('s'));
        if h.app.session.board().unwrap().is_solved() {
            h.swap(0, 1);
        }

        let mut arrangement = h.app.session.board().unwrap().arrangement();
        for slot in 0..arrangement.len() {
            let from = arrangement.iter().position(|&t| t == slot).unwrap();
            if from != slot {
                h.swap(slot, from);
                arrangement.swap(slot, from);
            }
        }

        assert_eq!(h.app.session.state(), SessionState::Won);
        assert_eq!(h.app.wins(), 1);
        let saved = h.app.store.read_all().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].move_count, h.app.session.stats().move_count());
    }

    #[test]
    fn test_done_reports_unsolved_board() {
        let mut h = Harness::new(3);
        h.image_ready();
        h.key(KeyCode::Char('s'));
        if h.app.session.board().unwrap().is_solved() {
            // identity shuffle; make it unsolved first
            h.swap(0, 1);
        }
        h.key(KeyCode::Char('d'));
        assert_eq!(h.app.session.state(), SessionState::Running);
        let notice = h.app.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Warning);
        assert!(notice.text.contains("not solved"));
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut h = Harness::new(3);
        h.image_ready();
        h.key(KeyCode::Char('s'));
        h.key(KeyCode::Up);
        h.key(KeyCode::Left);
        assert_eq!(h.app.cursor, 0);
        for _ in 0..5 {
            h.key(KeyCode::Right);
            h.key(KeyCode::Char('j'));
        }
        assert_eq!(h.app.cursor, 8);

        h.key(KeyCode::Char('4'));
        assert_eq!(h.app.session.grid_size().get(), 4);
        assert_eq!(h.app.session.board().unwrap().tile_count(), 16);
        for _ in 0..3 {
            h.key(KeyCode::Right);
            h.key(KeyCode::Down);
        }
        assert_eq!(h.app.cursor, 15);

        h.key(KeyCode::Char('3'));
        assert_eq!(h.app.cursor, 8);
    }

    #[test]
    fn test_grid_keys_follow_presets() {
        let first = GridSize::PRESETS[0];
        let last = GridSize::PRESETS[GridSize::PRESETS.len() - 1];
        assert_eq!(GRID_KEYS, format!("{}-{}", first.get(), last.get()));

        let mut h = Harness::new(4);
        h.key(KeyCode::Char('2'));
        h.key(KeyCode::Char('7'));
        assert_eq!(h.app.session.grid_size().get(), 4);
        h.key(KeyCode::Char('6'));
        assert_eq!(h.app.session.grid_size().get(), 6);
        assert!(h.app.session.state().is_idle());
    }

    #[test]
    fn test_grid_change_too_large_for_image_resets() {
        let mut h = Harness::new(3);
        h.app.handle_message(
            &mut h.tui,
            LoaderEvent::Step(LoadStep::Ready {
                index: 0,
                image: RgbaImage::new(4, 4),
            }),
        );
        h.key(KeyCode::Char('s'));
        assert!(h.app.session.state().is_running());

        h.key(KeyCode::Char('5'));
        assert!(h.app.session.state().is_idle());
        assert_eq!(h.app.session.grid_size().get(), 5);
        assert_eq!(h.app.notice.as_ref().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_exhausted_sources_leave_session_idle() {
        let mut h = Harness::new(3);
        h.app.handle_message(
            &mut h.tui,
            LoaderEvent::Step(LoadStep::Failed {
                index: 0,
                error: SourceError {
                    source_name: "a".to_owned(),
                    reason: "timeout".to_owned(),
                },
            }),
        );
        h.app.handle_message(
            &mut h.tui,
            LoaderEvent::Step(LoadStep::Exhausted(AllSourcesExhaustedError {
                attempts: 1,
            })),
        );
        assert!(!h.app.loading);
        assert_eq!(h.app.notice.as_ref().unwrap().kind, NoticeKind::Error);
        h.key(KeyCode::Char('s'));
        assert!(h.app.session.state().is_idle());
    }

    #[test]
    fn test_clock_only_runs_during_game() {
        let mut h = Harness::new(3);
        h.app.update(&mut h.tui);
        assert_eq!(h.app.session.stats().elapsed().as_secs(), 0);

        h.image_ready();
        h.key(KeyCode::Char('s'));
        h.app.update(&mut h.tui);
        h.app.update(&mut h.tui);
        assert_eq!(h.app.session.stats().elapsed().to_string(), "00:02");
    }
}
