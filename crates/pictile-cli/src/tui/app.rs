use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Trait for TUI applications.
///
/// Applications executed by `Tui::run()` must implement this trait.
pub trait App {
    /// Messages delivered from worker threads.
    type Message;

    /// Initializes the application.
    ///
    /// Called at the start of `Tui::run()`. Use this to configure the tick interval.
    fn init(&mut self, tui: &mut Tui<Self::Message>);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, tui: &mut Tui<Self::Message>, event: &Event);

    /// Handles a message received from a worker thread.
    fn handle_message(&mut self, tui: &mut Tui<Self::Message>, message: Self::Message);

    /// Draws the screen (called on each `Event::Render`).
    fn draw(&self, frame: &mut Frame);

    /// Updates app state (called on each `Event::Tick`).
    fn update(&mut self, tui: &mut Tui<Self::Message>);
}
