use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug)]
pub(super) enum TuiEvent<M> {
    /// Clock update timing (based on `tick_interval`).
    Tick,
    /// Screen render timing.
    Render,
    /// Terminal events such as key input, mouse, and resize.
    Crossterm(CrosstermEvent),
    /// Message from a worker thread.
    Message(M),
}
