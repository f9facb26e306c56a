use std::{sync::mpsc::Receiver, time::Duration};

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the `App` trait.
#[derive(Debug)]
pub struct Tui<M> {
    events: EventLoop<M>,
}

impl<M> Tui<M> {
    /// Creates a new Tui that receives worker messages from `rx`.
    pub fn new(rx: Receiver<M>) -> Self {
        let mut events = EventLoop::new();
        events.set_messages(rx);
        Self { events }
    }

    /// Sets the tick interval.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    /// Makes the next tick fire one full interval from now.
    pub fn restart_tick(&mut self) {
        self.events.restart_tick();
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - `Event::Tick`: calls `app.update()`
    ///    - `Event::Render`: calls `app.draw()`
    ///    - `Event::Crossterm`: calls `app.handle_event()`
    ///    - `Event::Message`: calls `app.handle_message()`
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App<Message = M>,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => {
                        app.update(&mut self);
                    }
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => {
                        app.handle_event(&mut self, &event);
                    }
                    TuiEvent::Message(message) => {
                        app.handle_message(&mut self, message);
                    }
                }
            }
            Ok(())
        })
    }
}
