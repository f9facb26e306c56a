use std::{
    sync::mpsc::{Receiver, TryRecvError},
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// How often the message channel is checked while waiting for terminal input.
const MESSAGE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Event loop state management.
///
/// Renders after every state change (tick, terminal event or message) and
/// returns the next event via `next()`.
#[derive(Debug)]
pub(super) struct EventLoop<M> {
    tick_interval: Option<Duration>,
    messages: Option<Receiver<M>>,
    last_tick: Instant,
    dirty: bool,
}

impl<M> EventLoop<M> {
    /// Creates a new `EventLoop`.
    ///
    /// Tick interval is unset and no message channel is attached.
    pub fn new() -> Self {
        Self {
            tick_interval: None,
            messages: None,
            last_tick: Instant::now(),
            dirty: true, // Initial render is required on startup
        }
    }

    /// Sets the tick interval.
    ///
    /// Pass `None` to disable tick events.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    /// Starts counting the next tick interval from now.
    pub(super) fn restart_tick(&mut self) {
        self.last_tick = Instant::now();
    }

    pub(super) fn set_messages(&mut self, rx: Receiver<M>) {
        self.messages = Some(rx);
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick is due, a render is pending, a message arrives or
    /// a crossterm event occurs.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent<M>> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= tick_interval
            {
                self.last_tick += tick_interval;
                if now.duration_since(self.last_tick) >= tick_interval {
                    // fell behind (e.g. suspended); don't replay missed ticks
                    self.last_tick = now;
                }
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(rx) = &self.messages {
                match rx.try_recv() {
                    Ok(message) => {
                        self.dirty = true;
                        return Ok(TuiEvent::Message(message));
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => self.messages = None,
                }
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(TuiEvent::Crossterm(event::read()?));
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_message_at = self.messages.as_ref().map(|_| now + MESSAGE_POLL_INTERVAL);
        let next_timeout_at = [next_tick_at, next_message_at]
            .into_iter()
            .flatten()
            .min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}
