use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the marquee loop
#[derive(Clone, Debug)]
pub enum LoopEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<LoopEvent, RecvTimeoutError>;
}

/// Production event source: a thread forwarding crossterm events
pub struct CrosstermEventSource {
    rx: Receiver<LoopEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(LoopEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(LoopEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<LoopEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source fed through a plain mpsc sender
pub struct ChannelEventSource {
    rx: Receiver<LoopEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<LoopEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<LoopEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Turns an event source into a fixed-cadence frame driver: `next`
/// returns the next input event, or `Tick` when the frame interval
/// expires first. A disconnected source degrades to pure ticking so an
/// animation keeps running headless.
pub struct FrameClock<E: EventSource> {
    source: E,
    frame_interval: Duration,
}

impl<E: EventSource> FrameClock<E> {
    pub fn new(source: E, frame_interval: Duration) -> Self {
        Self {
            source,
            frame_interval,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn next(&self) -> LoopEvent {
        match self.source.recv_timeout(self.frame_interval) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                LoopEvent::Tick
            }
        }
    }
}
