//! Notification channel between the engine worker and the update loop.
//!
//! The worker owns a `Notifier` and pushes `EngineEvent`s; the presentation
//! layer owns the matching `EventReceiver` and drains it from its own loop.
//! Delivery is FIFO with no drops: the queue is bounded and a full queue
//! blocks the worker rather than discarding events.

use log::{debug, warn};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::time::Duration;

/// Number of undelivered events the worker may run ahead of the update loop.
pub const EVENT_QUEUE_CAPACITY: usize = 256;

/// Progress after a completed step, kept as an exact ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Fraction in `0.0..=1.0`; exactly `1.0` once `completed == total`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }

    /// Whole percent for gauges, rounded down
    pub fn percent(&self) -> u16 {
        if self.total == 0 {
            return 0;
        }
        (self.completed * 100 / self.total) as u16
    }
}

/// Events emitted by the engine, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Replace the status line
    Status(String),
    /// A step finished successfully
    Progress(Progress),
    /// Short-lived notification
    Toast(String),
    /// A task failed; show a modal with both fields verbatim
    Error { message: String, details: String },
    /// The run is over and the trigger may be used again
    RunFinished { enable_trigger: bool, success: bool },
}

/// Create a connected notifier/receiver pair.
pub fn notification_channel() -> (Notifier, EventReceiver) {
    let (tx, rx) = mpsc::sync_channel(EVENT_QUEUE_CAPACITY);
    (Notifier { tx }, EventReceiver { rx })
}

/// Sending half, cloned into each run's worker thread.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: SyncSender<EngineEvent>,
}

impl Notifier {
    /// Push one event, blocking while the queue is full.
    ///
    /// A closed receiver means the interface is gone; the event is logged and
    /// the run keeps going so the host is not left half-configured.
    pub fn send(&self, event: EngineEvent) {
        debug!("event: {:?}", event);
        if let Err(e) = self.tx.send(event) {
            warn!("Event receiver dropped, discarding {:?}", e.0);
        }
    }

    pub fn status(&self, text: impl Into<String>) {
        self.send(EngineEvent::Status(text.into()));
    }

    pub fn progress(&self, completed: usize, total: usize) {
        self.send(EngineEvent::Progress(Progress { completed, total }));
    }

    pub fn toast(&self, text: impl Into<String>) {
        self.send(EngineEvent::Toast(text.into()));
    }

    pub fn error(&self, message: impl Into<String>, details: impl Into<String>) {
        self.send(EngineEvent::Error {
            message: message.into(),
            details: details.into(),
        });
    }

    pub fn finished(&self, success: bool) {
        self.send(EngineEvent::RunFinished {
            enable_trigger: true,
            success,
        });
    }
}

/// Receiving half, owned by the update loop.
#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<EngineEvent>,
}

impl EventReceiver {
    /// Take every event that is already queued, without blocking
    pub fn drain(&self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Wait up to `timeout` for the next event.
    ///
    /// Returns `None` on timeout or when every notifier has been dropped.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Block for the next event; `None` once all notifiers are gone
    pub fn recv(&self) -> Option<EngineEvent> {
        self.rx.recv().ok()
    }
}
