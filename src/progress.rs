//! Progress reporting — lightweight messages sent from scan and clean
//! workers to the embedding UI over a bounded crossbeam channel.
//!
//! Delivery is fire-and-forget: events are dropped rather than blocking a
//! worker when the consumer falls behind, and no ordering is guaranteed
//! between events from different scan tasks.

use std::path::Path;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::common::format;

/// Events emitted while scanning or cleaning.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A discovery module or analyzer touched a path
    Visited { path: String },
    /// A clean batch finished one item; `fraction` is completion in 0..=1
    Step { fraction: f64, path: String },
}

/// Sending half handed to the engine. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Progress {
    tx: Option<Sender<ProgressEvent>>,
}

impl Progress {
    /// A connected sink plus the receiver the consumer drains.
    ///
    /// The channel is bounded; under bursts the oldest unconsumed events
    /// are simply not delivered.
    pub fn sink() -> (Self, Receiver<ProgressEvent>) {
        let (tx, rx) = bounded(1024);
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that discards every event
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn visited(&self, path: &Path) {
        if let Some(tx) = &self.tx {
            let _ = tx.try_send(ProgressEvent::Visited {
                path: format::format_path(path),
            });
        }
    }

    pub fn step(&self, fraction: f64, path: &str) {
        if let Some(tx) = &self.tx {
            let _ = tx.try_send(ProgressEvent::Step {
                fraction,
                path: path.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_sink_swallows_events() {
        let progress = Progress::disabled();
        progress.visited(Path::new("/tmp/x"));
        progress.step(0.5, "~/x");
    }

    #[test]
    fn connected_sink_delivers() {
        let (progress, rx) = Progress::sink();
        progress.step(1.0, "~/Library/Caches/x");
        match rx.try_recv().unwrap() {
            ProgressEvent::Step { fraction, path } => {
                assert_eq!(fraction, 1.0);
                assert_eq!(path, "~/Library/Caches/x");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (progress, rx) = Progress::sink();
        for i in 0..5000 {
            progress.step(0.0, &format!("item-{}", i));
        }
        // Nothing blocked; at most the channel capacity was retained.
        assert!(rx.len() <= 1024);
    }
}
