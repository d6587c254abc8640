//! Channel-backed collaborators
//!
//! Both ends are safe to use from the synchronous game loop: sending never
//! waits, and the receivers are drained by async tasks or by `try_recv`.

use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::core::{LevelUpNotifier, RunReport, StatsSink};

/// Stats sink that enqueues reports for an async consumer
#[derive(Debug, Clone)]
pub struct ChannelStatsSink {
    tx: mpsc::Sender<RunReport>,
    dropped: u64,
}

impl ChannelStatsSink {
    /// Reports that could not be enqueued so far
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl StatsSink for ChannelStatsSink {
    fn submit(&mut self, report: &RunReport) {
        match self.tx.try_send(*report) {
            Ok(()) => debug!("queued report for run {}", report.run_id),
            Err(TrySendError::Full(report)) => {
                self.dropped += 1;
                warn!("submission queue full, dropping run {}", report.run_id);
            }
            Err(TrySendError::Closed(report)) => {
                self.dropped += 1;
                warn!("submission consumer gone, dropping run {}", report.run_id);
            }
        }
    }
}

/// Bounded report queue; a capacity of 0 is raised to 1
pub fn stats_channel(capacity: usize) -> (ChannelStatsSink, mpsc::Receiver<RunReport>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChannelStatsSink { tx, dropped: 0 }, rx)
}

/// Level-up notifier that enqueues the new level
#[derive(Debug, Clone)]
pub struct ChannelLevelUpNotifier {
    tx: mpsc::UnboundedSender<u32>,
    missed: u64,
}

impl ChannelLevelUpNotifier {
    /// Level-ups sent after the receiver went away
    pub fn missed(&self) -> u64 {
        self.missed
    }
}

impl LevelUpNotifier for ChannelLevelUpNotifier {
    fn level_up(&mut self, level: u32) {
        if let Err(err) = self.tx.send(level) {
            self.missed += 1;
            debug!("level-up listener gone, missed level {}", err.0);
        }
    }
}

pub fn level_up_channel() -> (ChannelLevelUpNotifier, mpsc::UnboundedReceiver<u32>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelLevelUpNotifier { tx, missed: 0 }, rx)
}
