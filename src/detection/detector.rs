//! Post-match mode and rank detection loops.
//!
//! After a match ends the client reveals its mode and rank only through
//! side signals (asset unloads, a rank line) that may arrive seconds later.
//! `ModeDetector` runs one cancellable polling task at a time that waits
//! for those signals with a bounded timeout.
//!
//! A loop never touches match state. It reads `DetectionSignals` from a
//! watch channel and, at exit, invokes its completion exactly once. A loop
//! that is cancelled (new loop, reset, shutdown) never invokes it.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use super::signals::{DetectionOutcome, DetectionReport, DetectionSignals, DetectionStage};
use crate::core::TrackerConfig;

/// Spawns and cancels detection loops.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct ModeDetector {
    signals: watch::Receiver<DetectionSignals>,
    shutdown: CancellationToken,
    current: Option<CancellationToken>,
    generation: u64,
    poll_interval: Duration,
    max_wait: Duration,
}

impl ModeDetector {
    /// Create a detector reading `signals`. Cancelling `shutdown` stops
    /// every loop it ever spawns.
    #[must_use]
    pub fn new(
        signals: watch::Receiver<DetectionSignals>,
        config: &TrackerConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            signals,
            shutdown,
            current: None,
            generation: 0,
            poll_interval: config.poll_interval,
            max_wait: config.max_detection_wait,
        }
    }

    /// Generation of the most recent loop (0 before any loop).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while a loop is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Wait for the match mode.
    ///
    /// Exits when the rank-found signal is raised, or when at least one
    /// asset unload has been seen and more than `timeout` has passed since
    /// the last one. Returns the loop's generation.
    pub fn detect_mode<F>(&mut self, timeout: Duration, on_complete: F) -> u64
    where
        F: FnOnce(DetectionReport) + Send + 'static,
    {
        info!(timeout_ms = timeout.as_millis() as u64, "waiting for mode");
        self.spawn(DetectionStage::Mode, timeout, on_complete)
    }

    /// Wait for the rank of a ranked match.
    ///
    /// Exits when the rank-found signal is raised or `timeout` has passed
    /// since the last asset unload. Returns the loop's generation.
    pub fn wait_for_rank<F>(&mut self, timeout: Duration, on_complete: F) -> u64
    where
        F: FnOnce(DetectionReport) + Send + 'static,
    {
        info!(timeout_ms = timeout.as_millis() as u64, "waiting for rank");
        self.spawn(DetectionStage::Rank, timeout, on_complete)
    }

    /// Stop the running loop, if any, and invalidate its generation.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            if !token.is_cancelled() {
                debug!(generation = self.generation, "detection cancelled");
            }
            token.cancel();
        }
        self.generation += 1;
    }

    fn spawn<F>(&mut self, stage: DetectionStage, timeout: Duration, on_complete: F) -> u64
    where
        F: FnOnce(DetectionReport) + Send + 'static,
    {
        self.cancel();
        let generation = self.generation;
        let token = self.shutdown.child_token();
        self.current = Some(token.clone());

        let poll = PollLoop {
            stage,
            timeout,
            poll_interval: self.poll_interval,
            max_wait: self.max_wait,
            signals: self.signals.clone(),
        };

        tokio::spawn(async move {
            let Some(outcome) = poll.run(&token).await else {
                return;
            };
            // Cancelled between the last tick and here.
            if token.is_cancelled() {
                return;
            }
            token.cancel();
            debug!(generation, ?stage, ?outcome, "detection finished");
            on_complete(DetectionReport {
                generation,
                stage,
                outcome,
            });
        });

        generation
    }
}

impl Drop for ModeDetector {
    fn drop(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

struct PollLoop {
    stage: DetectionStage,
    timeout: Duration,
    poll_interval: Duration,
    max_wait: Duration,
    signals: watch::Receiver<DetectionSignals>,
}

impl PollLoop {
    /// `None` when cancelled.
    async fn run(&self, token: &CancellationToken) -> Option<DetectionOutcome> {
        let started = Instant::now();

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = token.cancelled() => return None,
            }

            let signals = *self.signals.borrow();
            if signals.rank_found {
                return Some(DetectionOutcome::RankFound);
            }

            let now = Instant::now();
            let since_unload = now.saturating_duration_since(signals.last_asset_unload.unwrap_or(started));
            trace!(
                stage = ?self.stage,
                since_unload_ms = since_unload.as_millis() as u64,
                awaiting_first_unload = signals.awaiting_first_unload,
                "detection tick"
            );

            let timed_out = match self.stage {
                DetectionStage::Mode => !signals.awaiting_first_unload && since_unload > self.timeout,
                DetectionStage::Rank => since_unload >= self.timeout,
            };
            if timed_out || now.saturating_duration_since(started) >= self.max_wait {
                return Some(DetectionOutcome::TimedOut);
            }
        }
    }
}
