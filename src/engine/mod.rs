//! The serialized execution context.
//!
//! `MatchEngine` owns the `Game` and is the single consumer of an unbounded
//! event queue. The log parser posts events through cloneable
//! `EngineHandle`s; detection loops post their completions through the same
//! queue, so every mutation of match state happens on one task in arrival
//! order.
//!
//! ## Key Types
//!
//! - `MatchEngine`: queue consumer. Drive it with `run` on a tokio runtime,
//!   or synchronously with `process_pending`.
//! - `EngineHandle`: producer side of the queue.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::TrackerConfig;
use crate::detection::ModeDetector;
use crate::error::TrackerError;
use crate::events::GameEvent;
use crate::game::Game;
use crate::player::Applied;

/// Cloneable producer for the engine's event queue.
#[derive(Clone, Debug)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<GameEvent>,
}

impl EngineHandle {
    /// Post one event. Fails once the engine has been dropped.
    pub fn send(&self, event: impl Into<GameEvent>) -> Result<(), TrackerError> {
        self.tx.send(event.into()).map_err(|_| TrackerError::EngineClosed)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owns the match state and applies queued events one at a time.
#[derive(Debug)]
pub struct MatchEngine {
    game: Game,
    inbox: mpsc::UnboundedReceiver<GameEvent>,
    tx: mpsc::UnboundedSender<GameEvent>,
    shutdown: CancellationToken,
}

impl MatchEngine {
    /// Build an engine with a mode detector wired to its own queue.
    ///
    /// Cancelling `shutdown` stops `run` and every detection loop.
    pub fn new(config: TrackerConfig, shutdown: CancellationToken) -> Result<Self, TrackerError> {
        config.validate()?;

        let (tx, inbox) = mpsc::unbounded_channel();
        let mut game = Game::new(config);
        let detector = ModeDetector::new(game.subscribe_signals(), game.config(), shutdown.clone());
        game.attach_detector(detector, tx.clone());

        Ok(Self {
            game,
            inbox,
            tx,
            shutdown,
        })
    }

    #[must_use]
    pub fn handle(&self) -> EngineHandle {
        EngineHandle { tx: self.tx.clone() }
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Mutable access for attaching trackers, catalog and deck.
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Apply one event immediately, bypassing the queue.
    pub fn apply(&mut self, event: impl Into<GameEvent>) -> Applied {
        self.game.apply(event.into())
    }

    /// Apply every event already queued. Returns how many were applied.
    ///
    /// Outside a tokio runtime no detection loop can start, so a match
    /// that ends here is finalized with whatever mode and rank are known.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.inbox.try_recv() {
            self.game.apply(event);
            applied += 1;
        }
        applied
    }

    /// Consume events until `shutdown` is cancelled, then hand the final
    /// state back.
    pub async fn run(mut self) -> Game {
        info!("match engine running");
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                event = self.inbox.recv() => match event {
                    Some(event) => {
                        let outcome = self.game.apply(event);
                        if outcome.is_ignored() {
                            debug!(?outcome, "event ignored");
                        }
                    }
                    None => break,
                },
            }
        }
        self.game.shutdown();
        info!("match engine stopped");
        self.game
    }
}
