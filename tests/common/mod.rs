//! Shared helpers for integration tests.

#![allow(dead_code)]

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use hs_match_tracker::{EntityId, Game, GameEvent, GameTag, Mulligan, Side, TrackerConfig};

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once per binary.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then `warn`.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub const ROOT: u32 = 1;
pub const PLAYER: u32 = 2;
pub const OPPONENT: u32 = 3;

/// Events announcing the match root and both player entities.
pub fn setup_events() -> Vec<GameEvent> {
    let mut events = vec![GameEvent::EntityCreated {
        entity: EntityId(ROOT),
        name: Some("GameEntity".into()),
        card_id: None,
        side: None,
    }];
    for (id, side) in [(PLAYER, Side::Player), (OPPONENT, Side::Opponent)] {
        events.push(GameEvent::EntityCreated {
            entity: EntityId(id),
            name: None,
            card_id: None,
            side: Some(side),
        });
        events.push(GameEvent::tag(id, GameTag::PlayerId, i64::from(id) - 1));
    }
    events
}

pub fn mulligan_done_events() -> Vec<GameEvent> {
    [PLAYER, OPPONENT]
        .into_iter()
        .map(|id| GameEvent::tag(id, GameTag::MulliganState, Mulligan::Done.value()))
        .collect()
}

/// A started game with the root and player entities known.
pub fn started_game() -> Game {
    init_logging();
    let mut game = Game::new(TrackerConfig::default());
    game.apply(GameEvent::Start);
    for event in setup_events() {
        game.apply(event);
    }
    game
}
