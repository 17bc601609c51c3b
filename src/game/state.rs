use std::sync::Arc;
use std::time::SystemTime;

use rustc_hash::FxHashMap;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{GameMode, GameResult, MatchSummary, Phase};
use crate::cards::{CardCatalog, CardId, Deck};
use crate::core::{Entity, EntityId, EntityStore, GameTag, Mulligan, Side, SideMap, TrackerConfig};
use crate::detection::{DetectionReport, DetectionSignals, DetectionStage, ModeDetector};
use crate::events::{GameEvent, ZoneEvent};
use crate::player::{Applied, IgnoreReason, PlayerState, Transition};
use crate::tracker::{MatchTracker, SideTracker};

/// Detector plus the queue its completions are posted to.
struct DetectorLink {
    detector: ModeDetector,
    outbox: mpsc::UnboundedSender<GameEvent>,
}

/// The match state machine.
///
/// One instance lives for the whole process and is reset at every match
/// start. All mutation happens through `&mut self` on the single event
/// context; detection loops only ever post events back.
pub struct Game {
    config: TrackerConfig,
    entities: EntityStore,
    players: SideMap<PlayerState>,

    /// 0 when the player went first, 1 otherwise. Resolved once per match.
    parity: Option<i64>,
    rank: Option<i64>,
    mode: GameMode,
    phase: Phase,
    previous_phase: Phase,
    result: GameResult,
    started_at: Option<SystemTime>,
    ended_at: Option<SystemTime>,

    active_deck: Option<Arc<Deck>>,
    known_card_ids: FxHashMap<EntityId, CardId>,
    joust_reveals: u32,

    signals: watch::Sender<DetectionSignals>,
    detector: Option<DetectorLink>,
    mode_detection_done: bool,
    rank_wait_done: bool,

    catalog: Option<Arc<dyn CardCatalog>>,
    match_tracker: Option<Box<dyn MatchTracker>>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phase)
            .field("mode", &self.mode)
            .field("rank", &self.rank)
            .field("result", &self.result)
            .field("entities", &self.entities.len())
            .field("player", self.players.get(Side::Player))
            .field("opponent", self.players.get(Side::Opponent))
            .finish()
    }
}

impl Game {
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        let coin = config.coin_card_id.clone();
        let (signals, _) = watch::channel(DetectionSignals::default());
        Self {
            config,
            entities: EntityStore::new(),
            players: SideMap::new(|side| PlayerState::new(side, coin.clone())),
            parity: None,
            rank: None,
            mode: GameMode::Unknown,
            phase: Phase::NotStarted,
            previous_phase: Phase::NotStarted,
            result: GameResult::Unknown,
            started_at: None,
            ended_at: None,
            active_deck: None,
            known_card_ids: FxHashMap::default(),
            joust_reveals: 0,
            signals,
            detector: None,
            mode_detection_done: false,
            rank_wait_done: false,
            catalog: None,
            match_tracker: None,
        }
    }

    // === Wiring ===

    /// Receiver for the signals detection loops poll.
    #[must_use]
    pub fn subscribe_signals(&self) -> watch::Receiver<DetectionSignals> {
        self.signals.subscribe()
    }

    /// Attach the mode detector; completions are posted to `outbox`.
    pub fn attach_detector(&mut self, detector: ModeDetector, outbox: mpsc::UnboundedSender<GameEvent>) {
        self.detector = Some(DetectorLink { detector, outbox });
    }

    pub fn attach_tracker(&mut self, side: Side, tracker: Box<dyn SideTracker>) {
        self.players[side].attach_tracker(tracker);
    }

    pub fn attach_match_tracker(&mut self, tracker: Box<dyn MatchTracker>) {
        self.match_tracker = Some(tracker);
    }

    pub fn attach_catalog(&mut self, catalog: Arc<dyn CardCatalog>) {
        self.catalog = Some(catalog);
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    #[must_use]
    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    #[must_use]
    pub fn player(&self) -> &PlayerState {
        &self.players[Side::Player]
    }

    #[must_use]
    pub fn opponent(&self) -> &PlayerState {
        &self.players[Side::Opponent]
    }

    #[must_use]
    pub fn side(&self, side: Side) -> &PlayerState {
        &self.players[side]
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn previous_phase(&self) -> Phase {
        self.previous_phase
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn rank(&self) -> Option<i64> {
        self.rank
    }

    #[must_use]
    pub fn result(&self) -> GameResult {
        self.result
    }

    #[must_use]
    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> Option<SystemTime> {
        self.ended_at
    }

    #[must_use]
    pub fn active_deck(&self) -> Option<&Deck> {
        self.active_deck.as_deref()
    }

    #[must_use]
    pub fn known_card_id(&self, id: EntityId) -> Option<&CardId> {
        self.known_card_ids.get(&id)
    }

    #[must_use]
    pub fn joust_reveals(&self) -> u32 {
        self.joust_reveals
    }

    /// True while a detection loop for this match may still report.
    #[must_use]
    pub fn is_detecting(&self) -> bool {
        self.detector.as_ref().is_some_and(|l| l.detector.is_active())
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self.phase, Phase::InMulligan | Phase::InTurns)
    }

    #[must_use]
    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            phase: self.phase,
            mode: self.mode,
            rank: self.rank,
            result: self.result,
            turn: self.turn_number(),
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }

    // === Entity queries ===

    /// The local player's player entity.
    #[must_use]
    pub fn player_entity(&self) -> Option<&Entity> {
        self.entities.find(|e| e.is_player_entity() && e.is_player)
    }

    /// The opponent's player entity.
    #[must_use]
    pub fn opponent_entity(&self) -> Option<&Entity> {
        self.entities.find(|e| e.is_player_entity() && !e.is_player)
    }

    /// The single match root entity.
    #[must_use]
    pub fn match_root(&self) -> Option<&Entity> {
        let name = self.config.match_root_name.as_str();
        self.entities.find(|e| e.name.as_deref() == Some(name))
    }

    fn first_player(&self) -> Option<&Entity> {
        self.entities.find(|e| e.get_tag(GameTag::FirstPlayer) != 0)
    }

    // === Derived state ===

    /// Both player entities have finished their mulligan.
    #[must_use]
    pub fn is_mulligan_done(&self) -> bool {
        let done = |e: &Entity| {
            e.has_tag(GameTag::MulliganState)
                && e.get_tag(GameTag::MulliganState) == Mulligan::Done.value()
        };
        match (self.player_entity(), self.opponent_entity()) {
            (Some(player), Some(opponent)) => done(player) && done(opponent),
            _ => false,
        }
    }

    /// Full turns played, counting from 1 for the first player's first turn.
    ///
    /// 0 until the mulligan is done.
    pub fn turn_number(&self) -> i64 {
        if !self.is_mulligan_done() {
            return 0;
        }
        let parity = self.parity.or_else(|| self.resolve_parity()).unwrap_or(0);
        let raw = self.match_root().map_or(0, |root| root.get_tag(GameTag::Turn));
        (raw + parity).div_euclid(2)
    }

    /// Memoize turn parity once the first player is known.
    fn remember_parity(&mut self) {
        if self.parity.is_none() && self.is_mulligan_done() {
            self.parity = self.resolve_parity();
            if let Some(parity) = self.parity {
                debug!(parity, "turn parity resolved");
            }
        }
    }

    fn resolve_parity(&self) -> Option<i64> {
        self.first_player().map(|e| if e.is_player { 0 } else { 1 })
    }

    /// Whether the local player is the active player.
    #[must_use]
    pub fn players_turn(&self) -> bool {
        let (Some(first), Some(root)) = (self.first_player(), self.match_root()) else {
            return false;
        };
        let offset = if first.is_player { 0 } else { 1 };
        (root.get_tag(GameTag::Turn) + offset).rem_euclid(2) == 1
    }

    // === Lifecycle ===

    /// Clear everything match-scoped.
    ///
    /// Trackers, catalog, detector wiring and the active deck survive; the
    /// active deck is re-seeded into the player's deck.
    pub fn reset(&mut self) {
        debug!("resetting match state");
        if let Some(link) = &mut self.detector {
            link.detector.cancel();
        }
        self.entities.reset();
        for (_, player) in self.players.iter_mut() {
            player.reset();
        }
        self.parity = None;
        self.rank = None;
        self.mode = GameMode::Unknown;
        self.set_phase(Phase::NotStarted);
        self.result = GameResult::Unknown;
        self.started_at = None;
        self.ended_at = None;
        self.known_card_ids.clear();
        self.joust_reveals = 0;
        self.mode_detection_done = false;
        self.rank_wait_done = false;
        self.signals.send_replace(DetectionSignals::default());

        if let Some(deck) = self.active_deck.clone() {
            self.seed_deck(&deck);
        }
    }

    pub fn start(&mut self) {
        if self.is_in_progress() {
            return;
        }
        self.reset();
        self.set_phase(Phase::InMulligan);
        self.started_at = Some(SystemTime::now());

        info!("----- Game Started -----");

        for (_, player) in self.players.iter() {
            player.game_start();
        }
        if let Some(tracker) = &self.match_tracker {
            tracker.game_start(&self.summary());
        }
    }

    pub fn end(&mut self) {
        info!("----- Game End -----");
        self.ended_at = Some(SystemTime::now());
        self.set_phase(Phase::Ended);

        self.handle_end_game();

        for (_, player) in self.players.iter() {
            player.game_end();
        }
        if let Some(tracker) = &self.match_tracker {
            tracker.game_end(&self.summary());
        }
    }

    /// Drive post-match detection until mode (and rank, if ranked) are
    /// settled or have timed out. Re-entered from each detection completion.
    pub fn handle_end_game(&mut self) {
        if self.mode == GameMode::Unknown && !self.mode_detection_done {
            if self.begin_detection(DetectionStage::Mode) {
                return;
            }
            self.mode_detection_done = true;
        }

        if self.mode == GameMode::Ranked && self.rank.is_none() && !self.rank_wait_done {
            if self.begin_detection(DetectionStage::Rank) {
                return;
            }
            self.rank_wait_done = true;
        }

        info!(mode = ?self.mode, rank = ?self.rank, result = ?self.result, "match finalized");
        self.notify_match();
    }

    /// Start a detection loop. False when no detector is attached.
    fn begin_detection(&mut self, stage: DetectionStage) -> bool {
        let Some(link) = &mut self.detector else {
            debug!(?stage, "no detector attached; skipping detection");
            return false;
        };
        if tokio::runtime::Handle::try_current().is_err() {
            warn!(?stage, "no async runtime; skipping detection");
            return false;
        }

        let outbox = link.outbox.clone();
        let on_complete = move |report: DetectionReport| {
            // The engine may already be gone at shutdown.
            let _ = outbox.send(GameEvent::DetectionFinished { report });
        };

        match stage {
            DetectionStage::Mode => {
                self.signals.send_modify(|s| {
                    s.rank_found = false;
                    s.last_asset_unload = Some(Instant::now());
                    s.awaiting_first_unload = true;
                });
                link.detector.detect_mode(self.config.mode_timeout, on_complete);
            }
            DetectionStage::Rank => {
                self.signals.send_modify(|s| s.rank_found = false);
                link.detector.wait_for_rank(self.config.rank_timeout, on_complete);
            }
        }
        true
    }

    fn finish_detection(&mut self, report: DetectionReport) -> Applied {
        let current = self.detector.as_ref().map(|l| l.detector.generation());
        if current != Some(report.generation) || self.phase != Phase::Ended {
            debug!(generation = report.generation, ?current, "stale detection report");
            return Applied::Ignored(IgnoreReason::StaleDetection);
        }
        debug!(stage = ?report.stage, outcome = ?report.outcome, "detection complete");
        match report.stage {
            DetectionStage::Mode => self.mode_detection_done = true,
            DetectionStage::Rank => self.rank_wait_done = true,
        }
        self.handle_end_game();
        Applied::Updated
    }

    /// Stop any in-flight detection loop for good.
    pub fn shutdown(&mut self) {
        if let Some(link) = &mut self.detector {
            link.detector.cancel();
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            self.previous_phase = self.phase;
            self.phase = phase;
        }
    }

    fn notify_match(&self) {
        if let Some(tracker) = &self.match_tracker {
            tracker.update(&self.summary());
        }
    }

    // === Deck ===

    /// Assign the active deck and seed its cards into the player's deck.
    pub fn set_active_deck(&mut self, deck: Arc<Deck>) {
        info!(deck = %deck.name, cards = deck.card_count(), "active deck set");
        self.seed_deck(&deck);
        self.active_deck = Some(deck);
    }

    fn seed_deck(&mut self, deck: &Deck) {
        let player = &mut self.players[Side::Player];
        player.clear_placeholders(&mut self.entities);
        for card_id in deck.expanded() {
            debug!(card = %card_id, "adding deck card");
            player.reveal_deck_card(&mut self.entities, card_id);
        }
    }

    // === Results ===

    pub fn win(&mut self) {
        info!("match won");
        self.result = GameResult::Win;
        self.notify_match();
    }

    pub fn loss(&mut self) {
        info!("match lost");
        self.result = GameResult::Loss;
        self.notify_match();
    }

    pub fn tied(&mut self) {
        info!("match tied");
        self.result = GameResult::Tied;
        self.notify_match();
    }

    pub fn concede(&self) {
        info!("match conceded");
    }

    // === Identity ===

    pub fn set_hero(&mut self, side: Side, card_id: CardId) {
        let name = self
            .catalog
            .as_ref()
            .and_then(|c| c.name(&card_id).map(str::to_owned));
        info!(%side, hero = %card_id, name = name.as_deref().unwrap_or("?"), "hero set");
        self.players[side].set_hero(card_id);
    }

    pub fn set_name(&mut self, side: Side, name: String) {
        debug!(%side, %name, "name set");
        self.players[side].set_name(name);
    }

    pub fn set_rank(&mut self, rank: i64) {
        info!(rank, "player rank");
        self.rank = Some(rank);
        self.signals.send_modify(|s| s.rank_found = true);
        self.notify_match();
    }

    pub fn set_game_mode(&mut self, mode: GameMode) {
        info!(?mode, "game mode");
        self.mode = mode;
        self.notify_match();
    }

    pub fn asset_unload(&mut self) {
        self.signals.send_modify(|s| {
            s.last_asset_unload = Some(Instant::now());
            s.awaiting_first_unload = false;
        });
    }

    // === Dispatch ===

    /// Apply one inbound event.
    pub fn apply(&mut self, event: GameEvent) -> Applied {
        if let Some(id) = event.entity().filter(|id| id.is_placeholder()) {
            debug!(entity = %id, "dropped: id in the placeholder range");
            return Applied::Ignored(IgnoreReason::ReservedEntityId);
        }

        match event {
            GameEvent::Start => self.start(),
            GameEvent::End => self.end(),
            GameEvent::EntityCreated { entity, name, card_id, side } => {
                self.create_entity(entity, name, card_id, side)
            }
            GameEvent::TagChange { entity, tag, value } => self.tag_change(entity, tag, value),
            GameEvent::Zone(event) => return self.apply_zone(event),
            GameEvent::Fatigue { side, value } => {
                info!(%side, value, "fatigue");
                self.players[side].set_fatigue(value);
            }
            GameEvent::SetHero { side, card_id } => self.set_hero(side, card_id),
            GameEvent::SetName { side, name } => self.set_name(side, name),
            GameEvent::SetRank { rank } => self.set_rank(rank),
            GameEvent::SetGameMode { mode } => self.set_game_mode(mode),
            GameEvent::AssetUnload => self.asset_unload(),
            GameEvent::MulliganDeclare { side } => info!(%side, "mulligan declared"),
            GameEvent::TurnStart { side, turn } => info!(%side, turn, "turn start"),
            GameEvent::Win => self.win(),
            GameEvent::Loss => self.loss(),
            GameEvent::Tied => self.tied(),
            GameEvent::Concede => self.concede(),
            GameEvent::DetectionFinished { report } => return self.finish_detection(report),
        }
        Applied::Updated
    }

    fn create_entity(&mut self, id: EntityId, name: Option<String>, card_id: Option<CardId>, side: Option<Side>) {
        let entity = self.entities.get_or_create(id);
        if name.is_some() {
            entity.name = name;
        }
        // Ownership of a held entity follows its container.
        if let Some(side) = side.filter(|_| entity.zone.is_none()) {
            entity.is_player = side.is_player();
        }
        if let Some(card_id) = card_id.filter(|c| !c.is_empty()) {
            entity.card_id = Some(card_id.clone());
            self.known_card_ids.insert(id, card_id);
        }
    }

    fn tag_change(&mut self, id: EntityId, tag: GameTag, value: i64) {
        self.entities.set_tag(id, tag, value);

        match tag {
            GameTag::PlayerId => {
                let side = self.entities.get(id).map(Entity::side);
                if let Some(side) = side {
                    self.players[side].id = Some(value);
                }
            }
            GameTag::MulliganState | GameTag::FirstPlayer | GameTag::Turn => {
                self.remember_parity();
                if self.phase == Phase::InMulligan && self.is_mulligan_done() {
                    info!("mulligan done");
                    self.set_phase(Phase::InTurns);
                }
            }
            _ => {}
        }
    }

    fn apply_zone(&mut self, event: ZoneEvent) -> Applied {
        let ZoneEvent { side, transition, entity: id, card_id, turn } = event;
        let card_id = card_id.filter(|c| !c.is_empty());

        if card_id.is_none() && transition.requires_card_id(side) {
            debug!(%side, %transition, entity = %id, "dropped: no card id");
            return Applied::Ignored(IgnoreReason::MissingCardId);
        }

        if transition.is_steal() {
            return self.steal(side, transition, id, turn);
        }

        let holder = self.entities.get(id).and_then(Entity::held_by);
        let side = match holder.filter(|h| *h != side) {
            // A reveal stays with whoever holds the entity.
            Some(holder) if transition.destination().is_none() && !transition.detaches() => holder,
            // Keep membership exclusive across both sides.
            Some(holder) => {
                debug!(entity = %id, from = %holder, to = %side, "entity changes sides");
                self.players[holder].release(&mut self.entities, id);
                side
            }
            None => side,
        };

        let applied = self.players[side].apply(&mut self.entities, transition, id, card_id.as_ref(), turn);

        if !applied.is_ignored() {
            if let Some(card_id) = card_id {
                self.known_card_ids.insert(id, card_id);
            }
            if applied == Applied::Revealed {
                self.joust_reveals += 1;
            }
        }
        applied
    }

    /// `side` names the owner for `StolenByOpponent` and the receiver for
    /// `StolenFromOpponent`; both halves of the move are applied either way.
    /// An entity the log never mentioned cannot be stolen.
    fn steal(&mut self, side: Side, transition: Transition, id: EntityId, turn: u32) -> Applied {
        let owner = match transition {
            Transition::StolenByOpponent => side,
            _ => side.other(),
        };
        if !self.entities.contains(id) {
            warn!(entity = %id, turn, "steal of an unknown entity");
            return Applied::Ignored(IgnoreReason::UnknownEntity);
        }
        let (loser, receiver) = self.players.pair_mut(owner);
        loser.stolen_by_opponent(&mut self.entities, id, turn);
        receiver.stolen_from_opponent(&mut self.entities, id, turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::DetectionOutcome;
    use crate::zones::Zone;

    const PLAYER: u32 = 2;
    const OPPONENT: u32 = 3;
    const ROOT: u32 = 1;

    /// A started match with the root and both player entities created.
    fn started() -> Game {
        let mut game = Game::new(TrackerConfig::default());
        game.apply(GameEvent::Start);
        game.apply(GameEvent::EntityCreated {
            entity: EntityId(ROOT),
            name: Some("GameEntity".into()),
            card_id: None,
            side: None,
        });
        for (id, side) in [(PLAYER, Side::Player), (OPPONENT, Side::Opponent)] {
            game.apply(GameEvent::EntityCreated {
                entity: EntityId(id),
                name: None,
                card_id: None,
                side: Some(side),
            });
            game.apply(GameEvent::tag(id, GameTag::PlayerId, i64::from(id) - 1));
        }
        game
    }

    fn finish_mulligan(game: &mut Game) {
        for id in [PLAYER, OPPONENT] {
            game.apply(GameEvent::tag(id, GameTag::MulliganState, Mulligan::Done.value()));
        }
    }

    #[test]
    fn test_start_enters_mulligan() {
        let game = started();
        assert_eq!(game.phase(), Phase::InMulligan);
        assert_eq!(game.previous_phase(), Phase::NotStarted);
        assert!(game.started_at().is_some());
        assert_eq!(game.player().id, Some(1));
        assert_eq!(game.opponent().id, Some(2));
    }

    #[test]
    fn test_start_is_noop_in_progress() {
        let mut game = started();
        game.apply(GameEvent::zone(Side::Opponent, Transition::Draw, 40u32).into());
        game.apply(GameEvent::Start);
        assert_eq!(game.opponent().zones().locate(EntityId(40)), Some(Zone::Hand));
    }

    #[test]
    fn test_mulligan_done_needs_both_sides() {
        let mut game = started();
        assert!(!game.is_mulligan_done());

        game.apply(GameEvent::tag(PLAYER, GameTag::MulliganState, Mulligan::Done.value()));
        assert!(!game.is_mulligan_done());

        game.apply(GameEvent::tag(OPPONENT, GameTag::MulliganState, Mulligan::Waiting.value()));
        assert!(!game.is_mulligan_done());

        game.apply(GameEvent::tag(OPPONENT, GameTag::MulliganState, Mulligan::Done.value()));
        assert!(game.is_mulligan_done());
        assert_eq!(game.phase(), Phase::InTurns);
    }

    #[test]
    fn test_turn_number_player_first() {
        let mut game = started();
        game.apply(GameEvent::tag(PLAYER, GameTag::FirstPlayer, 1));
        game.apply(GameEvent::tag(ROOT, GameTag::Turn, 1));
        assert_eq!(game.turn_number(), 0);

        finish_mulligan(&mut game);
        // Parity 0: the root TURN tag is halved as is.
        let turns: Vec<i64> = (1..=6)
            .map(|t| {
                game.apply(GameEvent::tag(ROOT, GameTag::Turn, t));
                game.turn_number()
            })
            .collect();
        assert_eq!(turns, vec![0, 1, 1, 2, 2, 3]);
    }

    #[test]
    fn test_turn_number_opponent_first() {
        let mut game = started();
        game.apply(GameEvent::tag(OPPONENT, GameTag::FirstPlayer, 1));
        finish_mulligan(&mut game);

        let turns: Vec<i64> = (1..=4)
            .map(|t| {
                game.apply(GameEvent::tag(ROOT, GameTag::Turn, t));
                game.turn_number()
            })
            .collect();
        assert_eq!(turns, vec![1, 1, 2, 2]);
    }

    #[test]
    fn test_players_turn() {
        let mut game = started();
        assert!(!game.players_turn());

        game.apply(GameEvent::tag(OPPONENT, GameTag::FirstPlayer, 1));
        game.apply(GameEvent::tag(ROOT, GameTag::Turn, 2));
        assert!(game.players_turn());

        game.apply(GameEvent::tag(ROOT, GameTag::Turn, 3));
        assert!(!game.players_turn());
    }

    #[test]
    fn test_missing_card_id_is_ignored() {
        let mut game = started();
        let outcome = game.apply(GameEvent::zone(Side::Player, Transition::Draw, 50u32).into());
        assert_eq!(outcome, Applied::Ignored(IgnoreReason::MissingCardId));
        assert!(!game.entities().contains(EntityId(50)));

        let outcome = game.apply(GameEvent::zone(Side::Opponent, Transition::Draw, 51u32).into());
        assert!(matches!(outcome, Applied::Moved { to: Some(Zone::Hand), .. }));
    }

    #[test]
    fn test_cross_side_move_releases_other_side() {
        let mut game = started();
        game.apply(GameEvent::zone(Side::Opponent, Transition::CreateInPlay, 60u32).into());
        game.apply(
            GameEvent::zone(Side::Player, Transition::CreateInHand, 60u32)
                .with_card("EX1_339")
                .into(),
        );

        assert_eq!(game.opponent().zones().locate(EntityId(60)), None);
        assert_eq!(game.player().zones().locate(EntityId(60)), Some(Zone::Hand));
        assert_eq!(game.known_card_id(EntityId(60)), Some(&CardId::new("EX1_339")));
    }

    #[test]
    fn test_steal_moves_board_to_board() {
        let mut game = started();
        game.apply(
            GameEvent::zone(Side::Player, Transition::Play, 70u32)
                .with_card("CS2_120")
                .into(),
        );
        let outcome = game.apply(GameEvent::zone(Side::Player, Transition::StolenByOpponent, 70u32).into());

        assert_eq!(outcome, Applied::Moved { from: None, to: Some(Zone::Board) });
        assert_eq!(game.player().zones().locate(EntityId(70)), None);
        assert_eq!(game.opponent().zones().locate(EntityId(70)), Some(Zone::Board));
        assert!(!game.entities().get(EntityId(70)).unwrap().is_player);
    }

    #[test]
    fn test_joust_reveal_counts_without_moving() {
        let mut game = started();
        game.apply(GameEvent::zone(Side::Opponent, Transition::CreateInDeck, 80u32).into());
        let outcome = game.apply(
            GameEvent::zone(Side::Opponent, Transition::JoustReveal, 80u32)
                .with_card("AT_001")
                .into(),
        );

        assert_eq!(outcome, Applied::Revealed);
        assert_eq!(game.joust_reveals(), 1);
        assert_eq!(game.opponent().zones().locate(EntityId(80)), Some(Zone::Deck));
    }

    #[test]
    fn test_end_without_detector_finalizes() {
        let mut game = started();
        game.apply(GameEvent::Win);
        game.apply(GameEvent::End);

        assert_eq!(game.phase(), Phase::Ended);
        assert_eq!(game.result(), GameResult::Win);
        assert_eq!(game.mode(), GameMode::Unknown);
        assert!(game.summary().duration().is_some());
    }

    #[test]
    fn test_detection_report_without_detector_is_stale() {
        let mut game = started();
        game.apply(GameEvent::End);
        let report = DetectionReport {
            generation: 0,
            stage: DetectionStage::Mode,
            outcome: DetectionOutcome::TimedOut,
        };
        assert_eq!(
            game.apply(GameEvent::DetectionFinished { report }),
            Applied::Ignored(IgnoreReason::StaleDetection)
        );
    }

    #[test]
    fn test_rank_raises_signal() {
        let mut game = Game::new(TrackerConfig::default());
        let signals = game.subscribe_signals();
        game.apply(GameEvent::SetRank { rank: 15 });
        assert!(signals.borrow().rank_found);
        assert_eq!(game.rank(), Some(15));

        game.apply(GameEvent::AssetUnload);
        assert!(!signals.borrow().awaiting_first_unload);

        game.reset();
        assert!(!signals.borrow().rank_found);
        assert_eq!(game.rank(), None);
    }

    #[test]
    fn test_reset_reseeds_active_deck() {
        let mut game = Game::new(TrackerConfig::default());
        let deck = Arc::new(Deck::new("Face").with_card("CS2_189", 2).with_card("EX1_116", 1));
        game.set_active_deck(deck);
        assert_eq!(game.player().zones().zone_size(Zone::Deck), 3);

        game.reset();
        game.reset();
        assert_eq!(game.player().zones().zone_size(Zone::Deck), 3);
        assert_eq!(game.active_deck().map(Deck::card_count), Some(3));
    }

    #[test]
    fn test_hero_and_name() {
        let mut game = started();
        game.apply(GameEvent::SetHero {
            side: Side::Opponent,
            card_id: CardId::new("HERO_08"),
        });
        game.apply(GameEvent::SetName {
            side: Side::Player,
            name: "BehEh".into(),
        });
        assert_eq!(game.opponent().hero, Some(CardId::new("HERO_08")));
        assert_eq!(game.player().name.as_deref(), Some("BehEh"));
    }

    #[test]
    fn test_entity_lookups() {
        let game = started();
        assert_eq!(game.player_entity().map(|e| e.id), Some(EntityId(PLAYER)));
        assert_eq!(game.opponent_entity().map(|e| e.id), Some(EntityId(OPPONENT)));
        assert_eq!(game.match_root().map(|e| e.id), Some(EntityId(ROOT)));
    }

    #[test]
    fn test_cross_side_joust_keeps_zone() {
        let mut game = started();
        game.apply(
            GameEvent::zone(Side::Player, Transition::CreateInDeck, 50u32)
                .with_card("AT_001")
                .into(),
        );
        let outcome = game.apply(
            GameEvent::zone(Side::Opponent, Transition::JoustReveal, 50u32)
                .with_card("AT_001")
                .into(),
        );

        assert_eq!(outcome, Applied::Revealed);
        assert_eq!(game.player().zones().locate(EntityId(50)), Some(Zone::Deck));
        assert_eq!(game.opponent().zones().locate(EntityId(50)), None);
        let entity = game.entities().get(EntityId(50)).unwrap();
        assert_eq!(entity.zone, Some(Zone::Deck));
        assert!(entity.is_player);
    }

    #[test]
    fn test_cross_side_removal_untracks() {
        let mut game = started();
        game.apply(GameEvent::zone(Side::Opponent, Transition::CreateInDeck, 52u32).into());
        game.apply(GameEvent::zone(Side::Player, Transition::RemoveFromDeck, 52u32).into());

        assert_eq!(game.opponent().zones().locate(EntityId(52)), None);
        assert_eq!(game.player().zones().locate(EntityId(52)), None);
        assert_eq!(game.entities().get(EntityId(52)).unwrap().zone, None);
    }

    #[test]
    fn test_steal_of_unknown_entity_is_ignored() {
        let mut game = started();
        let outcome = game.apply(GameEvent::zone(Side::Player, Transition::StolenFromOpponent, 77u32).into());

        assert_eq!(outcome, Applied::Ignored(IgnoreReason::UnknownEntity));
        assert!(!game.entities().contains(EntityId(77)));
        assert_eq!(game.player().zones().total(), 0);
    }

    #[test]
    fn test_placeholder_range_ids_are_ignored() {
        let mut game = Game::new(TrackerConfig::default());
        game.set_active_deck(Arc::new(Deck::new("One").with_card("CS2_029", 1)));
        let seeded = EntityId::placeholder(0);

        let outcome = game.apply(GameEvent::zone(Side::Opponent, Transition::Play, seeded).into());
        assert_eq!(outcome, Applied::Ignored(IgnoreReason::ReservedEntityId));
        let outcome = game.apply(GameEvent::tag(seeded, GameTag::Zone, 1));
        assert_eq!(outcome, Applied::Ignored(IgnoreReason::ReservedEntityId));

        assert_eq!(game.player().zones().locate(seeded), Some(Zone::Deck));
        assert!(!game.entities().get(seeded).unwrap().has_tag(GameTag::Zone));
    }

    #[test]
    fn test_identity_changes_reach_side_tracker() {
        use crate::tracker::PlayerView;
        use std::sync::Mutex;

        #[derive(Default)]
        struct Recorder {
            views: Mutex<Vec<PlayerView>>,
        }

        impl SideTracker for Recorder {
            fn update(&self, view: &PlayerView) {
                self.views.lock().unwrap().push(view.clone());
            }
        }

        let mut game = started();
        let recorder = Arc::new(Recorder::default());
        game.attach_tracker(Side::Player, Box::new(recorder.clone()));

        game.apply(GameEvent::SetName {
            side: Side::Player,
            name: "BehEh".into(),
        });
        game.apply(GameEvent::SetHero {
            side: Side::Player,
            card_id: CardId::new("HERO_08"),
        });

        let views = recorder.views.lock().unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[1].name.as_deref(), Some("BehEh"));
        assert_eq!(views[1].hero, Some(CardId::new("HERO_08")));
    }
}
