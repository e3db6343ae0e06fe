//! Session state
//!
//! Everything that lives for exactly one game: board, avatar, obstacle
//! field, turn coordinator, frame counter and RNG. A restart builds a fresh
//! session rather than patching this one.

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::board::{Board, Cell, Outcome};
use super::entity::Avatar;
use super::obstacles::ObstacleField;
use super::turn::{PlaceResult, Player, Role, TurnCoordinator};
use crate::cell_at;
use crate::events::{EventBus, GameEnd, GameEvent, handler, topics};
use crate::settings::Settings;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Built but not started
    Pending,
    Running,
    Paused,
    /// Terminal until a restart
    Ended(GameEnd),
}

/// One game from start to finish
pub struct GameSession {
    pub phase: SessionPhase,
    pub settings: Settings,
    pub board: Board,
    pub avatar: Avatar,
    pub turns: TurnCoordinator,
    obstacles: Rc<RefCell<ObstacleField>>,
    bus: Rc<EventBus>,
    /// Game-over notices delivered by the bus, applied after each publish
    ended: Rc<RefCell<Option<GameEnd>>>,
    /// Simulated frames since start
    pub frame: u64,
    pub seed: u64,
    rng: Pcg32,
    /// Autopilot's chosen cell for the board it was computed on
    pub(crate) autopilot_target: Option<(Board, Cell)>,
}

impl GameSession {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let bus = Rc::new(EventBus::new());

        let human = Player::new(settings.player_name.clone(), settings.marker, Role::Human);
        let computer = Player::new(
            "Computer",
            settings.computer_marker(),
            Role::Computer {
                randomness: settings.ai_difficulty.randomness(),
            },
        );
        let turns = TurnCoordinator::new(human, computer, settings.think_delay_secs, bus.clone());

        let obstacles = Rc::new(RefCell::new(ObstacleField::new(
            settings.obstacle_difficulty.tier(),
            seed.wrapping_add(1),
            &bus,
        )));
        ObstacleField::attach(&obstacles, &bus);

        let ended = Rc::new(RefCell::new(None));
        let sink = ended.clone();
        bus.subscribe(
            topics::GAME_OVER,
            handler(move |event: Option<&GameEvent>| {
                if let Some(GameEvent::GameOver(end)) = event {
                    sink.borrow_mut().get_or_insert(*end);
                }
            }),
        );

        Self {
            phase: SessionPhase::Pending,
            settings,
            board: Board::new(),
            avatar: Avatar::default(),
            turns,
            obstacles,
            bus,
            ended,
            frame: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            autopilot_target: None,
        }
    }

    /// The session's bus, for outside subscribers (scoreboard, audio, UI)
    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn obstacles(&self) -> &Rc<RefCell<ObstacleField>> {
        &self.obstacles
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, SessionPhase::Ended(_))
    }

    /// Outcome of the board, if the session ended on one
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            SessionPhase::Ended(GameEnd::Decided(outcome)) => Some(outcome),
            _ => None,
        }
    }

    /// Pending -> Running. Hands out the first turn.
    pub fn start(&mut self) {
        if self.phase != SessionPhase::Pending {
            return;
        }
        log::info!(
            "Session started (seed {}, {} {}, obstacles {}, {} opens)",
            self.seed,
            self.turns.computer().name,
            self.settings.ai_difficulty.as_str(),
            self.settings.obstacle_difficulty.as_str(),
            if self.settings.human_moves_first() {
                "human"
            } else {
                "computer"
            }
        );
        self.phase = SessionPhase::Running;
        self.turns.begin();
        self.apply_game_over();
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            SessionPhase::Running => SessionPhase::Paused,
            SessionPhase::Paused => SessionPhase::Running,
            other => other,
        };
    }

    /// Enter the terminal phase: timers cancelled, obstacles dropped, bus
    /// subscriptions released.
    pub fn end(&mut self, end: GameEnd) {
        if self.is_ended() {
            return;
        }
        self.turns.end(end);
        self.obstacles.borrow_mut().clear();
        self.bus.clear();
        self.phase = SessionPhase::Ended(end);
        log::info!("Session ended after {} frames: {end:?}", self.frame);
    }

    /// Apply a game-over delivered through the bus. Returns true if the
    /// session is now ended.
    pub fn apply_game_over(&mut self) -> bool {
        let end = self.ended.borrow_mut().take();
        if let Some(end) = end {
            self.end(end);
        }
        self.is_ended()
    }

    /// Drive the computer's thinking timer by `dt`
    pub fn advance_turns(&mut self, dt: f32) -> Option<PlaceResult> {
        self.turns.advance(dt, &mut self.board, &mut self.rng)
    }

    /// Human placement at the avatar's current cell
    pub fn place_at_avatar(&mut self) -> PlaceResult {
        match cell_at(self.avatar.center()) {
            Some(cell) => self.turns.place_human(&mut self.board, cell),
            None => PlaceResult::Rejected,
        }
    }
}
