//! Running tally of finished games
//!
//! Lives for the process only; results are fed from each session's
//! `game-over` topic.

use std::cell::RefCell;
use std::rc::Rc;

use crate::events::{EventBus, GameEnd, GameEvent, Handler, handler, topics};
use crate::sim::{Marker, Outcome};

/// Maximum number of recent results to keep
pub const MAX_RECENT: usize = 10;

/// A finished game from the human's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    HumanWin,
    ComputerWin,
    Tie,
    /// The avatar was hit before the board was decided
    Crashed,
}

impl GameResult {
    pub fn from_end(end: GameEnd, human: Marker) -> Self {
        match end {
            GameEnd::Decided(Outcome::Win(m)) if m == human => GameResult::HumanWin,
            GameEnd::Decided(Outcome::Win(_)) => GameResult::ComputerWin,
            GameEnd::Decided(Outcome::Tie) => GameResult::Tie,
            GameEnd::Collision => GameResult::Crashed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::HumanWin => "win",
            GameResult::ComputerWin => "loss",
            GameResult::Tie => "tie",
            GameResult::Crashed => "crashed",
        }
    }
}

/// Result counters plus the most recent results (newest first)
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    pub human_wins: u32,
    pub computer_wins: u32,
    pub ties: u32,
    pub crashes: u32,
    pub recent: Vec<GameResult>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: GameResult) {
        match result {
            GameResult::HumanWin => self.human_wins += 1,
            GameResult::ComputerWin => self.computer_wins += 1,
            GameResult::Tie => self.ties += 1,
            GameResult::Crashed => self.crashes += 1,
        }
        self.recent.insert(0, result);
        self.recent.truncate(MAX_RECENT);
        log::info!("Recorded {} ({})", result.as_str(), self.summary());
    }

    pub fn games(&self) -> u32 {
        self.human_wins + self.computer_wins + self.ties + self.crashes
    }

    pub fn summary(&self) -> String {
        format!(
            "W {} / L {} / T {} / crashed {}",
            self.human_wins, self.computer_wins, self.ties, self.crashes
        )
    }

    /// Record every `game-over` on `bus` for the human playing `human`
    pub fn attach(board: &Rc<RefCell<Self>>, bus: &EventBus, human: Marker) -> Handler<GameEvent> {
        let board = Rc::downgrade(board);
        let on_over = handler(move |event: Option<&GameEvent>| {
            let Some(GameEvent::GameOver(end)) = event else {
                return;
            };
            if let Some(board) = board.upgrade() {
                board.borrow_mut().record(GameResult::from_end(*end, human));
            }
        });
        bus.subscribe(topics::GAME_OVER, on_over.clone());
        on_over
    }
}
