//! Turn coordination between the human and the computer
//!
//! ```text
//! AwaitingPlacement(active) --valid placement--> Evaluating
//! Evaluating --decided--> GameOver
//! Evaluating --undecided--> AwaitingPlacement(other)
//! ```
//!
//! The human places by standing on an empty cell and pressing the place
//! key. The computer places automatically once its thinking timer fires.

use std::rc::Rc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, Marker, Outcome, check_win};
use super::search::choose_move;
use super::timer::{Scheduler, TimerHandle};
use crate::events::{EventBus, GameEnd, GameEvent, topics};

/// Who controls a player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Role {
    Human,
    /// `randomness` is the chance of playing a random cell instead of searching
    Computer { randomness: f64 },
}

impl Role {
    pub fn randomness(&self) -> f64 {
        match self {
            Role::Human => 0.0,
            Role::Computer { randomness } => *randomness,
        }
    }

    pub fn is_computer(&self) -> bool {
        matches!(self, Role::Computer { .. })
    }
}

/// A participant, fixed for the whole session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub marker: Marker,
    pub role: Role,
}

impl Player {
    pub fn new(name: impl Into<String>, marker: Marker, role: Role) -> Self {
        Self {
            name: name.into(),
            marker,
            role,
        }
    }
}

/// Coordinator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Nobody has been given the turn yet
    Idle,
    AwaitingPlacement(Marker),
    Evaluating,
    GameOver(GameEnd),
}

/// Result of a placement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceResult {
    /// Not this player's turn, placement disabled, or cell occupied
    Rejected,
    /// Marker placed, game continues
    Placed(Cell),
    /// Marker placed and the board is decided
    Finished(Cell, Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnTask {
    ComputerMove,
}

/// Alternates turns and owns the computer's thinking timer
pub struct TurnCoordinator {
    human: Player,
    computer: Player,
    state: TurnState,
    placement_enabled: bool,
    scheduler: Scheduler<TurnTask>,
    think_timer: Option<TimerHandle>,
    think_delay: f32,
    bus: Rc<EventBus>,
}

impl TurnCoordinator {
    pub fn new(human: Player, computer: Player, think_delay: f32, bus: Rc<EventBus>) -> Self {
        debug_assert_ne!(human.marker, computer.marker);
        Self {
            human,
            computer,
            state: TurnState::Idle,
            placement_enabled: false,
            scheduler: Scheduler::new(),
            think_timer: None,
            think_delay,
            bus,
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn human(&self) -> &Player {
        &self.human
    }

    pub fn computer(&self) -> &Player {
        &self.computer
    }

    /// Player owning `marker`
    pub fn player(&self, marker: Marker) -> &Player {
        if self.human.marker == marker {
            &self.human
        } else {
            &self.computer
        }
    }

    /// Marker whose turn it is, if a placement is awaited
    pub fn active(&self) -> Option<Marker> {
        match self.state {
            TurnState::AwaitingPlacement(marker) => Some(marker),
            _ => None,
        }
    }

    /// True while the human may place
    pub fn human_can_place(&self) -> bool {
        self.placement_enabled && self.active() == Some(self.human.marker)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, TurnState::GameOver(_))
    }

    /// Whether the computer's thinking timer is outstanding
    pub fn computer_thinking(&self) -> bool {
        self.think_timer
            .is_some_and(|handle| self.scheduler.is_pending(handle))
    }

    /// Hand the first turn out. X always opens.
    pub fn begin(&mut self) {
        if self.state != TurnState::Idle {
            return;
        }
        log::info!(
            "{} ({}) vs {} ({})",
            self.human.name,
            self.human.marker.as_str(),
            self.computer.name,
            self.computer.marker.as_str()
        );
        self.give_turn(Marker::X);
    }

    /// Human placement at `cell` (the avatar's current cell)
    pub fn place_human(&mut self, board: &mut Board, cell: Cell) -> PlaceResult {
        if !self.human_can_place() {
            log::debug!("Placement at {cell:?} ignored: not the human's turn");
            return PlaceResult::Rejected;
        }
        self.commit(board, cell)
    }

    /// Advance the thinking timer; places the computer's move when it fires.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        board: &mut Board,
        rng: &mut R,
    ) -> Option<PlaceResult> {
        let mut result = None;
        for task in self.scheduler.advance(dt) {
            match task {
                TurnTask::ComputerMove => {
                    self.think_timer = None;
                    if self.active() != Some(self.computer.marker) {
                        continue;
                    }
                    match choose_move(board, &self.computer, rng) {
                        Some(cell) => result = Some(self.commit(board, cell)),
                        None => log::warn!("Computer has no legal move"),
                    }
                }
            }
        }
        result
    }

    /// Enter the terminal state. All timers are cancelled and input ignored
    /// from here on.
    pub fn end(&mut self, end: GameEnd) {
        if self.is_over() {
            return;
        }
        self.scheduler.cancel_all();
        self.think_timer = None;
        self.placement_enabled = false;
        self.state = TurnState::GameOver(end);
        log::info!("Turns stopped: {end:?}");
    }

    fn give_turn(&mut self, marker: Marker) {
        self.state = TurnState::AwaitingPlacement(marker);
        let role = self.player(marker).role;

        if role.is_computer() {
            self.placement_enabled = false;
            self.think_timer = Some(self.scheduler.schedule(self.think_delay, TurnTask::ComputerMove));
        } else {
            self.placement_enabled = true;
        }

        self.bus.publish(
            topics::TURN_CHANGED,
            Some(&GameEvent::TurnChanged {
                active: marker,
                role,
            }),
        );
    }

    fn commit(&mut self, board: &mut Board, cell: Cell) -> PlaceResult {
        let Some(marker) = self.active() else {
            return PlaceResult::Rejected;
        };
        if !board.place(cell, marker) {
            log::debug!("Cell {cell:?} already taken");
            return PlaceResult::Rejected;
        }

        self.state = TurnState::Evaluating;
        self.placement_enabled = false;
        log::debug!("{} placed {} at {cell:?}", self.player(marker).name, marker.as_str());
        self.bus.publish(
            topics::MARKER_PLACED,
            Some(&GameEvent::MarkerPlaced { cell, marker }),
        );

        // Evaluate the board exactly as it stands after this placement
        match check_win(board) {
            Some(outcome) => {
                let end = GameEnd::Decided(outcome);
                self.end(end);
                self.bus
                    .publish(topics::GAME_OVER, Some(&GameEvent::GameOver(end)));
                PlaceResult::Finished(cell, outcome)
            }
            None => {
                self.give_turn(marker.other());
                PlaceResult::Placed(cell)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::handler;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::cell::RefCell;

    const DELAY: f32 = 0.5;

    fn coordinator(human_marker: Marker) -> (TurnCoordinator, Rc<RefCell<Vec<GameEvent>>>) {
        let bus = Rc::new(EventBus::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        for topic in [topics::MARKER_PLACED, topics::TURN_CHANGED, topics::GAME_OVER] {
            let log = log.clone();
            bus.subscribe(
                topic,
                handler(move |e: Option<&GameEvent>| log.borrow_mut().extend(e.cloned())),
            );
        }
        let human = Player::new("human", human_marker, Role::Human);
        let computer = Player::new(
            "cpu",
            human_marker.other(),
            Role::Computer { randomness: 0.0 },
        );
        (TurnCoordinator::new(human, computer, DELAY, bus), log)
    }

    #[test]
    fn test_human_x_moves_first() {
        let (mut turns, _) = coordinator(Marker::X);
        turns.begin();
        assert_eq!(turns.active(), Some(Marker::X));
        assert!(turns.human_can_place());
        assert!(!turns.computer_thinking());
    }

    #[test]
    fn test_computer_x_thinks_first() {
        let (mut turns, _) = coordinator(Marker::O);
        let mut board = Board::new();
        let mut rng = Pcg32::seed_from_u64(1);
        turns.begin();
        assert_eq!(turns.active(), Some(Marker::X));
        assert!(!turns.human_can_place());
        assert!(turns.computer_thinking());

        // Human input is ignored while the computer thinks
        assert_eq!(turns.place_human(&mut board, Cell::new(0, 0)), PlaceResult::Rejected);
        assert_eq!(board, Board::new());

        assert_eq!(turns.advance(DELAY / 2.0, &mut board, &mut rng), None);
        let result = turns.advance(DELAY / 2.0, &mut board, &mut rng);
        assert!(matches!(result, Some(PlaceResult::Placed(_))));
        assert_eq!(board.count(Marker::X), 1);
        assert!(turns.human_can_place());
    }

    #[test]
    fn test_turn_flow_and_events() {
        let (mut turns, log) = coordinator(Marker::X);
        let mut board = Board::new();
        let mut rng = Pcg32::seed_from_u64(1);
        turns.begin();

        let result = turns.place_human(&mut board, Cell::new(1, 1));
        assert_eq!(result, PlaceResult::Placed(Cell::new(1, 1)));
        assert_eq!(turns.active(), Some(Marker::O));
        assert!(!turns.human_can_place());
        assert!(turns.computer_thinking());

        turns.advance(DELAY, &mut board, &mut rng);
        assert_eq!(board.count(Marker::O), 1);
        assert_eq!(turns.active(), Some(Marker::X));

        let events = log.borrow();
        assert_eq!(
            events[0],
            GameEvent::TurnChanged { active: Marker::X, role: Role::Human }
        );
        assert_eq!(
            events[1],
            GameEvent::MarkerPlaced { cell: Cell::new(1, 1), marker: Marker::X }
        );
        assert!(matches!(events[2], GameEvent::TurnChanged { active: Marker::O, .. }));
        assert!(matches!(events[3], GameEvent::MarkerPlaced { marker: Marker::O, .. }));
    }

    #[test]
    fn test_occupied_cell_rejected_without_events() {
        let (mut turns, log) = coordinator(Marker::X);
        let mut board = Board::new();
        board.place(Cell::new(0, 0), Marker::O);
        turns.begin();
        let events_before = log.borrow().len();

        assert_eq!(turns.place_human(&mut board, Cell::new(0, 0)), PlaceResult::Rejected);
        assert_eq!(log.borrow().len(), events_before);
        assert_eq!(turns.active(), Some(Marker::X));
        assert!(turns.human_can_place());
    }

    #[test]
    fn test_win_ends_game() {
        let (mut turns, log) = coordinator(Marker::X);
        let mut board = Board::new();
        board.place(Cell::new(0, 0), Marker::X);
        board.place(Cell::new(0, 1), Marker::X);
        board.place(Cell::new(1, 0), Marker::O);
        board.place(Cell::new(1, 1), Marker::O);
        turns.begin();

        let result = turns.place_human(&mut board, Cell::new(0, 2));
        assert_eq!(result, PlaceResult::Finished(Cell::new(0, 2), Outcome::Win(Marker::X)));
        assert!(turns.is_over());
        assert!(!turns.computer_thinking());
        assert_eq!(
            log.borrow().last(),
            Some(&GameEvent::GameOver(GameEnd::Decided(Outcome::Win(Marker::X))))
        );

        // Terminal: nothing moves any more
        assert_eq!(turns.place_human(&mut board, Cell::new(2, 2)), PlaceResult::Rejected);
    }

    #[test]
    fn test_end_cancels_pending_computer_move() {
        let (mut turns, _) = coordinator(Marker::O);
        let mut board = Board::new();
        let mut rng = Pcg32::seed_from_u64(1);
        turns.begin();
        assert!(turns.computer_thinking());

        turns.end(GameEnd::Collision);
        assert_eq!(turns.state(), TurnState::GameOver(GameEnd::Collision));
        assert_eq!(turns.advance(10.0, &mut board, &mut rng), None);
        assert_eq!(board, Board::new());
    }
}
