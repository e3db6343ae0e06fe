//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only (one stream for the computer, one for obstacles)
//! - Drawing goes through a `DrawSurface`, never platform APIs

pub mod board;
pub mod entity;
pub mod obstacles;
pub mod search;
pub mod state;
pub mod tick;
pub mod timer;
pub mod turn;

pub use board::{Board, Cell, LINES, Marker, Outcome, check_win};
pub use entity::{Aabb, Avatar, Direction, Entity, Obstacle};
pub use obstacles::ObstacleField;
pub use search::{best_move, choose_move, minimax};
pub use state::{GameSession, SessionPhase};
pub use tick::{TickInput, tick};
pub use timer::{Scheduler, TimerHandle};
pub use turn::{PlaceResult, Player, Role, TurnCoordinator, TurnState};
