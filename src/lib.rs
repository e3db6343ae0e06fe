//! Bullet Tac Toe - tic-tac-toe inside a bullet-hell arena
//!
//! Core modules:
//! - `sim`: Simulation (entities, board, search, turns, session, tick)
//! - `events`: Synchronous publish/subscribe bus
//! - `renderer`: Draw surface abstraction and scene drawing
//! - `input`: Polled key-state provider
//! - `settings`: Configuration surface and difficulty tables
//! - `runner`: Fixed-rate driver for a session

pub mod events;
pub mod input;
pub mod renderer;
pub mod runner;
pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use events::{EventBus, GameEvent};
pub use runner::Runner;
pub use scoreboard::Scoreboard;
pub use settings::{AiDifficulty, ObstacleDifficulty, Settings};

use glam::Vec2;

use sim::Cell;

/// Game configuration constants
pub mod consts {
    /// Default simulation rate (steps per second)
    pub const DEFAULT_TICK_RATE: u32 = 120;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest real frame the runner will catch up on (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions (square)
    pub const ARENA_SIZE: f32 = 540.0;
    /// Board is 3x3
    pub const GRID_DIM: usize = 3;
    pub const CELL_SIZE: f32 = ARENA_SIZE / GRID_DIM as f32;

    /// Avatar defaults
    pub const AVATAR_SIZE: f32 = 30.0;
    /// Avatar speed (units per second)
    pub const AVATAR_SPEED: f32 = 300.0;

    /// Computer "thinking" pause before it places (seconds)
    pub const DEFAULT_THINK_DELAY: f32 = 0.6;
}

/// Map a point in arena space to the board cell containing it.
///
/// Rows follow `y`, columns follow `x`. Points outside the arena have no cell.
pub fn cell_at(point: Vec2) -> Option<Cell> {
    use consts::{ARENA_SIZE, CELL_SIZE, GRID_DIM};

    if !(0.0..=ARENA_SIZE).contains(&point.x) || !(0.0..=ARENA_SIZE).contains(&point.y) {
        return None;
    }
    // The far edge belongs to the last cell
    let col = ((point.x / CELL_SIZE) as usize).min(GRID_DIM - 1);
    let row = ((point.y / CELL_SIZE) as usize).min(GRID_DIM - 1);
    Some(Cell::new(row, col))
}

/// Top-left corner of a cell in arena space
#[inline]
pub fn cell_origin(cell: Cell) -> Vec2 {
    Vec2::new(
        cell.col as f32 * consts::CELL_SIZE,
        cell.row as f32 * consts::CELL_SIZE,
    )
}

/// Center of a cell in arena space
#[inline]
pub fn cell_center(cell: Cell) -> Vec2 {
    cell_origin(cell) + Vec2::splat(consts::CELL_SIZE / 2.0)
}
