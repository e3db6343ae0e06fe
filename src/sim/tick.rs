//! Fixed timestep simulation tick
//!
//! One call draws and advances one frame:
//! clear -> grid -> markers -> avatar -> obstacles -> `frame-complete`.
//! The obstacle field reacts to `frame-complete`; any game-over delivered
//! through the bus during the tick is applied before returning.

use glam::Vec2;

use super::entity::Entity;
use super::search::best_move;
use super::state::GameSession;
use crate::consts::CELL_SIZE;
use crate::events::{GameEvent, topics};
use crate::renderer::{DrawSurface, colors, shapes};
use crate::{cell_at, cell_center};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Place a marker on the avatar's cell
    pub place: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the avatar walks to the searched cell and places there
    pub autopilot: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32, surface: &mut dyn DrawSurface) {
    if input.pause {
        session.toggle_pause();
    }

    // Don't tick unless running
    if !session.is_running() {
        return;
    }

    session.frame += 1;

    // Computer's thinking timer
    session.advance_turns(dt);
    if session.apply_game_over() {
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(session, &mut input);
    }
    let input = &input;

    // Static layer
    shapes::clear(surface);
    shapes::grid(surface);
    if session.turns.human_can_place() {
        if let Some(cell) = cell_at(session.avatar.center()).filter(|c| session.board.is_empty_at(*c)) {
            shapes::cell_highlight(surface, cell);
        }
    }
    shapes::markers(surface, &session.board);

    // Avatar
    session
        .avatar
        .steer(input.left, input.right, input.up, input.down);
    session.avatar.advance(dt);
    session.avatar.clamp_to_arena();
    shapes::entity(surface, &session.avatar, colors::AVATAR);

    if input.place {
        session.place_at_avatar();
        if session.apply_game_over() {
            return;
        }
    }

    // Obstacles
    {
        let mut field = session.obstacles().borrow_mut();
        field.advance_all(dt);
        shapes::obstacles(surface, field.obstacles());
    }

    let event = GameEvent::FrameComplete {
        frame: session.frame,
        dt,
        avatar: session.avatar.bounds(),
    };
    session.bus().publish(topics::FRAME_COMPLETE, Some(&event));
    session.apply_game_over();
}

/// Steer toward the cell search picks for the human, and place once there
fn autopilot(session: &mut GameSession, input: &mut TickInput) {
    input.left = false;
    input.right = false;
    input.up = false;
    input.down = false;
    input.place = false;

    if !session.turns.human_can_place() {
        return;
    }

    let board = session.board;
    let target = match session.autopilot_target {
        Some((seen, cell)) if seen == board => cell,
        _ => {
            let Some(cell) = best_move(&board, session.turns.human().marker) else {
                return;
            };
            session.autopilot_target = Some((board, cell));
            cell
        }
    };

    let center = session.avatar.center();
    if cell_at(center) == Some(target) {
        input.place = true;
        return;
    }

    let delta: Vec2 = cell_center(target) - center;
    let deadband = CELL_SIZE / 4.0;
    input.left = delta.x < -deadband;
    input.right = delta.x > deadband;
    input.up = delta.y < -deadband;
    input.down = delta.y > deadband;
}
