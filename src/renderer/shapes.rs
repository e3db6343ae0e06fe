//! Scene drawing on top of the primitive surface

use glam::Vec2;
use std::f32::consts::TAU;

use super::surface::{Color, DrawSurface, colors};
use crate::consts::{ARENA_SIZE, CELL_SIZE, GRID_DIM};
use crate::sim::{Board, Cell, Entity, Marker, Obstacle};
use crate::{cell_center, cell_origin};

const GRID_LINE_WIDTH: f32 = 1.0;
const MARKER_LINE_WIDTH: f32 = 8.0;
/// Marker extent relative to the cell
const MARKER_SCALE: f32 = 0.3;

/// Clear the whole canvas
pub fn clear(surface: &mut dyn DrawSurface) {
    surface.clear(Vec2::ZERO, Vec2::splat(ARENA_SIZE));
}

/// Grid lines, outer border included
pub fn grid(surface: &mut dyn DrawSurface) {
    for i in 0..=GRID_DIM {
        let offset = i as f32 * CELL_SIZE;
        surface.stroke_line(
            Vec2::new(offset, 0.0),
            Vec2::new(offset, ARENA_SIZE),
            GRID_LINE_WIDTH,
            colors::GRID,
        );
        surface.stroke_line(
            Vec2::new(0.0, offset),
            Vec2::new(ARENA_SIZE, offset),
            GRID_LINE_WIDTH,
            colors::GRID,
        );
    }
}

/// Faint fill over the cell the human would place on
pub fn cell_highlight(surface: &mut dyn DrawSurface, cell: Cell) {
    surface.fill_rect(
        cell_origin(cell),
        Vec2::splat(CELL_SIZE),
        colors::CELL_HIGHLIGHT,
    );
}

/// One marker centered in its cell
pub fn marker(surface: &mut dyn DrawSurface, cell: Cell, marker: Marker) {
    let center = cell_center(cell);
    let r = CELL_SIZE * MARKER_SCALE;

    match marker {
        Marker::X => {
            surface.stroke_line(
                center + Vec2::new(-r, -r),
                center + Vec2::new(r, r),
                MARKER_LINE_WIDTH,
                colors::MARKER_X,
            );
            surface.stroke_line(
                center + Vec2::new(r, -r),
                center + Vec2::new(-r, r),
                MARKER_LINE_WIDTH,
                colors::MARKER_X,
            );
        }
        Marker::O => {
            surface.stroke_arc(center, r, 0.0, TAU, MARKER_LINE_WIDTH, colors::MARKER_O);
        }
    }
}

/// Every placed marker
pub fn markers(surface: &mut dyn DrawSurface, board: &Board) {
    for (cell, m) in board.placed() {
        marker(surface, cell, m);
    }
}

/// Filled box for any entity
pub fn entity(surface: &mut dyn DrawSurface, entity: &dyn Entity, color: Color) {
    surface.fill_rect(entity.position(), entity.size(), color);
}

pub fn obstacles(surface: &mut dyn DrawSurface, obstacles: &[Obstacle]) {
    for o in obstacles {
        entity(surface, o, colors::OBSTACLE);
    }
}
