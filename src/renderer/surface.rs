//! Draw surface abstraction
//!
//! The game never reads pixels back. It issues a handful of primitives per
//! tick against a fixed-size square canvas.

use glam::Vec2;

/// RGBA color, each channel 0-1
pub type Color = [f32; 4];

/// Drawing primitives the core needs
pub trait DrawSurface {
    /// Clear a rectangular region
    fn clear(&mut self, origin: Vec2, size: Vec2);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    /// Stroke an arc of a circle, angles in radians
    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        width: f32,
        color: Color,
    );
}

/// A recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        origin: Vec2,
        size: Vec2,
    },
    FillRect {
        origin: Vec2,
        size: Vec2,
        color: Color,
    },
    StrokeLine {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    StrokeArc {
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        width: f32,
        color: Color,
    },
}

/// Surface that records commands for the current frame.
///
/// Used headless and in tests. Each `clear` covering the origin starts a
/// new frame.
#[derive(Debug, Default)]
pub struct Recorder {
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands issued since the last full clear
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of frames started
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn count_fills(&self, color: Color) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::FillRect { color: fill, .. } if *fill == color))
            .count()
    }
}

impl DrawSurface for Recorder {
    fn clear(&mut self, origin: Vec2, size: Vec2) {
        if origin == Vec2::ZERO {
            self.commands.clear();
            self.frames += 1;
        }
        self.commands.push(DrawCommand::Clear { origin, size });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            size,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            width,
            color,
        });
    }

    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        width: f32,
        color: Color,
    ) {
        self.commands.push(DrawCommand::StrokeArc {
            center,
            radius,
            start_angle,
            end_angle,
            width,
            color,
        });
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const GRID: Color = [0.87, 0.87, 0.87, 1.0]; // #ddd
    pub const AVATAR: Color = [1.0, 0.0, 0.0, 1.0];
    pub const OBSTACLE: Color = [0.0, 0.5, 0.0, 1.0];
    pub const MARKER_X: Color = [0.2, 0.4, 1.0, 1.0];
    pub const MARKER_O: Color = [1.0, 0.6, 0.1, 1.0];
    /// Cell highlight under the avatar while the human may place
    pub const CELL_HIGHLIGHT: Color = [1.0, 1.0, 0.6, 0.25];
}
