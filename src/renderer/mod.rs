//! Rendering module
//!
//! The canvas is an opaque [`DrawSurface`]; `shapes` turns game state into
//! primitive calls.

pub mod shapes;
pub mod surface;

pub use surface::{Color, DrawCommand, DrawSurface, Recorder, colors};
