//! Rendering module
//!
//! The simulation draws through [`RenderSink`]; [`DrawList`] records the
//! commands and the WebGPU [`RenderState`] turns a recorded frame into
//! instanced, per-pixel radial gradients.

pub mod pipeline;
pub mod scene;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::draw_scene;

use glam::Vec2;

/// One stop of a radial gradient; `offset` runs from centre (0) to rim (1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    /// sRGB + alpha
    pub color: [f32; 4],
}

impl ColorStop {
    pub const fn new(offset: f32, color: [f32; 4]) -> Self {
        Self { offset, color }
    }
}

/// A 2D drawing surface in surface-local pixels (the hit-testing space)
pub trait RenderSink {
    /// Wipe the frame
    fn clear(&mut self, color: [f32; 4]);

    /// Fill a circle with a radial gradient
    fn fill_circle(&mut self, center: Vec2, radius: f32, stops: &[ColorStop]);
}

/// A recorded draw command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear([f32; 4]),
    Circle {
        center: Vec2,
        radius: f32,
        stops: Vec<ColorStop>,
    },
}

/// Records a frame for later playback
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Background colour of the most recent clear, if any
    pub fn clear_color(&self) -> Option<[f32; 4]> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::Clear(color) => Some(*color),
            _ => None,
        })
    }

    /// Circles drawn after the most recent clear
    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, &[ColorStop])> {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(_)))
            .map_or(0, |i| i + 1);
        self.commands[start..].iter().filter_map(|c| match c {
            DrawCommand::Circle {
                center,
                radius,
                stops,
            } => Some((*center, *radius, stops.as_slice())),
            DrawCommand::Clear(_) => None,
        })
    }
}

impl RenderSink for DrawList {
    fn clear(&mut self, color: [f32; 4]) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, stops: &[ColorStop]) {
        if radius <= 0.0 || stops.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            stops: stops.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_starts_new_frame() {
        let mut list = DrawList::new();
        let white = ColorStop::new(0.0, [1.0; 4]);
        list.fill_circle(Vec2::ZERO, 5.0, &[white]);
        list.clear([0.0, 0.0, 0.0, 1.0]);
        list.fill_circle(Vec2::new(1.0, 2.0), 3.0, &[white]);

        assert_eq!(list.clear_color(), Some([0.0, 0.0, 0.0, 1.0]));
        let circles: Vec<_> = list.circles().collect();
        assert_eq!(circles.len(), 1);
        assert_eq!(circles[0].0, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_degenerate_circles_skipped() {
        let mut list = DrawList::new();
        list.fill_circle(Vec2::ZERO, 0.0, &[ColorStop::new(0.0, [1.0; 4])]);
        list.fill_circle(Vec2::ZERO, 4.0, &[]);
        assert!(list.commands.is_empty());
    }
}
