//! Scene styling: turns bubbles and particles into gradient circles

use glam::Vec2;

use super::{ColorStop, RenderSink};
use crate::hsl_to_rgba;
use crate::sim::{Bubble, GameState, Particle};

/// Transparent; the page background shows through the canvas
pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// How much a bubble grows over its pop animation
const POP_GROWTH: f32 = 0.5;
/// Highlight offset and size, as fractions of the radius
const HIGHLIGHT_OFFSET: f32 = 0.3;
const HIGHLIGHT_SIZE: f32 = 0.4;
/// Particle colour
const PARTICLE_SATURATION: f32 = 70.0;
const PARTICLE_LIGHTNESS: f32 = 60.0;

fn white(alpha: f32) -> [f32; 4] {
    [1.0, 1.0, 1.0, alpha.clamp(0.0, 1.0)]
}

/// Multiply a colour's alpha
fn fade(mut color: [f32; 4], alpha: f32) -> [f32; 4] {
    color[3] = (color[3] * alpha).clamp(0.0, 1.0);
    color
}

/// Body gradient plus a specular highlight; popping bubbles swell and fade
pub fn draw_bubble<S: RenderSink + ?Sized>(sink: &mut S, bubble: &Bubble) {
    let (scale, alpha) = if bubble.is_popping {
        let t = bubble.popping_progress.clamp(0.0, 1.0);
        (1.0 + t * POP_GROWTH, 1.0 - t)
    } else {
        (1.0, 1.0)
    };

    let body = [
        ColorStop::new(0.0, fade(white(bubble.opacity * 0.9), alpha)),
        ColorStop::new(
            0.5,
            fade(
                hsl_to_rgba(bubble.hue, bubble.saturation, bubble.brightness, 1.0),
                alpha,
            ),
        ),
        ColorStop::new(1.0, fade(white(bubble.opacity * 0.3), alpha)),
    ];
    sink.fill_circle(bubble.pos, bubble.radius * scale, &body);

    if !bubble.is_popping {
        let highlight = [
            ColorStop::new(0.0, white(bubble.glow_intensity)),
            ColorStop::new(1.0, white(0.0)),
        ];
        let offset = Vec2::splat(bubble.radius * HIGHLIGHT_OFFSET);
        sink.fill_circle(bubble.pos - offset, bubble.radius * HIGHLIGHT_SIZE, &highlight);
    }
}

/// Flat dot that fades with its remaining life
pub fn draw_particle<S: RenderSink + ?Sized>(sink: &mut S, particle: &Particle) {
    let color = hsl_to_rgba(
        particle.hue,
        PARTICLE_SATURATION,
        PARTICLE_LIGHTNESS,
        particle.life,
    );
    sink.fill_circle(
        particle.pos,
        particle.size,
        &[ColorStop::new(0.0, color), ColorStop::new(1.0, color)],
    );
}

/// Draw one frame: clear, every bubble, then every particle on top
pub fn draw_scene<S: RenderSink + ?Sized>(state: &GameState, sink: &mut S) {
    sink.clear(BACKGROUND);
    for bubble in &state.bubbles {
        draw_bubble(sink, bubble);
    }
    for particle in &state.particles {
        draw_particle(sink, particle);
    }
}
