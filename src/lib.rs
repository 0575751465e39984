//! Bubble Tap - a touch/click bubble popping game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, physics, hit-testing, particles)
//! - `renderer`: Render sink abstraction and the WebGPU backend
//! - `platform`: Loop control and coordinate translation
//! - `settings`: Persisted player preferences
//! - `audio`: Sound cues for game events (Web Audio playback in the browser)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{SimConfig, VisualParams};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in seconds (one tick)
    pub const SIM_DT: f32 = 0.016;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Distance beyond the visible area where bubbles spawn and are culled
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Bubble radius range (px) before the size multiplier
    pub const BUBBLE_MIN_RADIUS: f32 = 30.0;
    pub const BUBBLE_MAX_RADIUS: f32 = 80.0;
    /// Upward speed range (px/tick) before the speed multiplier
    pub const BUBBLE_MIN_SPEED: f32 = 1.0;
    pub const BUBBLE_MAX_SPEED: f32 = 3.0;
    /// Wobble phase advance per tick (radians)
    pub const WOBBLE_MIN_SPEED: f32 = 0.02;
    pub const WOBBLE_MAX_SPEED: f32 = 0.05;
    /// Horizontal wobble amplitude (px)
    pub const WOBBLE_MIN_AMOUNT: f32 = 1.0;
    pub const WOBBLE_MAX_AMOUNT: f32 = 3.0;

    /// Pop animation progress per tick (20 ticks total)
    pub const POP_PROGRESS_STEP: f32 = 0.05;
    /// Opacity multiplier applied on each tap that doesn't pop
    pub const PARTIAL_TAP_FADE: f32 = 0.85;

    /// Particles per burst, half-open range
    pub const BURST_MIN_PARTICLES: usize = 10;
    pub const BURST_MAX_PARTICLES: usize = 20;
    /// Maximum angular jitter added to each particle's spoke (radians)
    pub const BURST_ANGLE_JITTER: f32 = 0.5;
    pub const BURST_MIN_SPEED: f32 = 2.0;
    pub const BURST_MAX_SPEED: f32 = 5.0;
    /// Hue spread around the parent bubble (degrees, either side)
    pub const BURST_HUE_JITTER: f32 = 30.0;
    pub const PARTICLE_MIN_SIZE: f32 = 2.0;
    pub const PARTICLE_MAX_SIZE: f32 = 5.0;
    /// Downward acceleration (px/tick²)
    pub const PARTICLE_GRAVITY: f32 = 0.2;
    /// Life lost per second of `dt`
    pub const PARTICLE_DECAY: f32 = 2.0;
    /// Hard cap on live particles (oldest dropped first)
    pub const MAX_PARTICLES: usize = 512;

    /// Default population cap
    pub const DEFAULT_MAX_BUBBLES: usize = 10;
    /// Default minimum time between spawns (ms)
    pub const DEFAULT_SPAWN_COOLDOWN_MS: f64 = 2000.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = bx - ax;
    let dy = by - ay;
    (dx * dx + dy * dy).sqrt()
}

/// Convert HSL (hue in degrees, saturation/lightness in percent) to sRGB
/// components with the given alpha
pub fn hsl_to_rgba(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> [f32; 4] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m, alpha.clamp(0.0, 1.0)]
}
