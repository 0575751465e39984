//! Data-driven game balance
//!
//! Tunables consumed by the simulation and the fixed visual table that ties a
//! bubble's colour intensity to how many taps it needs.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAX_BUBBLES, DEFAULT_SPAWN_COOLDOWN_MS};

/// Highest `required_taps` a bubble can be created with
pub const MAX_TAPS_LIMIT: u32 = 5;

/// Simulation tunables (the core-facing half of [`crate::Settings`])
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Upper bound for the `required_taps` draw (1..=max_taps)
    pub max_taps: u32,
    /// Population cap for live bubbles
    pub max_bubbles: usize,
    /// Minimum time between spawns (ms)
    pub spawn_cooldown_ms: f64,
    /// Multiplier on the rise speed range
    pub speed_scale: f32,
    /// Multiplier on the radius range
    pub size_scale: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_taps: 1,
            max_bubbles: DEFAULT_MAX_BUBBLES,
            spawn_cooldown_ms: DEFAULT_SPAWN_COOLDOWN_MS,
            speed_scale: 1.0,
            size_scale: 1.0,
        }
    }
}

impl SimConfig {
    /// Clamp every field into a range the simulation can run with.
    ///
    /// Bad values are never rejected; the animation loop keeps running.
    pub fn sanitized(self) -> Self {
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        Self {
            max_taps: self.max_taps.clamp(1, MAX_TAPS_LIMIT),
            max_bubbles: self.max_bubbles.clamp(1, 100),
            spawn_cooldown_ms: if self.spawn_cooldown_ms.is_finite() {
                self.spawn_cooldown_ms.clamp(0.0, 60_000.0)
            } else {
                DEFAULT_SPAWN_COOLDOWN_MS
            },
            speed_scale: finite_or(self.speed_scale, 1.0).clamp(0.1, 5.0),
            size_scale: finite_or(self.size_scale, 1.0).clamp(0.1, 5.0),
        }
    }
}

/// Appearance derived once from `required_taps`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualParams {
    /// 0-1
    pub opacity: f32,
    /// Percent
    pub saturation: f32,
    /// Percent (HSL lightness)
    pub brightness: f32,
    /// 0-1, strength of the specular highlight
    pub glow_intensity: f32,
}

/// Harder bubbles are darker, more opaque and glow more
const VISUAL_TABLE: [(u32, VisualParams); 5] = [
    (1, VisualParams { opacity: 0.5, saturation: 50.0, brightness: 90.0, glow_intensity: 0.3 }),
    (2, VisualParams { opacity: 0.7, saturation: 70.0, brightness: 75.0, glow_intensity: 0.6 }),
    (3, VisualParams { opacity: 0.9, saturation: 85.0, brightness: 65.0, glow_intensity: 0.85 }),
    (4, VisualParams { opacity: 0.95, saturation: 90.0, brightness: 60.0, glow_intensity: 0.9 }),
    (5, VisualParams { opacity: 1.0, saturation: 95.0, brightness: 55.0, glow_intensity: 1.0 }),
];

impl VisualParams {
    /// Look up the entry for a tap count; keys outside 1-5 use the entry for 1
    pub fn for_taps(required_taps: u32) -> Self {
        VISUAL_TABLE
            .iter()
            .find(|(taps, _)| *taps == required_taps)
            .map(|(_, params)| *params)
            .unwrap_or(VISUAL_TABLE[0].1)
    }
}
