//! Game state and core simulation types
//!
//! The simulation owns every live entity; nothing here is shared outside it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::SimConfig;

/// Where a bubble is in its lifecycle. Removal is not a phase: a removed
/// bubble is simply gone from [`GameState::bubbles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubblePhase {
    /// Drifting upward, can be tapped
    Rising,
    /// Playing its pop animation, immune to taps
    Popping,
}

/// A rising bubble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    /// Centre in surface pixels (origin top-left, y down)
    pub pos: Vec2,
    pub radius: f32,
    /// Upward px per tick
    pub speed: f32,
    /// Wobble phase advance per tick (radians)
    pub wobble_speed: f32,
    /// Horizontal wobble amplitude (px)
    pub wobble_amount: f32,
    pub wobble_phase: f32,
    /// Degrees, 0-360
    pub hue: f32,
    /// Fades on every tap that doesn't pop
    pub opacity: f32,
    pub saturation: f32,
    pub brightness: f32,
    pub glow_intensity: f32,
    pub required_taps: u32,
    pub current_taps: u32,
    pub is_popping: bool,
    /// 0 → 1 while popping
    pub popping_progress: f32,
}

impl Bubble {
    pub fn phase(&self) -> BubblePhase {
        if self.is_popping {
            BubblePhase::Popping
        } else {
            BubblePhase::Rising
        }
    }

    /// Taps still needed before the bubble pops
    pub fn remaining_taps(&self) -> u32 {
        self.required_taps.saturating_sub(self.current_taps)
    }

    /// Pop animation has finished
    pub fn pop_finished(&self) -> bool {
        self.is_popping && self.popping_progress >= 1.0
    }
}

/// A fragment of a pop burst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// px per tick; `vel.y` grows every tick (gravity)
    pub vel: Vec2,
    /// 1.0 at birth, removed at <= 0
    pub life: f32,
    pub hue: f32,
    pub size: f32,
}

impl Particle {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Outbound notifications for collaborators (audio, haptics, stats).
///
/// Fire-and-forget: the simulation never waits on whoever drains them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A tap completed a bubble
    Popped { id: u32, pos: Vec2, hue: f32 },
    /// A tap landed but the bubble needs more
    PartialTap { id: u32, current_taps: u32, required_taps: u32 },
}

/// Complete simulation state (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Random source for spawns and bursts
    pub rng: Pcg32,
    /// Visible area in surface pixels
    pub surface: Vec2,
    /// Active tunables
    pub config: SimConfig,
    /// Live bubbles (ascending id, spawn order)
    pub bubbles: Vec<Bubble>,
    /// Live particles (oldest first)
    pub particles: Vec<Particle>,
    /// Notifications not yet drained by the host
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated time (ms)
    pub clock_ms: f64,
    /// Simulated time of the last spawn (ms)
    pub last_spawn_ms: f64,
    /// Bubbles popped this session
    pub pops: u64,
    /// Taps that landed on a bubble this session
    pub taps: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an empty world for a surface of the given size
    pub fn new(seed: u64, surface: Vec2, config: SimConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            surface: surface.max(Vec2::ZERO),
            config: config.sanitized(),
            bubbles: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
            time_ticks: 0,
            clock_ms: 0.0,
            last_spawn_ms: 0.0,
            pops: 0,
            taps: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Install new tunables. Live bubbles keep their creation-time values.
    pub fn apply_config(&mut self, config: SimConfig) {
        self.config = config.sanitized();
        log::info!("Simulation config applied: {:?}", self.config);
    }

    /// The visible area changed size
    pub fn resize(&mut self, surface: Vec2) {
        self.surface = surface.max(Vec2::ZERO);
        log::info!("Surface resized to {}x{}", self.surface.x, self.surface.y);
    }

    /// Take every pending notification, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn bubble(&self, id: u32) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }
}
