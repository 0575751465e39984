//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, ascending id)
//! - No rendering, audio or platform dependencies

pub mod bubble;
pub mod collision;
pub mod particles;
pub mod state;
pub mod tick;

pub use bubble::{advance_pop, create_bubble, is_off_screen, step_bubble, tap_bubble};
pub use collision::{distance, find_hits, hit_test};
pub use particles::{burst, step_particle};
pub use state::{Bubble, BubblePhase, GameEvent, GameState, Particle};
pub use tick::{pointer_down, tick};
