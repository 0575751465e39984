//! Fixed timestep simulation tick and input routing
//!
//! A tick runs spawn → advance → cull bubbles → advance and cull particles.
//! Pointer presses are handled between ticks, never during one.

use glam::Vec2;

use super::bubble::{advance_pop, create_bubble, is_off_screen, step_bubble, tap_bubble};
use super::collision::find_hits;
use super::particles::{burst, step_particle};
use super::state::{Bubble, GameEvent, GameState};
use crate::consts::*;

/// Advance the game state by one fixed timestep (`dt` in seconds)
pub fn tick(state: &mut GameState, dt: f32) {
    state.clock_ms += f64::from(dt) * 1000.0;
    state.time_ticks += 1;

    // Spawn
    if state.clock_ms - state.last_spawn_ms > state.config.spawn_cooldown_ms
        && state.bubbles.len() < state.config.max_bubbles
    {
        let id = state.next_entity_id();
        let bubble = create_bubble(&mut state.rng, state.surface, id, &state.config);
        log::debug!(
            "Spawned bubble {} (r={:.1}, taps={})",
            id,
            bubble.radius,
            bubble.required_taps
        );
        state.bubbles.push(bubble);
        state.last_spawn_ms = state.clock_ms;
    }

    // Advance and cull bubbles
    let before = state.bubbles.len();
    state.bubbles = std::mem::take(&mut state.bubbles)
        .into_iter()
        .map(|b| if b.is_popping { advance_pop(b) } else { step_bubble(b) })
        .filter(|b| !b.pop_finished() && !is_off_screen(b))
        .collect();
    let culled = before - state.bubbles.len();
    if culled > 0 {
        log::debug!("Culled {} bubble(s), {} live", culled, state.bubbles.len());
    }

    // Advance and cull particles
    state.particles = std::mem::take(&mut state.particles)
        .into_iter()
        .map(|p| step_particle(p, dt))
        .filter(|p| p.is_alive())
        .collect();
}

/// Handle a press at `pointer` (surface-local pixels).
///
/// Every bubble under the pointer takes one tap. A tap that starts a pop
/// emits a burst and a [`GameEvent::Popped`]; any other tap emits
/// [`GameEvent::PartialTap`]. Returns how many bubbles were hit.
pub fn pointer_down(state: &mut GameState, pointer: Vec2) -> usize {
    let hit_ids: Vec<u32> = find_hits(pointer, &state.bubbles)
        .iter()
        .map(|b| b.id)
        .collect();
    if hit_ids.is_empty() {
        return 0;
    }

    let mut bursts = Vec::new();
    let bubbles: Vec<Bubble> = std::mem::take(&mut state.bubbles)
        .into_iter()
        .map(|bubble| {
            if !hit_ids.contains(&bubble.id) {
                return bubble;
            }

            let tapped = tap_bubble(bubble);
            state.taps += 1;
            if tapped.is_popping && !bubble.is_popping {
                log::debug!("Bubble {} popped", tapped.id);
                state.pops += 1;
                bursts.push((tapped.pos, tapped.hue));
                state.events.push(GameEvent::Popped {
                    id: tapped.id,
                    pos: tapped.pos,
                    hue: tapped.hue,
                });
            } else {
                log::debug!(
                    "Bubble {} tapped ({}/{})",
                    tapped.id,
                    tapped.current_taps,
                    tapped.required_taps
                );
                state.events.push(GameEvent::PartialTap {
                    id: tapped.id,
                    current_taps: tapped.current_taps,
                    required_taps: tapped.required_taps,
                });
            }
            tapped
        })
        .collect();
    state.bubbles = bubbles;

    for (pos, hue) in bursts {
        let particles = burst(&mut state.rng, pos, hue);
        state.particles.extend(particles);
    }
    if state.particles.len() > MAX_PARTICLES {
        let excess = state.particles.len() - MAX_PARTICLES;
        state.particles.drain(..excess);
    }

    hit_ids.len()
}
