//! Bubble factory and per-tick transitions
//!
//! Every function takes a bubble by value and returns the next one; the caller
//! replaces the entity in its collection.

use glam::Vec2;
use rand::Rng;

use super::state::Bubble;
use crate::consts::*;
use crate::tuning::{SimConfig, VisualParams};

/// Create a bubble just below the visible area.
///
/// `required_taps` is drawn uniformly from `1..=config.max_taps`; the visual
/// parameters come from the fixed table for that tap count.
pub fn create_bubble<R: Rng + ?Sized>(
    rng: &mut R,
    surface: Vec2,
    id: u32,
    config: &SimConfig,
) -> Bubble {
    let radius = rng.random_range(BUBBLE_MIN_RADIUS..BUBBLE_MAX_RADIUS) * config.size_scale;
    let required_taps = rng.random_range(1..=config.max_taps.max(1));
    let visual = VisualParams::for_taps(required_taps);

    // Narrow surfaces can't fit the bubble between the edges
    let x = if surface.x > radius * 2.0 {
        rng.random_range(radius..surface.x - radius)
    } else {
        surface.x / 2.0
    };

    Bubble {
        id,
        pos: Vec2::new(x, surface.y + radius + OFFSCREEN_MARGIN),
        radius,
        speed: rng.random_range(BUBBLE_MIN_SPEED..BUBBLE_MAX_SPEED) * config.speed_scale,
        wobble_speed: rng.random_range(WOBBLE_MIN_SPEED..WOBBLE_MAX_SPEED),
        wobble_amount: rng.random_range(WOBBLE_MIN_AMOUNT..WOBBLE_MAX_AMOUNT),
        wobble_phase: rng.random_range(0.0..std::f32::consts::TAU),
        hue: rng.random_range(0.0..360.0),
        opacity: visual.opacity,
        saturation: visual.saturation,
        brightness: visual.brightness,
        glow_intensity: visual.glow_intensity,
        required_taps,
        current_taps: 0,
        is_popping: false,
        popping_progress: 0.0,
    }
}

/// True once the bubble has fully left through the top edge
pub fn is_off_screen(bubble: &Bubble) -> bool {
    bubble.pos.y < -bubble.radius - OFFSCREEN_MARGIN
}

/// Rise and wobble by one tick. Popping bubbles are returned unchanged.
#[must_use]
pub fn step_bubble(bubble: Bubble) -> Bubble {
    if bubble.is_popping {
        return bubble;
    }

    let wobble_phase = bubble.wobble_phase + bubble.wobble_speed;
    Bubble {
        pos: Vec2::new(
            bubble.pos.x + wobble_phase.sin() * bubble.wobble_amount,
            bubble.pos.y - bubble.speed,
        ),
        wobble_phase,
        ..bubble
    }
}

/// Advance the pop animation by one tick. Rising bubbles are returned unchanged.
#[must_use]
pub fn advance_pop(bubble: Bubble) -> Bubble {
    if !bubble.is_popping {
        return bubble;
    }
    Bubble {
        popping_progress: bubble.popping_progress + POP_PROGRESS_STEP,
        ..bubble
    }
}

/// Register one tap.
///
/// The tap that reaches `required_taps` starts the pop; earlier taps fade the
/// bubble (compounding, so many-tap bubbles get quite faint). Taps on a
/// popping bubble do nothing.
#[must_use]
pub fn tap_bubble(bubble: Bubble) -> Bubble {
    if bubble.is_popping {
        return bubble;
    }

    let current_taps = bubble.current_taps + 1;
    if current_taps >= bubble.required_taps {
        Bubble {
            current_taps: bubble.required_taps,
            is_popping: true,
            popping_progress: 0.0,
            ..bubble
        }
    } else {
        Bubble {
            current_taps,
            opacity: bubble.opacity * PARTIAL_TAP_FADE,
            ..bubble
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::BubblePhase;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const SURFACE: Vec2 = Vec2::new(400.0, 800.0);

    fn bubble_with_taps(required_taps: u32) -> Bubble {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut bubble = create_bubble(&mut rng, SURFACE, 1, &SimConfig::default());
        let visual = VisualParams::for_taps(required_taps);
        bubble.required_taps = required_taps;
        bubble.opacity = visual.opacity;
        bubble
    }

    #[test]
    fn test_create_bubble_ranges() {
        let mut rng = Pcg32::seed_from_u64(42);
        let config = SimConfig {
            max_taps: 5,
            ..Default::default()
        };
        for id in 1..200 {
            let b = create_bubble(&mut rng, SURFACE, id, &config);
            assert_eq!(b.id, id);
            assert!((BUBBLE_MIN_RADIUS..BUBBLE_MAX_RADIUS).contains(&b.radius));
            assert!(b.pos.x >= b.radius && b.pos.x <= SURFACE.x - b.radius);
            assert_eq!(b.pos.y, SURFACE.y + b.radius + OFFSCREEN_MARGIN);
            assert!((BUBBLE_MIN_SPEED..BUBBLE_MAX_SPEED).contains(&b.speed));
            assert!((0.0..360.0).contains(&b.hue));
            assert!((1..=5).contains(&b.required_taps));
            assert_eq!(b.current_taps, 0);
            assert!(!b.is_popping);
            assert_eq!(b.opacity, VisualParams::for_taps(b.required_taps).opacity);
        }
    }

    #[test]
    fn test_create_bubble_single_tap() {
        let mut rng = Pcg32::seed_from_u64(9);
        for id in 0..100 {
            let b = create_bubble(&mut rng, SURFACE, id, &SimConfig::default());
            assert_eq!(b.required_taps, 1);
        }
    }

    #[test]
    fn test_create_bubble_on_narrow_surface() {
        let mut rng = Pcg32::seed_from_u64(1);
        let b = create_bubble(&mut rng, Vec2::new(20.0, 300.0), 1, &SimConfig::default());
        assert_eq!(b.pos.x, 10.0);
    }

    #[test]
    fn test_create_bubble_scales() {
        let mut rng = Pcg32::seed_from_u64(5);
        let config = SimConfig {
            size_scale: 2.0,
            speed_scale: 0.5,
            ..Default::default()
        };
        let b = create_bubble(&mut rng, Vec2::new(2000.0, 800.0), 1, &config);
        assert!(b.radius >= BUBBLE_MIN_RADIUS * 2.0);
        assert!(b.speed < BUBBLE_MAX_SPEED * 0.5);
    }

    #[test]
    fn test_step_bubble_rises_and_wobbles() {
        let b = bubble_with_taps(1);
        let next = step_bubble(b);
        assert_eq!(next.pos.y, b.pos.y - b.speed);
        assert_eq!(next.wobble_phase, b.wobble_phase + b.wobble_speed);
        let expected_x = b.pos.x + next.wobble_phase.sin() * b.wobble_amount;
        assert!((next.pos.x - expected_x).abs() < 1e-4);
    }

    #[test]
    fn test_step_bubble_ignores_popping() {
        let popping = tap_bubble(bubble_with_taps(1));
        assert_eq!(step_bubble(popping), popping);
    }

    #[test]
    fn test_three_tap_bubble() {
        let b = bubble_with_taps(3);
        let original_opacity = b.opacity;

        let b = tap_bubble(b);
        assert_eq!(b.current_taps, 1);
        assert!(!b.is_popping);
        assert!((b.opacity - original_opacity * 0.85).abs() < 1e-6);

        let b = tap_bubble(b);
        assert_eq!(b.current_taps, 2);
        assert!(!b.is_popping);
        assert_eq!(b.phase(), BubblePhase::Rising);
        assert_eq!(b.remaining_taps(), 1);

        let b = tap_bubble(b);
        assert_eq!(b.current_taps, 3);
        assert!(b.is_popping);
        assert_eq!(b.popping_progress, 0.0);
        assert_eq!(b.phase(), BubblePhase::Popping);
        assert_eq!(b.remaining_taps(), 0);
    }

    #[test]
    fn test_tap_on_popping_is_noop() {
        let popped = tap_bubble(bubble_with_taps(1));
        assert_eq!(tap_bubble(popped), popped);
    }

    #[test]
    fn test_popping_freezes_kinematics() {
        let popped = tap_bubble(bubble_with_taps(1));
        let mut b = popped;
        for _ in 0..10 {
            b = advance_pop(step_bubble(b));
        }
        assert_eq!(b.pos, popped.pos);
        assert_eq!(b.radius, popped.radius);
        assert_eq!(b.wobble_phase, popped.wobble_phase);
        assert!(b.popping_progress > 0.0);
    }

    #[test]
    fn test_pop_lasts_twenty_ticks() {
        let mut b = tap_bubble(bubble_with_taps(1));
        for _ in 0..19 {
            b = advance_pop(b);
            assert!(!b.pop_finished());
        }
        b = advance_pop(b);
        assert!(b.pop_finished());
    }

    #[test]
    fn test_advance_pop_ignores_rising() {
        let b = bubble_with_taps(2);
        assert_eq!(advance_pop(b), b);
    }

    #[test]
    fn test_off_screen_boundary() {
        let mut b = bubble_with_taps(1);
        b.pos.y = -b.radius - 49.0;
        assert!(!is_off_screen(&b));
        b.pos.y = -b.radius - 51.0;
        assert!(is_off_screen(&b));
    }

    proptest! {
        #[test]
        fn prop_taps_never_exceed_required(required in 1u32..=5, taps in 0usize..12) {
            let mut b = bubble_with_taps(required);
            for n in 1..=taps {
                let before = b;
                b = tap_bubble(b);
                prop_assert!(b.current_taps <= b.required_taps);
                // Pops exactly on the tap that reaches the requirement
                let became_popping = !before.is_popping && b.is_popping;
                prop_assert_eq!(became_popping, n as u32 == required);
            }
        }
    }
}
