//! Pointer hit-testing
//!
//! Overlapping bubbles are all hit by the same press; there is no z-order
//! exclusivity.

use glam::Vec2;

use super::state::Bubble;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    crate::distance(a.x, a.y, b.x, b.y)
}

/// The pointer lies strictly inside a bubble that can still be tapped
pub fn hit_test(pointer: Vec2, bubble: &Bubble) -> bool {
    !bubble.is_popping && distance(pointer, bubble.pos) < bubble.radius
}

/// Every tappable bubble under the pointer, in collection order
pub fn find_hits(pointer: Vec2, bubbles: &[Bubble]) -> Vec<&Bubble> {
    bubbles.iter().filter(|b| hit_test(pointer, b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bubble::tap_bubble;
    use proptest::prelude::*;

    fn bubble_at(id: u32, x: f32, y: f32, radius: f32) -> Bubble {
        Bubble {
            id,
            pos: Vec2::new(x, y),
            radius,
            speed: 1.0,
            wobble_speed: 0.03,
            wobble_amount: 2.0,
            wobble_phase: 0.0,
            hue: 180.0,
            opacity: 0.5,
            saturation: 50.0,
            brightness: 90.0,
            glow_intensity: 0.3,
            required_taps: 1,
            current_taps: 0,
            is_popping: false,
            popping_progress: 0.0,
        }
    }

    #[test]
    fn test_hit_inside_and_outside() {
        let b = bubble_at(1, 100.0, 100.0, 40.0);
        assert!(hit_test(Vec2::new(100.0, 100.0), &b));
        assert!(hit_test(Vec2::new(130.0, 100.0), &b));
        assert!(!hit_test(Vec2::new(150.0, 100.0), &b));
    }

    #[test]
    fn test_rim_is_a_miss() {
        let b = bubble_at(1, 0.0, 0.0, 50.0);
        assert!(!hit_test(Vec2::new(30.0, 40.0), &b));
    }

    #[test]
    fn test_popping_bubbles_are_ignored() {
        let b = tap_bubble(bubble_at(1, 100.0, 100.0, 40.0));
        assert!(b.is_popping);
        assert!(!hit_test(Vec2::new(100.0, 100.0), &b));
    }

    #[test]
    fn test_find_hits_overlapping_in_order() {
        let bubbles = vec![
            bubble_at(3, 100.0, 100.0, 50.0),
            bubble_at(1, 500.0, 500.0, 50.0),
            bubble_at(2, 120.0, 100.0, 50.0),
            tap_bubble(bubble_at(4, 110.0, 100.0, 50.0)),
        ];
        let ids: Vec<u32> = find_hits(Vec2::new(110.0, 100.0), &bubbles)
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_find_hits_empty() {
        assert!(find_hits(Vec2::ZERO, &[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_hit_iff_strictly_inside(
            px in -200.0f32..200.0,
            py in -200.0f32..200.0,
            radius in 30.0f32..80.0,
        ) {
            let b = bubble_at(1, 0.0, 0.0, radius);
            let pointer = Vec2::new(px, py);
            prop_assert_eq!(hit_test(pointer, &b), distance(pointer, b.pos) < radius);
        }
    }
}
