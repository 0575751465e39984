//! Pop bursts
//!
//! Particles are purely visual and never affect gameplay.

use glam::Vec2;
use rand::Rng;

use super::state::Particle;
use crate::consts::*;

/// Spray 10-19 particles radially from `pos`.
///
/// Particle `i` of `count` leaves along spoke `TAU * i / count` plus a small
/// random jitter, so the ring is roughly even without being perfectly
/// isotropic.
pub fn burst<R: Rng + ?Sized>(rng: &mut R, pos: Vec2, hue: f32) -> Vec<Particle> {
    let count = rng.random_range(BURST_MIN_PARTICLES..BURST_MAX_PARTICLES);

    (0..count)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / count as f32
                + rng.random_range(0.0..BURST_ANGLE_JITTER);
            let speed = rng.random_range(BURST_MIN_SPEED..BURST_MAX_SPEED);
            Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                hue: hue + rng.random_range(-BURST_HUE_JITTER..BURST_HUE_JITTER),
                size: rng.random_range(PARTICLE_MIN_SIZE..PARTICLE_MAX_SIZE),
            }
        })
        .collect()
}

/// Move, fall and fade by one tick
#[must_use]
pub fn step_particle(particle: Particle, dt: f32) -> Particle {
    Particle {
        pos: particle.pos + particle.vel,
        vel: Vec2::new(particle.vel.x, particle.vel.y + PARTICLE_GRAVITY),
        life: particle.life - dt * PARTICLE_DECAY,
        ..particle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_shape() {
        let mut rng = Pcg32::seed_from_u64(1234);
        let origin = Vec2::new(100.0, 100.0);
        let particles = burst(&mut rng, origin, 200.0);

        assert!((10..20).contains(&particles.len()));
        for p in &particles {
            assert_eq!(p.pos, origin);
            assert_eq!(p.life, 1.0);
            assert!(p.hue >= 170.0 && p.hue <= 230.0);
            assert!((PARTICLE_MIN_SIZE..PARTICLE_MAX_SIZE).contains(&p.size));
            let speed = p.vel.length();
            assert!(speed >= BURST_MIN_SPEED - 1e-4 && speed <= BURST_MAX_SPEED + 1e-4);
        }
    }

    #[test]
    fn test_burst_is_radial() {
        let mut rng = Pcg32::seed_from_u64(77);
        let particles = burst(&mut rng, Vec2::ZERO, 0.0);
        // Spokes cover every quadrant
        assert!(particles.iter().any(|p| p.vel.x > 0.0 && p.vel.y > 0.0));
        assert!(particles.iter().any(|p| p.vel.x < 0.0 && p.vel.y > 0.0));
        assert!(particles.iter().any(|p| p.vel.x < 0.0 && p.vel.y < 0.0));
        assert!(particles.iter().any(|p| p.vel.x > 0.0 && p.vel.y < 0.0));
    }

    #[test]
    fn test_step_particle() {
        let p = Particle {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::new(1.0, -2.0),
            life: 1.0,
            hue: 50.0,
            size: 3.0,
        };
        let next = step_particle(p, SIM_DT);
        assert_eq!(next.pos, Vec2::new(11.0, 8.0));
        assert_eq!(next.vel.x, 1.0);
        assert!((next.vel.y - (-1.8)).abs() < 1e-6);
        assert!((next.life - (1.0 - 0.032)).abs() < 1e-6);
        assert_eq!(next.size, p.size);
        assert_eq!(next.hue, p.hue);
    }

    #[test]
    fn test_particles_expire_in_about_half_a_second() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut particles = burst(&mut rng, Vec2::new(100.0, 100.0), 200.0);
        for _ in 0..31 {
            particles = particles.into_iter().map(|p| step_particle(p, SIM_DT)).collect();
        }
        assert!(particles.iter().all(Particle::is_alive));

        particles = particles.into_iter().map(|p| step_particle(p, SIM_DT)).collect();
        assert!(particles.iter().all(|p| !p.is_alive()));
    }

    proptest! {
        #[test]
        fn prop_burst_ranges(seed in any::<u64>(), hue in 0.0f32..360.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let particles = burst(&mut rng, Vec2::new(50.0, 60.0), hue);
            prop_assert!(particles.len() >= BURST_MIN_PARTICLES);
            prop_assert!(particles.len() < BURST_MAX_PARTICLES);
            for p in &particles {
                prop_assert!(p.hue >= hue - BURST_HUE_JITTER && p.hue <= hue + BURST_HUE_JITTER);
                prop_assert_eq!(p.life, 1.0);
            }
        }
    }
}
