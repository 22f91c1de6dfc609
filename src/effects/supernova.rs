use std::f32::consts::TAU;

use egui::{Color32, Pos2, Vec2};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Pos2,
    pub vel: Vec2,
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
}

impl Particle {
    /// Opacity proportional to the remaining life.
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.;
        }
        self.life as f32 / self.max_life as f32
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}

/// Particle burst with a decaying central flash.
#[derive(Debug, Clone, PartialEq)]
pub struct Supernova {
    pub pos: Pos2,
    pub color: Color32,
    /// Intensity of the flash, starts at 1
    pub flash: f32,
    pub particles: Vec<Particle>,
}

impl Supernova {
    pub fn new(pos: Pos2, color: Color32, particles: usize, life: u32, rng: &mut impl Rng) -> Self {
        let particles = (0..particles)
            .map(|_| {
                let angle = rng.random_range(0. ..TAU);
                let speed = rng.random_range(1. ..5.);
                Particle {
                    pos,
                    vel: Vec2::angled(angle) * speed,
                    life,
                    max_life: life,
                    size: rng.random_range(1. ..4.),
                }
            })
            .collect();

        Self {
            pos,
            color,
            flash: 1.,
            particles,
        }
    }

    /// Both the flash and every particle are spent.
    pub fn is_finished(&self) -> bool {
        self.flash <= 0. && self.particles.iter().all(|p| !p.is_alive())
    }

    pub fn advance(&mut self, flash_decay: f32) {
        if self.flash > 0. {
            self.flash = (self.flash - flash_decay).max(0.);
        }
        for p in self.particles.iter_mut().filter(|p| p.is_alive()) {
            p.pos += p.vel;
            p.life -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn particles_are_randomised_within_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let nova = Supernova::new(Pos2::ZERO, Color32::WHITE, 50, 100, &mut rng);
        assert_eq!(nova.particles.len(), 50);
        for p in &nova.particles {
            let speed = p.vel.length();
            assert!((1. - 1e-4..5. + 1e-4).contains(&speed));
            assert!((1. ..4.).contains(&p.size));
            assert_eq!(p.life, 100);
        }
    }

    #[test]
    fn finished_needs_flash_and_particles() {
        let mut nova = Supernova {
            pos: Pos2::ZERO,
            color: Color32::WHITE,
            flash: 0.,
            particles: vec![Particle {
                pos: Pos2::ZERO,
                vel: Vec2::X,
                life: 1,
                max_life: 1,
                size: 1.,
            }],
        };
        assert!(!nova.is_finished());
        nova.advance(0.04);
        assert!(nova.is_finished());

        nova.flash = 0.5;
        assert!(!nova.is_finished());
    }

    #[test]
    fn flash_decays_linearly() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut nova = Supernova::new(Pos2::ZERO, Color32::WHITE, 0, 100, &mut rng);
        for _ in 0..12 {
            nova.advance(0.04);
        }
        assert!((nova.flash - 0.52).abs() < 1e-4);
        assert!(!nova.is_finished());

        for _ in 0..14 {
            nova.advance(0.04);
        }
        assert_eq!(nova.flash, 0.);
        assert!(nova.is_finished());
    }
}
