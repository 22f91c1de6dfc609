use egui::{Pos2, Vec2};
use rand::{rngs::StdRng, Rng};

/// Simulation view of a node, laid out contiguously for the force passes.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub pos: Pos2,
    pub vel: Vec2,
    /// Anchor of the node's category
    pub anchor: Pos2,
    /// Collision radius
    pub radius: f32,
}

/// A force applied once per tick. Implementors accumulate into `vel` (or shift `pos`
/// directly for positional constraints), scaled by the current `alpha` where appropriate.
pub trait Force: std::fmt::Debug {
    fn apply(&self, bodies: &mut [Body], alpha: f32, rng: &mut StdRng);
}

/// Tiny random offset used to separate coincident nodes.
pub(crate) fn jiggle(rng: &mut StdRng) -> f32 {
    (rng.random::<f32>() - 0.5) * 1e-6
}

/// Pairwise repulsion with inverse-distance falloff.
#[derive(Debug, Clone)]
pub struct ManyBody {
    pub strength: f32,
}

impl Force for ManyBody {
    fn apply(&self, bodies: &mut [Body], alpha: f32, rng: &mut StdRng) {
        let k = self.strength * alpha;
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let mut d = bodies[j].pos - bodies[i].pos;
                if d.x == 0. {
                    d.x = jiggle(rng);
                }
                if d.y == 0. {
                    d.y = jiggle(rng);
                }
                let l = d.length_sq().max(1.);
                let push = d * k / l;
                // negative strength pushes j away from i
                bodies[i].vel += push;
                bodies[j].vel -= push;
            }
        }
    }
}

/// Shifts all nodes so their centroid moves towards `center`.
#[derive(Debug, Clone)]
pub struct Center {
    pub center: Pos2,
    pub strength: f32,
}

impl Force for Center {
    fn apply(&self, bodies: &mut [Body], _alpha: f32, _rng: &mut StdRng) {
        if bodies.is_empty() {
            return;
        }
        let sum = bodies
            .iter()
            .fold(Vec2::ZERO, |acc, b| acc + b.pos.to_vec2());
        let centroid = sum / bodies.len() as f32;
        let shift = (centroid - self.center.to_vec2()) * self.strength;
        for b in bodies.iter_mut() {
            b.pos -= shift;
        }
    }
}

/// Pull towards the category anchor, independently on both axes.
#[derive(Debug, Clone)]
pub struct CategoryAttraction {
    pub strength: f32,
}

impl Force for CategoryAttraction {
    fn apply(&self, bodies: &mut [Body], alpha: f32, _rng: &mut StdRng) {
        let k = self.strength * alpha;
        for b in bodies.iter_mut() {
            b.vel += (b.anchor - b.pos) * k;
        }
    }
}

/// Radius based exclusion. Resolves overlaps on predicted positions through velocities,
/// the way soft collision works, and exposes [`Collide::project`] as a hard positional pass.
#[derive(Debug, Clone)]
pub struct Collide {
    pub iterations: usize,
}

impl Force for Collide {
    fn apply(&self, bodies: &mut [Body], _alpha: f32, rng: &mut StdRng) {
        for _ in 0..self.iterations {
            for i in 0..bodies.len() {
                for j in (i + 1)..bodies.len() {
                    let (a, b) = (bodies[i], bodies[j]);
                    let r = a.radius + b.radius;
                    let mut d = (a.pos + a.vel) - (b.pos + b.vel);
                    let mut l = d.length_sq();
                    if l >= r * r {
                        continue;
                    }
                    if d.x == 0. {
                        d.x = jiggle(rng);
                        l += d.x * d.x;
                    }
                    if d.y == 0. {
                        d.y = jiggle(rng);
                        l += d.y * d.y;
                    }
                    let len = l.sqrt();
                    let overlap = (r - len) / len;
                    let ra = a.radius * a.radius;
                    let rb = b.radius * b.radius;
                    let share = rb / (ra + rb);
                    bodies[i].vel += d * overlap * share;
                    bodies[j].vel -= d * overlap * (1. - share);
                }
            }
        }
    }
}

impl Collide {
    /// Pushes overlapping pairs apart along their center line until no pair overlaps or
    /// `max_passes` is exhausted. Returns the number of passes used.
    pub fn project(bodies: &mut [Body], max_passes: usize, rng: &mut StdRng) -> usize {
        const SLACK: f32 = 1e-3;

        for pass in 0..max_passes {
            let mut moved = false;
            for i in 0..bodies.len() {
                for j in (i + 1)..bodies.len() {
                    let r = bodies[i].radius + bodies[j].radius;
                    let mut d = bodies[j].pos - bodies[i].pos;
                    let len = d.length();
                    if len >= r {
                        continue;
                    }
                    if len == 0. {
                        d = Vec2::new(jiggle(rng), jiggle(rng));
                        if d == Vec2::ZERO {
                            d = Vec2::X;
                        }
                    }
                    let dir = d.normalized();
                    let half = (r - len + SLACK) / 2.;
                    bodies[i].pos -= dir * half;
                    bodies[j].pos += dir * half;
                    moved = true;
                }
            }
            if !moved {
                return pass;
            }
        }
        max_passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn body(x: f32, y: f32) -> Body {
        Body {
            pos: Pos2::new(x, y),
            vel: Vec2::ZERO,
            anchor: Pos2::ZERO,
            radius: 10.,
        }
    }

    #[test]
    fn many_body_repels() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut bodies = vec![body(0., 0.), body(10., 0.)];
        ManyBody { strength: -150. }.apply(&mut bodies, 1., &mut rng);
        assert!(bodies[0].vel.x < 0.);
        assert!(bodies[1].vel.x > 0.);
        // only the jiggle on the shared axis
        assert!(bodies[0].vel.y.abs() < 1e-5);
    }

    #[test]
    fn center_moves_centroid() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut bodies = vec![body(0., 0.), body(10., 0.)];
        Center {
            center: Pos2::new(100., 100.),
            strength: 1.,
        }
        .apply(&mut bodies, 1., &mut rng);
        assert_eq!(bodies[0].pos, Pos2::new(95., 100.));
        assert_eq!(bodies[1].pos, Pos2::new(105., 100.));
    }

    #[test]
    fn category_attraction_pulls_to_anchor() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut bodies = vec![body(100., -100.)];
        CategoryAttraction { strength: 0.05 }.apply(&mut bodies, 1., &mut rng);
        assert_eq!(bodies[0].vel, Vec2::new(-5., 5.));
    }

    #[test]
    fn projection_separates_coincident_bodies() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut bodies = vec![body(0., 0.), body(0., 0.), body(5., 0.)];
        Collide::project(&mut bodies, 64, &mut rng);
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let d = (bodies[i].pos - bodies[j].pos).length();
                assert!(d >= 20. - 0.01, "{i} and {j} overlap: {d}");
            }
        }
    }
}
