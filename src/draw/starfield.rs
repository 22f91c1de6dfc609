use egui::{epaint::CircleShape, Color32, Pos2, Rect};
use rand::Rng;

use super::Layers;
use crate::color::with_alpha;

#[derive(Debug, Clone, PartialEq)]
struct BackgroundStar {
    pos: Pos2,
    size: f32,
    speed: f32,
    opacity: f32,
}

/// Slowly drifting screen space backdrop.
#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<BackgroundStar>,
    rect: Rect,
}

impl Starfield {
    /// Scatters `count` stars over `rect`.
    pub fn new(rect: Rect, count: usize, rng: &mut impl Rng) -> Self {
        let mut field = Self {
            stars: Vec::with_capacity(count),
            rect,
        };
        for _ in 0..count {
            let pos = field.random_pos(rng);
            field.stars.push(BackgroundStar {
                pos,
                size: rng.random_range(0.5..2.),
                speed: rng.random_range(0.05..0.15),
                opacity: rng.random_range(0.3..0.8),
            });
        }
        field
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Moves every star down, wrapping around at the bottom edge.
    pub fn update(&mut self, rng: &mut impl Rng) {
        let rect = self.rect;
        for star in &mut self.stars {
            star.pos.y += star.speed;
            if star.pos.y > rect.max.y {
                star.pos.y = rect.min.y;
                star.pos.x = rng.random_range(rect.min.x..=rect.max.x);
            }
        }
    }

    /// Draws the field with its top left corner at `origin` on screen.
    pub fn draw(&self, layers: &mut Layers, origin: Pos2) {
        let offset = origin - self.rect.min;
        for star in &self.stars {
            layers.add_background(CircleShape::filled(
                star.pos + offset,
                star.size,
                with_alpha(Color32::from_rgb(230, 237, 243), star.opacity),
            ));
        }
    }

    fn random_pos(&self, rng: &mut impl Rng) -> Pos2 {
        Pos2::new(
            rng.random_range(self.rect.min.x..=self.rect.max.x),
            rng.random_range(self.rect.min.y..=self.rect.max.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Vec2;
    use rand::{rngs::StdRng, SeedableRng};

    fn rect() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(300., 200.))
    }

    #[test]
    fn stars_stay_inside() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut field = Starfield::new(rect(), 100, &mut rng);
        assert_eq!(field.len(), 100);
        for _ in 0..3000 {
            field.update(&mut rng);
        }
        for star in &field.stars {
            assert!(rect().contains(star.pos));
            assert!((0.5..2.).contains(&star.size));
            assert!((0.3..0.8).contains(&star.opacity));
        }
    }

    #[test]
    fn draws_one_shape_per_star() {
        let mut rng = StdRng::seed_from_u64(5);
        let field = Starfield::new(rect(), 10, &mut rng);
        let mut layers = Layers::default();
        field.draw(&mut layers, Pos2::new(10., 10.));
        assert_eq!(layers.len(), 10);
    }
}
