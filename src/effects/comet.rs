use egui::{Color32, Pos2};

use crate::elements::NewItem;

/// Flight of a freshly added item from the add button to its category anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct Comet {
    pub item: NewItem,
    pub start: Pos2,
    pub target: Pos2,
    pub pos: Pos2,
    /// In `[0, 1]`, never decreases
    pub progress: f32,
    /// Category color, `None` when the category color did not resolve
    pub color: Option<Color32>,
}

impl Comet {
    pub fn new(item: NewItem, start: Pos2, target: Pos2, color: Option<Color32>) -> Self {
        Self {
            item,
            start,
            target,
            pos: start,
            progress: 0.,
            color,
        }
    }

    /// Moves the comet one frame further. Returns `true` on the frame it arrives.
    pub fn advance(&mut self, speed: f32) -> bool {
        if self.progress >= 1. {
            return false;
        }
        self.progress = (self.progress + speed.max(0.)).min(1.);
        self.pos = self.start + (self.target - self.start) * ease_out_quad(self.progress);
        self.progress >= 1.
    }

    pub fn has_landed(&self) -> bool {
        self.progress >= 1.
    }
}

pub fn ease_out_quad(t: f32) -> f32 {
    t * (2. - t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Priority;

    fn comet() -> Comet {
        let item = NewItem::new("Milch", Some("Küche"), Priority::Normal).unwrap();
        Comet::new(item, Pos2::new(0., 0.), Pos2::new(100., 0.), None)
    }

    #[test]
    fn progress_is_monotonic_and_bounded() {
        let mut c = comet();
        let mut last = c.progress;
        let mut arrivals = 0;
        for _ in 0..200 {
            if c.advance(0.02) {
                arrivals += 1;
            }
            assert!(c.progress >= last);
            assert!((0. ..=1.).contains(&c.progress));
            last = c.progress;
        }
        assert_eq!(arrivals, 1);
        assert_eq!(c.pos, c.target);
    }

    #[test]
    fn easing_front_loads_motion() {
        let mut c = comet();
        for _ in 0..25 {
            c.advance(0.02);
        }
        assert!((c.progress - 0.5).abs() < 1e-4);
        assert!((c.pos.x - 75.).abs() < 1e-2);
    }

    #[test]
    fn ease_out_quad_endpoints() {
        assert_eq!(ease_out_quad(0.), 0.);
        assert_eq!(ease_out_quad(1.), 1.);
    }
}
