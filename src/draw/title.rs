use egui::{epaint::TextShape, Align2, Color32, FontFamily, FontId, Pos2};

use super::{DrawContext, Layers};
use crate::color::with_alpha;

const TITLE_SIZE: f32 = 36.;

/// Name of the active category, faded in while the pointer is near its nebula and faded out
/// after it left. The last name stays visible until the fade out completes.
#[derive(Debug, Clone, Default)]
pub struct CategoryTitle {
    name: Option<String>,
    alpha: f32,
}

impl CategoryTitle {
    /// Steps the fade towards the activation state. `alpha` stays within `[0, 1]`.
    pub fn update(&mut self, active: Option<&str>, step: f32) {
        match active {
            Some(name) => {
                if self.name.as_deref() != Some(name) {
                    self.name = Some(name.to_string());
                }
                self.alpha += step;
            }
            None => self.alpha -= step,
        }
        self.alpha = self.alpha.clamp(0., 1.);
        if self.alpha == 0. && active.is_none() {
            self.name = None;
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn draw(&self, ctx: &DrawContext, layers: &mut Layers, anchor: Pos2) {
        let Some(name) = &self.name else {
            return;
        };
        if self.alpha <= 0. {
            return;
        }

        let color = with_alpha(Color32::from_rgb(230, 237, 243), 0.7 * self.alpha);
        let galley = ctx.ctx.fonts(|f| {
            f.layout_no_wrap(
                name.clone(),
                FontId::new(TITLE_SIZE, FontFamily::Proportional),
                color,
            )
        });
        let center = ctx.transform.world_to_screen(anchor);
        let rect = Align2::CENTER_CENTER.anchor_size(center, galley.size());
        layers.add(TextShape::new(rect.min, galley, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fades_in_and_clamps() {
        let mut t = CategoryTitle::default();
        for _ in 0..40 {
            t.update(Some("Bad"), 0.05);
            assert!((0. ..=1.).contains(&t.alpha()));
        }
        assert_eq!(t.alpha(), 1.);
        assert_eq!(t.name(), Some("Bad"));
    }

    #[test]
    fn keeps_name_while_fading_out() {
        let mut t = CategoryTitle::default();
        for _ in 0..20 {
            t.update(Some("Bad"), 0.05);
        }
        t.update(None, 0.05);
        assert!(t.alpha() > 0. && t.alpha() < 1.);
        assert_eq!(t.name(), Some("Bad"));

        for _ in 0..40 {
            t.update(None, 0.05);
            assert!((0. ..=1.).contains(&t.alpha()));
        }
        assert_eq!(t.alpha(), 0.);
        assert_eq!(t.name(), None);
    }

    #[test]
    fn switching_category_keeps_alpha() {
        let mut t = CategoryTitle::default();
        for _ in 0..5 {
            t.update(Some("Bad"), 0.05);
        }
        let before = t.alpha();
        t.update(Some("Küche"), 0.05);
        assert_eq!(t.name(), Some("Küche"));
        assert!(t.alpha() > before);
    }
}
