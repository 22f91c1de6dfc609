use std::collections::HashMap;

use egui::{Pos2, Rect, Vec2};
use log::debug;

use crate::settings::{PredefinedAnchor, SettingsStyle};

/// Assigns every category a stable anchor point in world space.
///
/// Well known categories sit at a fixed fraction of the viewport. Every other category takes
/// the next free slot on a circle around the viewport center, in first-seen order. Slots are
/// kept for the whole session; only the computed positions are dropped on [`Self::invalidate`].
#[derive(Debug, Clone)]
pub struct CategoryLayout {
    viewport: Rect,
    predefined: Vec<PredefinedAnchor>,
    radius: f32,
    start_angle: f32,
    angle_step: f32,

    slots: HashMap<String, usize>,
    cache: HashMap<String, Pos2>,
}

impl CategoryLayout {
    pub fn new(viewport: Rect, style: &SettingsStyle) -> Self {
        Self {
            viewport,
            predefined: style.predefined_anchors.clone(),
            radius: style.anchor_radius,
            start_angle: style.anchor_start_angle,
            angle_step: style.anchor_angle_step,
            slots: HashMap::new(),
            cache: HashMap::new(),
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Anchor of the category. Repeated calls return the same point until the layout is
    /// invalidated.
    pub fn resolve(&mut self, name: &str) -> Pos2 {
        if let Some(pos) = self.cache.get(name) {
            return *pos;
        }

        let pos = match self.predefined.iter().find(|a| a.name == name) {
            Some(anchor) => self.viewport.min + self.viewport.size() * anchor.fraction,
            None => {
                let next = self.slots.len();
                let slot = *self.slots.entry(name.to_string()).or_insert(next);
                self.radial(slot)
            }
        };

        self.cache.insert(name.to_string(), pos);
        pos
    }

    /// Returns the cached anchor without assigning a slot.
    pub fn cached(&self, name: &str) -> Option<Pos2> {
        self.cache.get(name).copied()
    }

    /// Drops all cached anchors and adopts the new viewport.
    pub fn invalidate(&mut self, viewport: Rect) {
        debug!(
            "category anchors invalidated, viewport {:?} -> {viewport:?}",
            self.viewport
        );
        self.viewport = viewport;
        self.cache.clear();
    }

    fn radial(&self, slot: usize) -> Pos2 {
        let angle = (self.start_angle + self.angle_step * slot as f32).to_radians();
        self.viewport.center() + Vec2::angled(angle) * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(w: f32, h: f32) -> CategoryLayout {
        CategoryLayout::new(
            Rect::from_min_size(Pos2::ZERO, Vec2::new(w, h)),
            &SettingsStyle::default(),
        )
    }

    #[test]
    fn predefined_categories_use_viewport_fractions() {
        let mut l = layout(1000., 800.);
        assert_eq!(l.resolve("Küche"), Pos2::new(300., 320.));
        assert_eq!(l.resolve("Bad"), Pos2::new(700., 320.));
        assert_eq!(l.resolve("Allgemein"), Pos2::new(500., 600.));
    }

    #[test]
    fn new_categories_are_placed_radially() {
        let mut l = layout(1000., 800.);
        let first = l.resolve("Garten");
        assert!((first.x - 500.).abs() < 1e-3);
        assert!((first.y - 0.).abs() < 1e-3);

        let second = l.resolve("Auto");
        let expected = Pos2::new(500., 400.) + Vec2::angled((-30_f32).to_radians()) * 400.;
        assert!((second - expected).length() < 1e-3);
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut l = layout(1000., 800.);
        for name in ["Garten", "Küche", "Auto", "Bad"] {
            let a = l.resolve(name);
            let b = l.resolve(name);
            assert_eq!(a, b);
        }
        assert_eq!(l.resolve("Garten"), l.resolve("Garten"));
    }

    #[test]
    fn resize_recomputes_anchors() {
        let mut l = layout(1000., 800.);
        let kueche = l.resolve("Küche");
        let garten = l.resolve("Garten");

        l.invalidate(Rect::from_min_size(Pos2::ZERO, Vec2::new(500., 400.)));
        assert_eq!(l.cached("Küche"), None);

        let kueche_after = l.resolve("Küche");
        assert_ne!(kueche, kueche_after);
        assert_eq!(kueche_after, Pos2::new(150., 160.));

        // slot survives, position follows the new center
        let garten_after = l.resolve("Garten");
        assert_ne!(garten, garten_after);
        assert!((garten_after - Pos2::new(250., -200.)).length() < 1e-3);
    }
}
