use egui::{epaint::CircleShape, epaint::TextShape, Align2, Color32, FontFamily, FontId, Pos2, Stroke};

use super::{gradient::glow, DrawContext, Layers};
use crate::color::with_alpha;
use crate::elements::Priority;
use crate::layouts::force_directed::Star;

const HOVER_SCALE: f32 = 1.5;
const RING_GAP: f32 = 8.;
const LABEL_SIZE: f32 = 14.;
const LABEL_GAP: f32 = 15.;

/// Urgent stars pulse by this much around their base radius.
fn urgent_pulse(time_ms: f64) -> f32 {
    (time_ms * 0.015).sin() as f32 * 2.
}

/// World radius of a star before hover scaling.
pub fn base_radius(priority: Priority, time_ms: f64) -> f32 {
    match priority {
        Priority::Urgent => 12. + urgent_pulse(time_ms),
        Priority::Normal => 10.,
        Priority::Low => 7.,
    }
}

/// How a single star is drawn this frame.
#[derive(Debug, Clone, Copy)]
pub struct StarLook {
    /// Resolved category color
    pub color: Color32,
    /// Resolved assignee color, `None` when unassigned or the user color is unknown
    pub ring: Option<Color32>,
    pub hovered: bool,
    /// Brightness multiplier in `[0.7, 1.0]`
    pub flicker: f32,
}

pub fn draw_star(ctx: &DrawContext, layers: &mut Layers, star: &Star, look: StarLook) {
    let mut radius = base_radius(star.item.priority, ctx.time_ms);
    if look.hovered {
        radius *= HOVER_SCALE;
    }
    let blur = if look.hovered { 30. } else { 15. };

    let t = ctx.transform;
    let center = t.world_to_screen(star.pos);
    let r = t.world_to_screen_size(radius);
    let color = look.color.gamma_multiply(look.flicker);

    layers.add(glow(center, r, t.world_to_screen_size(blur), color.gamma_multiply(0.6)));
    layers.add(CircleShape::filled(center, r, color));
    layers.add(CircleShape::filled(
        center,
        r * 0.5,
        with_alpha(Color32::WHITE, 0.8 * look.flicker),
    ));

    if let Some(ring) = look.ring {
        let pulse = if star.item.priority == Priority::Urgent {
            urgent_pulse(ctx.time_ms)
        } else {
            0.
        };
        layers.add(CircleShape::stroke(
            center,
            t.world_to_screen_size(radius + RING_GAP + pulse),
            Stroke::new(2., ring),
        ));
    }

    if look.hovered {
        let galley = ctx.ctx.fonts(|f| {
            f.layout_no_wrap(
                star.item.name.clone(),
                FontId::new(LABEL_SIZE, FontFamily::Proportional),
                Color32::WHITE,
            )
        });
        let pos = Pos2::new(center.x, center.y - r - LABEL_GAP);
        let rect = Align2::CENTER_BOTTOM.anchor_size(pos, galley.size());
        layers.add_top(TextShape::new(rect.min, galley, Color32::WHITE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_by_priority() {
        assert_eq!(base_radius(Priority::Normal, 123.), 10.);
        assert_eq!(base_radius(Priority::Low, 123.), 7.);
        for t in [0., 100., 250., 1000., 5000.] {
            let r = base_radius(Priority::Urgent, t);
            assert!((10. ..=14.).contains(&r), "{r}");
        }
    }
}
