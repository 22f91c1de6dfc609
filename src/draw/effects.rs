use egui::{epaint::CircleShape, Color32, Vec2};

use super::{
    gradient::{fading_triangle, glow, radial_gradient},
    DrawContext, Layers,
};
use crate::color::with_alpha;
use crate::effects::{Comet, Supernova};

const COMET_HEAD: f32 = 8.;
const COMET_GLOW: f32 = 20.;
const TAIL_SPREAD: f32 = 0.2;
const FLASH_RADIUS: f32 = 100.;

/// Tail length in world units, shrinking as the comet approaches its target.
pub fn tail_length(progress: f32) -> f32 {
    60. * (1. - progress) + 10.
}

/// Head and tail of the comet. Comets of categories without a resolved color are not drawn.
pub fn draw_comet(ctx: &DrawContext, layers: &mut Layers, comet: &Comet) {
    let Some(color) = comet.color else {
        return;
    };

    let t = ctx.transform;
    let head = t.world_to_screen(comet.pos);

    let heading = comet.target - comet.pos;
    let angle = if heading == Vec2::ZERO {
        (comet.target - comet.start).angle()
    } else {
        heading.angle()
    };
    let len = t.world_to_screen_size(tail_length(comet.progress));
    let a = head - Vec2::angled(angle - TAIL_SPREAD) * len;
    let b = head - Vec2::angled(angle + TAIL_SPREAD) * len;
    layers.add_top(fading_triangle(head, a, b, color));

    let r = t.world_to_screen_size(COMET_HEAD);
    layers.add_top(glow(head, r, t.world_to_screen_size(COMET_GLOW), color));
    layers.add_top(CircleShape::filled(head, r, Color32::WHITE));
}

/// Flash and particles of a supernova in their current state.
pub fn draw_supernova(ctx: &DrawContext, layers: &mut Layers, nova: &Supernova) {
    let t = ctx.transform;

    if nova.flash > 0. {
        let radius = t.world_to_screen_size(FLASH_RADIUS * (1. - nova.flash));
        layers.add_top(radial_gradient(
            t.world_to_screen(nova.pos),
            0.,
            radius,
            &[
                (0., with_alpha(Color32::WHITE, nova.flash * 0.8)),
                (0.3, with_alpha(nova.color, nova.flash * 0.6)),
                (1., with_alpha(nova.color, 0.)),
            ],
        ));
    }

    for p in nova.particles.iter().filter(|p| p.is_alive()) {
        layers.add_top(CircleShape::filled(
            t.world_to_screen(p.pos),
            t.world_to_screen_size(p.size),
            with_alpha(nova.color, p.alpha()),
        ));
    }
}
