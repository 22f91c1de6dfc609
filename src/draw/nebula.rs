use egui::{Color32, Pos2, Vec2};
use rand::Rng;

use super::{gradient::radial_gradient, DrawContext, Layers};
use crate::color::with_alpha;

const BLOBS: usize = 3;
const JITTER: f32 = 50.;

/// Soft glow of a category around its anchor. Every frame draws freshly jittered blobs so
/// the cloud flickers.
pub fn draw_nebula(
    ctx: &DrawContext,
    layers: &mut Layers,
    anchor: Pos2,
    color: Color32,
    base_radius: f32,
    active: bool,
    rng: &mut impl Rng,
) {
    let pulse = if active {
        (ctx.time_ms * 0.0005).sin() as f32 * 10.
    } else {
        0.
    };
    let base = base_radius + pulse;

    let (edge_alpha, center_alpha) = if active { (0.1, 0.2) } else { (0.05, 0.1) };
    let edge = with_alpha(color, edge_alpha);
    let center = with_alpha(color, center_alpha);

    for i in 0..BLOBS {
        let offset = if i == 0 {
            Vec2::ZERO
        } else {
            Vec2::new(
                (rng.random::<f32>() - 0.5) * JITTER,
                (rng.random::<f32>() - 0.5) * JITTER,
            )
        };
        let radius = base * (rng.random::<f32>() * 0.4 + 0.6);

        let pos = ctx.transform.world_to_screen(anchor + offset);
        let radius = ctx.transform.world_to_screen_size(radius);
        layers.add(radial_gradient(
            pos,
            radius * 0.2,
            radius,
            &[(0., center), (0.7, edge), (1., Color32::TRANSPARENT)],
        ));
    }
}
