use egui::{Color32, Pos2, Shape, Stroke};

use super::{DrawContext, Layers};
use crate::color::with_alpha;

/// Dashed lines from the active category anchor to each of its members.
pub fn draw_constellation(
    ctx: &DrawContext,
    layers: &mut Layers,
    anchor: Pos2,
    color: Color32,
    members: impl IntoIterator<Item = Pos2>,
) {
    let stroke = Stroke::new(0.8, with_alpha(color, 0.3));
    let from = ctx.transform.world_to_screen(anchor);
    for member in members {
        let to = ctx.transform.world_to_screen(member);
        for dash in Shape::dashed_line(&[from, to], stroke, 4., 8.) {
            layers.add(dash);
        }
    }
}
