use egui::Context;

use crate::metadata::Transform;

/// Everything a draw call may read.
pub struct DrawContext<'a> {
    pub ctx: &'a Context,
    pub transform: &'a Transform,
    /// Wall clock milliseconds driving the pulse animations
    pub time_ms: f64,
}
