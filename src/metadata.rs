use std::collections::BTreeMap;

use egui::{Id, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

const KEY: &str = "egui_galaxy_metadata";

/// Pan and zoom of the galaxy. `screen = origin + world * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Current zoom factor
    pub zoom: f32,
    /// Current pan offset in screen units
    pub pan: Vec2,
    /// Top left position of the widget
    pub origin: Pos2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            zoom: 1.,
            pan: Vec2::ZERO,
            origin: Pos2::ZERO,
        }
    }
}

impl Transform {
    pub fn world_to_screen(&self, pos: Pos2) -> Pos2 {
        self.origin + pos.to_vec2() * self.zoom + self.pan
    }

    pub fn world_to_screen_size(&self, size: f32) -> f32 {
        size * self.zoom
    }

    pub fn screen_to_world(&self, pos: Pos2) -> Pos2 {
        ((pos - self.origin - self.pan) / self.zoom).to_pos2()
    }

    pub fn screen_to_world_rect(&self, rect: Rect) -> Rect {
        Rect::from_two_pos(self.screen_to_world(rect.min), self.screen_to_world(rect.max))
    }

    /// Multiplies the zoom by `factor`, clamped to `[min, max]`, keeping the world point under
    /// `center` in place. Returns the applied zoom difference.
    pub fn zoom_at(&mut self, center: Pos2, factor: f32, min: f32, max: f32) -> f32 {
        let anchor = self.screen_to_world(center);
        let new_zoom = (self.zoom * factor).clamp(min, max);
        let diff = new_zoom - self.zoom;

        self.zoom = new_zoom;
        self.pan = center - self.origin - anchor.to_vec2() * new_zoom;
        diff
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }
}

/// Capability the core uses instead of reaching into the UI tree: pointer inversion and
/// screen bounds of named UI elements.
pub trait ViewportAdapter {
    fn pointer_to_world(&self, pointer: Pos2) -> Pos2;
    fn element_bounds(&self, element: &str) -> Option<Rect>;
}

/// Per-widget state persisted in egui memory between frames.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Metadata {
    pub transform: Transform,
    /// Widget size at the last resize
    pub viewport_size: Vec2,
    /// Pixel density at the last resize
    pub pixels_per_point: f32,
    /// Physical pixel size of the canvas
    pub backing_size: [u32; 2],

    /// Time spent in the last simulation and effect update
    pub last_step_time_ms: f32,
    /// Time spent in the last draw
    pub last_draw_time_ms: f32,

    /// Screen bounds of named UI elements, registered by the host
    elements: BTreeMap<String, Rect>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            viewport_size: Vec2::ZERO,
            pixels_per_point: 1.,
            backing_size: [0, 0],
            last_step_time_ms: 0.,
            last_draw_time_ms: 0.,
            elements: BTreeMap::new(),
        }
    }
}

impl Metadata {
    pub fn load(ui: &egui::Ui) -> Self {
        ui.data_mut(|data| {
            data.get_persisted::<Metadata>(Id::new(KEY))
                .unwrap_or_default()
        })
    }

    pub fn save(self, ui: &mut egui::Ui) {
        ui.data_mut(|data| {
            data.insert_persisted(Id::new(KEY), self);
        });
    }

    /// Records a new widget size or pixel density. Returns `true` when either changed.
    pub fn resize(&mut self, size: Vec2, pixels_per_point: f32) -> bool {
        if self.viewport_size == size && self.pixels_per_point == pixels_per_point {
            return false;
        }
        self.viewport_size = size;
        self.pixels_per_point = pixels_per_point;
        self.backing_size = backing_size(size, pixels_per_point);
        true
    }

    pub fn set_element_bounds(&mut self, element: &str, bounds: Rect) {
        self.elements.insert(element.to_string(), bounds);
    }
}

impl ViewportAdapter for Metadata {
    fn pointer_to_world(&self, pointer: Pos2) -> Pos2 {
        self.transform.screen_to_world(pointer)
    }

    fn element_bounds(&self, element: &str) -> Option<Rect> {
        self.elements.get(element).copied()
    }
}

/// Physical pixel dimensions of a canvas of `size` points.
pub fn backing_size(size: Vec2, pixels_per_point: f32) -> [u32; 2] {
    let px = size * pixels_per_point;
    [px.x.max(0.).round() as u32, px.y.max(0.).round() as u32]
}
