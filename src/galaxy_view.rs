use egui::{PointerButton, Pos2, Rect, Response, Sense, Ui, Vec2, Widget};
use instant::Instant;

use crate::{
    draw::{DrawContext, Layers},
    elements::NewItem,
    events::{Event, EventSink, PayloadCometLanded, PayloadPan, PayloadZoom},
    metadata::{Metadata, Transform},
    mirror::StateMirror,
    settings::SettingsNavigation,
    world::WorldState,
};

/// Widget showing the household galaxy.
///
/// It implements [`egui::Widget`] and can be used like any other widget. Every frame it
/// applies pending remote changes, advances the simulation and the effects and draws them.
/// Pointer input is turned into pan and zoom, hover and click handling.
///
/// Interactions are reported as [`Event`]s to the sink set via [`Self::with_event_sink`].
/// Items submitted through [`Self::with_submitted`] fly in as comets and are written to the
/// store when they land.
pub struct GalaxyView<'a> {
    world: &'a mut WorldState,
    mirror: &'a mut StateMirror,

    settings_navigation: SettingsNavigation,

    elements: Vec<(String, Rect)>,
    submitted: Vec<NewItem>,

    events_sink: Option<&'a dyn EventSink>,
}

impl Widget for &mut GalaxyView<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (resp, p) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());

        let mut meta = Metadata::load(ui);
        meta.transform.origin = resp.rect.left_top();
        for (name, bounds) in self.elements.drain(..) {
            meta.set_element_bounds(&name, bounds);
        }

        self.sync_viewport(ui, &resp, &mut meta);
        self.sync_mirror();

        // a covered galaxy keeps running but takes no input
        if !self.world.is_hidden() {
            self.handle_navigation(ui, &resp, &mut meta.transform);
            self.handle_hover(&resp, &meta);
            self.handle_click(&resp, &meta);
        }

        for item in self.submitted.drain(..) {
            self.world.submit_item(item, &meta);
        }

        let t0 = Instant::now();
        let mut layers = Layers::default();
        let time_ms = ui.input(|i| i.time) * 1000.;
        let landings = self.world.frame(
            &DrawContext {
                ctx: ui.ctx(),
                transform: &meta.transform,
                time_ms,
            },
            &mut layers,
        );
        let step_ms = t0.elapsed().as_secs_f32() * 1000.;

        for landing in landings {
            self.mirror.add_item(&landing.item);
            self.publish_event(Event::CometLanded(PayloadCometLanded {
                name: landing.item.name,
                category: landing.item.category,
            }));
        }

        let t_draw0 = Instant::now();
        layers.draw(&p);
        let draw_ms = t_draw0.elapsed().as_secs_f32() * 1000.;

        meta.last_step_time_ms = step_ms;
        meta.last_draw_time_ms = draw_ms;
        meta.save(ui);

        ui.ctx().request_repaint();

        resp
    }
}

impl<'a> GalaxyView<'a> {
    /// Creates a new `GalaxyView` widget with default navigation settings.
    pub fn new(world: &'a mut WorldState, mirror: &'a mut StateMirror) -> Self {
        Self {
            world,
            mirror,

            settings_navigation: SettingsNavigation::default(),

            elements: Vec::new(),
            submitted: Vec::new(),

            events_sink: Option::default(),
        }
    }

    /// Supply a generic sink that will receive interaction events.
    /// Works with crossbeam::Sender<Event>, closures `Fn(Event)`, or custom implementations.
    pub fn with_event_sink(mut self, sink: &'a dyn EventSink) -> Self {
        self.events_sink = Some(sink);
        self
    }

    pub fn with_navigations(mut self, settings_navigation: &SettingsNavigation) -> Self {
        self.settings_navigation = settings_navigation.clone();
        self
    }

    /// Registers the screen bounds of a host UI element, e.g. [`crate::ADD_BUTTON`].
    pub fn with_element_bounds(mut self, element: &str, bounds: Rect) -> Self {
        self.elements.push((element.to_string(), bounds));
        self
    }

    /// Validated items to launch as comets this frame.
    pub fn with_submitted(mut self, items: impl IntoIterator<Item = NewItem>) -> Self {
        self.submitted.extend(items);
        self
    }

    fn sync_viewport(&mut self, ui: &Ui, resp: &Response, meta: &mut Metadata) {
        meta.resize(resp.rect.size(), ui.ctx().pixels_per_point());

        // world space matches widget local space at zoom 1 without pan
        let viewport = Rect::from_min_size(Pos2::ZERO, resp.rect.size());
        if self.world.viewport() != viewport {
            self.world.resize(viewport);
        }
    }

    fn sync_mirror(&mut self) {
        self.mirror.poll();
        self.world.sync_mirror(self.mirror);
    }

    fn handle_hover(&mut self, resp: &Response, meta: &Metadata) {
        let pointer = resp.hover_pos();
        for event in self
            .world
            .pointer_moved(pointer, meta, meta.transform.zoom)
        {
            self.publish_event(event);
        }
    }

    fn handle_click(&mut self, resp: &Response, meta: &Metadata) {
        if !resp.clicked() || !self.world.interaction().click_enabled {
            return;
        }
        let Some(pos) = resp.interact_pointer_pos() else {
            return;
        };
        let event = self.world.click(pos, meta, meta.transform.zoom);
        self.publish_event(event);
    }

    fn handle_navigation(&self, ui: &Ui, resp: &Response, transform: &mut Transform) {
        if !self.settings_navigation.zoom_and_pan_enabled {
            return;
        }
        self.handle_zoom(ui, resp, transform);
        self.handle_pan(resp, transform);
    }

    fn handle_zoom(&self, ui: &Ui, resp: &Response, transform: &mut Transform) {
        if !resp.contains_pointer() {
            return;
        }

        ui.input(|i| {
            let scroll = i.smooth_scroll_delta.y;
            let factor = i.zoom_delta() * 2_f32.powf(scroll * self.settings_navigation.zoom_speed);
            if factor == 1. {
                return;
            }

            let center = i.pointer.hover_pos().unwrap_or(resp.rect.center());
            let pan_before = transform.pan;
            let diff = transform.zoom_at(
                center,
                factor,
                self.settings_navigation.zoom_min,
                self.settings_navigation.zoom_max,
            );
            if diff == 0. {
                return;
            }

            self.publish_event(Event::Zoom(PayloadZoom {
                diff,
                new_zoom: transform.zoom,
            }));
            self.publish_pan(transform.pan - pan_before, transform.pan);
        });
    }

    fn handle_pan(&self, resp: &Response, transform: &mut Transform) {
        let delta = resp.drag_delta();
        if (resp.dragged_by(PointerButton::Middle) || resp.dragged_by(PointerButton::Primary))
            && (delta.x.abs() > 0. || delta.y.abs() > 0.)
        {
            transform.pan_by(delta);
            self.publish_pan(delta, transform.pan);
        }
    }

    fn publish_pan(&self, diff: Vec2, new_pan: Vec2) {
        if diff == Vec2::ZERO {
            return;
        }
        self.publish_event(Event::Pan(PayloadPan {
            diff: diff.into(),
            new_pan: new_pan.into(),
        }));
    }

    fn publish_event(&self, event: Event) {
        if let Some(sink) = self.events_sink {
            sink.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::Arc;

    use super::*;
    use crate::elements::Priority;
    use crate::mirror::MemoryStore;
    use crate::world::{WorldConfig, ADD_BUTTON};

    fn setup() -> (WorldState, StateMirror) {
        let store = Arc::new(MemoryStore::new());
        let mut mirror = StateMirror::connect(store).unwrap();
        mirror.seed_initial_data();
        mirror.poll();
        let config = WorldConfig {
            seed: Some(3),
            ..WorldConfig::default()
        };
        let world = WorldState::new(config, Rect::from_min_size(Pos2::ZERO, Vec2::splat(100.)));
        (world, mirror)
    }

    fn run_frames(
        ctx: &egui::Context,
        frames: usize,
        events: &[egui::Event],
        mut ui_fn: impl FnMut(&mut Ui),
    ) {
        for _ in 0..frames {
            let input = egui::RawInput {
                screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(800., 600.))),
                events: events.to_vec(),
                ..Default::default()
            };
            let _ = ctx.run(input, |ctx| {
                egui::CentralPanel::default()
                    .frame(egui::Frame::NONE)
                    .show(ctx, |ui| ui_fn(ui));
            });
        }
    }

    #[test]
    fn first_frame_adopts_widget_size_and_mirror() {
        let (mut world, mut mirror) = setup();
        let ctx = egui::Context::default();
        run_frames(&ctx, 1, &[], |ui| {
            ui.add(&mut GalaxyView::new(&mut world, &mut mirror));
        });
        assert_eq!(world.viewport().size(), Vec2::new(800., 600.));
        assert_eq!(world.simulation().node_count(), 2);
    }

    #[test]
    fn landed_comets_are_written_and_reported() {
        let (mut world, mut mirror) = setup();
        let ctx = egui::Context::default();
        let events = RefCell::new(Vec::new());
        let sink = |e: Event| events.borrow_mut().push(e);

        let mut pending = vec![NewItem::new("Brot", Some("Küche"), Priority::Low).unwrap()];
        run_frames(&ctx, 120, &[], |ui| {
            let mut view = GalaxyView::new(&mut world, &mut mirror)
                .with_event_sink(&sink)
                .with_element_bounds(
                    ADD_BUTTON,
                    Rect::from_center_size(Pos2::new(400., 580.), Vec2::splat(30.)),
                )
                .with_submitted(pending.drain(..));
            ui.add(&mut view);
        });

        assert!(mirror.items().iter().any(|i| i.name == "Brot"));
        assert_eq!(world.simulation().node_count(), 3);
        let landed: Vec<Event> = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::CometLanded(_)))
            .cloned()
            .collect();
        assert_eq!(
            landed,
            vec![Event::CometLanded(PayloadCometLanded {
                name: "Brot".to_string(),
                category: "Küche".to_string(),
            })]
        );
    }

    #[test]
    fn hidden_galaxy_ignores_pointer() {
        let (mut world, mut mirror) = setup();
        let ctx = egui::Context::default();
        run_frames(&ctx, 1, &[], |ui| {
            ui.add(&mut GalaxyView::new(&mut world, &mut mirror));
        });
        let seife = world
            .simulation()
            .stars()
            .find(|s| s.item.name == "Seife")
            .map(|s| s.pos)
            .unwrap();
        let hover = [egui::Event::PointerMoved(seife)];

        world.set_hidden(true);
        run_frames(&ctx, 3, &hover, |ui| {
            ui.add(&mut GalaxyView::new(&mut world, &mut mirror));
        });
        assert_eq!(world.hovered(), None);

        world.set_hidden(false);
        run_frames(&ctx, 3, &hover, |ui| {
            ui.add(&mut GalaxyView::new(&mut world, &mut mirror));
        });
        assert!(world.hovered().is_some());
    }
}
