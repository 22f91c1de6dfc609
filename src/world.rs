use std::collections::HashMap;
use std::sync::Arc;

use egui::{Color32, Pos2, Rect};
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::draw::{
    draw_comet, draw_constellation, draw_nebula, draw_star, draw_supernova, CategoryTitle,
    DrawContext, Layers, StarLook, Starfield,
};
use crate::effects::{Effects, Landing};
use crate::elements::{Category, Item, NewItem};
use crate::events::{
    Event, PayloadCategoryActivate, PayloadNodeClick, PayloadNodeHoverEnter, PayloadNodeHoverLeave,
};
use crate::interaction::{nearest_within, world_radius};
use crate::layouts::force_directed::Simulation;
use crate::layouts::CategoryLayout;
use crate::metadata::ViewportAdapter;
use crate::mirror::{Changed, StateMirror};
use crate::settings::{Household, SettingsInteraction, SettingsSimulation, SettingsStyle};
use crate::{Theme, ThemeLookup};

/// Name under which hosts register the screen bounds of their add-item button.
pub const ADD_BUTTON: &str = "add-item-button";

/// Everything the galaxy shows, owned in one place. All node, category and effect state is
/// mutated through its methods only.
pub struct WorldState {
    interaction: SettingsInteraction,
    style: SettingsStyle,
    household: Household,
    theme: Box<dyn ThemeLookup + Send>,

    layout: CategoryLayout,
    simulation: Simulation,
    effects: Effects,
    title: CategoryTitle,
    starfield: Starfield,
    rng: StdRng,

    items: Arc<Vec<Item>>,
    categories: Arc<Vec<Category>>,
    category_colors: HashMap<String, Color32>,
    user_colors: HashMap<String, Color32>,

    hovered: Option<String>,
    active_category: Option<String>,
    hidden: bool,
}

/// Construction parameters of a [`WorldState`].
#[derive(Debug, Clone, Default)]
pub struct WorldConfig {
    pub simulation: SettingsSimulation,
    pub interaction: SettingsInteraction,
    pub style: SettingsStyle,
    pub household: Household,
    /// Fixed seed for reproducible jitter, random when `None`
    pub seed: Option<u64>,
}

impl WorldState {
    pub fn new(config: WorldConfig, viewport: Rect) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let simulation = Simulation::with_seed(config.simulation, viewport, rng.random());
        let effects = Effects::new(&config.style, StdRng::seed_from_u64(rng.random()));
        let starfield = Starfield::new(viewport, config.style.starfield_stars, &mut rng);

        let mut world = Self {
            interaction: config.interaction,
            layout: CategoryLayout::new(viewport, &config.style),
            style: config.style,
            household: config.household,
            theme: Box::new(Theme::default()),
            simulation,
            effects,
            title: CategoryTitle::default(),
            starfield,
            rng,
            items: Arc::new(Vec::new()),
            categories: Arc::new(Vec::new()),
            category_colors: HashMap::new(),
            user_colors: HashMap::new(),
            hovered: None,
            active_category: None,
            hidden: false,
        };
        world.resolve_colors();
        world
    }

    /// Replaces the theme and re-resolves every color.
    pub fn set_theme(&mut self, theme: Box<dyn ThemeLookup + Send>) {
        self.theme = theme;
        self.resolve_colors();
    }

    fn resolve_colors(&mut self) {
        let theme = self.theme.as_ref();
        self.category_colors = self
            .categories
            .iter()
            .filter_map(|c| c.color.resolve(theme).map(|color| (c.name.clone(), color)))
            .collect();
        self.user_colors = self
            .household
            .users
            .iter()
            .filter_map(|u| u.color.resolve(theme).map(|color| (u.name.clone(), color)))
            .collect();
    }

    /// Takes over the collections that changed in the mirror.
    pub fn apply_mirror(&mut self, mirror: &StateMirror, changed: Changed) {
        if changed.categories {
            self.categories = mirror.categories();
            self.resolve_colors();
            info!("applied {} categories", self.categories.len());
        }
        if changed.items || changed.categories {
            self.items = mirror.items();
            self.simulation.set_nodes(&self.items, &mut self.layout);
            if changed.items {
                info!("applied {} items", self.items.len());
            }
        }
        if let Some(id) = &self.hovered {
            if self.simulation.star(id).is_none() {
                self.hovered = None;
            }
        }
    }

    /// Catches up with the current mirror contents regardless of who polled it. Collections
    /// are replaced as a whole on every snapshot, so identity tells whether they changed.
    pub fn sync_mirror(&mut self, mirror: &StateMirror) -> Changed {
        let changed = Changed {
            items: !Arc::ptr_eq(&self.items, &mirror.items()),
            categories: !Arc::ptr_eq(&self.categories, &mirror.categories()),
            archive: false,
        };
        if changed.any() {
            self.apply_mirror(mirror, changed);
        }
        changed
    }

    /// Adopts a new viewport: anchors are recomputed, the backdrop is re-seeded and the
    /// simulation reheated.
    pub fn resize(&mut self, viewport: Rect) {
        debug!("world resized to {viewport:?}");
        self.layout.invalidate(viewport);
        self.simulation.set_viewport(&mut self.layout);
        self.starfield = Starfield::new(viewport, self.style.starfield_stars, &mut self.rng);
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn viewport(&self) -> Rect {
        self.layout.viewport()
    }

    pub fn interaction(&self) -> &SettingsInteraction {
        &self.interaction
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn active_category(&self) -> Option<&str> {
        self.active_category.as_deref()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn title(&self) -> &CategoryTitle {
        &self.title
    }

    pub fn category_color(&self, name: &str) -> Option<Color32> {
        self.category_colors.get(name).copied()
    }

    pub fn user_color(&self, name: &str) -> Option<Color32> {
        self.user_colors.get(name).copied()
    }

    pub fn anchor(&mut self, category: &str) -> Pos2 {
        self.layout.resolve(category)
    }

    /// Updates hover and nebula activation for a pointer at `pointer` in screen space.
    /// `None` means the pointer left the canvas.
    pub fn pointer_moved(
        &mut self,
        pointer: Option<Pos2>,
        view: &dyn ViewportAdapter,
        zoom: f32,
    ) -> Vec<Event> {
        let mut events = Vec::new();

        let (hovered, active) = match pointer {
            Some(p) => {
                let world = view.pointer_to_world(p);
                let hovered = self
                    .hit_node(world, zoom)
                    .map(str::to_string)
                    .filter(|_| self.interaction.hover_enabled);
                (hovered, self.nearest_category(world, zoom))
            }
            None => (None, None),
        };

        if hovered != self.hovered {
            if let Some(id) = self.hovered.take() {
                events.push(Event::NodeHoverLeave(PayloadNodeHoverLeave { id }));
            }
            if let Some(id) = &hovered {
                events.push(Event::NodeHoverEnter(PayloadNodeHoverEnter { id: id.clone() }));
            }
            self.hovered = hovered;
        }
        if active != self.active_category {
            events.push(Event::CategoryActivate(PayloadCategoryActivate {
                name: active.clone(),
            }));
            self.active_category = active;
        }
        events
    }

    /// Hit tests stars only. A hit opens the details of the star, a miss closes them.
    pub fn click(&self, pointer: Pos2, view: &dyn ViewportAdapter, zoom: f32) -> Event {
        let world = view.pointer_to_world(pointer);
        match self.hit_node(world, zoom) {
            Some(id) => Event::NodeClick(PayloadNodeClick { id: id.to_string() }),
            None => Event::BackgroundClick,
        }
    }

    fn hit_node(&self, world: Pos2, zoom: f32) -> Option<&str> {
        let radius = world_radius(self.interaction.node_hit_radius, zoom);
        // stars without a resolved color are not drawn and cannot be hit
        let visible = self
            .simulation
            .stars()
            .filter(|s| self.category_colors.contains_key(&s.item.category));
        nearest_within(visible, world, radius, |s| s.pos).map(|s| s.item.id.as_str())
    }

    fn nearest_category(&mut self, world: Pos2, zoom: f32) -> Option<String> {
        let radius = world_radius(self.interaction.nebula_activation_radius, zoom);
        let categories = Arc::clone(&self.categories);
        let anchors: Vec<(&str, Pos2)> = categories
            .iter()
            .map(|c| (c.name.as_str(), self.layout.resolve(&c.name)))
            .collect();
        nearest_within(&anchors, world, radius, |(_, pos)| *pos).map(|(name, _)| (*name).to_string())
    }

    /// Starts the admission animation of a validated item. The comet leaves from the add
    /// button and flies to the category anchor; the item is committed when it lands.
    pub fn submit_item(&mut self, item: NewItem, view: &dyn ViewportAdapter) {
        let start = match view.element_bounds(ADD_BUTTON) {
            Some(bounds) => view.pointer_to_world(bounds.center()),
            None => self.layout.viewport().center_bottom(),
        };
        let target = self.layout.resolve(&item.category);
        let color = self.category_color(&item.category);
        if self.effects.comet().is_some() {
            debug!("comet in flight, {} is queued", item.name);
        }
        self.effects.launch_comet(item, start, target, color);
    }

    fn burst_at_star(&mut self, id: &str) {
        let Some(star) = self.simulation.star(id) else {
            return;
        };
        let (pos, color) = (star.pos, self.category_color(&star.item.category));
        self.effects.trigger_supernova(pos, color);
    }

    /// Checks the item off: burst at its star, then archive it remotely.
    pub fn archive_item(&mut self, id: &str, mirror: &StateMirror) {
        self.burst_at_star(id);
        mirror.archive_item(id);
    }

    /// Burst at the star, then delete the item remotely.
    pub fn delete_item(&mut self, id: &str, mirror: &StateMirror) {
        self.burst_at_star(id);
        mirror.delete_item(id);
    }

    /// Advances one frame: simulation tick, effect aging, then drawing unless hidden.
    /// Returns the comets that landed; their items are ready to be committed.
    pub fn frame(&mut self, ctx: &DrawContext, layers: &mut Layers) -> Vec<Landing> {
        self.simulation.tick();
        let landings = self.effects.update();
        self.title
            .update(self.active_category.as_deref(), self.style.title_fade_step);
        self.starfield.update(&mut self.rng);

        if !self.hidden {
            self.render(ctx, layers);
        }
        landings
    }

    fn render(&mut self, ctx: &DrawContext, layers: &mut Layers) {
        self.starfield.draw(layers, ctx.transform.origin);

        let categories = Arc::clone(&self.categories);
        for cat in categories.iter() {
            let Some(color) = self.category_color(&cat.name) else {
                continue;
            };
            let anchor = self.layout.resolve(&cat.name);
            let active = self.active_category.as_deref() == Some(cat.name.as_str());
            draw_nebula(
                ctx,
                layers,
                anchor,
                color,
                self.interaction.nebula_activation_radius,
                active,
                &mut self.rng,
            );
        }

        if let Some(active) = self.active_category.clone() {
            if let Some(color) = self.category_color(&active) {
                let anchor = self.layout.resolve(&active);
                let members = self
                    .simulation
                    .stars()
                    .filter(|s| s.item.category == active)
                    .map(|s| s.pos);
                draw_constellation(ctx, layers, anchor, color, members);
            }
        }

        if let Some(name) = self.title.name().map(str::to_string) {
            let anchor = self.layout.resolve(&name);
            self.title.draw(ctx, layers, anchor);
        }

        for star in self.simulation.stars() {
            let Some(color) = self.category_colors.get(&star.item.category).copied() else {
                continue;
            };
            let ring = star
                .item
                .assigned_to
                .as_ref()
                .and_then(|u| self.user_colors.get(u).copied());
            let look = StarLook {
                color,
                ring,
                hovered: self.hovered.as_deref() == Some(star.item.id.as_str()),
                flicker: self.rng.random_range(0.7..=1.),
            };
            draw_star(ctx, layers, star, look);
        }

        if let Some(comet) = self.effects.comet() {
            draw_comet(ctx, layers, comet);
        }
        for nova in self.effects.supernovas() {
            draw_supernova(ctx, layers, nova);
        }
    }
}
