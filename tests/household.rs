use std::sync::Arc;

use egui::{Pos2, Rect, Vec2};
use egui_galaxy::draw::{DrawContext, Layers};
use egui_galaxy::{
    lists, Collection, MemoryStore, Metadata, NewItem, Priority, RemoteStore, StateMirror,
    Transform, WorldConfig, WorldState,
};

struct Household {
    store: Arc<MemoryStore>,
    mirror: StateMirror,
    world: WorldState,
}

impl Household {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let mut mirror = StateMirror::connect(store.clone()).unwrap();
        mirror.seed_initial_data();
        let config = WorldConfig {
            seed: Some(42),
            ..WorldConfig::default()
        };
        let world = WorldState::new(
            config,
            Rect::from_min_size(Pos2::ZERO, Vec2::new(1200., 800.)),
        );
        let mut h = Self {
            store,
            mirror,
            world,
        };
        h.sync();
        h.sync();
        h
    }

    fn sync(&mut self) {
        let changed = self.mirror.poll();
        self.world.apply_mirror(&self.mirror, changed);
    }

    /// Runs headless frames, committing landed comets like the widget does.
    fn frames(&mut self, n: usize) {
        let ctx = egui::Context::default();
        let transform = Transform::default();
        self.world.set_hidden(true);
        for _ in 0..n {
            let mut layers = Layers::default();
            let dc = DrawContext {
                ctx: &ctx,
                transform: &transform,
                time_ms: 0.,
            };
            for landing in self.world.frame(&dc, &mut layers) {
                self.mirror.add_item(&landing.item);
            }
            self.sync();
        }
    }
}

#[test]
fn seeded_household_settles_without_overlap() {
    let mut h = Household::new();
    for name in ["Brot", "Eier", "Butter", "Käse"] {
        h.mirror
            .add_item(&NewItem::new(name, Some("Küche"), Priority::Normal).unwrap());
    }
    h.sync();
    assert_eq!(h.world.simulation().node_count(), 6);

    h.frames(1000);
    assert!(h.world.simulation().is_settled());

    let stars: Vec<_> = h.world.simulation().stars().collect();
    for (i, a) in stars.iter().enumerate() {
        for b in &stars[i + 1..] {
            let min = if a.item.is_assigned() { 35. } else { 30. }
                + if b.item.is_assigned() { 35. } else { 30. };
            assert!(a.pos.distance(b.pos) >= min - 0.01);
        }
    }
}

#[test]
fn submitted_items_are_admitted_once_in_order() {
    let mut h = Household::new();
    let meta = Metadata::default();
    for name in ["Äpfel", "Birnen", "Kirschen"] {
        let item = NewItem::new(name, Some("Allgemein"), Priority::Low).unwrap();
        h.world.submit_item(item, &meta);
    }
    assert_eq!(h.world.effects().queued(), 2);

    h.frames(400);
    let names: Vec<String> = h
        .mirror
        .items()
        .iter()
        .filter(|i| i.category == "Allgemein")
        .map(|i| i.name.clone())
        .collect();
    assert_eq!(names, vec!["Äpfel", "Birnen", "Kirschen"]);
    assert!(h.world.effects().is_idle());
}

#[test]
fn check_off_flow_archives_and_lists() {
    let mut h = Household::new();
    let seife = h
        .mirror
        .items()
        .iter()
        .find(|i| i.name == "Seife")
        .map(|i| i.id.clone())
        .unwrap();
    let milch = h
        .mirror
        .items()
        .iter()
        .find(|i| i.name == "Milch")
        .map(|i| i.id.clone())
        .unwrap();

    h.mirror.assign(&milch, "Du");
    h.mirror.assign(&seife, "Du");
    h.sync();
    let items = h.mirror.items();
    let mine: Vec<&str> = lists::my_items(&items, "Du")
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(mine, vec!["Seife", "Milch"]);

    h.world.archive_item(&seife, &h.mirror);
    h.sync();
    h.world.archive_item(&milch, &h.mirror);
    h.sync();

    assert!(h.mirror.items().is_empty());
    assert_eq!(h.world.simulation().node_count(), 0);
    let archive = h.mirror.archive();
    let newest: Vec<&str> = lists::archive_newest_first(&archive)
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(newest, vec!["Milch", "Seife"]);
    assert_eq!(h.world.effects().supernovas().len(), 2);
}

#[test]
fn offline_store_leaves_world_unchanged() {
    let mut h = Household::new();
    let id = h.mirror.items()[0].id.clone();
    h.store.set_offline(true).unwrap();

    h.world.delete_item(&id, &h.mirror);
    h.sync();
    assert_eq!(h.world.simulation().node_count(), 2);
    assert_eq!(h.store.snapshot(Collection::Items).unwrap().len(), 2);
}

#[test]
fn deleting_a_category_removes_its_stars() {
    let mut h = Household::new();
    for name in ["Shampoo", "Zahnpasta"] {
        h.mirror
            .add_item(&NewItem::new(name, Some("Bad"), Priority::Normal).unwrap());
    }
    h.sync();
    assert_eq!(h.world.simulation().node_count(), 4);

    h.mirror.delete_category_and_items("Bad");
    h.sync();
    assert_eq!(h.world.simulation().node_count(), 1);
    assert!(h.world.category_color("Bad").is_none());
    assert!(h.world.simulation().stars().all(|s| s.item.category == "Küche"));
}

#[test]
fn external_writers_are_mirrored() {
    let mut h = Household::new();
    h.store
        .create_with_generated_key(
            Collection::Categories,
            serde_json::json!({"name": "Garten", "colorVar": "hsla(320, 70%, 55%, 0.8)"}),
        )
        .unwrap();
    h.store
        .create_with_generated_key(
            Collection::Items,
            serde_json::json!({"name": "Erde", "category": "Garten", "assignedTo": "Mia", "priority": "Urgent"}),
        )
        .unwrap();
    h.sync();

    assert!(h.world.category_color("Garten").is_some());
    let anchor = h.world.anchor("Garten");
    let erde = h
        .world
        .simulation()
        .stars()
        .find(|s| s.item.name == "Erde")
        .unwrap();
    assert_eq!(erde.item.assigned_to.as_deref(), Some("Mia"));
    assert_eq!(erde.anchor, anchor);
}
