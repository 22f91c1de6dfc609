use std::sync::Arc;

use crossbeam::channel::{unbounded, Receiver, Sender};
use egui::{
    Button, CentralPanel, Color32, ComboBox, Context, Pos2, Rect, RichText, SidePanel, TextEdit,
    TopBottomPanel, Ui, Vec2, Window,
};
use egui_galaxy::{
    lists, Event, GalaxyView, Household, MemoryStore, NewItem, Priority, StateMirror, WorldConfig,
    WorldState, ADD_BUTTON,
};
use log::info;

const COLOR_ERROR: Color32 = Color32::from_rgb(255, 64, 64);
const INITIAL_VIEWPORT: Vec2 = Vec2::new(1280., 720.);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum View {
    #[default]
    Galaxy,
    MyList,
    Archive,
}

#[derive(Default)]
struct AddForm {
    name: String,
    category: Option<String>,
    priority: Priority,
    new_category: String,
    error: Option<String>,
}

pub struct App {
    world: WorldState,
    mirror: StateMirror,
    household: Household,

    events_tx: Sender<Event>,
    events_rx: Receiver<Event>,

    form: AddForm,
    view: View,
    details: Option<String>,
    add_button: Option<Rect>,
    submitted: Vec<NewItem>,
}

impl App {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let mut mirror = StateMirror::connect(store).expect("memory store accepts subscriptions");
        mirror.seed_initial_data();

        let config = WorldConfig::default();
        let household = config.household.clone();
        let world = WorldState::new(config, Rect::from_min_size(Pos2::ZERO, INITIAL_VIEWPORT));

        let (events_tx, events_rx) = unbounded();
        Self {
            world,
            mirror,
            household,
            events_tx,
            events_rx,
            form: AddForm::default(),
            view: View::default(),
            details: None,
            add_button: None,
            submitted: Vec::new(),
        }
    }

    pub fn update(&mut self, ctx: &Context) {
        self.handle_events();

        TopBottomPanel::top("navigation").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.view, View::Galaxy, "Galaxie");
                ui.selectable_value(&mut self.view, View::MyList, "Meine Liste");
                ui.selectable_value(&mut self.view, View::Archive, "Archiv");
            });
        });
        TopBottomPanel::bottom("add_item").show(ctx, |ui| self.draw_add_form(ui));

        if self.view == View::Galaxy {
            if let Some(id) = self.details.clone() {
                SidePanel::right("details").show(ctx, |ui| self.draw_details(ui, &id));
            }
        }

        // the galaxy keeps simulating behind the lists, it just is not drawn
        self.world.set_hidden(self.view != View::Galaxy);
        CentralPanel::default().show(ctx, |ui| {
            let mut view = GalaxyView::new(&mut self.world, &mut self.mirror)
                .with_event_sink(&self.events_tx)
                .with_submitted(self.submitted.drain(..));
            if let Some(rect) = self.add_button {
                view = view.with_element_bounds(ADD_BUTTON, rect);
            }
            ui.add(&mut view);
        });

        match self.view {
            View::Galaxy => {}
            View::MyList => {
                Window::new("Meine Liste").show(ctx, |ui| self.draw_my_list(ui));
            }
            View::Archive => {
                Window::new("Archiv").show(ctx, |ui| self.draw_archive(ui));
            }
        }
    }

    fn handle_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                Event::NodeClick(payload) => self.details = Some(payload.id),
                Event::BackgroundClick => self.details = None,
                Event::CometLanded(payload) => {
                    info!("{} landed in {}", payload.name, payload.category);
                }
                _ => {}
            }
        }
    }

    fn draw_add_form(&mut self, ui: &mut Ui) {
        let categories = self.mirror.categories();
        ui.horizontal(|ui| {
            ui.add(TextEdit::singleline(&mut self.form.name).hint_text("Was fehlt?"));

            ComboBox::from_id_salt("priority")
                .selected_text(self.form.priority.as_str())
                .show_ui(ui, |ui| {
                    for p in Priority::ALL {
                        ui.selectable_value(&mut self.form.priority, p, p.as_str());
                    }
                });

            ComboBox::from_id_salt("category")
                .selected_text(self.form.category.as_deref().unwrap_or("Kategorie wählen"))
                .show_ui(ui, |ui| {
                    for c in categories.iter() {
                        ui.selectable_value(
                            &mut self.form.category,
                            Some(c.name.clone()),
                            c.name.as_str(),
                        );
                    }
                });

            if let Some(name) = self.form.category.clone() {
                if ui.button("Kategorie löschen").clicked() {
                    self.mirror.delete_category_and_items(&name);
                    self.form.category = None;
                }
            }

            ui.separator();
            ui.add(TextEdit::singleline(&mut self.form.new_category).hint_text("Neue Kategorie"));
            if ui.button("Anlegen").clicked() {
                match self.mirror.add_category(&self.form.new_category) {
                    Ok(()) => {
                        self.form.category = Some(self.form.new_category.trim().to_string());
                        self.form.new_category.clear();
                        self.form.error = None;
                    }
                    Err(e) => self.form.error = Some(e.to_string()),
                }
            }

            ui.separator();
            let resp = ui.add(Button::new("Hinzufügen"));
            self.add_button = Some(resp.rect);
            if resp.clicked() {
                match NewItem::new(
                    &self.form.name,
                    self.form.category.as_deref(),
                    self.form.priority,
                ) {
                    Ok(item) => {
                        info!("submitting {} to {}", item.name, item.category);
                        self.submitted.push(item);
                        self.form.name.clear();
                        self.form.error = None;
                    }
                    Err(e) => self.form.error = Some(e.to_string()),
                }
            }
        });

        if let Some(error) = &self.form.error {
            ui.colored_label(COLOR_ERROR, error);
        }
    }

    fn draw_details(&mut self, ui: &mut Ui, id: &str) {
        let Some(item) = self.mirror.item(id).cloned() else {
            self.details = None;
            return;
        };

        ui.heading(&item.name);
        ui.label(format!("Kategorie: {}", item.category));
        ui.label(format!("Priorität: {}", item.priority.as_str()));

        ui.separator();
        ui.label("Zuständig");
        for user in &self.household.users {
            let assigned = item.assigned_to.as_deref() == Some(user.name.as_str());
            let mut text = RichText::new(&user.name);
            if let Some(color) = self.world.user_color(&user.name) {
                text = text.color(color);
            }
            if ui.selectable_label(assigned, text).clicked() {
                self.mirror.assign(id, &user.name);
            }
        }

        ui.separator();
        if ui.button("Erledigt").clicked() {
            self.world.archive_item(id, &self.mirror);
            self.details = None;
        }
        if ui.button("Löschen").clicked() {
            self.world.delete_item(id, &self.mirror);
            self.details = None;
        }
    }

    fn draw_my_list(&mut self, ui: &mut Ui) {
        let items = self.mirror.items();
        let mine = lists::my_items(&items, &self.household.me);
        if mine.is_empty() {
            ui.label("Nichts zu tun.");
            return;
        }

        let mut done = Vec::new();
        for item in mine {
            ui.horizontal(|ui| {
                let mut checked = false;
                if ui.checkbox(&mut checked, "").changed() {
                    done.push(item.id.clone());
                }
                ui.label(format!("{} ({})", item.name, item.priority.as_str()));
                ui.weak(&item.category);
            });
        }
        for id in done {
            self.world.archive_item(&id, &self.mirror);
        }
    }

    fn draw_archive(&self, ui: &mut Ui) {
        let archive = self.mirror.archive();
        for entry in lists::archive_newest_first(&archive) {
            ui.label(format!(
                "{} · {} · {}",
                entry.name, entry.category, entry.timestamp
            ));
        }
    }
}
