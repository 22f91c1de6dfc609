use eframe::{run_native, App, CreationContext, Frame, NativeOptions};
use egui::Context;

const APP_NAME: &str = "Haushalt";

mod app;

pub struct HouseholdApp {
    app: app::App,
}

impl HouseholdApp {
    fn new(_: &CreationContext<'_>) -> Self {
        Self {
            app: app::App::new(),
        }
    }
}

impl App for HouseholdApp {
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        self.app.update(ctx);
    }
}

fn main() {
    env_logger::init();

    let native_options = NativeOptions::default();
    run_native(
        APP_NAME,
        native_options,
        Box::new(|cc| Ok(Box::new(HouseholdApp::new(cc)))),
    )
    .unwrap();
}
