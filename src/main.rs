mod api;
mod app;
mod capability;
mod map_view;
mod session;
mod storage;
mod ui;
mod utils;

use adw::prelude::*;
use adw::Application;

fn main() {
    env_logger::init();
    let app = Application::builder()
        .application_id("com.example.ServiceProGtk")
        .build();
    app.connect_activate(|app| {
        if let Err(err) = crate::storage::init() {
            log::warn!("local store unavailable: {err}");
        }
        crate::app::build_ui(app);
    });
    app.run();
}
