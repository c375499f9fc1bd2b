use eframe::egui;

mod app;
mod catalog;
mod config;

fn main() -> eframe::Result<()> {
    env_logger::init();
    eframe::run_native(
        "Sheet Editor",
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 640.0]),
            ..Default::default()
        },
        Box::new(|cc| Ok(Box::new(app::DemoApp::new(cc)))),
    )
}
