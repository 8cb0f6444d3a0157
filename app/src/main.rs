mod app;
mod config;
mod onnx;
mod ui;

use anyhow::Context;
use app::DigitApp;
use config::AppConfig;
use digitpad::Controller;
use eframe::egui;

/// Width reserved for the control panel next to the canvas.
const PANEL_WIDTH: f32 = 260.0;

fn run(config: AppConfig) -> anyhow::Result<()> {
    let classifier = onnx::load_classifier(&config.model, config.softmax)
        .with_context(|| format!("could not start without a model ({})", config.model.display()))?;
    let controller = Controller::new(config.pad_config(), classifier)?;

    let side = config.canvas_size as f32;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([side + PANEL_WIDTH + 40.0, side + 120.0]),
        ..Default::default()
    };
    let save_path = config.save_path.clone();
    eframe::run_native(
        "Handwritten digit recognition (MNIST)",
        native_options,
        Box::new(|_cc| Ok(Box::new(DigitApp::new(controller, save_path)))),
    )
    .map_err(|e| anyhow::anyhow!("the window could not be created: {}", e))
}

fn main() {
    let config = AppConfig::from_args();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(config) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
