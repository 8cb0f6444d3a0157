use crate::ui;

use digitpad::{AccuracyCounters, Controller, PredictOutcome};
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use eframe::{App, Frame};
use std::path::Path;

/// The main application struct.
/// It holds the GUI-only state and forwards every user action to the controller.
pub struct DigitApp {
    // --- Core State ---
    /// Canvas, model and session.
    pub controller: Controller,

    // --- UI State ---
    /// The outcome of the most recent successful prediction.
    pub last_outcome: Option<PredictOutcome>,
    /// The 56x56 preview of what the model saw, uploaded once per prediction.
    pub thumbnail: Option<TextureHandle>,
    /// Text of the save-path field.
    pub save_path: String,
    /// Feedback for the last action that failed or wrote a file.
    pub status: Option<String>,
}

impl DigitApp {
    pub fn new(controller: Controller, save_path: String) -> Self {
        Self {
            controller,
            last_outcome: None,
            thumbnail: None,
            save_path,
            status: None,
        }
    }

    pub fn predict(&mut self, ctx: &egui::Context) {
        match self.controller.on_predict() {
            Ok(outcome) => {
                let (w, h) = outcome.thumbnail.dimensions();
                let image = ColorImage::from_gray([w as usize, h as usize], outcome.thumbnail.as_raw());
                self.thumbnail = Some(ctx.load_texture("thumbnail", image, TextureOptions::NEAREST));
                self.last_outcome = Some(outcome);
                self.status = None;
            }
            Err(e) => {
                log::warn!("Prediction failed: {}", e);
                self.status = Some(format!("Prediction failed: {}", e));
            }
        }
    }

    pub fn clear(&mut self) {
        self.controller.on_clear();
    }

    pub fn save(&mut self) {
        let path = self.save_path.trim();
        match self.controller.on_save(Some(Path::new(path))) {
            Ok(Some(written)) => self.status = Some(format!("Saved {}", written.display())),
            Ok(None) => {}
            Err(e) => {
                log::warn!("Save failed: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    pub fn mark_correct(&mut self) -> AccuracyCounters {
        self.controller.on_mark_correct()
    }

    pub fn mark_incorrect(&mut self) -> AccuracyCounters {
        self.controller.on_mark_incorrect()
    }
}

impl App for DigitApp {
    /// The main update loop, called by eframe on every frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Single-key shortcuts, unless the save-path field has focus.
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.key_pressed(egui::Key::C)) {
                self.clear();
            }
            if ctx.input(|i| i.key_pressed(egui::Key::V)) {
                self.predict(ctx);
            }
        }

        ui::draw_side_panel(self, ctx);
        ui::draw_central_panel(self, ctx);
    }
}
