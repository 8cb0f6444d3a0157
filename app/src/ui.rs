use crate::app::DigitApp;

use ecolor::Hsva;
use eframe::egui::{self, Color32, RichText, Sense, Ui, Vec2};

const INK: Color32 = Color32::BLACK;
const PAPER: Color32 = Color32::WHITE;

/// Draws the right-side panel with the result, the buttons and the bookkeeping lists.
pub fn draw_side_panel(app: &mut DigitApp, ctx: &egui::Context) {
    egui::SidePanel::right("controls_panel")
        .resizable(false)
        .min_width(220.0)
        .show(ctx, |ui| {
            draw_result(app, ui);
            ui.separator();

            draw_actions(app, ui);
            ui.separator();

            draw_judgement(app, ui);
            ui.separator();

            draw_history(app, ui);
            ui.separator();

            draw_top_probabilities(app, ui);

            if let Some(status) = &app.status {
                ui.separator();
                ui.label(status);
            }
        });
}

/// Draws the central panel holding the drawing canvas and the model's-eye thumbnail.
pub fn draw_central_panel(app: &mut DigitApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (width, height) = app.controller.canvas().dimensions();
        let (response, painter) =
            ui.allocate_painter(Vec2::new(width as f32, height as f32), Sense::drag());
        let origin = response.rect.min;

        // --- Drawing Layers ---
        painter.rect_filled(response.rect, 0.0, PAPER);
        for dab in app.controller.canvas().dabs() {
            let center = origin + Vec2::new(dab.x, dab.y);
            painter.circle_filled(center, dab.radius, INK);
        }
        painter.rect_stroke(
            response.rect,
            0.0,
            egui::Stroke::new(1.0, egui::hex_color!("#7f8c8d")),
            egui::StrokeKind::Outside,
        );

        // --- Interaction Handling ---
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = pos - origin;
                app.controller.on_stroke(local.x, local.y);
            }
        }

        ui.add_space(8.0);
        if let Some(texture) = &app.thumbnail {
            ui.add(egui::Image::new((texture.id(), texture.size_vec2())));
        }
    });
}

fn draw_result(app: &DigitApp, ui: &mut Ui) {
    let text = RichText::new(app.controller.result_text()).size(16.0);
    match &app.last_outcome {
        Some(outcome) => {
            ui.label(text.color(confidence_color(outcome.result.probability)));
        }
        None => {
            ui.label(text);
        }
    }
    ui.small(app.controller.model_name());
}

fn draw_actions(app: &mut DigitApp, ui: &mut Ui) {
    let width = ui.available_width();
    if ui
        .add_sized([width, 24.0], egui::Button::new("Predict (V)"))
        .clicked()
    {
        let ctx = ui.ctx().clone();
        app.predict(&ctx);
    }
    if ui
        .add_sized([width, 24.0], egui::Button::new("Clear (C)"))
        .clicked()
    {
        app.clear();
    }

    ui.horizontal(|ui| {
        ui.label("File:");
        ui.text_edit_singleline(&mut app.save_path)
            .on_hover_text("PNG file to write; leave empty to skip");
    });
    if ui.add_sized([width, 24.0], egui::Button::new("Save")).clicked() {
        app.save();
    }
}

fn draw_judgement(app: &mut DigitApp, ui: &mut Ui) {
    let width = ui.available_width();
    if ui
        .add_sized([width, 24.0], egui::Button::new("✔ Correct"))
        .clicked()
    {
        app.mark_correct();
    }
    if ui
        .add_sized([width, 24.0], egui::Button::new("✘ Incorrect"))
        .clicked()
    {
        app.mark_incorrect();
    }

    let counters = app.controller.session().counters;
    match counters.accuracy() {
        Some(ratio) => {
            ui.colored_label(
                confidence_color(ratio as f32),
                format!("{} ({:.0}%)", counters, ratio * 100.0),
            );
        }
        None => {
            ui.label(counters.to_string());
        }
    }
}

fn draw_history(app: &DigitApp, ui: &mut Ui) {
    ui.label("History:");
    egui::ScrollArea::vertical()
        .id_salt("history")
        .max_height(80.0)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for entry in app.controller.session().history.iter() {
                ui.monospace(entry.to_string());
            }
        });
}

fn draw_top_probabilities(app: &DigitApp, ui: &mut Ui) {
    ui.label("Top 3 probabilities:");
    if let Some(outcome) = &app.last_outcome {
        for score in &outcome.result.top {
            ui.monospace(score.to_string());
        }
    }
}

/// Maps a value in [0, 1] onto a red-to-green hue.
fn confidence_color(value: f32) -> Color32 {
    let hue = value.clamp(0.0, 1.0) / 3.0;
    Color32::from(Hsva {
        h: hue,
        s: 0.85,
        v: 0.75,
        a: 1.0,
    })
}

