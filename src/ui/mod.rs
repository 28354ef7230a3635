//! User interface for the socket plate planner.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main PlateApp
//! - `canvas` - Canvas measurement and pointer routing into the drag controller
//! - `rendering` - Drawing plates, socket groups, guides and rejection bubbles
//! - `panels` - Plate editor and socket editor in the side panel
//! - `undo` - Snapshot undo/redo history

mod canvas;
mod panels;
mod rendering;
mod state;
mod undo;

pub use state::PlateApp;

use crate::constants::STORAGE_KEY;
use eframe::egui;

impl eframe::App for PlateApp {
    /// Persist entire app state between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => {
                storage.set_string(STORAGE_KEY, json);
            }
            Err(err) => {
                log::error!("Failed to serialize app state: {err}");
            }
        }
    }

    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.show(ctx);
    }
}

impl PlateApp {
    /// Restores the app from eframe storage, falling back to defaults.
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        let Some(json) = storage.and_then(|s| s.get_string(STORAGE_KEY)) else {
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(app) => app,
            Err(err) => {
                log::warn!("Ignoring unreadable saved state: {err}");
                Self::default()
            }
        }
    }

    /// Lays out the whole window: toolbar, properties panel, canvas and alerts.
    pub fn show(&mut self, ctx: &egui::Context) {
        self.handle_escape_key(ctx);
        self.handle_undo_redo_keys(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        let viewport_width = ctx.available_rect().width();
        let clamped_width = self
            .properties_panel_width
            .clamp(220.0, (viewport_width * 0.6).max(220.0));

        egui::SidePanel::right("properties_panel")
            .resizable(true)
            .default_width(clamped_width)
            .show(ctx, |ui| {
                let max_allowed = (viewport_width * 0.6).max(220.0);
                self.properties_panel_width = ui.available_width().clamp(220.0, max_allowed);
                self.draw_properties_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });

        self.draw_alert(ctx);
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.undo_history.can_undo(), egui::Button::new("↶ Undo"))
                .clicked()
            {
                self.perform_undo();
            }
            if ui
                .add_enabled(self.undo_history.can_redo(), egui::Button::new("↷ Redo"))
                .clicked()
            {
                self.perform_redo();
            }
            ui.separator();
            ui.checkbox(&mut self.canvas.show_guidelines, "Show guides");
            ui.checkbox(&mut self.dark_mode, "Dark Mode");
        });
    }

    fn draw_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.interaction.alert.clone() else {
            return;
        };
        egui::Window::new("Not possible")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    self.interaction.alert = None;
                }
            });
    }

    /// Escape abandons a drag in progress, otherwise dismisses an alert.
    fn handle_escape_key(&mut self, ctx: &egui::Context) {
        if !ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            return;
        }
        if !self.interaction.drag.cancel() {
            self.interaction.alert = None;
        }
    }

    fn handle_undo_redo_keys(&mut self, ctx: &egui::Context) {
        // Text fields keep their own undo.
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Z) && i.modifiers.command && !i.modifiers.shift) {
            self.perform_undo();
        } else if ctx.input(|i| {
            (i.key_pressed(egui::Key::Z) && i.modifiers.command && i.modifiers.shift)
                || (i.key_pressed(egui::Key::Y) && i.modifiers.command)
        }) {
            self.perform_redo();
        }
    }
}
