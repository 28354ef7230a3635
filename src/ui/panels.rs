//! Side panel: plate editor and socket editor.

use super::state::PlateApp;
use crate::layout::dimension_label;
use crate::types::{Direction, GroupEdit, PlateEdit, Position, SocketGroup};
use eframe::egui;

impl PlateApp {
    /// Draws the properties panel with both editing steps.
    pub fn draw_properties_panel(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.heading("1. Plates");
                ui.separator();
                self.draw_plate_editor(ui);

                ui.add_space(12.0);
                ui.heading("2. Sockets");
                ui.separator();
                self.draw_socket_editor(ui);
            });
    }

    fn draw_plate_editor(&mut self, ui: &mut egui::Ui) {
        let limits = self.project.rules.limits;
        let can_remove = self.project.plates.len() > 1;
        let plates = self.project.plates.clone();

        for (index, plate) in plates.iter().enumerate() {
            let (mut width, mut height) = match self.interaction.pending_plate {
                Some((id, w, h)) if id == plate.id => (w, h),
                _ => (plate.width, plate.height),
            };
            let mut remove = false;
            ui.horizontal(|ui| {
                ui.label(format!("Plate {}", index + 1));
                let w = ui.add(
                    egui::DragValue::new(&mut width)
                        .range(limits.width_min..=limits.width_max)
                        .speed(0.5)
                        .max_decimals(1)
                        .suffix(" cm"),
                );
                ui.label("×");
                let h = ui.add(
                    egui::DragValue::new(&mut height)
                        .range(limits.height_min..=limits.height_max)
                        .speed(0.5)
                        .max_decimals(1)
                        .suffix(" cm"),
                );
                if w.changed() || h.changed() {
                    self.interaction.pending_plate = Some((plate.id, width, height));
                }
                let still_editing = w.dragged() || h.dragged() || w.has_focus() || h.has_focus();
                let pending_here = matches!(
                    self.interaction.pending_plate,
                    Some((id, ..)) if id == plate.id
                );
                if pending_here && !still_editing {
                    self.commit_pending_plate();
                }
                if ui
                    .add_enabled(can_remove, egui::Button::new("🗑"))
                    .on_hover_text("Remove plate")
                    .clicked()
                {
                    remove = true;
                }
            });
            if !self.project.is_eligible(plate) {
                ui.small(format!(
                    "Too small for sockets (min {0}×{0} cm)",
                    limits.min_socket_plate
                ));
            }
            if remove {
                let outcome = self.project.remove_plate(plate.id);
                self.apply(outcome);
            }
        }

        if ui.button("➕ Add plate").clicked() {
            let next = self.project.add_plate();
            self.commit(next);
        }
    }

    /// Commits a plate size edited in the plate editor once the widget is released.
    fn commit_pending_plate(&mut self) {
        if let Some((id, width, height)) = self.interaction.pending_plate.take() {
            let edit = PlateEdit {
                width: Some(width),
                height: Some(height),
            };
            let outcome = self.project.set_plate(id, edit);
            self.apply(outcome);
        }
    }

    fn draw_socket_editor(&mut self, ui: &mut egui::Ui) {
        let mut enabled = self.project.sockets_enabled;
        if ui
            .checkbox(&mut enabled, "Add cut-outs for sockets")
            .changed()
        {
            let next = self.project.set_sockets_enabled(enabled);
            self.commit(next);
        }
        if !self.project.sockets_enabled {
            ui.label("Switch sockets on to add socket groups.");
            return;
        }

        ui.add_space(6.0);
        ui.label("Choose the plate for the socket");
        self.draw_plate_picker(ui);

        let Some(open_id) = self.project.open_plate_id() else {
            ui.label("No plate selected.");
            return;
        };
        ui.separator();

        let has_groups = self.project.groups_on(open_id).next().is_some();
        if self.interaction.show_summary && has_groups {
            self.draw_plate_summary(ui, open_id);
        } else if let Some(group) = self.project.active_group().copied() {
            self.draw_group_controls(ui, &group);
        } else {
            ui.label("This plate has no sockets yet. Use \"Add socket group\" to create the first one.");
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Add socket group").clicked() {
                let outcome = self.project.add_next_group().map(|(next, _)| next);
                self.apply(outcome);
            }
            let label = if self.interaction.show_summary {
                "Edit"
            } else {
                "Summary"
            };
            if ui
                .add_enabled(has_groups, egui::Button::new(label))
                .on_disabled_hover_text("No sockets on this plate")
                .clicked()
            {
                self.interaction.show_summary = !self.interaction.show_summary;
            }
        });
    }

    fn draw_plate_picker(&mut self, ui: &mut egui::Ui) {
        let open_id = self.project.open_plate_id();
        let min = self.project.rules.limits.min_socket_plate;
        let plates = self.project.plates.clone();
        ui.horizontal_wrapped(|ui| {
            for plate in &plates {
                let eligible = self.project.is_eligible(plate);
                let response = ui
                    .add_enabled(
                        eligible,
                        egui::Button::selectable(open_id == Some(plate.id), dimension_label(plate)),
                    )
                    .on_disabled_hover_text(format!("Too small, min {min} × {min} cm"));
                if response.clicked() {
                    let outcome = self.project.select_plate(plate.id);
                    self.apply(outcome);
                }
            }
        });
    }

    fn draw_group_controls(&mut self, ui: &mut egui::Ui, group: &SocketGroup) {
        let rules = self.project.rules;
        let siblings: Vec<SocketGroup> = self.project.groups_on(group.plate_id).copied().collect();

        ui.horizontal_wrapped(|ui| {
            for (i, g) in siblings.iter().enumerate() {
                if ui
                    .selectable_label(g.id == group.id, format!("Group {}", i + 1))
                    .clicked()
                {
                    let outcome = self.project.set_editing(Some(g.id));
                    self.apply(outcome);
                }
            }
        });

        ui.add_space(4.0);
        ui.label("Move this group to plate");
        let current = self
            .project
            .plate(group.plate_id)
            .map(dimension_label)
            .unwrap_or_default();
        let plates = self.project.plates.clone();
        let mut target = None;
        egui::ComboBox::from_id_salt("move_group_plate")
            .selected_text(current)
            .show_ui(ui, |ui| {
                for plate in &plates {
                    let eligible = self.project.is_eligible(plate);
                    let mut text = dimension_label(plate);
                    if !eligible {
                        text.push_str(" (too small)");
                    }
                    let selected = plate.id == group.plate_id;
                    if ui
                        .add_enabled(eligible, egui::Button::selectable(selected, text))
                        .clicked()
                        && !selected
                    {
                        target = Some(plate.id);
                    }
                }
            });
        if let Some(plate_id) = target {
            let outcome = self.project.move_group_to_plate(group.id, plate_id);
            self.apply(outcome);
        }

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Count");
            for n in 1..=rules.socket.max_count {
                if ui.selectable_label(group.count == n, n.to_string()).clicked() && group.count != n {
                    let outcome = self.project.update_group(group.id, GroupEdit::count(n));
                    self.apply(outcome);
                }
            }
        });
        ui.horizontal(|ui| {
            ui.label("Orientation");
            for dir in [Direction::Horizontal, Direction::Vertical] {
                if ui.selectable_label(group.dir == dir, dir.label()).clicked() && group.dir != dir {
                    let outcome = self.project.update_group(group.id, GroupEdit::dir(dir));
                    self.apply(outcome);
                }
            }
        });

        self.draw_position_fields(ui, group);

        let extent = crate::geometry::group_extent(group, &rules);
        ui.small(format!(
            "Group: {:.2} × {:.2} cm • edge distance ≥ {} cm • gap between groups ≥ {} cm",
            extent.width, extent.height, rules.limits.edge_min, rules.limits.group_gap
        ));
        if ui.button("Remove group").clicked() {
            let outcome = self.project.remove_group(group.id);
            self.apply(outcome);
        }
    }

    fn draw_position_fields(&mut self, ui: &mut egui::Ui, group: &SocketGroup) {
        let limits = self.project.rules.limits;
        let Some(plate) = self.project.plate(group.plate_id).copied() else {
            return;
        };
        let (mut left, mut bottom) = match self.interaction.pending_position {
            Some((id, l, b)) if id == group.id => (l, b),
            _ => (group.left, group.bottom),
        };
        ui.horizontal(|ui| {
            ui.label("From left");
            let l = ui.add(
                egui::DragValue::new(&mut left)
                    .range(limits.edge_min..=(plate.width - limits.edge_min).max(limits.edge_min))
                    .speed(0.1)
                    .max_decimals(1)
                    .suffix(" cm"),
            );
            ui.label("From bottom");
            let b = ui.add(
                egui::DragValue::new(&mut bottom)
                    .range(limits.edge_min..=(plate.height - limits.edge_min).max(limits.edge_min))
                    .speed(0.1)
                    .max_decimals(1)
                    .suffix(" cm"),
            );
            if l.changed() || b.changed() {
                self.interaction.pending_position = Some((group.id, left, bottom));
            }
            let still_editing = l.dragged() || b.dragged() || l.has_focus() || b.has_focus();
            if !still_editing {
                if let Some((id, left, bottom)) = self.interaction.pending_position.take() {
                    let edit = GroupEdit::position(Position::new(left, bottom));
                    let outcome = self.project.update_group(id, edit);
                    self.apply(outcome);
                }
            }
        });
    }

    fn draw_plate_summary(&mut self, ui: &mut egui::Ui, plate_id: crate::types::PlateId) {
        let Some(summary) = self.project.plate_summary(plate_id) else {
            return;
        };
        ui.horizontal(|ui| {
            ui.strong(format!("{}.", summary.index + 1));
            ui.label(format!(
                "Plate {:.2} × {:.2} cm",
                summary.plate.width, summary.plate.height
            ));
        });
        ui.horizontal(|ui| {
            ui.label(format!("{} × socket", summary.socket_count));
            ui.label("•");
            ui.label(format!("{:.2} €", summary.price_eur));
        });
        if ui.small_button("Edit").clicked() {
            let outcome = self.project.select_plate(plate_id);
            self.apply(outcome);
            self.interaction.show_summary = false;
        }
    }
}
