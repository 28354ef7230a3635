//! Canvas painting for plates, socket groups and drag feedback.
//!
//! Everything is drawn from a [`LayoutView`] so plates, groups, socket cells
//! and guides share one scale.

use super::state::PlateApp;
use crate::constants::{
    ANCHOR_DOT_RADIUS, DIM_LABEL_OFFSET, IDLE_GROUP_OPACITY, REASON_BUBBLE_OFFSET,
};
use crate::layout::{dimension_label, Guidelines, LayoutView};
use crate::types::SocketGroup;
use eframe::egui;
use eframe::epaint::StrokeKind;

impl PlateApp {
    /// Renders all canvas elements.
    ///
    /// Plates first, then their groups, then the drag overlays on top.
    pub fn render_canvas(&self, painter: &egui::Painter, view: &LayoutView) {
        for plate in self.project.visible_plates() {
            self.draw_plate(painter, view, &plate);
        }

        let active = self.draggable_group().map(|g| g.id);
        for group in self.project.groups_to_show() {
            self.draw_group(painter, view, &group, Some(group.id) == active);
        }

        if let Some(session) = self.interaction.drag.session() {
            if let Some(group) = self.project.group(session.group_id) {
                if self.canvas.show_guidelines {
                    if let Some(guides) = view.guidelines(group.plate_id, session.live) {
                        self.draw_guidelines(painter, &guides);
                    }
                }
                if let Some(reason) = &session.invalid_reason {
                    self.draw_reason_bubble(painter, view, group, &reason.reason());
                }
            }
        }
    }

    fn draw_plate(&self, painter: &egui::Painter, view: &LayoutView, plate: &crate::types::Plate) {
        let Some(rect) = view.plate_rect(plate.id) else {
            return;
        };
        let rect = self.screen_rect(rect);
        let eligible = self.project.is_eligible(plate);
        let fill = if self.dark_mode {
            egui::Color32::from_gray(70)
        } else {
            egui::Color32::from_gray(215)
        };
        let stroke_color = if eligible {
            egui::Color32::from_gray(150)
        } else {
            egui::Color32::from_rgb(170, 110, 60)
        };
        painter.rect_filled(rect, 2.0, fill);
        painter.rect_stroke(rect, 2.0, egui::Stroke::new(1.5, stroke_color), StrokeKind::Inside);

        if let Some((x, y)) = view.dimension_label_anchor(plate.id) {
            let pos = self.screen_pos(x, y) + egui::vec2(0.0, DIM_LABEL_OFFSET);
            painter.text(
                pos,
                egui::Align2::CENTER_TOP,
                dimension_label(plate),
                egui::FontId::proportional(13.0),
                self.text_color(),
            );
        }
    }

    fn draw_group(
        &self,
        painter: &egui::Painter,
        view: &LayoutView,
        group: &SocketGroup,
        is_active: bool,
    ) {
        let rules = &self.project.rules;
        let position = self.interaction.drag.display_position(group);
        let Some(outer) = view.group_rect(group, position, rules) else {
            return;
        };
        let opacity = if is_active { 1.0 } else { IDLE_GROUP_OPACITY };
        let accent = egui::Color32::from_rgb(100, 150, 255).gamma_multiply(opacity);
        let cell_fill = egui::Color32::from_gray(245).gamma_multiply(opacity);

        let outer = self.screen_rect(outer);
        painter.rect_stroke(
            outer.expand(2.0),
            3.0,
            egui::Stroke::new(if is_active { 2.0 } else { 1.0 }, accent),
            StrokeKind::Outside,
        );
        for cell in view.socket_rects(group, position, rules) {
            let cell = self.screen_rect(cell);
            let radius = cell.width().min(cell.height()) * 0.2;
            painter.rect_filled(cell, radius, cell_fill);
            painter.rect_stroke(cell, radius, egui::Stroke::new(1.0, accent), StrokeKind::Inside);
            // Two pin holes per socket.
            let r = (cell.width() * 0.08).max(1.0);
            let dx = cell.width() * 0.18;
            for sign in [-1.0, 1.0] {
                painter.circle_filled(cell.center() + egui::vec2(sign * dx, 0.0), r, accent);
            }
        }
    }

    fn draw_guidelines(&self, painter: &egui::Painter, guides: &Guidelines) {
        let color = egui::Color32::from_rgb(255, 170, 60);
        let stroke = egui::Stroke::new(1.0, color);
        let anchor = self.screen_pos(guides.anchor.0, guides.anchor.1);
        let left = self.screen_pos(guides.left_edge.0, guides.left_edge.1);
        let bottom = self.screen_pos(guides.bottom_edge.0, guides.bottom_edge.1);

        painter.extend(egui::Shape::dashed_line(&[left, anchor], stroke, 4.0, 3.0));
        painter.extend(egui::Shape::dashed_line(&[anchor, bottom], stroke, 4.0, 3.0));
        painter.circle_filled(anchor, ANCHOR_DOT_RADIUS, color);

        let font = egui::FontId::proportional(12.0);
        painter.text(
            egui::pos2((left.x + anchor.x) / 2.0, anchor.y - 4.0),
            egui::Align2::CENTER_BOTTOM,
            &guides.left_label,
            font.clone(),
            color,
        );
        painter.text(
            egui::pos2(anchor.x + 4.0, (anchor.y + bottom.y) / 2.0),
            egui::Align2::LEFT_CENTER,
            &guides.bottom_label,
            font,
            color,
        );
    }

    fn draw_reason_bubble(
        &self,
        painter: &egui::Painter,
        view: &LayoutView,
        group: &SocketGroup,
        reason: &str,
    ) {
        let position = self.interaction.drag.display_position(group);
        let Some(rect) = view.group_rect(group, position, &self.project.rules) else {
            return;
        };
        let rect = self.screen_rect(rect);
        let anchor = egui::pos2(rect.center().x, rect.min.y - REASON_BUBBLE_OFFSET);
        let galley = painter.layout_no_wrap(
            reason.to_owned(),
            egui::FontId::proportional(12.0),
            egui::Color32::WHITE,
        );
        let bubble = egui::Rect::from_center_size(
            anchor - egui::vec2(0.0, galley.size().y / 2.0 + 4.0),
            galley.size() + egui::vec2(12.0, 8.0),
        );
        painter.rect_filled(bubble, 4.0, egui::Color32::from_rgb(200, 60, 60));
        painter.galley(bubble.min + egui::vec2(6.0, 4.0), galley, egui::Color32::WHITE);
    }

    fn text_color(&self) -> egui::Color32 {
        if self.dark_mode {
            egui::Color32::from_gray(220)
        } else {
            egui::Color32::from_gray(40)
        }
    }
}
