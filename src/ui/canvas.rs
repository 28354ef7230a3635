//! Canvas measurement and pointer routing.
//!
//! Raw egui input is translated into press/move/release/cancel signals
//! tagged with a pointer id and fed to the drag controller. The mouse is
//! pointer 0; touch points get their own ids so a second finger never
//! steers a drag started by the first.

use super::state::PlateApp;
use crate::constants::CANVAS_GUTTER;
use crate::drag::{DragFeedback, PointerId, PointerPos};
use crate::layout::{LayoutView, Viewport};
use crate::types::{Rect, SocketGroup};
use eframe::egui;

/// Pointer id used for the mouse.
pub const MOUSE_POINTER: PointerId = 0;

/// One pointer signal extracted from the egui event stream.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerSignal {
    Down(PointerId, egui::Pos2),
    Move(PointerId, egui::Pos2),
    Up(PointerId),
    Cancel,
}

fn touch_pointer(id: egui::TouchId) -> PointerId {
    // Mouse keeps id 0.
    id.0.wrapping_add(1)
}

fn pointer_signals(events: &[egui::Event]) -> Vec<PointerSignal> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } => Some(if *pressed {
                PointerSignal::Down(MOUSE_POINTER, *pos)
            } else {
                PointerSignal::Up(MOUSE_POINTER)
            }),
            egui::Event::PointerMoved(pos) => Some(PointerSignal::Move(MOUSE_POINTER, *pos)),
            egui::Event::PointerGone => Some(PointerSignal::Cancel),
            egui::Event::Touch { id, phase, pos, .. } => {
                let pointer = touch_pointer(*id);
                Some(match phase {
                    egui::TouchPhase::Start => PointerSignal::Down(pointer, *pos),
                    egui::TouchPhase::Move => PointerSignal::Move(pointer, *pos),
                    egui::TouchPhase::End => PointerSignal::Up(pointer),
                    egui::TouchPhase::Cancel => PointerSignal::Cancel,
                })
            }
            _ => None,
        })
        .collect()
}

impl PlateApp {
    /// Allocates the canvas, routes pointer input and paints the plates.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        let area = response.rect.shrink(CANVAS_GUTTER);
        self.canvas.origin = area.min;
        self.canvas.viewport = Viewport::new(
            f64::from(area.width().max(0.0)),
            f64::from(area.height().max(0.0)),
        );
        let view = self.current_layout();

        self.handle_group_dragging(ui, &view);

        self.render_canvas(&painter, &view);
    }

    /// Feeds this frame's pointer events into the drag controller.
    fn handle_group_dragging(&mut self, ui: &egui::Ui, view: &LayoutView) {
        let events = ui.input(|i| i.events.clone());
        for signal in pointer_signals(&events) {
            match signal {
                PointerSignal::Down(pointer, pos) => self.pointer_pressed(pointer, pos, view),
                PointerSignal::Move(pointer, pos) => self.pointer_moved(pointer, pos, view),
                PointerSignal::Up(pointer) => self.pointer_released(pointer),
                PointerSignal::Cancel => {
                    self.interaction.drag.cancel();
                }
            }
        }

        // Capture lost: the mouse button is up but no release reached us.
        let mouse_dragging = self
            .interaction
            .drag
            .session()
            .is_some_and(|s| s.pointer == MOUSE_POINTER);
        if mouse_dragging && !ui.input(|i| i.pointer.primary_down()) {
            self.interaction.drag.cancel();
        }
        if self.interaction.drag.is_dragging() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        }
    }

    /// The group that may be dragged: the editing group, if it is shown.
    pub fn draggable_group(&self) -> Option<SocketGroup> {
        let editing = self.project.editing_id?;
        self.project
            .groups_to_show()
            .into_iter()
            .find(|g| g.id == editing)
    }

    fn pointer_pressed(&mut self, pointer: PointerId, pos: egui::Pos2, view: &LayoutView) {
        let Some(group) = self.draggable_group() else {
            return;
        };
        let Some(rect) = view.group_rect(&group, group.position(), &self.project.rules) else {
            return;
        };
        if !self.screen_rect(rect).contains(pos) {
            return;
        }
        let at = self.to_layout_space(pos);
        self.interaction
            .drag
            .press(pointer, at, &group, self.project.editing_id);
    }

    fn pointer_moved(&mut self, pointer: PointerId, pos: egui::Pos2, view: &LayoutView) {
        let Some(session) = self.interaction.drag.session() else {
            return;
        };
        let group_id = session.group_id;
        let Some(group) = self.project.group(group_id).copied() else {
            self.interaction.drag.cancel();
            return;
        };
        let Some(plate) = self.project.plate(group.plate_id).copied() else {
            self.interaction.drag.cancel();
            return;
        };
        let siblings = self.project.siblings_of(&group);
        let at = self.to_layout_space(pos);
        let feedback = self.interaction.drag.pointer_move(
            pointer,
            at,
            view.scale,
            &group,
            &plate,
            &siblings,
            &self.project.rules,
        );
        if let DragFeedback::Rejected { reason, .. } = feedback {
            log::trace!("drag of {group_id} held: {reason}");
        }
    }

    fn pointer_released(&mut self, pointer: PointerId) {
        if let Some(commit) = self.interaction.drag.release(pointer) {
            let outcome = self.project.commit_drag(commit);
            self.apply(outcome);
        }
    }

    /// Converts a screen position into pixels relative to the layout origin.
    pub fn to_layout_space(&self, pos: egui::Pos2) -> PointerPos {
        PointerPos::new(
            f64::from(pos.x - self.canvas.origin.x),
            f64::from(pos.y - self.canvas.origin.y),
        )
    }

    /// Converts a layout rectangle (pixels from the layout origin) to screen space.
    pub fn screen_rect(&self, rect: Rect) -> egui::Rect {
        egui::Rect::from_min_size(
            self.screen_pos(rect.x, rect.y),
            egui::vec2(rect.width as f32, rect.height as f32),
        )
    }

    pub fn screen_pos(&self, x: f64, y: f64) -> egui::Pos2 {
        self.canvas.origin + egui::vec2(x as f32, y as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_ids_never_collide_with_mouse() {
        assert_ne!(touch_pointer(egui::TouchId(0)), MOUSE_POINTER);
        assert_eq!(touch_pointer(egui::TouchId(4)), 5);
    }

    #[test]
    fn secondary_button_is_not_a_drag_signal() {
        let events = vec![
            egui::Event::PointerButton {
                pos: egui::pos2(1.0, 1.0),
                button: egui::PointerButton::Secondary,
                pressed: true,
                modifiers: egui::Modifiers::NONE,
            },
            egui::Event::PointerMoved(egui::pos2(2.0, 2.0)),
        ];
        assert_eq!(
            pointer_signals(&events),
            vec![PointerSignal::Move(MOUSE_POINTER, egui::pos2(2.0, 2.0))]
        );
    }
}
