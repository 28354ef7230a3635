//! Application state management structures.
//!
//! This module contains the state that backs the planner window: the
//! committed project, canvas measurements and the cached layout, the drag
//! session and pending panel edits.

use super::undo::UndoHistory;
use crate::drag::DragController;
use crate::error::PlacementError;
use crate::layout::{LayoutCache, LayoutView, Viewport};
use crate::project::Project;
use crate::types::{GroupId, PlateId};
use eframe::egui;
use serde::{Deserialize, Serialize};

/// State related to the canvas area and its projection.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasState {
    /// Screen position of the layout area's top-left corner
    #[serde(skip)]
    pub origin: egui::Pos2,
    /// Size of the layout area measured on the last frame
    #[serde(skip)]
    pub viewport: Viewport,
    /// Memoized projection of the visible plates
    #[serde(skip)]
    pub layout: LayoutCache,
    /// Whether distance guides are drawn while dragging
    pub show_guidelines: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            origin: egui::Pos2::ZERO,
            viewport: Viewport::default(),
            layout: LayoutCache::new(),
            show_guidelines: true,
        }
    }
}

/// State related to user interactions with the canvas and panels.
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InteractionState {
    /// Drag session for the active socket group
    #[serde(skip)]
    pub drag: DragController,
    /// Rejection reason waiting to be acknowledged by the user
    #[serde(skip)]
    pub alert: Option<String>,
    /// Whether the socket editor shows the plate summary instead of controls
    #[serde(skip)]
    pub show_summary: bool,
    /// Plate size being dragged in the plate editor, committed on release
    #[serde(skip)]
    pub pending_plate: Option<(PlateId, f64, f64)>,
    /// Group position being dragged in the socket editor, committed on release
    #[serde(skip)]
    pub pending_position: Option<(GroupId, f64, f64)>,
}

/// The main application structure containing UI state and the project.
///
/// This struct implements the `eframe::App` trait and handles all user interface
/// rendering and interaction logic.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct PlateApp {
    /// The committed plates and socket groups
    pub project: Project,
    /// Canvas measurement and layout state
    pub canvas: CanvasState,
    /// User interaction state
    pub interaction: InteractionState,
    /// Undo/redo history of project snapshots
    pub undo_history: UndoHistory,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Remembered width of the properties panel across sessions
    pub properties_panel_width: f32,
}

impl Default for PlateApp {
    fn default() -> Self {
        Self {
            project: Project::default(),
            canvas: CanvasState::default(),
            interaction: InteractionState::default(),
            undo_history: UndoHistory::new(),
            dark_mode: true,
            properties_panel_width: 320.0,
        }
    }
}

impl PlateApp {
    /// Creates an app around an existing project.
    pub fn with_project(project: Project) -> Self {
        Self {
            project,
            ..Self::default()
        }
    }

    /// Serializes the application state to JSON.
    ///
    /// # Returns
    ///
    /// A JSON string representation of the app state, or an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes application state from JSON.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON string containing the serialized app state
    ///
    /// # Returns
    ///
    /// A `PlateApp` instance, or an error if deserialization fails.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replaces the committed project with the outcome of an operation.
    ///
    /// An accepted snapshot is recorded for undo and abandons any drag in
    /// progress. A rejection keeps the current snapshot and raises an alert.
    ///
    /// # Returns
    ///
    /// `true` when the snapshot was accepted.
    pub fn apply(&mut self, outcome: Result<Project, PlacementError>) -> bool {
        match outcome {
            Ok(next) => {
                self.commit(next);
                true
            }
            Err(err) => {
                log::warn!("operation rejected: {err}");
                self.interaction.alert = Some(err.reason());
                false
            }
        }
    }

    /// Installs `next` as the committed project if it differs.
    pub fn commit(&mut self, next: Project) {
        if next == self.project {
            return;
        }
        let previous = std::mem::replace(&mut self.project, next);
        self.undo_history.record(previous);
        self.interaction.drag.cancel();
        self.interaction.show_summary = false;
    }

    /// The layout for the currently visible plates at the last measured size.
    pub fn current_layout(&mut self) -> LayoutView {
        let plates = self.project.visible_plates();
        self.canvas.layout.view(&plates, self.canvas.viewport).clone()
    }

    /// Restores the previous project snapshot.
    pub fn perform_undo(&mut self) {
        if let Some(previous) = self.undo_history.undo(&self.project) {
            self.project = previous;
            self.after_history_step();
        }
    }

    /// Re-applies the most recently undone snapshot.
    pub fn perform_redo(&mut self) {
        if let Some(next) = self.undo_history.redo(&self.project) {
            self.project = next;
            self.after_history_step();
        }
    }

    fn after_history_step(&mut self) {
        self.interaction.drag.cancel();
        self.interaction.pending_plate = None;
        self.interaction.pending_position = None;
        self.interaction.show_summary = false;
    }
}
