//! # Socket Plate Planner
//!
//! A planner for rectangular panels ("plates") with rectangular socket
//! cut-outs ("socket groups"). Placement rules are enforced on every change:
//! - **Plate eligibility**: only plates of at least 40 × 40 cm host sockets
//! - **Edge clearance**: groups keep a minimum distance to every plate edge
//! - **Group spacing**: groups on one plate keep a minimum gap to each other
//!
//! ## Features
//! - Plate editor with a resize cascade that drops invalidated groups
//! - Socket groups of 1 to 5 sockets, horizontal or vertical
//! - Live drag with validity feedback, falling back to the last valid position
//! - Scaled, centered canvas layout shared by plates, groups and guides
//! - Snapshot undo/redo and persisted state

#![deny(unsafe_code)]

pub mod constants;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod project;
pub mod types;
mod ui;

// Re-export public types and functions
pub use drag::{DragCommit, DragController, DragFeedback, DragState, PointerId, PointerPos};
pub use error::{PlacementError, Result};
pub use geometry::{group_extent, is_plate_eligible, rects_overlap, snap_inside_plate, validate_group};
pub use layout::{LayoutCache, LayoutView, Viewport};
pub use project::{PlateSummary, Project};
pub use types::*;
pub use ui::PlateApp;

/// Runs the planner with default settings.
///
/// Previously saved state is restored from eframe storage when available.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// use socket_plate_planner::run_app;
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app()
/// }
/// ```
pub fn run_app() -> std::result::Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Socket Plate Planner",
        options,
        Box::new(|cc| Ok(Box::new(PlateApp::load(cc.storage)))),
    )
}
