//! Scaled, centered layout of plates inside a pixel viewport.
//!
//! Visible plates are laid out left to right in one row with a fixed gap,
//! sharing a common bottom baseline. A single uniform scale (px per cm) is
//! chosen so the whole row fits the viewport in both axes, and the row is
//! centered in whichever axis has slack. Every consumer (plates, groups,
//! socket cells, guidelines) converts through the same [`LayoutView`] so all
//! geometry stays pixel-consistent.
//!
//! Logical canvas coordinates are centimeters with y growing downward from
//! the top of the viewport, matching screen orientation.

use crate::constants::{MIN_PADDING_SCALE, PLATE_ROW_GAP};
use crate::geometry::{group_extent, socket_offsets};
use crate::types::{Plate, PlacementRules, PlateId, Position, Rect, SocketGroup};

/// Available drawing area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top-left position of one plate in the logical canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatePlacement {
    pub plate_id: PlateId,
    /// Distance from the canvas left edge (cm)
    pub x: f64,
    /// Distance from the canvas top edge (cm)
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Guide lines drawn while a group is being dragged, in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Guidelines {
    /// The group's bottom-left corner
    pub anchor: (f64, f64),
    /// Start of the horizontal guide on the plate's left edge
    pub left_edge: (f64, f64),
    /// End of the vertical guide on the plate's bottom edge
    pub bottom_edge: (f64, f64),
    /// Label for the horizontal guide, e.g. `"12.5 cm"`
    pub left_label: String,
    /// Label for the vertical guide
    pub bottom_label: String,
}

/// Result of projecting a plate row into a viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutView {
    /// Pixels per centimeter
    pub scale: f64,
    /// Width of the plate row including gaps, at least 1
    pub total_width: f64,
    /// Height of the tallest plate, at least 1
    pub max_height: f64,
    /// Centering padding converted back to centimeters
    pub padding: (f64, f64),
    /// Placements in the order the plates were given
    pub placements: Vec<PlatePlacement>,
}

impl LayoutView {
    /// Lays out `plates` in the given order inside `viewport`.
    pub fn compute(plates: &[Plate], viewport: Viewport) -> Self {
        let total_width = plates
            .iter()
            .enumerate()
            .map(|(i, p)| p.width + if i > 0 { PLATE_ROW_GAP } else { 0.0 })
            .sum::<f64>();
        // An empty row sums to zero; keep the divisor positive.
        let total_width = if total_width > 0.0 { total_width } else { 1.0 };
        let max_height = plates.iter().fold(1.0_f64, |m, p| m.max(p.height));

        let scale = (viewport.width / total_width).min(viewport.height / max_height);
        let scale = if scale.is_finite() { scale.max(0.0) } else { 0.0 };

        let pad_x_px = ((viewport.width - scale * total_width) / 2.0).max(0.0);
        let pad_y_px = ((viewport.height - scale * max_height) / 2.0).max(0.0);
        let divisor = scale.max(MIN_PADDING_SCALE);
        let padding = (pad_x_px / divisor, pad_y_px / divisor);

        let mut x = padding.0;
        let placements = plates
            .iter()
            .map(|p| {
                let placement = PlatePlacement {
                    plate_id: p.id,
                    x,
                    y: padding.1 + (max_height - p.height),
                    width: p.width,
                    height: p.height,
                };
                x += p.width + PLATE_ROW_GAP;
                placement
            })
            .collect();

        Self {
            scale,
            total_width,
            max_height,
            padding,
            placements,
        }
    }

    pub fn cm_to_px(&self, value: f64) -> f64 {
        value * self.scale
    }

    pub fn placement(&self, plate_id: PlateId) -> Option<&PlatePlacement> {
        self.placements.iter().find(|p| p.plate_id == plate_id)
    }

    /// A plate's rectangle in pixels, relative to the viewport's top-left.
    pub fn plate_rect(&self, plate_id: PlateId) -> Option<Rect> {
        self.placement(plate_id).map(|p| self.to_px(Rect::new(p.x, p.y, p.width, p.height)))
    }

    /// Where a plate's `W × H cm` label goes: centered, just under the plate.
    pub fn dimension_label_anchor(&self, plate_id: PlateId) -> Option<(f64, f64)> {
        self.placement(plate_id).map(|p| {
            (
                self.cm_to_px(p.x + p.width / 2.0),
                self.cm_to_px(p.y + p.height),
            )
        })
    }

    /// A group's rectangle in pixels with its bottom-left at `position`.
    ///
    /// `position` is passed separately so a live drag preview can be drawn
    /// without touching the committed group.
    pub fn group_rect(
        &self,
        group: &SocketGroup,
        position: Position,
        rules: &PlacementRules,
    ) -> Option<Rect> {
        let placement = self.placement(group.plate_id)?;
        let extent = group_extent(group, rules);
        let top = placement.y + (placement.height - position.bottom - extent.height);
        let left = placement.x + position.left;
        Some(self.to_px(Rect::new(left, top, extent.width, extent.height)))
    }

    /// Each socket cell of a group in pixels.
    pub fn socket_rects(
        &self,
        group: &SocketGroup,
        position: Position,
        rules: &PlacementRules,
    ) -> Vec<Rect> {
        let Some(outer) = self.group_rect(group, position, rules) else {
            return Vec::new();
        };
        let size = self.cm_to_px(rules.socket.size);
        socket_offsets(group, rules)
            .into_iter()
            .map(|(dx, dy)| Rect::new(outer.x + self.cm_to_px(dx), outer.y + self.cm_to_px(dy), size, size))
            .collect()
    }

    /// Guides from the plate's left and bottom edges to the group anchor.
    pub fn guidelines(&self, plate_id: PlateId, position: Position) -> Option<Guidelines> {
        let p = self.placement(plate_id)?;
        let anchor = (
            self.cm_to_px(p.x + position.left),
            self.cm_to_px(p.y + (p.height - position.bottom)),
        );
        Some(Guidelines {
            anchor,
            left_edge: (self.cm_to_px(p.x), anchor.1),
            bottom_edge: (anchor.0, self.cm_to_px(p.y + p.height)),
            left_label: format!("{:.1} cm", position.left),
            bottom_label: format!("{:.1} cm", position.bottom),
        })
    }

    fn to_px(&self, r: Rect) -> Rect {
        Rect::new(
            self.cm_to_px(r.x),
            self.cm_to_px(r.y),
            self.cm_to_px(r.width),
            self.cm_to_px(r.height),
        )
    }
}

/// A plate's size label, e.g. `"151.5 × 36.8 cm"`.
pub fn dimension_label(plate: &Plate) -> String {
    format!("{:.1} × {:.1} cm", plate.width, plate.height)
}

/// Cache key: the viewport plus each visible plate's id and dimensions.
///
/// Plate identity is compared by value, so unrelated state changes never
/// force a recomputation.
#[derive(Debug, Clone, PartialEq)]
struct LayoutKey {
    viewport: Viewport,
    plates: Vec<(PlateId, f64, f64)>,
}

impl LayoutKey {
    fn new(plates: &[Plate], viewport: Viewport) -> Self {
        Self {
            viewport,
            plates: plates.iter().map(|p| (p.id, p.width, p.height)).collect(),
        }
    }
}

/// Equality-gated memo around [`LayoutView::compute`].
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    entry: Option<(LayoutKey, LayoutView)>,
    recomputations: u64,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached view, recomputing only when the viewport or the
    /// visible plates' ids or dimensions changed.
    pub fn view(&mut self, plates: &[Plate], viewport: Viewport) -> &LayoutView {
        let key = LayoutKey::new(plates, viewport);
        let entry = match self.entry.take() {
            Some((cached, view)) if cached == key => (cached, view),
            _ => {
                self.recomputations += 1;
                log::trace!(
                    "layout recomputed for {} plate(s) in {}x{} px",
                    plates.len(),
                    viewport.width,
                    viewport.height
                );
                let view = LayoutView::compute(plates, viewport);
                (key, view)
            }
        };
        &self.entry.insert(entry).1
    }

    /// How many times the layout was recomputed.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
