//! Placement geometry and validation.
//!
//! Pure functions computing a group's occupied rectangle, testing rectangle
//! overlap, validating a candidate placement against its plate and sibling
//! groups, and clamping a group back inside the plate's edge clearance.
//!
//! Spacing between groups is checked by growing both bounding boxes by half
//! the group gap and testing for plain overlap: two axis-aligned boxes are at
//! least `group_gap` apart exactly when their half-gap expansions do not
//! overlap, and the test is symmetric in the two boxes.

use crate::constants::GEOMETRY_EPSILON;
use crate::error::{Edge, PlacementError, Result};
use crate::types::{Direction, Extent, Plate, PlacementRules, Rect, SocketGroup};

/// Bounding-box size of `group`: `(count-1)*(size+gap)+size` along its
/// direction and `size` across it.
pub fn group_extent(group: &SocketGroup, rules: &PlacementRules) -> Extent {
    let socket = rules.socket;
    let count = f64::from(group.count.max(1));
    let span = (count - 1.0) * (socket.size + socket.gap) + socket.size;
    match group.dir {
        Direction::Horizontal => Extent {
            width: span,
            height: socket.size,
        },
        Direction::Vertical => Extent {
            width: socket.size,
            height: span,
        },
    }
}

/// The group's bounding box in plate space (y grows upward from the bottom edge).
pub fn group_rect(group: &SocketGroup, rules: &PlacementRules) -> Rect {
    let extent = group_extent(group, rules);
    Rect::new(group.left, group.bottom, extent.width, extent.height)
}

/// True when `a` and `b` intersect with positive area. Shared edges do not count.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    !(a.right() <= b.x || b.right() <= a.x || a.top() <= b.y || b.top() <= a.y)
}

/// Whether a plate is large enough to host any socket group.
pub fn is_plate_eligible(plate: &Plate, rules: &PlacementRules) -> bool {
    let min = rules.limits.min_socket_plate;
    plate.width >= min && plate.height >= min
}

/// Checks a candidate placement against the plate and its sibling groups.
///
/// Checks run in a fixed order and the first failure wins: plate eligibility,
/// then the left, bottom, right and top edge clearances, then spacing to each
/// sibling in slice order. `siblings` may contain the candidate itself; it is
/// skipped by id.
///
/// Edge and spacing comparisons tolerate [`GEOMETRY_EPSILON`], so a group may
/// sit up to that far past `edge_min` or `group_gap` and still be accepted.
/// A non-finite `left` or `bottom` is reported as a left or bottom edge
/// clearance failure.
pub fn validate_group(
    candidate: &SocketGroup,
    plate: &Plate,
    siblings: &[SocketGroup],
    rules: &PlacementRules,
) -> Result<()> {
    let limits = rules.limits;
    if !is_plate_eligible(plate, rules) {
        return Err(PlacementError::PlateTooSmall {
            min: limits.min_socket_plate,
        });
    }

    let edge_min = limits.edge_min;
    let rect = group_rect(candidate, rules);
    let edge_violation = if !rect.x.is_finite() || rect.x < edge_min - GEOMETRY_EPSILON {
        Some(Edge::Left)
    } else if !rect.y.is_finite() || rect.y < edge_min - GEOMETRY_EPSILON {
        Some(Edge::Bottom)
    } else if rect.right() > plate.width - edge_min + GEOMETRY_EPSILON {
        Some(Edge::Right)
    } else if rect.top() > plate.height - edge_min + GEOMETRY_EPSILON {
        Some(Edge::Top)
    } else {
        None
    };
    if let Some(edge) = edge_violation {
        return Err(PlacementError::EdgeClearance {
            edge,
            min: edge_min,
        });
    }

    let half_gap = limits.group_gap / 2.0;
    // Groups sitting exactly `group_gap` apart must not collide through rounding.
    let padded = rect.expand(half_gap - GEOMETRY_EPSILON);
    let collision = siblings
        .iter()
        .filter(|s| s.id != candidate.id && s.plate_id == candidate.plate_id)
        .find(|s| rects_overlap(&padded, &group_rect(s, rules).expand(half_gap)));
    if let Some(sibling) = collision {
        return Err(PlacementError::SiblingSpacing {
            sibling: sibling.id,
            gap: limits.group_gap,
        });
    }

    Ok(())
}

/// Clamps the group's position into the plate's edge-clearance range.
///
/// Sibling groups are not considered: a snapped group must still pass
/// [`validate_group`] before it is committed. When the plate is narrower than
/// the group plus both clearances, the group is pinned at `edge_min`.
pub fn snap_inside_plate(
    group: &SocketGroup,
    plate: &Plate,
    rules: &PlacementRules,
) -> SocketGroup {
    let edge_min = rules.limits.edge_min;
    let extent = group_extent(group, rules);
    let max_left = edge_min.max(plate.width - edge_min - extent.width);
    let max_bottom = edge_min.max(plate.height - edge_min - extent.height);
    SocketGroup {
        left: group.left.clamp(edge_min, max_left),
        bottom: group.bottom.clamp(edge_min, max_bottom),
        ..*group
    }
}

/// Offset of each socket inside its group, measured from the group's left
/// edge (horizontal) or top edge (vertical), as drawn on screen.
pub fn socket_offsets(group: &SocketGroup, rules: &PlacementRules) -> Vec<(f64, f64)> {
    let step = rules.socket.size + rules.socket.gap;
    (0..group.count)
        .map(|i| {
            let offset = f64::from(i) * step;
            match group.dir {
                Direction::Horizontal => (offset, 0.0),
                Direction::Vertical => (0.0, offset),
            }
        })
        .collect()
}
