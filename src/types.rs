//! Core data types for plates, socket groups, and the placement policy.
//!
//! This module defines the fundamental data structures used throughout the
//! application. All lengths are centimeters measured in plate space: `left`
//! grows to the right from a plate's left edge and `bottom` grows upward from
//! a plate's bottom edge.

use crate::constants;
use crate::error::PlacementError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for plates.
pub type PlateId = Uuid;

/// Unique identifier for socket groups.
pub type GroupId = Uuid;

/// A rectangular panel on which socket groups are placed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Plate {
    /// Stable identifier, unique within the plate collection
    pub id: PlateId,
    /// Width in centimeters
    pub width: f64,
    /// Height in centimeters
    pub height: f64,
}

impl Plate {
    /// Creates a new plate with a fresh identifier.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            width,
            height,
        }
    }
}

/// Axis along which the sockets of a group line up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Direction {
    /// Sockets run left to right
    #[default]
    #[serde(rename = "H")]
    Horizontal,
    /// Sockets run bottom to top
    #[serde(rename = "V")]
    Vertical,
}

impl Direction {
    /// Human-readable label used by the editor panels.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Horizontal => "Horizontal",
            Direction::Vertical => "Vertical",
        }
    }
}

/// A `(left, bottom)` pair locating a group's bounding box on its plate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    /// Distance from the plate's left edge to the group's left edge
    pub left: f64,
    /// Distance from the plate's bottom edge to the group's bottom edge
    pub bottom: f64,
}

impl Position {
    pub fn new(left: f64, bottom: f64) -> Self {
        Self { left, bottom }
    }
}

/// A run of 1–5 identical sockets placed on exactly one plate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SocketGroup {
    /// Stable identifier
    pub id: GroupId,
    /// Owning plate
    pub plate_id: PlateId,
    /// Number of sockets in the group
    pub count: u8,
    /// Orientation of the socket run
    pub dir: Direction,
    /// Left edge, measured from the plate's left edge
    pub left: f64,
    /// Bottom edge, measured from the plate's bottom edge
    pub bottom: f64,
}

impl SocketGroup {
    /// Creates a single horizontal socket at the given position.
    pub fn new(plate_id: PlateId, position: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            plate_id,
            count: 1,
            dir: Direction::Horizontal,
            left: position.left,
            bottom: position.bottom,
        }
    }

    /// The group's current position.
    pub fn position(&self) -> Position {
        Position::new(self.left, self.bottom)
    }

    /// Returns a copy of this group moved to `position`.
    pub fn at(&self, position: Position) -> Self {
        Self {
            left: position.left,
            bottom: position.bottom,
            ..*self
        }
    }
}

/// Bounding-box size of a socket group.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned rectangle. Units depend on the caller (cm in plate space,
/// cm in canvas space, or pixels on screen).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Grows the rectangle outward by `margin` on all four sides.
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }
}

/// Plate bounds and clearances.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Limits {
    pub width_min: f64,
    pub width_max: f64,
    pub height_min: f64,
    pub height_max: f64,
    /// Both plate dimensions must be at least this to host socket groups
    pub min_socket_plate: f64,
    /// Minimum distance between a group and each plate edge
    pub edge_min: f64,
    /// Minimum net distance between two groups on one plate
    pub group_gap: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            width_min: constants::PLATE_WIDTH_MIN,
            width_max: constants::PLATE_WIDTH_MAX,
            height_min: constants::PLATE_HEIGHT_MIN,
            height_max: constants::PLATE_HEIGHT_MAX,
            min_socket_plate: constants::MIN_SOCKET_PLATE,
            edge_min: constants::EDGE_MIN,
            group_gap: constants::GROUP_GAP,
        }
    }
}

/// Physical socket dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SocketSpec {
    /// Side of one square socket
    pub size: f64,
    /// Gap between consecutive sockets in a group
    pub gap: f64,
    /// Largest allowed socket count per group
    pub max_count: u8,
    /// Price per socket, used by plate summaries
    pub price_eur: f64,
}

impl Default for SocketSpec {
    fn default() -> Self {
        Self {
            size: constants::SOCKET_SIZE,
            gap: constants::SOCKET_GAP,
            max_count: constants::MAX_SOCKETS_PER_GROUP,
            price_eur: constants::SOCKET_PRICE_EUR,
        }
    }
}

/// The full placement policy passed to every engine function.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PlacementRules {
    pub limits: Limits,
    pub socket: SocketSpec,
}

impl PlacementRules {
    /// Checks a socket count against `1..=max_count`.
    pub fn check_count(&self, count: u8) -> Result<u8, PlacementError> {
        if (1..=self.socket.max_count).contains(&count) {
            Ok(count)
        } else {
            Err(PlacementError::InvalidCount {
                count,
                max: self.socket.max_count,
            })
        }
    }
}

/// A partial edit applied to a socket group through the editor panel.
///
/// Unset fields keep the group's current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupEdit {
    pub count: Option<u8>,
    pub dir: Option<Direction>,
    pub left: Option<f64>,
    pub bottom: Option<f64>,
}

impl GroupEdit {
    pub fn count(count: u8) -> Self {
        Self {
            count: Some(count),
            ..Self::default()
        }
    }

    pub fn dir(dir: Direction) -> Self {
        Self {
            dir: Some(dir),
            ..Self::default()
        }
    }

    pub fn position(position: Position) -> Self {
        Self {
            left: Some(position.left),
            bottom: Some(position.bottom),
            ..Self::default()
        }
    }

    /// Applies the edit to a copy of `group`.
    pub fn apply(&self, group: &SocketGroup) -> SocketGroup {
        SocketGroup {
            count: self.count.unwrap_or(group.count),
            dir: self.dir.unwrap_or(group.dir),
            left: self.left.unwrap_or(group.left),
            bottom: self.bottom.unwrap_or(group.bottom),
            ..*group
        }
    }
}

/// A partial edit of a plate's dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlateEdit {
    pub width: Option<f64>,
    pub height: Option<f64>,
}
