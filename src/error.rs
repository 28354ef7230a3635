//! Placement rejections.
//!
//! Every variant is a policy rejection, not a crash: the attempted mutation is
//! discarded and the previous committed state stays as it was. The `Display`
//! text is the reason shown to the user.

use crate::types::{GroupId, PlateId};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlacementError>;

/// Plate edge named by an edge-clearance rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Bottom,
    Right,
    Top,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Edge::Left => "left",
            Edge::Bottom => "bottom",
            Edge::Right => "right",
            Edge::Top => "top",
        })
    }
}

/// Plate dimension named by a range rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::Width => "width",
            Dimension::Height => "height",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("plate is too small for sockets (min {min}×{min} cm)")]
    PlateTooSmall { min: f64 },

    #[error("keep at least {min} cm from the {edge} edge")]
    EdgeClearance { edge: Edge, min: f64 },

    #[error("keep at least {gap} cm distance to other socket groups")]
    SiblingSpacing { sibling: GroupId, gap: f64 },

    #[error("no plate is large enough for sockets (min {min}×{min} cm)")]
    NoEligiblePlate { min: f64 },

    #[error("not enough space on this plate for another socket group")]
    InsufficientSpace,

    #[error("plate {0} does not exist")]
    UnknownPlate(PlateId),

    #[error("socket group {0} does not exist")]
    UnknownGroup(GroupId),

    #[error("at least one plate must remain")]
    LastPlate,

    #[error("sockets are switched off")]
    SocketsDisabled,

    #[error("a socket group holds 1 to {max} sockets, got {count}")]
    InvalidCount { count: u8, max: u8 },

    #[error("plate {dimension} {value} cm is outside {min}–{max} cm")]
    DimensionOutOfRange {
        dimension: Dimension,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl PlacementError {
    /// The user-facing reason string.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
