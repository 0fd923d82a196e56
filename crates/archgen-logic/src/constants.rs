//! Shared constants: grid resolution, tolerances and the room-type enum.
//!
//! Room types are a closed set serialized as SCREAMING_SNAKE_CASE strings
//! (`"MASTER_BEDROOM"`), which is the shape downstream renderers consume.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of one occupancy-grid cell, in meters.
pub const GRID_SIZE: f32 = 0.5;

/// Tolerance for matching a stacked anchor's position across floors.
pub const STACK_TOLERANCE: f32 = 0.1;

/// Tolerance used by the interactive guard so touching walls don't overlap.
pub const TOUCH_TOLERANCE: f32 = 0.01;

/// Absorbs float noise before rounding a length up to whole grid cells.
pub const CELL_EPSILON: f32 = 1e-4;

/// Number of whole grid cells needed to cover `meters`.
pub fn cells_for(meters: f32, cell: f32) -> usize {
    if meters <= 0.0 || cell <= 0.0 {
        return 0;
    }
    (meters / cell - CELL_EPSILON).ceil().max(0.0) as usize
}

/// Number of whole grid cells that fit inside `meters`.
pub fn cells_within(meters: f32, cell: f32) -> usize {
    if meters <= 0.0 || cell <= 0.0 {
        return 0;
    }
    (meters / cell + CELL_EPSILON).floor().max(0.0) as usize
}

/// Snap a coordinate to the nearest grid line.
pub fn snap_to_grid(value: f32, cell: f32) -> f32 {
    (value / cell).round() * cell
}

/// Round to `places` decimal places.
pub fn round_to(value: f32, places: i32) -> f32 {
    let factor = 10f32.powi(places);
    (value * factor).round() / factor
}

/// Every room kind the engine knows how to place, score, or police.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    Living,
    Kitchen,
    MasterBedroom,
    Bedroom,
    GuestRoom,
    Study,
    Bath,
    Toilet,
    Stairs,
    Lift,
    Parking,
    Corridor,
}

impl RoomType {
    pub const ALL: [RoomType; 12] = [
        RoomType::Living,
        RoomType::Kitchen,
        RoomType::MasterBedroom,
        RoomType::Bedroom,
        RoomType::GuestRoom,
        RoomType::Study,
        RoomType::Bath,
        RoomType::Toilet,
        RoomType::Stairs,
        RoomType::Lift,
        RoomType::Parking,
        RoomType::Corridor,
    ];

    /// Wire name, e.g. `MASTER_BEDROOM`.
    pub fn as_str(self) -> &'static str {
        match self {
            RoomType::Living => "LIVING",
            RoomType::Kitchen => "KITCHEN",
            RoomType::MasterBedroom => "MASTER_BEDROOM",
            RoomType::Bedroom => "BEDROOM",
            RoomType::GuestRoom => "GUEST_ROOM",
            RoomType::Study => "STUDY",
            RoomType::Bath => "BATH",
            RoomType::Toilet => "TOILET",
            RoomType::Stairs => "STAIRS",
            RoomType::Lift => "LIFT",
            RoomType::Parking => "PARKING",
            RoomType::Corridor => "CORRIDOR",
        }
    }

    /// Human-facing label used in generated room names and messages.
    pub fn label(self) -> &'static str {
        match self {
            RoomType::Living => "Living Room",
            RoomType::Kitchen => "Kitchen",
            RoomType::MasterBedroom => "Master Bedroom",
            RoomType::Bedroom => "Bedroom",
            RoomType::GuestRoom => "Guest Room",
            RoomType::Study => "Study",
            RoomType::Bath => "Bath",
            RoomType::Toilet => "Toilet",
            RoomType::Stairs => "Stairs",
            RoomType::Lift => "Lift",
            RoomType::Parking => "Parking",
            RoomType::Corridor => "Corridor",
        }
    }

    /// Stairs and lifts must occupy the same footprint on every floor.
    pub fn is_vertical_anchor(self) -> bool {
        matches!(self, RoomType::Stairs | RoomType::Lift)
    }

    /// Corridors are fluid circulation space and excluded from overlap checks.
    pub fn is_corridor(self) -> bool {
        self == RoomType::Corridor
    }

    /// Rooms whose function can be traded between spaces by the swap mutator.
    pub fn is_swappable(self) -> bool {
        matches!(self, RoomType::Bedroom | RoomType::GuestRoom | RoomType::Study)
    }

    /// Display color for the blueprint renderer.
    pub fn color(self) -> &'static str {
        match self {
            RoomType::Living => "#4ade80",
            RoomType::Bedroom | RoomType::GuestRoom => "#60a5fa",
            RoomType::MasterBedroom => "#818cf8",
            RoomType::Kitchen => "#facc15",
            RoomType::Bath | RoomType::Toilet => "#38bdf8",
            RoomType::Parking => "#94a3b8",
            RoomType::Stairs | RoomType::Lift => "#f97316",
            _ => "#ffffff",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
