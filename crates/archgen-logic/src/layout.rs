//! Solver output records for placed rooms, floors and the whole layout.
//!
//! A `Layout` is produced once per solve and treated as a value from then
//! on: editors and mutators clone it and return a new one.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::RoomType;
use crate::plot::Envelope;
use crate::requirements::RoomSpec;

/// A room with resolved, grid-aligned coordinates relative to the
/// envelope origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedRoom {
    pub id: String,
    pub name: String,
    pub room_type: RoomType,
    pub level: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub length: f32,
    pub min_width: f32,
    pub min_area: f32,
    pub priority: u8,
    pub color: String,
}

impl PlacedRoom {
    pub fn from_spec(spec: &RoomSpec, level: u32, x: f32, y: f32, width: f32, length: f32) -> Self {
        Self {
            id: spec.id.clone(),
            name: default_name(spec),
            room_type: spec.room_type,
            level,
            x,
            y,
            width,
            length,
            min_width: spec.min_width,
            min_area: spec.min_area,
            priority: spec.priority,
            color: spec.room_type.color().to_string(),
        }
    }

    pub fn area(&self) -> f32 {
        self.width * self.length
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.length)
    }

    /// Long side over short side; infinite for degenerate rooms.
    pub fn aspect_ratio(&self) -> f32 {
        let short = self.min_side();
        if short <= 0.0 {
            return f32::INFINITY;
        }
        self.width.max(self.length) / short
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.length
    }

    /// Strict AABB intersection; rooms sharing an edge do not overlap.
    pub fn overlaps(&self, other: &PlacedRoom) -> bool {
        self.overlaps_with_tolerance(other, 0.0)
    }

    /// AABB intersection after shrinking both rooms by `tolerance`.
    pub fn overlaps_with_tolerance(&self, other: &PlacedRoom, tolerance: f32) -> bool {
        !(other.x >= self.right() - tolerance
            || other.right() <= self.x + tolerance
            || other.y >= self.bottom() - tolerance
            || other.bottom() <= self.y + tolerance)
    }
}

/// "Bedroom 2" from `BEDROOM_2`.
fn default_name(spec: &RoomSpec) -> String {
    match spec.id.rsplit_once('_') {
        Some((_, n)) if n != "1" && n.chars().all(|c| c.is_ascii_digit()) => {
            format!("{} {}", spec.room_type.label(), n)
        }
        _ => spec.room_type.label().to_string(),
    }
}

/// Why a room could not be placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnplacedReason {
    /// The preferred zone was full and fallback search is disabled.
    ZoneConstraint,
    /// No free rectangle anywhere in the envelope.
    NoValidSpace,
    /// The room's footprint is larger than the envelope itself.
    ExceedsPlotBounds,
    /// Free space existed but not at the stacked anchor position.
    VerticalMisalignment(String),
}

impl fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnplacedReason::ZoneConstraint => f.write_str("Zone constraint"),
            UnplacedReason::NoValidSpace => f.write_str("No valid space"),
            UnplacedReason::ExceedsPlotBounds => f.write_str("Room exceeds plot bounds"),
            UnplacedReason::VerticalMisalignment(msg) => f.write_str(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnplacedRoom {
    pub spec: RoomSpec,
    pub reason: UnplacedReason,
}

/// The solved plan for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorResult {
    pub level: u32,
    pub name: String,
    pub strategy: crate::config::Strategy,
    pub width: f32,
    pub length: f32,
    pub rooms: Vec<PlacedRoom>,
    pub unplaced: Vec<UnplacedRoom>,
    /// Placed room area over envelope area, two decimals.
    pub efficiency: f32,
    pub success: bool,
    pub logs: Vec<String>,
}

impl FloorResult {
    pub fn floor_name(level: u32) -> String {
        if level == 0 {
            "GROUND_FLOOR".to_string()
        } else {
            format!("FLOOR_{}", level)
        }
    }

    pub fn room(&self, id: &str) -> Option<&PlacedRoom> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn room_of_type(&self, room_type: RoomType) -> Option<&PlacedRoom> {
        self.rooms.iter().find(|r| r.room_type == room_type)
    }
}

/// Top-level solver result across all floors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub envelope: Envelope,
    pub floors: Vec<FloorResult>,
    pub unplaced_total: usize,
    pub success: bool,
    pub logs: Vec<String>,
}

impl Layout {
    /// Every placed room on every floor, ground floor first.
    pub fn rooms(&self) -> impl Iterator<Item = &PlacedRoom> {
        self.floors.iter().flat_map(|f| f.rooms.iter())
    }

    pub fn room_count(&self) -> usize {
        self.floors.iter().map(|f| f.rooms.len()).sum()
    }

    pub fn floor(&self, level: u32) -> Option<&FloorResult> {
        self.floors.iter().find(|f| f.level == level)
    }

    pub fn floor_mut(&mut self, level: u32) -> Option<&mut FloorResult> {
        self.floors.iter_mut().find(|f| f.level == level)
    }

    /// The lowest placed staircase, if any.
    pub fn stairs(&self) -> Option<&PlacedRoom> {
        self.rooms().find(|r| r.room_type == RoomType::Stairs)
    }

    pub fn is_multi_story(&self) -> bool {
        self.floors.len() > 1
    }

    pub fn total_area(&self) -> f32 {
        self.rooms().map(PlacedRoom::area).sum()
    }

    /// Build a layout from already-placed floors, recomputing aggregates.
    pub fn from_floors(envelope: Envelope, floors: Vec<FloorResult>) -> Self {
        let unplaced_total = floors.iter().map(|f| f.unplaced.len()).sum();
        let success = floors.iter().all(|f| f.success);
        let logs = floors.iter().flat_map(|f| f.logs.iter().cloned()).collect();
        Self {
            envelope,
            floors,
            unplaced_total,
            success,
            logs,
        }
    }
}
