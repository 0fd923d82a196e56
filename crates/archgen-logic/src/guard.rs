//! Interactive single-room validation.
//!
//! Checks one proposed room against the buildable bounds, the other rooms
//! on its floor, and a per-type minimum-size table. Bounds and overlap
//! checks exit early; the size checks report every blocker found.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{RoomType, TOUCH_TOLERANCE};
use crate::layout::PlacedRoom;
use crate::plot::Envelope;

/// Size slack allowed on the dimension checks (m / m²).
const SIZE_SLACK: f32 = 0.01;

/// Aspect ratio above which an otherwise valid room gets a warning.
const ELONGATED_RATIO: f32 = 3.0;

/// The rectangle rooms must stay inside, in envelope-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub length: f32,
}

impl From<&Envelope> for Bounds {
    fn from(envelope: &Envelope) -> Self {
        Self {
            width: envelope.width,
            length: envelope.length,
        }
    }
}

/// Minimum dimensions enforced by the guard for one room type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuardLimits {
    pub min_area: f32,
    pub min_width: f32,
}

/// Per-type minimums; types without an entry use `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardTable {
    pub limits: BTreeMap<RoomType, GuardLimits>,
    pub fallback: GuardLimits,
}

impl Default for GuardTable {
    fn default() -> Self {
        let limit = |min_area, min_width| GuardLimits { min_area, min_width };
        let limits = [
            (RoomType::Bedroom, limit(9.0, 2.7)),
            (RoomType::MasterBedroom, limit(11.0, 3.0)),
            (RoomType::Kitchen, limit(4.5, 1.8)),
            (RoomType::Living, limit(12.0, 3.0)),
            (RoomType::Bath, limit(2.5, 1.2)),
            (RoomType::Parking, limit(12.5, 2.5)),
            (RoomType::Stairs, limit(6.0, 1.2)),
        ]
        .into_iter()
        .collect();
        Self {
            limits,
            fallback: limit(2.0, 1.0),
        }
    }
}

impl GuardTable {
    pub fn limits_for(&self, room_type: RoomType) -> GuardLimits {
        self.limits.get(&room_type).copied().unwrap_or(self.fallback)
    }
}

/// Outcome of a guard check. `valid` is false iff `blockers` is non-empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GuardResult {
    pub valid: bool,
    pub blockers: Vec<String>,
    pub warnings: Vec<String>,
}

impl GuardResult {
    fn block(&mut self, message: String) {
        self.valid = false;
        self.blockers.push(message);
    }
}

/// Validate a proposed room. `others` may include the room itself; it is
/// skipped by id.
pub fn validate(room: &PlacedRoom, bounds: &Bounds, others: &[PlacedRoom], table: &GuardTable) -> GuardResult {
    let mut result = GuardResult {
        valid: true,
        ..GuardResult::default()
    };

    if room.x < 0.0
        || room.y < 0.0
        || room.right() > bounds.width + TOUCH_TOLERANCE
        || room.bottom() > bounds.length + TOUCH_TOLERANCE
    {
        result.block("Room extends outside buildable area.".to_string());
        return result;
    }

    if !room.room_type.is_corridor() {
        let hit = others.iter().find(|other| {
            other.id != room.id
                && !other.room_type.is_corridor()
                && room.overlaps_with_tolerance(other, TOUCH_TOLERANCE)
        });
        if let Some(other) = hit {
            result.block(format!("Overlaps with {}", other.room_type));
            return result;
        }
    }

    let limits = table.limits_for(room.room_type);
    if room.min_side() < limits.min_width - SIZE_SLACK {
        result.block(format!("Too narrow (min {}m)", limits.min_width));
    }
    let area = room.area();
    if area < limits.min_area - SIZE_SLACK {
        result.block(format!("Area too small ({:.1}m² < {}m²)", area, limits.min_area));
    }

    let ratio = room.aspect_ratio();
    if result.valid && ratio > ELONGATED_RATIO {
        result
            .warnings
            .push(format!("Elongated proportions ({:.1}:1)", ratio));
    }

    result
}
