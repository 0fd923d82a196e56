//! Geometry validation for solved layouts.
//!
//! Pure functions over a `Layout` that return validation errors. The solver
//! guarantees these by construction; the checks exist for layouts that
//! came back from editors, mutators or external JSON.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::constants::{RoomType, STACK_TOLERANCE, TOUCH_TOLERANCE};
use crate::layout::{Layout, PlacedRoom};

/// Aspect ratio above which a room is flagged.
const MAX_ASPECT_RATIO: f32 = 10.0;

/// A geometry validation error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

// ── A. Room geometry (per-room) ─────────────────────────────────────────

/// Check that no room has zero or negative dimensions.
pub fn check_room_dimensions(layout: &Layout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for r in layout.rooms() {
        if !(r.width > 0.0 && r.length > 0.0) {
            errors.push(ValidationError {
                category: "room_geometry",
                severity: Severity::Error,
                message: format!(
                    "Room {} (level {}) has non-positive dimensions: {}×{}",
                    r.id, r.level, r.width, r.length
                ),
            });
        }
    }
    errors
}

/// Check that room aspect ratios are reasonable (< 10:1).
pub fn check_room_aspect_ratios(layout: &Layout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for r in layout.rooms() {
        if r.width <= 0.0 || r.length <= 0.0 {
            continue; // caught by dimension check
        }
        let ratio = r.aspect_ratio();
        if ratio > MAX_ASPECT_RATIO {
            errors.push(ValidationError {
                category: "room_geometry",
                severity: Severity::Warning,
                message: format!(
                    "Room {} has extreme aspect ratio {:.1}:1 ({}×{})",
                    r.id, ratio, r.width, r.length
                ),
            });
        }
    }
    errors
}

/// Check rooms lie inside the buildable envelope.
pub fn check_rooms_within_envelope(layout: &Layout) -> Vec<ValidationError> {
    let (width, length) = (layout.envelope.width, layout.envelope.length);
    let mut errors = Vec::new();
    for r in layout.rooms() {
        if r.x < -TOUCH_TOLERANCE
            || r.y < -TOUCH_TOLERANCE
            || r.right() > width + TOUCH_TOLERANCE
            || r.bottom() > length + TOUCH_TOLERANCE
        {
            errors.push(ValidationError {
                category: "containment",
                severity: Severity::Error,
                message: format!(
                    "Room {} extends outside envelope: ({:.1},{:.1})→({:.1},{:.1}) vs {}×{}",
                    r.id,
                    r.x,
                    r.y,
                    r.right(),
                    r.bottom(),
                    width,
                    length
                ),
            });
        }
    }
    errors
}

// ── B. Room-to-room (pairwise) ──────────────────────────────────────────

/// AABB overlap test: no two non-corridor rooms on the same floor overlap.
pub fn check_room_overlaps(layout: &Layout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for floor in &layout.floors {
        let rooms: Vec<&PlacedRoom> = floor
            .rooms
            .iter()
            .filter(|r| !r.room_type.is_corridor())
            .collect();
        for i in 0..rooms.len() {
            for j in (i + 1)..rooms.len() {
                let (a, b) = (rooms[i], rooms[j]);
                if a.overlaps_with_tolerance(b, TOUCH_TOLERANCE) {
                    errors.push(ValidationError {
                        category: "overlap",
                        severity: Severity::Error,
                        message: format!(
                            "Rooms {} and {} overlap on level {}",
                            a.id, b.id, floor.level
                        ),
                    });
                }
            }
        }
    }
    errors
}

// ── C. Vertical stacking ────────────────────────────────────────────────

/// Every stair or lift must sit at the position of the lowest one.
pub fn check_vertical_alignment(layout: &Layout) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut by_type: BTreeMap<RoomType, Vec<&PlacedRoom>> = BTreeMap::new();
    for r in layout.rooms().filter(|r| r.room_type.is_vertical_anchor()) {
        by_type.entry(r.room_type).or_default().push(r);
    }

    for (room_type, rooms) in by_type {
        let Some((anchor, rest)) = rooms.split_first() else {
            continue;
        };
        for r in rest {
            let dx = (r.x - anchor.x).abs();
            let dy = (r.y - anchor.y).abs();
            if dx >= STACK_TOLERANCE || dy >= STACK_TOLERANCE {
                errors.push(ValidationError {
                    category: "stacking",
                    severity: Severity::Error,
                    message: format!(
                        "{} on level {} at [{}, {}] does not stack on level {} at [{}, {}]",
                        room_type, r.level, r.x, r.y, anchor.level, anchor.x, anchor.y
                    ),
                });
            }
        }
    }
    errors
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all validation checks and return combined errors.
pub fn validate_all(layout: &Layout) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_room_dimensions(layout));
    all.extend(check_room_aspect_ratios(layout));
    all.extend(check_rooms_within_envelope(layout));
    all.extend(check_room_overlaps(layout));
    all.extend(check_vertical_alignment(layout));
    all
}
