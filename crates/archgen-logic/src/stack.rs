//! Vertical stack validation for stairs and lifts.
//!
//! Anchors are the footprints of vertical circulation placed on a lower
//! floor. An anchor-type room on a higher floor must land on the same
//! (x, y); every other room must stay clear of all anchors.

use std::collections::BTreeMap;

use crate::constants::{RoomType, STACK_TOLERANCE};
use crate::layout::PlacedRoom;

/// Anchors carried from floor to floor, keyed by room type.
pub type FixedAnchors = BTreeMap<RoomType, PlacedRoom>;

/// Outcome of a stack check.
#[derive(Debug, Clone, PartialEq)]
pub enum StackCheck {
    Valid,
    Invalid(String),
}

impl StackCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, StackCheck::Valid)
    }
}

/// Check a candidate placement against the anchors from lower floors.
pub fn validate(candidate: &PlacedRoom, anchors: &FixedAnchors) -> StackCheck {
    if candidate.room_type.is_vertical_anchor() {
        let Some(anchor) = anchors.get(&candidate.room_type) else {
            // Ground floor: any position is valid and becomes the anchor.
            return StackCheck::Valid;
        };
        let x_match = (candidate.x - anchor.x).abs() < STACK_TOLERANCE;
        let y_match = (candidate.y - anchor.y).abs() < STACK_TOLERANCE;
        if x_match && y_match {
            return StackCheck::Valid;
        }
        return StackCheck::Invalid(format!(
            "Vertical misalignment: must stack on {} at [{}, {}]",
            candidate.room_type, anchor.x, anchor.y
        ));
    }

    for (room_type, anchor) in anchors {
        if candidate.overlaps(anchor) {
            return StackCheck::Invalid(format!("Collision with vertical shaft: {}", room_type));
        }
    }
    StackCheck::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fixtures::room;

    fn anchors() -> FixedAnchors {
        let mut a = FixedAnchors::new();
        a.insert(
            RoomType::Stairs,
            room("STAIRS_1", RoomType::Stairs, 2.0, 4.0, 3.0, 3.5),
        );
        a
    }

    #[test]
    fn test_first_anchor_anywhere() {
        let stairs = room("STAIRS_1", RoomType::Stairs, 5.0, 5.0, 3.0, 3.5);
        assert!(validate(&stairs, &FixedAnchors::new()).is_valid());
    }

    #[test]
    fn test_anchor_must_match_position() {
        let aligned = room("STAIRS_1", RoomType::Stairs, 2.05, 3.95, 3.0, 3.5);
        assert!(validate(&aligned, &anchors()).is_valid());

        let shifted = room("STAIRS_1", RoomType::Stairs, 2.5, 4.0, 3.0, 3.5);
        match validate(&shifted, &anchors()) {
            StackCheck::Invalid(msg) => assert!(msg.contains("Vertical misalignment")),
            StackCheck::Valid => panic!("shifted stairs must be rejected"),
        }
    }

    #[test]
    fn test_lift_without_anchor_is_free() {
        let lift = room("LIFT_1", RoomType::Lift, 9.0, 9.0, 1.5, 1.5);
        assert!(validate(&lift, &anchors()).is_valid());
    }

    #[test]
    fn test_normal_room_cannot_cover_shaft() {
        let bed = room("BEDROOM_2", RoomType::Bedroom, 3.0, 5.0, 3.0, 3.5);
        assert!(!validate(&bed, &anchors()).is_valid());
        let clear = room("BEDROOM_2", RoomType::Bedroom, 5.0, 4.0, 3.0, 3.5);
        assert!(validate(&clear, &anchors()).is_valid(), "touching the shaft is fine");
    }
}
