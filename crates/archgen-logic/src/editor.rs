//! Copy-on-write layout edits.
//!
//! Every edit borrows the current layout, applies the change to a clone,
//! validates the changed room with the guard, and returns the clone. A
//! rejected edit returns `Err` and the caller keeps its original layout.

use crate::constants::{round_to, snap_to_grid, GRID_SIZE};
use crate::error::EditError;
use crate::guard::{self, Bounds, GuardTable};
use crate::layout::{Layout, PlacedRoom};
use crate::stack::{self, FixedAnchors, StackCheck};

/// Smallest side a resize may produce.
const MIN_EDIT_SIDE: f32 = 0.5;

/// Move a room to a new (snapped) position.
pub fn move_room(
    layout: &Layout,
    level: u32,
    room_id: &str,
    x: f32,
    y: f32,
    table: &GuardTable,
) -> Result<Layout, EditError> {
    edit_room(layout, level, room_id, table, |room| {
        room.x = snap_to_grid(x, GRID_SIZE);
        room.y = snap_to_grid(y, GRID_SIZE);
    })
}

/// Resize a room in place; its origin stays fixed.
pub fn resize_room(
    layout: &Layout,
    level: u32,
    room_id: &str,
    width: f32,
    length: f32,
    table: &GuardTable,
) -> Result<Layout, EditError> {
    edit_room(layout, level, room_id, table, |room| {
        room.width = snap_to_grid(width, GRID_SIZE).max(MIN_EDIT_SIDE);
        room.length = snap_to_grid(length, GRID_SIZE).max(MIN_EDIT_SIDE);
    })
}

fn edit_room(
    layout: &Layout,
    level: u32,
    room_id: &str,
    table: &GuardTable,
    apply: impl FnOnce(&mut PlacedRoom),
) -> Result<Layout, EditError> {
    let not_found = || EditError::RoomNotFound {
        level,
        room_id: room_id.to_string(),
    };

    let mut next = layout.clone();
    let bounds = Bounds::from(&next.envelope);
    let anchors = anchors_elsewhere(layout, level);

    let floor = next.floor_mut(level).ok_or_else(not_found)?;
    let index = floor
        .rooms
        .iter()
        .position(|r| r.id == room_id)
        .ok_or_else(not_found)?;

    let mut room = floor.rooms[index].clone();
    apply(&mut room);

    let result = guard::validate(&room, &bounds, &floor.rooms, table);
    if let Some(blocker) = result.blockers.into_iter().next() {
        log::debug!("Edit of {} on level {} rejected: {}", room_id, level, blocker);
        return Err(EditError::Rejected(blocker));
    }
    if room.room_type.is_vertical_anchor() {
        if let StackCheck::Invalid(reason) = stack::validate(&room, &anchors) {
            return Err(EditError::Rejected(reason));
        }
    }

    floor.rooms[index] = room;
    let total = floor.width * floor.length;
    if total > 0.0 {
        let placed: f32 = floor.rooms.iter().map(PlacedRoom::area).sum();
        floor.efficiency = round_to(placed / total, 2);
    }
    Ok(next)
}

/// Stairs and lifts placed on any other floor.
fn anchors_elsewhere(layout: &Layout, level: u32) -> FixedAnchors {
    let mut anchors = FixedAnchors::new();
    for room in layout.rooms() {
        if room.level != level && room.room_type.is_vertical_anchor() {
            anchors.entry(room.room_type).or_insert_with(|| room.clone());
        }
    }
    anchors
}

/// Human-readable change audit between two layouts.
///
/// Rooms are compared by position within their floor, so the audit reads
/// a swap of function as a type change rather than a move.
pub fn diff_layouts(prev: &Layout, next: &Layout) -> Vec<String> {
    let mut changes = Vec::new();
    for (before_floor, after_floor) in prev.floors.iter().zip(&next.floors) {
        for (before, after) in before_floor.rooms.iter().zip(&after_floor.rooms) {
            if before.room_type != after.room_type {
                changes.push(format!(
                    "{} became {} ({})",
                    before.name, after.room_type, after.name
                ));
            }
            if (before.area() - after.area()).abs() > 1e-4 {
                changes.push(format!(
                    "{} area changed from {:.2} → {:.2}",
                    after.room_type,
                    before.area(),
                    after.area()
                ));
            }
            if (before.width - after.width).abs() > 1e-4 {
                changes.push(format!(
                    "{} width changed from {}m → {}m",
                    after.room_type, before.width, after.width
                ));
            }
            if (before.x - after.x).abs() > 1e-4 || (before.y - after.y).abs() > 1e-4 {
                changes.push(format!(
                    "{} moved from [{}, {}] → [{}, {}]",
                    after.room_type, before.x, before.y, after.x, after.y
                ));
            }
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RoomType;
    use crate::layout::fixtures::*;

    #[test]
    fn test_move_snaps_and_copies() {
        let layout = house();
        let moved = move_room(&layout, 0, "BATH_1", 8.2, 0.9, &GuardTable::default()).unwrap();
        let bath = moved.floors[0].room("BATH_1").unwrap();
        assert_eq!((bath.x, bath.y), (8.0, 1.0));
        // Input untouched.
        assert_eq!(layout.floors[0].room("BATH_1").unwrap().x, 7.0);
    }

    #[test]
    fn test_move_into_neighbour_rejected() {
        let layout = house();
        let err = move_room(&layout, 0, "BATH_1", 5.0, 0.0, &GuardTable::default()).unwrap_err();
        assert_eq!(err, EditError::Rejected("Overlaps with KITCHEN".to_string()));
    }

    #[test]
    fn test_move_out_of_bounds_rejected() {
        let layout = house();
        let err = move_room(&layout, 0, "BATH_1", 19.5, 0.0, &GuardTable::default()).unwrap_err();
        assert!(matches!(err, EditError::Rejected(msg) if msg.contains("outside")));
    }

    #[test]
    fn test_unknown_room() {
        let layout = house();
        let err = move_room(&layout, 0, "NOPE", 0.0, 0.0, &GuardTable::default()).unwrap_err();
        assert!(matches!(err, EditError::RoomNotFound { level: 0, .. }));
        let err = move_room(&layout, 3, "BATH_1", 0.0, 0.0, &GuardTable::default()).unwrap_err();
        assert!(matches!(err, EditError::RoomNotFound { level: 3, .. }));
    }

    #[test]
    fn test_resize_clamps_and_validates() {
        let layout = house();
        let err = resize_room(&layout, 0, "BATH_1", 0.1, 0.1, &GuardTable::default()).unwrap_err();
        assert!(matches!(err, EditError::Rejected(msg) if msg.contains("Too narrow")));

        let grown = resize_room(&layout, 0, "BEDROOM_2", 3.0, 4.1, &GuardTable::default()).unwrap();
        let bed = grown.floors[0].room("BEDROOM_2").unwrap();
        assert_eq!((bed.width, bed.length), (3.0, 4.0));
    }

    #[test]
    fn test_stairs_cannot_leave_shaft() {
        let stairs = |x| room("STAIRS_1", RoomType::Stairs, x, 10.0, 3.0, 3.5);
        let layout = Layout::from_floors(
            envelope(20.0, 20.0),
            vec![floor(0, vec![stairs(10.0)]), floor(1, vec![stairs(10.0)])],
        );
        let err = move_room(&layout, 1, "STAIRS_1", 14.0, 10.0, &GuardTable::default()).unwrap_err();
        assert!(matches!(err, EditError::Rejected(msg) if msg.contains("Vertical misalignment")));
    }

    #[test]
    fn test_diff_reports_changes() {
        let layout = house();
        let resized = resize_room(&layout, 0, "BEDROOM_2", 3.5, 3.5, &GuardTable::default()).unwrap();
        let changes = diff_layouts(&layout, &resized);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0], "BEDROOM area changed from 10.50 → 12.25");
        assert_eq!(changes[1], "BEDROOM width changed from 3m → 3.5m");
        assert!(diff_layouts(&layout, &layout).is_empty());
    }
}
