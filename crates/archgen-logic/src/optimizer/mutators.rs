//! Layout mutators. Each takes the base layout by reference and returns a
//! mutated clone plus a one-line description of what changed.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::round_to;
use crate::layout::{Layout, PlacedRoom};

/// Maximum relative change applied by a resize.
const RESIZE_INTENSITY: f32 = 0.05;
const CORRIDOR_FACTOR: f32 = 0.95;
/// Corridors are not shrunk below this width.
const MIN_CORRIDOR_WIDTH: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutator {
    Resize,
    Swap,
    ShrinkCorridor,
}

impl Mutator {
    pub const ALL: [Mutator; 3] = [Mutator::Resize, Mutator::Swap, Mutator::ShrinkCorridor];

    pub fn apply<R: Rng + ?Sized>(self, layout: &Layout, rng: &mut R) -> (Layout, String) {
        match self {
            Mutator::Resize => resize_random_room(layout, rng),
            Mutator::Swap => swap_rooms(layout, rng),
            Mutator::ShrinkCorridor => shrink_corridors(layout),
        }
    }
}

/// Indices `(floor, room)` of every room matching `pred`.
fn positions(layout: &Layout, pred: impl Fn(&PlacedRoom) -> bool) -> Vec<(usize, usize)> {
    layout
        .floors
        .iter()
        .enumerate()
        .flat_map(|(fi, f)| {
            f.rooms
                .iter()
                .enumerate()
                .filter(|(_, r)| pred(*r))
                .map(move |(ri, _)| (fi, ri))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Scale one random room's width or length by up to ±5%.
pub fn resize_random_room<R: Rng + ?Sized>(layout: &Layout, rng: &mut R) -> (Layout, String) {
    let mut next = layout.clone();
    let all = positions(layout, |r| r.width > 0.0 && r.length > 0.0);
    let Some(&(fi, ri)) = all.choose(rng) else {
        return (next, "No resizable rooms".to_string());
    };

    let change: f32 = rng.gen_range(-RESIZE_INTENSITY..=RESIZE_INTENSITY);
    let along_width = rng.gen_bool(0.5);
    let room = &mut next.floors[fi].rooms[ri];
    let dimension = if along_width {
        room.width = round_to(room.width * (1.0 + change), 2);
        "width"
    } else {
        room.length = round_to(room.length * (1.0 + change), 2);
        "length"
    };

    let description = format!(
        "Resized {} ({} {}{:.1}%)",
        room.room_type,
        dimension,
        if change > 0.0 { "+" } else { "" },
        change * 100.0
    );
    (next, description)
}

/// Exchange the function of two bedroom-class rooms, leaving their
/// footprints where they are.
pub fn swap_rooms<R: Rng + ?Sized>(layout: &Layout, rng: &mut R) -> (Layout, String) {
    let mut next = layout.clone();
    let candidates = positions(layout, |r| r.room_type.is_swappable());
    if candidates.len() < 2 {
        return (next, "No swap candidates".to_string());
    }

    let picked: Vec<_> = candidates.choose_multiple(rng, 2).copied().collect();
    let ((fa, ra), (fb, rb)) = (picked[0], picked[1]);
    let a = next.floors[fa].rooms[ra].clone();
    let b = next.floors[fb].rooms[rb].clone();

    for (target, source) in [((fa, ra), &b), ((fb, rb), &a)] {
        let room = &mut next.floors[target.0].rooms[target.1];
        room.id = source.id.clone();
        room.name = source.name.clone();
        room.room_type = source.room_type;
        room.color = source.color.clone();
        room.min_width = source.min_width;
        room.min_area = source.min_area;
        room.priority = source.priority;
    }

    (next, format!("Swapped {} with {}", a.name, b.name))
}

/// Narrow every corridor by 5% unless that takes it under the minimum.
pub fn shrink_corridors(layout: &Layout) -> (Layout, String) {
    let mut next = layout.clone();
    let mut changed = false;
    for room in next.floors.iter_mut().flat_map(|f| f.rooms.iter_mut()) {
        if room.room_type.is_corridor() && room.width * CORRIDOR_FACTOR >= MIN_CORRIDOR_WIDTH {
            room.width = round_to(room.width * CORRIDOR_FACTOR, 2);
            changed = true;
        }
    }
    let description = if changed {
        "Optimized Corridor Width (-5%)"
    } else {
        "Corridor already minimal"
    };
    (next, description.to_string())
}
