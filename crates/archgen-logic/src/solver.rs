//! Grid-based constraint solver.
//!
//! Rooms are placed floor by floor, ground first. Each floor gets its own
//! occupancy grid; within a floor rooms are placed in priority order with a
//! first-fit scan (row-major, top-left first) restricted to the room's
//! preferred depth band, then, if allowed, over the whole envelope. Stairs
//! and lifts placed on a lower floor become anchors that higher floors must
//! stack onto.
//!
//! The search is fully deterministic: no randomness, no hash-ordered
//! iteration. Identical inputs always produce identical layouts.

use std::collections::BTreeMap;

use crate::config::{preferred_band, validate_solver_config, SolverConfig, ZoneTag};
use crate::constants::{cells_for, round_to, RoomType};
use crate::error::SolveError;
use crate::grid::{Band, OccupancyGrid, Zones};
use crate::layout::{FloorResult, Layout, PlacedRoom, UnplacedReason, UnplacedRoom};
use crate::plot::{Envelope, Plot};
use crate::requirements::{ProgramSpec, RoomSpec};
use crate::stack::{self, FixedAnchors, StackCheck};
use crate::stairs::{calculate_footprint, StairFootprint};

/// Solve a full multi-floor layout.
///
/// Structural problems (bad plot, malformed program, invalid config, a grid
/// too large to allocate) are returned as `Err`. Rooms that cannot be
/// placed are not errors: they are listed in each floor's `unplaced` with a
/// reason, and `success` is false.
pub fn solve(plot: &Plot, program: &ProgramSpec, config: &SolverConfig) -> Result<Layout, SolveError> {
    let config_errors = validate_solver_config(config);
    if !config_errors.is_empty() {
        return Err(SolveError::InvalidConfig(config_errors));
    }
    program.check()?;
    let envelope = plot.buildable_area(&config.setbacks)?;
    let preferences = config
        .strategies
        .preferences(config.strategy)
        .ok_or_else(|| SolveError::InvalidConfig(Vec::new()))?;

    log::info!(
        "Solving {} floor(s), {} rooms on {:.1}×{:.1} envelope ({:?})",
        program.floors,
        program.rooms.len(),
        envelope.width,
        envelope.length,
        config.strategy
    );

    let stair = (program.floors > 1).then(|| calculate_footprint(config.stair_type, config.floor_height));
    let ctx = FloorContext {
        blank: OccupancyGrid::new(&envelope, config.grid_size)?,
        envelope: &envelope,
        zones: Zones::partition(&envelope),
        preferences,
        config,
        stair,
    };

    let mut anchors = FixedAnchors::new();
    let mut floors = Vec::with_capacity(program.floors as usize);
    for level in 0..program.floors {
        let specs = rooms_for_level(program, level);
        let floor = solve_floor(&ctx, level, specs, &anchors);
        for room in &floor.rooms {
            if room.room_type.is_vertical_anchor() {
                anchors.entry(room.room_type).or_insert_with(|| room.clone());
            }
        }
        floors.push(floor);
    }

    let layout = Layout::from_floors(envelope, floors);
    log::info!(
        "Solve finished: {} placed, {} unplaced, success={}",
        layout.room_count(),
        layout.unplaced_total,
        layout.success
    );
    Ok(layout)
}

/// Inputs shared by every floor of one solve.
struct FloorContext<'a> {
    /// Empty grid cloned for every floor.
    blank: OccupancyGrid,
    envelope: &'a Envelope,
    zones: Zones,
    preferences: &'a BTreeMap<RoomType, Vec<ZoneTag>>,
    config: &'a SolverConfig,
    stair: Option<StairFootprint>,
}

/// Mutable per-floor placement state.
struct FloorState {
    grid: OccupancyGrid,
    placed: Vec<PlacedRoom>,
    unplaced: Vec<UnplacedRoom>,
    logs: Vec<String>,
}

/// Which rooms of the program belong on `level`.
///
/// Vertical circulation and wet rooms repeat on every floor. Parking,
/// living, kitchen and the master bedroom stay on the ground floor. Other
/// bedrooms stay on the ground floor of a single-storey house and are
/// spread round-robin over the upper floors otherwise.
pub fn rooms_for_level(program: &ProgramSpec, level: u32) -> Vec<RoomSpec> {
    let floors = program.floors.max(1);
    let mut sleeping_index = 0u32;
    let mut specs = Vec::new();

    for spec in &program.rooms {
        let on_level = match spec.room_type {
            RoomType::Stairs | RoomType::Lift | RoomType::Bath | RoomType::Toilet => true,
            RoomType::Bedroom | RoomType::GuestRoom | RoomType::Study => {
                let target = if floors == 1 {
                    0
                } else {
                    1 + sleeping_index % (floors - 1)
                };
                sleeping_index += 1;
                target == level
            }
            _ => level == 0,
        };
        if on_level {
            specs.push(spec.clone());
        }
    }
    specs
}

/// Order rooms for placement: priority rank, then larger rooms first.
fn sort_for_placement(specs: &mut [RoomSpec], config: &SolverConfig) {
    specs.sort_by(|a, b| {
        config
            .priority
            .rank(a.room_type)
            .cmp(&config.priority.rank(b.room_type))
            .then(b.min_area.total_cmp(&a.min_area))
    });
}

fn solve_floor(ctx: &FloorContext<'_>, level: u32, mut specs: Vec<RoomSpec>, anchors: &FixedAnchors) -> FloorResult {
    sort_for_placement(&mut specs, ctx.config);

    let mut state = FloorState {
        grid: ctx.blank.clone(),
        placed: Vec::new(),
        unplaced: Vec::new(),
        logs: Vec::new(),
    };
    state.logs.push(format!(
        "{}: placing {} rooms ({:?})",
        FloorResult::floor_name(level),
        specs.len(),
        ctx.config.strategy
    ));

    let outcome = place_all(ctx, level, &specs, anchors, &mut state);
    finish_floor(ctx, level, state, outcome)
}

/// Build the floor record. A placement error keeps the rooms placed so far
/// and marks the floor unsuccessful; other floors are unaffected.
fn finish_floor(
    ctx: &FloorContext<'_>,
    level: u32,
    mut state: FloorState,
    outcome: Result<(), SolveError>,
) -> FloorResult {
    let critical = match outcome {
        Ok(()) => false,
        Err(e) => {
            log::error!("Floor {} aborted: {}", level, e);
            state.logs.push(format!("CRITICAL SOLVER ERROR: {}", e));
            true
        }
    };

    let placed_area: f32 = state.placed.iter().map(PlacedRoom::area).sum();
    let total = ctx.envelope.area();
    let efficiency = if total > 0.0 {
        round_to(placed_area / total, 2)
    } else {
        0.0
    };
    let success = !critical && state.unplaced.is_empty();

    log::debug!(
        "Floor {}: {} placed, {} unplaced, efficiency {:.2}",
        level,
        state.placed.len(),
        state.unplaced.len(),
        efficiency
    );

    FloorResult {
        level,
        name: FloorResult::floor_name(level),
        strategy: ctx.config.strategy,
        width: ctx.envelope.width,
        length: ctx.envelope.length,
        rooms: state.placed,
        unplaced: state.unplaced,
        efficiency,
        success,
        logs: state.logs,
    }
}

/// Slots from `find_slot` always lie inside the grid, so `mark` only fails
/// if the grid and the scan disagree on its dimensions.
fn place_all(
    ctx: &FloorContext<'_>,
    level: u32,
    specs: &[RoomSpec],
    anchors: &FixedAnchors,
    state: &mut FloorState,
) -> Result<(), SolveError> {
    for spec in specs {
        let spec = sized_spec(ctx, spec);
        match find_slot(ctx, level, &spec, anchors, &state.grid) {
            Ok(slot) => {
                state.grid.mark(slot.row, slot.col, slot.w, slot.h)?;
                state
                    .logs
                    .push(format!("Placed {} at [{}, {}]", spec.id, slot.room.x, slot.room.y));
                state.placed.push(slot.room);
            }
            Err(reason) => {
                log::warn!("Level {}: could not place {} ({})", level, spec.id, reason);
                state.logs.push(format!("FAILED: {} - {}", spec.id, reason));
                state.unplaced.push(UnplacedRoom { spec, reason });
            }
        }
    }
    Ok(())
}

/// Stairs take the footprint of the configured stair model on multi-floor
/// programs; every other room keeps its spec.
fn sized_spec(ctx: &FloorContext<'_>, spec: &RoomSpec) -> RoomSpec {
    let mut spec = spec.clone();
    if spec.room_type == RoomType::Stairs {
        if let Some(fp) = &ctx.stair {
            spec.min_width = fp.width;
            spec.min_area = fp.area();
        }
    }
    spec
}

/// A grid block that passed every placement check.
struct Slot {
    row: usize,
    col: usize,
    w: usize,
    h: usize,
    room: PlacedRoom,
}

/// Footprint of a room in grid cells: minimum width across, and enough
/// depth to reach the minimum area.
fn footprint_cells(ctx: &FloorContext<'_>, spec: &RoomSpec) -> (usize, usize) {
    let cell = ctx.config.grid_size;
    if spec.room_type == RoomType::Stairs {
        if let Some(fp) = &ctx.stair {
            return (cells_for(fp.width, cell), cells_for(fp.length, cell));
        }
    }
    (
        cells_for(spec.min_width, cell),
        cells_for(spec.min_area / spec.min_width, cell),
    )
}

fn find_slot(
    ctx: &FloorContext<'_>,
    level: u32,
    spec: &RoomSpec,
    anchors: &FixedAnchors,
    grid: &OccupancyGrid,
) -> Result<Slot, UnplacedReason> {
    let (w, h) = footprint_cells(ctx, spec);
    if w > grid.cols || h > grid.rows {
        return Err(UnplacedReason::ExceedsPlotBounds);
    }

    let band = preferred_band(ctx.preferences.get(&spec.room_type).map(Vec::as_slice));
    let mut stack_rejection = None;

    if let Some(band) = band {
        match scan(ctx, level, spec, anchors, grid, (w, h), Some(band), &mut stack_rejection) {
            Some(slot) => return Ok(slot),
            None if !ctx.config.allow_fallback => return Err(UnplacedReason::ZoneConstraint),
            None => {}
        }
    }

    if let Some(slot) = scan(ctx, level, spec, anchors, grid, (w, h), None, &mut stack_rejection) {
        return Ok(slot);
    }

    match stack_rejection {
        Some(msg) if spec.room_type.is_vertical_anchor() => Err(UnplacedReason::VerticalMisalignment(msg)),
        _ => Err(UnplacedReason::NoValidSpace),
    }
}

/// First-fit scan over the rows of `band` (or the whole grid).
#[allow(clippy::too_many_arguments)]
fn scan(
    ctx: &FloorContext<'_>,
    level: u32,
    spec: &RoomSpec,
    anchors: &FixedAnchors,
    grid: &OccupancyGrid,
    (w, h): (usize, usize),
    band: Option<Band>,
    stack_rejection: &mut Option<String>,
) -> Option<Slot> {
    let cell = grid.cell;
    let (start_y, end_y) = match band {
        Some(b) => ctx.zones.search_range(b, ctx.envelope.length),
        None => (0.0, ctx.envelope.length),
    };
    let row_start = (start_y / cell).floor().max(0.0) as usize;
    let row_end = ((end_y / cell).floor().max(0.0) as usize).min(grid.rows - h);

    for row in row_start..=row_end {
        for col in 0..=(grid.cols - w) {
            if !grid.can_fit(row, col, w, h) {
                continue;
            }
            let room = PlacedRoom::from_spec(
                spec,
                level,
                col as f32 * cell,
                row as f32 * cell,
                w as f32 * cell,
                h as f32 * cell,
            );
            match stack::validate(&room, anchors) {
                StackCheck::Valid => {
                    return Some(Slot {
                        row,
                        col,
                        w,
                        h,
                        room,
                    })
                }
                StackCheck::Invalid(msg) => *stack_rejection = Some(msg),
            }
        }
    }
    None
}
