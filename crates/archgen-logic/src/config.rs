//! Solver configuration: strategy zone tables, priority order, setbacks.
//!
//! Every lookup table the solver consults lives in `SolverConfig` rather
//! than in module-level statics, so concurrent solves can run with
//! different strategies or tables. Defaults reproduce the standard tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{RoomType, GRID_SIZE};
use crate::grid::Band;
use crate::plot::Setbacks;
use crate::stairs::StairType;

/// Zoning strategy selecting which table of zone preferences to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    #[default]
    Standard,
    Privacy,
    SocialOpen,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Standard, Strategy::Privacy, Strategy::SocialOpen];
}

/// Named placement preference. Only the depth component biases the
/// search; side/internal tags leave the room unrestricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneTag {
    FrontAccess,
    Front,
    FrontWide,
    Central,
    CentralOpen,
    Side,
    SideEntry,
    SideQuiet,
    Rear,
    RearCorner,
    RearQuiet,
    RearFar,
    RearSide,
    Internal,
    InternalShaft,
}

impl ZoneTag {
    pub fn band(self) -> Option<Band> {
        match self {
            ZoneTag::FrontAccess | ZoneTag::Front | ZoneTag::FrontWide => Some(Band::Front),
            ZoneTag::Central | ZoneTag::CentralOpen => Some(Band::Central),
            ZoneTag::Rear
            | ZoneTag::RearCorner
            | ZoneTag::RearQuiet
            | ZoneTag::RearFar
            | ZoneTag::RearSide => Some(Band::Rear),
            ZoneTag::Side
            | ZoneTag::SideEntry
            | ZoneTag::SideQuiet
            | ZoneTag::Internal
            | ZoneTag::InternalShaft => None,
        }
    }
}

/// Resolve the band a room is biased towards from its preference tags.
///
/// Rear wins over central, central over front. Rooms without any
/// preference fall back to the central band.
pub fn preferred_band(tags: Option<&[ZoneTag]>) -> Option<Band> {
    let Some(tags) = tags else {
        return Some(Band::Central);
    };
    let has = |band: Band| tags.iter().any(|t| t.band() == Some(band));
    if has(Band::Rear) {
        Some(Band::Rear)
    } else if has(Band::Central) {
        Some(Band::Central)
    } else if has(Band::Front) {
        Some(Band::Front)
    } else {
        None
    }
}

/// `{strategy → {room type → [zone tags]}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyTable(pub BTreeMap<Strategy, BTreeMap<RoomType, Vec<ZoneTag>>>);

impl Default for StrategyTable {
    fn default() -> Self {
        use RoomType::*;
        use ZoneTag::*;

        let standard = [
            (Parking, vec![FrontAccess]),
            (Stairs, vec![Central, Side]),
            (Living, vec![Front, CentralOpen]),
            (Kitchen, vec![RearCorner, Side]),
            (MasterBedroom, vec![RearQuiet]),
            (Bedroom, vec![Rear, SideQuiet]),
            (Bath, vec![InternalShaft, Side]),
            (Toilet, vec![InternalShaft]),
        ];
        let privacy = [
            (Parking, vec![FrontAccess]),
            (Stairs, vec![SideEntry]),
            (Living, vec![Central]),
            (Kitchen, vec![Rear]),
            (MasterBedroom, vec![RearFar]),
            (Bedroom, vec![RearSide]),
            (Bath, vec![Internal]),
            (Toilet, vec![Internal]),
        ];
        let social = [
            (Parking, vec![FrontAccess]),
            (Stairs, vec![Side]),
            (Living, vec![FrontWide]),
            (Kitchen, vec![CentralOpen]),
            (MasterBedroom, vec![Rear]),
            (Bedroom, vec![Rear]),
            (Bath, vec![Side]),
            (Toilet, vec![Side]),
        ];

        let mut table = BTreeMap::new();
        table.insert(Strategy::Standard, standard.into_iter().collect());
        table.insert(Strategy::Privacy, privacy.into_iter().collect());
        table.insert(Strategy::SocialOpen, social.into_iter().collect());
        Self(table)
    }
}

impl StrategyTable {
    pub fn preferences(&self, strategy: Strategy) -> Option<&BTreeMap<RoomType, Vec<ZoneTag>>> {
        self.0.get(&strategy)
    }
}

/// Placement order; types earlier in the list are placed first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityOrder(pub Vec<RoomType>);

impl Default for PriorityOrder {
    fn default() -> Self {
        Self(vec![
            RoomType::Parking,
            RoomType::Stairs,
            RoomType::Living,
            RoomType::Kitchen,
            RoomType::MasterBedroom,
            RoomType::Bedroom,
            RoomType::Bath,
            RoomType::Toilet,
        ])
    }
}

impl PriorityOrder {
    /// Rank of a type; unlisted types sort after every listed one.
    pub fn rank(&self, room_type: RoomType) -> usize {
        self.0
            .iter()
            .position(|t| *t == room_type)
            .unwrap_or(99)
    }
}

/// Everything a `solve` call needs besides the plot and program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub strategy: Strategy,
    pub setbacks: Setbacks,
    pub grid_size: f32,
    pub stair_type: StairType,
    pub floor_height: f32,
    /// Retry with the whole envelope when the preferred zone is full.
    pub allow_fallback: bool,
    pub strategies: StrategyTable,
    pub priority: PriorityOrder,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Standard,
            setbacks: Setbacks::default(),
            grid_size: GRID_SIZE,
            stair_type: StairType::UShape,
            floor_height: 3.0,
            allow_fallback: true,
            strategies: StrategyTable::default(),
            priority: PriorityOrder::default(),
        }
    }
}

impl SolverConfig {
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }
}

/// Finest grid cell the solver accepts (m).
pub const MIN_GRID_SIZE: f32 = 0.1;
/// Coarsest grid cell the solver accepts (m).
pub const MAX_GRID_SIZE: f32 = 2.0;

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid cell size outside `MIN_GRID_SIZE..=MAX_GRID_SIZE`.
    InvalidGridSize(f32),
    /// Floor-to-floor height outside 2.4–6.0 m.
    InvalidFloorHeight(f32),
    /// A setback is negative or non-finite.
    InvalidSetback(f32),
    /// The selected strategy has no zone table.
    MissingStrategy(Strategy),
    /// A room type appears twice in the priority order.
    DuplicatePriority(RoomType),
}

/// Validate a solver configuration, returning all errors found.
pub fn validate_solver_config(config: &SolverConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&config.grid_size) {
        errors.push(ConfigError::InvalidGridSize(config.grid_size));
    }
    if !(2.4..=6.0).contains(&config.floor_height) {
        errors.push(ConfigError::InvalidFloorHeight(config.floor_height));
    }
    let s = &config.setbacks;
    for v in [s.front, s.back, s.sides] {
        if !v.is_finite() || v < 0.0 {
            errors.push(ConfigError::InvalidSetback(v));
        }
    }
    if config.strategies.preferences(config.strategy).is_none() {
        errors.push(ConfigError::MissingStrategy(config.strategy));
    }
    let mut seen = Vec::new();
    for rt in &config.priority.0 {
        if seen.contains(rt) {
            errors.push(ConfigError::DuplicatePriority(*rt));
        }
        seen.push(*rt);
    }

    errors
}
