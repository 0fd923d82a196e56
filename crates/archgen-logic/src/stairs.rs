//! Staircase footprint model.
//!
//! Pure calculation of the plan footprint a staircase needs for a given
//! type and floor-to-floor height. Results are rounded up to whole 0.5 m
//! grid cells so the solver can place them directly.
//!
//! | Type | Width | Length |
//! |------|-------|--------|
//! | Straight / spiral | 1.2 | steps × tread + landing |
//! | U-shape | 2 × 1.2 + 0.2 | ⌈steps/2⌉ × tread + landing |
//! | L-shape | 2.0 | 2.0 |
//!
//! Spiral stairs have no dedicated model yet and are sized as a single
//! straight flight.

use serde::{Deserialize, Serialize};

use crate::constants::{cells_for, GRID_SIZE};

/// Maximum riser height (m).
pub const RISER: f32 = 0.175;
/// Tread depth (m).
pub const TREAD: f32 = 0.25;
/// Clear flight width (m).
pub const FLIGHT_WIDTH: f32 = 1.2;
/// Landing depth (m).
pub const LANDING: f32 = 1.2;
/// Gap between the two flights of a U-shaped stair (m).
const U_GAP: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StairType {
    Straight,
    #[default]
    UShape,
    LShape,
    Spiral,
}

/// Derived stair geometry beyond the footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StairDetails {
    pub steps: u32,
    pub flights: u32,
    pub tread: f32,
    /// Actual riser height after dividing the floor height evenly.
    pub riser: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StairFootprint {
    pub stair_type: StairType,
    pub width: f32,
    pub length: f32,
    pub details: StairDetails,
}

impl StairFootprint {
    pub fn area(&self) -> f32 {
        self.width * self.length
    }
}

/// Compute the grid-aligned footprint for a staircase.
pub fn calculate_footprint(stair_type: StairType, floor_height: f32) -> StairFootprint {
    let steps = (floor_height / RISER - 1e-4).ceil().max(1.0) as u32;

    let (width, length, flights) = match stair_type {
        StairType::UShape => {
            let per_flight = steps.div_ceil(2);
            (
                FLIGHT_WIDTH * 2.0 + U_GAP,
                per_flight as f32 * TREAD + LANDING,
                2,
            )
        }
        StairType::LShape => (2.0, 2.0, 2),
        StairType::Straight | StairType::Spiral => (FLIGHT_WIDTH, steps as f32 * TREAD + LANDING, 1),
    };

    StairFootprint {
        stair_type,
        width: cells_for(width, GRID_SIZE) as f32 * GRID_SIZE,
        length: cells_for(length, GRID_SIZE) as f32 * GRID_SIZE,
        details: StairDetails {
            steps,
            flights,
            tread: TREAD,
            riser: floor_height / steps as f32,
        },
    }
}
