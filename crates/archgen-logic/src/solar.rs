//! Solar orientation scoring.
//!
//! Rates kitchens, bedrooms and living rooms by how the plot's road-facing
//! orientation exposes them to sun, using a fixed multiplier table. The
//! average multiplier over the checked rooms becomes the score (×100).
//!
//! | Orientation | Kitchen | Bedroom | Living |
//! |-------------|---------|---------|--------|
//! | North | 0.8 | 1.0 | 1.0 |
//! | East | 1.2 | 1.0 | 1.1 |
//! | South | 0.5 | 0.8 | 0.9 |
//! | West | 0.4 | 0.6 | 0.7 |

use serde::{Deserialize, Serialize};

use crate::constants::RoomType;
use crate::layout::Layout;
use crate::plot::Orientation;

/// Multipliers below this flag a heat-gain risk.
const HEAT_GAIN_LIMIT: f32 = 0.7;
/// Multipliers above this earn a morning-light note.
const MORNING_LIGHT_LIMIT: f32 = 1.1;
const EXCELLENT_ABOVE: f32 = 1.05;
const POOR_BELOW: f32 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolarRating {
    Excellent,
    Neutral,
    Poor,
}

impl SolarRating {
    pub fn from_multiplier(m: f32) -> Self {
        if m > EXCELLENT_ABOVE {
            SolarRating::Excellent
        } else if m < POOR_BELOW {
            SolarRating::Poor
        } else {
            SolarRating::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SolarRating::Excellent => "EXCELLENT",
            SolarRating::Neutral => "NEUTRAL",
            SolarRating::Poor => "POOR (High Heat)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarAnalysis {
    pub orientation: Orientation,
    /// Average multiplier × 100.
    pub score: u32,
    pub rating: SolarRating,
    pub insights: Vec<String>,
}

/// Sun exposure multiplier for a room type, or `None` for rooms the table
/// does not cover.
pub fn multiplier(orientation: Orientation, room_type: RoomType) -> Option<f32> {
    let (kitchen, bedroom, living) = match orientation {
        Orientation::North => (0.8, 1.0, 1.0),
        Orientation::East => (1.2, 1.0, 1.1),
        Orientation::South => (0.5, 0.8, 0.9),
        Orientation::West => (0.4, 0.6, 0.7),
    };
    match room_type {
        RoomType::Kitchen => Some(kitchen),
        RoomType::Bedroom => Some(bedroom),
        RoomType::Living => Some(living),
        _ => None,
    }
}

fn orientation_name(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::North => "NORTH",
        Orientation::East => "EAST",
        Orientation::South => "SOUTH",
        Orientation::West => "WEST",
    }
}

/// Score every covered room of every floor against `orientation`.
pub fn analyze(layout: &Layout, orientation: Orientation) -> SolarAnalysis {
    let mut total = 0.0;
    let mut checks = 0u32;
    let mut insights = Vec::new();

    for room in layout.rooms() {
        let Some(m) = multiplier(orientation, room.room_type) else {
            continue;
        };
        total += m;
        checks += 1;

        if m < HEAT_GAIN_LIMIT {
            insights.push(format!(
                "{} faces {} (High Heat Gain risk). Consider shading.",
                room.room_type,
                orientation_name(orientation)
            ));
        } else if m > MORNING_LIGHT_LIMIT {
            insights.push(format!("{} correctly oriented for Morning Light.", room.room_type));
        }
    }

    let average = if checks > 0 { total / checks as f32 } else { 1.0 };
    SolarAnalysis {
        orientation,
        score: (average * 100.0).round().max(0.0) as u32,
        rating: SolarRating::from_multiplier(average),
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fixtures::*;

    #[test]
    fn test_north_is_neutral() {
        // kitchen 0.8, bedroom 1.0, living 1.0; master bedroom not rated
        let a = analyze(&house(), Orientation::North);
        assert_eq!(a.score, 93);
        assert_eq!(a.rating, SolarRating::Neutral);
        assert!(a.insights.is_empty());
    }

    #[test]
    fn test_east_morning_light() {
        let a = analyze(&house(), Orientation::East);
        assert_eq!(a.score, 110);
        assert_eq!(a.rating, SolarRating::Excellent);
        assert_eq!(a.insights, vec!["KITCHEN correctly oriented for Morning Light."]);
    }

    #[test]
    fn test_west_heat_gain() {
        let a = analyze(&house(), Orientation::West);
        assert_eq!(a.score, 57);
        assert_eq!(a.rating, SolarRating::Poor);
        assert_eq!(a.rating.label(), "POOR (High Heat)");
        assert_eq!(
            a.insights,
            vec![
                "KITCHEN faces WEST (High Heat Gain risk). Consider shading.",
                "BEDROOM faces WEST (High Heat Gain risk). Consider shading.",
            ]
        );
    }

    #[test]
    fn test_south() {
        let a = analyze(&house(), Orientation::South);
        assert_eq!(a.score, 73);
        assert_eq!(a.rating, SolarRating::Poor);
        assert_eq!(a.insights.len(), 1);
    }

    #[test]
    fn test_no_rated_rooms() {
        let layout = single_floor(vec![room("BATH_1", RoomType::Bath, 0.0, 0.0, 2.0, 2.0)]);
        let a = analyze(&layout, Orientation::West);
        assert_eq!(a.score, 100);
        assert_eq!(a.rating, SolarRating::Neutral);
    }

    #[test]
    fn test_multiplier_table() {
        assert_eq!(multiplier(Orientation::East, RoomType::Living), Some(1.1));
        assert_eq!(multiplier(Orientation::South, RoomType::Bedroom), Some(0.8));
        assert_eq!(multiplier(Orientation::North, RoomType::MasterBedroom), None);
    }
}
