//! Visual order: a clear size hierarchy, pleasant proportions, and matching
//! bedrooms.

use std::collections::BTreeSet;

use super::DimensionScore;
use crate::constants::RoomType;
use crate::layout::Layout;

const GOLDEN_LOW: f32 = 1.4;
const GOLDEN_HIGH: f32 = 1.8;
const AWKWARD_RATIO: f32 = 3.0;
const SYMMETRY_TOLERANCE: f32 = 0.5;

pub fn aesthetic_score(layout: &Layout) -> DimensionScore {
    let mut score = 85.0;
    let mut factors = Vec::new();
    let mut warnings = Vec::new();

    let areas: Vec<f32> = layout.rooms().map(|r| r.area()).collect();
    let unique: BTreeSet<i64> = areas.iter().map(|a| a.round() as i64).collect();
    if (unique.len() as f32) < areas.len() as f32 * 0.8 {
        score += 5.0;
        factors.push("Consistent spatial hierarchy".to_string());
    }

    let ratios: Vec<f32> = layout
        .rooms()
        .filter(|r| r.min_side() > 0.0)
        .map(|r| r.aspect_ratio())
        .collect();
    if ratios.iter().any(|r| *r > GOLDEN_LOW && *r < GOLDEN_HIGH) {
        score += 5.0;
        factors.push("Proportions relate to Golden Ratio".to_string());
    }
    let awkward = ratios.iter().filter(|r| **r > AWKWARD_RATIO).count();
    if awkward > 0 {
        score -= 10.0 * awkward as f32;
        warnings.push("Contains elongated/awkward spaces".to_string());
    }

    let beds: Vec<f32> = layout
        .rooms()
        .filter(|r| r.room_type == RoomType::Bedroom)
        .map(|r| r.area())
        .collect();
    if let [first, rest @ ..] = beds.as_slice() {
        if !rest.is_empty() && rest.iter().all(|a| (a - first).abs() < SYMMETRY_TOLERANCE) {
            score += 5.0;
            factors.push("Symmetrical Bedroom Layout".to_string());
        }
    }

    DimensionScore::new(score, factors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fixtures::*;

    #[test]
    fn test_matching_bedrooms_rewarded() {
        let layout = single_floor(vec![
            room("BEDROOM_2", RoomType::Bedroom, 0.0, 0.0, 3.0, 3.5),
            room("BEDROOM_3", RoomType::Bedroom, 3.0, 0.0, 3.0, 3.5),
            room("LIVING_1", RoomType::Living, 0.0, 3.5, 5.0, 8.0),
        ]);
        let result = aesthetic_score(&layout);
        // hierarchy (2 unique of 3), golden ratio (1.6), symmetry
        assert_eq!(result.score, 100);
        assert_eq!(result.factors.len(), 3);
    }

    #[test]
    fn test_awkward_shapes_penalized() {
        let layout = single_floor(vec![
            room("CORRIDOR_1", RoomType::Corridor, 0.0, 0.0, 1.0, 5.0),
            room("STUDY_1", RoomType::Study, 1.0, 0.0, 1.0, 4.0),
        ]);
        let result = aesthetic_score(&layout);
        assert_eq!(result.score, 65);
        assert_eq!(result.warnings.len(), 1);
    }
}
