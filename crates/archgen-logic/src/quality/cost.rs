//! Construction cost proxy. Simpler shells, fewer storeys, fewer toilets
//! and less corridor mean a higher score.

use super::{compactness, DimensionScore};
use crate::constants::RoomType;
use crate::layout::Layout;

const MIN_COMPACTNESS: f32 = 0.7;
/// Toilets allowed before the wet-area penalty applies.
const MAX_TOILETS: usize = 2;
const MAX_CIRCULATION_RATIO: f32 = 0.20;

pub fn cost_score(layout: &Layout) -> DimensionScore {
    let mut score = 100.0;
    let mut factors = Vec::new();
    let mut warnings = Vec::new();

    match compactness(layout) {
        Some(ratio) if ratio < MIN_COMPACTNESS => {
            score -= 15.0;
            factors.push("Complex building shape increases wall costs".to_string());
        }
        _ => factors.push("Efficient building shape".to_string()),
    }

    if layout.is_multi_story() || layout.stairs().is_some() {
        score -= 10.0;
        factors.push("Multi-story complexity".to_string());
    }

    let toilets = layout.rooms().filter(|r| r.room_type == RoomType::Toilet).count();
    if toilets > 0 && layout.rooms().any(|r| r.room_type == RoomType::Kitchen) {
        factors.push("Plumbing points present".to_string());
    }
    if toilets > MAX_TOILETS {
        score -= 5.0 * (toilets - MAX_TOILETS) as f32;
        factors.push("High count of wet areas".to_string());
    }

    let total = layout.total_area();
    let corridor: f32 = layout
        .rooms()
        .filter(|r| r.room_type.is_corridor())
        .map(|r| r.area())
        .sum();
    if total > 0.0 && corridor / total > MAX_CIRCULATION_RATIO {
        score -= 20.0;
        warnings.push("High circulation area (wasted cost)".to_string());
    } else {
        factors.push("Efficient circulation space".to_string());
    }

    DimensionScore::new(score, factors, warnings)
}
