//! Passive performance: compact shells lose less heat, small footprints
//! ventilate across.

use super::{compactness, DimensionScore};
use crate::layout::Layout;

pub fn energy_score(layout: &Layout) -> DimensionScore {
    let mut score = 90.0;
    let mut factors = Vec::new();
    let mut warnings = Vec::new();

    match compactness(layout) {
        Some(c) if c > 0.8 => {
            score += 5.0;
            factors.push("Compact form minimizes thermal loss".to_string());
        }
        Some(c) if c < 0.6 => {
            score -= 10.0;
            warnings.push("Sprawling form increases heating/cooling load".to_string());
        }
        _ => {}
    }

    if layout.room_count() < 5 {
        factors.push("High cross-ventilation potential (small footprint)".to_string());
    }

    DimensionScore::new(score, factors, warnings)
}
