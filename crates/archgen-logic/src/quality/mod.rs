//! Layout quality scoring.
//!
//! Four independent scorers rate a layout from 0 to 100 on cost, comfort,
//! energy and aesthetics. Each is a pure function of the layout; the
//! balanced score is their weighted sum. All scorers look at every room on
//! every floor.
//!
//! | Dimension | Start | Main drivers |
//! |-----------|-------|--------------|
//! | Cost | 100 | shell compactness, storeys, toilet count, circulation |
//! | Comfort | 100 | master/living generosity, elongated rooms, corridor buffer |
//! | Energy | 90 | shell compactness, room count |
//! | Aesthetic | 85 | size hierarchy, proportions, bedroom symmetry |

mod aesthetic;
mod comfort;
mod cost;
mod energy;

pub use aesthetic::aesthetic_score;
pub use comfort::comfort_score;
pub use cost::cost_score;
pub use energy::energy_score;

use serde::{Deserialize, Serialize};

use crate::layout::Layout;

/// Share of summed room perimeters assumed to be real wall, the rest
/// being shared partitions.
const SHARED_WALL_FACTOR: f32 = 0.7;

/// Result of one scoring dimension.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionScore {
    pub score: u32,
    pub factors: Vec<String>,
    pub warnings: Vec<String>,
}

impl DimensionScore {
    fn new(raw: f32, factors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            score: raw.round().clamp(0.0, 100.0) as u32,
            factors,
            warnings,
        }
    }
}

/// Per-dimension scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub cost: u32,
    pub comfort: u32,
    pub energy: u32,
    pub aesthetic: u32,
}

/// Factors and warnings behind each dimension.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub cost: DimensionScore,
    pub comfort: DimensionScore,
    pub energy: DimensionScore,
    pub aesthetic: DimensionScore,
}

/// Weighted aggregate of the four dimensions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BalancedScore {
    pub total_score: u32,
    pub breakdown: ScoreBreakdown,
    pub details: ScoreDetails,
    pub summary: String,
}

/// Dimension weights for the balanced score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub cost: f32,
    pub comfort: f32,
    pub energy: f32,
    pub aesthetic: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            cost: 0.25,
            comfort: 0.30,
            energy: 0.25,
            aesthetic: 0.20,
        }
    }
}

/// Score a layout on all four dimensions and aggregate.
pub fn calculate_balanced_score(layout: &Layout, weights: &ScoreWeights) -> BalancedScore {
    let cost = cost_score(layout);
    let comfort = comfort_score(layout);
    let energy = energy_score(layout);
    let aesthetic = aesthetic_score(layout);

    let raw = cost.score as f32 * weights.cost
        + comfort.score as f32 * weights.comfort
        + energy.score as f32 * weights.energy
        + aesthetic.score as f32 * weights.aesthetic;
    let total_score = raw.round().max(0.0) as u32;

    let breakdown = ScoreBreakdown {
        cost: cost.score,
        comfort: comfort.score,
        energy: energy.score,
        aesthetic: aesthetic.score,
    };

    BalancedScore {
        total_score,
        breakdown,
        summary: balanced_summary(total_score, &breakdown),
        details: ScoreDetails {
            cost,
            comfort,
            energy,
            aesthetic,
        },
    }
}

/// One-paragraph explanation naming the strongest and, if below 60, the
/// weakest dimension.
pub fn balanced_summary(total: u32, breakdown: &ScoreBreakdown) -> String {
    let mut summary = format!("Balanced Score: {}/100. ", total);
    summary.push_str(if total >= 80 {
        "This design is highly optimized across all dimensions. "
    } else if total >= 60 {
        "Good balance, with some opportunities for refinement. "
    } else {
        "Needs optimization to better balance cost, comfort, and efficiency. "
    });

    let mut ranked = [
        ("Cost Efficiency", breakdown.cost),
        ("Comfort", breakdown.comfort),
        ("Energy", breakdown.energy),
        ("Aesthetics", breakdown.aesthetic),
    ];
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let (best, best_val) = ranked[0];
    summary.push_str(&format!("Strongest in {} ({}). ", best, best_val));
    let (worst, worst_val) = ranked[3];
    if worst_val < 60 {
        summary.push_str(&format!("Consider improving {} ({}).", worst, worst_val));
    }
    summary.trim_end().to_string()
}

/// Ideal-square perimeter over estimated real wall length; 1.0 is a
/// perfectly compact shell. `None` for a layout with no measurable rooms.
pub(crate) fn compactness(layout: &Layout) -> Option<f32> {
    let (area, perimeter) = layout.rooms().fold((0.0_f32, 0.0_f32), |(a, p), r| {
        (a + r.area(), p + 2.0 * (r.width + r.length))
    });
    let shell = perimeter * SHARED_WALL_FACTOR;
    if shell <= 0.0 || area <= 0.0 {
        return None;
    }
    Some(4.0 * area.sqrt() / shell)
}
