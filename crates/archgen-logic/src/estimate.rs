//! Concept-stage construction cost estimate.
//!
//! Rough order of magnitude only: built-up area is converted to square
//! feet, priced at a flat per-tier rate, and scaled up 5% for every floor
//! above G+1.
//!
//! | Tier | Rate (INR/ft²) |
//! |------|----------------|
//! | Basic | 1600 |
//! | Standard | 2200 |
//! | Premium | 3000 |
//! | Luxury | 4500 |

use serde::{Deserialize, Serialize};

use crate::layout::Layout;

pub const SQ_FT_PER_SQ_M: f64 = 10.764;
const FLOOR_PREMIUM: f64 = 0.05;
/// Floors included in the base rate (ground plus one).
const BASE_FLOORS: u32 = 2;

pub const DISCLAIMER: &str = "Rough Order of Magnitude (ROM) Estimate. +/- 15% Accuracy.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityTier {
    Basic,
    #[default]
    Standard,
    Premium,
    Luxury,
}

impl QualityTier {
    pub fn rate_per_sq_ft(self) -> f64 {
        match self {
            QualityTier::Basic => 1600.0,
            QualityTier::Standard => 2200.0,
            QualityTier::Premium => 3000.0,
            QualityTier::Luxury => 4500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub structure: f64,
    pub finishes: f64,
    pub services: f64,
    pub misc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub total: u64,
    pub rate_per_sq_ft: u64,
    pub area_sq_ft: u64,
    pub currency: String,
    pub breakdown: CostBreakdown,
    pub disclaimer: String,
}

pub fn estimate_cost(area_sq_m: f64, floors: u32, tier: QualityTier) -> CostEstimate {
    let area_sq_ft = area_sq_m.max(0.0) * SQ_FT_PER_SQ_M;
    let multiplier = 1.0 + floors.saturating_sub(BASE_FLOORS) as f64 * FLOOR_PREMIUM;
    let total = area_sq_ft * tier.rate_per_sq_ft() * multiplier;
    let rate = if area_sq_ft > 0.0 { total / area_sq_ft } else { 0.0 };

    CostEstimate {
        total: total.round() as u64,
        rate_per_sq_ft: rate.round() as u64,
        area_sq_ft: area_sq_ft.round() as u64,
        currency: "INR".to_string(),
        breakdown: CostBreakdown {
            structure: total * 0.40,
            finishes: total * 0.35,
            services: total * 0.15,
            misc: total * 0.10,
        },
        disclaimer: DISCLAIMER.to_string(),
    }
}

/// Significant digits kept when quoting a total.
const QUOTE_DIGITS: u32 = 3;

/// Format a rupee amount for display: three significant digits, Indian
/// digit grouping (`₹23,70,000`).
pub fn format_currency(amount: u64) -> String {
    let digits = amount.checked_ilog10().map_or(1, |d| d + 1);
    let rounded = if digits > QUOTE_DIGITS {
        let unit = 10u64.pow(digits - QUOTE_DIGITS);
        amount.saturating_add(unit / 2) / unit * unit
    } else {
        amount
    };

    let text = rounded.to_string();
    if text.len() <= 3 {
        return format!("₹{}", text);
    }
    let (head, tail) = text.split_at(text.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("₹{},{}", groups.join(","), tail)
}

/// Estimate from a solved layout's placed room area and floor count.
pub fn estimate_layout(layout: &Layout, tier: QualityTier) -> CostEstimate {
    estimate_cost(layout.total_area() as f64, layout.floors.len() as u32, tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_two_floor() {
        let e = estimate_cost(100.0, 2, QualityTier::Standard);
        assert_eq!(e.area_sq_ft, 1076);
        assert_eq!(e.total, 2_368_080);
        assert_eq!(e.rate_per_sq_ft, 2200);
        assert_eq!(e.currency, "INR");
    }

    #[test]
    fn test_floor_premium() {
        let e = estimate_cost(100.0, 4, QualityTier::Basic);
        // 1076.4 × 1600 × 1.10
        assert_eq!(e.total, 1_894_464);
        assert_eq!(e.rate_per_sq_ft, 1760);
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let e = estimate_cost(137.5, 3, QualityTier::Luxury);
        let b = e.breakdown;
        let sum = b.structure + b.finishes + b.services + b.misc;
        assert!((sum - e.total as f64).abs() < 1.0);
    }

    #[test]
    fn test_zero_area() {
        let e = estimate_cost(0.0, 1, QualityTier::Premium);
        assert_eq!(e.total, 0);
        assert_eq!(e.rate_per_sq_ft, 0);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(2_368_080), "₹23,70,000");
        assert_eq!(format_currency(1_894_464), "₹18,90,000");
        assert_eq!(format_currency(123_456_789), "₹12,30,00,000");
        assert_eq!(format_currency(4_500), "₹4,500");
        assert_eq!(format_currency(999), "₹999");
        assert_eq!(format_currency(0), "₹0");
    }

    #[test]
    fn test_layout_estimate() {
        let layout = crate::layout::fixtures::house();
        let e = estimate_layout(&layout, QualityTier::Standard);
        // 20 + 9 + 16 + 10.5 + 3 = 58.5 m²
        assert_eq!(e.area_sq_ft, 630);
    }
}
