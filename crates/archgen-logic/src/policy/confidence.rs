//! Confidence scoring for policy findings.
//!
//! A finding starts at full confidence and is scaled down by independent
//! heuristics: how close the violation is to its threshold, how regular
//! the layout geometry is, and how often humans override the rule. Low
//! confidence lowers the finding's risk contribution and can get it
//! filtered out in the second pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{FindingData, RuleId};
use crate::constants::round_to;
use crate::layout::Layout;

/// Violations within this fraction of the threshold count as borderline.
const SLACK_MARGIN: f32 = 0.05;
const SLACK_FACTOR: f32 = 0.6;

const ELONGATED_RATIO: f32 = 4.0;
const MIN_STABLE_STAIR_WIDTH: f32 = 0.8;
const STABILITY_FLOOR: f32 = 0.8;
const STABILITY_FACTOR: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f32) -> Self {
        if score >= 0.8 {
            ConfidenceLevel::High
        } else if score >= 0.5 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    /// In `[0, 1]`, two decimals.
    pub score: f32,
    pub level: ConfidenceLevel,
    pub explanation: String,
    pub reasons: Vec<String>,
}

impl Confidence {
    /// Full confidence with a fixed explanation.
    pub fn certain(explanation: &str) -> Self {
        Self {
            score: 1.0,
            level: ConfidenceLevel::High,
            explanation: explanation.to_string(),
            reasons: Vec::new(),
        }
    }
}

/// Source of historical human-override rates per rule.
pub trait OverrideRates {
    /// Fraction of past findings for `rule` that a human overrode, or
    /// `None` when there is no history.
    fn override_rate(&self, rule: RuleId) -> Option<f32>;
}

/// Fixed `(overridden, total)` counts per rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticOverrideRates(pub BTreeMap<RuleId, (u32, u32)>);

impl Default for StaticOverrideRates {
    fn default() -> Self {
        Self(
            [
                (RuleId::MinRoomArea, (3, 50)),
                (RuleId::MinRoomWidth, (12, 40)),
                (RuleId::StairWidth, (0, 20)),
            ]
            .into_iter()
            .collect(),
        )
    }
}

impl OverrideRates for StaticOverrideRates {
    fn override_rate(&self, rule: RuleId) -> Option<f32> {
        let (count, total) = self.0.get(&rule).copied()?;
        (total > 0).then(|| count as f32 / total as f32)
    }
}

/// Map an override rate to a confidence multiplier.
pub fn override_factor(rate: Option<f32>) -> f32 {
    match rate {
        Some(r) if r > 0.2 => 0.7,
        Some(r) if r > 0.1 => 0.9,
        _ => 1.0,
    }
}

/// True if `actual` is within 5% of `required`.
pub fn is_borderline(actual: f32, required: f32) -> bool {
    (actual - required).abs() <= required * SLACK_MARGIN
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityIndex {
    pub index: f32,
    pub reasons: Vec<String>,
}

/// Geometric regularity of a layout in `[0, 1]`.
pub fn stability_index(layout: &Layout) -> StabilityIndex {
    let mut index = 1.0_f32;
    let mut reasons = Vec::new();

    let elongated = layout
        .rooms()
        .filter(|r| r.min_side() > 0.0 && r.aspect_ratio() > ELONGATED_RATIO)
        .count();
    if elongated > 0 {
        index -= 0.1 * elongated as f32;
        reasons.push("Contains elongated/unstable room shapes".to_string());
    }

    if let Some(stairs) = layout.stairs() {
        if stairs.min_side() < MIN_STABLE_STAIR_WIDTH {
            index -= 0.1;
            reasons.push("Stair definition incomplete or narrow".to_string());
        }
    }

    StabilityIndex {
        index: index.max(0.0),
        reasons,
    }
}

/// Confidence that a finding is a real violation.
pub fn calculate_confidence(
    rule: RuleId,
    data: Option<&FindingData>,
    layout: &Layout,
    rates: &dyn OverrideRates,
) -> Confidence {
    let mut score = 1.0_f32;
    let mut reasons = Vec::new();

    if let Some(d) = data {
        if is_borderline(d.actual, d.required) {
            score *= SLACK_FACTOR;
            reasons.push("Value is near threshold (margin of error)".to_string());
        }
    }

    let stability = stability_index(layout);
    if stability.index < STABILITY_FLOOR {
        score *= STABILITY_FACTOR;
        reasons.push(format!(
            "Layout stability low ({:.0}%)",
            stability.index * 100.0
        ));
    }

    let factor = override_factor(rates.override_rate(rule));
    if factor < 1.0 {
        score *= factor;
        reasons.push("Rule frequently overridden by humans".to_string());
    }

    let score = round_to(score.clamp(0.0, 1.0), 2);
    Confidence {
        score,
        level: ConfidenceLevel::from_score(score),
        explanation: explain(score, &reasons),
        reasons,
    }
}

fn explain(score: f32, reasons: &[String]) -> String {
    let main = reasons
        .first()
        .map(String::as_str)
        .unwrap_or("Standard policy check.");
    match ConfidenceLevel::from_score(score) {
        ConfidenceLevel::High => format!("High Confidence ({:.0}%). {}", score * 100.0, main),
        ConfidenceLevel::Medium => format!("Medium Confidence. {} Verify manually.", main),
        ConfidenceLevel::Low => format!(
            "Low Confidence. {} Likely false positive or minor deviation.",
            main
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RoomType;
    use crate::layout::fixtures::*;

    fn data(actual: f32, required: f32) -> FindingData {
        FindingData {
            actual,
            required,
            room_id: None,
            level: None,
        }
    }

    #[test]
    fn test_clear_violation_high_confidence() {
        let c = calculate_confidence(
            RuleId::MinRoomArea,
            Some(&data(6.0, 9.0)),
            &house(),
            &StaticOverrideRates::default(),
        );
        assert_eq!(c.score, 1.0);
        assert_eq!(c.level, ConfidenceLevel::High);
        assert_eq!(c.explanation, "High Confidence (100%). Standard policy check.");
    }

    #[test]
    fn test_borderline_scores_lower() {
        let rates = StaticOverrideRates::default();
        let near = calculate_confidence(RuleId::MinRoomArea, Some(&data(8.8, 9.0)), &house(), &rates);
        let far = calculate_confidence(RuleId::MinRoomArea, Some(&data(6.0, 9.0)), &house(), &rates);
        assert!(near.score < far.score);
        assert_eq!(near.score, 0.6);
        assert_eq!(near.level, ConfidenceLevel::Medium);
        assert!(near.explanation.ends_with("Verify manually."));
    }

    #[test]
    fn test_overridden_rule_discounted() {
        let c = calculate_confidence(
            RuleId::MinRoomWidth,
            Some(&data(2.0, 2.7)),
            &house(),
            &StaticOverrideRates::default(),
        );
        assert_eq!(c.score, 0.7);
        assert_eq!(c.reasons, vec!["Rule frequently overridden by humans"]);
    }

    #[test]
    fn test_low_confidence_stack() {
        let c = calculate_confidence(
            RuleId::MinRoomWidth,
            Some(&data(2.65, 2.7)),
            &house(),
            &StaticOverrideRates::default(),
        );
        assert_eq!(c.score, 0.42);
        assert_eq!(c.level, ConfidenceLevel::Low);
        assert!(c.explanation.starts_with("Low Confidence. Value is near threshold"));
    }

    #[test]
    fn test_unstable_layout_discount() {
        let corridors = (0..3)
            .map(|i| room(&format!("CORRIDOR_{}", i + 1), RoomType::Corridor, i as f32, 0.0, 1.0, 6.0))
            .collect();
        let layout = single_floor(corridors);
        let s = stability_index(&layout);
        assert!((s.index - 0.7).abs() < 1e-4);
        let c = calculate_confidence(RuleId::MinRoomArea, None, &layout, &StaticOverrideRates::default());
        assert_eq!(c.score, 0.9);
        assert_eq!(c.reasons, vec!["Layout stability low (70%)"]);
    }

    #[test]
    fn test_narrow_stairs_reduce_stability() {
        let layout = single_floor(vec![room("STAIRS_1", RoomType::Stairs, 0.0, 0.0, 0.6, 2.0)]);
        let s = stability_index(&layout);
        assert!((s.index - 0.9).abs() < 1e-4);
        assert_eq!(s.reasons.len(), 1);
    }

    #[test]
    fn test_score_always_in_unit_range() {
        let rates = StaticOverrideRates::default();
        for actual in [0.0, 0.5, 2.69, 8.99, 100.0] {
            for rule in [RuleId::MinRoomArea, RuleId::MinRoomWidth, RuleId::StairWidth] {
                let c = calculate_confidence(rule, Some(&data(actual, 2.7)), &house(), &rates);
                assert!((0.0..=1.0).contains(&c.score));
            }
        }
    }

    #[test]
    fn test_override_factor_bands() {
        assert_eq!(override_factor(None), 1.0);
        assert_eq!(override_factor(Some(0.06)), 1.0);
        assert_eq!(override_factor(Some(0.15)), 0.9);
        assert_eq!(override_factor(Some(0.3)), 0.7);
    }
}
