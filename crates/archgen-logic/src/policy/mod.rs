//! Building-policy evaluation with confidence-weighted findings.
//!
//! `PolicyEngine::evaluate` runs in two passes. The first pass checks the
//! layout schema, every room against the room policy table, and the stair
//! width, attaching a confidence score to each finding and accumulating
//! risk weighted by that confidence. The second pass re-examines
//! low-confidence findings and moves the ones it can explain away into
//! `resolved_findings`. Whatever remains active gets suggestions and
//! concrete repair proposals.

mod confidence;
mod resolution;
mod suggest;

pub use confidence::{
    calculate_confidence, is_borderline, override_factor, stability_index, Confidence,
    ConfidenceLevel, OverrideRates, StabilityIndex, StaticOverrideRates,
};
pub use resolution::{
    apply_repair, determine_repairs, run_second_pass, ActionType, RepairAction, ResizeTarget, Resolution,
    ResolutionMethod, ResolvedFinding,
};
pub use suggest::{generate_suggestions, generate_summary, Suggestion};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{round_to, RoomType};
use crate::layout::{Layout, PlacedRoom};

/// Identifier of a policy rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleId {
    StructureInvalid,
    MinRoomArea,
    MinRoomWidth,
    StairWidth,
    GeneralImprovement,
}

impl RuleId {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::StructureInvalid => "STRUCTURE_INVALID",
            RuleId::MinRoomArea => "MIN_ROOM_AREA",
            RuleId::MinRoomWidth => "MIN_ROOM_WIDTH",
            RuleId::StairWidth => "STAIR_WIDTH",
            RuleId::GeneralImprovement => "GENERAL_IMPROVEMENT",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Measured value against the rule threshold, plus the room it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingData {
    pub actual: f32,
    pub required: f32,
    #[serde(rename = "id")]
    pub room_id: Option<String>,
    pub level: Option<u32>,
}

/// A single detected policy violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: RuleId,
    pub message: String,
    pub risk_level: RiskLevel,
    pub data: Option<FindingData>,
    pub confidence: Confidence,
}

impl Finding {
    /// Stable key used to pair repairs with their finding.
    pub fn key(&self) -> String {
        match &self.data {
            Some(FindingData {
                room_id: Some(id),
                level: Some(level),
                ..
            }) => format!("{}_{}_L{}", self.rule, id, level),
            Some(d) => format!("{}_{}", self.rule, d.actual),
            None => self.rule.to_string(),
        }
    }
}

/// Proposed, unapplied fixes for one active finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repair {
    pub finding_id: String,
    pub finding: Finding,
    pub actions: Vec<RepairAction>,
}

/// Three-tier review classification derived from the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Enforcement {
    Allow,
    Review,
    StronglyReview,
}

/// Minimums for one room type; `None` means the dimension is unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomPolicy {
    pub min_area: Option<f32>,
    pub min_width: Option<f32>,
}

/// Rule table and thresholds used by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub rooms: BTreeMap<RoomType, RoomPolicy>,
    pub min_stair_width: f32,
    pub area_weight: f32,
    pub width_weight: f32,
    pub stair_weight: f32,
    /// Layouts with raw risk below this are allowed.
    pub allow_threshold: f32,
    /// Rounded risk at or above this needs review.
    pub review_threshold: f32,
    /// Findings with confidence above this skip the second pass.
    pub second_pass_ceiling: f32,
    /// Findings with confidence below this are filtered as noise.
    pub noise_floor: f32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let policy = |min_area, min_width| RoomPolicy { min_area, min_width };
        let rooms = [
            (RoomType::Bedroom, policy(Some(9.0), Some(2.7))),
            (RoomType::MasterBedroom, policy(Some(12.0), Some(3.0))),
            (RoomType::Kitchen, policy(Some(5.0), None)),
            (RoomType::Toilet, policy(Some(2.0), None)),
            (RoomType::Living, policy(Some(10.0), None)),
            (RoomType::Corridor, policy(None, Some(1.0))),
        ]
        .into_iter()
        .collect();
        Self {
            rooms,
            min_stair_width: 1.0,
            area_weight: 8.0,
            width_weight: 6.0,
            stair_weight: 12.0,
            allow_threshold: 60.0,
            review_threshold: 40.0,
            second_pass_ceiling: 0.85,
            noise_floor: 0.45,
        }
    }
}

/// Full evaluation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyReport {
    pub allowed: bool,
    /// Rounded and clamped to `0..=100`.
    pub risk_score: u32,
    /// Findings still active after the second pass.
    pub findings: Vec<Finding>,
    pub resolved_findings: Vec<ResolvedFinding>,
    pub repairs: Vec<Repair>,
    pub enforcement: Enforcement,
    pub suggestions: Vec<Suggestion>,
    pub summary: String,
}

/// Stateless policy evaluator over an explicit rule table and override
/// history.
pub struct PolicyEngine {
    pub config: PolicyConfig,
    rates: Box<dyn OverrideRates + Send + Sync>,
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}

impl PolicyEngine {
    pub fn new(config: PolicyConfig) -> Self {
        Self::with_override_rates(config, StaticOverrideRates::default())
    }

    pub fn with_override_rates(config: PolicyConfig, rates: impl OverrideRates + Send + Sync + 'static) -> Self {
        Self {
            config,
            rates: Box::new(rates),
        }
    }

    pub fn override_rates(&self) -> &dyn OverrideRates {
        self.rates.as_ref()
    }

    /// Evaluate a layout.
    pub fn evaluate(&self, layout: &Layout) -> PolicyReport {
        let first = self.first_pass(layout);

        let mut active = Vec::new();
        let mut resolved = Vec::new();
        for finding in first.findings.iter().cloned() {
            match run_second_pass(&finding, &self.config) {
                Some(resolution) => {
                    log::debug!("Resolved {}: {}", finding.key(), resolution.message);
                    resolved.push(ResolvedFinding {
                        original: finding,
                        resolution,
                    });
                }
                None => active.push(finding),
            }
        }

        let suggestions = generate_suggestions(&active);
        let repairs = active
            .iter()
            .filter_map(|f| {
                let actions = determine_repairs(f, &self.config);
                (!actions.is_empty()).then(|| Repair {
                    finding_id: f.key(),
                    finding: f.clone(),
                    actions,
                })
            })
            .collect();

        let enforcement = self.enforcement(first.risk_score);
        PolicyReport {
            allowed: first.allowed,
            risk_score: first.risk_score,
            summary: generate_summary(&first.findings, first.risk_score),
            findings: active,
            resolved_findings: resolved,
            repairs,
            enforcement,
            suggestions,
        }
    }

    fn enforcement(&self, risk_score: u32) -> Enforcement {
        let risk = risk_score as f32;
        if risk >= self.config.allow_threshold {
            Enforcement::StronglyReview
        } else if risk >= self.config.review_threshold {
            Enforcement::Review
        } else {
            Enforcement::Allow
        }
    }

    fn first_pass(&self, layout: &Layout) -> FirstPass {
        if let Some(bad) = layout.rooms().find(|r| !is_well_formed(r)) {
            log::warn!("Layout rejected: room {} is structurally invalid", bad.id);
            return FirstPass {
                allowed: false,
                risk_score: 100,
                findings: vec![Finding {
                    rule: RuleId::StructureInvalid,
                    message: "Layout schema failed validation".to_string(),
                    risk_level: RiskLevel::High,
                    data: None,
                    confidence: Confidence::certain("Schema validation is absolute."),
                }],
            };
        }

        let mut findings = Vec::new();
        let mut risk = 0.0_f32;

        for room in layout.rooms() {
            let Some(policy) = self.config.rooms.get(&room.room_type) else {
                continue;
            };
            let area = round_to(room.area(), 2);
            if let Some(min_area) = policy.min_area.filter(|m| area < *m) {
                let finding = self.room_finding(
                    layout,
                    room,
                    RuleId::MinRoomArea,
                    format!("{} area {}m² is below minimum {}m²", room.room_type, area, min_area),
                    area,
                    min_area,
                );
                risk += self.config.area_weight * finding.confidence.score;
                findings.push(finding);
            }
            let width = room.min_side();
            if let Some(min_width) = policy.min_width.filter(|m| width < *m) {
                let finding = self.room_finding(
                    layout,
                    room,
                    RuleId::MinRoomWidth,
                    format!("{} width {}m is below minimum {}m", room.room_type, width, min_width),
                    width,
                    min_width,
                );
                risk += self.config.width_weight * finding.confidence.score;
                findings.push(finding);
            }
        }

        if let Some(stairs) = layout.stairs() {
            let width = stairs.min_side();
            let required = self.config.min_stair_width;
            if width < required {
                let data = FindingData {
                    actual: width,
                    required,
                    room_id: Some(stairs.id.clone()),
                    level: Some(stairs.level),
                };
                let confidence = calculate_confidence(RuleId::StairWidth, Some(&data), layout, self.override_rates());
                risk += self.config.stair_weight * confidence.score;
                findings.push(Finding {
                    rule: RuleId::StairWidth,
                    message: format!("Stair width {}m is below minimum {}m", width, required),
                    risk_level: RiskLevel::High,
                    data: Some(data),
                    confidence,
                });
            }
        }

        let allowed = risk < self.config.allow_threshold;
        let risk_score = risk.round().clamp(0.0, 100.0) as u32;
        log::debug!(
            "Policy first pass: {} findings, risk {} ({})",
            findings.len(),
            risk_score,
            if allowed { "allowed" } else { "blocked" }
        );
        FirstPass {
            allowed,
            risk_score,
            findings,
        }
    }

    fn room_finding(
        &self,
        layout: &Layout,
        room: &PlacedRoom,
        rule: RuleId,
        message: String,
        actual: f32,
        required: f32,
    ) -> Finding {
        let data = FindingData {
            actual,
            required,
            room_id: Some(room.id.clone()),
            level: Some(room.level),
        };
        let confidence = calculate_confidence(rule, Some(&data), layout, self.override_rates());
        Finding {
            rule,
            message,
            risk_level: RiskLevel::Medium,
            data: Some(data),
            confidence,
        }
    }
}

struct FirstPass {
    allowed: bool,
    risk_score: u32,
    findings: Vec<Finding>,
}

fn is_well_formed(room: &PlacedRoom) -> bool {
    !room.name.trim().is_empty()
        && room.width.is_finite()
        && room.length.is_finite()
        && room.width > 0.0
        && room.length > 0.0
}
