//! Second-pass resolution of weak findings, and repair proposals for the
//! findings that survive it.

use serde::{Deserialize, Serialize};

use super::{Finding, PolicyConfig, RuleId};
use crate::constants::{cells_for, GRID_SIZE};
use crate::editor;
use crate::error::EditError;
use crate::guard::GuardTable;
use crate::layout::Layout;

/// Largest area shortfall (m²) still repaired by expanding edges.
const MAX_AREA_EXPANSION: f32 = 5.0;

/// Values within this distance of a 0.1 m step are snapped onto it.
const SNAP_DEVIATION: f32 = 0.04;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionMethod {
    GeometricSmoothing,
    NoiseFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub method: ResolutionMethod,
    pub message: String,
}

/// A first-pass finding the second pass explained away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFinding {
    pub original: Finding,
    pub resolution: Resolution,
}

/// "Virtual grid snap": 2.98 reads as 3.0.
fn smooth(value: f32) -> f32 {
    let rounded = (value * 10.0).round() / 10.0;
    if (value - rounded).abs() < SNAP_DEVIATION {
        rounded
    } else {
        value
    }
}

/// Re-examine a low-confidence finding. Returns `None` if it stays active.
pub fn run_second_pass(finding: &Finding, config: &PolicyConfig) -> Option<Resolution> {
    if finding.confidence.score > config.second_pass_ceiling {
        return None;
    }

    if let (RuleId::MinRoomArea | RuleId::MinRoomWidth, Some(data)) = (finding.rule, &finding.data) {
        let smoothed = smooth(data.actual);
        if smoothed >= data.required {
            let unit = if finding.rule == RuleId::MinRoomArea { "m²" } else { "m" };
            return Some(Resolution {
                method: ResolutionMethod::GeometricSmoothing,
                message: format!(
                    "Auto-resolved: {}{} acts as {}{} (Grid Snap)",
                    data.actual, unit, smoothed, unit
                ),
            });
        }
    }

    if finding.confidence.score < config.noise_floor {
        return Some(Resolution {
            method: ResolutionMethod::NoiseFilter,
            message: "Suppressed due to low confidence and high ambiguity.".to_string(),
        });
    }

    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    ResizeRoom,
}

/// What a resize repair aims for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResizeTarget {
    /// Keep the width, extend the length until the area is reached.
    ExpandEdges { target_area: f32 },
    /// Widen the short side to the target.
    Widen { target_width: f32 },
}

/// One machine-actionable fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairAction {
    pub label: String,
    pub action_type: ActionType,
    pub room_id: String,
    pub level: u32,
    pub target: ResizeTarget,
    pub risk_analysis: String,
}

/// Concrete repairs for an active finding; empty when none apply.
pub fn determine_repairs(finding: &Finding, config: &PolicyConfig) -> Vec<RepairAction> {
    let Some(data) = &finding.data else {
        return Vec::new();
    };
    let (Some(room_id), Some(level)) = (&data.room_id, data.level) else {
        return Vec::new();
    };
    let action = |label: String, target, risk: &str| RepairAction {
        label,
        action_type: ActionType::ResizeRoom,
        room_id: room_id.clone(),
        level,
        target,
        risk_analysis: risk.to_string(),
    };

    match finding.rule {
        RuleId::MinRoomArea => {
            let diff = data.required - data.actual;
            if diff > 0.0 && diff < MAX_AREA_EXPANSION {
                vec![action(
                    format!("Expand to {}m²", data.required),
                    ResizeTarget::ExpandEdges {
                        target_area: data.required,
                    },
                    "LOW_RISK: Minor boundary shift.",
                )]
            } else {
                Vec::new()
            }
        }
        RuleId::MinRoomWidth => vec![action(
            format!("Widen to {}m", data.required),
            ResizeTarget::Widen {
                target_width: data.required,
            },
            "MED_RISK: May displace adjacent rooms.",
        )],
        RuleId::StairWidth => vec![action(
            format!("Widen stairs to {}m", config.min_stair_width),
            ResizeTarget::Widen {
                target_width: config.min_stair_width,
            },
            "HIGH_RISK: Stair core is shared by every floor.",
        )],
        RuleId::StructureInvalid | RuleId::GeneralImprovement => Vec::new(),
    }
}

/// Smallest grid multiple at or above `meters`.
fn grid_ceil(meters: f32) -> f32 {
    cells_for(meters, GRID_SIZE) as f32 * GRID_SIZE
}

/// Apply a repair through the layout editor. The input layout is never
/// modified; a repair the guard rejects is returned as `Err`.
pub fn apply_repair(layout: &Layout, action: &RepairAction, table: &GuardTable) -> Result<Layout, EditError> {
    let room = layout
        .floor(action.level)
        .and_then(|f| f.room(&action.room_id))
        .ok_or_else(|| EditError::RoomNotFound {
            level: action.level,
            room_id: action.room_id.clone(),
        })?;
    if !(room.width > 0.0 && room.length > 0.0) {
        return Err(EditError::Rejected(format!("{} has degenerate dimensions", room.id)));
    }

    let (width, length) = match action.target {
        ResizeTarget::ExpandEdges { target_area } => (room.width, grid_ceil(target_area / room.width)),
        ResizeTarget::Widen { target_width } if room.width <= room.length => {
            (grid_ceil(target_width), room.length)
        }
        ResizeTarget::Widen { target_width } => (room.width, grid_ceil(target_width)),
    };
    log::info!("Applying repair '{}' to {}", action.label, action.room_id);
    editor::resize_room(layout, action.level, &action.room_id, width, length, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RoomType;
    use crate::layout::fixtures::*;
    use crate::policy::{Confidence, FindingData, PolicyEngine, RiskLevel};

    fn finding(rule: RuleId, actual: f32, required: f32, confidence: f32) -> Finding {
        let mut c = Confidence::certain("test");
        c.score = confidence;
        Finding {
            rule,
            message: String::new(),
            risk_level: RiskLevel::Medium,
            data: Some(FindingData {
                actual,
                required,
                room_id: Some("BEDROOM_2".to_string()),
                level: Some(0),
            }),
            confidence: c,
        }
    }

    #[test]
    fn test_smooth() {
        assert_eq!(smooth(2.98), 3.0);
        assert_eq!(smooth(2.5), 2.5);
        assert_eq!(smooth(2.45), 2.45);
    }

    #[test]
    fn test_high_confidence_skips_second_pass() {
        let f = finding(RuleId::MinRoomWidth, 2.69, 2.7, 0.9);
        assert!(run_second_pass(&f, &PolicyConfig::default()).is_none());
    }

    #[test]
    fn test_smoothing_message() {
        let f = finding(RuleId::MinRoomArea, 8.98, 9.0, 0.6);
        let r = run_second_pass(&f, &PolicyConfig::default()).unwrap();
        assert_eq!(r.method, ResolutionMethod::GeometricSmoothing);
        assert_eq!(r.message, "Auto-resolved: 8.98m² acts as 9m² (Grid Snap)");
    }

    #[test]
    fn test_medium_confidence_stays_active() {
        let f = finding(RuleId::MinRoomArea, 8.0, 9.0, 0.6);
        assert!(run_second_pass(&f, &PolicyConfig::default()).is_none());
    }

    #[test]
    fn test_area_repair_only_for_small_shortfall() {
        let config = PolicyConfig::default();
        let small = determine_repairs(&finding(RuleId::MinRoomArea, 7.5, 9.0, 1.0), &config);
        assert_eq!(small.len(), 1);
        assert_eq!(small[0].label, "Expand to 9m²");
        assert_eq!(small[0].risk_analysis, "LOW_RISK: Minor boundary shift.");
        let big = determine_repairs(&finding(RuleId::MinRoomArea, 2.0, 9.0, 1.0), &config);
        assert!(big.is_empty());
    }

    #[test]
    fn test_width_repair_applied_clears_finding() {
        let mut rooms = house().floors[0].rooms.clone();
        rooms.retain(|r| r.id != "BEDROOM_2");
        rooms.push(room("BEDROOM_2", RoomType::Bedroom, 4.0, 5.0, 2.5, 3.0));
        let layout = single_floor(rooms);

        let engine = PolicyEngine::default();
        let report = engine.evaluate(&layout);
        let widen = report
            .repairs
            .iter()
            .flat_map(|r| &r.actions)
            .find(|a| matches!(a.target, ResizeTarget::Widen { .. }))
            .unwrap();
        assert_eq!(widen.label, "Widen to 2.7m");

        let fixed = apply_repair(&layout, widen, &GuardTable::default()).unwrap();
        let bed = fixed.floors[0].room("BEDROOM_2").unwrap();
        assert_eq!((bed.width, bed.length), (3.0, 3.0));
        assert!(engine.evaluate(&fixed).findings.is_empty());
        // Original untouched.
        assert_eq!(layout.floors[0].room("BEDROOM_2").unwrap().width, 2.5);
    }

    #[test]
    fn test_area_repair_applied() {
        let mut rooms = house().floors[0].rooms.clone();
        rooms.retain(|r| r.id != "BEDROOM_2");
        rooms.push(room("BEDROOM_2", RoomType::Bedroom, 4.0, 5.0, 3.0, 2.8));
        let layout = single_floor(rooms);

        let report = PolicyEngine::default().evaluate(&layout);
        assert_eq!(report.findings.len(), 1);
        let action = &report.repairs[0].actions[0];
        let fixed = apply_repair(&layout, action, &GuardTable::default()).unwrap();
        let bed = fixed.floors[0].room("BEDROOM_2").unwrap();
        assert_eq!((bed.width, bed.length), (3.0, 3.0));
        assert!(PolicyEngine::default().evaluate(&fixed).findings.is_empty());
    }

    #[test]
    fn test_repair_missing_room() {
        let action = RepairAction {
            label: "x".into(),
            action_type: ActionType::ResizeRoom,
            room_id: "GHOST".into(),
            level: 0,
            target: ResizeTarget::Widen { target_width: 3.0 },
            risk_analysis: String::new(),
        };
        let err = apply_repair(&house(), &action, &GuardTable::default()).unwrap_err();
        assert!(matches!(err, EditError::RoomNotFound { .. }));
    }
}
