//! Plain-language design report.
//!
//! Collects what the other engines say about a finished layout into one
//! record: plot efficiency, where key rooms ended up, solar rating, a
//! concept cost estimate, rooms that could not be placed, and active policy
//! findings with the number of available repairs.

use serde::{Deserialize, Serialize};

use crate::constants::RoomType;
use crate::estimate::{estimate_layout, format_currency, CostEstimate, QualityTier};
use crate::grid::Zones;
use crate::layout::Layout;
use crate::plot::Plot;
use crate::policy::{ConfidenceLevel, PolicyEngine, PolicyReport, RiskLevel};
use crate::solar::{self, SolarAnalysis};

pub const REPORT_TITLE: &str = "Design Analysis Report";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignReport {
    pub title: String,
    pub summary: String,
    pub insights: Vec<String>,
    pub limitations: Vec<String>,
    pub cost: CostEstimate,
    pub solar: SolarAnalysis,
    pub policy: PolicyReport,
}

fn confidence_label(level: ConfidenceLevel) -> &'static str {
    match level {
        ConfidenceLevel::High => "HIGH",
        ConfidenceLevel::Medium => "MEDIUM",
        ConfidenceLevel::Low => "LOW",
    }
}

fn placement_insights(layout: &Layout) -> Vec<String> {
    let rear_start = Zones::partition(&layout.envelope).rear.y_start;
    layout
        .rooms()
        .filter_map(|room| match room.room_type {
            RoomType::Living => Some("Living Room placed centrally for accessibility.".to_string()),
            RoomType::Parking => Some("Parking allocated near road frontage.".to_string()),
            RoomType::Bedroom | RoomType::MasterBedroom => {
                let zone = if room.y > rear_start { "Rear (Quiet)" } else { "Side" };
                Some(format!("{} in {} Zone.", room.id, zone))
            }
            _ => None,
        })
        .collect()
}

/// Build the report for `layout` on `plot`. Cost is estimated at the
/// standard tier over the built-up area of every floor; solar uses the
/// plot orientation.
pub fn generate_report(layout: &Layout, plot: &Plot, engine: &PolicyEngine) -> DesignReport {
    let mut insights = Vec::new();
    let mut limitations = Vec::new();

    let built_up = layout.total_area();
    let capacity = layout.envelope.area() * layout.floors.len().max(1) as f32;
    let efficiency = if capacity > 0.0 { built_up / capacity } else { 0.0 };
    insights.push(format!(
        "Plot Area: {:.1} m². Built-Up: {:.1} m². Efficiency: {:.0}%.",
        plot.total_area(),
        built_up,
        efficiency * 100.0
    ));

    insights.extend(placement_insights(layout));

    let solar = solar::analyze(layout, plot.orientation);
    insights.push(format!("Solar Score: {}/100 ({}).", solar.score, solar.rating.label()));
    insights.extend(solar.insights.iter().map(|txt| format!("☀ {}", txt)));

    let cost = estimate_layout(layout, QualityTier::Standard);
    insights.push(format!(
        "Est. Cost: {} ({} sft).",
        format_currency(cost.total),
        cost.area_sq_ft
    ));

    for floor in &layout.floors {
        for u in &floor.unplaced {
            limitations.push(format!(
                "Could not place {}: {}. Try increasing plot size.",
                u.spec.id, u.reason
            ));
        }
    }

    let policy = engine.evaluate(layout);
    for f in &policy.findings {
        let icon = if f.risk_level == RiskLevel::High { "⛔" } else { "⚠" };
        limitations.push(format!(
            "{} {} ({} Conf.)",
            icon,
            f.message,
            confidence_label(f.confidence.level)
        ));
    }
    if !policy.repairs.is_empty() {
        insights.push(format!(
            "💡 {} Auto-Fixes available for compliance.",
            policy.repairs.len()
        ));
    }

    log::debug!(
        "Report: {} insights, {} limitations, solar {}",
        insights.len(),
        limitations.len(),
        solar.score
    );

    DesignReport {
        title: REPORT_TITLE.to_string(),
        summary: format!(
            "Design achieves {} solar efficiency with optimized zoning.",
            solar.rating.label().to_lowercase()
        ),
        insights,
        limitations,
        cost,
        solar,
        policy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::layout::fixtures::*;
    use crate::plot::{Orientation, PlotInput, Setbacks};
    use crate::requirements::{parse_requirements, Requirements, RoomStandards};
    use crate::solar::SolarRating;
    use crate::solver::solve;

    fn plot(orientation: Orientation) -> Plot {
        let mut input = PlotInput::rectangle(12.0, 18.0);
        input.orientation = orientation;
        Plot::new(input).unwrap()
    }

    #[test]
    fn test_compliant_house_report() {
        let report = generate_report(&house(), &plot(Orientation::North), &PolicyEngine::default());
        assert_eq!(report.title, "Design Analysis Report");
        assert_eq!(
            report.insights,
            vec![
                "Plot Area: 216.0 m². Built-Up: 58.5 m². Efficiency: 15%.",
                "Living Room placed centrally for accessibility.",
                "MASTER_BEDROOM_1 in Side Zone.",
                "BEDROOM_2 in Side Zone.",
                "Solar Score: 93/100 (NEUTRAL).",
                "Est. Cost: ₹13,90,000 (630 sft).",
            ]
        );
        assert!(report.limitations.is_empty());
        assert_eq!(report.summary, "Design achieves neutral solar efficiency with optimized zoning.");
        assert_eq!(report.cost.total, 1_385_327);
    }

    #[test]
    fn test_west_plot_reports_heat_gain() {
        let report = generate_report(&house(), &plot(Orientation::West), &PolicyEngine::default());
        assert_eq!(report.solar.rating, SolarRating::Poor);
        assert!(report
            .insights
            .contains(&"☀ KITCHEN faces WEST (High Heat Gain risk). Consider shading.".to_string()));
        assert_eq!(
            report.summary,
            "Design achieves poor (high heat) solar efficiency with optimized zoning."
        );
    }

    #[test]
    fn test_rear_bedroom_zone() {
        let layout = single_floor(vec![room("BEDROOM_2", RoomType::Bedroom, 0.0, 15.0, 3.0, 3.5)]);
        let report = generate_report(&layout, &plot(Orientation::North), &PolicyEngine::default());
        assert!(report.insights.contains(&"BEDROOM_2 in Rear (Quiet) Zone.".to_string()));
    }

    #[test]
    fn test_policy_findings_become_limitations() {
        let mut rooms = house().floors[0].rooms.clone();
        rooms.retain(|r| r.id != "BEDROOM_2");
        rooms.push(room("BEDROOM_2", RoomType::Bedroom, 4.0, 5.0, 2.5, 3.0));
        let report = generate_report(&single_floor(rooms), &plot(Orientation::North), &PolicyEngine::default());

        assert_eq!(report.policy.findings.len(), 2);
        assert_eq!(
            report.limitations[0],
            "⚠ BEDROOM area 7.5m² is below minimum 9m² (HIGH Conf.)"
        );
        assert!(report.limitations[1].ends_with("(MEDIUM Conf.)"));
        assert_eq!(
            report.insights.last().unwrap(),
            "💡 2 Auto-Fixes available for compliance."
        );
    }

    #[test]
    fn test_unplaced_rooms_become_limitations() {
        let config = SolverConfig {
            setbacks: Setbacks::none(),
            ..SolverConfig::default()
        };
        let small = Plot::new(PlotInput::rectangle(5.0, 5.0)).unwrap();
        let req = Requirements {
            bedrooms: 3,
            floors: 1,
            parking: true,
            ..Requirements::default()
        };
        let program = parse_requirements(&req, &RoomStandards::default()).unwrap();
        let layout = solve(&small, &program, &config).unwrap();

        let report = generate_report(&layout, &small, &PolicyEngine::default());
        assert!(report
            .limitations
            .contains(&"Could not place LIVING_1: No valid space. Try increasing plot size.".to_string()));
    }
}
