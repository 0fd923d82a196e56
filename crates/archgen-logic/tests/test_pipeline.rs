//! Integration tests for the full generation pipeline.
//!
//! Exercises: Plot → Requirements → Solver → Layout
//! → QualityScore / PolicyEngine / Optimizer / Editor / DesignReport
//!
//! All tests are pure logic, no rendering.

use archgen_logic::config::{SolverConfig, Strategy};
use archgen_logic::constants::{RoomType, STACK_TOLERANCE};
use archgen_logic::editor::{diff_layouts, move_room, resize_room};
use archgen_logic::error::{EditError, SolveError};
use archgen_logic::estimate::{estimate_layout, QualityTier};
use archgen_logic::explain::generate_report;
use archgen_logic::geometry::{validate_all, Severity};
use archgen_logic::guard::GuardTable;
use archgen_logic::layout::Layout;
use archgen_logic::optimizer::{optimize_layout, OptimizerConfig, VariantKind};
use archgen_logic::plot::{Orientation, Plot, PlotInput};
use archgen_logic::policy::PolicyEngine;
use archgen_logic::quality::{calculate_balanced_score, ScoreWeights};
use archgen_logic::requirements::{parse_requirements, Requirements, RoomStandards};
use archgen_logic::solver::solve;

// ── Helpers ────────────────────────────────────────────────────────────

fn requirements(bedrooms: u32, floors: u32, parking: bool) -> Requirements {
    Requirements {
        bedrooms,
        floors,
        parking,
        ..Requirements::default()
    }
}

fn generate(width: f32, length: f32, req: &Requirements, strategy: Strategy) -> Result<Layout, SolveError> {
    let plot = Plot::new(PlotInput::rectangle(width, length))?;
    let program = parse_requirements(req, &RoomStandards::default())?;
    solve(&plot, &program, &SolverConfig::with_strategy(strategy))
}

// ── Solver properties ──────────────────────────────────────────────────

#[test]
fn pipeline_two_bed_plot_succeeds() {
    let layout = generate(12.0, 18.0, &requirements(2, 1, true), Strategy::Standard).unwrap();
    assert!(layout.success);
    assert_eq!(layout.unplaced_total, 0);
    assert!(validate_all(&layout)
        .iter()
        .all(|e| e.severity != Severity::Error));
}

#[test]
fn solve_is_byte_identical_across_runs() {
    let req = requirements(2, 1, true);
    let first = serde_json::to_string(&generate(12.0, 18.0, &req, Strategy::Standard).unwrap()).unwrap();
    for _ in 0..4 {
        let again = serde_json::to_string(&generate(12.0, 18.0, &req, Strategy::Standard).unwrap()).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn tiny_plot_never_reports_full_success() {
    match generate(5.0, 5.0, &requirements(3, 1, false), Strategy::Standard) {
        Err(_) => {}
        Ok(layout) => assert!(!layout.success || layout.unplaced_total > 0),
    }
}

#[test]
fn stairs_align_on_every_floor() {
    let layout = generate(12.0, 18.0, &requirements(3, 2, false), Strategy::Standard).unwrap();
    let stairs: Vec<_> = layout
        .rooms()
        .filter(|r| r.room_type == RoomType::Stairs)
        .collect();
    assert_eq!(stairs.len(), 2);
    for s in &stairs {
        assert!((s.x - stairs[0].x).abs() <= STACK_TOLERANCE);
        assert!((s.y - stairs[0].y).abs() <= STACK_TOLERANCE);
    }
}

#[test]
fn every_strategy_produces_valid_geometry() {
    for strategy in [Strategy::Standard, Strategy::Privacy, Strategy::SocialOpen] {
        let layout = generate(12.0, 18.0, &requirements(2, 1, true), strategy).unwrap();
        let errors: Vec<_> = validate_all(&layout)
            .into_iter()
            .filter(|e| e.severity == Severity::Error)
            .collect();
        assert!(errors.is_empty(), "{:?}: {:?}", strategy, errors);
    }
}

#[test]
fn room_types_serialize_as_screaming_strings() {
    let layout = generate(12.0, 18.0, &requirements(2, 1, true), Strategy::Standard).unwrap();
    let json = serde_json::to_value(&layout).unwrap();
    let types: Vec<_> = json["floors"][0]["rooms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["room_type"].as_str().unwrap().to_string())
        .collect();
    assert!(types.contains(&"MASTER_BEDROOM".to_string()));
    assert!(types.contains(&"PARKING".to_string()));
}

// ── Downstream consumers ───────────────────────────────────────────────

#[test]
fn scoring_and_policy_on_solved_layout() {
    let layout = generate(12.0, 18.0, &requirements(2, 1, true), Strategy::Standard).unwrap();
    let a = calculate_balanced_score(&layout, &ScoreWeights::default());
    let b = calculate_balanced_score(&layout, &ScoreWeights::default());
    assert_eq!(a, b);
    assert!(a.total_score <= 100);

    let report = PolicyEngine::default().evaluate(&layout);
    assert!(report.risk_score <= 100);
    for f in &report.findings {
        assert!((0.0..=1.0).contains(&f.confidence.score));
    }
}

#[test]
fn optimizer_keeps_baseline_and_order() {
    let layout = generate(12.0, 18.0, &requirements(3, 2, false), Strategy::Standard).unwrap();
    let board = optimize_layout(&layout, &OptimizerConfig::default(), &PolicyEngine::default());
    assert!(board.iter().any(|v| v.kind == VariantKind::Baseline));
    assert!(board
        .windows(2)
        .all(|w| w[0].score.total_score >= w[1].score.total_score));
}

#[test]
fn editor_is_copy_on_write() {
    let layout = generate(12.0, 18.0, &requirements(2, 1, true), Strategy::Standard).unwrap();
    let snapshot = layout.clone();
    let living = layout.floors[0].room_of_type(RoomType::Living).unwrap().clone();
    let table = GuardTable::default();

    let outside = move_room(&layout, 0, &living.id, 50.0, 50.0, &table);
    assert!(matches!(outside, Err(EditError::Rejected(_))));

    let tiny = resize_room(&layout, 0, &living.id, 1.0, 1.0, &table);
    assert!(matches!(tiny, Err(EditError::Rejected(_))));

    let missing = move_room(&layout, 0, "GHOST_1", 0.0, 0.0, &table);
    assert!(matches!(missing, Err(EditError::RoomNotFound { .. })));

    assert_eq!(layout, snapshot);
    assert!(diff_layouts(&layout, &snapshot).is_empty());
}

#[test]
fn design_report_on_solved_layout() {
    let layout = generate(12.0, 18.0, &requirements(3, 2, false), Strategy::Standard).unwrap();
    let mut input = PlotInput::rectangle(12.0, 18.0);
    input.orientation = Orientation::East;
    let plot = Plot::new(input).unwrap();

    let report = generate_report(&layout, &plot, &PolicyEngine::default());
    assert_eq!(report.cost, estimate_layout(&layout, QualityTier::Standard));
    assert_eq!(report.solar.orientation, Orientation::East);
    assert!(report.insights[0].starts_with("Plot Area: 216.0 m²."));
    assert!(report.insights.iter().any(|i| i.starts_with("Solar Score: ")));
    assert_eq!(
        report.limitations.len(),
        layout.unplaced_total + report.policy.findings.len()
    );
}
