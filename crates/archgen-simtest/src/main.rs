//! archgen Headless Generation Harness
//!
//! Runs the full generation pipeline (plot, requirements, solver, scoring,
//! policy, optimizer, design report) over a fixed scenario sweep and checks the layout
//! invariants on every result. Entirely in-process, no rendering.
//!
//! Usage:
//!   cargo run -p archgen-simtest
//!   cargo run -p archgen-simtest -- --verbose
//!   cargo run -p archgen-simtest -- --config overrides.json

use archgen_logic::config::{SolverConfig, Strategy};
use archgen_logic::constants::{RoomType, STACK_TOLERANCE};
use archgen_logic::editor;
use archgen_logic::estimate::{estimate_layout, QualityTier};
use archgen_logic::explain::generate_report;
use archgen_logic::geometry::{self, Severity};
use archgen_logic::guard::GuardTable;
use archgen_logic::layout::Layout;
use archgen_logic::optimizer::{optimize_layout, OptimizerConfig, VariantKind};
use archgen_logic::plot::{Orientation, Plot, PlotInput};
use archgen_logic::policy::{apply_repair, PolicyConfig, PolicyEngine};
use archgen_logic::quality::{calculate_balanced_score, ScoreWeights};
use archgen_logic::requirements::{check_feasibility, parse_requirements, Requirements, RoomStandards};
use archgen_logic::solver::solve;
use serde::Deserialize;

// ── Harness configuration (overridable from JSON) ───────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HarnessConfig {
    solver: SolverConfig,
    standards: RoomStandards,
    policy: PolicyConfig,
    weights: ScoreWeights,
    optimizer: OptimizerConfig,
    guard: GuardTable,
}

fn load_config() -> Result<HarnessConfig, String> {
    let args: Vec<String> = std::env::args().collect();
    let Some(pos) = args.iter().position(|a| a == "--config") else {
        return Ok(HarnessConfig::default());
    };
    let path = args
        .get(pos + 1)
        .ok_or_else(|| "--config requires a path".to_string())?;
    let text = std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
    serde_json::from_str(&text).map_err(|e| format!("cannot parse {}: {}", path, e))
}

// ── Scenarios ───────────────────────────────────────────────────────────

struct Scenario {
    name: &'static str,
    width: f32,
    length: f32,
    req: Requirements,
}

fn scenarios() -> Vec<Scenario> {
    let req = |bedrooms, floors, parking| Requirements {
        bedrooms,
        floors,
        parking,
        ..Requirements::default()
    };
    vec![
        Scenario { name: "studio_9x12", width: 9.0, length: 12.0, req: req(1, 1, false) },
        Scenario { name: "2bed_12x18_parking", width: 12.0, length: 18.0, req: req(2, 1, true) },
        Scenario { name: "3bed_12x18_2fl", width: 12.0, length: 18.0, req: req(3, 2, false) },
        Scenario { name: "4bed_15x20_2fl_parking", width: 15.0, length: 20.0, req: req(4, 2, true) },
        Scenario { name: "5bed_12x20_3fl", width: 12.0, length: 20.0, req: req(5, 3, false) },
    ]
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };
    println!("=== archgen Generation Harness ===\n");

    let mut results = Vec::new();

    // 1. Solver sweep over scenarios × strategies
    let layouts = validate_solver_sweep(&config, verbose, &mut results);

    // 2. Infeasible input
    results.extend(validate_infeasible(&config));

    // 3. Scoring
    results.extend(validate_scoring(&config, &layouts, verbose));

    // 4. Policy engine and repairs
    results.extend(validate_policy(&config, &layouts, verbose));

    // 5. Optimizer
    results.extend(validate_optimizer(&config, &layouts, verbose));

    // 6. Editor copy-on-write
    results.extend(validate_editor(&config, &layouts));

    // 7. Design reports
    results.extend(validate_reports(&config, &layouts, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Solver sweep ─────────────────────────────────────────────────────

fn solve_scenario(config: &HarnessConfig, s: &Scenario, strategy: Strategy) -> Result<Layout, String> {
    let plot = Plot::new(PlotInput::rectangle(s.width, s.length)).map_err(|e| e.to_string())?;
    let program = parse_requirements(&s.req, &config.standards).map_err(|e| e.to_string())?;
    let solver = SolverConfig {
        strategy,
        ..config.solver.clone()
    };
    solve(&plot, &program, &solver).map_err(|e| e.to_string())
}

fn validate_solver_sweep(config: &HarnessConfig, verbose: bool, results: &mut Vec<TestResult>) -> Vec<(String, Layout)> {
    println!("--- Solver Sweep ---");
    let mut layouts = Vec::new();

    for s in scenarios() {
        // Feasibility pre-check
        if let (Ok(plot), Ok(program)) = (
            Plot::new(PlotInput::rectangle(s.width, s.length)),
            parse_requirements(&s.req, &config.standards),
        ) {
            if let Ok(envelope) = plot.buildable_area(&config.solver.setbacks) {
                let report = check_feasibility(&envelope, &program);
                results.push(TestResult {
                    name: format!("{}_feasibility", s.name),
                    passed: report.valid == report.errors.is_empty(),
                    detail: format!(
                        "utilization {:.0}% ({:.1}/{:.1} m²)",
                        report.utilization * 100.0,
                        report.required_area,
                        report.buildable_area
                    ),
                });
            }
        }

        for strategy in [Strategy::Standard, Strategy::Privacy, Strategy::SocialOpen] {
            let tag = format!("{}_{:?}", s.name, strategy).to_lowercase();
            let layout = match solve_scenario(config, &s, strategy) {
                Ok(l) => l,
                Err(e) => {
                    results.push(TestResult {
                        name: format!("{}_solve", tag),
                        passed: false,
                        detail: e,
                    });
                    continue;
                }
            };

            if verbose {
                println!(
                    "  {:<40} {} rooms, {} unplaced",
                    tag,
                    layout.room_count(),
                    layout.unplaced_total
                );
            }

            results.push(TestResult {
                name: format!("{}_success_flag", tag),
                passed: layout.success == (layout.unplaced_total == 0),
                detail: format!("{} placed, {} unplaced", layout.room_count(), layout.unplaced_total),
            });

            let errors: Vec<_> = geometry::validate_all(&layout)
                .into_iter()
                .filter(|e| e.severity == Severity::Error)
                .collect();
            results.push(TestResult {
                name: format!("{}_geometry", tag),
                passed: errors.is_empty(),
                detail: if errors.is_empty() {
                    "no overlaps, contained, stacked".into()
                } else {
                    errors
                        .iter()
                        .map(|e| e.message.as_str())
                        .collect::<Vec<_>>()
                        .join("; ")
                },
            });

            if s.req.floors > 1 {
                let stairs: Vec<_> = layout
                    .rooms()
                    .filter(|r| r.room_type == RoomType::Stairs)
                    .collect();
                let aligned = stairs.len() == s.req.floors as usize
                    && stairs.iter().all(|r| {
                        (r.x - stairs[0].x).abs() <= STACK_TOLERANCE
                            && (r.y - stairs[0].y).abs() <= STACK_TOLERANCE
                    });
                results.push(TestResult {
                    name: format!("{}_stairs_stacked", tag),
                    passed: aligned,
                    detail: format!("{} stair rooms over {} floors", stairs.len(), s.req.floors),
                });
            }

            let deterministic = (0..4).all(|_| {
                solve_scenario(config, &s, strategy)
                    .map(|again| again == layout)
                    .unwrap_or(false)
            });
            results.push(TestResult {
                name: format!("{}_deterministic", tag),
                passed: deterministic,
                detail: "5 identical solves".into(),
            });

            layouts.push((tag, layout));
        }
    }

    layouts
}

// ── 2. Infeasible input ─────────────────────────────────────────────────

fn validate_infeasible(config: &HarnessConfig) -> Vec<TestResult> {
    println!("--- Infeasible Input ---");
    let s = Scenario {
        name: "3bed_5x5",
        width: 5.0,
        length: 5.0,
        req: Requirements {
            bedrooms: 3,
            ..Requirements::default()
        },
    };
    let (passed, detail) = match solve_scenario(config, &s, Strategy::Standard) {
        Err(e) => (true, format!("rejected: {}", e)),
        Ok(layout) => (
            !layout.success || layout.unplaced_total > 0,
            format!("{} unplaced", layout.unplaced_total),
        ),
    };
    vec![TestResult {
        name: "infeasible_not_successful".into(),
        passed,
        detail,
    }]
}

// ── 3. Scoring ──────────────────────────────────────────────────────────

fn validate_scoring(config: &HarnessConfig, layouts: &[(String, Layout)], verbose: bool) -> Vec<TestResult> {
    println!("--- Quality Scoring ---");
    let mut results = Vec::new();

    for (tag, layout) in layouts {
        let a = calculate_balanced_score(layout, &config.weights);
        let b = calculate_balanced_score(layout, &config.weights);
        if verbose {
            println!(
                "  {:<40} total {:>3} (cost {}, comfort {}, energy {}, aesthetic {}) est. {} INR",
                tag,
                a.total_score,
                a.breakdown.cost,
                a.breakdown.comfort,
                a.breakdown.energy,
                a.breakdown.aesthetic,
                estimate_layout(layout, QualityTier::Standard).total
            );
        }
        results.push(TestResult {
            name: format!("{}_score_idempotent", tag),
            passed: a == b && a.total_score <= 100,
            detail: format!("total {}", a.total_score),
        });
    }

    results
}

// ── 4. Policy ───────────────────────────────────────────────────────────

fn validate_policy(config: &HarnessConfig, layouts: &[(String, Layout)], verbose: bool) -> Vec<TestResult> {
    println!("--- Policy Engine ---");
    let engine = PolicyEngine::new(config.policy.clone());
    let mut results = Vec::new();

    for (tag, layout) in layouts {
        let report = engine.evaluate(layout);
        if verbose {
            println!("  {:<40} risk {:>3} {:?}", tag, report.risk_score, report.enforcement);
        }
        let confidences_ok = report
            .findings
            .iter()
            .chain(report.resolved_findings.iter().map(|r| &r.original))
            .all(|f| (0.0..=1.0).contains(&f.confidence.score));
        results.push(TestResult {
            name: format!("{}_policy_confidence_bounds", tag),
            passed: confidences_ok && report.risk_score <= 100,
            detail: format!(
                "{} active, {} resolved, risk {}",
                report.findings.len(),
                report.resolved_findings.len(),
                report.risk_score
            ),
        });

        let applied = report
            .repairs
            .iter()
            .flat_map(|r| &r.actions)
            .filter(|a| apply_repair(layout, a, &config.guard).is_ok())
            .count();
        if !report.repairs.is_empty() {
            results.push(TestResult {
                name: format!("{}_repairs_proposed", tag),
                passed: true,
                detail: format!("{} repairs, {} applied cleanly", report.repairs.len(), applied),
            });
        }
    }

    results
}

// ── 5. Optimizer ────────────────────────────────────────────────────────

fn validate_optimizer(config: &HarnessConfig, layouts: &[(String, Layout)], verbose: bool) -> Vec<TestResult> {
    println!("--- Variation Optimizer ---");
    let engine = PolicyEngine::new(config.policy.clone());
    let optimizer = OptimizerConfig {
        weights: config.weights,
        ..config.optimizer.clone()
    };
    let mut results = Vec::new();

    for (tag, layout) in layouts {
        let board = optimize_layout(layout, &optimizer, &engine);
        let has_baseline = board.iter().any(|v| v.kind == VariantKind::Baseline);
        let sorted = board
            .windows(2)
            .all(|w| w[0].score.total_score >= w[1].score.total_score);
        if verbose {
            let ids: Vec<_> = board
                .iter()
                .map(|v| format!("{}={}", v.id, v.score.total_score))
                .collect();
            println!("  {:<40} {}", tag, ids.join(" "));
        }
        results.push(TestResult {
            name: format!("{}_optimizer_board", tag),
            passed: has_baseline && sorted && board.len() <= optimizer.top_n.max(1),
            detail: format!("{} variants, best {}", board.len(), board.first().map_or(0, |v| v.score.total_score)),
        });

        let again = optimize_layout(layout, &optimizer, &engine);
        results.push(TestResult {
            name: format!("{}_optimizer_reproducible", tag),
            passed: again == board,
            detail: format!("seed {}", optimizer.seed),
        });
    }

    results
}

// ── 6. Editor ───────────────────────────────────────────────────────────

fn validate_editor(config: &HarnessConfig, layouts: &[(String, Layout)]) -> Vec<TestResult> {
    println!("--- Layout Editor ---");
    let mut results = Vec::new();

    for (tag, layout) in layouts {
        let Some(room) = layout.floors.first().and_then(|f| f.rooms.first()) else {
            continue;
        };
        let before = layout.clone();
        // Dragging a room outside the envelope must be rejected.
        let outside = editor::move_room(
            layout,
            room.level,
            &room.id,
            layout.envelope.width + 5.0,
            0.0,
            &config.guard,
        );
        results.push(TestResult {
            name: format!("{}_editor_copy_on_write", tag),
            passed: outside.is_err() && *layout == before,
            detail: match outside {
                Err(e) => format!("rejected: {}", e),
                Ok(_) => "out-of-bounds move accepted".into(),
            },
        });
    }

    results
}

// ── 7. Design reports ───────────────────────────────────────────────────

fn validate_reports(config: &HarnessConfig, layouts: &[(String, Layout)], verbose: bool) -> Vec<TestResult> {
    println!("--- Design Reports ---");
    let engine = PolicyEngine::new(config.policy.clone());
    let mut results = Vec::new();

    for (tag, layout) in layouts {
        let Some(s) = scenarios().into_iter().find(|s| tag.starts_with(s.name)) else {
            continue;
        };
        for orientation in [Orientation::North, Orientation::East, Orientation::South, Orientation::West] {
            let mut input = PlotInput::rectangle(s.width, s.length);
            input.orientation = orientation;
            let Ok(plot) = Plot::new(input) else {
                continue;
            };
            let report = generate_report(layout, &plot, &engine);
            if verbose && orientation == Orientation::North {
                println!("  {:<40} {}", tag, report.summary);
            }
            let expected_limits = layout.unplaced_total + report.policy.findings.len();
            results.push(TestResult {
                name: format!("{}_{:?}_report", tag, orientation).to_lowercase(),
                passed: report.cost == estimate_layout(layout, QualityTier::Standard)
                    && report.limitations.len() == expected_limits
                    && report.solar.orientation == orientation,
                detail: format!(
                    "solar {} {}, {} insights, {} limitations",
                    report.solar.score,
                    report.solar.rating.label(),
                    report.insights.len(),
                    report.limitations.len()
                ),
            });
        }
    }

    results
}
