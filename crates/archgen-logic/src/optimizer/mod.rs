//! Variant search around a solved layout.
//!
//! Each trial picks one mutator at random, applies it to the base layout,
//! runs the policy engine on the result and scores the survivors. Trials
//! are independent and run on the rayon pool; each owns a `ChaCha8Rng`
//! seeded from `(seed, trial)` so a fixed seed reproduces the same
//! leaderboard regardless of scheduling.
//!
//! A mutant is discarded only when it is both blocked and clearly broken
//! (`!allowed && risk > discard_risk`). Borderline mutants stay on the board
//! with `valid = false` so trade-offs remain visible.

mod mutators;

pub use mutators::{resize_random_room, shrink_corridors, swap_rooms, Mutator};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::editor::diff_layouts;
use crate::layout::Layout;
use crate::policy::PolicyEngine;
use crate::quality::{calculate_balanced_score, BalancedScore, ScoreWeights};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Number of mutation trials.
    pub max_variants: usize,
    /// Leaderboard length, baseline included.
    pub top_n: usize,
    pub seed: u64,
    /// Blocked mutants above this risk are dropped.
    pub discard_risk: u32,
    pub weights: ScoreWeights,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_variants: 10,
            top_n: 5,
            seed: 42,
            discard_risk: 80,
            weights: ScoreWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantKind {
    Baseline,
    Variant,
}

/// One scored candidate on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: VariantKind,
    pub layout: Layout,
    pub score: BalancedScore,
    /// Whether the policy engine allowed this layout.
    pub valid: bool,
    pub risk_score: u32,
    pub changes: Vec<String>,
}

/// Run the variant search and return the ranked leaderboard, best first.
/// The unmutated baseline is always included.
pub fn optimize_layout(base: &Layout, config: &OptimizerConfig, engine: &PolicyEngine) -> Vec<Variant> {
    let base_report = engine.evaluate(base);
    let baseline = Variant {
        id: "baseline".to_string(),
        kind: VariantKind::Baseline,
        layout: base.clone(),
        score: calculate_balanced_score(base, &config.weights),
        valid: base_report.allowed,
        risk_score: base_report.risk_score,
        changes: vec!["Original Design".to_string()],
    };

    let survivors: Vec<Variant> = (0..config.max_variants)
        .into_par_iter()
        .filter_map(|trial| run_trial(base, trial, config, engine))
        .collect();
    log::info!(
        "Optimizer: {} of {} variants survived policy screening",
        survivors.len(),
        config.max_variants
    );

    let mut board = Vec::with_capacity(survivors.len() + 1);
    board.push(baseline);
    board.extend(survivors);
    rank(board, config.top_n.max(1))
}

fn run_trial(base: &Layout, trial: usize, config: &OptimizerConfig, engine: &PolicyEngine) -> Option<Variant> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    rng.set_stream(trial as u64);

    let mutator = *Mutator::ALL.choose(&mut rng)?;
    let (layout, description) = mutator.apply(base, &mut rng);

    let report = engine.evaluate(&layout);
    if !report.allowed && report.risk_score > config.discard_risk {
        log::warn!(
            "Variant {} discarded: risk {} after '{}'",
            trial + 1,
            report.risk_score,
            description
        );
        return None;
    }

    let mut changes = vec![description];
    changes.extend(diff_layouts(base, &layout));
    Some(Variant {
        id: format!("variant_{}", trial + 1),
        kind: VariantKind::Variant,
        score: calculate_balanced_score(&layout, &config.weights),
        valid: report.allowed,
        risk_score: report.risk_score,
        layout,
        changes,
    })
}

/// Sort descending by total score and keep `top_n`. The sort is stable and
/// the baseline comes first, so it wins ties; if it still falls off the
/// end it replaces the last entry.
fn rank(mut board: Vec<Variant>, top_n: usize) -> Vec<Variant> {
    board.sort_by(|a, b| b.score.total_score.cmp(&a.score.total_score));
    let baseline_pos = board.iter().position(|v| v.kind == VariantKind::Baseline);
    if let Some(pos) = baseline_pos.filter(|&p| p >= top_n) {
        let baseline = board.remove(pos);
        board.truncate(top_n - 1);
        board.push(baseline);
    } else {
        board.truncate(top_n);
    }
    board
}
