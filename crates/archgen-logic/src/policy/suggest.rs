//! Advisory text for active findings.

use serde::{Deserialize, Serialize};

use super::{ConfidenceLevel, Finding, RiskLevel, RuleId};

/// Stair width quoted when a finding carries no measured data.
const DEFAULT_MIN_STAIR_WIDTH: f32 = 1.0;

/// Non-binding advice attached to a finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub rule: RuleId,
    pub risk_level: RiskLevel,
    pub message: String,
}

fn suggestion_for(finding: &Finding) -> Suggestion {
    let (rule, risk_level, message) = match finding.rule {
        RuleId::MinRoomArea => (
            RuleId::MinRoomArea,
            RiskLevel::Medium,
            "Increase the room size slightly. Expanding by 1-2m² is usually sufficient for comfort and code alignment."
                .to_string(),
        ),
        RuleId::MinRoomWidth => (
            RuleId::MinRoomWidth,
            RiskLevel::Medium,
            "Increase minimum clear width. Consider adjusting furniture layout or wall alignment.".to_string(),
        ),
        RuleId::StairWidth => {
            let required = finding.data.as_ref().map_or(DEFAULT_MIN_STAIR_WIDTH, |d| d.required);
            (
                RuleId::StairWidth,
                RiskLevel::High,
                format!(
                    "Increase stair width to at least {:.1}m to support safe circulation.",
                    required
                ),
            )
        }
        RuleId::StructureInvalid | RuleId::GeneralImprovement => (
            RuleId::GeneralImprovement,
            RiskLevel::Low,
            "Review room placement and circulation paths for comfort and accessibility.".to_string(),
        ),
    };
    Suggestion {
        rule,
        risk_level,
        message,
    }
}

/// One suggestion per finding, in finding order.
pub fn generate_suggestions(findings: &[Finding]) -> Vec<Suggestion> {
    findings.iter().map(suggestion_for).collect()
}

/// Plain-language summary of a policy run.
pub fn generate_summary(findings: &[Finding], risk_score: u32) -> String {
    if findings.is_empty() {
        return "No compliance issues detected. Layout complies with policy rules.".to_string();
    }

    let mut summary = format!(
        "Detected {} policy observations. Risk score = {}.",
        findings.len(),
        risk_score
    );
    let low = findings
        .iter()
        .filter(|f| f.confidence.level == ConfidenceLevel::Low)
        .count();
    if low > 0 {
        summary.push_str(&format!(
            " {} findings marked as Low Confidence (possible false positives).",
            low
        ));
    }
    summary.push_str(" These are recommendations intended to support safe, functional architectural design.");
    summary
}
