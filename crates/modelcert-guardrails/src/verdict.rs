// modelcert-guardrails/src/verdict.rs
// ============================================================================
// Module: Guardrail Verdicts
// Description: Threat levels, escalation actions, and per-check verdicts.
// Purpose: Provide the stable verdict vocabulary shared by all stages.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every guardrail check produces a [`GuardrailVerdict`]. A cascade run
//! yields an ordered list of them, and [`get_final_action`] reduces the list
//! to the most restrictive action.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Verdict Vocabulary
// ============================================================================

/// Threat level reported by one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLevel {
    /// No threat detected.
    Safe,
    /// Ambiguous; warrants escalation.
    Suspicious,
    /// Threat detected.
    Blocked,
}

/// Escalation action requested by one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailAction {
    /// Allow the content.
    Pass,
    /// Send the content to the heavy classifier.
    EscalateToClassifier,
    /// Route the content to human review.
    EscalateToHuman,
    /// Block the content.
    Block,
}

impl GuardrailAction {
    /// Returns the restrictiveness rank of this action; higher wins.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Pass => 0,
            Self::EscalateToClassifier => 1,
            Self::EscalateToHuman => 2,
            Self::Block => 3,
        }
    }
}

/// Stage that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStage {
    /// Stage-1 injection pattern check.
    #[serde(rename = "stage1_injection")]
    Injection,
    /// Stage-1 PII pattern check.
    #[serde(rename = "stage1_pii")]
    Pii,
    /// Stage-1 toxicity keyword check.
    #[serde(rename = "stage1_toxicity")]
    Toxicity,
    /// Stage-2 remote classifier.
    #[serde(rename = "stage2_classifier")]
    Classifier,
}

impl CheckStage {
    /// Returns the stable string form of this stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Injection => "stage1_injection",
            Self::Pii => "stage1_pii",
            Self::Toxicity => "stage1_toxicity",
            Self::Classifier => "stage2_classifier",
        }
    }
}

// ============================================================================
// SECTION: Guardrail Verdict
// ============================================================================

/// Outcome of one guardrail check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailVerdict {
    /// Stage that produced the verdict.
    pub stage: CheckStage,
    /// Threat level detected.
    pub threat_level: ThreatLevel,
    /// Requested escalation action.
    pub action: GuardrailAction,
    /// Human-readable reason.
    pub reason: String,
    /// Confidence in [0,1].
    pub confidence: f64,
    /// Optional structured detail, such as matched categories.
    pub details: Option<Value>,
}

// ============================================================================
// SECTION: Final Action
// ============================================================================

/// Returns the most restrictive action across a verdict list.
///
/// The ordering is fixed: block over human escalation over classifier
/// escalation over pass. An empty list passes.
#[must_use]
pub fn get_final_action(verdicts: &[GuardrailVerdict]) -> GuardrailAction {
    verdicts
        .iter()
        .map(|verdict| verdict.action)
        .max_by_key(|action| action.severity())
        .unwrap_or(GuardrailAction::Pass)
}
