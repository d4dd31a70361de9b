// modelcert-guardrails/src/cascade.rs
// ============================================================================
// Module: Guardrail Cascade
// Description: Two-stage cascade orchestration over checks and classifier.
// Purpose: Run cheap filters first and escalate to the classifier only when
//          ambiguous.
// Dependencies: crate::{checks, classifier, verdict}, modelcert-core
// ============================================================================

//! ## Overview
//! The cascade runs all three stage-1 checks, stops before stage 2 when any
//! of them blocks, and otherwise invokes the remote classifier only when at
//! least one check escalated. Callers always receive an ordered verdict
//! list, never an error: classifier infrastructure failure becomes a
//! human-escalation verdict, and a missing classifier fails closed in
//! production and open elsewhere.

// ============================================================================
// SECTION: Imports
// ============================================================================

use modelcert_core::CorrelationId;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;

use crate::checks::Stage1Checks;
use crate::classifier::ClassifierBackend;
use crate::classifier::ClassifierError;
use crate::classifier::ModerationClassifier;
use crate::verdict::CheckStage;
use crate::verdict::GuardrailAction;
use crate::verdict::GuardrailVerdict;
use crate::verdict::ThreatLevel;

// ============================================================================
// SECTION: Cascade Context
// ============================================================================

/// Deployment mode governing the no-classifier fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    /// Fail closed when the classifier is unavailable.
    Production,
    /// Fail open with reduced confidence for developer convenience.
    Development,
}

/// Whether the screened text is inbound or outbound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentDirection {
    /// Text entering the model.
    Input,
    /// Text produced by the model.
    Output,
}

/// Per-request cascade context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeContext {
    /// Direction of the screened content.
    pub direction: ContentDirection,
    /// Optional correlation identifier linking verdicts to a request.
    pub correlation_id: Option<CorrelationId>,
}

// ============================================================================
// SECTION: Cascade
// ============================================================================

/// Two-stage guardrail cascade.
pub struct GuardrailCascade<C: ModerationClassifier> {
    /// Compiled stage-1 checks.
    checks: Stage1Checks,
    /// Stage-2 classifier availability.
    classifier: ClassifierBackend<C>,
    /// Deployment mode for the no-classifier fallback.
    mode: DeploymentMode,
}

impl<C: ModerationClassifier> GuardrailCascade<C> {
    /// Creates a cascade over a classifier backend.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] when the stage-1 tables fail to compile.
    pub fn new(
        classifier: ClassifierBackend<C>,
        mode: DeploymentMode,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            checks: Stage1Checks::new()?,
            classifier,
            mode,
        })
    }

    /// Runs the full cascade and returns all verdicts in order.
    ///
    /// Stage-1 checks always all run. Any stage-1 block stops the cascade
    /// before stage 2; any stage-1 classifier escalation (without a block)
    /// invokes stage 2.
    #[must_use]
    pub fn run_cascade(&self, text: &str, _ctx: &CascadeContext) -> Vec<GuardrailVerdict> {
        let mut verdicts = vec![
            self.checks.injection_check(text),
            self.checks.pii_check(text),
            self.checks.toxicity_check(text),
        ];

        if verdicts.iter().any(|verdict| verdict.action == GuardrailAction::Block) {
            return verdicts;
        }

        let needs_escalation = verdicts
            .iter()
            .any(|verdict| verdict.action == GuardrailAction::EscalateToClassifier);
        if needs_escalation {
            verdicts.push(self.classify(text));
        }
        verdicts
    }

    /// Runs stage 2, converting every failure into a verdict.
    fn classify(&self, text: &str) -> GuardrailVerdict {
        let classifier = match &self.classifier {
            ClassifierBackend::Remote(classifier) => classifier,
            ClassifierBackend::Unconfigured => return self.unconfigured_verdict(),
        };
        match classifier.classify(text) {
            Ok(outcome) if outcome.flagged => {
                let max_score = outcome.max_score();
                GuardrailVerdict {
                    stage: CheckStage::Classifier,
                    threat_level: ThreatLevel::Blocked,
                    action: GuardrailAction::Block,
                    reason: format!(
                        "Content flagged by moderation endpoint: {}",
                        outcome.categories.join(", ")
                    ),
                    confidence: max_score,
                    details: Some(json!({
                        "categories": outcome.categories,
                        "scores": outcome.scores,
                    })),
                }
            }
            Ok(outcome) => GuardrailVerdict {
                stage: CheckStage::Classifier,
                threat_level: ThreatLevel::Safe,
                action: GuardrailAction::Pass,
                reason: "Content passed moderation check".to_string(),
                confidence: 1.0 - outcome.max_score(),
                details: None,
            },
            Err(err) => infrastructure_verdict(&err),
        }
    }

    /// Builds the verdict for a classifier that was never configured.
    fn unconfigured_verdict(&self) -> GuardrailVerdict {
        match self.mode {
            DeploymentMode::Production => GuardrailVerdict {
                stage: CheckStage::Classifier,
                threat_level: ThreatLevel::Blocked,
                action: GuardrailAction::EscalateToHuman,
                reason: "Moderation endpoint unavailable in production; escalating to human review"
                    .to_string(),
                confidence: 0.0,
                details: None,
            },
            DeploymentMode::Development => GuardrailVerdict {
                stage: CheckStage::Classifier,
                threat_level: ThreatLevel::Safe,
                action: GuardrailAction::Pass,
                reason: "Moderation endpoint not configured; passing in non-production"
                    .to_string(),
                confidence: 0.5,
                details: None,
            },
        }
    }
}

/// Builds the verdict for a classifier infrastructure failure.
///
/// Infrastructure failure always escalates to a human, in every deployment
/// mode.
fn infrastructure_verdict(err: &ClassifierError) -> GuardrailVerdict {
    GuardrailVerdict {
        stage: CheckStage::Classifier,
        threat_level: ThreatLevel::Suspicious,
        action: GuardrailAction::EscalateToHuman,
        reason: format!("Moderation endpoint failed; escalating to human review: {err}"),
        confidence: 0.0,
        details: None,
    }
}
