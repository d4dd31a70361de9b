// modelcert-guardrails/src/lib.rs
// ============================================================================
// Module: Modelcert Guardrails Library
// Description: Public API surface for the cascade guardrail classifier.
// Purpose: Expose stage-1 checks, the classifier seam, and the cascade.
// Dependencies: crate::{cascade, checks, classifier, verdict}
// ============================================================================

//! ## Overview
//! Modelcert guardrails implement the two-stage cascade defense: fast local
//! pattern checks that escalate to a remote moderation classifier only when
//! ambiguous. Callers always receive a final action, never an error.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cascade;
pub mod checks;
pub mod classifier;
pub mod verdict;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cascade::CascadeContext;
pub use cascade::ContentDirection;
pub use cascade::DeploymentMode;
pub use cascade::GuardrailCascade;
pub use checks::Stage1Checks;
pub use classifier::ClassifierBackend;
pub use classifier::ClassifierError;
pub use classifier::HttpClassifierConfig;
pub use classifier::HttpModerationClassifier;
pub use classifier::ModerationClassifier;
pub use classifier::ModerationOutcome;
pub use verdict::CheckStage;
pub use verdict::GuardrailAction;
pub use verdict::GuardrailVerdict;
pub use verdict::ThreatLevel;
pub use verdict::get_final_action;
