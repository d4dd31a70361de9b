// modelcert-guardrails/src/checks.rs
// ============================================================================
// Module: Stage-1 Guardrail Checks
// Description: Fast local pattern checks for injection, PII, and toxicity.
// Purpose: Provide the cheap first-pass filters of the cascade.
// Dependencies: regex, serde_json
// ============================================================================

//! ## Overview
//! Stage-1 checks are regex and keyword filters compiled once at
//! construction. They run locally with no network calls: injection matches
//! block outright, PII matches escalate to the classifier, and toxicity
//! keyword counts decide between blocking and escalation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;
use serde_json::json;

use crate::verdict::CheckStage;
use crate::verdict::GuardrailAction;
use crate::verdict::GuardrailVerdict;
use crate::verdict::ThreatLevel;

// ============================================================================
// SECTION: Pattern Tables
// ============================================================================

/// Known prompt-injection phrasings, matched against lowercased text.
const INJECTION_PATTERNS: &[&str] = &[
    r"ignore\s+(all\s+)?previous\s+instructions",
    r"you\s+are\s+now\s+.*(dan|jailbreak|unrestricted)",
    r"system\s*:\s*you\s+are",
    r"<\|im_start\|>system",
    r"\[inst\].*\[/inst\]",
    r"```\s*(system|admin|root)",
    r"ignore\s+your\s+(rules|guidelines|constraints)",
    r"do\s+not\s+follow\s+your\s+(instructions|programming)",
    r"pretend\s+you\s+(are|have)\s+no\s+(rules|restrictions)",
];

/// Structured PII patterns, matched against the original text.
const PII_PATTERNS: &[(&str, &str)] = &[
    ("ssn", r"\b\d{3}-\d{2}-\d{4}\b"),
    ("credit_card", r"\b(?:\d{4}[-\s]?){3}\d{4}\b"),
    ("email", r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"),
    ("phone", r"\b(?:\+1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b"),
    ("account_number", r"\b\d{8,12}\b"),
];

/// Toxicity indicator keywords, matched as substrings of lowercased text.
const TOXICITY_KEYWORDS: &[&str] = &[
    "kill", "harm", "illegal", "exploit", "hack", "weapon", "fraud", "steal", "extort",
    "blackmail", "launder",
];

/// Distinct keyword matches at or above which toxicity blocks outright.
const TOXICITY_BLOCK_THRESHOLD: usize = 3;

// ============================================================================
// SECTION: Stage-1 Checks
// ============================================================================

/// Compiled stage-1 pattern checks.
pub struct Stage1Checks {
    /// Compiled injection patterns.
    injection: Vec<Regex>,
    /// Compiled PII patterns with their type labels.
    pii: Vec<(&'static str, Regex)>,
}

impl Stage1Checks {
    /// Compiles the stage-1 pattern tables.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] when a pattern fails to compile; the
    /// built-in tables always compile.
    pub fn new() -> Result<Self, regex::Error> {
        let injection = INJECTION_PATTERNS
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        let mut pii = Vec::with_capacity(PII_PATTERNS.len());
        for (label, pattern) in PII_PATTERNS {
            pii.push((*label, Regex::new(pattern)?));
        }
        Ok(Self {
            injection,
            pii,
        })
    }

    /// Fast regex-based injection detection over lowercased text.
    #[must_use]
    pub fn injection_check(&self, text: &str) -> GuardrailVerdict {
        let lowered = text.to_lowercase();
        for regex in &self.injection {
            if regex.is_match(&lowered) {
                return GuardrailVerdict {
                    stage: CheckStage::Injection,
                    threat_level: ThreatLevel::Blocked,
                    action: GuardrailAction::Block,
                    reason: format!("Prompt injection pattern detected: {}", regex.as_str()),
                    confidence: 0.85,
                    details: None,
                };
            }
        }
        GuardrailVerdict {
            stage: CheckStage::Injection,
            threat_level: ThreatLevel::Safe,
            action: GuardrailAction::Pass,
            reason: "No injection patterns detected".to_string(),
            confidence: 1.0,
            details: None,
        }
    }

    /// Fast regex-based PII detection over the original text.
    #[must_use]
    pub fn pii_check(&self, text: &str) -> GuardrailVerdict {
        let detected: Vec<&str> = self
            .pii
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(label, _)| *label)
            .collect();
        if detected.is_empty() {
            return GuardrailVerdict {
                stage: CheckStage::Pii,
                threat_level: ThreatLevel::Safe,
                action: GuardrailAction::Pass,
                reason: "No PII patterns detected".to_string(),
                confidence: 1.0,
                details: None,
            };
        }
        GuardrailVerdict {
            stage: CheckStage::Pii,
            threat_level: ThreatLevel::Suspicious,
            action: GuardrailAction::EscalateToClassifier,
            reason: format!("Potential PII detected: {}", detected.join(", ")),
            confidence: 0.7,
            details: Some(json!({ "pii_types": detected })),
        }
    }

    /// Fast keyword-based toxicity check over lowercased text.
    #[must_use]
    pub fn toxicity_check(&self, text: &str) -> GuardrailVerdict {
        let lowered = text.to_lowercase();
        let found: Vec<&str> = TOXICITY_KEYWORDS
            .iter()
            .filter(|keyword| lowered.contains(**keyword))
            .copied()
            .collect();
        if found.len() >= TOXICITY_BLOCK_THRESHOLD {
            return GuardrailVerdict {
                stage: CheckStage::Toxicity,
                threat_level: ThreatLevel::Blocked,
                action: GuardrailAction::Block,
                reason: format!("Multiple toxicity indicators: {}", found.join(", ")),
                confidence: 0.6,
                details: Some(json!({ "keywords": found })),
            };
        }
        if !found.is_empty() {
            return GuardrailVerdict {
                stage: CheckStage::Toxicity,
                threat_level: ThreatLevel::Suspicious,
                action: GuardrailAction::EscalateToClassifier,
                reason: format!("Potential toxicity indicators: {}", found.join(", ")),
                confidence: 0.4,
                details: Some(json!({ "keywords": found })),
            };
        }
        GuardrailVerdict {
            stage: CheckStage::Toxicity,
            threat_level: ThreatLevel::Safe,
            action: GuardrailAction::Pass,
            reason: "No toxicity indicators".to_string(),
            confidence: 1.0,
            details: None,
        }
    }
}
