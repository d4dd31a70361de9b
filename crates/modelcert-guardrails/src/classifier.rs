// modelcert-guardrails/src/classifier.rs
// ============================================================================
// Module: Moderation Classifier
// Description: Remote moderation classifier contract and HTTP implementation.
// Purpose: Provide the stage-2 heavy classifier behind a trait seam.
// Dependencies: reqwest, serde, serde_json, url
// ============================================================================

//! ## Overview
//! Stage 2 of the cascade calls an external moderation endpoint. The
//! [`ModerationClassifier`] trait keeps the cascade testable; the
//! [`ClassifierBackend`] sum type resolves availability once at startup so
//! call sites never probe for credentials at runtime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;

// ============================================================================
// SECTION: Classifier Contract
// ============================================================================

/// Result of one moderation call.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationOutcome {
    /// Whether the endpoint flagged the content.
    pub flagged: bool,
    /// Names of the flagged categories.
    pub categories: Vec<String>,
    /// Per-category scores.
    pub scores: BTreeMap<String, f64>,
}

impl ModerationOutcome {
    /// Returns the highest category score, or zero with no scores.
    #[must_use]
    pub fn max_score(&self) -> f64 {
        self.scores.values().copied().fold(0.0, f64::max)
    }
}

/// Moderation classifier errors. All variants indicate infrastructure
/// failure, never a content determination.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The endpoint returned a non-success status.
    #[error("moderation endpoint returned status {0}")]
    Status(u16),
    /// The endpoint could not be reached or timed out.
    #[error("moderation endpoint unreachable: {0}")]
    Unreachable(String),
    /// The response body could not be interpreted.
    #[error("moderation response malformed: {0}")]
    Malformed(String),
}

/// External content-moderation classifier.
pub trait ModerationClassifier {
    /// Classifies raw text.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError`] on any infrastructure failure; callers
    /// escalate those to human review.
    fn classify(&self, text: &str) -> Result<ModerationOutcome, ClassifierError>;
}

/// Classifier availability, resolved once at startup.
pub enum ClassifierBackend<C: ModerationClassifier> {
    /// A remote classifier is configured.
    Remote(C),
    /// No credential or endpoint is configured.
    Unconfigured,
}

// ============================================================================
// SECTION: HTTP Classifier
// ============================================================================

/// Configuration for the HTTP moderation classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClassifierConfig {
    /// Moderation endpoint URL.
    pub endpoint: Url,
    /// Bearer credential for the endpoint.
    pub api_key: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl HttpClassifierConfig {
    /// Creates a configuration with the default timeout and user agent.
    #[must_use]
    pub fn new(endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            endpoint,
            api_key: api_key.into(),
            timeout_ms: 10_000,
            user_agent: "modelcert/0.1".to_string(),
        }
    }
}

/// Wire shape of the moderation response envelope.
#[derive(Debug, Deserialize)]
struct ModerationResponse {
    /// Per-input results; the first entry covers the submitted text.
    results: Vec<ModerationResult>,
}

/// Wire shape of one moderation result.
#[derive(Debug, Deserialize)]
struct ModerationResult {
    /// Whether the content was flagged.
    #[serde(default)]
    flagged: bool,
    /// Per-category boolean determinations.
    #[serde(default)]
    categories: BTreeMap<String, bool>,
    /// Per-category scores.
    #[serde(default)]
    category_scores: BTreeMap<String, f64>,
}

/// Moderation classifier over a synchronous HTTP endpoint.
pub struct HttpModerationClassifier {
    /// Classifier configuration.
    config: HttpClassifierConfig,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl HttpModerationClassifier {
    /// Creates a new HTTP moderation classifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Unreachable`] when the HTTP client cannot
    /// be created.
    pub fn new(config: HttpClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|_| ClassifierError::Unreachable("http client build failed".to_string()))?;
        Ok(Self {
            config,
            client,
        })
    }
}

impl ModerationClassifier for HttpModerationClassifier {
    fn classify(&self, text: &str) -> Result<ModerationOutcome, ClassifierError> {
        let response = self
            .client
            .post(self.config.endpoint.clone())
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({ "input": text }))
            .send()
            .map_err(|err| ClassifierError::Unreachable(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Status(status.as_u16()));
        }
        let envelope: ModerationResponse =
            response.json().map_err(|err| ClassifierError::Malformed(err.to_string()))?;
        let result = envelope
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ClassifierError::Malformed("empty results".to_string()))?;
        let categories = result
            .categories
            .into_iter()
            .filter(|(_, flagged)| *flagged)
            .map(|(category, _)| category)
            .collect();
        Ok(ModerationOutcome {
            flagged: result.flagged,
            categories,
            scores: result.category_scores,
        })
    }
}
