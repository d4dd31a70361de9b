// modelcert-policy/src/lib.rs
// ============================================================================
// Module: Modelcert Policy Gate Client
// Description: Fail-closed client for an external policy decision service.
// Purpose: Provide the approval-gate determination consulted at finalization.
// Dependencies: modelcert-core, reqwest, serde, serde_json, url
// ============================================================================

//! ## Overview
//! The policy gate client implements [`ApprovalGate`] against an OPA-style
//! decision endpoint: the gate input is posted as `{"input": ...}` and the
//! determination is read from `{"result": {...}}`. The client is fail
//! closed; any transport or shape failure is a deny. A deliberately
//! disabled gate is the one configuration that yields an explicit allow.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use modelcert_core::ApprovalGate;
use modelcert_core::GateDecision;
use modelcert_core::GateError;
use modelcert_core::GateInput;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde_json::json;
use url::Url;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default decision path under the policy engine's data API.
pub const DEFAULT_POLICY_PATH: &str = "/v1/data/modelcert";

/// Default decision rule consulted for certification approval.
pub const DEFAULT_POLICY_NAME: &str = "approval_gate";

/// Configuration for the policy gate client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyClientConfig {
    /// Base URL of the policy engine.
    pub base_url: Url,
    /// Data API path prefix for the policy package.
    pub policy_path: String,
    /// Decision rule name appended to the path.
    pub policy_name: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl PolicyClientConfig {
    /// Creates a configuration with the default path, rule, and timeout.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            policy_path: DEFAULT_POLICY_PATH.to_string(),
            policy_name: DEFAULT_POLICY_NAME.to_string(),
            timeout_ms: 10_000,
            user_agent: "modelcert/0.1".to_string(),
        }
    }

    /// Returns the full decision URL.
    fn decision_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = self.policy_path.trim_matches('/');
        format!("{base}/{path}/{}", self.policy_name)
    }
}

// ============================================================================
// SECTION: Wire Shapes
// ============================================================================

/// Wire shape of the policy engine's response envelope.
#[derive(Debug, Deserialize)]
struct PolicyResponse {
    /// Decision document; absent when the rule is undefined.
    result: Option<PolicyResult>,
}

/// Wire shape of the decision document.
#[derive(Debug, Deserialize)]
struct PolicyResult {
    /// Whether the gate permits certification.
    #[serde(default)]
    allow: bool,
    /// Optional reason accompanying the determination.
    #[serde(default)]
    reason: Option<String>,
}

// ============================================================================
// SECTION: Policy Gate Client
// ============================================================================

/// Gate backend, resolved once at construction.
enum GateBackend {
    /// A remote policy engine is configured.
    Remote {
        /// HTTP client used for decision calls.
        client: Client,
        /// Client configuration.
        config: PolicyClientConfig,
    },
    /// Policy evaluation is deliberately disabled.
    Disabled,
}

/// Fail-closed approval gate backed by an external policy engine.
pub struct PolicyGateClient {
    /// Resolved gate backend.
    backend: GateBackend,
}

impl PolicyGateClient {
    /// Creates a client for a remote policy engine.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Unavailable`] when the HTTP client cannot be
    /// created.
    pub fn new(config: PolicyClientConfig) -> Result<Self, GateError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|_| GateError::Unavailable("http client build failed".to_string()))?;
        Ok(Self {
            backend: GateBackend::Remote {
                client,
                config,
            },
        })
    }

    /// Creates a client whose gate is deliberately disabled.
    ///
    /// A disabled gate always allows; disabling is a configuration choice,
    /// not a failure mode.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            backend: GateBackend::Disabled,
        }
    }

    /// Posts the gate input and interprets the decision document.
    fn evaluate_remote(
        client: &Client,
        config: &PolicyClientConfig,
        input: &GateInput,
    ) -> GateDecision {
        let response =
            client.post(config.decision_url()).json(&json!({ "input": input })).send();
        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                return deny(format!("policy engine returned status {}", response.status()));
            }
            Err(err) => return deny(format!("policy engine unreachable: {err}")),
        };
        let envelope: PolicyResponse = match response.json() {
            Ok(envelope) => envelope,
            Err(err) => return deny(format!("policy engine response malformed: {err}")),
        };
        let Some(result) = envelope.result else {
            return deny("policy decision undefined".to_string());
        };
        GateDecision {
            allow: result.allow,
            reason: result.reason.unwrap_or_else(|| "no reason provided".to_string()),
        }
    }
}

impl ApprovalGate for PolicyGateClient {
    fn evaluate(&self, input: &GateInput) -> Result<GateDecision, GateError> {
        match &self.backend {
            GateBackend::Disabled => Ok(GateDecision {
                allow: true,
                reason: "policy gate disabled in configuration".to_string(),
            }),
            GateBackend::Remote {
                client,
                config,
            } => Ok(Self::evaluate_remote(client, config, input)),
        }
    }
}

/// Builds a fail-closed denial with the given reason.
fn deny(reason: String) -> GateDecision {
    GateDecision {
        allow: false,
        reason,
    }
}
