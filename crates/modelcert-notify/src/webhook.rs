// modelcert-notify/src/webhook.rs
// ============================================================================
// Module: Webhook Notifier
// Description: Notifier posting JSON messages to an HTTP webhook.
// Purpose: Deliver notifications to external stakeholder systems.
// Dependencies: modelcert-core, reqwest, url
// ============================================================================

//! ## Overview
//! [`WebhookNotifier`] posts each notification message to a configured
//! endpoint with a bounded timeout. Any transport failure or non-success
//! status is a delivery failure; the engine treats those as best-effort
//! losses.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use modelcert_core::ApprovalNotifier;
use modelcert_core::CertificationRun;
use modelcert_core::CertificationStatus;
use modelcert_core::NotifyError;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use url::Url;

use crate::message::NotificationMessage;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the webhook notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// Webhook endpoint URL.
    pub endpoint: Url,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl WebhookConfig {
    /// Creates a configuration with the default timeout and user agent.
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout_ms: 10_000,
            user_agent: "modelcert/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Webhook Notifier
// ============================================================================

/// Webhook-based notification sink.
pub struct WebhookNotifier {
    /// Notifier configuration.
    config: WebhookConfig,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl WebhookNotifier {
    /// Creates a webhook notifier.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the HTTP client cannot be created.
    pub fn new(config: WebhookConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|_| NotifyError::Delivery("http client build failed".to_string()))?;
        Ok(Self {
            config,
            client,
        })
    }

    /// Posts one message to the endpoint.
    fn post(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.config.endpoint.clone())
            .json(message)
            .send()
            .map_err(|err| NotifyError::Delivery(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Delivery(format!("webhook returned status {status}")));
        }
        Ok(())
    }
}

impl ApprovalNotifier for WebhookNotifier {
    fn notify_approval_required(&self, run: &CertificationRun) -> Result<(), NotifyError> {
        self.post(&NotificationMessage::approval_required(run))
    }

    fn notify_completed(
        &self,
        run: &CertificationRun,
        status: CertificationStatus,
    ) -> Result<(), NotifyError> {
        self.post(&NotificationMessage::completed(run, status))
    }
}
