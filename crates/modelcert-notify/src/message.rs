// modelcert-notify/src/message.rs
// ============================================================================
// Module: Notification Messages
// Description: Stable message payloads for stakeholder notifications.
// Purpose: Provide one message shape shared by every notifier sink.
// Dependencies: modelcert-core, serde
// ============================================================================

//! ## Overview
//! Every notifier sink serializes the same [`NotificationMessage`] shape,
//! built from the certification run at the moment of delivery. Messages are
//! snapshots; they never hold references into live run state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use modelcert_core::ApproverRole;
use modelcert_core::CertificationId;
use modelcert_core::CertificationRun;
use modelcert_core::CertificationStatus;
use modelcert_core::RiskTier;
use modelcert_core::Timestamp;
use modelcert_core::UseCaseId;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Notification Message
// ============================================================================

/// Kind of stakeholder notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A run awaits approver decisions.
    ApprovalRequired,
    /// A run reached its terminal status.
    CertificationCompleted,
}

/// Stakeholder notification payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Notification kind.
    pub kind: NotificationKind,
    /// Certification run concerned.
    pub certification_id: CertificationId,
    /// Use case under certification.
    pub use_case_id: UseCaseId,
    /// Risk tier of the run.
    pub risk_tier: RiskTier,
    /// Business owner of the use case.
    pub owner: String,
    /// Approver roles expected to decide; present for approval requests.
    pub required_approvals: Vec<ApproverRole>,
    /// Deadline of the approval wait; present for approval requests.
    pub approval_deadline: Option<Timestamp>,
    /// Terminal status; present for completion notices.
    pub status: Option<CertificationStatus>,
    /// Total findings at the time of the notification.
    pub finding_count: u32,
}

impl NotificationMessage {
    /// Builds an approval-required message from a run entering the wait.
    #[must_use]
    pub fn approval_required(run: &CertificationRun) -> Self {
        Self {
            kind: NotificationKind::ApprovalRequired,
            certification_id: run.config.certification_id.clone(),
            use_case_id: run.config.use_case_id.clone(),
            risk_tier: run.config.risk_tier,
            owner: run.config.owner.clone(),
            required_approvals: run.config.required_approvals.clone(),
            approval_deadline: run.approval_deadline,
            status: None,
            finding_count: run.total_findings(),
        }
    }

    /// Builds a completion message carrying the terminal status.
    #[must_use]
    pub fn completed(run: &CertificationRun, status: CertificationStatus) -> Self {
        Self {
            kind: NotificationKind::CertificationCompleted,
            certification_id: run.config.certification_id.clone(),
            use_case_id: run.config.use_case_id.clone(),
            risk_tier: run.config.risk_tier,
            owner: run.config.owner.clone(),
            required_approvals: Vec::new(),
            approval_deadline: None,
            status: Some(status),
            finding_count: run.total_findings(),
        }
    }
}
