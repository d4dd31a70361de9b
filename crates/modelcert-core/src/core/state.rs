// modelcert-core/src/core/state.rs
// ============================================================================
// Module: Modelcert Certification State
// Description: Durable state for one certification workflow instance.
// Purpose: Persist workflow progress so runs survive process restarts.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! A [`CertificationRun`] is the persisted state of one durable certification
//! attempt. It carries the immutable launch configuration, append-only logs
//! of evaluation runs and approval signals, the current phase, and the
//! terminal status. The engine is the sole writer; hosts interact only
//! through engine operations.
//!
//! # Invariants
//!
//! - The terminal status is set exactly once; prior to that it is `pending`.
//! - Evaluation and approval logs are append-only.
//! - No signals are accepted after the run reaches a terminal phase.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ApprovalId;
use crate::core::identifiers::ArtifactId;
use crate::core::identifiers::CertificationId;
use crate::core::identifiers::EvalRunId;
use crate::core::identifiers::UseCaseId;
use crate::core::risk::ApproverRole;
use crate::core::risk::RiskTier;
use crate::core::risk::TestSuite;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Launch Configuration
// ============================================================================

/// Immutable inputs supplied when a certification run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationConfig {
    /// Certification run identifier.
    pub certification_id: CertificationId,
    /// Use case under certification.
    pub use_case_id: UseCaseId,
    /// Risk tier copied from the assessment at start.
    pub risk_tier: RiskTier,
    /// Test suites that must execute, copied from the assessment.
    pub required_test_suites: Vec<TestSuite>,
    /// Approver roles that must be notified.
    pub required_approvals: Vec<ApproverRole>,
    /// Business owner of the use case.
    pub owner: String,
    /// Principal that started the run.
    pub initiated_by: String,
}

// ============================================================================
// SECTION: Phase and Status
// ============================================================================

/// Workflow phase of a certification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationPhase {
    /// Executing required test suites.
    Testing,
    /// Suspended awaiting an approval signal or the deadline.
    AwaitingApproval,
    /// Terminal; the final status has been derived.
    Completed,
    /// Terminal; the run was cancelled before finalizing.
    Cancelled,
}

impl CertificationPhase {
    /// Returns whether the phase is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Final business status of a certification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationStatus {
    /// Certified without conditions.
    Approved,
    /// Certified with conditions attached.
    Conditional,
    /// Certification denied.
    Rejected,
    /// Not yet resolved.
    Pending,
}

// ============================================================================
// SECTION: Approval Signals
// ============================================================================

/// Decision carried by an approval signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// Approve without conditions.
    Approved,
    /// Approve with conditions.
    Conditional,
    /// Reject.
    Rejected,
}

/// Inbound approval signal delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalSignal {
    /// Approver's decision.
    pub decision: ApprovalDecision,
    /// Identity of the approver.
    pub approver: String,
    /// Free-form rationale.
    pub rationale: String,
    /// Conditions attached to a conditional approval.
    pub conditions: Vec<String>,
}

/// Recorded approval signal with its assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    /// Approval record identifier.
    pub approval_id: ApprovalId,
    /// The signal as delivered.
    pub signal: ApprovalSignal,
    /// When the engine recorded the signal.
    pub received_at: Timestamp,
}

// ============================================================================
// SECTION: Evaluation Records
// ============================================================================

/// Execution status of one suite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalRunStatus {
    /// The suite executed and reported results.
    Completed,
    /// The suite exhausted its retries without completing.
    Failed,
}

/// Persisted result of one test suite execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalRunRecord {
    /// Evaluation run identifier.
    pub eval_run_id: EvalRunId,
    /// Suite that was executed.
    pub suite: TestSuite,
    /// Execution status.
    pub status: EvalRunStatus,
    /// Total tests executed.
    pub total_tests: u32,
    /// Tests that passed.
    pub passed: u32,
    /// Tests that failed.
    pub failed: u32,
    /// Findings attributed to this run.
    pub findings: u32,
    /// Fraction of tests that passed, in [0,1].
    pub pass_rate: f64,
    /// Attempts consumed, including the successful one.
    pub attempts: u32,
}

// ============================================================================
// SECTION: Certification Run
// ============================================================================

/// Persisted state of one durable certification workflow instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationRun {
    /// Immutable launch configuration.
    pub config: CertificationConfig,
    /// Current workflow phase.
    pub phase: CertificationPhase,
    /// Terminal status; `pending` until the run completes.
    pub status: CertificationStatus,
    /// When the run started.
    pub started_at: Timestamp,
    /// Deadline for the approval wait; set on entering the approval phase.
    pub approval_deadline: Option<Timestamp>,
    /// Append-only log of suite executions.
    pub eval_runs: Vec<EvalRunRecord>,
    /// Append-only log of received approval signals.
    pub approvals: Vec<ApprovalRecord>,
    /// True when the approval wait resolved by deadline rather than signal.
    pub resolved_by_timeout: bool,
    /// Certification pack artifact, once finalized.
    pub evidence_pack_id: Option<ArtifactId>,
    /// When the run reached a terminal phase.
    pub completed_at: Option<Timestamp>,
}

impl CertificationRun {
    /// Creates a fresh run in the testing phase.
    #[must_use]
    pub const fn new(config: CertificationConfig, started_at: Timestamp) -> Self {
        Self {
            config,
            phase: CertificationPhase::Testing,
            status: CertificationStatus::Pending,
            started_at,
            approval_deadline: None,
            eval_runs: Vec::new(),
            approvals: Vec::new(),
            resolved_by_timeout: false,
            evidence_pack_id: None,
            completed_at: None,
        }
    }

    /// Returns the sum of findings across all recorded suite runs.
    #[must_use]
    pub fn total_findings(&self) -> u32 {
        self.eval_runs.iter().map(|run| run.findings).sum()
    }

    /// Returns the most recently received approval signal, if any.
    #[must_use]
    pub fn latest_approval(&self) -> Option<&ApprovalRecord> {
        self.approvals.last()
    }

    /// Returns the recorded result for a suite, if it already ran.
    #[must_use]
    pub fn suite_record(&self, suite: TestSuite) -> Option<&EvalRunRecord> {
        self.eval_runs.iter().find(|run| run.suite == suite)
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Terminal result returned to the host when a run completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationOutcome {
    /// Use case that was certified.
    pub use_case_id: UseCaseId,
    /// Final business status.
    pub status: CertificationStatus,
    /// Certification pack artifact, absent for cancelled runs.
    pub evidence_pack_id: Option<ArtifactId>,
    /// Identifiers of all recorded suite runs.
    pub eval_run_ids: Vec<EvalRunId>,
    /// Total findings across all suite runs.
    pub finding_count: u32,
    /// Identifiers of all recorded approval signals.
    pub approval_ids: Vec<ApprovalId>,
    /// Monitoring plan artifact; reserved, not produced by this pipeline.
    pub monitoring_plan_id: Option<ArtifactId>,
}
