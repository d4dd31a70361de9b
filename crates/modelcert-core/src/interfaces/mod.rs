// modelcert-core/src/interfaces/mod.rs
// ============================================================================
// Module: Modelcert Interfaces
// Description: Backend-agnostic interfaces for suites, storage, and approvals.
// Purpose: Define the contract surfaces used by the certification runtime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Modelcert integrates with external systems without
//! embedding backend-specific details. Implementations must be deterministic
//! where the contract demands it and fail closed on missing or invalid data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::evidence::EvidenceArtifact;
use crate::core::identifiers::CertificationId;
use crate::core::identifiers::EvalRunId;
use crate::core::identifiers::UseCaseId;
use crate::core::risk::RiskTier;
use crate::core::risk::TestSuite;
use crate::core::state::CertificationRun;
use crate::core::state::CertificationStatus;

// ============================================================================
// SECTION: Suite Runner
// ============================================================================

/// Context provided to suite runners for one execution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteContext {
    /// Certification run identifier.
    pub certification_id: CertificationId,
    /// Use case under certification.
    pub use_case_id: UseCaseId,
    /// Risk tier of the run.
    pub risk_tier: RiskTier,
    /// Evaluation run identifier assigned to this execution.
    pub eval_run_id: EvalRunId,
    /// Attempt number, starting at 1.
    pub attempt: u32,
}

/// Result reported by a completed suite execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteOutcome {
    /// Total tests executed.
    pub total_tests: u32,
    /// Tests that passed.
    pub passed: u32,
    /// Tests that failed.
    pub failed: u32,
    /// Fraction of tests that passed, in [0,1].
    pub pass_rate: f64,
}

impl SuiteOutcome {
    /// Returns the findings attributable to this outcome.
    ///
    /// Findings are the failed-test count, never negative.
    #[must_use]
    pub const fn findings(&self) -> u32 {
        self.total_tests.saturating_sub(self.passed)
    }
}

/// Suite runner errors.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// Transient failure; the engine may retry per its policy.
    #[error("suite execution failed: {0}")]
    Retryable(String),
    /// Configuration problem; aborts the whole certification run.
    #[error("suite configuration invalid: {0}")]
    Fatal(String),
}

/// Executes evaluation test suites against a use case.
pub trait SuiteRunner {
    /// Runs one suite and reports its results.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Retryable`] for transient failures and
    /// [`SuiteError::Fatal`] for configuration problems that must abort the
    /// run.
    fn run_suite(&self, suite: TestSuite, ctx: &SuiteContext) -> Result<SuiteOutcome, SuiteError>;
}

// ============================================================================
// SECTION: Approval Notifier
// ============================================================================

/// Notification errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Notification delivery failed.
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Delivers approval requests and completion notices to stakeholders.
///
/// Delivery is best-effort from the engine's perspective; failures are
/// reported but never block the workflow.
pub trait ApprovalNotifier {
    /// Notifies approvers that a run awaits their decision.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when delivery fails.
    fn notify_approval_required(&self, run: &CertificationRun) -> Result<(), NotifyError>;

    /// Notifies stakeholders of the terminal status.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when delivery fails.
    fn notify_completed(
        &self,
        run: &CertificationRun,
        status: CertificationStatus,
    ) -> Result<(), NotifyError>;
}

// ============================================================================
// SECTION: Certification Store
// ============================================================================

/// Certification store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("certification store io error: {0}")]
    Io(String),
    /// Store data is invalid.
    #[error("certification store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("certification store error: {0}")]
    Store(String),
}

/// Persists certification run state across process restarts.
pub trait CertificationStore {
    /// Loads a run by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load(
        &self,
        certification_id: &CertificationId,
    ) -> Result<Option<CertificationRun>, StoreError>;

    /// Saves run state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when saving fails.
    fn save(&self, run: &CertificationRun) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Artifact Store
// ============================================================================

/// Artifact metadata store errors.
#[derive(Debug, Error)]
pub enum ArtifactStoreError {
    /// Store I/O error.
    #[error("artifact store io error: {0}")]
    Io(String),
    /// An artifact with the same identifier already exists.
    #[error("artifact already exists: {0}")]
    Conflict(String),
    /// Store reported an error.
    #[error("artifact store error: {0}")]
    Store(String),
}

/// Persists evidence artifact metadata records.
pub trait ArtifactStore {
    /// Inserts a new artifact record.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactStoreError::Conflict`] when the identifier is taken
    /// and [`ArtifactStoreError`] for other store failures.
    fn insert(&self, artifact: &EvidenceArtifact) -> Result<(), ArtifactStoreError>;

    /// Returns the newest artifact in a use case's chain, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactStoreError`] when the lookup fails.
    fn latest_for_use_case(
        &self,
        use_case_id: Option<&UseCaseId>,
    ) -> Result<Option<EvidenceArtifact>, ArtifactStoreError>;

    /// Updates an existing artifact record in place.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactStoreError`] when the update fails.
    fn update(&self, artifact: &EvidenceArtifact) -> Result<(), ArtifactStoreError>;
}

// ============================================================================
// SECTION: Evidence Object Store
// ============================================================================

/// Object store errors.
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// Upload failed.
    #[error("object store upload failed: {0}")]
    Upload(String),
}

/// Writes artifact payload bytes to content-addressed object storage.
pub trait EvidenceObjectStore {
    /// Uploads payload bytes under a deterministic key.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError`] when the upload fails.
    fn put(&self, bucket: &str, key: &str, content: &[u8]) -> Result<(), ObjectStoreError>;
}

// ============================================================================
// SECTION: Approval Gate
// ============================================================================

/// Inputs to an external approval-gate evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateInput {
    /// Risk tier of the run.
    pub risk_tier: RiskTier,
    /// Aggregate test pass rate, in [0,1].
    pub test_pass_rate: f64,
    /// Count of open critical findings.
    pub open_critical_findings: u32,
    /// Whether required mitigations are completed.
    pub required_mitigations_completed: bool,
}

/// External gate determination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    /// Whether the gate permits certification.
    pub allow: bool,
    /// Human-readable reason for the determination.
    pub reason: String,
}

/// Approval gate errors.
#[derive(Debug, Error)]
pub enum GateError {
    /// Gate evaluation failed; callers must treat this as a deny.
    #[error("approval gate evaluation failed: {0}")]
    Unavailable(String),
}

/// External policy gate consulted during finalization.
///
/// Fail-closed: an unreachable gate is a deny, never an allow.
pub trait ApprovalGate {
    /// Evaluates the gate for a finalizing run.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] when evaluation fails; the engine treats the
    /// error as a deny.
    fn evaluate(&self, input: &GateInput) -> Result<GateDecision, GateError>;
}
