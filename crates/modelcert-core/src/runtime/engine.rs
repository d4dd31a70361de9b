// modelcert-core/src/runtime/engine.rs
// ============================================================================
// Module: Modelcert Certification Engine
// Description: Durable certification orchestration over injected backends.
// Purpose: Execute testing, approval wait, and finalization with idempotency.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The certification engine is the single canonical execution path for a
//! certification run and the sole authority for status transitions. All
//! state lives in the injected [`CertificationStore`], so a run survives
//! process restarts: hosts re-deliver `start` to resume testing, deliver
//! approval signals through `submit_approval`, and drive the approval
//! deadline with periodic `poll` calls carrying the current time. The
//! engine itself never reads the wall clock.
//!
//! # Invariants
//!
//! - Suites already recorded for a run are never re-executed on resume.
//! - The terminal status is derived exactly once, in `finalize`.
//! - A configured approval gate can only downgrade an outcome to rejected,
//!   never upgrade one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::config::FeatureFlags;
use crate::core::evidence::ArtifactMetadata;
use crate::core::evidence::ArtifactType;
use crate::core::evidence::RetentionTag;
use crate::core::hashing::HashError;
use crate::core::hashing::canonical_json_bytes;
use crate::core::identifiers::ApprovalId;
use crate::core::identifiers::ArtifactId;
use crate::core::identifiers::CertificationId;
use crate::core::identifiers::EvalRunId;
use crate::core::identifiers::UseCaseId;
use crate::core::risk::RiskTier;
use crate::core::risk::TestSuite;
use crate::core::state::ApprovalDecision;
use crate::core::state::ApprovalRecord;
use crate::core::state::ApprovalSignal;
use crate::core::state::CertificationConfig;
use crate::core::state::CertificationOutcome;
use crate::core::state::CertificationPhase;
use crate::core::state::CertificationRun;
use crate::core::state::CertificationStatus;
use crate::core::state::EvalRunRecord;
use crate::core::state::EvalRunStatus;
use crate::core::time::Timestamp;
use crate::interfaces::ApprovalGate;
use crate::interfaces::ApprovalNotifier;
use crate::interfaces::ArtifactStore;
use crate::interfaces::CertificationStore;
use crate::interfaces::EvidenceObjectStore;
use crate::interfaces::GateInput;
use crate::interfaces::StoreError;
use crate::interfaces::SuiteContext;
use crate::interfaces::SuiteError;
use crate::interfaces::SuiteRunner;
use crate::runtime::ledger::EvidenceLedger;
use crate::runtime::ledger::LedgerError;
use crate::runtime::retry::RetryPolicy;
use crate::runtime::retry::Sleeper;

// ============================================================================
// SECTION: Engine Configuration
// ============================================================================

/// Feature flag enabling a write-once lock on generated certification packs.
pub const FLAG_WORM_LOCK_PACKS: &str = "worm_lock_packs";

/// Configuration for the certification engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Retry policy applied to each suite execution.
    pub retry: RetryPolicy,
    /// Principal recorded as the creator of generated evidence.
    pub created_by: String,
    /// Instance-scoped feature flags.
    pub flags: FeatureFlags,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            created_by: "system".to_string(),
            flags: FeatureFlags::new(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Certification engine errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Run state store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Evidence ledger failure during finalization.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// Certification pack serialization failure.
    #[error(transparent)]
    Canonicalization(#[from] HashError),
    /// A run with this identifier already exists past the testing phase.
    #[error("certification run already started: {0}")]
    AlreadyStarted(String),
    /// No run exists for the identifier.
    #[error("certification run not found: {0}")]
    NotFound(String),
    /// The operation is not valid in the run's current phase.
    #[error("certification run {id} is not awaiting approval")]
    NotAwaitingApproval {
        /// Run identifier.
        id: String,
    },
    /// The run was cancelled and accepts no further operations.
    #[error("certification run cancelled: {0}")]
    Cancelled(String),
    /// A suite reported a fatal configuration problem; the run is aborted.
    #[error("fatal suite failure for {suite}: {message}")]
    FatalSuite {
        /// Suite that failed.
        suite: String,
        /// Failure detail from the runner.
        message: String,
    },
}

// ============================================================================
// SECTION: Certification Pack Document
// ============================================================================

/// Canonical JSON document stored as the certification pack artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PackDocument {
    /// Certification run identifier.
    certification_id: CertificationId,
    /// Use case under certification.
    use_case_id: UseCaseId,
    /// Risk tier of the run.
    risk_tier: RiskTier,
    /// Derived terminal status.
    status: CertificationStatus,
    /// All recorded suite executions.
    eval_runs: Vec<EvalRunRecord>,
    /// All recorded approval signals.
    approvals: Vec<ApprovalRecord>,
    /// Total findings across all suite runs.
    finding_count: u32,
    /// Whether the approval wait resolved by deadline.
    resolved_by_timeout: bool,
    /// Pack generation timestamp.
    generated_at: Timestamp,
}

// ============================================================================
// SECTION: Certification Engine
// ============================================================================

/// Durable certification engine over injected backend implementations.
pub struct CertificationEngine<R, N, S, A: ArtifactStore, O: EvidenceObjectStore, G, Sl> {
    /// Suite runner executing evaluation suites.
    runner: R,
    /// Stakeholder notifier; all calls are best-effort.
    notifier: N,
    /// Run state store.
    store: S,
    /// Evidence ledger receiving the certification pack.
    ledger: EvidenceLedger<A, O>,
    /// Optional external approval gate.
    gate: Option<G>,
    /// Sleeper applied between retry attempts.
    sleeper: Sl,
    /// Engine configuration.
    config: EngineConfig,
}

impl<R, N, S, A, O, G, Sl> CertificationEngine<R, N, S, A, O, G, Sl>
where
    R: SuiteRunner,
    N: ApprovalNotifier,
    S: CertificationStore,
    A: ArtifactStore,
    O: EvidenceObjectStore,
    G: ApprovalGate,
    Sl: Sleeper,
{
    /// Creates a new certification engine.
    pub const fn new(
        runner: R,
        notifier: N,
        store: S,
        ledger: EvidenceLedger<A, O>,
        gate: Option<G>,
        sleeper: Sl,
        config: EngineConfig,
    ) -> Self {
        Self {
            runner,
            notifier,
            store,
            ledger,
            gate,
            sleeper,
            config,
        }
    }

    /// Starts or resumes a certification run through its testing phase.
    ///
    /// Every required suite executes under the retry policy; suites already
    /// recorded from an earlier interrupted attempt are skipped. On success
    /// the run enters the approval wait with a tier-dependent deadline and
    /// approvers are notified best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AlreadyStarted`] when the run exists past
    /// testing, [`EngineError::FatalSuite`] when a suite reports a
    /// configuration problem, and store errors as [`EngineError::Store`].
    pub fn start(
        &self,
        config: CertificationConfig,
        now: Timestamp,
    ) -> Result<CertificationRun, EngineError> {
        let mut run = match self.store.load(&config.certification_id)? {
            None => CertificationRun::new(config, now),
            Some(existing) if existing.phase == CertificationPhase::Testing => existing,
            Some(existing) => {
                return Err(EngineError::AlreadyStarted(
                    existing.config.certification_id.to_string(),
                ));
            }
        };
        self.store.save(&run)?;

        for suite in run.config.required_test_suites.clone() {
            if run.suite_record(suite).is_some() {
                continue;
            }
            let record = self.execute_suite(&run, suite)?;
            run.eval_runs.push(record);
            self.store.save(&run)?;
        }

        run.phase = CertificationPhase::AwaitingApproval;
        run.approval_deadline =
            Some(now.plus_days(run.config.risk_tier.approval_timeout_days()));
        self.store.save(&run)?;

        // Best effort; notification failures never block the workflow.
        drop(self.notifier.notify_approval_required(&run));
        Ok(run)
    }

    /// Records an inbound approval signal.
    ///
    /// Signals append to the run's log; when the wait resolves, the most
    /// recent signal determines the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] for unknown runs,
    /// [`EngineError::NotAwaitingApproval`] outside the approval phase, and
    /// store errors as [`EngineError::Store`].
    pub fn submit_approval(
        &self,
        certification_id: &CertificationId,
        signal: ApprovalSignal,
        now: Timestamp,
    ) -> Result<CertificationRun, EngineError> {
        let mut run = self.load_run(certification_id)?;
        if run.phase != CertificationPhase::AwaitingApproval {
            return Err(EngineError::NotAwaitingApproval {
                id: certification_id.to_string(),
            });
        }
        let approval_id =
            ApprovalId::new(format!("{certification_id}-approval-{}", run.approvals.len() + 1));
        run.approvals.push(ApprovalRecord {
            approval_id,
            signal,
            received_at: now,
        });
        self.store.save(&run)?;
        Ok(run)
    }

    /// Advances a run awaiting approval, resolving the wait when a signal
    /// has arrived or the deadline has passed.
    ///
    /// Returns `Ok(None)` while the wait is unresolved. Polling a completed
    /// run returns its outcome again, so hosts may poll idempotently.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] for unknown runs,
    /// [`EngineError::Cancelled`] for cancelled runs, and finalization
    /// failures from the ledger or store.
    pub fn poll(
        &self,
        certification_id: &CertificationId,
        now: Timestamp,
    ) -> Result<Option<CertificationOutcome>, EngineError> {
        let run = self.load_run(certification_id)?;
        match run.phase {
            CertificationPhase::Testing => Ok(None),
            CertificationPhase::Completed => Ok(Some(outcome_of(&run))),
            CertificationPhase::Cancelled => {
                Err(EngineError::Cancelled(certification_id.to_string()))
            }
            CertificationPhase::AwaitingApproval => {
                let deadline_passed =
                    run.approval_deadline.is_some_and(|deadline| now >= deadline);
                if run.approvals.is_empty() && !deadline_passed {
                    return Ok(None);
                }
                self.finalize(run, now).map(Some)
            }
        }
    }

    /// Cancels a run before finalization.
    ///
    /// No evidence pack is generated for a cancelled run; its status stays
    /// `pending`. Cancelling an already cancelled run is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] for unknown runs,
    /// [`EngineError::AlreadyStarted`] when the run already completed, and
    /// store errors as [`EngineError::Store`].
    pub fn cancel(
        &self,
        certification_id: &CertificationId,
        now: Timestamp,
    ) -> Result<CertificationRun, EngineError> {
        let mut run = self.load_run(certification_id)?;
        match run.phase {
            CertificationPhase::Cancelled => Ok(run),
            CertificationPhase::Completed => {
                Err(EngineError::AlreadyStarted(certification_id.to_string()))
            }
            CertificationPhase::Testing | CertificationPhase::AwaitingApproval => {
                run.phase = CertificationPhase::Cancelled;
                run.completed_at = Some(now);
                self.store.save(&run)?;
                Ok(run)
            }
        }
    }

    /// Returns the current persisted state of a run.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] for unknown runs and store errors
    /// as [`EngineError::Store`].
    pub fn status(
        &self,
        certification_id: &CertificationId,
    ) -> Result<CertificationRun, EngineError> {
        self.load_run(certification_id)
    }

    /// Loads a run or reports it missing.
    fn load_run(
        &self,
        certification_id: &CertificationId,
    ) -> Result<CertificationRun, EngineError> {
        self.store
            .load(certification_id)?
            .ok_or_else(|| EngineError::NotFound(certification_id.to_string()))
    }

    /// Executes one suite under the retry policy.
    ///
    /// Exhausted retries become a failed run record carrying one finding;
    /// only a fatal configuration error aborts the whole run.
    fn execute_suite(
        &self,
        run: &CertificationRun,
        suite: TestSuite,
    ) -> Result<EvalRunRecord, EngineError> {
        let eval_run_id =
            EvalRunId::new(format!("{}-{}", run.config.certification_id, suite.as_str()));
        let mut attempt = 1u32;
        loop {
            let ctx = SuiteContext {
                certification_id: run.config.certification_id.clone(),
                use_case_id: run.config.use_case_id.clone(),
                risk_tier: run.config.risk_tier,
                eval_run_id: eval_run_id.clone(),
                attempt,
            };
            match self.runner.run_suite(suite, &ctx) {
                Ok(outcome) => {
                    return Ok(EvalRunRecord {
                        eval_run_id,
                        suite,
                        status: EvalRunStatus::Completed,
                        total_tests: outcome.total_tests,
                        passed: outcome.passed,
                        failed: outcome.failed,
                        findings: outcome.findings(),
                        pass_rate: outcome.pass_rate,
                        attempts: attempt,
                    });
                }
                Err(SuiteError::Fatal(message)) => {
                    return Err(EngineError::FatalSuite {
                        suite: suite.as_str().to_string(),
                        message,
                    });
                }
                Err(SuiteError::Retryable(_)) if attempt < self.config.retry.max_attempts => {
                    self.sleeper.sleep_millis(self.config.retry.delay_after_attempt(attempt));
                    attempt += 1;
                }
                Err(SuiteError::Retryable(_)) => {
                    return Ok(EvalRunRecord {
                        eval_run_id,
                        suite,
                        status: EvalRunStatus::Failed,
                        total_tests: 0,
                        passed: 0,
                        failed: 0,
                        findings: 1,
                        pass_rate: 0.0,
                        attempts: attempt,
                    });
                }
            }
        }
    }

    /// Derives the terminal status, generates the certification pack, and
    /// completes the run.
    fn finalize(
        &self,
        mut run: CertificationRun,
        now: Timestamp,
    ) -> Result<CertificationOutcome, EngineError> {
        run.resolved_by_timeout = run.approvals.is_empty();
        let mut status = derive_status(&run);

        if let Some(gate) = &self.gate
            && status != CertificationStatus::Rejected
        {
            let input = GateInput {
                risk_tier: run.config.risk_tier,
                test_pass_rate: aggregate_pass_rate(&run),
                open_critical_findings: run.total_findings(),
                required_mitigations_completed: run.total_findings() == 0,
            };
            let allowed = gate.evaluate(&input).is_ok_and(|decision| decision.allow);
            if !allowed {
                status = CertificationStatus::Rejected;
            }
        }

        let pack = PackDocument {
            certification_id: run.config.certification_id.clone(),
            use_case_id: run.config.use_case_id.clone(),
            risk_tier: run.config.risk_tier,
            status,
            eval_runs: run.eval_runs.clone(),
            approvals: run.approvals.clone(),
            finding_count: run.total_findings(),
            resolved_by_timeout: run.resolved_by_timeout,
            generated_at: now,
        };
        let content = canonical_json_bytes(&pack)?;
        let pack_id = ArtifactId::new(format!("{}-pack", run.config.certification_id));
        let metadata = ArtifactMetadata {
            artifact_id: pack_id.clone(),
            use_case_id: Some(run.config.use_case_id.clone()),
            artifact_type: ArtifactType::CertificationPack,
            name: format!("certification pack {}", run.config.certification_id),
            content_type: "application/json".to_string(),
            retention: RetentionTag::Regulatory,
            eval_run_id: None,
            approval_id: None,
            created_by: self.config.created_by.clone(),
            created_at: now,
        };
        let artifact = self.ledger.append(&content, metadata)?;
        if self.config.flags.is_enabled(FLAG_WORM_LOCK_PACKS) {
            self.ledger.lock_artifact(&artifact)?;
        }

        run.status = status;
        run.phase = CertificationPhase::Completed;
        run.evidence_pack_id = Some(pack_id);
        run.completed_at = Some(now);
        self.store.save(&run)?;

        // Best effort; notification failures never block the workflow.
        drop(self.notifier.notify_completed(&run, status));
        Ok(outcome_of(&run))
    }
}

// ============================================================================
// SECTION: Status Derivation
// ============================================================================

/// Derives the terminal status from the latest signal and findings count.
///
/// With no signal at all, the findings count alone decides between
/// conditional and rejected.
fn derive_status(run: &CertificationRun) -> CertificationStatus {
    let findings = run.total_findings();
    match run.latest_approval().map(|record| record.signal.decision) {
        Some(ApprovalDecision::Approved) if findings == 0 => CertificationStatus::Approved,
        Some(ApprovalDecision::Approved | ApprovalDecision::Conditional) => {
            CertificationStatus::Conditional
        }
        Some(ApprovalDecision::Rejected) => CertificationStatus::Rejected,
        None if findings <= 3 => CertificationStatus::Conditional,
        None => CertificationStatus::Rejected,
    }
}

/// Returns the aggregate pass rate across completed suite runs.
fn aggregate_pass_rate(run: &CertificationRun) -> f64 {
    let total: u32 = run.eval_runs.iter().map(|record| record.total_tests).sum();
    if total == 0 {
        return 1.0;
    }
    let passed: u32 = run.eval_runs.iter().map(|record| record.passed).sum();
    f64::from(passed) / f64::from(total)
}

/// Builds the host-facing outcome from a completed run.
fn outcome_of(run: &CertificationRun) -> CertificationOutcome {
    CertificationOutcome {
        use_case_id: run.config.use_case_id.clone(),
        status: run.status,
        evidence_pack_id: run.evidence_pack_id.clone(),
        eval_run_ids: run.eval_runs.iter().map(|record| record.eval_run_id.clone()).collect(),
        finding_count: run.total_findings(),
        approval_ids: run.approvals.iter().map(|record| record.approval_id.clone()).collect(),
        monitoring_plan_id: None,
    }
}
