// modelcert-core/tests/engine.rs
// ============================================================================
// Module: Certification Engine Tests
// Description: Workflow tests for the durable certification engine.
// ============================================================================
//! ## Overview
//! Drives the engine with scripted suite runners, in-memory stores, and stub
//! gates: phase transitions, retries, resume, approval resolution, deadline
//! timeouts, gate overrides, and cancellation.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use modelcert_core::ApprovalDecision;
use modelcert_core::ApprovalGate;
use modelcert_core::ApprovalNotifier;
use modelcert_core::ApprovalSignal;
use modelcert_core::CertificationConfig;
use modelcert_core::CertificationEngine;
use modelcert_core::CertificationId;
use modelcert_core::CertificationPhase;
use modelcert_core::CertificationRun;
use modelcert_core::CertificationStatus;
use modelcert_core::EngineConfig;
use modelcert_core::EngineError;
use modelcert_core::EvalRunStatus;
use modelcert_core::EvidenceLedger;
use modelcert_core::FLAG_WORM_LOCK_PACKS;
use modelcert_core::GateDecision;
use modelcert_core::GateError;
use modelcert_core::GateInput;
use modelcert_core::InMemoryArtifactStore;
use modelcert_core::InMemoryCertificationStore;
use modelcert_core::InMemoryObjectStore;
use modelcert_core::NoSleep;
use modelcert_core::NotifyError;
use modelcert_core::RiskTier;
use modelcert_core::SuiteContext;
use modelcert_core::SuiteError;
use modelcert_core::SuiteOutcome;
use modelcert_core::SuiteRunner;
use modelcert_core::TestSuite;
use modelcert_core::Timestamp;
use modelcert_core::UseCaseId;

/// Fixed workflow start timestamp.
const T0: Timestamp = Timestamp::from_unix_millis(1_700_000_000_000);

// ============================================================================
// SECTION: Scripted Backends
// ============================================================================

/// Scripted behavior for one suite.
enum SuiteScript {
    /// Complete with the given counts.
    Pass {
        /// Total tests reported.
        total: u32,
        /// Passing tests reported.
        passed: u32,
    },
    /// Fail transiently this many times, then complete cleanly.
    FlakyThenPass {
        /// Remaining transient failures.
        failures: u32,
    },
    /// Fail transiently on every attempt.
    AlwaysRetryable,
    /// Report a fatal configuration problem.
    Fatal,
}

/// Suite runner driven by per-suite scripts; unscripted suites pass cleanly.
#[derive(Clone, Default)]
struct ScriptedRunner {
    /// Script per suite.
    scripts: Arc<Mutex<BTreeMap<TestSuite, SuiteScript>>>,
    /// Log of (suite, attempt) invocations.
    calls: Arc<Mutex<Vec<(TestSuite, u32)>>>,
}

impl ScriptedRunner {
    /// Installs or replaces the script for a suite.
    fn script(&self, suite: TestSuite, script: SuiteScript) {
        self.scripts.lock().unwrap().insert(suite, script);
    }

    /// Returns how often a suite was invoked.
    fn call_count(&self, suite: TestSuite) -> usize {
        self.calls.lock().unwrap().iter().filter(|(called, _)| *called == suite).count()
    }
}

/// Builds a suite outcome from raw counts.
fn outcome(total: u32, passed: u32) -> SuiteOutcome {
    SuiteOutcome {
        total_tests: total,
        passed,
        failed: total - passed,
        pass_rate: if total == 0 { 1.0 } else { f64::from(passed) / f64::from(total) },
    }
}

impl SuiteRunner for ScriptedRunner {
    fn run_suite(&self, suite: TestSuite, ctx: &SuiteContext) -> Result<SuiteOutcome, SuiteError> {
        self.calls.lock().unwrap().push((suite, ctx.attempt));
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(&suite) {
            None => Ok(outcome(10, 10)),
            Some(SuiteScript::Pass { total, passed }) => Ok(outcome(*total, *passed)),
            Some(SuiteScript::FlakyThenPass { failures }) => {
                if *failures > 0 {
                    *failures -= 1;
                    Err(SuiteError::Retryable("transient harness failure".to_string()))
                } else {
                    Ok(outcome(10, 10))
                }
            }
            Some(SuiteScript::AlwaysRetryable) => {
                Err(SuiteError::Retryable("harness unreachable".to_string()))
            }
            Some(SuiteScript::Fatal) => {
                Err(SuiteError::Fatal("suite misconfigured".to_string()))
            }
        }
    }
}

/// Notifier counting approval requests and completion notices.
#[derive(Clone, Default)]
struct CountingNotifier {
    /// Number of approval-required notices.
    approval_requests: Arc<Mutex<u32>>,
    /// Completion statuses in delivery order.
    completions: Arc<Mutex<Vec<CertificationStatus>>>,
}

impl ApprovalNotifier for CountingNotifier {
    fn notify_approval_required(&self, _run: &CertificationRun) -> Result<(), NotifyError> {
        *self.approval_requests.lock().unwrap() += 1;
        Ok(())
    }

    fn notify_completed(
        &self,
        _run: &CertificationRun,
        status: CertificationStatus,
    ) -> Result<(), NotifyError> {
        self.completions.lock().unwrap().push(status);
        Ok(())
    }
}

/// Notifier that fails every delivery.
struct FailingNotifier;

impl ApprovalNotifier for FailingNotifier {
    fn notify_approval_required(&self, _run: &CertificationRun) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("sink offline".to_string()))
    }

    fn notify_completed(
        &self,
        _run: &CertificationRun,
        _status: CertificationStatus,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("sink offline".to_string()))
    }
}

/// Scripted gate behavior.
#[derive(Clone, Copy)]
enum GateBehavior {
    /// Permit certification.
    Allow,
    /// Deny certification.
    Deny,
    /// Fail evaluation outright.
    Unavailable,
}

/// Approval gate recording every evaluation input.
#[derive(Clone)]
struct StubGate {
    /// Scripted behavior.
    behavior: GateBehavior,
    /// Inputs received, in call order.
    inputs: Arc<Mutex<Vec<GateInput>>>,
}

impl StubGate {
    /// Creates a stub gate with the given behavior.
    fn new(behavior: GateBehavior) -> Self {
        Self {
            behavior,
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ApprovalGate for StubGate {
    fn evaluate(&self, input: &GateInput) -> Result<GateDecision, GateError> {
        self.inputs.lock().unwrap().push(input.clone());
        match self.behavior {
            GateBehavior::Allow => Ok(GateDecision {
                allow: true,
                reason: "scripted allow".to_string(),
            }),
            GateBehavior::Deny => Ok(GateDecision {
                allow: false,
                reason: "scripted deny".to_string(),
            }),
            GateBehavior::Unavailable => {
                Err(GateError::Unavailable("gate offline".to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Engine plus handles to its scripted backends.
struct Harness {
    /// Engine under test.
    engine: CertificationEngine<
        ScriptedRunner,
        CountingNotifier,
        InMemoryCertificationStore,
        InMemoryArtifactStore,
        InMemoryObjectStore,
        StubGate,
        NoSleep,
    >,
    /// Scripted suite runner handle.
    runner: ScriptedRunner,
    /// Counting notifier handle.
    notifier: CountingNotifier,
    /// Artifact store handle.
    artifacts: InMemoryArtifactStore,
    /// Object store handle.
    objects: InMemoryObjectStore,
}

/// Builds a harness with an optional gate and engine configuration.
fn harness_with(gate: Option<StubGate>, config: EngineConfig) -> Harness {
    let runner = ScriptedRunner::default();
    let notifier = CountingNotifier::default();
    let store = InMemoryCertificationStore::new();
    let artifacts = InMemoryArtifactStore::new();
    let objects = InMemoryObjectStore::new();
    let ledger = EvidenceLedger::new(artifacts.clone(), objects.clone());
    let engine = CertificationEngine::new(
        runner.clone(),
        notifier.clone(),
        store,
        ledger,
        gate,
        NoSleep,
        config,
    );
    Harness {
        engine,
        runner,
        notifier,
        artifacts,
        objects,
    }
}

/// Builds the default gateless harness.
fn harness() -> Harness {
    harness_with(None, EngineConfig::default())
}

/// Builds a launch configuration at the given tier.
fn cert_config(id: &str, tier: RiskTier) -> CertificationConfig {
    CertificationConfig {
        certification_id: CertificationId::new(id),
        use_case_id: UseCaseId::new("uc-1"),
        risk_tier: tier,
        required_test_suites: tier.required_test_suites().to_vec(),
        required_approvals: tier.required_approvals().to_vec(),
        owner: "owner".to_string(),
        initiated_by: "tester".to_string(),
    }
}

/// Builds an approval signal with the given decision.
fn signal(decision: ApprovalDecision) -> ApprovalSignal {
    ApprovalSignal {
        decision,
        approver: "approver".to_string(),
        rationale: "reviewed".to_string(),
        conditions: Vec::new(),
    }
}

// ============================================================================
// SECTION: Testing Phase
// ============================================================================

/// Tests a started run executes its suites and enters the approval wait.
#[test]
fn test_start_runs_suites_and_awaits_approval() {
    let h = harness();
    let run = h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();

    assert_eq!(run.phase, CertificationPhase::AwaitingApproval);
    assert_eq!(run.status, CertificationStatus::Pending);
    assert_eq!(run.eval_runs.len(), 1);
    assert_eq!(run.eval_runs[0].suite, TestSuite::QualityCorrectness);
    assert_eq!(run.eval_runs[0].status, EvalRunStatus::Completed);
    assert_eq!(run.approval_deadline, Some(T0.plus_days(1)));
    assert_eq!(*h.notifier.approval_requests.lock().unwrap(), 1);
}

/// Tests restarting past the testing phase is rejected.
#[test]
fn test_restart_past_testing_is_rejected() {
    let h = harness();
    let config = cert_config("cert-1", RiskTier::Minimal);
    h.engine.start(config.clone(), T0).unwrap();

    let err = h.engine.start(config, T0).unwrap_err();
    assert!(matches!(err, EngineError::AlreadyStarted(_)));
}

/// Tests a transient suite failure retries and then succeeds.
#[test]
fn test_flaky_suite_retries_then_succeeds() {
    let h = harness();
    h.runner.script(TestSuite::QualityCorrectness, SuiteScript::FlakyThenPass {
        failures: 2,
    });
    let run = h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();

    assert_eq!(h.runner.call_count(TestSuite::QualityCorrectness), 3);
    assert_eq!(run.eval_runs[0].attempts, 3);
    assert_eq!(run.eval_runs[0].status, EvalRunStatus::Completed);
    assert_eq!(run.eval_runs[0].findings, 0);
}

/// Tests exhausted retries record a failed run with one finding and the
/// workflow continues.
#[test]
fn test_retry_exhaustion_records_failed_run() {
    let h = harness();
    h.runner.script(TestSuite::QualityCorrectness, SuiteScript::AlwaysRetryable);
    let run = h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();

    assert_eq!(h.runner.call_count(TestSuite::QualityCorrectness), 3);
    assert_eq!(run.phase, CertificationPhase::AwaitingApproval);
    let record = &run.eval_runs[0];
    assert_eq!(record.status, EvalRunStatus::Failed);
    assert_eq!(record.findings, 1);
    assert_eq!(record.attempts, 3);
    assert!((record.pass_rate - 0.0).abs() < f64::EPSILON);
}

/// Tests a fatal suite error aborts the run and leaves it resumable.
#[test]
fn test_fatal_suite_aborts_run() {
    let h = harness();
    h.runner.script(TestSuite::QualityCorrectness, SuiteScript::Fatal);
    let id = CertificationId::new("cert-1");
    let err = h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap_err();
    assert!(matches!(err, EngineError::FatalSuite { .. }));

    // The run persisted in the testing phase and accepts no signals yet.
    let run = h.engine.status(&id).unwrap();
    assert_eq!(run.phase, CertificationPhase::Testing);
    assert!(h.engine.poll(&id, T0).unwrap().is_none());
    let err = h.engine.submit_approval(&id, signal(ApprovalDecision::Approved), T0).unwrap_err();
    assert!(matches!(err, EngineError::NotAwaitingApproval { .. }));
}

/// Tests resuming an interrupted run skips suites that already ran.
#[test]
fn test_resume_skips_recorded_suites() {
    let h = harness();
    h.runner.script(TestSuite::OperationalControls, SuiteScript::Fatal);
    let config = cert_config("cert-1", RiskTier::Low);
    let err = h.engine.start(config.clone(), T0).unwrap_err();
    assert!(matches!(err, EngineError::FatalSuite { .. }));
    assert_eq!(h.runner.call_count(TestSuite::QualityCorrectness), 1);

    h.runner.script(TestSuite::OperationalControls, SuiteScript::Pass {
        total: 10,
        passed: 10,
    });
    let run = h.engine.start(config, T0).unwrap();

    // The first suite's recorded result was reused, not recomputed.
    assert_eq!(h.runner.call_count(TestSuite::QualityCorrectness), 1);
    assert_eq!(run.eval_runs.len(), 2);
    assert_eq!(run.phase, CertificationPhase::AwaitingApproval);
}

// ============================================================================
// SECTION: Approval Resolution
// ============================================================================

/// Tests a clean run with an approved signal certifies without conditions.
#[test]
fn test_approved_run_with_clean_results() {
    let h = harness();
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();
    h.engine.submit_approval(&id, signal(ApprovalDecision::Approved), T0.plus_millis(1)).unwrap();

    let outcome = h.engine.poll(&id, T0.plus_millis(2)).unwrap().unwrap();
    assert_eq!(outcome.status, CertificationStatus::Approved);
    assert_eq!(outcome.finding_count, 0);
    assert_eq!(outcome.eval_run_ids.len(), 1);
    assert_eq!(outcome.approval_ids.len(), 1);
    assert!(outcome.monitoring_plan_id.is_none());

    let run = h.engine.status(&id).unwrap();
    assert_eq!(run.phase, CertificationPhase::Completed);
    assert!(!run.resolved_by_timeout);
    let pack_id = run.evidence_pack_id.unwrap();
    assert_eq!(pack_id.as_str(), "cert-1-pack");
    assert_eq!(*h.notifier.completions.lock().unwrap(), vec![CertificationStatus::Approved]);

    // The pack payload landed in object storage under the chained artifact.
    let use_case = UseCaseId::new("uc-1");
    let chain = h.artifacts.chain_for_use_case(Some(&use_case)).unwrap();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].artifact_id, pack_id);
    assert!(!chain[0].worm_locked);
    let payload = h.objects.get(&chain[0].storage_bucket, &chain[0].storage_key).unwrap();
    assert!(payload.is_some());
}

/// Tests an approved signal over open findings downgrades to conditional.
#[test]
fn test_approval_with_findings_is_conditional() {
    let h = harness();
    h.runner.script(TestSuite::QualityCorrectness, SuiteScript::Pass {
        total: 10,
        passed: 8,
    });
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();
    h.engine.submit_approval(&id, signal(ApprovalDecision::Approved), T0.plus_millis(1)).unwrap();

    let outcome = h.engine.poll(&id, T0.plus_millis(2)).unwrap().unwrap();
    assert_eq!(outcome.status, CertificationStatus::Conditional);
    assert_eq!(outcome.finding_count, 2);
}

/// Tests an explicit rejection resolves to rejected.
#[test]
fn test_rejected_signal() {
    let h = harness();
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();
    h.engine.submit_approval(&id, signal(ApprovalDecision::Rejected), T0.plus_millis(1)).unwrap();

    let outcome = h.engine.poll(&id, T0.plus_millis(2)).unwrap().unwrap();
    assert_eq!(outcome.status, CertificationStatus::Rejected);
}

/// Tests the most recent of multiple signals decides the outcome.
#[test]
fn test_latest_signal_wins() {
    let h = harness();
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();
    h.engine.submit_approval(&id, signal(ApprovalDecision::Rejected), T0.plus_millis(1)).unwrap();
    h.engine.submit_approval(&id, signal(ApprovalDecision::Approved), T0.plus_millis(2)).unwrap();

    let outcome = h.engine.poll(&id, T0.plus_millis(3)).unwrap().unwrap();
    assert_eq!(outcome.status, CertificationStatus::Approved);
    assert_eq!(outcome.approval_ids.len(), 2);
}

/// Tests polling before any signal or deadline leaves the wait unresolved.
#[test]
fn test_poll_before_resolution_returns_none() {
    let h = harness();
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();

    assert!(h.engine.poll(&id, T0.plus_millis(1)).unwrap().is_none());
}

/// Tests a deadline expiry with few findings resolves to conditional.
#[test]
fn test_timeout_with_few_findings_is_conditional() {
    let h = harness();
    h.runner.script(TestSuite::QualityCorrectness, SuiteScript::Pass {
        total: 10,
        passed: 8,
    });
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();

    let outcome = h.engine.poll(&id, T0.plus_days(1)).unwrap().unwrap();
    assert_eq!(outcome.status, CertificationStatus::Conditional);
    assert!(h.engine.status(&id).unwrap().resolved_by_timeout);
}

/// Tests a deadline expiry with many findings resolves to rejected.
#[test]
fn test_timeout_with_many_findings_is_rejected() {
    let h = harness();
    h.runner.script(TestSuite::QualityCorrectness, SuiteScript::Pass {
        total: 10,
        passed: 5,
    });
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();

    let outcome = h.engine.poll(&id, T0.plus_days(1)).unwrap().unwrap();
    assert_eq!(outcome.status, CertificationStatus::Rejected);
    assert_eq!(outcome.finding_count, 5);
}

/// Tests polling a completed run returns its outcome again without a second
/// pack.
#[test]
fn test_poll_is_idempotent_after_completion() {
    let h = harness();
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();
    h.engine.submit_approval(&id, signal(ApprovalDecision::Approved), T0.plus_millis(1)).unwrap();

    let first = h.engine.poll(&id, T0.plus_millis(2)).unwrap().unwrap();
    let second = h.engine.poll(&id, T0.plus_days(30)).unwrap().unwrap();
    assert_eq!(first, second);

    let use_case = UseCaseId::new("uc-1");
    assert_eq!(h.artifacts.chain_for_use_case(Some(&use_case)).unwrap().len(), 1);
}

/// Tests operations on unknown runs report not found.
#[test]
fn test_unknown_run_is_not_found() {
    let h = harness();
    let id = CertificationId::new("cert-missing");
    assert!(matches!(h.engine.poll(&id, T0), Err(EngineError::NotFound(_))));
    assert!(matches!(
        h.engine.submit_approval(&id, signal(ApprovalDecision::Approved), T0),
        Err(EngineError::NotFound(_))
    ));
}

// ============================================================================
// SECTION: Cancellation
// ============================================================================

/// Tests cancellation stops the run without generating evidence.
#[test]
fn test_cancel_during_approval_wait() {
    let h = harness();
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();

    let run = h.engine.cancel(&id, T0.plus_millis(1)).unwrap();
    assert_eq!(run.phase, CertificationPhase::Cancelled);
    assert_eq!(run.status, CertificationStatus::Pending);
    assert!(run.evidence_pack_id.is_none());
    let use_case = UseCaseId::new("uc-1");
    assert!(h.artifacts.chain_for_use_case(Some(&use_case)).unwrap().is_empty());

    assert!(matches!(h.engine.poll(&id, T0.plus_days(2)), Err(EngineError::Cancelled(_))));
    assert!(matches!(
        h.engine.submit_approval(&id, signal(ApprovalDecision::Approved), T0),
        Err(EngineError::NotAwaitingApproval { .. })
    ));

    // Cancelling again is a no-op.
    let again = h.engine.cancel(&id, T0.plus_millis(2)).unwrap();
    assert_eq!(again.phase, CertificationPhase::Cancelled);
}

/// Tests a completed run cannot be cancelled.
#[test]
fn test_cancel_completed_run_fails() {
    let h = harness();
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();
    h.engine.submit_approval(&id, signal(ApprovalDecision::Approved), T0.plus_millis(1)).unwrap();
    h.engine.poll(&id, T0.plus_millis(2)).unwrap();

    let err = h.engine.cancel(&id, T0.plus_millis(3)).unwrap_err();
    assert!(matches!(err, EngineError::AlreadyStarted(_)));
}

// ============================================================================
// SECTION: Approval Gate
// ============================================================================

/// Tests an allowing gate preserves the derived status and sees the
/// aggregate inputs.
#[test]
fn test_gate_allow_preserves_status() {
    let gate = StubGate::new(GateBehavior::Allow);
    let h = harness_with(Some(gate.clone()), EngineConfig::default());
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();
    h.engine.submit_approval(&id, signal(ApprovalDecision::Approved), T0.plus_millis(1)).unwrap();

    let outcome = h.engine.poll(&id, T0.plus_millis(2)).unwrap().unwrap();
    assert_eq!(outcome.status, CertificationStatus::Approved);

    let inputs = gate.inputs.lock().unwrap();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].risk_tier, RiskTier::Minimal);
    assert!((inputs[0].test_pass_rate - 1.0).abs() < f64::EPSILON);
    assert_eq!(inputs[0].open_critical_findings, 0);
    assert!(inputs[0].required_mitigations_completed);
}

/// Tests a denying gate downgrades an otherwise approved run.
#[test]
fn test_gate_deny_overrides_approval() {
    let gate = StubGate::new(GateBehavior::Deny);
    let h = harness_with(Some(gate), EngineConfig::default());
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();
    h.engine.submit_approval(&id, signal(ApprovalDecision::Approved), T0.plus_millis(1)).unwrap();

    let outcome = h.engine.poll(&id, T0.plus_millis(2)).unwrap().unwrap();
    assert_eq!(outcome.status, CertificationStatus::Rejected);
}

/// Tests an unreachable gate is treated as a deny.
#[test]
fn test_gate_error_is_deny() {
    let gate = StubGate::new(GateBehavior::Unavailable);
    let h = harness_with(Some(gate), EngineConfig::default());
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();
    h.engine.submit_approval(&id, signal(ApprovalDecision::Approved), T0.plus_millis(1)).unwrap();

    let outcome = h.engine.poll(&id, T0.plus_millis(2)).unwrap().unwrap();
    assert_eq!(outcome.status, CertificationStatus::Rejected);
}

/// Tests the gate is not consulted for an already rejected run.
#[test]
fn test_gate_skipped_when_already_rejected() {
    let gate = StubGate::new(GateBehavior::Allow);
    let h = harness_with(Some(gate.clone()), EngineConfig::default());
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();
    h.engine.submit_approval(&id, signal(ApprovalDecision::Rejected), T0.plus_millis(1)).unwrap();

    let outcome = h.engine.poll(&id, T0.plus_millis(2)).unwrap().unwrap();
    assert_eq!(outcome.status, CertificationStatus::Rejected);
    assert!(gate.inputs.lock().unwrap().is_empty());
}

// ============================================================================
// SECTION: Engine Configuration
// ============================================================================

/// Tests the write-once flag locks the generated pack.
#[test]
fn test_worm_flag_locks_pack() {
    let mut config = EngineConfig::default();
    config.flags.set_default(FLAG_WORM_LOCK_PACKS, true);
    let h = harness_with(None, config);
    let id = CertificationId::new("cert-1");
    h.engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();
    h.engine.submit_approval(&id, signal(ApprovalDecision::Approved), T0.plus_millis(1)).unwrap();
    h.engine.poll(&id, T0.plus_millis(2)).unwrap();

    let use_case = UseCaseId::new("uc-1");
    let chain = h.artifacts.chain_for_use_case(Some(&use_case)).unwrap();
    assert!(chain[0].worm_locked);
}

/// Tests notification failures never block the workflow.
#[test]
fn test_notifier_failure_is_tolerated() {
    let store = InMemoryCertificationStore::new();
    let artifacts = InMemoryArtifactStore::new();
    let ledger = EvidenceLedger::new(artifacts, InMemoryObjectStore::new());
    let engine = CertificationEngine::new(
        ScriptedRunner::default(),
        FailingNotifier,
        store,
        ledger,
        None::<StubGate>,
        NoSleep,
        EngineConfig::default(),
    );

    let id = CertificationId::new("cert-1");
    engine.start(cert_config("cert-1", RiskTier::Minimal), T0).unwrap();
    engine.submit_approval(&id, signal(ApprovalDecision::Approved), T0.plus_millis(1)).unwrap();
    let outcome = engine.poll(&id, T0.plus_millis(2)).unwrap().unwrap();
    assert_eq!(outcome.status, CertificationStatus::Approved);
}
