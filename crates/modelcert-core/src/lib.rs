// modelcert-core/src/lib.rs
// ============================================================================
// Module: Modelcert Core Library
// Description: Public API surface for the Modelcert certification core.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Modelcert core provides deterministic risk scoring, tamper-evident
//! evidence chaining, and durable certification orchestration for AI/ML
//! governance. It is backend-agnostic and integrates through explicit
//! interfaces rather than embedding into a particular platform.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::ApprovalGate;
pub use interfaces::ApprovalNotifier;
pub use interfaces::ArtifactStore;
pub use interfaces::ArtifactStoreError;
pub use interfaces::CertificationStore;
pub use interfaces::EvidenceObjectStore;
pub use interfaces::GateDecision;
pub use interfaces::GateError;
pub use interfaces::GateInput;
pub use interfaces::NotifyError;
pub use interfaces::ObjectStoreError;
pub use interfaces::StoreError;
pub use interfaces::SuiteContext;
pub use interfaces::SuiteError;
pub use interfaces::SuiteOutcome;
pub use interfaces::SuiteRunner;
pub use runtime::CertificationEngine;
pub use runtime::DEFAULT_EVIDENCE_BUCKET;
pub use runtime::EngineConfig;
pub use runtime::EngineError;
pub use runtime::EvidenceLedger;
pub use runtime::FLAG_WORM_LOCK_PACKS;
pub use runtime::InMemoryArtifactStore;
pub use runtime::InMemoryCertificationStore;
pub use runtime::InMemoryObjectStore;
pub use runtime::LedgerError;
pub use runtime::NoSleep;
pub use runtime::RetryPolicy;
pub use runtime::SharedCertificationStore;
pub use runtime::Sleeper;
pub use runtime::ThreadSleeper;
