// modelcert-core/src/runtime/mod.rs
// ============================================================================
// Module: Modelcert Runtime
// Description: Certification engine, evidence ledger, and retry runtime.
// Purpose: Execute certification runs over injected backend implementations.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime hosts the certification engine, the evidence ledger, the
//! retry policy, and in-memory store implementations for tests and demos.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod engine;
pub mod ledger;
pub mod retry;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use engine::CertificationEngine;
pub use engine::EngineConfig;
pub use engine::EngineError;
pub use engine::FLAG_WORM_LOCK_PACKS;
pub use ledger::DEFAULT_EVIDENCE_BUCKET;
pub use ledger::EvidenceLedger;
pub use ledger::LedgerError;
pub use retry::NoSleep;
pub use retry::RetryPolicy;
pub use retry::Sleeper;
pub use retry::ThreadSleeper;
pub use store::InMemoryArtifactStore;
pub use store::InMemoryCertificationStore;
pub use store::InMemoryObjectStore;
pub use store::SharedCertificationStore;
