// modelcert-core/src/core/mod.rs
// ============================================================================
// Module: Modelcert Core Types
// Description: Canonical Modelcert risk, evidence, and workflow structures.
// Purpose: Provide stable, serializable types for certification pipelines.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Modelcert core types define the risk scoring model, the hash-chained
//! evidence model, and the durable certification run state. These types are
//! the canonical source of truth for any derived API surfaces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod config;
pub mod evidence;
pub mod hashing;
pub mod identifiers;
pub mod risk;
pub mod state;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::FeatureFlags;
pub use evidence::ArtifactMetadata;
pub use evidence::ArtifactType;
pub use evidence::CHAIN_GENESIS;
pub use evidence::ChainLinkCheck;
pub use evidence::ChainVerification;
pub use evidence::EvidenceArtifact;
pub use evidence::RetentionTag;
pub use evidence::build_storage_key;
pub use evidence::compute_chain_hash;
pub use evidence::compute_content_hash;
pub use evidence::create_artifact;
pub use evidence::verify_chain;
pub use hashing::HashError;
pub use hashing::Sha256Digest;
pub use hashing::canonical_json_bytes;
pub use hashing::hash_bytes;
pub use hashing::hash_canonical_json;
pub use identifiers::ApprovalId;
pub use identifiers::ArtifactId;
pub use identifiers::CertificationId;
pub use identifiers::CorrelationId;
pub use identifiers::EvalRunId;
pub use identifiers::UseCaseId;
pub use risk::ApproverRole;
pub use risk::DataClassification;
pub use risk::RiskAssessment;
pub use risk::RiskFactor;
pub use risk::RiskTier;
pub use risk::TestSuite;
pub use risk::UseCaseCategory;
pub use risk::UseCaseProfile;
pub use risk::compute_risk_rating;
pub use risk::derive_agentic_risks;
pub use risk::derive_llm_risks;
pub use state::ApprovalDecision;
pub use state::ApprovalRecord;
pub use state::ApprovalSignal;
pub use state::CertificationConfig;
pub use state::CertificationOutcome;
pub use state::CertificationPhase;
pub use state::CertificationRun;
pub use state::CertificationStatus;
pub use state::EvalRunRecord;
pub use state::EvalRunStatus;
pub use time::Timestamp;
