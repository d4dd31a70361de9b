// modelcert-core/src/core/evidence.rs
// ============================================================================
// Module: Modelcert Evidence Model
// Description: Content-addressed, hash-chained evidence artifact records.
// Purpose: Provide tamper-evident artifact creation and chain verification.
// Dependencies: crate::core::{hashing, identifiers, time}, serde
// ============================================================================

//! ## Overview
//! Evidence artifacts are immutable records of stored content. Each artifact
//! carries a `content_hash` (SHA-256 of the raw bytes) and a `chain_hash`
//! linking it to the previous artifact for the same use case, forming a
//! singly linked append-only list. Any edit to a stored hash breaks
//! recomputation at that link.
//!
//! # Invariants
//!
//! - `content_hash` is reproducible: hashing the same bytes twice yields the
//!   same value.
//! - A chain is valid iff, for every artifact after the first,
//!   `SHA-256(content_hash + previous.chain_hash)` equals the stored
//!   `chain_hash`. The first artifact chains against the literal seed
//!   `"genesis"`.
//! - `worm_locked` transitions false to true exactly once and never back.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::hashing::Sha256Digest;
use crate::core::hashing::hash_bytes;
use crate::core::identifiers::ApprovalId;
use crate::core::identifiers::ArtifactId;
use crate::core::identifiers::EvalRunId;
use crate::core::identifiers::UseCaseId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Artifact Vocabulary
// ============================================================================

/// Chain seed used when an artifact has no predecessor.
pub const CHAIN_GENESIS: &str = "genesis";

/// Category of an evidence artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    /// Test plan document.
    TestPlan,
    /// Test execution results.
    TestResults,
    /// Findings register.
    FindingsRegister,
    /// Approval record.
    ApprovalRecord,
    /// Monitoring plan.
    MonitoringPlan,
    /// Monitoring report.
    MonitoringReport,
    /// Trace export.
    TraceExport,
    /// Prompt and output log.
    PromptOutputLog,
    /// AI bill of materials.
    Aibom,
    /// Final certification pack.
    CertificationPack,
    /// Red team report.
    RedTeamReport,
    /// Vulnerability scan output.
    VulnerabilityScan,
    /// Committee report.
    CommitteeReport,
    /// Signed attestation.
    Attestation,
    /// Policy bundle snapshot.
    PolicyBundle,
    /// Dataset snapshot.
    DatasetSnapshot,
    /// Anything not covered above.
    Other,
}

impl ArtifactType {
    /// Returns the stable string form of this artifact type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TestPlan => "test_plan",
            Self::TestResults => "test_results",
            Self::FindingsRegister => "findings_register",
            Self::ApprovalRecord => "approval_record",
            Self::MonitoringPlan => "monitoring_plan",
            Self::MonitoringReport => "monitoring_report",
            Self::TraceExport => "trace_export",
            Self::PromptOutputLog => "prompt_output_log",
            Self::Aibom => "aibom",
            Self::CertificationPack => "certification_pack",
            Self::RedTeamReport => "red_team_report",
            Self::VulnerabilityScan => "vulnerability_scan",
            Self::CommitteeReport => "committee_report",
            Self::Attestation => "attestation",
            Self::PolicyBundle => "policy_bundle",
            Self::DatasetSnapshot => "dataset_snapshot",
            Self::Other => "other",
        }
    }
}

/// Retention classification of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionTag {
    /// Standard three-year retention.
    Standard,
    /// Regulatory seven-year retention.
    Regulatory,
    /// Effectively permanent retention.
    Permanent,
}

impl RetentionTag {
    /// Returns the retention window in days.
    #[must_use]
    pub const fn retention_days(self) -> i64 {
        match self {
            Self::Standard => 3 * 365,
            Self::Regulatory => 7 * 365,
            Self::Permanent => 100 * 365,
        }
    }
}

// ============================================================================
// SECTION: Evidence Artifact
// ============================================================================

/// Immutable record of stored evidence content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceArtifact {
    /// Artifact identifier.
    pub artifact_id: ArtifactId,
    /// Owning use case, or `None` for platform-global evidence.
    pub use_case_id: Option<UseCaseId>,
    /// Artifact category.
    pub artifact_type: ArtifactType,
    /// Human-readable artifact name.
    pub name: String,
    /// SHA-256 of the raw content bytes.
    pub content_hash: Sha256Digest,
    /// SHA-256 linking this artifact to its predecessor.
    pub chain_hash: Sha256Digest,
    /// Predecessor in the per-use-case chain; a weak reference, not an
    /// ownership edge.
    pub previous_artifact_id: Option<ArtifactId>,
    /// Object-store bucket holding the payload.
    pub storage_bucket: String,
    /// Deterministic object-store key for the payload.
    pub storage_key: String,
    /// MIME content type of the payload.
    pub content_type: String,
    /// Payload size in bytes.
    pub size_bytes: u64,
    /// Retention classification.
    pub retention: RetentionTag,
    /// Timestamp after which deletion becomes permissible.
    pub retention_until: Timestamp,
    /// Write-once lock flag; setting it is irreversible.
    pub worm_locked: bool,
    /// True when the payload upload failed and awaits retry; the hashes are
    /// valid and chain-verifiable regardless.
    pub payload_pending: bool,
    /// Evaluation run this artifact documents, when applicable.
    pub eval_run_id: Option<EvalRunId>,
    /// Approval record this artifact documents, when applicable.
    pub approval_id: Option<ApprovalId>,
    /// Principal that created the artifact.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: Timestamp,
}

impl EvidenceArtifact {
    /// Marks the artifact write-once. The transition is one-way; locking an
    /// already locked artifact is a no-op.
    pub const fn lock(&mut self) {
        self.worm_locked = true;
    }
}

/// Caller-supplied metadata for artifact creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Artifact identifier to assign.
    pub artifact_id: ArtifactId,
    /// Owning use case, or `None` for platform-global evidence.
    pub use_case_id: Option<UseCaseId>,
    /// Artifact category.
    pub artifact_type: ArtifactType,
    /// Human-readable artifact name.
    pub name: String,
    /// MIME content type of the payload.
    pub content_type: String,
    /// Retention classification.
    pub retention: RetentionTag,
    /// Evaluation run this artifact documents, when applicable.
    pub eval_run_id: Option<EvalRunId>,
    /// Approval record this artifact documents, when applicable.
    pub approval_id: Option<ApprovalId>,
    /// Principal creating the artifact.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: Timestamp,
}

// ============================================================================
// SECTION: Hash Chain Construction
// ============================================================================

/// Computes the content hash of raw artifact bytes.
#[must_use]
pub fn compute_content_hash(content: &[u8]) -> Sha256Digest {
    hash_bytes(content)
}

/// Computes the chain hash linking a content hash to its predecessor.
///
/// The hash covers the hex content hash concatenated with the predecessor's
/// hex chain hash, or the literal [`CHAIN_GENESIS`] seed for the first link.
#[must_use]
pub fn compute_chain_hash(
    content_hash: &Sha256Digest,
    previous_chain: Option<&Sha256Digest>,
) -> Sha256Digest {
    let previous = previous_chain.map_or(CHAIN_GENESIS, Sha256Digest::as_str);
    let mut material = String::with_capacity(content_hash.as_str().len() + previous.len());
    material.push_str(content_hash.as_str());
    material.push_str(previous);
    hash_bytes(material.as_bytes())
}

/// Derives the deterministic object-store key for an artifact.
///
/// The key is derived from identity, never from content, so identical bytes
/// uploaded for different events never collide.
#[must_use]
pub fn build_storage_key(
    use_case_id: Option<&UseCaseId>,
    artifact_type: ArtifactType,
    artifact_id: &ArtifactId,
    content_type: &str,
) -> String {
    let scope = use_case_id.map_or("global", UseCaseId::as_str);
    let ext = extension_for(content_type);
    format!("evidence/{scope}/{}/{artifact_id}.{ext}", artifact_type.as_str())
}

/// Maps a MIME content type to a storage file extension.
const fn extension_for(content_type: &str) -> &'static str {
    match content_type.as_bytes() {
        b"application/json" => "json",
        b"application/pdf" => "pdf",
        b"text/plain" => "txt",
        b"text/csv" => "csv",
        _ => "bin",
    }
}

/// Creates an evidence artifact from content bytes and metadata.
///
/// Pure construction: hashes are computed here and never recomputed except
/// by [`verify_chain`]. Storage placement fields describe where the payload
/// will live; persisting it is the ledger's concern.
#[must_use]
pub fn create_artifact(
    content: &[u8],
    metadata: ArtifactMetadata,
    storage_bucket: &str,
    previous: Option<&EvidenceArtifact>,
) -> EvidenceArtifact {
    let content_hash = compute_content_hash(content);
    let chain_hash =
        compute_chain_hash(&content_hash, previous.map(|artifact| &artifact.chain_hash));
    let storage_key = build_storage_key(
        metadata.use_case_id.as_ref(),
        metadata.artifact_type,
        &metadata.artifact_id,
        &metadata.content_type,
    );
    let retention_until = metadata.created_at.plus_days(metadata.retention.retention_days());
    EvidenceArtifact {
        artifact_id: metadata.artifact_id,
        use_case_id: metadata.use_case_id,
        artifact_type: metadata.artifact_type,
        name: metadata.name,
        content_hash,
        chain_hash,
        previous_artifact_id: previous.map(|artifact| artifact.artifact_id.clone()),
        storage_bucket: storage_bucket.to_string(),
        storage_key,
        content_type: metadata.content_type,
        size_bytes: content.len() as u64,
        retention: metadata.retention,
        retention_until,
        worm_locked: false,
        payload_pending: false,
        eval_run_id: metadata.eval_run_id,
        approval_id: metadata.approval_id,
        created_by: metadata.created_by,
        created_at: metadata.created_at,
    }
}

// ============================================================================
// SECTION: Chain Verification
// ============================================================================

/// Per-artifact verification outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLinkCheck {
    /// Artifact under check.
    pub artifact_id: ArtifactId,
    /// Whether the stored chain hash matches the recomputed one.
    pub valid: bool,
    /// Expected chain hash recomputed from the stored fields.
    pub expected_chain_hash: Sha256Digest,
}

/// Result of verifying an ordered artifact chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainVerification {
    /// AND of all per-artifact checks.
    pub is_valid: bool,
    /// Per-artifact results in input order.
    pub links: Vec<ChainLinkCheck>,
}

/// Verifies an ordered artifact chain without mutating it.
///
/// Each artifact's expected chain hash is recomputed from its stored
/// `content_hash` and the stored `chain_hash` of the artifact before it. An
/// edited content hash surfaces on its own link; an edited chain hash also
/// breaks the link that chained against it.
#[must_use]
pub fn verify_chain(artifacts: &[EvidenceArtifact]) -> ChainVerification {
    let mut links = Vec::with_capacity(artifacts.len());
    let mut is_valid = true;
    for (index, artifact) in artifacts.iter().enumerate() {
        let previous_chain = index.checked_sub(1).map(|prev| &artifacts[prev].chain_hash);
        let expected = compute_chain_hash(&artifact.content_hash, previous_chain);
        let valid = expected == artifact.chain_hash;
        is_valid = is_valid && valid;
        links.push(ChainLinkCheck {
            artifact_id: artifact.artifact_id.clone(),
            valid,
            expected_chain_hash: expected,
        });
    }
    ChainVerification {
        is_valid,
        links,
    }
}
