// modelcert-core/src/runtime/ledger.rs
// ============================================================================
// Module: Modelcert Evidence Ledger
// Description: Serialized hash-chain append over artifact and object stores.
// Purpose: Persist tamper-evident evidence artifacts with pending-payload
//          recovery on object-store failure.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The ledger owns the append path of the evidence hash chain. Appends are
//! serialized so that two concurrent artifacts for the same use case can
//! never both chain against the same predecessor. The metadata record is
//! always persisted even when the payload upload fails; the artifact is then
//! marked `payload_pending` for later retry, and its hashes remain valid and
//! chain-verifiable throughout.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;

use thiserror::Error;

use crate::core::evidence::ArtifactMetadata;
use crate::core::evidence::ChainVerification;
use crate::core::evidence::EvidenceArtifact;
use crate::core::evidence::create_artifact;
use crate::core::evidence::verify_chain;
use crate::interfaces::ArtifactStore;
use crate::interfaces::ArtifactStoreError;
use crate::interfaces::EvidenceObjectStore;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Default object-store bucket for evidence payloads.
pub const DEFAULT_EVIDENCE_BUCKET: &str = "mc-evidence";

/// Evidence ledger errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The artifact metadata store rejected the record.
    #[error("ledger artifact store error: {0}")]
    ArtifactStore(#[from] ArtifactStoreError),
    /// The ledger's append lock is unusable.
    #[error("ledger append lock poisoned")]
    LockPoisoned,
}

// ============================================================================
// SECTION: Evidence Ledger
// ============================================================================

/// Hash-chain ledger over an artifact metadata store and an object store.
pub struct EvidenceLedger<A: ArtifactStore, O: EvidenceObjectStore> {
    /// Artifact metadata store.
    artifacts: A,
    /// Payload object store.
    objects: O,
    /// Bucket receiving payload objects.
    bucket: String,
    /// Append guard; fetching the chain head and inserting the successor
    /// must be atomic with respect to other appends.
    append_lock: Mutex<()>,
}

impl<A: ArtifactStore, O: EvidenceObjectStore> EvidenceLedger<A, O> {
    /// Creates a ledger writing payloads to the default bucket.
    pub fn new(artifacts: A, objects: O) -> Self {
        Self::with_bucket(artifacts, objects, DEFAULT_EVIDENCE_BUCKET)
    }

    /// Creates a ledger writing payloads to a custom bucket.
    pub fn with_bucket(artifacts: A, objects: O, bucket: impl Into<String>) -> Self {
        Self {
            artifacts,
            objects,
            bucket: bucket.into(),
            append_lock: Mutex::new(()),
        }
    }

    /// Appends an artifact to the owning use case's chain.
    ///
    /// The chain predecessor is the newest stored artifact for the same use
    /// case scope. The metadata record is persisted before the payload
    /// upload is attempted; an upload failure marks the record
    /// `payload_pending` rather than dropping it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the metadata store fails or the append
    /// lock is poisoned. Object-store failure is not an error path.
    pub fn append(
        &self,
        content: &[u8],
        metadata: ArtifactMetadata,
    ) -> Result<EvidenceArtifact, LedgerError> {
        let guard = self.append_lock.lock().map_err(|_| LedgerError::LockPoisoned)?;
        let previous = self.artifacts.latest_for_use_case(metadata.use_case_id.as_ref())?;
        let mut artifact = create_artifact(content, metadata, &self.bucket, previous.as_ref());
        self.artifacts.insert(&artifact)?;
        if self.objects.put(&artifact.storage_bucket, &artifact.storage_key, content).is_err() {
            artifact.payload_pending = true;
            self.artifacts.update(&artifact)?;
        }
        drop(guard);
        Ok(artifact)
    }

    /// Retries the payload upload for an artifact marked pending.
    ///
    /// Clears `payload_pending` on success; leaves it set when the upload
    /// fails again.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the metadata update fails.
    pub fn retry_upload(
        &self,
        artifact: &EvidenceArtifact,
        content: &[u8],
    ) -> Result<EvidenceArtifact, LedgerError> {
        let mut updated = artifact.clone();
        if !updated.payload_pending {
            return Ok(updated);
        }
        if self.objects.put(&updated.storage_bucket, &updated.storage_key, content).is_ok() {
            updated.payload_pending = false;
            self.artifacts.update(&updated)?;
        }
        Ok(updated)
    }

    /// Marks an artifact write-once and persists the flag.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the metadata update fails.
    pub fn lock_artifact(
        &self,
        artifact: &EvidenceArtifact,
    ) -> Result<EvidenceArtifact, LedgerError> {
        let mut updated = artifact.clone();
        updated.lock();
        self.artifacts.update(&updated)?;
        Ok(updated)
    }

    /// Verifies an ordered artifact chain without mutating stored records.
    #[must_use]
    pub fn verify(artifacts: &[EvidenceArtifact]) -> ChainVerification {
        verify_chain(artifacts)
    }
}
