// modelcert-core/src/runtime/store.rs
// ============================================================================
// Module: Modelcert In-Memory Stores
// Description: Simple in-memory store implementations for tests and demos.
// Purpose: Provide deterministic store implementations without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides simple in-memory implementations of
//! [`CertificationStore`], [`ArtifactStore`], and [`EvidenceObjectStore`]
//! for tests and local demos. They are not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::evidence::EvidenceArtifact;
use crate::core::identifiers::CertificationId;
use crate::core::identifiers::UseCaseId;
use crate::core::state::CertificationRun;
use crate::interfaces::ArtifactStore;
use crate::interfaces::ArtifactStoreError;
use crate::interfaces::CertificationStore;
use crate::interfaces::EvidenceObjectStore;
use crate::interfaces::ObjectStoreError;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Certification Store
// ============================================================================

/// In-memory certification run store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCertificationStore {
    /// Run map protected by a mutex.
    runs: Arc<Mutex<BTreeMap<String, CertificationRun>>>,
}

impl InMemoryCertificationStore {
    /// Creates a new in-memory certification store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runs: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

impl CertificationStore for InMemoryCertificationStore {
    fn load(
        &self,
        certification_id: &CertificationId,
    ) -> Result<Option<CertificationRun>, StoreError> {
        let guard = self
            .runs
            .lock()
            .map_err(|_| StoreError::Store("certification store mutex poisoned".to_string()))?;
        Ok(guard.get(certification_id.as_str()).cloned())
    }

    fn save(&self, run: &CertificationRun) -> Result<(), StoreError> {
        self.runs
            .lock()
            .map_err(|_| StoreError::Store("certification store mutex poisoned".to_string()))?
            .insert(run.config.certification_id.to_string(), run.clone());
        Ok(())
    }
}

// ============================================================================
// SECTION: In-Memory Artifact Store
// ============================================================================

/// In-memory artifact metadata store for tests and examples.
///
/// Records keep insertion order so the newest artifact for a use case is the
/// last matching entry.
#[derive(Debug, Default, Clone)]
pub struct InMemoryArtifactStore {
    /// Artifact records in insertion order, protected by a mutex.
    records: Arc<Mutex<Vec<EvidenceArtifact>>>,
}

impl InMemoryArtifactStore {
    /// Creates a new in-memory artifact store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all stored artifacts for a use case scope, in chain order.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactStoreError`] when the store lock is poisoned.
    pub fn chain_for_use_case(
        &self,
        use_case_id: Option<&UseCaseId>,
    ) -> Result<Vec<EvidenceArtifact>, ArtifactStoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| ArtifactStoreError::Store("artifact store mutex poisoned".to_string()))?;
        Ok(guard
            .iter()
            .filter(|artifact| artifact.use_case_id.as_ref() == use_case_id)
            .cloned()
            .collect())
    }
}

impl ArtifactStore for InMemoryArtifactStore {
    fn insert(&self, artifact: &EvidenceArtifact) -> Result<(), ArtifactStoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| ArtifactStoreError::Store("artifact store mutex poisoned".to_string()))?;
        if guard.iter().any(|existing| existing.artifact_id == artifact.artifact_id) {
            return Err(ArtifactStoreError::Conflict(artifact.artifact_id.to_string()));
        }
        guard.push(artifact.clone());
        drop(guard);
        Ok(())
    }

    fn latest_for_use_case(
        &self,
        use_case_id: Option<&UseCaseId>,
    ) -> Result<Option<EvidenceArtifact>, ArtifactStoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| ArtifactStoreError::Store("artifact store mutex poisoned".to_string()))?;
        Ok(guard
            .iter()
            .rev()
            .find(|artifact| artifact.use_case_id.as_ref() == use_case_id)
            .cloned())
    }

    fn update(&self, artifact: &EvidenceArtifact) -> Result<(), ArtifactStoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| ArtifactStoreError::Store("artifact store mutex poisoned".to_string()))?;
        let Some(existing) =
            guard.iter_mut().find(|existing| existing.artifact_id == artifact.artifact_id)
        else {
            return Err(ArtifactStoreError::Store(format!(
                "artifact not found: {}",
                artifact.artifact_id
            )));
        };
        *existing = artifact.clone();
        drop(guard);
        Ok(())
    }
}

// ============================================================================
// SECTION: In-Memory Object Store
// ============================================================================

/// In-memory payload object store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryObjectStore {
    /// Object map keyed by `bucket/key`, protected by a mutex.
    objects: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryObjectStore {
    /// Creates a new in-memory object store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Returns the stored payload for a bucket and key, if present.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError`] when the store lock is poisoned.
    pub fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>, ObjectStoreError> {
        let guard = self
            .objects
            .lock()
            .map_err(|_| ObjectStoreError::Upload("object store mutex poisoned".to_string()))?;
        Ok(guard.get(&object_key(bucket, key)).cloned())
    }
}

impl EvidenceObjectStore for InMemoryObjectStore {
    fn put(&self, bucket: &str, key: &str, content: &[u8]) -> Result<(), ObjectStoreError> {
        self.objects
            .lock()
            .map_err(|_| ObjectStoreError::Upload("object store mutex poisoned".to_string()))?
            .insert(object_key(bucket, key), content.to_vec());
        Ok(())
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared certification store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedCertificationStore {
    /// Inner store implementation.
    inner: Arc<dyn CertificationStore + Send + Sync>,
}

impl SharedCertificationStore {
    /// Wraps a certification store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl CertificationStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn CertificationStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl CertificationStore for SharedCertificationStore {
    fn load(
        &self,
        certification_id: &CertificationId,
    ) -> Result<Option<CertificationRun>, StoreError> {
        self.inner.load(certification_id)
    }

    fn save(&self, run: &CertificationRun) -> Result<(), StoreError> {
        self.inner.save(run)
    }
}

/// Builds a unique object map key.
fn object_key(bucket: &str, key: &str) -> String {
    format!("{bucket}/{key}")
}
