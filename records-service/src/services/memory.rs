use crate::models::{DocumentHeader, DocumentMetadata, PatientProfile, Role};
use crate::services::store::{DocumentRecord, DocumentStore, ProfileStore, RoleStore};
use async_trait::async_trait;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory store binding, the dev and test backend. Holds documents in
/// insertion order so the upload ordering stays stable across equal
/// timestamps.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<State>,
}

#[derive(Default)]
struct State {
    documents: Vec<DocumentRecord>,
    profiles: Vec<PatientProfile>,
    roles: HashMap<String, Role>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_profile(&self, profile: PatientProfile) {
        self.write().profiles.push(profile);
    }

    pub fn seed_role(&self, user_id: &str, role: Role) {
        self.write().roles.insert(user_id.to_string(), role);
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list(&self, owner_id: &str) -> Result<Vec<DocumentRecord>, AppError> {
        let state = self.read();
        let mut records: Vec<DocumentRecord> = state
            .documents
            .iter()
            .filter(|r| r.header.owner_id == owner_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.header.uploaded_at.cmp(&a.header.uploaded_at));
        Ok(records)
    }

    async fn find(&self, id: &str) -> Result<Option<DocumentHeader>, AppError> {
        let state = self.read();
        Ok(state
            .documents
            .iter()
            .find(|r| r.header.id == id)
            .map(|r| r.header.clone()))
    }

    async fn insert(
        &self,
        header: DocumentHeader,
        metadata: Option<DocumentMetadata>,
    ) -> Result<(), AppError> {
        self.write().documents.push(DocumentRecord { header, metadata });
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut state = self.write();
        let position = state.documents.iter().position(|r| r.header.id == id);
        match position {
            Some(index) => {
                state.documents.remove(index);
                Ok(())
            }
            None => Err(AppError::NotFound(anyhow::anyhow!(
                "document {} not found",
                id
            ))),
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn find_by_patient_key(
        &self,
        patient_key: &str,
    ) -> Result<Option<PatientProfile>, AppError> {
        let state = self.read();
        Ok(state
            .profiles
            .iter()
            .find(|p| p.patient_key == patient_key)
            .cloned())
    }
}

#[async_trait]
impl RoleStore for InMemoryStore {
    async fn role_of(&self, user_id: &str) -> Result<Option<Role>, AppError> {
        Ok(self.read().roles.get(user_id).copied())
    }
}
