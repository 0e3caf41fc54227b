use crate::models::{DocumentHeader, DocumentMetadata, PatientProfile, Role};
use async_trait::async_trait;
use service_core::error::AppError;

/// A header joined with its optional metadata row, as fetched from the
/// store. Metadata stays `Option` until the view builder applies defaults.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub header: DocumentHeader,
    pub metadata: Option<DocumentMetadata>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All records owned by `owner_id`, newest upload first.
    async fn list(&self, owner_id: &str) -> Result<Vec<DocumentRecord>, AppError>;

    async fn find(&self, id: &str) -> Result<Option<DocumentHeader>, AppError>;

    /// Writes the header row, then the metadata row when present.
    async fn insert(
        &self,
        header: DocumentHeader,
        metadata: Option<DocumentMetadata>,
    ) -> Result<(), AppError>;

    /// Removes the header and cascades the metadata row. `NotFound` when the
    /// id does not exist. The blob is left in place.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Exact match on an already-normalized patient key.
    async fn find_by_patient_key(
        &self,
        patient_key: &str,
    ) -> Result<Option<PatientProfile>, AppError>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn role_of(&self, user_id: &str) -> Result<Option<Role>, AppError>;
}
