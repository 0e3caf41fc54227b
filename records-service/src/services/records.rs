use crate::dtos::UploadDocument;
use crate::models::{DocumentHeader, PatientProfile, Role};
use crate::services::blob::BlobStore;
use crate::services::identity::{self, CallerIdentity, Session};
use crate::services::notifier::{ChangeKind, ChangeNotifier, Subscription};
use crate::services::scope::{resolve_on_behalf, resolve_scope};
use crate::services::store::{DocumentRecord, DocumentStore, ProfileStore, RoleStore};
use crate::services::view::{build_views, merge_record, order_views, DocumentView, ViewOrder};
use service_core::error::AppError;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;
const ALLOWED_EXTENSIONS: [&str; 6] = ["pdf", "jpg", "jpeg", "png", "doc", "docx"];

/// The core surface exposed to UI collaborators. Owns the change notifier
/// and converts every collaborator failure at this boundary.
#[derive(Clone)]
pub struct RecordsService {
    store: Arc<dyn DocumentStore>,
    profiles: Arc<dyn ProfileStore>,
    roles: Arc<dyn RoleStore>,
    blobs: Arc<dyn BlobStore>,
    notifier: ChangeNotifier,
}

impl RecordsService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        profiles: Arc<dyn ProfileStore>,
        roles: Arc<dyn RoleStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            store,
            profiles,
            roles,
            blobs,
            notifier: ChangeNotifier::new(),
        }
    }

    pub async fn resolve_caller(
        &self,
        session: Option<&Session>,
    ) -> Result<CallerIdentity, AppError> {
        identity::resolve_caller(session, self.roles.as_ref()).await
    }

    pub async fn list_documents(
        &self,
        caller: &CallerIdentity,
        patient_key: Option<&str>,
        search: &str,
        order: ViewOrder,
    ) -> Result<Vec<DocumentView>, AppError> {
        let scope = resolve_scope(caller, patient_key, self.profiles.as_ref()).await?;
        let records = self.store.list(&scope.owner_id).await?;
        let mut views = build_views(&records, search);
        order_views(&mut views, order);
        Ok(views)
    }

    pub async fn upload_document(
        &self,
        caller: &CallerIdentity,
        upload: UploadDocument,
        data: Vec<u8>,
    ) -> Result<DocumentView, AppError> {
        upload.validate()?;

        if data.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!("No file uploaded")));
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "File too large (max 20MB)"
            )));
        }

        let extension = std::path::Path::new(&upload.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Unsupported file type: {:?}",
                upload.file_name
            )));
        }

        let file_size = data.len() as i64;
        let storage_key = format!("{}/{}.{}", caller.id, Uuid::new_v4(), extension);

        // Blob first. If the header insert below fails, the stored blob is
        // orphaned; there is no compensating delete.
        let location = self.blobs.put(&storage_key, data).await.map_err(|e| {
            tracing::error!(storage_key = %storage_key, error = %e, "Failed to store file");
            e
        })?;

        let header = DocumentHeader::new(
            caller.id.clone(),
            upload.file_name.clone(),
            location,
            file_size,
        );
        let metadata = upload.into_metadata(&header.id);

        tracing::info!(
            document_id = %header.id,
            file_name = %header.file_name,
            size = file_size,
            "Document upload started"
        );

        self.store.insert(header.clone(), metadata.clone()).await?;
        self.notifier.publish(ChangeKind::Created, &header.id);

        tracing::info!(document_id = %header.id, "Document upload completed");

        Ok(merge_record(&DocumentRecord { header, metadata }))
    }

    /// Owner-only. Cascades the metadata row; the blob stays behind.
    pub async fn delete_document(
        &self,
        caller: &CallerIdentity,
        id: &str,
    ) -> Result<(), AppError> {
        let header = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("document not found")))?;

        if header.owner_id != caller.id {
            return Err(AppError::Forbidden(anyhow::anyhow!(
                "document belongs to another patient"
            )));
        }

        self.store.delete(id).await?;
        self.notifier.publish(ChangeKind::Deleted, id);

        tracing::info!(document_id = %id, "Document deleted");
        Ok(())
    }

    /// The owner, or any clinician, may fetch the file bytes.
    pub async fn download_document(
        &self,
        caller: &CallerIdentity,
        id: &str,
    ) -> Result<(DocumentHeader, Vec<u8>), AppError> {
        let header = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("document not found")))?;

        if header.owner_id != caller.id && caller.role != Role::Clinician {
            return Err(AppError::Forbidden(anyhow::anyhow!(
                "document belongs to another patient"
            )));
        }

        let data = self.blobs.get(&header.file_location).await.map_err(|e| {
            tracing::error!(
                document_id = %id,
                file_location = %header.file_location,
                error = %e,
                "Failed to fetch file"
            );
            e
        })?;

        Ok((header, data))
    }

    pub async fn lookup_patient(
        &self,
        caller: &CallerIdentity,
        patient_key: &str,
    ) -> Result<PatientProfile, AppError> {
        resolve_on_behalf(caller, patient_key, self.profiles.as_ref()).await
    }

    /// One subscription per active list view; releasing (or dropping) the
    /// handle tears it down.
    pub fn subscribe(&self) -> Subscription {
        self.notifier.subscribe()
    }

    pub fn file_url(&self, file_location: &str) -> String {
        self.blobs.public_url(file_location)
    }
}
