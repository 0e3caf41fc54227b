use crate::models::{DocumentHeader, DocumentMetadata, PatientProfile, Role, RoleAssignment};
use crate::services::store::{DocumentRecord, DocumentStore, ProfileStore, RoleStore};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::doc, options::FindOptions, options::IndexOptions, Client as MongoClient, Collection,
    Database, IndexModel,
};
use service_core::error::AppError;
use std::collections::HashMap;

/// MongoDB store binding: the production relational-store collaborator.
/// Headers and metadata live in separate collections joined on read.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Connected to MongoDB database");
        Ok(Self { db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for records-service");

        let owner_index = IndexModel::builder()
            .keys(doc! { "owner_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("owner_lookup".to_string())
                    .build(),
            )
            .build();
        self.documents().create_index(owner_index, None).await?;

        let metadata_index = IndexModel::builder()
            .keys(doc! { "document_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("document_lookup".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.metadata().create_index(metadata_index, None).await?;

        let patient_key_index = IndexModel::builder()
            .keys(doc! { "patient_key": 1 })
            .options(
                IndexOptions::builder()
                    .name("patient_key_lookup".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.profiles().create_index(patient_key_index, None).await?;

        let role_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("role_lookup".to_string())
                    .build(),
            )
            .build();
        self.roles().create_index(role_index, None).await?;

        Ok(())
    }

    fn documents(&self) -> Collection<DocumentHeader> {
        self.db.collection("documents")
    }

    fn metadata(&self) -> Collection<DocumentMetadata> {
        self.db.collection("document_metadata")
    }

    fn profiles(&self) -> Collection<PatientProfile> {
        self.db.collection("profiles")
    }

    fn roles(&self) -> Collection<RoleAssignment> {
        self.db.collection("user_roles")
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn list(&self, owner_id: &str) -> Result<Vec<DocumentRecord>, AppError> {
        let find_options = FindOptions::builder()
            .sort(doc! { "uploaded_at": -1 })
            .build();

        let mut cursor = self
            .documents()
            .find(doc! { "owner_id": owner_id }, find_options)
            .await?;

        let mut headers = Vec::new();
        while let Some(header) = cursor.try_next().await? {
            headers.push(header);
        }

        let ids: Vec<String> = headers.iter().map(|h| h.id.clone()).collect();
        let mut metadata_by_id: HashMap<String, DocumentMetadata> = HashMap::new();
        if !ids.is_empty() {
            let mut cursor = self
                .metadata()
                .find(doc! { "document_id": { "$in": ids } }, None)
                .await?;
            while let Some(metadata) = cursor.try_next().await? {
                metadata_by_id.insert(metadata.document_id.clone(), metadata);
            }
        }

        Ok(headers
            .into_iter()
            .map(|header| {
                let metadata = metadata_by_id.remove(&header.id);
                DocumentRecord { header, metadata }
            })
            .collect())
    }

    async fn find(&self, id: &str) -> Result<Option<DocumentHeader>, AppError> {
        Ok(self.documents().find_one(doc! { "_id": id }, None).await?)
    }

    async fn insert(
        &self,
        header: DocumentHeader,
        metadata: Option<DocumentMetadata>,
    ) -> Result<(), AppError> {
        self.documents().insert_one(&header, None).await?;
        if let Some(metadata) = metadata {
            self.metadata().insert_one(&metadata, None).await?;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = self.documents().delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "document {} not found",
                id
            )));
        }
        // Cascade the metadata row; the blob is deliberately left in place.
        self.metadata()
            .delete_one(doc! { "document_id": id }, None)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MongoStore {
    async fn find_by_patient_key(
        &self,
        patient_key: &str,
    ) -> Result<Option<PatientProfile>, AppError> {
        Ok(self
            .profiles()
            .find_one(doc! { "patient_key": patient_key }, None)
            .await?)
    }
}

#[async_trait]
impl RoleStore for MongoStore {
    async fn role_of(&self, user_id: &str) -> Result<Option<Role>, AppError> {
        let assignment = self
            .roles()
            .find_one(doc! { "user_id": user_id }, None)
            .await?;
        Ok(assignment.map(|a| a.role))
    }
}
