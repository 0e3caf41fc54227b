use async_trait::async_trait;
use service_core::error::AppError;
use std::path::PathBuf;
use tokio::fs;

/// Blob store collaborator. No delete: removing a document leaves its blob
/// behind, matching upload's orphan-on-partial-failure asymmetry.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores the blob and returns its location key.
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<String, AppError>;

    async fn get(&self, key: &str) -> Result<Vec<u8>, AppError>;

    fn public_url(&self, key: &str) -> String;
}

pub struct LocalBlobStore {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub async fn new(
        base_path: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await.map_err(blob_error)?;
        }
        Ok(Self {
            base_path,
            public_base_url: public_base_url.into(),
        })
    }
}

fn blob_error(err: std::io::Error) -> AppError {
    AppError::BlobUnavailable(anyhow::Error::new(err))
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, data: Vec<u8>) -> Result<String, AppError> {
        let path = self.base_path.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(blob_error)?;
        }
        fs::write(path, data).await.map_err(blob_error)?;
        Ok(key.to_string())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let path = self.base_path.join(key);
        fs::read(path).await.map_err(blob_error)
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }
}
