use records_service::config::{BlobConfig, RecordsConfig, StoreBackend, StoreConfig};
use records_service::models::{PatientProfile, Role};
use records_service::services::{InMemoryStore, RecordsService};
use records_service::startup::Application;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_PATIENT: &str = "patient_user_1";
pub const TEST_CLINICIAN: &str = "clinician_user_1";
pub const TEST_PATIENT_KEY: &str = "PAT123456";

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStore>,
    pub records: RecordsService,
    pub storage_path: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let storage_path = format!("target/test-blobs-{}", Uuid::new_v4());

        let config = RecordsConfig {
            common: service_core::config::Config {
                port: 0, // Random port
                log_level: "info".to_string(),
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                uri: None,
                database: "records_test".to_string(),
            },
            blob: BlobConfig {
                local_path: storage_path.clone(),
                public_base_url: "http://localhost/files".to_string(),
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let store = app
            .memory_store()
            .expect("Memory backend expected in tests");
        let records = app.records().clone();

        store.seed_role(TEST_CLINICIAN, Role::Clinician);
        store.seed_profile(PatientProfile {
            user_id: TEST_PATIENT.to_string(),
            patient_key: TEST_PATIENT_KEY.to_string(),
            full_name: "Asha Rao".to_string(),
            date_of_birth: None,
            phone: Some("555-0123".to_string()),
        });

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let address = format!("http://127.0.0.1:{}", port);

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            store,
            records,
            storage_path,
        }
    }

    /// Uploads a 128-byte file with the given form fields and returns the
    /// raw response.
    pub async fn upload(
        &self,
        client: &reqwest::Client,
        user_id: &str,
        file_name: &str,
        fields: &[(&str, &str)],
    ) -> reqwest::Response {
        let mut form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(vec![0u8; 128])
                .file_name(file_name.to_string())
                .mime_str("application/octet-stream")
                .unwrap(),
        );
        for (name, value) in fields {
            form = form.text(name.to_string(), value.to_string());
        }

        client
            .post(format!("{}/documents", self.address))
            .header("X-User-ID", user_id)
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute upload request")
    }

    /// Maps a file_url from a response back to the on-disk blob path.
    pub fn blob_path(&self, file_url: &str) -> std::path::PathBuf {
        let key = file_url
            .strip_prefix("http://localhost/files/")
            .expect("Unexpected file_url prefix");
        std::path::Path::new(&self.storage_path).join(key)
    }

    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.storage_path).await;
    }
}
