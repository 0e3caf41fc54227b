pub mod documents;
pub mod events;
pub mod health;
pub mod patients;

pub use documents::{delete_document, download_document, list_documents, upload_document};
pub use events::document_events;
pub use health::health_check;
pub use patients::lookup_patient;
