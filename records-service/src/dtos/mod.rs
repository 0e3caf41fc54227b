pub mod documents;
pub mod patients;

pub use documents::{
    DocumentListParams, DocumentListResponse, DocumentViewResponse, UploadDocument,
};
pub use patients::PatientProfileResponse;
