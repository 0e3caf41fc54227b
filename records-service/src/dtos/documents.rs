use crate::models::{DocumentCategory, DocumentMetadata};
use crate::services::view::{DocumentView, ViewOrder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Typed upload input, parsed from the multipart form before it reaches the
/// core. Blank text fields are treated as absent.
#[derive(Debug, Default, Validate)]
pub struct UploadDocument {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    pub category: Option<DocumentCategory>,
    pub document_date: Option<DateTime<Utc>>,
    pub doctor_name: Option<String>,
    pub hospital_name: Option<String>,
    pub notes: Option<String>,
}

impl UploadDocument {
    /// A metadata row is only written when at least one field is set.
    pub fn into_metadata(self, document_id: &str) -> Option<DocumentMetadata> {
        let UploadDocument {
            category,
            document_date,
            doctor_name,
            hospital_name,
            notes,
            ..
        } = self;

        let doctor_name = none_if_blank(doctor_name);
        let hospital_name = none_if_blank(hospital_name);
        let notes = none_if_blank(notes);

        if category.is_none()
            && document_date.is_none()
            && doctor_name.is_none()
            && hospital_name.is_none()
            && notes.is_none()
        {
            return None;
        }

        Some(DocumentMetadata {
            document_id: document_id.to_string(),
            category,
            document_date,
            doctor_name,
            hospital_name,
            notes,
        })
    }
}

pub fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentViewResponse {
    pub id: String,
    pub title: String,
    pub category: String,
    pub document_date: String,
    pub file_url: String,
    pub file_name: String,
    pub file_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub uploaded_at: String,
}

impl DocumentViewResponse {
    pub fn from_view(view: DocumentView, file_url: String) -> Self {
        Self {
            id: view.id,
            title: view.title,
            category: view.category.to_string(),
            document_date: view.document_date.to_rfc3339(),
            file_url,
            file_name: view.file_name,
            file_size: view.file_size,
            doctor_name: view.doctor_name,
            hospital_name: view.hospital_name,
            notes: view.notes,
            uploaded_at: view.uploaded_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DocumentListParams {
    pub search: Option<String>,
    pub view: Option<ViewOrder>,
    /// Clinician-only: patient lookup key scoping the list to that patient.
    pub patient: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentViewResponse>,
    pub total: usize,
}
