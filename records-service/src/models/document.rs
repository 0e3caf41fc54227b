use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category set offered by the upload form. `General` is never picked by an
/// uploader; it is the default substituted when metadata carries no category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentCategory {
    Prescription,
    #[serde(rename = "Lab Report")]
    LabReport,
    #[serde(rename = "X-Ray/Scan")]
    XRayScan,
    #[serde(rename = "Hospital Bill")]
    HospitalBill,
    #[serde(rename = "Pharmacy Bill")]
    PharmacyBill,
    #[serde(rename = "Discharge Summary")]
    DischargeSummary,
    #[serde(rename = "Medical Certificate")]
    MedicalCertificate,
    Other,
    General,
}

impl DocumentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::Prescription => "Prescription",
            DocumentCategory::LabReport => "Lab Report",
            DocumentCategory::XRayScan => "X-Ray/Scan",
            DocumentCategory::HospitalBill => "Hospital Bill",
            DocumentCategory::PharmacyBill => "Pharmacy Bill",
            DocumentCategory::DischargeSummary => "Discharge Summary",
            DocumentCategory::MedicalCertificate => "Medical Certificate",
            DocumentCategory::Other => "Other",
            DocumentCategory::General => "General",
        }
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Prescription" => Ok(DocumentCategory::Prescription),
            "Lab Report" => Ok(DocumentCategory::LabReport),
            "X-Ray/Scan" => Ok(DocumentCategory::XRayScan),
            "Hospital Bill" => Ok(DocumentCategory::HospitalBill),
            "Pharmacy Bill" => Ok(DocumentCategory::PharmacyBill),
            "Discharge Summary" => Ok(DocumentCategory::DischargeSummary),
            "Medical Certificate" => Ok(DocumentCategory::MedicalCertificate),
            "Other" => Ok(DocumentCategory::Other),
            "General" => Ok(DocumentCategory::General),
            _ => Err(format!("Unknown document category: {}", s)),
        }
    }
}

/// Storage and ownership facts for one uploaded file. Created on upload,
/// deleted on explicit delete, never updated in place. `owner_id` is the
/// sole authority for ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentHeader {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner_id: String,
    pub file_name: String,
    /// Key into the blob store; resolved to a public URL on read.
    pub file_location: String,
    pub file_size: i64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentHeader {
    pub fn new(owner_id: String, file_name: String, file_location: String, file_size: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            file_name,
            file_location,
            file_size,
            uploaded_at: Utc::now(),
        }
    }
}

/// Optional descriptive annotation for a header, keyed 1:0/1:1 by
/// `document_id`. Written once at creation and removed by cascade when the
/// header is deleted. Carries no ownership information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub document_id: String,
    pub category: Option<DocumentCategory>,
    /// Effective date of the medical event, when known.
    pub document_date: Option<DateTime<Utc>>,
    pub doctor_name: Option<String>,
    pub hospital_name: Option<String>,
    pub notes: Option<String>,
}
