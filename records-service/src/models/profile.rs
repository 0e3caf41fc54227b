use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Clinician,
}

/// Role assignment row. Stored separately from the identity itself; a user
/// without a row is a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub user_id: String,
    pub role: Role,
}

/// Patient profile as resolved from a human-entered patient key.
/// `patient_key` is stored upper-cased and matched exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    #[serde(rename = "_id")]
    pub user_id: String,
    pub patient_key: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
}
