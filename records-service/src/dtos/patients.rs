use crate::models::PatientProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct PatientProfileResponse {
    pub patient_key: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<PatientProfile> for PatientProfileResponse {
    fn from(profile: PatientProfile) -> Self {
        Self {
            patient_key: profile.patient_key,
            full_name: profile.full_name,
            date_of_birth: profile.date_of_birth.map(|d| d.to_string()),
            phone: profile.phone,
        }
    }
}
