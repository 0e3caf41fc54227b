use crate::models::{PatientProfile, Role};
use crate::services::identity::CallerIdentity;
use crate::services::store::ProfileStore;
use service_core::error::AppError;

/// The owner-id boundary a caller is permitted to query within.
#[derive(Debug, Clone)]
pub struct AccessScope {
    pub owner_id: String,
    /// Present when the scope was resolved on behalf of another patient.
    pub patient: Option<PatientProfile>,
}

/// Uppercase exact-match normalization for human-entered patient keys.
pub fn normalize_patient_key(key: &str) -> String {
    key.trim().to_uppercase()
}

/// Without a patient key the caller sees their own documents. With one, the
/// caller must be a clinician and the key must resolve to a profile.
pub async fn resolve_scope(
    caller: &CallerIdentity,
    patient_key: Option<&str>,
    profiles: &dyn ProfileStore,
) -> Result<AccessScope, AppError> {
    match patient_key {
        None => Ok(AccessScope {
            owner_id: caller.id.clone(),
            patient: None,
        }),
        Some(key) => {
            let profile = resolve_on_behalf(caller, key, profiles).await?;
            Ok(AccessScope {
                owner_id: profile.user_id.clone(),
                patient: Some(profile),
            })
        }
    }
}

/// Resolves a patient key for a clinician. The role check happens before
/// the profile lookup so unauthorized callers cannot probe which keys exist.
pub async fn resolve_on_behalf(
    caller: &CallerIdentity,
    patient_key: &str,
    profiles: &dyn ProfileStore,
) -> Result<PatientProfile, AppError> {
    if caller.role != Role::Clinician {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "clinician role required"
        )));
    }

    let normalized = normalize_patient_key(patient_key);
    profiles
        .find_by_patient_key(&normalized)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("patient not found")))
}
