use crate::dtos::PatientProfileResponse;
use crate::middleware::SessionUser;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

/// Clinician-only lookup of a patient by their human-entered key. The key
/// is normalized inside the core; lower-case input is fine.
pub async fn lookup_patient(
    State(state): State<AppState>,
    session: SessionUser,
    Path(patient_key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let caller = state.records.resolve_caller(Some(&session.0)).await?;
    let profile = state.records.lookup_patient(&caller, &patient_key).await?;

    tracing::info!(
        clinician_id = %caller.id,
        patient_key = %profile.patient_key,
        "Patient record set accessed"
    );

    Ok(Json(PatientProfileResponse::from(profile)))
}
