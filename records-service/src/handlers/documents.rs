use crate::dtos::{DocumentListParams, DocumentListResponse, DocumentViewResponse, UploadDocument};
use crate::middleware::SessionUser;
use crate::startup::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use service_core::error::AppError;

pub async fn list_documents(
    State(state): State<AppState>,
    session: SessionUser,
    Query(params): Query<DocumentListParams>,
) -> Result<impl IntoResponse, AppError> {
    let caller = state.records.resolve_caller(Some(&session.0)).await?;

    let views = state
        .records
        .list_documents(
            &caller,
            params.patient.as_deref(),
            params.search.as_deref().unwrap_or(""),
            params.view.unwrap_or_default(),
        )
        .await?;

    let documents: Vec<DocumentViewResponse> = views
        .into_iter()
        .map(|view| {
            let file_url = state.records.file_url(&view.file_location);
            DocumentViewResponse::from_view(view, file_url)
        })
        .collect();

    Ok(Json(DocumentListResponse {
        total: documents.len(),
        documents,
    }))
}

pub async fn upload_document(
    State(state): State<AppState>,
    session: SessionUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let caller = state.records.resolve_caller(Some(&session.0)).await?;

    let mut upload = UploadDocument::default();
    let mut data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                upload.file_name = field.file_name().unwrap_or("unnamed").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e))
                })?;
                data = Some(bytes.to_vec());
            }
            "category" => {
                let text = read_text(field).await?;
                if !text.trim().is_empty() {
                    upload.category = Some(
                        text.trim()
                            .parse()
                            .map_err(|e: String| AppError::BadRequest(anyhow::anyhow!(e)))?,
                    );
                }
            }
            "document_date" => {
                let text = read_text(field).await?;
                if !text.trim().is_empty() {
                    upload.document_date = Some(parse_document_date(text.trim())?);
                }
            }
            "doctor_name" => upload.doctor_name = Some(read_text(field).await?),
            "hospital_name" => upload.hospital_name = Some(read_text(field).await?),
            "notes" => upload.notes = Some(read_text(field).await?),
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No file uploaded")))?;

    let view = state.records.upload_document(&caller, upload, data).await?;
    let file_url = state.records.file_url(&view.file_location);

    Ok((
        StatusCode::CREATED,
        Json(DocumentViewResponse::from_view(view, file_url)),
    ))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Failed to read form field: {}", e)))
}

fn parse_document_date(text: &str) -> Result<chrono::DateTime<chrono::Utc>, AppError> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid document_date: {}", e)))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Invalid document_date")))?;
    Ok(midnight.and_utc())
}

pub async fn delete_document(
    State(state): State<AppState>,
    session: SessionUser,
    Path(document_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let caller = state.records.resolve_caller(Some(&session.0)).await?;
    state.records.delete_document(&caller, &document_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_document(
    State(state): State<AppState>,
    session: SessionUser,
    Path(document_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let caller = state.records.resolve_caller(Some(&session.0)).await?;
    let (header, data) = state
        .records
        .download_document(&caller, &document_id)
        .await?;

    tracing::info!(
        document_id = %document_id,
        file_name = %header.file_name,
        size = data.len(),
        "Document download completed"
    );

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                detect_content_type(&header.file_name).to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", header.file_name),
            ),
        ],
        data,
    ))
}

fn detect_content_type(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}
