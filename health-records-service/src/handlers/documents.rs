use crate::dtos::UploadDocumentForm;
use crate::middleware::AuthUser;
use crate::models::{MedicalDocument, Profile};
use crate::services::metrics::record_document_uploaded;
use crate::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

/// Upload a medical document file with its metadata
///
/// Multipart form: `file` plus `profile_id`, `title`, `document_type` and
/// optional `facility_name`, `doctor_name`, `document_date`.
#[utoipa::path(
    post,
    path = "/documents",
    responses(
        (status = 201, description = "Document stored", body = MedicalDocument),
        (status = 400, description = "Missing file, empty file or file over 20MB", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Documents"
)]
pub async fn upload_document(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = UploadDocumentForm::from_multipart(multipart).await?;

    state
        .repo
        .find_by_id::<Profile>(&form.profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Profile not found")))?;

    let mut document = MedicalDocument::new(
        form.profile_id.clone(),
        form.title.clone(),
        form.document_type.clone(),
    );
    let storage_key = form.storage_key(&document.id);
    let size = form.file.data.len();

    document.facility_name = form.facility_name;
    document.doctor_name = form.doctor_name;
    document.document_date = form.document_date;
    document.mime_type = Some(form.file.mime_type);
    document.file_url = Some(format!("/documents/{}/file", document.id));
    document.storage_key = Some(storage_key.clone());

    state.storage.upload(&storage_key, form.file.data).await?;

    if let Err(e) = state.repo.create(&document).await {
        // Don't leave an orphaned file behind the failed record.
        if let Err(cleanup) = state.storage.delete(&storage_key).await {
            tracing::warn!(key = %storage_key, error = %cleanup, "Failed to remove orphaned upload");
        }
        return Err(e);
    }

    record_document_uploaded();
    tracing::info!(
        user_id = %user.id(),
        document_id = %document.id,
        profile_id = %document.profile_id,
        size,
        "Document uploaded"
    );

    Ok((StatusCode::CREATED, Json(document)))
}

/// Download the stored file of a medical document
#[utoipa::path(
    get,
    path = "/documents/{id}/file",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "File content with the stored MIME type", body = Vec<u8>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Document or file not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Documents"
)]
pub async fn download_document_file(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let document = state
        .repo
        .find_by_id::<MedicalDocument>(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Document not found")))?;

    let storage_key = document
        .storage_key
        .as_deref()
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Document has no stored file")))?;

    let data = state.storage.download(storage_key).await?;

    let mime_type = document
        .mime_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let extension = storage_key.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("bin");

    Ok((
        [
            (header::CONTENT_TYPE, mime_type),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "inline; filename=\"{}.{}\"",
                    download_name(&document.title),
                    extension
                ),
            ),
        ],
        data,
    ))
}

/// Header-safe file stem derived from the document title.
fn download_name(title: &str) -> String {
    let name: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.trim_matches('_').is_empty() {
        "document".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_name_strips_header_breaking_characters() {
        assert_eq!(download_name("Lipid panel \"2024\""), "Lipid_panel__2024_");
        assert_eq!(download_name("\r\n"), "document");
        assert_eq!(download_name("x-ray_chest"), "x-ray_chest");
    }
}
