use crate::dtos::{DocumentSearchRequest, DocumentSearchResponse};
use crate::middleware::AuthUser;
use crate::models::MedicalDocument;
use crate::services::metrics::record_llm_request;
use crate::services::{prompts, CompletionRequest};
use crate::utils::ValidatedJson;
use crate::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// Natural-language search over a profile's documents
#[utoipa::path(
    post,
    path = "/documents/search",
    request_body = DocumentSearchRequest,
    responses(
        (status = 200, description = "Matching documents, most relevant first", body = DocumentSearchResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Documents"
)]
pub async fn search_documents(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidatedJson(request): ValidatedJson<DocumentSearchRequest>,
) -> Result<Json<DocumentSearchResponse>, AppError> {
    let documents = state
        .repo
        .list_for_profile::<MedicalDocument>(&request.profile_id)
        .await?;

    if documents.is_empty() {
        return Ok(Json(DocumentSearchResponse::new(Vec::new())));
    }

    let completion_request = CompletionRequest::structured(
        prompts::document_search(&request.query, &documents),
        prompts::document_ids_schema(),
    );
    let result = state.llm.complete(&completion_request).await;
    record_llm_request("document_search", result.is_ok());

    let ids: Vec<String> = result?.parse_json()?;
    let results = prompts::select_documents(documents, &ids);

    tracing::info!(
        profile_id = %request.profile_id,
        returned = ids.len(),
        matched = results.len(),
        "Document search completed"
    );

    Ok(Json(DocumentSearchResponse::new(results)))
}
