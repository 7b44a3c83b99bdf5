use crate::dtos::{InsuranceAnswerResponse, InsuranceQuestionRequest};
use crate::middleware::AuthUser;
use crate::models::HealthInsurance;
use crate::services::metrics::record_llm_request;
use crate::services::{prompts, CompletionRequest};
use crate::utils::ValidatedJson;
use crate::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// Answer a coverage question from the profile's insurance policies
#[utoipa::path(
    post,
    path = "/insurance/ask",
    request_body = InsuranceQuestionRequest,
    responses(
        (status = 200, description = "Answer grounded in the policies on file", body = InsuranceAnswerResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No policy on file", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Insurance"
)]
pub async fn ask_insurance_question(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidatedJson(request): ValidatedJson<InsuranceQuestionRequest>,
) -> Result<Json<InsuranceAnswerResponse>, AppError> {
    let policies: Vec<HealthInsurance> = match request.policy_id.as_deref() {
        Some(policy_id) => state
            .repo
            .find_by_id::<HealthInsurance>(policy_id)
            .await?
            .filter(|policy| policy.profile_id == request.profile_id)
            .into_iter()
            .collect(),
        None => {
            state
                .repo
                .list_for_profile::<HealthInsurance>(&request.profile_id)
                .await?
        }
    };

    if policies.is_empty() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "No insurance policy found for this profile"
        )));
    }

    let completion_request =
        CompletionRequest::text(prompts::insurance_question(&request.question, &policies));
    let result = state.llm.complete(&completion_request).await;
    record_llm_request("insurance_question", result.is_ok());
    let completion = result?;

    Ok(Json(InsuranceAnswerResponse {
        answer: completion.text.trim().to_string(),
        policies_consulted: policies.len(),
    }))
}
