use crate::dtos::{MealAnalysis, MealAnalysisRequest};
use crate::middleware::AuthUser;
use crate::services::metrics::record_llm_request;
use crate::services::{prompts, CompletionRequest};
use crate::utils::ValidatedJson;
use crate::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// Estimate the nutrition of a meal photo
#[utoipa::path(
    post,
    path = "/meals/analyze",
    request_body = MealAnalysisRequest,
    responses(
        (status = 200, description = "Nutrition analysis", body = MealAnalysis),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Meals"
)]
pub async fn analyze_meal(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<MealAnalysisRequest>,
) -> Result<Json<MealAnalysis>, AppError> {
    let completion_request = CompletionRequest::structured(
        prompts::meal_photo(request.meal_type.as_deref(), request.notes.as_deref()),
        MealAnalysis::response_schema(),
    )
    .with_image(request.image_url);

    let result = state.llm.complete(&completion_request).await;
    record_llm_request("meal_analysis", result.is_ok());

    let analysis: MealAnalysis = result?.parse_json()?;

    tracing::info!(
        user_id = %user.id(),
        food_items = analysis.food_items.len(),
        total_calories = analysis.total_calories,
        "Meal analyzed"
    );

    Ok(Json(analysis))
}
