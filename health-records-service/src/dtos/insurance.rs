use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InsuranceQuestionRequest {
    #[validate(length(min = 1, message = "profile_id is required"))]
    #[schema(example = "profile-123")]
    pub profile_id: String,

    #[validate(length(min = 1, max = 2000, message = "question must be 1-2000 characters"))]
    #[schema(example = "Is physiotherapy covered?")]
    pub question: String,

    /// Restrict the answer to a single policy.
    pub policy_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InsuranceAnswerResponse {
    pub answer: String,
    pub policies_consulted: usize,
}
