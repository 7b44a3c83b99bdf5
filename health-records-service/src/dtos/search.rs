use crate::models::MedicalDocument;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DocumentSearchRequest {
    #[validate(length(min = 1, message = "profile_id is required"))]
    #[schema(example = "profile-123")]
    pub profile_id: String,

    #[validate(length(min = 1, max = 1000, message = "query must be 1-1000 characters"))]
    #[schema(example = "my last cholesterol test")]
    pub query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentSearchResponse {
    /// Matching documents, most relevant first.
    pub results: Vec<MedicalDocument>,
    pub total: usize,
}

impl DocumentSearchResponse {
    pub fn new(results: Vec<MedicalDocument>) -> Self {
        Self {
            total: results.len(),
            results,
        }
    }
}
