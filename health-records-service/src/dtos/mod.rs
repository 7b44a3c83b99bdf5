pub mod admin;
pub mod documents;
pub mod insurance;
pub mod meals;
pub mod reports;
pub mod search;
pub mod share;

use serde::Serialize;
use utoipa::ToSchema;

pub use admin::BootstrapAdminResponse;
pub use documents::UploadDocumentForm;
pub use insurance::{InsuranceAnswerResponse, InsuranceQuestionRequest};
pub use meals::{FoodItem, Macronutrients, MealAnalysis, MealAnalysisRequest};
pub use reports::{CsvReportResponse, GenerateReportRequest, IncludeFlags, ReportFormat};
pub use search::{DocumentSearchRequest, DocumentSearchResponse};
pub use share::{CreateShareLinkRequest, ShareLinkResponse};

/// Error body produced by `AppError`, documented for the OpenAPI schema.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Invalid or expired token")]
    pub error: String,
    pub details: Option<String>,
}
