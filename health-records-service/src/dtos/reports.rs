use crate::services::reports::ReportMetric;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Which metric categories to include. Every flag defaults to `false`.
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct IncludeFlags {
    pub vitals: bool,
    pub medications: bool,
    pub nutrition: bool,
    pub labs: bool,
    pub insights: bool,
}

impl IncludeFlags {
    /// Selected metrics in fixed flag order.
    pub fn metrics(&self) -> Vec<ReportMetric> {
        [
            (self.vitals, ReportMetric::Vitals),
            (self.medications, ReportMetric::Medications),
            (self.nutrition, ReportMetric::Nutrition),
            (self.labs, ReportMetric::Labs),
            (self.insights, ReportMetric::Insights),
        ]
        .into_iter()
        .filter_map(|(included, metric)| included.then_some(metric))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Csv,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateReportRequest {
    #[validate(length(min = 1, message = "profile_id is required"))]
    #[schema(example = "profile-123")]
    pub profile_id: String,

    #[schema(example = "2024-03-01")]
    pub start_date: NaiveDate,

    #[schema(example = "2024-03-31")]
    pub end_date: NaiveDate,

    #[serde(default)]
    pub include: IncludeFlags,

    #[serde(default)]
    pub format: ReportFormat,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CsvReportResponse {
    #[schema(example = "csv")]
    pub format: String,
    #[schema(example = "health-report-2024-04-02.csv")]
    pub filename: String,
    /// CSV text with a `Date,Metric,Value,Unit` header.
    pub data: String,
}
