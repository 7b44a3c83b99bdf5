use crate::dtos::{CsvReportResponse, GenerateReportRequest, ReportFormat};
use crate::middleware::AuthUser;
use crate::models::Profile;
use crate::services::metrics::record_report_generated;
use crate::services::reports::{collect_sections, csv_export, pdf, DateRange, ReportData};
use crate::utils::ValidatedJson;
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use service_core::error::AppError;

/// Generate a PDF or CSV health report for a period
#[utoipa::path(
    post,
    path = "/reports",
    request_body = GenerateReportRequest,
    responses(
        (status = 200, description = "PDF attachment, or CSV wrapped in JSON when format is csv", body = CsvReportResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn generate_report(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<GenerateReportRequest>,
) -> Result<Response, AppError> {
    let range = DateRange::new(request.start_date, request.end_date)?;

    let profile = state
        .repo
        .find_by_id::<Profile>(&request.profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Profile not found")))?;

    let metrics = request.include.metrics();
    let sections = collect_sections(&state.repo, &profile.id, &metrics, range).await?;

    let report = ReportData {
        profile,
        range,
        generated_on: Utc::now().date_naive(),
        sections,
    };

    tracing::info!(
        user_id = %user.id(),
        profile_id = %report.profile.id,
        format = request.format.as_str(),
        sections = report.sections.len(),
        "Generating health report"
    );

    let date = report.generated_on.format("%Y-%m-%d").to_string();
    let response = match request.format {
        ReportFormat::Pdf => {
            let bytes = tokio::task::spawn_blocking(move || pdf::render(&report))
                .await
                .map_err(|e| {
                    AppError::InternalError(anyhow::anyhow!("PDF render task failed: {}", e))
                })??;

            (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"health-report-{}.pdf\"", date),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        ReportFormat::Csv => Json(CsvReportResponse {
            format: "csv".to_string(),
            filename: format!("health-report-{}.csv", date),
            data: csv_export::render_vitals(report.vitals())?,
        })
        .into_response(),
    };

    record_report_generated(request.format.as_str());

    Ok(response)
}
