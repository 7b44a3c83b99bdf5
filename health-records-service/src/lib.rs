pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    make_request_span, metrics_middleware, request_id_middleware, security_headers_middleware,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::HealthConfig;
use crate::dtos::documents::MAX_UPLOAD_BYTES;
use crate::services::{EmailProvider, JwtVerifier, LlmProvider, Repository, Storage, Translator};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::health::readiness_check,
        handlers::documents::upload_document,
        handlers::documents::download_document_file,
        handlers::search::search_documents,
        handlers::meals::analyze_meal,
        handlers::reports::generate_report,
        handlers::insurance::ask_insurance_question,
        handlers::admin::bootstrap_admin,
        handlers::share_links::create_share_link,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::DocumentSearchRequest,
            dtos::DocumentSearchResponse,
            dtos::MealAnalysisRequest,
            dtos::MealAnalysis,
            dtos::FoodItem,
            dtos::Macronutrients,
            dtos::GenerateReportRequest,
            dtos::IncludeFlags,
            dtos::ReportFormat,
            dtos::CsvReportResponse,
            dtos::InsuranceQuestionRequest,
            dtos::InsuranceAnswerResponse,
            dtos::BootstrapAdminResponse,
            dtos::CreateShareLinkRequest,
            dtos::ShareLinkResponse,
            models::MedicalDocument,
            models::ShareType,
            models::AccessLevel,
            models::UserRole,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Documents", description = "Medical document upload, download and search"),
        (name = "Meals", description = "Meal photo nutrition analysis"),
        (name = "Reports", description = "Health report generation"),
        (name = "Insurance", description = "Insurance coverage questions"),
        (name = "Share Links", description = "Time-limited sharing of health records"),
        (name = "Admin", description = "Administrative operations"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Collaborators are built once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: HealthConfig,
    pub repo: Repository,
    pub llm: Arc<dyn LlmProvider>,
    pub email: Arc<dyn EmailProvider>,
    pub storage: Arc<dyn Storage>,
    pub translator: Arc<Translator>,
    pub jwt: JwtVerifier,
}

pub fn build_router(state: AppState) -> Router {
    services::metrics::init_metrics();

    let cors = cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()))
        .route(
            "/documents",
            // Headroom over the file cap for the multipart framing and text fields.
            post(handlers::upload_document)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024)),
        )
        .route("/documents/search", post(handlers::search_documents))
        .route("/documents/:id/file", get(handlers::download_document_file))
        .route("/meals/analyze", post(handlers::analyze_meal))
        .route("/reports", post(handlers::generate_report))
        .route("/insurance/ask", post(handlers::ask_insurance_question))
        .route("/admin/bootstrap", post(handlers::bootstrap_admin))
        .route("/share-links", post(handlers::create_share_link))
        .with_state(state)
        // Add metrics middleware
        .layer(from_fn(metrics_middleware))
        // Add tracing layer
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        // Add security headers middleware
        .layer(from_fn(security_headers_middleware))
        // Add CORS layer
        .layer(cors)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT_LANGUAGE,
            header::HeaderName::from_static("x-request-id"),
        ])
}
