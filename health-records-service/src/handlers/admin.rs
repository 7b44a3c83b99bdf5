use crate::dtos::BootstrapAdminResponse;
use crate::middleware::AuthUser;
use crate::models::{User, UserRole};
use crate::services::Filter;
use crate::AppState;
use axum::{extract::State, Json};
use serde_json::json;
use service_core::error::AppError;

/// Promote the caller to administrator while no administrator exists
#[utoipa::path(
    post,
    path = "/admin/bootstrap",
    responses(
        (status = 200, description = "Caller promoted", body = BootstrapAdminResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 409, description = "An administrator already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn bootstrap_admin(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<BootstrapAdminResponse>, AppError> {
    // Check-then-write; two concurrent first calls can both succeed.
    let admins = state
        .repo
        .list::<User>(Filter::new().eq("role", UserRole::Admin.as_str()))
        .await?;
    if !admins.is_empty() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "An administrator already exists"
        )));
    }

    let updated = state
        .repo
        .update::<User>(user.id(), json!({ "role": UserRole::Admin.as_str() }))
        .await?;

    if !updated {
        let record = User {
            id: user.id().to_string(),
            email: user.email().to_string(),
            full_name: None,
            role: UserRole::Admin,
        };
        state.repo.create(&record).await?;
    }

    tracing::warn!(user_id = %user.id(), email = %user.email(), "Bootstrapped first administrator");

    Ok(Json(BootstrapAdminResponse {
        success: true,
        user_id: user.id().to_string(),
        role: UserRole::Admin,
        message: "You are now an administrator".to_string(),
    }))
}
