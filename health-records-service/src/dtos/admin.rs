use crate::models::UserRole;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct BootstrapAdminResponse {
    pub success: bool,
    pub user_id: String,
    pub role: UserRole,
    #[schema(example = "You are now an administrator")]
    pub message: String,
}
