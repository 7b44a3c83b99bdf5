use crate::models::{AccessLevel, ShareType};
use crate::services::share::{NotificationOutcome, DEFAULT_EXPIRES_HOURS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

fn default_expires_hours() -> u32 {
    DEFAULT_EXPIRES_HOURS
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateShareLinkRequest {
    #[validate(length(min = 1, message = "profile_id is required"))]
    #[schema(example = "profile-123")]
    pub profile_id: String,

    pub share_type: ShareType,

    #[serde(default)]
    pub resource_ids: Vec<String>,

    #[serde(default = "default_expires_hours")]
    #[validate(range(min = 1, max = 8760, message = "expires_hours must be between 1 and 8760"))]
    #[schema(example = 168, minimum = 1, maximum = 8760)]
    pub expires_hours: u32,

    #[validate(email(message = "Invalid recipient email"))]
    #[schema(example = "dr.lee@example.com")]
    pub recipient_email: Option<String>,

    pub recipient_name: Option<String>,

    pub purpose: Option<String>,

    #[serde(default)]
    pub access_level: AccessLevel,

    #[serde(default)]
    pub send_email: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShareLinkResponse {
    pub success: bool,
    pub link_id: String,
    #[schema(example = "https://app.healthrecords.example/share/4f1c...-lozi8ds0")]
    pub share_url: String,
    pub expires_at: DateTime<Utc>,
    #[schema(example = "Share link created successfully")]
    pub message: String,
    /// `{"status": "not_requested" | "sent" | "failed", "reason"?: string}`
    #[schema(value_type = Object)]
    pub notification: NotificationOutcome,
}
