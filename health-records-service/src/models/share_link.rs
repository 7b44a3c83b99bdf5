use super::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShareType {
    FullProfile,
    Documents,
    Medications,
    Vitals,
    LabResults,
    Emergency,
    Custom,
}

impl ShareType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShareType::FullProfile => "full_profile",
            ShareType::Documents => "documents",
            ShareType::Medications => "medications",
            ShareType::Vitals => "vitals",
            ShareType::LabResults => "lab_results",
            ShareType::Emergency => "emergency",
            ShareType::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    #[default]
    ViewOnly,
    ViewAndDownload,
}

/// A time-boxed capability over a subset of a profile's records. Whoever holds
/// the token may exercise `access_level` on `resource_ids` until `expires_at`.
/// Expiry and `view_count` are enforced and maintained by the resolver side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShareableLink {
    pub id: String,
    pub token: String,
    pub profile_id: String,
    pub share_type: ShareType,
    #[serde(default)]
    pub resource_ids: Vec<String>,
    pub access_level: AccessLevel,
    pub expires_at: DateTime<Utc>,
    pub recipient_email: Option<String>,
    pub recipient_name: Option<String>,
    pub purpose: Option<String>,
    pub is_active: bool,
    pub view_count: u64,
    pub created_by: String,
    pub created_date: DateTime<Utc>,
}

impl Entity for ShareableLink {
    const COLLECTION: &'static str = "shareable_links";

    fn id(&self) -> &str {
        &self.id
    }
}
