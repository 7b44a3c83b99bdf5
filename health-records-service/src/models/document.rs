use super::Entity;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct MedicalDocument {
    pub id: String,
    pub profile_id: String,
    pub title: String,
    pub document_type: String,
    pub facility_name: Option<String>,
    pub doctor_name: Option<String>,
    pub document_date: Option<String>,
    pub ai_summary: Option<String>,
    pub file_url: Option<String>,
    pub mime_type: Option<String>,
    pub storage_key: Option<String>,
    pub created_date: Option<String>,
}

impl MedicalDocument {
    pub fn new(profile_id: String, title: String, document_type: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            profile_id,
            title,
            document_type,
            facility_name: None,
            doctor_name: None,
            document_date: None,
            ai_summary: None,
            file_url: None,
            mime_type: None,
            storage_key: None,
            created_date: Some(Utc::now().to_rfc3339()),
        }
    }
}

impl Entity for MedicalDocument {
    const COLLECTION: &'static str = "medical_documents";

    fn id(&self) -> &str {
        &self.id
    }
}
