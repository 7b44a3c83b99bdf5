use axum::extract::Multipart;
use service_core::error::AppError;
use validator::Validate;

pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Multipart form posted by the upload modal: one `file` part plus text fields.
#[derive(Debug, Validate)]
pub struct UploadDocumentForm {
    #[validate(length(min = 1, message = "profile_id is required"))]
    pub profile_id: String,
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "document_type is required"))]
    pub document_type: String,
    pub facility_name: Option<String>,
    pub doctor_name: Option<String>,
    pub document_date: Option<String>,
    pub file: UploadedFile,
}

impl UploadDocumentForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut profile_id = None;
        let mut title = None;
        let mut document_type = None;
        let mut facility_name = None;
        let mut doctor_name = None;
        let mut document_date = None;
        let mut file = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
        })? {
            let name = field.name().unwrap_or_default().to_string();

            if name == "file" {
                let file_name = field.file_name().unwrap_or("unnamed").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e))
                    })?
                    .to_vec();

                if data.len() > MAX_UPLOAD_BYTES {
                    return Err(AppError::BadRequest(anyhow::anyhow!(
                        "File too large (max 20MB)"
                    )));
                }

                file = Some(UploadedFile {
                    file_name,
                    mime_type,
                    data,
                });
                continue;
            }

            let value = field.text().await.map_err(|e| {
                AppError::BadRequest(anyhow::anyhow!("Failed to read field {}: {}", name, e))
            })?;
            let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());

            match name.as_str() {
                "profile_id" => profile_id = value,
                "title" => title = value,
                "document_type" => document_type = value,
                "facility_name" => facility_name = value,
                "doctor_name" => doctor_name = value,
                "document_date" => document_date = value,
                other => tracing::debug!(field = %other, "Ignoring unknown upload field"),
            }
        }

        let file = file.ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No file uploaded")))?;
        if file.data.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!("Uploaded file is empty")));
        }

        let form = Self {
            profile_id: profile_id.unwrap_or_default(),
            title: title.unwrap_or_else(|| file.file_name.clone()),
            document_type: document_type.unwrap_or_default(),
            facility_name,
            doctor_name,
            document_date,
            file,
        };
        form.validate()?;
        Ok(form)
    }

    /// Storage key under the profile's prefix, keeping the original extension.
    pub fn storage_key(&self, document_id: &str) -> String {
        let extension = std::path::Path::new(&self.file.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin");
        format!("{}/{}.{}", self.profile_id, document_id, extension)
    }
}
