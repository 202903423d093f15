//! Medical image library shapes.

use serde::{Deserialize, Serialize};

use crate::{ApiError, Endpoint};

/// Extensions the backend accepts for upload (lowercase, with dot).
pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &[".svs", ".jpg", ".jpeg", ".png", ".tiff", ".tif"];

/// Entry of `GET /api/medical-images/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalImageSummary {
    pub id: u64,
    pub filename: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pathology_type: Option<String>,
    pub file_type: String,
    pub file_size: u64,
    #[serde(default)]
    pub has_dzi: bool,
    pub created_at: String,
    #[serde(default)]
    pub uploader_name: Option<String>,
}

impl MedicalImageSummary {
    /// URL the viewer loads the displayable raster from.
    pub fn view_url(&self, base: &str) -> String {
        Endpoint::ImageView(self.id).url(base)
    }
}

/// Text fields of the multipart upload; the file part is added by the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadForm {
    pub file_name: String,
    pub title: String,
    pub description: Option<String>,
    pub pathology_type: Option<String>,
}

impl UploadForm {
    /// Reject files the backend would refuse, before uploading.
    pub fn validate(&self) -> Result<(), ApiError> {
        let lower = self.file_name.to_lowercase();
        let allowed = lower
            .rfind('.')
            .map(|dot| ALLOWED_UPLOAD_EXTENSIONS.contains(&&lower[dot..]))
            .unwrap_or(false);
        if allowed {
            Ok(())
        } else {
            Err(ApiError::UnsupportedFile {
                file_name: self.file_name.clone(),
            })
        }
    }

    /// Non-file multipart fields as `(name, value)` pairs. Empty optionals are
    /// left out.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![("title", self.title.as_str())];
        if let Some(description) = self.description.as_deref() {
            fields.push(("description", description));
        }
        if let Some(pathology) = self.pathology_type.as_deref() {
            fields.push(("pathology_type", pathology));
        }
        fields
    }
}

/// Response of `POST /api/medical-images/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: u64,
    pub filename: String,
    pub title: String,
    pub file_type: String,
    pub file_size: u64,
    #[serde(default)]
    pub message: String,
}
