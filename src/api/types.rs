// src/api/types.rs
use serde::{Deserialize, Serialize};

/// One uploaded file: original filename plus base64-encoded bytes.
#[derive(Debug, Deserialize)]
pub struct DocumentPayload {
    pub filename: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentsRequest {
    pub aadhaar: DocumentPayload,
    pub pan: Option<DocumentPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceSource {
    Webcam,
    Upload,
}

/// Live photo submission. Webcam captures arrive as a data URL in
/// `image_data`; uploads as a regular payload in `photo`.
#[derive(Debug, Deserialize)]
pub struct FaceRequest {
    pub source_type: FaceSource,
    pub image_data: Option<String>,
    pub photo: Option<DocumentPayload>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub reasons: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            reasons: Vec::new(),
        }
    }

    pub fn with_reasons(error: impl Into<String>, reasons: Vec<String>) -> Self {
        Self {
            error: error.into(),
            reasons,
        }
    }
}
