// tests/common/mod.rs
//
// Shared fixture: a full pipeline wired to deterministic stub engines, so
// flows can be driven end-to-end without Tesseract or a face tool installed.

use async_trait::async_trait;
use image::{DynamicImage, ImageBuffer, ImageFormat, Luma};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use kycgate::core::pipeline::session::{DocumentKind, FaceMatchResult};
use kycgate::core::pipeline::{ClaimSubmission, DocumentUpload, VerificationPipeline};
use kycgate::core::risk::RiskScorer;
use kycgate::engines::{DocumentDecoder, FaceMatcher, OcrEngine};
use kycgate::storage::session_store::SessionStore;
use kycgate::utils::error::Result;

pub struct StubDecoder;

#[async_trait]
impl DocumentDecoder for StubDecoder {
    async fn decode(
        &self,
        _bytes: &[u8],
        _filename: &str,
        _kind: DocumentKind,
    ) -> Result<DynamicImage> {
        Ok(test_card_image())
    }
}

pub struct StubOcr {
    pub text: String,
}

#[async_trait]
impl OcrEngine for StubOcr {
    async fn extract_text(&self, _image: &DynamicImage) -> String {
        self.text.clone()
    }
}

pub struct StubFace {
    pub result: FaceMatchResult,
}

#[async_trait]
impl FaceMatcher for StubFace {
    async fn compare(&self, _document: &Path, _live: &Path) -> Result<FaceMatchResult> {
        Ok(self.result.clone())
    }
}

pub struct TestContext {
    pub sessions: Arc<SessionStore>,
    pub pipeline: VerificationPipeline,
}

impl TestContext {
    pub fn new(ocr_text: &str, face_result: FaceMatchResult) -> Self {
        let sessions = Arc::new(SessionStore::new(1800));
        let pipeline = VerificationPipeline::new(
            sessions.clone(),
            Arc::new(StubDecoder),
            Arc::new(StubOcr {
                text: ocr_text.to_string(),
            }),
            Arc::new(StubFace {
                result: face_result,
            }),
            RiskScorer::new(None),
        );
        Self { sessions, pipeline }
    }
}

pub fn test_card_image() -> DynamicImage {
    DynamicImage::ImageLuma8(ImageBuffer::from_pixel(120, 80, Luma([128u8])))
}

pub fn png_upload(name: &str) -> DocumentUpload {
    let mut bytes = Cursor::new(Vec::new());
    test_card_image()
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("test image encodes");
    DocumentUpload {
        filename: name.to_string(),
        bytes: bytes.into_inner(),
    }
}

pub fn png_bytes() -> Vec<u8> {
    png_upload("live.png").bytes
}

pub fn claim() -> ClaimSubmission {
    ClaimSubmission {
        full_name: "Rahul Sharma".to_string(),
        date_of_birth: "1990-04-12".to_string(),
        aadhaar_last4: "9012".to_string(),
        pan_number: None,
    }
}
