// src/engines/decode.rs
use async_trait::async_trait;
use image::DynamicImage;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::DocumentDecoder;
use crate::core::pipeline::session::DocumentKind;
use crate::utils::error::{KycError, Result};

/// Default decoder: plain images through the `image` crate, PDFs rendered
/// to PNG (first page) by a `pdftoppm` subprocess.
pub struct ImageDecoder {
    pdftoppm_cmd: String,
    call_timeout: Duration,
}

impl ImageDecoder {
    pub fn new(pdftoppm_cmd: String, call_timeout: Duration) -> Self {
        Self {
            pdftoppm_cmd,
            call_timeout,
        }
    }

    async fn rasterize_pdf(&self, bytes: &[u8], kind: DocumentKind) -> Result<DynamicImage> {
        let workdir = tempfile::tempdir().map_err(|e| KycError::Io(e.to_string()))?;
        let pdf_path = workdir.path().join("upload.pdf");
        tokio::fs::write(&pdf_path, bytes)
            .await
            .map_err(|e| KycError::Io(e.to_string()))?;

        // Card uploads only ever need the first page.
        let prefix: PathBuf = workdir.path().join("page");
        let output = timeout(
            self.call_timeout,
            Command::new(&self.pdftoppm_cmd)
                .args(["-png", "-r", "150", "-f", "1", "-l", "1", "-singlefile"])
                .arg(&pdf_path)
                .arg(&prefix)
                .output(),
        )
        .await
        .map_err(|_| {
            KycError::Engine(format!(
                "PDF rasterization timed out after {:?}",
                self.call_timeout
            ))
        })?
        .map_err(|e| KycError::Engine(format!("failed to launch {}: {}", self.pdftoppm_cmd, e)))?;

        if !output.status.success() {
            return Err(KycError::Decode(format!(
                "could not rasterize the {} PDF: {}",
                kind,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        debug!(?kind, "rasterized first PDF page");
        image::open(workdir.path().join("page.png"))
            .map_err(|e| KycError::Decode(format!("rasterized {} page is unreadable: {}", kind, e)))
    }
}

fn is_pdf(bytes: &[u8], filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf") || bytes.starts_with(b"%PDF")
}

#[async_trait]
impl DocumentDecoder for ImageDecoder {
    async fn decode(
        &self,
        bytes: &[u8],
        filename: &str,
        kind: DocumentKind,
    ) -> Result<DynamicImage> {
        if is_pdf(bytes, filename) {
            return self.rasterize_pdf(bytes, kind).await;
        }

        image::load_from_memory(bytes)
            .map_err(|e| KycError::Decode(format!("could not decode the {} document: {}", kind, e)))
    }
}
