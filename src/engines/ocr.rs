// src/engines/ocr.rs
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::OcrEngine;
use crate::utils::error::{KycError, Result};

/// Default OCR bridge: writes a grayscale PNG to a scratch file and runs
/// the Tesseract CLI over it.
pub struct TesseractOcr {
    command: String,
    call_timeout: Duration,
}

impl TesseractOcr {
    pub fn new(command: String, call_timeout: Duration) -> Self {
        Self {
            command,
            call_timeout,
        }
    }

    async fn run(&self, image: &DynamicImage) -> Result<String> {
        let input = tempfile::Builder::new()
            .prefix("kyc-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| KycError::Io(e.to_string()))?;

        // Tesseract reads printed card text best from a clean grayscale.
        image
            .grayscale()
            .save_with_format(input.path(), ImageFormat::Png)
            .map_err(|e| KycError::Io(e.to_string()))?;

        let output = timeout(
            self.call_timeout,
            Command::new(&self.command)
                .arg(input.path())
                .arg("stdout")
                .args(["--oem", "3", "--psm", "6"])
                .output(),
        )
        .await
        .map_err(|_| KycError::Engine(format!("OCR timed out after {:?}", self.call_timeout)))?
        .map_err(|e| KycError::Engine(format!("failed to launch {}: {}", self.command, e)))?;

        if !output.status.success() {
            return Err(KycError::Engine(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout)
            .replace('\n', " ")
            .trim()
            .to_string();
        debug!("OCR read {} characters", text.len());
        Ok(text)
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn extract_text(&self, image: &DynamicImage) -> String {
        match self.run(image).await {
            Ok(text) => text,
            Err(e) => {
                // An unreachable OCR engine reads the same as a blank page;
                // the pipeline turns the empty result into validation errors.
                warn!("OCR engine failure treated as empty read: {}", e);
                String::new()
            }
        }
    }
}
