// src/engines/mod.rs
//
// Opaque external collaborators. The pipeline only ever sees these traits;
// the default implementations bridge to command-line engines.

pub mod decode;
pub mod face;
pub mod ocr;

use async_trait::async_trait;
use image::DynamicImage;
#[cfg(test)]
use mockall::automock;
use std::path::Path;

use crate::core::pipeline::session::{DocumentKind, FaceMatchResult};
use crate::utils::error::Result;

pub use decode::ImageDecoder;
pub use face::CommandFaceMatcher;
pub use ocr::TesseractOcr;

/// Turns an uploaded file into a raster image. Corrupt or unsupported
/// input fails with `KycError::Decode`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentDecoder: Send + Sync {
    async fn decode(&self, bytes: &[u8], filename: &str, kind: DocumentKind)
        -> Result<DynamicImage>;
}

/// Reads raw text off a normalized document image. Never fails: an empty
/// string signals that nothing could be read.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn extract_text(&self, image: &DynamicImage) -> String;
}

/// Compares the document photo against the live photo. `Err` means the
/// engine itself is down (spawn failure, timeout, garbage output); an
/// engine that ran but found no face reports a soft failure inside the
/// result instead.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FaceMatcher: Send + Sync {
    async fn compare(&self, document: &Path, live: &Path) -> Result<FaceMatchResult>;
}
