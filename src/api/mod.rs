// src/api/mod.rs
pub mod handlers;
pub mod types;

use actix_web::HttpResponse;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::error;

use crate::core::pipeline::DocumentUpload;
use crate::utils::error::{KycError, Result};
use types::{DocumentPayload, ErrorResponse};

/// Maps the pipeline error taxonomy onto HTTP responses. Validation
/// failures carry every accumulated reason.
pub(crate) fn error_response(err: KycError) -> HttpResponse {
    match err {
        KycError::Validation(reasons) => HttpResponse::UnprocessableEntity()
            .json(ErrorResponse::with_reasons("validation failed", reasons)),
        KycError::Decode(message) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(message))
        }
        KycError::Engine(message) => {
            HttpResponse::BadGateway().json(ErrorResponse::new(message))
        }
        KycError::Session(message) => {
            HttpResponse::NotFound().json(ErrorResponse::new(message))
        }
        KycError::InvalidState(message) => {
            HttpResponse::Conflict().json(ErrorResponse::new(message))
        }
        other => {
            error!("internal error: {}", other);
            HttpResponse::InternalServerError().json(ErrorResponse::new("internal error"))
        }
    }
}

pub(crate) fn decode_payload(payload: &DocumentPayload) -> Result<DocumentUpload> {
    let bytes = STANDARD
        .decode(payload.data.trim())
        .map_err(|e| KycError::Decode(format!("invalid base64 payload: {}", e)))?;
    Ok(DocumentUpload {
        filename: payload.filename.clone(),
        bytes,
    })
}

/// Decodes a `data:image/jpeg;base64,...` capture; a bare base64 string is
/// accepted too.
pub(crate) fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let encoded = data_url
        .split_once(',')
        .map(|(_, encoded)| encoded)
        .unwrap_or(data_url);
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| KycError::Decode(format!("invalid webcam capture: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_document_payloads() {
        let upload = decode_payload(&DocumentPayload {
            filename: "card.png".into(),
            data: STANDARD.encode(b"image bytes"),
        })
        .unwrap();
        assert_eq!(upload.filename, "card.png");
        assert_eq!(upload.bytes, b"image bytes");
    }

    #[test]
    fn rejects_malformed_base64() {
        let result = decode_payload(&DocumentPayload {
            filename: "card.png".into(),
            data: "!!! not base64 !!!".into(),
        });
        assert!(matches!(result, Err(KycError::Decode(_))));
    }

    #[test]
    fn strips_the_data_url_prefix() {
        let encoded = format!("data:image/jpeg;base64,{}", STANDARD.encode(b"jpeg bytes"));
        assert_eq!(decode_data_url(&encoded).unwrap(), b"jpeg bytes");
    }

    #[test]
    fn accepts_bare_base64_captures() {
        assert_eq!(
            decode_data_url(&STANDARD.encode(b"jpeg bytes")).unwrap(),
            b"jpeg bytes"
        );
    }
}
