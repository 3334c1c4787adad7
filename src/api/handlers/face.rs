// src/api/handlers/face.rs
use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::types::{FaceRequest, FaceSource};
use crate::api::{decode_data_url, decode_payload, error_response};
use crate::core::pipeline::VerificationPipeline;
use crate::utils::error::{KycError, Result};

/// Webcam captures and photo uploads decode to the same byte payload.
fn live_photo_bytes(request: &FaceRequest) -> Result<Vec<u8>> {
    match request.source_type {
        FaceSource::Webcam => {
            let data_url = request.image_data.as_deref().ok_or_else(|| {
                KycError::Decode("webcam capture is missing its image data".to_string())
            })?;
            decode_data_url(data_url)
        }
        FaceSource::Upload => {
            let payload = request.photo.as_ref().ok_or_else(|| {
                KycError::Decode("photo upload is missing its file payload".to_string())
            })?;
            Ok(decode_payload(payload)?.bytes)
        }
    }
}

pub(crate) async fn submit_face(
    pipeline: Data<VerificationPipeline>,
    id: Path<Uuid>,
    request: Json<FaceRequest>,
) -> HttpResponse {
    info!("received live photo for session {}", id);

    let photo = match live_photo_bytes(&request) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("session {}: bad live photo payload: {}", id, e);
            return error_response(e);
        }
    };

    match pipeline.submit_live_photo(*id, photo).await {
        Ok(snapshot) => {
            info!(
                "session {}: verification decided, approved = {:?}",
                id, snapshot.approved
            );
            HttpResponse::Ok().json(snapshot)
        }
        Err(e) => {
            warn!("session {}: face verification failed: {}", id, e);
            error_response(e)
        }
    }
}
