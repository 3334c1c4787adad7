// src/api/handlers/documents.rs
use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::types::DocumentsRequest;
use crate::api::{decode_payload, error_response};
use crate::core::pipeline::VerificationPipeline;

pub(crate) async fn submit_documents(
    pipeline: Data<VerificationPipeline>,
    id: Path<Uuid>,
    request: Json<DocumentsRequest>,
) -> HttpResponse {
    info!("received documents for session {}", id);
    let request = request.into_inner();

    let aadhaar = match decode_payload(&request.aadhaar) {
        Ok(upload) => upload,
        Err(e) => {
            warn!("session {}: bad Aadhaar payload: {}", id, e);
            return error_response(e);
        }
    };
    let pan = match request.pan.as_ref().map(decode_payload).transpose() {
        Ok(upload) => upload,
        Err(e) => {
            warn!("session {}: bad PAN payload: {}", id, e);
            return error_response(e);
        }
    };

    match pipeline.submit_documents(*id, aadhaar, pan).await {
        Ok(snapshot) => {
            info!("session {}: documents accepted", id);
            HttpResponse::Ok().json(snapshot)
        }
        Err(e) => {
            warn!("session {}: document submission failed: {}", id, e);
            error_response(e)
        }
    }
}
