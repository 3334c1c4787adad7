// src/api/handlers/session.rs
use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::error_response;
use crate::core::pipeline::{ClaimSubmission, VerificationPipeline};

pub(crate) async fn start_session(
    pipeline: Data<VerificationPipeline>,
    request: Json<ClaimSubmission>,
) -> HttpResponse {
    info!("received claim intake request");

    match pipeline.start_session(request.into_inner()) {
        Ok(snapshot) => {
            info!("opened verification session {}", snapshot.id);
            HttpResponse::Created().json(snapshot)
        }
        Err(e) => {
            warn!("claim intake rejected: {}", e);
            error_response(e)
        }
    }
}

pub(crate) async fn get_session(
    pipeline: Data<VerificationPipeline>,
    id: Path<Uuid>,
) -> HttpResponse {
    match pipeline.session_view(*id).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => {
            warn!("session {} lookup failed: {}", id, e);
            error_response(e)
        }
    }
}

pub(crate) async fn restart_session(
    pipeline: Data<VerificationPipeline>,
    id: Path<Uuid>,
) -> HttpResponse {
    info!("restarting session {}", id);

    match pipeline.restart(*id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => {
            warn!("restart of session {} failed: {}", id, e);
            error_response(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::handlers::scope;
    use crate::core::pipeline::VerificationPipeline;
    use crate::core::risk::RiskScorer;
    use crate::engines::{MockDocumentDecoder, MockFaceMatcher, MockOcrEngine};
    use crate::storage::session_store::SessionStore;
    use actix_web::{http::StatusCode, test, web::Data, App};
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;

    fn pipeline() -> VerificationPipeline {
        VerificationPipeline::new(
            Arc::new(SessionStore::new(1800)),
            Arc::new(MockDocumentDecoder::new()),
            Arc::new(MockOcrEngine::new()),
            Arc::new(MockFaceMatcher::new()),
            RiskScorer::new(None),
        )
    }

    #[actix_web::test]
    async fn claim_intake_opens_a_session() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pipeline()))
                .service(scope()),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/session")
            .set_json(json!({
                "full_name": "Rahul Sharma",
                "date_of_birth": "1990-04-12",
                "aadhaar_last4": "9012"
            }))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn malformed_claim_is_unprocessable() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pipeline()))
                .service(scope()),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/session")
            .set_json(json!({
                "full_name": "",
                "date_of_birth": "not a date",
                "aadhaar_last4": "12"
            }))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn unknown_session_is_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pipeline()))
                .service(scope()),
        )
        .await;

        let request = test::TestRequest::get()
            .uri(&format!("/api/session/{}", Uuid::new_v4()))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn face_submission_out_of_order_conflicts() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pipeline()))
                .service(scope()),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/session")
            .set_json(json!({
                "full_name": "Rahul Sharma",
                "date_of_birth": "1990-04-12",
                "aadhaar_last4": "9012"
            }))
            .to_request();
        let response: serde_json::Value =
            test::call_and_read_body_json(&app, request).await;
        let id = response["id"].as_str().unwrap().to_string();

        let request = test::TestRequest::post()
            .uri(&format!("/api/session/{}/face", id))
            .set_json(json!({
                "source_type": "webcam",
                "image_data": "data:image/jpeg;base64,aGVsbG8="
            }))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
