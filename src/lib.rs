pub mod api;
pub mod core;
pub mod engines;
pub mod storage;
pub mod utils;

use std::sync::Arc;
use tracing::info;

use crate::{
    core::{pipeline::VerificationPipeline, risk::RiskScorer},
    engines::{CommandFaceMatcher, DocumentDecoder, FaceMatcher, ImageDecoder, OcrEngine, TesseractOcr},
    storage::session_store::{self, SessionStore},
    utils::{
        config::Config,
        error::{KycError, Result},
    },
};

pub struct Application {
    config: Arc<Config>,
    sessions: Arc<SessionStore>,
    pipeline: Arc<VerificationPipeline>,
}

impl Application {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        info!("Initializing session store...");
        let sessions = Arc::new(SessionStore::new(config.session.ttl_secs));

        info!("Initializing collaborator engines...");
        let call_timeout = config.engine_call_timeout();
        let decoder: Arc<dyn DocumentDecoder> = Arc::new(ImageDecoder::new(
            config.engines.pdftoppm_cmd.clone(),
            call_timeout,
        ));
        let ocr: Arc<dyn OcrEngine> = Arc::new(TesseractOcr::new(
            config.engines.tesseract_cmd.clone(),
            call_timeout,
        ));
        let face: Arc<dyn FaceMatcher> = Arc::new(CommandFaceMatcher::new(
            config.engines.face_cmd.clone(),
            call_timeout,
        ));

        info!("Initializing risk scorer...");
        let risk = RiskScorer::from_config(&config.risk);

        let pipeline = Arc::new(VerificationPipeline::new(
            sessions.clone(),
            decoder,
            ocr,
            face,
            risk,
        ));

        Ok(Self {
            config,
            sessions,
            pipeline,
        })
    }

    /// Runs the API server until it is stopped. The session sweeper runs
    /// alongside it for the lifetime of the process.
    pub async fn run(&self) -> Result<()> {
        use actix_cors::Cors;
        use actix_web::{web, App, HttpServer};

        use crate::api::handlers;

        session_store::spawn_sweeper(self.sessions.clone(), self.config.session_sweep_interval());

        let pipeline = self.pipeline.clone();
        let allowed_origins = self.config.server.allowed_origins.clone();
        let max_upload_bytes = self.config.server.max_upload_bytes;

        info!(
            "Starting API server on {}:{}",
            self.config.server.host, self.config.server.port
        );

        HttpServer::new(move || {
            let cors = if allowed_origins.is_empty() {
                Cors::permissive()
            } else {
                allowed_origins.iter().fold(
                    Cors::default().allow_any_method().allow_any_header(),
                    |cors, origin| cors.allowed_origin(origin),
                )
            };

            App::new()
                .wrap(cors)
                .app_data(web::Data::from(pipeline.clone()))
                .app_data(web::JsonConfig::default().limit(max_upload_bytes))
                .service(handlers::scope())
        })
        .bind((
            self.config.server.host.as_str(),
            self.config.server.port,
        ))
        .map_err(|e| KycError::Io(format!("failed to bind API server: {}", e)))?
        .run()
        .await
        .map_err(|e| KycError::Io(e.to_string()))
    }
}
