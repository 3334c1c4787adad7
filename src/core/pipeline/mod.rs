// src/core/pipeline/mod.rs
//
// Session-scoped verification state machine: claim intake -> document
// validation -> face comparison -> decision. All engine collaborators come
// in through traits so the decision logic stays deterministic and testable.

pub mod session;

use chrono::NaiveDate;
use image::{DynamicImage, ImageFormat};
use serde::Deserialize;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::document::extract::{extract_aadhaar_number, extract_pan_number};
use crate::core::document::normalize::enhance_card_image;
use crate::core::risk::RiskScorer;
use crate::core::validation::{aadhaar, pan};
use crate::engines::{DocumentDecoder, FaceMatcher, OcrEngine};
use crate::storage::session_store::SessionStore;
use crate::utils::error::{KycError, Result};

use session::{
    DocumentKind, ExtractionResult, IdentityClaim, SessionSnapshot, SessionState,
    VerificationSession,
};

/// Claim intake payload as submitted by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimSubmission {
    pub full_name: String,
    pub date_of_birth: String,
    pub aadhaar_last4: String,
    pub pan_number: Option<String>,
}

/// One uploaded document on its way into the pipeline.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct VerificationPipeline {
    sessions: Arc<SessionStore>,
    decoder: Arc<dyn DocumentDecoder>,
    ocr: Arc<dyn OcrEngine>,
    face: Arc<dyn FaceMatcher>,
    risk: RiskScorer,
}

impl VerificationPipeline {
    pub fn new(
        sessions: Arc<SessionStore>,
        decoder: Arc<dyn DocumentDecoder>,
        ocr: Arc<dyn OcrEngine>,
        face: Arc<dyn FaceMatcher>,
        risk: RiskScorer,
    ) -> Self {
        Self {
            sessions,
            decoder,
            ocr,
            face,
            risk,
        }
    }

    /// Claim intake. A malformed claim never creates a session: the caller
    /// stays at the intake step with the full list of problems.
    pub fn start_session(&self, submission: ClaimSubmission) -> Result<SessionSnapshot> {
        let claim = validate_claim(&submission)?;

        let mut session = VerificationSession::new(claim);
        session.advance(SessionState::DocumentsPending);
        info!(session = %session.id, "claim accepted, awaiting documents");

        let snapshot = session.snapshot();
        self.sessions.insert(session);
        Ok(snapshot)
    }

    /// Document upload and validation. Mismatches and unreadable documents
    /// accumulate so the user sees every problem at once; the claim and
    /// session survive a failed submission for resubmission.
    pub async fn submit_documents(
        &self,
        id: Uuid,
        aadhaar_upload: DocumentUpload,
        pan_upload: Option<DocumentUpload>,
    ) -> Result<SessionSnapshot> {
        let handle = self.session_handle(&id)?;
        let mut session = handle.lock().await;

        if session.state != SessionState::DocumentsPending {
            return Err(KycError::InvalidState(format!(
                "documents cannot be submitted while the session is {:?}",
                session.state
            )));
        }
        session.touch();

        let mut errors = Vec::new();

        let image = self
            .decoder
            .decode(&aadhaar_upload.bytes, &aadhaar_upload.filename, DocumentKind::Aadhaar)
            .await?;
        let (normalized, blur_score) = enhance_card_image(image);
        let text = self.ocr.extract_text(&normalized).await;
        let extraction = ExtractionResult {
            number: extract_aadhaar_number(&text),
            full_text: text,
        };

        match extraction.number.as_deref() {
            None => errors.push("could not read an Aadhaar number from the document".to_string()),
            Some(number) if !number.ends_with(&session.claim.aadhaar_last4) => {
                errors.push(format!(
                    "Aadhaar number mismatch: the document ends in {}",
                    &number[number.len() - 4..]
                ));
            }
            Some(_) => {}
        }

        session.blur_score = Some(blur_score);
        session.aadhaar = Some(extraction);

        if let Some(upload) = pan_upload {
            let image = self
                .decoder
                .decode(&upload.bytes, &upload.filename, DocumentKind::Pan)
                .await?;
            let (normalized_pan, _) = enhance_card_image(image);
            let text = self.ocr.extract_text(&normalized_pan).await;
            let extraction = ExtractionResult {
                number: extract_pan_number(&text),
                full_text: text,
            };

            if let Some(declared) = session.claim.pan_number.clone() {
                match extraction.number.as_deref() {
                    None => errors.push(
                        "a PAN document was uploaded but no PAN number could be read from it"
                            .to_string(),
                    ),
                    Some(found) if found != declared => {
                        errors.push(format!("PAN number mismatch: the document shows {}", found));
                    }
                    Some(_) => {}
                }
            }

            session.pan = Some(extraction);
        }

        if !errors.is_empty() {
            warn!(session = %id, problems = errors.len(), "document validation failed");
            session.validation_errors = errors.clone();
            return Err(KycError::Validation(errors));
        }

        session.validation_errors.clear();
        session.document_image = Some(persist_image(&normalized)?);
        session.advance(SessionState::DocumentsValidated);
        // arming the live-photo capture needs no further user action
        session.advance(SessionState::FacePending);
        info!(session = %id, "documents validated");

        Ok(session.snapshot())
    }

    /// Live photo submission and final decision. Webcam captures and photo
    /// uploads arrive as the same byte payload.
    pub async fn submit_live_photo(&self, id: Uuid, photo: Vec<u8>) -> Result<SessionSnapshot> {
        let handle = self.session_handle(&id)?;
        let mut session = handle.lock().await;

        if session.state != SessionState::FacePending {
            return Err(KycError::InvalidState(format!(
                "a live photo cannot be submitted while the session is {:?}",
                session.state
            )));
        }
        session.touch();

        let live = image::load_from_memory(&photo)
            .map_err(|e| KycError::Decode(format!("could not decode the live photo: {}", e)))?;

        let document_path = match session.document_image.as_ref() {
            Some(file) => file.path().to_path_buf(),
            None => {
                error!(session = %id, "document image missing at the face stage");
                session.advance(SessionState::Aborted);
                return Err(KycError::Session(
                    "session state is corrupted; restart verification".to_string(),
                ));
            }
        };

        // Released on every exit path below, including engine failure.
        let live_file = persist_image(&live)?;

        let result = match self.face.compare(&document_path, live_file.path()).await {
            Ok(result) => result,
            Err(e) => {
                warn!(session = %id, "face engine failure: {}", e);
                return Err(e);
            }
        };

        let aadhaar_number = session
            .aadhaar
            .as_ref()
            .and_then(|extraction| extraction.number.clone())
            .unwrap_or_default();
        let identifier_match =
            if !aadhaar_number.is_empty() && aadhaar_number.ends_with(&session.claim.aadhaar_last4) {
                100.0
            } else {
                0.0
            };
        let checksum_valid = aadhaar::validate_aadhaar_number(&aadhaar_number);
        let blur_score = session.blur_score.unwrap_or(0.0);

        let assessment = self
            .risk
            .score(result.score, identifier_match, checksum_valid, blur_score);

        // The verdict alone decides; the risk score is recorded for audit.
        let approved = result.matched;
        info!(
            session = %id,
            approved,
            face_score = result.score,
            risk = assessment.score,
            risk_source = ?assessment.source,
            "verification decided"
        );

        session.face = Some(result);
        session.risk = Some(assessment);
        session.approved = Some(approved);
        session.advance(SessionState::Decided);
        // the retained document image has served its purpose
        session.document_image = None;

        Ok(session.snapshot())
    }

    pub async fn session_view(&self, id: Uuid) -> Result<SessionSnapshot> {
        let handle = self.session_handle(&id)?;
        let session = handle.lock().await;
        Ok(session.snapshot())
    }

    /// Explicit restart: the attempt and its retained files are discarded.
    pub fn restart(&self, id: Uuid) -> Result<()> {
        if self.sessions.remove(&id) {
            info!(session = %id, "session restarted");
            Ok(())
        } else {
            Err(KycError::Session(format!("unknown session {}", id)))
        }
    }

    fn session_handle(
        &self,
        id: &Uuid,
    ) -> Result<Arc<tokio::sync::Mutex<VerificationSession>>> {
        self.sessions
            .get(id)
            .ok_or_else(|| KycError::Session(format!("unknown session {}", id)))
    }
}

fn validate_claim(submission: &ClaimSubmission) -> Result<IdentityClaim> {
    let mut errors = Vec::new();

    let full_name = submission.full_name.trim().to_string();
    if full_name.is_empty() {
        errors.push("full name must not be empty".to_string());
    }

    let date_of_birth = match NaiveDate::parse_from_str(submission.date_of_birth.trim(), "%Y-%m-%d")
    {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push("date of birth must be a valid YYYY-MM-DD date".to_string());
            None
        }
    };

    let aadhaar_last4 = submission.aadhaar_last4.trim().to_string();
    if aadhaar_last4.len() != 4 || !aadhaar_last4.bytes().all(|b| b.is_ascii_digit()) {
        errors.push("the Aadhaar last-4 field must be exactly 4 digits".to_string());
    }

    let pan_number = match submission.pan_number.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let normalized = raw.to_ascii_uppercase();
            if pan::validate_pan_number(&normalized) {
                Some(normalized)
            } else {
                errors.push(format!("{} is not a valid PAN number", raw));
                None
            }
        }
    };

    match (errors.is_empty(), date_of_birth) {
        (true, Some(date_of_birth)) => Ok(IdentityClaim {
            full_name,
            date_of_birth,
            aadhaar_last4,
            pan_number,
        }),
        _ => Err(KycError::Validation(errors)),
    }
}

fn persist_image(image: &DynamicImage) -> Result<NamedTempFile> {
    let file = tempfile::Builder::new()
        .prefix("kyc-img-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| KycError::Io(e.to_string()))?;
    image
        .save_with_format(file.path(), ImageFormat::Png)
        .map_err(|e| KycError::Io(e.to_string()))?;
    Ok(file)
}
