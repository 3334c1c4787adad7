// src/core/pipeline/session.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

use crate::core::risk::RiskAssessment;
use crate::core::validation::aadhaar;

/// Pipeline states, strictly forward. Both approval and rejection land in
/// `Decided`; `Aborted` is only reachable on irrecoverable corruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    ClaimPending,
    DocumentsPending,
    DocumentsValidated,
    FacePending,
    Decided,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Aadhaar,
    Pan,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Aadhaar => write!(f, "Aadhaar"),
            DocumentKind::Pan => write!(f, "PAN"),
        }
    }
}

/// User-declared facts from claim intake. Immutable for the session.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityClaim {
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub aadhaar_last4: String,
    pub pan_number: Option<String>,
}

/// What the OCR + extraction step read off one document. The full text is
/// kept for audit and display.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub number: Option<String>,
    pub full_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceMatchResult {
    pub matched: bool,
    pub score: f64,
    pub error: Option<String>,
}

/// One verification attempt. Owned by the session store behind a
/// per-session lock; every stage mutates it exclusively.
#[derive(Debug)]
pub struct VerificationSession {
    pub id: Uuid,
    pub claim: IdentityClaim,
    pub state: SessionState,
    /// Problems from the most recent failed document submission.
    pub validation_errors: Vec<String>,
    pub aadhaar: Option<ExtractionResult>,
    pub pan: Option<ExtractionResult>,
    pub blur_score: Option<f64>,
    /// Normalized Aadhaar image, retained for face matching and released
    /// at decision, restart or eviction (dropping deletes the file).
    pub document_image: Option<NamedTempFile>,
    pub face: Option<FaceMatchResult>,
    pub risk: Option<RiskAssessment>,
    pub approved: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VerificationSession {
    pub fn new(claim: IdentityClaim) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            claim,
            state: SessionState::ClaimPending,
            validation_errors: Vec::new(),
            aadhaar: None,
            pan: None,
            blur_score: None,
            document_image: None,
            face: None,
            risk: None,
            approved: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn advance(&mut self, next: SessionState) {
        debug!(session = %self.id, from = ?self.state, to = ?next, "pipeline transition");
        self.state = next;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_idle_longer_than(&self, ttl: chrono::Duration) -> bool {
        Utc::now() - self.updated_at > ttl
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            state: self.state,
            full_name: self.claim.full_name.clone(),
            date_of_birth: self.claim.date_of_birth,
            aadhaar_masked: self
                .aadhaar
                .as_ref()
                .and_then(|extraction| extraction.number.as_deref())
                .map(aadhaar::mask_aadhaar),
            pan_number: self
                .pan
                .as_ref()
                .and_then(|extraction| extraction.number.clone()),
            validation_errors: self.validation_errors.clone(),
            blur_score: self.blur_score,
            face: self.face.clone(),
            risk: self.risk.clone(),
            approved: self.approved,
        }
    }
}

/// Serializable view of a session for display. Identifiers are masked.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub state: SessionState,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub aadhaar_masked: Option<String>,
    pub pan_number: Option<String>,
    pub validation_errors: Vec<String>,
    pub blur_score: Option<f64>,
    pub face: Option<FaceMatchResult>,
    pub risk: Option<RiskAssessment>,
    pub approved: Option<bool>,
}
