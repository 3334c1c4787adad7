// src/engines/face.rs
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use super::FaceMatcher;
use crate::core::pipeline::session::FaceMatchResult;
use crate::utils::error::{KycError, Result};

/// What the external face tool prints on stdout.
#[derive(Debug, Deserialize)]
struct EngineVerdict {
    #[serde(default)]
    verified: Option<bool>,
    #[serde(default)]
    distance: Option<f64>,
    #[serde(default)]
    error: Option<String>,
}

/// Default face bridge: runs the configured comparison tool with the two
/// image paths and parses its JSON verdict.
pub struct CommandFaceMatcher {
    command: String,
    call_timeout: Duration,
}

impl CommandFaceMatcher {
    pub fn new(command: String, call_timeout: Duration) -> Self {
        Self {
            command,
            call_timeout,
        }
    }

    fn parse_verdict(stdout: &str) -> Result<FaceMatchResult> {
        let verdict: EngineVerdict = serde_json::from_str(stdout.trim())
            .map_err(|e| KycError::Engine(format!("unparseable face engine output: {}", e)))?;

        if let Some(message) = verdict.error {
            // The engine ran but could not compare (e.g. no face detected):
            // a normal negative outcome, not an engine failure.
            return Ok(FaceMatchResult {
                matched: false,
                score: 0.0,
                error: Some(message),
            });
        }

        match (verdict.verified, verdict.distance) {
            (Some(matched), Some(distance)) => {
                // Cosine distance: 0 = identical, 1 = unrelated. Invert to a
                // similarity percentage, two decimal places.
                let score = (((1.0 - distance) * 100.0).clamp(0.0, 100.0) * 100.0).round() / 100.0;
                Ok(FaceMatchResult {
                    matched,
                    score,
                    error: None,
                })
            }
            _ => Err(KycError::Engine(
                "face engine output is missing verdict fields".to_string(),
            )),
        }
    }
}

#[async_trait]
impl FaceMatcher for CommandFaceMatcher {
    async fn compare(&self, document: &Path, live: &Path) -> Result<FaceMatchResult> {
        let output = timeout(
            self.call_timeout,
            Command::new(&self.command).arg(document).arg(live).output(),
        )
        .await
        .map_err(|_| {
            KycError::Engine(format!(
                "face engine timed out after {:?}",
                self.call_timeout
            ))
        })?
        .map_err(|e| KycError::Engine(format!("failed to launch {}: {}", self.command, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let result = Self::parse_verdict(&stdout)?;
        debug!(matched = result.matched, score = result.score, "face comparison complete");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_verdict_maps_distance_to_similarity() {
        let result =
            CommandFaceMatcher::parse_verdict(r#"{"verified": true, "distance": 0.13}"#).unwrap();
        assert!(result.matched);
        assert_eq!(result.score, 87.0);
        assert!(result.error.is_none());
    }

    #[test]
    fn negative_verdict_is_a_normal_outcome() {
        let result =
            CommandFaceMatcher::parse_verdict(r#"{"verified": false, "distance": 0.88}"#).unwrap();
        assert!(!result.matched);
        assert!((result.score - 12.0).abs() < 1e-9);
    }

    #[test]
    fn engine_error_field_is_a_soft_failure() {
        let result = CommandFaceMatcher::parse_verdict(r#"{"error": "no face detected"}"#).unwrap();
        assert!(!result.matched);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.error.as_deref(), Some("no face detected"));
    }

    #[test]
    fn out_of_range_distance_is_clamped() {
        let result =
            CommandFaceMatcher::parse_verdict(r#"{"verified": false, "distance": 1.4}"#).unwrap();
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn garbage_output_is_a_hard_failure() {
        assert!(CommandFaceMatcher::parse_verdict("Traceback (most recent call)").is_err());
        assert!(CommandFaceMatcher::parse_verdict("{}").is_err());
    }
}
