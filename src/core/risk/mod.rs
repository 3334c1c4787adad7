// src/core/risk/mod.rs
//
// Combines the face-match score, the identifier match, checksum validity
// and the scan quality into one 0-100 fraud risk number. A trained model
// is preferred when an artifact is configured; the deterministic heuristic
// is always available as the fallback.

pub mod model;

use serde::Serialize;
use tracing::{info, warn};

use crate::utils::config::RiskConfig;
use model::FraudModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSource {
    Model,
    Heuristic,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub source: RiskSource,
}

pub struct RiskScorer {
    model: Option<FraudModel>,
}

impl RiskScorer {
    pub fn new(model: Option<FraudModel>) -> Self {
        Self { model }
    }

    /// Loads the configured model artifact if there is one. A missing or
    /// unreadable artifact is a normal configuration, not an error: the
    /// scorer simply stays on the heuristic path.
    pub fn from_config(config: &RiskConfig) -> Self {
        let model = config.model_path.as_ref().and_then(|path| {
            match FraudModel::load(path) {
                Ok(model) => {
                    info!("loaded fraud model from {}", path);
                    Some(model)
                }
                Err(e) => {
                    warn!("could not load fraud model from {}: {}", path, e);
                    None
                }
            }
        });
        if model.is_none() {
            info!("no fraud model available, heuristic risk scoring active");
        }
        Self { model }
    }

    /// Never fails: any model trouble falls through to the heuristic, and
    /// the result is tagged with whichever path produced it.
    pub fn score(
        &self,
        face_match: f64,
        identifier_match: f64,
        checksum_valid: bool,
        blur_score: f64,
    ) -> RiskAssessment {
        let face_pct = to_percent(face_match);
        let identifier_pct = to_percent(identifier_match);

        if let Some(model) = &self.model {
            let features = [face_pct, identifier_pct, if checksum_valid { 1.0 } else { 0.0 }];
            match model.predict_fraud_probability(&features) {
                Ok(probability) => {
                    return RiskAssessment {
                        score: (probability * 100.0).clamp(0.0, 100.0),
                        source: RiskSource::Model,
                    }
                }
                Err(e) => warn!("fraud model inference failed, using heuristic: {}", e),
            }
        }

        let mut risk: f64 = 50.0;

        // Penalties
        if !checksum_valid {
            risk += 50.0; // an invalid government-ID checksum dominates everything else
        }
        if blur_score < 60.0 {
            risk += 20.0;
        }

        // Rewards
        if identifier_pct > 80.0 {
            risk -= 20.0;
        }
        if face_pct > 80.0 {
            risk -= 20.0;
        }

        RiskAssessment {
            score: risk.clamp(0.0, 100.0),
            source: RiskSource::Heuristic,
        }
    }
}

/// Inputs may arrive as fractions in [0,1] or as percentages; anything at
/// or below 1 is treated as a fraction.
fn to_percent(value: f64) -> f64 {
    if value <= 1.0 {
        value * 100.0
    } else {
        value
    }
}
