// src/core/risk/model.rs
use serde::Deserialize;
use std::path::Path;

use crate::utils::error::{KycError, Result};

/// Logistic-regression fraud classifier, trained offline and shipped as a
/// JSON artifact. Only inference lives here.
#[derive(Debug, Clone, Deserialize)]
pub struct FraudModel {
    weights: Vec<f64>,
    bias: f64,
}

impl FraudModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read(path.as_ref()).map_err(|e| KycError::Io(e.to_string()))?;
        serde_json::from_slice(&raw)
            .map_err(|e| KycError::Config(format!("invalid fraud model artifact: {}", e)))
    }

    /// Probability of the positive (fraud) class for a feature vector.
    pub fn predict_fraud_probability(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.weights.len() {
            return Err(KycError::Engine(format!(
                "fraud model expects {} features, got {}",
                self.weights.len(),
                features.len()
            )));
        }

        let z: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;

        Ok(1.0 / (1.0 + (-z).exp()))
    }
}
