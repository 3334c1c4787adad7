use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::utils::error::{KycError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub engines: EngineConfig,
    pub risk: RiskConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub tesseract_cmd: String,
    pub pdftoppm_cmd: String,
    pub face_cmd: String,
    pub call_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    pub model_path: Option<String>,
}

impl Config {
    pub fn new() -> Result<Self> {
        let config = ConfigLib::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.allowed_origins", Vec::<String>::new())?
            .set_default("server.max_upload_bytes", 16 * 1024 * 1024)? // 16MB
            .set_default("session.ttl_secs", 1800)?
            .set_default("session.sweep_interval_secs", 300)?
            .set_default("engines.tesseract_cmd", "tesseract")?
            .set_default("engines.pdftoppm_cmd", "pdftoppm")?
            .set_default("engines.face_cmd", "face-match")?
            .set_default("engines.call_timeout_secs", 30)?
            // Load from config file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (e.g., APP_SERVER_PORT)
            .add_source(Environment::with_prefix("APP").separator("_"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(KycError::Config("Invalid port number".into()));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(KycError::Config("max_upload_bytes must be greater than 0".into()));
        }
        if self.session.ttl_secs == 0 {
            return Err(KycError::Config("ttl_secs must be greater than 0".into()));
        }
        if self.session.sweep_interval_secs == 0 {
            return Err(KycError::Config("sweep_interval_secs must be greater than 0".into()));
        }
        if self.engines.call_timeout_secs == 0 {
            return Err(KycError::Config("call_timeout_secs must be greater than 0".into()));
        }
        if self.engines.tesseract_cmd.is_empty()
            || self.engines.pdftoppm_cmd.is_empty()
            || self.engines.face_cmd.is_empty()
        {
            return Err(KycError::Config("engine commands must be set".into()));
        }
        Ok(())
    }

    pub fn engine_call_timeout(&self) -> Duration {
        Duration::from_secs(self.engines.call_timeout_secs)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session.sweep_interval_secs)
    }
}

impl From<ConfigError> for KycError {
    fn from(error: ConfigError) -> Self {
        KycError::Config(error.to_string())
    }
}
