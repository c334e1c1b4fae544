use std::env;
use std::path::PathBuf;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MODEL_PATH: &str = "mood_model.json";
const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

/// Configuration for the prediction service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Artifact written by the trainer
    pub model_path: PathBuf,
    /// Origins allowed to call the API from a browser
    pub allowed_origins: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT: {port}")))?,
            None => defaults.port,
        };

        let allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
            None => defaults.allowed_origins,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            model_path: lookup("MOOD_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            allowed_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
        }
    }
}

impl std::error::Error for ConfigError {}
