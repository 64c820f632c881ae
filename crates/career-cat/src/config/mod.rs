use std::env;
use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::assessment::{ScoringConfig, ScoringConfigError, ScoringEngine, ScoringOptions};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub assessment: AssessmentSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let max_questions = env::var("ASSESSMENT_MAX_QUESTIONS")
            .unwrap_or_else(|_| ScoringOptions::DEFAULT_MAX_QUESTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidMaxQuestions)?;

        let stop_at_confidence = env::var("ASSESSMENT_STOP_AT")
            .unwrap_or_else(|_| ScoringOptions::DEFAULT_STOP_AT_CONFIDENCE.to_string())
            .parse::<f64>()
            .ok()
            .filter(|value| ScoringOptions::stop_at_in_range(*value))
            .ok_or(ConfigError::InvalidStopAt)?;

        let scoring_config_path = env::var("ASSESSMENT_SCORING_CONFIG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            assessment: AssessmentSettings {
                defaults: ScoringOptions {
                    max_questions,
                    stop_at_confidence,
                },
                scoring_config_path,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Assessment flow defaults and the optional scoring table override.
#[derive(Debug, Clone)]
pub struct AssessmentSettings {
    pub defaults: ScoringOptions,
    pub scoring_config_path: Option<PathBuf>,
}

impl AssessmentSettings {
    /// Scoring tables from the override file, or the built-in tables.
    pub fn scoring_config(&self) -> Result<ScoringConfig, ConfigError> {
        let config = match &self.scoring_config_path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| {
                    ConfigError::ScoringConfigRead {
                        path: path.clone(),
                        source,
                    }
                })?;
                serde_json::from_str::<ScoringConfig>(&raw).map_err(|source| {
                    ConfigError::ScoringConfigParse {
                        path: path.clone(),
                        source,
                    }
                })?
            }
            None => ScoringConfig::standard(),
        };

        Ok(config)
    }

    /// Load and validate the scoring tables once at startup.
    pub fn scoring_engine(&self) -> Result<ScoringEngine, ConfigError> {
        let engine = ScoringEngine::new(self.scoring_config()?)?;
        Ok(engine)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidMaxQuestions,
    InvalidStopAt,
    ScoringConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    ScoringConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Scoring(ScoringConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMaxQuestions => {
                write!(f, "ASSESSMENT_MAX_QUESTIONS must be a non-negative integer")
            }
            ConfigError::InvalidStopAt => {
                write!(f, "ASSESSMENT_STOP_AT must be a number in (0, 1]")
            }
            ConfigError::ScoringConfigRead { path, .. } => {
                write!(f, "unable to read scoring config {}", path.display())
            }
            ConfigError::ScoringConfigParse { path, .. } => {
                write!(f, "scoring config {} is not valid JSON", path.display())
            }
            ConfigError::Scoring(err) => write!(f, "invalid scoring config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidMaxQuestions
            | ConfigError::InvalidStopAt => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::ScoringConfigRead { source, .. } => Some(source),
            ConfigError::ScoringConfigParse { source, .. } => Some(source),
            ConfigError::Scoring(err) => Some(err),
        }
    }
}

impl From<ScoringConfigError> for ConfigError {
    fn from(value: ScoringConfigError) -> Self {
        Self::Scoring(value)
    }
}
