use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::attainment::{EngineConfig, MissingIndirect, PolicyViolation, SurveyScale};

/// Distinguishes runtime behavior for different stages of deployment.
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
    pub dataset: DatasetConfig,
    pub engine: EngineConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("OBE_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let path = env::var("OBE_DATASET")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let scale_min = parse_level("OBE_SURVEY_SCALE_MIN", SurveyScale::ATTAINMENT.min())?;
        let scale_max = parse_level("OBE_SURVEY_SCALE_MAX", SurveyScale::ATTAINMENT.max())?;
        let survey_scale =
            SurveyScale::new(scale_min, scale_max).map_err(ConfigError::SurveyScale)?;

        let missing_indirect = match env::var("OBE_MISSING_INDIRECT") {
            Ok(value) => MissingIndirect::parse(&value)
                .ok_or(ConfigError::InvalidMissingIndirect(value))?,
            Err(_) => MissingIndirect::default(),
        };

        let log_level = env::var("OBE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            dataset: DatasetConfig { path },
            engine: EngineConfig {
                survey_scale,
                missing_indirect,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_level(key: &'static str, default: u8) -> Result<u8, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u8>()
            .map_err(|_| ConfigError::InvalidLevel { key, value }),
        Err(_) => Ok(default),
    }
}

/// Location of the dataset the CLI loads when none is passed explicitly.
#[derive(Debug, Clone, Default)]
pub struct DatasetConfig {
    pub path: Option<PathBuf>,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidLevel { key: &'static str, value: String },
    SurveyScale(PolicyViolation),
    InvalidMissingIndirect(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidLevel { key, value } => {
                write!(f, "{key} must be a survey level between 0 and 255, got '{value}'")
            }
            ConfigError::SurveyScale(err) => write!(f, "invalid survey scale: {err}"),
            ConfigError::InvalidMissingIndirect(value) => write!(
                f,
                "OBE_MISSING_INDIRECT must be 'zero' or 'direct-only', got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::SurveyScale(err) => Some(err),
            ConfigError::InvalidLevel { .. } | ConfigError::InvalidMissingIndirect(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("OBE_ENV");
        env::remove_var("OBE_DATASET");
        env::remove_var("OBE_SURVEY_SCALE_MIN");
        env::remove_var("OBE_SURVEY_SCALE_MAX");
        env::remove_var("OBE_MISSING_INDIRECT");
        env::remove_var("OBE_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert!(config.dataset.path.is_none());
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_survey_scale_and_missing_indirect_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("OBE_ENV", "ci");
        env::set_var("OBE_SURVEY_SCALE_MIN", "1");
        env::set_var("OBE_SURVEY_SCALE_MAX", "5");
        env::set_var("OBE_MISSING_INDIRECT", "direct-only");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(
            config.engine.survey_scale,
            SurveyScale::new(1, 5).expect("valid scale")
        );
        assert_eq!(config.engine.missing_indirect, MissingIndirect::DirectOnly);
    }

    #[test]
    fn rejects_inverted_survey_scale() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("OBE_SURVEY_SCALE_MIN", "4");
        env::set_var("OBE_SURVEY_SCALE_MAX", "2");
        let result = AppConfig::load();
        reset_env();

        assert!(matches!(result, Err(ConfigError::SurveyScale(_))));
    }

    #[test]
    fn rejects_unknown_missing_indirect_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("OBE_MISSING_INDIRECT", "guess");
        let result = AppConfig::load();
        reset_env();

        match result {
            Err(ConfigError::InvalidMissingIndirect(value)) => assert_eq!(value, "guess"),
            other => panic!("expected invalid policy error, got {other:?}"),
        }
    }
}
