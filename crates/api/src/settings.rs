//! Service settings

use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use data_validator::ValidationConfig;
use inference_engine::{ModelSpec, RiskTask};
use rule_engine::ClinicalThresholds;
use serde::Deserialize;
use std::path::PathBuf;

/// Settings file used when `ANTENATAL_CONFIG` is unset (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

/// Top-level settings.
///
/// Layered from an optional settings file and `ANTENATAL__*` environment
/// variables (`ANTENATAL__SERVER__BIND=0.0.0.0:9000`). Every section falls
/// back to its defaults when absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub models: ModelSettings,
    pub thresholds: ClinicalThresholds,
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Listen address
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Max level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Directory searched for `<task>_<member>.onnx` when an ensemble lists no paths
    pub dir: PathBuf,
    pub pregnancy: ModelSpec,
    pub fetal: ModelSpec,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            pregnancy: ModelSpec::default(),
            fetal: ModelSpec::default(),
        }
    }
}

impl ModelSettings {
    /// Model spec for a task with file paths filled in
    pub fn spec(&self, task: RiskTask) -> ModelSpec {
        let spec = match task {
            RiskTask::Pregnancy => &self.pregnancy,
            RiskTask::Fetal => &self.fetal,
        };
        if spec.paths.is_empty() {
            ModelSpec {
                paths: ModelSpec::in_dir(&self.dir, task).paths,
                ..spec.clone()
            }
        } else {
            spec.clone()
        }
    }
}

impl Settings {
    /// Load from the file named by `ANTENATAL_CONFIG` (or the default path)
    /// and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("ANTENATAL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from a specific settings file, which may be missing, and the environment
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::with_name(path).required(false)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(
                Environment::with_prefix("ANTENATAL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use inference_engine::VotingStrategy;

    fn from_toml(toml: &str) -> Settings {
        Settings::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml))).unwrap()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load_from("does/not/exist").unwrap();
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.thresholds, ClinicalThresholds::default());
    }

    #[test]
    fn test_partial_override() {
        let settings = from_toml(
            r#"
            [server]
            bind = "127.0.0.1:9000"

            [models.fetal]
            voting = "hard"

            [thresholds.gdm]
            fasting = 95.0
            "#,
        );

        assert_eq!(settings.server.bind, "127.0.0.1:9000");
        assert_eq!(settings.models.fetal.voting, VotingStrategy::Hard);
        assert_eq!(settings.thresholds.gdm.fasting, 95.0);
        assert_eq!(settings.thresholds.gdm.one_hour, ClinicalThresholds::default().gdm.one_hour);
    }

    #[test]
    fn test_model_paths_default_to_dir() {
        let settings = from_toml(
            r#"
            [models]
            dir = "/srv/models"
            "#,
        );
        let spec = settings.models.spec(RiskTask::Pregnancy);
        assert_eq!(spec.paths[0], PathBuf::from("/srv/models/pregnancy_random_forest.onnx"));
        assert_eq!(spec.voting, VotingStrategy::Soft);
    }

    #[test]
    fn test_explicit_model_paths_kept() {
        let settings = from_toml(
            r#"
            [models.pregnancy]
            paths = ["a.onnx", "b.onnx", "c.onnx"]
            probability_output = 0
            "#,
        );
        let spec = settings.models.spec(RiskTask::Pregnancy);
        assert_eq!(spec.paths[2], PathBuf::from("c.onnx"));
        assert_eq!(spec.probability_output, 0);
    }
}
