//! Explorer configuration
//!
//! Defaults reproduce the calibrated engine and the built-in dataset. A TOML
//! file can override any section; LLM settings can also come from the
//! environment.

use crate::core::error::{ExplorerError, Result};
use crate::engine::{CoefficientTable, PredictionEngine, DEFAULT_ROUNDS};
use crate::indicators::IndicatorStore;
use crate::llm::client::ApiFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub engine: EngineSettings,
    pub data: DataSettings,
    pub llm: LlmSettings,
}

/// Prediction engine settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Fixed-point rounds per prediction
    ///
    /// Three rounds are enough for the calibrated coefficients. The system
    /// is not guaranteed to converge, so this is a cap rather than a target.
    pub rounds: u32,

    /// Replacement coefficient table; `None` uses the calibrated constants
    pub coefficients: Option<CoefficientTable>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            coefficients: None,
        }
    }
}

/// Where baseline data comes from
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Country dataset file; `None` uses the embedded table
    pub countries: Option<PathBuf>,
}

/// Text-generation endpoint settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub api_url: String,
    /// Wire format; detected from `api_url` when unset
    pub format: Option<ApiFormat>,
    pub model: String,
    /// Model tried when the primary call fails
    pub fallback_model: Option<String>,
    /// Abort a request after this many seconds
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com/v1/messages".into(),
            format: None,
            model: "claude-3-haiku-20240307".into(),
            fallback_model: None,
            timeout_secs: 30,
        }
    }
}

impl ExplorerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ExplorerConfig = toml::from_str(content)
            .map_err(|e| ExplorerError::ConfigError(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `LLM_API_URL`, `LLM_MODEL` and `LLM_FALLBACK_MODEL` overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("LLM_API_URL") {
            self.llm.api_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Ok(model) = std::env::var("LLM_FALLBACK_MODEL") {
            self.llm.fallback_model = Some(model);
        }
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(1..=50).contains(&self.engine.rounds) {
            return Err(ExplorerError::ConfigError(format!(
                "engine.rounds ({}) should be between 1 and 50",
                self.engine.rounds
            )));
        }
        if let Some(table) = &self.engine.coefficients {
            table.validate()?;
        }
        if self.llm.timeout_secs == 0 {
            return Err(ExplorerError::ConfigError(
                "llm.timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn coefficient_table(&self) -> CoefficientTable {
        self.engine.coefficients.clone().unwrap_or_default()
    }

    pub fn build_engine(&self) -> Result<PredictionEngine> {
        PredictionEngine::new(self.coefficient_table(), self.engine.rounds)
    }

    pub fn build_store(&self) -> Result<IndicatorStore> {
        match &self.data.countries {
            Some(path) => IndicatorStore::load(path, self.coefficient_table()),
            None => IndicatorStore::builtin_with(self.coefficient_table()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ExplorerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.rounds, 3);
        assert_eq!(config.llm.timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ExplorerConfig::from_toml_str(
            r#"
[engine]
rounds = 5

[llm]
fallback_model = "claude-3-5-haiku-latest"
"#,
        )
        .unwrap();
        assert_eq!(config.engine.rounds, 5);
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(
            config.llm.fallback_model.as_deref(),
            Some("claude-3-5-haiku-latest")
        );
        assert!(config.data.countries.is_none());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let result = ExplorerConfig::from_toml_str("[engine]\nrounds = 0\n");
        assert!(matches!(result, Err(ExplorerError::ConfigError(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = ExplorerConfig::from_toml_str("[llm]\ntimeout_secs = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_build_engine_and_store() {
        let config = ExplorerConfig::default();
        let engine = config.build_engine().unwrap();
        assert_eq!(engine.rounds(), 3);
        let store = config.build_store().unwrap();
        assert!(store.contains("Japan"));
    }
}
