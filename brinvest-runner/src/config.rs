//! Pipeline configuration loaded from TOML.
//!
//! Every key is optional: an empty file (or no file at all) yields the fixed
//! default layout under `data/` and `output/`. Unknown keys are rejected.
//!
//! ```toml
//! [inputs]
//! market = "data/dados_mercado.csv"
//!
//! [outputs]
//! dir = "output"
//! write_summary = false
//!
//! [style]
//! dpi = 150
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use brinvest_charts::ChartStyle;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Input and output locations plus chart style for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub inputs: InputPaths,
    pub outputs: OutputPaths,
    pub style: ChartStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputPaths {
    /// Comma-delimited yearly market indicators.
    pub market: PathBuf,
    /// Semicolon-delimited investor profile export.
    pub profile: PathBuf,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            market: PathBuf::from("data/dados_mercado.csv"),
            profile: PathBuf::from("data/InvestidoresTesouroDireto2024.csv"),
        }
    }
}

/// Output directory and artifact file names inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputPaths {
    pub dir: PathBuf,
    pub market_dashboard: String,
    pub profile_dashboard: String,
    pub report: String,
    pub summary: String,
    pub write_report: bool,
    pub write_summary: bool,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            market_dashboard: "dashboardMercadoFinanceiro.png".to_string(),
            profile_dashboard: "dashboardTesouroDireto.png".to_string(),
            report: "relatorioMercado.csv".to_string(),
            summary: "resumoCrescimento.json".to_string(),
            write_report: true,
            write_summary: true,
        }
    }
}

impl OutputPaths {
    pub fn market_dashboard_path(&self) -> PathBuf {
        self.dir.join(&self.market_dashboard)
    }

    pub fn profile_dashboard_path(&self) -> PathBuf {
        self.dir.join(&self.profile_dashboard)
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.join(&self.report)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(&self.summary)
    }
}

impl PipelineConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.style.dpi == 0 {
            return Err(ConfigError::Invalid("style.dpi must be positive".into()));
        }
        if !(self.style.font_size_pt.is_finite() && self.style.font_size_pt > 0.0) {
            return Err(ConfigError::Invalid(
                "style.font_size_pt must be a positive number".into(),
            ));
        }
        let names = [
            ("market_dashboard", &self.outputs.market_dashboard),
            ("profile_dashboard", &self.outputs.profile_dashboard),
            ("report", &self.outputs.report),
            ("summary", &self.outputs.summary),
        ];
        for (key, name) in names {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "outputs.{key} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(
            config.outputs.report_path(),
            PathBuf::from("output/relatorioMercado.csv")
        );
        assert_eq!(config.style.dpi, 300);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [outputs]
            dir = "relatorios"
            write_summary = false

            [style]
            dpi = 120
            "#,
        )
        .unwrap();
        assert_eq!(
            config.outputs.market_dashboard_path(),
            PathBuf::from("relatorios/dashboardMercadoFinanceiro.png")
        );
        assert!(config.outputs.write_report);
        assert!(!config.outputs.write_summary);
        assert_eq!(config.style.dpi, 120);
        assert_eq!(config.style.font_family, "sans-serif");
        assert_eq!(config.inputs, InputPaths::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = PipelineConfig::from_toml_str("[inputs]\nmercado = \"x.csv\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = PipelineConfig::from_toml_str("verbose = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = PipelineConfig::from_toml_str("[style]\ndpi = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = PipelineConfig::from_toml_str("[outputs]\nreport = \" \"\n").unwrap_err();
        assert!(err.to_string().contains("outputs.report"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = PipelineConfig::load("nao/existe.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
