use std::path::{Path, PathBuf};

use probemodel::{LambdaGrid, ScaleConfig};
use serde::Deserialize;
use tracing::info;

use crate::error::{Result, VizError};

/// File looked up in the working directory by the binary
pub const CONFIG_FILE: &str = "probeviz.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}

/// Everything a pipeline run needs; every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub resize_path: PathBuf,
    pub load_factor_path: PathBuf,
    pub output_dir: PathBuf,
    pub scale: ScaleConfig,
    pub grid: LambdaGrid,
    pub chart: ChartConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resize_path: PathBuf::from("data/timing_results.csv"),
            load_factor_path: PathBuf::from("data/load_factor_results.csv"),
            output_dir: PathBuf::from("data"),
            scale: ScaleConfig::default(),
            grid: LambdaGrid::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VizError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Reads `path` when it exists, falls back to defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            info!(path = %path.display(), "loading config");
            Self::from_file(path)
        } else {
            info!("no {} found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.scale.validate()?;
        self.grid.validate()?;
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(VizError::Config(format!(
                "chart size must be non zero, got {}x{}",
                self.chart.width, self.chart.height
            )));
        }
        Ok(())
    }
}
