use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::detection::ContourParams;
use crate::model::ModelConfig;
use crate::models::ImageDimensions;
use crate::normalize::FALLBACK_DISPLAY;

pub const DEFAULT_MAX_RESULTS: usize = 6;
pub const CONFIG_ENV: &str = "BOXSIGHT_CONFIG";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    max_results: Option<usize>,
    min_score: Option<f32>,
    fallback_display: Option<FallbackFile>,
    contour: Option<ContourFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FallbackFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ContourFile {
    blur_sigma: Option<f32>,
    low_threshold: Option<f32>,
    high_threshold: Option<f32>,
    min_pixels: Option<u32>,
}

/// Policy knobs for a detection run
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionSettings {
    /// Upper bound on detections shown per image
    pub max_results: usize,
    /// Display size used for any axis the renderer cannot report
    pub fallback_display: ImageDimensions,
    pub model: ModelConfig,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            fallback_display: FALLBACK_DISPLAY,
            model: ModelConfig::default(),
        }
    }
}

impl DetectionSettings {
    /// Load settings from `path`, or from `BOXSIGHT_CONFIG` when no path is
    /// given, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let file_cfg = match path.or(env_path.as_deref()) {
            Some(path) => read_config_file(path)?,
            None => SettingsFile::default(),
        };
        let mut settings = Self::from_file(file_cfg);
        settings.apply_env()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text, without environment overrides
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(text).context("invalid settings TOML")?;
        let settings = Self::from_file(file);
        settings.validate()?;
        Ok(settings)
    }

    fn from_file(file: SettingsFile) -> Self {
        let defaults = Self::default();
        let contour_defaults = defaults.model.contour;
        let fallback = file.fallback_display.unwrap_or_default();
        let contour = file.contour.unwrap_or_default();

        Self {
            max_results: file.max_results.unwrap_or(defaults.max_results),
            fallback_display: ImageDimensions::new(
                fallback.width.unwrap_or(defaults.fallback_display.width),
                fallback.height.unwrap_or(defaults.fallback_display.height),
            ),
            model: ModelConfig {
                min_score: file.min_score.unwrap_or(defaults.model.min_score),
                contour: ContourParams {
                    blur_sigma: contour.blur_sigma.unwrap_or(contour_defaults.blur_sigma),
                    low_threshold: contour
                        .low_threshold
                        .unwrap_or(contour_defaults.low_threshold),
                    high_threshold: contour
                        .high_threshold
                        .unwrap_or(contour_defaults.high_threshold),
                    min_pixels: contour.min_pixels.unwrap_or(contour_defaults.min_pixels),
                },
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("BOXSIGHT_MAX_RESULTS") {
            if !value.trim().is_empty() {
                self.max_results = value
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("BOXSIGHT_MAX_RESULTS must be a positive integer"))?;
            }
        }
        if let Ok(value) = std::env::var("BOXSIGHT_MIN_SCORE") {
            if !value.trim().is_empty() {
                self.model.min_score = value
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("BOXSIGHT_MIN_SCORE must be a number between 0 and 1"))?;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(anyhow!("max_results must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.model.min_score) {
            return Err(anyhow!(
                "min_score must be between 0 and 1, got {}",
                self.model.min_score
            ));
        }
        if !self.fallback_display.is_usable() {
            return Err(anyhow!(
                "fallback_display must have positive width and height, got {}x{}",
                self.fallback_display.width,
                self.fallback_display.height
            ));
        }
        let contour = &self.model.contour;
        if !(contour.blur_sigma > 0.0) {
            return Err(anyhow!("contour.blur_sigma must be greater than zero"));
        }
        if contour.low_threshold > contour.high_threshold {
            return Err(anyhow!(
                "contour.low_threshold ({}) must not exceed contour.high_threshold ({})",
                contour.low_threshold,
                contour.high_threshold
            ));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<SettingsFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid settings file {}", path.display()))
}
