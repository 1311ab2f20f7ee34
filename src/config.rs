//! Presentation settings for hover rendering, loadable from YAML or JSON.
//!
//! Only how things look is configured here. Interaction state (what is
//! hovered or focused) is never persisted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::value_formatter::MAX_PRECISION;
use crate::error::{HoverError, Result};

/// Whether hovering dims everything but the active series/markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightMode {
    Off,
    /// Highlight every path sharing the active series' selector.
    #[default]
    Series,
    /// Highlight every path measuring the active series' metric, across runs.
    Metric,
}

impl HighlightMode {
    pub fn is_enabled(self) -> bool {
        self != HighlightMode::Off
    }
}

/// How x values should be read, which decides the x-label formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XAlignment {
    /// Plain numeric steps.
    #[default]
    Step,
    /// Seconds since the UNIX epoch.
    Epoch,
    /// Seconds since the start of the series.
    RelativeTime,
    /// Milliseconds since the UNIX epoch.
    AbsoluteTime,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// "trace", "debug", "info", "warn" or "error". `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Hover rendering settings for one chart group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    pub highlight_mode: HighlightMode,
    pub x_alignment: XAlignment,
    /// Decimal places used by numeric value formatting.
    pub value_precision: usize,
    pub marker_radius: f32,
    pub active_marker_radius: f32,
    /// Dash and gap length of guide lines, in pixels.
    pub guide_dash: [f32; 2],
    pub logging: LoggingConfig,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            highlight_mode: HighlightMode::default(),
            x_alignment: XAlignment::default(),
            value_precision: 6,
            marker_radius: 3.0,
            active_marker_radius: 5.0,
            guide_dash: [4.0, 2.0],
            logging: LoggingConfig::default(),
        }
    }
}

impl HoverConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: HoverConfig = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: HoverConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)?;
        match Format::from_path(path)? {
            Format::Yaml => Self::from_yaml_str(&s),
            Format::Json => Self::from_json_str(&s),
        }
    }

    /// Save to a `.yaml`/`.yml` or `.json` file, format chosen by extension.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let s = match Format::from_path(path)? {
            Format::Yaml => serde_yaml::to_string(self)?,
            Format::Json => serde_json::to_string_pretty(self)?,
        };
        fs::write(path, s)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.marker_radius.is_finite() && self.marker_radius > 0.0) {
            return Err(HoverError::Config(format!(
                "marker_radius must be positive, got {}",
                self.marker_radius
            )));
        }
        if self.active_marker_radius < self.marker_radius {
            return Err(HoverError::Config(format!(
                "active_marker_radius ({}) is smaller than marker_radius ({})",
                self.active_marker_radius, self.marker_radius
            )));
        }
        if self.guide_dash.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(HoverError::Config(
                "guide_dash lengths must be non-negative".to_string(),
            ));
        }
        if self.value_precision > MAX_PRECISION {
            return Err(HoverError::Config(format!(
                "value_precision must be at most {MAX_PRECISION}, got {}",
                self.value_precision
            )));
        }
        Ok(())
    }
}

enum Format {
    Yaml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            other => Err(HoverError::Config(format!(
                "unsupported config extension {:?} for {:?}",
                other, path
            ))),
        }
    }
}
