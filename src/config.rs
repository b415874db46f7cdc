use std::{env, fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SamplerError};

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
pub const DEFAULT_HOVER_THRESHOLD_PX: f32 = 10.0;
pub const DEFAULT_MIN_MARKER_GAP_PX: f32 = 1.0;
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// How much of the acquisition progress is reported to the progress sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressGranularity {
    /// Scaled download progress (0..70) plus the decode checkpoints.
    #[default]
    Download,
    /// Only the decode checkpoint, completion and failure.
    Stages,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyLayout {
    /// Character keys of a French keyboard (`&é"'`, `azer`, `qsdf`, `wxcv`).
    #[default]
    Azerty,
    /// Physical key codes (`Digit1`.., `KeyQ`.., `KeyA`.., `KeyZ`..).
    QwertyCodes,
}

/// Geometry and gesture tuning for trim regions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimSettings {
    pub canvas_width: f32,
    pub hover_threshold_px: f32,
    pub min_marker_gap_px: f32,
}

impl Default for TrimSettings {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            hover_threshold_px: DEFAULT_HOVER_THRESHOLD_PX,
            min_marker_gap_px: DEFAULT_MIN_MARKER_GAP_PX,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub api_base: String,
    pub trim: TrimSettings,
    pub frame_rate: u32,
    pub progress_granularity: ProgressGranularity,
    pub key_layout: KeyLayout,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Number of min/max columns computed for each waveform display.
    pub peak_columns: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            trim: TrimSettings::default(),
            frame_rate: DEFAULT_FRAME_RATE,
            progress_granularity: ProgressGranularity::default(),
            key_layout: KeyLayout::default(),
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
            peak_columns: DEFAULT_CANVAS_WIDTH as usize,
        }
    }
}

impl SamplerConfig {
    /// Reads a JSON config file, falling back to defaults for missing keys.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        let cfg: SamplerConfig = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Optional file, then `DRUM_SAMPLER_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(base) = env::var("DRUM_SAMPLER_API_BASE") {
            debug!(api_base = %base, "api base overridden from environment");
            self.api_base = base;
        }
        if let Ok(width) = env::var("DRUM_SAMPLER_CANVAS_WIDTH") {
            self.trim.canvas_width = width
                .parse()
                .map_err(|_| SamplerError::Config(format!("bad canvas width `{width}`")))?;
        }
        if let Ok(rate) = env::var("DRUM_SAMPLER_FRAME_RATE") {
            self.frame_rate = rate
                .parse()
                .map_err(|_| SamplerError::Config(format!("bad frame rate `{rate}`")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.trim;
        if !(t.canvas_width.is_finite() && t.canvas_width > 0.0) {
            return Err(SamplerError::InvalidCanvasWidth(t.canvas_width));
        }
        if !(t.min_marker_gap_px >= 0.0 && t.min_marker_gap_px < t.canvas_width) {
            return Err(SamplerError::Config(format!(
                "min_marker_gap_px must be in [0, {})",
                t.canvas_width
            )));
        }
        if !(t.hover_threshold_px >= 0.0) {
            return Err(SamplerError::Config("hover_threshold_px must be >= 0".into()));
        }
        if self.frame_rate == 0 {
            return Err(SamplerError::Config("frame_rate must be > 0".into()));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }

    pub fn catalog_url(&self) -> String {
        format!("{}/api/presets", self.api_base.trim_end_matches('/'))
    }

    pub fn samples_base(&self) -> String {
        format!("{}/presets", self.api_base.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SamplerConfig =
            serde_json::from_str(r#"{ "api_base": "http://pads.local/", "trim": { "canvas_width": 400 } }"#)
                .unwrap();
        assert_eq!(cfg.trim.canvas_width, 400.0);
        assert_eq!(cfg.trim.hover_threshold_px, DEFAULT_HOVER_THRESHOLD_PX);
        assert_eq!(cfg.frame_rate, DEFAULT_FRAME_RATE);
        assert_eq!(cfg.catalog_url(), "http://pads.local/api/presets");
        assert_eq!(cfg.samples_base(), "http://pads.local/presets");
    }

    #[test]
    fn rejects_degenerate_canvas() {
        let mut cfg = SamplerConfig::default();
        cfg.trim.canvas_width = 0.0;
        assert!(matches!(cfg.validate(), Err(SamplerError::InvalidCanvasWidth(_))));

        cfg.trim.canvas_width = 10.0;
        cfg.trim.min_marker_gap_px = 10.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn granularity_parses_snake_case() {
        let g: ProgressGranularity = serde_json::from_str(r#""stages""#).unwrap();
        assert_eq!(g, ProgressGranularity::Stages);
    }
}
