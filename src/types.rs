use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Number of pads in a bank.
pub const SLOT_COUNT: usize = 16;

/// Decoded audio: interleaved f32 frames shared behind an `Arc`.
#[derive(Clone, Debug)]
pub struct PcmBuffer {
    samples: Arc<Vec<f32>>,
    sample_rate: u32,
    channels: u16,
}

impl PcmBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: Arc::new(samples),
            sample_rate,
            channels: channels.max(1),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Interleaved samples covering `[start, end)` seconds, clamped to the buffer.
    pub fn slice_seconds(&self, start: f64, end: f64) -> &[f32] {
        let frames = self.frames();
        let to_frame = |t: f64| ((t.max(0.0) * self.sample_rate as f64).round() as usize).min(frames);
        let (a, b) = (to_frame(start), to_frame(end));
        if b <= a {
            return &[];
        }
        let ch = self.channels as usize;
        &self.samples[a * ch..b * ch]
    }
}

/// One entry of a preset's sample list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SampleRefRepr")]
pub struct SampleRef {
    pub url: String,
    pub name: Option<String>,
}

impl SampleRef {
    pub fn new(url: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            url: url.into(),
            name: name.map(str::to_string),
        }
    }
}

// The catalog lists samples either as objects or as bare url strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum SampleRefRepr {
    Bare(String),
    Full {
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<SampleRefRepr> for SampleRef {
    fn from(repr: SampleRefRepr) -> Self {
        match repr {
            SampleRefRepr::Bare(url) => SampleRef { url, name: None },
            SampleRefRepr::Full { url, name } => SampleRef {
                url: url.unwrap_or_default(),
                name,
            },
        }
    }
}

/// A named drum-kit load-out as served by the preset catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type", alias = "category")]
    pub category: Option<String>,
    #[serde(default)]
    pub samples: Vec<SampleRef>,
}

/// Result of acquiring one sample.
#[derive(Clone, Debug)]
pub enum SampleOutcome {
    Decoded {
        buffer: PcmBuffer,
        source_url: String,
        name: Option<String>,
    },
    Failed {
        reason: LoadError,
        source_url: Option<String>,
        name: Option<String>,
    },
}

impl SampleOutcome {
    pub fn is_decoded(&self) -> bool {
        matches!(self, SampleOutcome::Decoded { .. })
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            SampleOutcome::Decoded { name, .. } | SampleOutcome::Failed { name, .. } => {
                name.as_deref()
            }
        }
    }

    pub fn source_url(&self) -> Option<&str> {
        match self {
            SampleOutcome::Decoded { source_url, .. } => Some(source_url),
            SampleOutcome::Failed { source_url, .. } => source_url.as_deref(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SlotResult {
    pub slot_index: usize,
    pub outcome: SampleOutcome,
}

impl SlotResult {
    /// Pad label: the sample name, else the last url segment, else `Sample N`.
    pub fn label(&self) -> String {
        if let Some(name) = self.outcome.name().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        self.outcome
            .source_url()
            .and_then(|u| u.rsplit('/').next())
            .filter(|seg| !seg.is_empty())
            .map(|seg| seg.replace("%20", " "))
            .unwrap_or_else(|| format!("Sample {}", self.slot_index + 1))
    }
}

/// A progress report for one sample: a percentage, or the failure sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadProgress {
    Percent(u8),
    Failed,
}

impl LoadProgress {
    /// Percent in `0..=100`, or `-1` for failure.
    pub fn as_percent(self) -> i32 {
        match self {
            LoadProgress::Percent(p) => p as i32,
            LoadProgress::Failed => -1,
        }
    }
}
