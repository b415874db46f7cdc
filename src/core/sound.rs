use tracing::debug;

use crate::{
    audio::AudioOutput,
    config::TrimSettings,
    core::{trim::TrimRegion, waveform::WaveformPeaks},
    error::Result,
    types::PcmBuffer,
};

/// A decoded buffer bound to its trim region and waveform display.
#[derive(Clone, Debug)]
pub struct Sound {
    buffer: PcmBuffer,
    trim: TrimRegion,
    display: WaveformPeaks,
    label: String,
}

impl Sound {
    pub fn new(
        buffer: PcmBuffer,
        label: impl Into<String>,
        settings: &TrimSettings,
        peak_columns: usize,
    ) -> Result<Self> {
        let trim = TrimRegion::new(buffer.duration(), settings)?;
        let display = WaveformPeaks::from_buffer(&buffer, peak_columns);
        Ok(Self {
            buffer,
            trim,
            display,
            label: label.into(),
        })
    }

    pub fn buffer(&self) -> &PcmBuffer {
        &self.buffer
    }

    pub fn trim(&self) -> &TrimRegion {
        &self.trim
    }

    pub fn trim_mut(&mut self) -> &mut TrimRegion {
        &mut self.trim
    }

    pub fn display(&self) -> &WaveformPeaks {
        &self.display
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Playback bounds after clamping to the buffer, or `None` if empty.
    pub fn playback_range(&self) -> Option<(f64, f64)> {
        let (start, end) = self.trim.trim_times();
        let start = start.max(0.0);
        let end = end.min(self.buffer.duration());
        (end > start).then_some((start, end))
    }

    /// Plays the trimmed range. Returns `false` when the range is empty.
    pub fn play(&self, output: &dyn AudioOutput) -> bool {
        match self.playback_range() {
            Some((start, end)) => {
                debug!(label = %self.label, start, end, "playing pad");
                output.play(&self.buffer, start, end);
                true
            }
            None => {
                debug!(label = %self.label, "empty trim range, nothing to play");
                false
            }
        }
    }
}
