use crate::{core::trim::TrimRegion, types::PcmBuffer};

/// Min/max amplitude per display column, mixed down to mono.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaveformPeaks {
    columns: Vec<(f32, f32)>,
}

impl WaveformPeaks {
    pub fn from_buffer(buffer: &PcmBuffer, width: usize) -> Self {
        let frames = buffer.frames();
        if frames == 0 || width == 0 {
            return Self::default();
        }

        let ch = buffer.channels() as usize;
        let samples = buffer.samples();
        let columns = (0..width)
            .map(|col| {
                let start = col * frames / width;
                let end = ((col + 1) * frames / width).max(start + 1).min(frames);

                let mut min = f32::INFINITY;
                let mut max = f32::NEG_INFINITY;
                for frame in samples[start * ch..end * ch].chunks_exact(ch) {
                    let mono = frame.iter().sum::<f32>() / ch as f32;
                    min = min.min(mono);
                    max = max.max(mono);
                }
                (min, max)
            })
            .collect();

        Self { columns }
    }

    pub fn columns(&self) -> &[(f32, f32)] {
        &self.columns
    }
}

/// The main canvas showing the active pad's waveform.
pub trait WaveformSurface {
    fn render_waveform(&mut self, peaks: &WaveformPeaks);
}

/// The overlay canvas the trim markers are drawn on every frame.
pub trait OverlaySurface {
    fn clear(&mut self);
    fn draw_markers(&mut self, trim: &TrimRegion);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_is_mixed_per_column() {
        // 4 stereo frames: L=1,R=-1 then L=1,R=1
        let buf = PcmBuffer::new(vec![1.0, -1.0, 1.0, -1.0, 1.0, 1.0, 1.0, 1.0], 4, 2);
        let peaks = WaveformPeaks::from_buffer(&buf, 2);
        assert_eq!(peaks.columns(), &[(0.0, 0.0), (1.0, 1.0)]);
    }

    #[test]
    fn more_columns_than_frames() {
        let buf = PcmBuffer::new(vec![0.5, -0.5], 2, 1);
        let peaks = WaveformPeaks::from_buffer(&buf, 4);
        assert_eq!(peaks.columns().len(), 4);
        assert!(peaks.columns().iter().all(|(lo, hi)| lo <= hi));
    }
}
