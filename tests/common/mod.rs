#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    f32::consts::PI,
    future::Future,
    io::Cursor,
    time::Duration,
};

use anyhow::{bail, Result};
use drum_sampler_core::{
    AudioDecodeClient, AudioOutput, ByteFetcher, OverlaySurface, PcmBuffer, PcmDecoder, Preset,
    SampleLoader, SampleRef, TrimRegion, UrlResolver, WaveformPeaks, WaveformSurface,
};
use parking_lot::Mutex;
use std::sync::Arc;

pub const BASE: &str = "http://pads.test/presets";

/// A mono 16-bit sine WAV held in memory.
pub fn wav_bytes(frames: usize, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for n in 0..frames {
            let s = (2.0 * PI * 440.0 * n as f32 / sample_rate as f32).sin();
            writer.write_sample((s * 0.5 * i16::MAX as f32) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

pub fn preset(urls: &[&str]) -> Preset {
    Preset {
        name: "test kit".into(),
        category: Some("Drumkit".into()),
        samples: urls.iter().map(|u| SampleRef::new(*u, None)).collect(),
    }
}

fn file_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// In-memory transport with per-file latency and failures.
#[derive(Default)]
pub struct MockFetcher {
    pub delays_ms: HashMap<String, u64>,
    pub broken: HashSet<String>,
    pub started: RefCell<Vec<String>>,
    pub finished: RefCell<Vec<String>>,
}

impl MockFetcher {
    pub fn with_delays(delays: &[(&str, u64)]) -> Self {
        Self {
            delays_ms: delays.iter().map(|(f, d)| (f.to_string(), *d)).collect(),
            ..Default::default()
        }
    }

    pub fn broken(mut self, file: &str) -> Self {
        self.broken.insert(file.to_string());
        self
    }
}

impl ByteFetcher for MockFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        progress: &'a mut dyn FnMut(u64, Option<u64>),
    ) -> impl Future<Output = Result<Vec<u8>>> + 'a {
        async move {
            let file = file_of(url).to_string();
            self.started.borrow_mut().push(file.clone());
            let delay = self.delays_ms.get(&file).copied().unwrap_or(10);

            let body = file.clone().into_bytes();
            let total = body.len() as u64;
            progress(0, Some(total));
            tokio::time::sleep(Duration::from_millis(delay / 2)).await;
            progress(total / 2, Some(total));
            tokio::time::sleep(Duration::from_millis(delay - delay / 2)).await;

            self.finished.borrow_mut().push(file.clone());
            if self.broken.contains(&file) {
                bail!("connection reset while fetching {file}");
            }
            progress(total, Some(total));
            Ok(body)
        }
    }
}

/// Decodes the file name into a 1 kHz mono buffer; `*.txt` is undecodable.
#[derive(Default, Clone, Copy)]
pub struct MockDecoder;

impl PcmDecoder for MockDecoder {
    fn decode(&self, bytes: Vec<u8>, hint: Option<&str>) -> Result<PcmBuffer> {
        if hint == Some("txt") {
            bail!("not audio");
        }
        Ok(PcmBuffer::new(vec![0.25; bytes.len() * 100], 1000, 1))
    }
}

pub fn mock_loader(fetcher: MockFetcher) -> SampleLoader<MockFetcher, MockDecoder> {
    SampleLoader::new(
        AudioDecodeClient::new(fetcher, MockDecoder),
        UrlResolver::new(BASE),
    )
}

/// Records every requested playback range.
#[derive(Default)]
pub struct RecordingOutput {
    pub plays: Mutex<Vec<(f64, f64)>>,
}

impl AudioOutput for RecordingOutput {
    fn play(&self, _buffer: &PcmBuffer, start: f64, end: f64) {
        self.plays.lock().push((start, end));
    }
}

#[derive(Default)]
pub struct CountingCanvas {
    pub redraws: usize,
    pub last_columns: usize,
}

impl WaveformSurface for CountingCanvas {
    fn render_waveform(&mut self, peaks: &WaveformPeaks) {
        self.redraws += 1;
        self.last_columns = peaks.columns().len();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum OverlayOp {
    Clear,
    Markers { left: f32, right: f32 },
}

/// Overlay whose draw calls can be inspected after the surface moved away.
#[derive(Clone, Default)]
pub struct RecordingOverlay {
    pub ops: Arc<Mutex<Vec<OverlayOp>>>,
}

impl OverlaySurface for RecordingOverlay {
    fn clear(&mut self) {
        self.ops.lock().push(OverlayOp::Clear);
    }

    fn draw_markers(&mut self, trim: &TrimRegion) {
        self.ops.lock().push(OverlayOp::Markers {
            left: trim.left_px(),
            right: trim.right_px(),
        });
    }
}
