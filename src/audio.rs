use std::{io::Cursor, path::Path};

use anyhow::{bail, Context, Result};
use hound::WavWriter;
use parking_lot::Mutex;
use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error as SymphoniaError,
    formats::FormatOptions, io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};
use tracing::{debug, info};

use crate::types::PcmBuffer;

/// Turns encoded bytes into PCM.
pub trait PcmDecoder {
    /// `hint` is the file extension of the source, when known.
    fn decode(&self, bytes: Vec<u8>, hint: Option<&str>) -> Result<PcmBuffer>;
}

/// Plays a buffer from `start` to `end` seconds.
pub trait AudioOutput {
    fn play(&self, buffer: &PcmBuffer, start: f64, end: f64);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SymphoniaDecoder;

impl PcmDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: Vec<u8>, hint: Option<&str>) -> Result<PcmBuffer> {
        decode_audio(bytes, hint)
    }
}

pub fn decode_audio(bytes: Vec<u8>, ext: Option<&str>) -> Result<PcmBuffer> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = ext {
        hint.with_extension(ext);
    }

    let probed = get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Unrecognised audio format")?;

    let mut format = probed.format;
    let track = format.default_track().context("No default track found")?;
    let track_id = track.id;

    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_rate: u32 = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels: u16 = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet)?;
        sample_rate = decoded.spec().rate;
        channels = decoded.spec().channels.count() as u16;

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        buffer.copy_interleaved_ref(decoded);

        samples.extend_from_slice(buffer.samples());
    }

    if samples.is_empty() || sample_rate == 0 || channels == 0 {
        bail!("No audio frames decoded");
    }

    debug!(sample_rate, channels, samples = samples.len(), "decoded audio");

    Ok(PcmBuffer::new(samples, sample_rate, channels))
}

pub fn write_audio<P: AsRef<Path>>(path: P, audio: &PcmBuffer, samples: &[f32]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: audio.channels(),
        sample_rate: audio.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)
        .with_context(|| format!("Failed to create {:?}", path.as_ref()))?;
    for sample in samples {
        let s = (sample * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        writer.write_sample(s)?;
    }

    writer.finalize()?;
    Ok(())
}

/// Playback that renders the requested range into a WAV file.
///
/// Each `play` overwrites the file; the last error is kept for inspection
/// because the output capability itself cannot fail.
pub struct WavFileOutput {
    path: std::path::PathBuf,
    last_error: Mutex<Option<String>>,
}

impl WavFileOutput {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            last_error: Mutex::new(None),
        }
    }

    pub fn take_error(&self) -> Option<String> {
        self.last_error.lock().take()
    }
}

impl AudioOutput for WavFileOutput {
    fn play(&self, buffer: &PcmBuffer, start: f64, end: f64) {
        let range = buffer.slice_seconds(start, end);
        match write_audio(&self.path, buffer, range) {
            Ok(()) => info!(path = ?self.path, start, end, "rendered pad to wav"),
            Err(e) => *self.last_error.lock() = Some(format!("{e:#}")),
        }
    }
}
