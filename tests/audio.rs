mod common;

use common::wav_bytes;
use drum_sampler_core::{
    decode_audio, AudioOutput, PcmBuffer, PcmDecoder, SymphoniaDecoder, WavFileOutput,
};
use tempfile::tempdir;

#[test]
fn decodes_wav_bytes() {
    let audio = SymphoniaDecoder
        .decode(wav_bytes(8000, 16000), Some("wav"))
        .expect("Failed to decode audio");

    assert_eq!(audio.sample_rate(), 16000);
    assert_eq!(audio.channels(), 1);
    assert_eq!(audio.frames(), 8000);
    assert!((audio.duration() - 0.5).abs() < 1e-9);
    assert!(audio.samples().iter().any(|s| s.abs() > 0.1));
}

#[test]
fn decodes_without_extension_hint() {
    let audio = decode_audio(wav_bytes(100, 8000), None).expect("probe by content");
    assert_eq!(audio.frames(), 100);
}

#[test]
fn garbage_is_a_decode_error() {
    let err = decode_audio(b"definitely not audio".to_vec(), Some("wav")).unwrap_err();
    assert!(!format!("{err:#}").is_empty());
    assert!(decode_audio(Vec::new(), None).is_err());
}

#[test]
fn slices_by_seconds() {
    // 10 stereo frames at 10 Hz: one second
    let samples: Vec<f32> = (0..20).map(|i| i as f32).collect();
    let buf = PcmBuffer::new(samples, 10, 2);
    assert_eq!(buf.duration(), 1.0);
    assert_eq!(buf.slice_seconds(0.2, 0.4), &[4.0, 5.0, 6.0, 7.0]);
    assert_eq!(buf.slice_seconds(0.9, 5.0), &[18.0, 19.0]);
    assert!(buf.slice_seconds(0.6, 0.3).is_empty());
    assert!(buf.slice_seconds(-1.0, 0.0).is_empty());
}

#[test]
fn wav_output_writes_requested_range() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pad.wav");
    let buf = PcmBuffer::new(vec![0.5; 1000], 1000, 1);

    let out = WavFileOutput::new(&path);
    out.play(&buf, 0.25, 0.75);
    assert_eq!(out.take_error(), None);

    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().sample_rate, 1000);
    assert_eq!(reader.len(), 500);
}

#[test]
fn wav_output_keeps_write_errors() {
    let dir = tempdir().unwrap();
    let out = WavFileOutput::new(dir.path().join("no/such/dir/pad.wav"));
    out.play(&PcmBuffer::new(vec![0.0; 10], 10, 1), 0.0, 1.0);
    assert!(out.take_error().is_some());
    assert_eq!(out.take_error(), None);
}
