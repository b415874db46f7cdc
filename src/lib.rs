//! # drum-sampler-core
//!
//! Core of a 16-pad drum sampler: loading every sample of a preset in
//! parallel, binding the decoded buffers to pads, trimming them with
//! draggable markers and triggering trimmed playback.

pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

pub mod core {
    pub mod client;
    pub mod keymap;
    pub mod pad_bank;
    pub mod render;
    pub mod sound;
    pub mod trim;
    pub mod waveform;
}

pub mod io {
    pub mod catalog;
    pub mod net;
    pub mod progress;
}

pub use crate::{
    audio::{decode_audio, write_audio, AudioOutput, PcmDecoder, SymphoniaDecoder, WavFileOutput},
    config::{KeyLayout, ProgressGranularity, SamplerConfig, TrimSettings},
    core::{
        client::AudioDecodeClient,
        keymap::{KeyMap, GRID_ORDER},
        pad_bank::{PadBank, SharedPadBank},
        render::RenderLoop,
        sound::Sound,
        trim::{DragState, Marker, TrimRegion},
        waveform::{OverlaySurface, WaveformPeaks, WaveformSurface},
    },
    error::{LoadError, SamplerError},
    io::{
        catalog::{fetch_presets, find_preset, group_by_category},
        net::{http_client, ByteFetcher, HttpFetcher, UrlResolver},
    },
    pipeline::SampleLoader,
    types::{LoadProgress, PcmBuffer, Preset, SampleOutcome, SampleRef, SlotResult, SLOT_COUNT},
};
