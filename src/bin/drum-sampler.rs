use std::{
    path::{Path, PathBuf},
    process,
};

use clap::{Parser, Subcommand};
use drum_sampler_core::{
    fetch_presets, find_preset, group_by_category, http_client, AudioOutput, LoadProgress,
    Marker, PadBank, PcmBuffer, Preset, SampleLoader, SamplerConfig, SamplerError, SlotResult,
    WavFileOutput, WaveformPeaks, WaveformSurface, GRID_ORDER, SLOT_COUNT,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "drum-sampler")]
#[command(about = "Headless drum pad sampler", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Preset server, e.g. http://localhost:3000
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List presets grouped by category
    List,

    /// Load a preset and show the pad grid
    Load {
        /// Preset name or index
        preset: String,

        #[arg(short, long)]
        quiet: bool,
    },

    /// Load a preset, trigger one pad and write what it plays to a WAV file
    Play {
        /// Preset name or index
        preset: String,

        #[arg(short, long, conflicts_with = "key")]
        slot: Option<usize>,

        /// Keyboard key bound to the pad
        #[arg(short, long)]
        key: Option<String>,

        /// Drag the left trim marker to this pixel
        #[arg(long)]
        left_px: Option<f32>,

        /// Drag the right trim marker to this pixel
        #[arg(long)]
        right_px: Option<f32>,

        #[arg(short, long, default_value = "pad.wav")]
        output: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let result = runtime.block_on(async move {
        let cfg = load_config(cli.config.as_deref(), cli.api_base)?;
        match cli.command {
            Commands::List => handle_list(&cfg).await,
            Commands::Load { preset, quiet } => handle_load(&cfg, &preset, quiet).await,
            Commands::Play {
                preset,
                slot,
                key,
                left_px,
                right_px,
                output,
            } => handle_play(&cfg, &preset, slot, key, (left_px, right_px), &output).await,
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn load_config(path: Option<&Path>, api_base: Option<String>) -> Result<SamplerConfig, SamplerError> {
    let mut cfg = SamplerConfig::load(path)?;
    if let Some(base) = api_base {
        cfg.api_base = base;
    }
    Ok(cfg)
}

async fn catalog(cfg: &SamplerConfig) -> Result<Vec<Preset>, SamplerError> {
    let client = http_client(cfg)?;
    Ok(fetch_presets(&client, &cfg.catalog_url()).await)
}

async fn handle_list(cfg: &SamplerConfig) -> Result<(), SamplerError> {
    let presets = catalog(cfg).await?;
    if presets.is_empty() {
        eprintln!("No presets available from {}", cfg.catalog_url());
        return Ok(());
    }
    for (category, members) in group_by_category(&presets) {
        println!("{category}");
        for index in members {
            let p = &presets[index];
            println!("  [{index:>2}] {} ({} samples)", p.name, p.samples.len());
        }
    }
    Ok(())
}

async fn load_preset(
    cfg: &SamplerConfig,
    key: &str,
    quiet: bool,
) -> Result<Vec<SlotResult>, SamplerError> {
    let presets = catalog(cfg).await?;
    let preset = find_preset(&presets, key).ok_or_else(|| SamplerError::PresetNotFound(key.into()))?;

    let loader = SampleLoader::from_config(cfg)?;
    let mut bars = [0i32; SLOT_COUNT];
    let results = loader
        .load(preset, |slot, p: LoadProgress| {
            bars[slot] = p.as_percent();
            if !quiet {
                let line: Vec<String> = bars[..preset.samples.len().min(SLOT_COUNT)]
                    .iter()
                    .map(|v| if *v < 0 { " ERR".into() } else { format!("{v:>4}") })
                    .collect();
                eprint!("\r{}", line.join(""));
            }
        })
        .await;
    if !quiet && !results.is_empty() {
        eprintln!();
    }
    Ok(results)
}

async fn handle_load(cfg: &SamplerConfig, key: &str, quiet: bool) -> Result<(), SamplerError> {
    let results = load_preset(cfg, key, quiet).await?;
    let mut bank = PadBank::new(cfg)?;
    bank.rebuild(&results);

    for row in GRID_ORDER.chunks(4) {
        let cells: Vec<String> = row
            .iter()
            .map(|&slot| {
                let key = bank.keymap().key_for(slot).unwrap_or(" ");
                match (bank.slot(slot), results.get(slot)) {
                    (Some(sound), _) => format!("[{key}] {:<18}", truncate(sound.label(), 18)),
                    (None, Some(_)) => format!("[{key}] {:<18}", "Error"),
                    (None, None) => format!("[{key}] {:<18}", "-"),
                }
            })
            .collect();
        println!("{}", cells.join(" "));
    }
    Ok(())
}

async fn handle_play(
    cfg: &SamplerConfig,
    key: &str,
    slot: Option<usize>,
    pad_key: Option<String>,
    trim: (Option<f32>, Option<f32>),
    output: &Path,
) -> Result<(), SamplerError> {
    let results = load_preset(cfg, key, true).await?;
    let mut bank = PadBank::new(cfg)?;
    bank.rebuild(&results);

    let slot = match (slot, pad_key) {
        (Some(s), _) => s,
        (None, Some(k)) => bank
            .keymap()
            .slot_for(&k)
            .ok_or_else(|| SamplerError::Config(format!("key `{k}` is not bound to a pad")))?,
        (None, None) => 0,
    };
    if slot >= SLOT_COUNT {
        return Err(SamplerError::SlotOutOfRange(slot));
    }

    let mut canvas = LogCanvas;
    // Select the pad silently so the markers belong to it.
    if !bank.trigger(slot, &Silent, &mut canvas) {
        return Err(SamplerError::Config(format!("pad {slot} has no sound")));
    }
    if let Some(x) = trim.0 {
        drag_marker(&mut bank, Marker::Left, x);
    }
    if let Some(x) = trim.1 {
        drag_marker(&mut bank, Marker::Right, x);
    }

    let wav = WavFileOutput::new(output);
    bank.trigger(slot, &wav, &mut canvas);
    if let Some(err) = wav.take_error() {
        return Err(anyhow::anyhow!(err).into());
    }

    if let Some(sound) = bank.active_sound() {
        match sound.playback_range() {
            Some((start, end)) => {
                println!("{}: {:.3}s → {:.3}s written to {}", sound.label(), start, end, output.display())
            }
            None => println!("{}: empty trim, nothing written", sound.label()),
        }
    }
    Ok(())
}

// Hover the marker, grab it, move it, release it.
fn drag_marker(bank: &mut PadBank, marker: Marker, to: f32) {
    let Some(from) = bank.active_sound().map(|s| s.trim().marker_px(marker)) else {
        return;
    };
    bank.pointer_moved(from);
    bank.drag_started();
    bank.pointer_moved(to);
    bank.drag_ended();
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

struct Silent;

impl AudioOutput for Silent {
    fn play(&self, _buffer: &PcmBuffer, _start: f64, _end: f64) {}
}

struct LogCanvas;

impl WaveformSurface for LogCanvas {
    fn render_waveform(&mut self, peaks: &WaveformPeaks) {
        debug!(columns = peaks.columns().len(), "waveform redraw");
    }
}
