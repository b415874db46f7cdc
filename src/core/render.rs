use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::{
    config::SamplerConfig,
    core::{pad_bank::SharedPadBank, waveform::OverlaySurface},
};

/// Repaints the active pad's trim overlay on a fixed cadence.
pub struct RenderLoop<S> {
    bank: SharedPadBank,
    surface: S,
    frame: Duration,
}

impl<S: OverlaySurface> RenderLoop<S> {
    pub fn new(bank: SharedPadBank, surface: S, frame: Duration) -> Self {
        Self {
            bank,
            surface,
            frame,
        }
    }

    /// Ticks at `cfg.frame_rate` frames per second.
    pub fn from_config(bank: SharedPadBank, surface: S, cfg: &SamplerConfig) -> Self {
        Self::new(bank, surface, cfg.frame_interval())
    }

    /// Draws one frame. The bank lock is held for the whole frame.
    pub fn tick(&mut self) {
        let bank = self.bank.lock();
        self.surface.clear();
        if let Some(sound) = bank.active_sound() {
            self.surface.draw_markers(sound.trim());
        }
    }

    /// Ticks forever; late frames are skipped rather than bunched up.
    pub async fn run(mut self) {
        let mut ticker = interval(self.frame);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.tick();
        }
    }
}
