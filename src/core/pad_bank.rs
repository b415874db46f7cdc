use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    audio::AudioOutput,
    config::{SamplerConfig, TrimSettings},
    core::{keymap::KeyMap, sound::Sound, waveform::WaveformSurface},
    error::Result,
    types::{SampleOutcome, SlotResult, SLOT_COUNT},
};

/// The bank shared between input handlers and the render loop.
pub type SharedPadBank = Arc<Mutex<PadBank>>;

/// Sixteen pads, at most one sound each, and the pad currently shown.
#[derive(Debug)]
pub struct PadBank {
    slots: [Option<Sound>; SLOT_COUNT],
    active_slot: usize,
    trim: TrimSettings,
    peak_columns: usize,
    keymap: KeyMap,
}

impl PadBank {
    pub fn new(cfg: &SamplerConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            slots: Default::default(),
            active_slot: 0,
            trim: cfg.trim,
            peak_columns: cfg.peak_columns,
            keymap: KeyMap::new(cfg.key_layout),
        })
    }

    pub fn into_shared(self) -> SharedPadBank {
        Arc::new(Mutex::new(self))
    }

    pub fn slots(&self) -> &[Option<Sound>; SLOT_COUNT] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Sound> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn active_slot(&self) -> usize {
        self.active_slot
    }

    pub fn active_sound(&self) -> Option<&Sound> {
        self.slot(self.active_slot)
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// Replaces all sixteen slots from a load result and selects slot 0.
    ///
    /// The new slots are fully built before the swap.
    pub fn rebuild(&mut self, results: &[SlotResult]) {
        let mut fresh: [Option<Sound>; SLOT_COUNT] = Default::default();

        for result in results {
            let Some(slot) = fresh.get_mut(result.slot_index) else {
                continue;
            };
            match &result.outcome {
                SampleOutcome::Decoded { buffer, .. } => {
                    match Sound::new(buffer.clone(), result.label(), &self.trim, self.peak_columns) {
                        Ok(sound) => *slot = Some(sound),
                        Err(e) => warn!(slot = result.slot_index, error = %e, "cannot bind sound"),
                    }
                }
                SampleOutcome::Failed { reason, .. } => {
                    debug!(slot = result.slot_index, %reason, "slot left empty");
                }
            }
        }

        self.slots = fresh;
        self.active_slot = 0;
        info!(
            filled = self.slots.iter().filter(|s| s.is_some()).count(),
            "pad bank rebuilt"
        );
    }

    /// Selects and plays `slot`, then redraws its waveform.
    ///
    /// Returns `false` without touching any state if the slot is empty.
    pub fn trigger(
        &mut self,
        slot: usize,
        output: &dyn AudioOutput,
        waveform: &mut dyn WaveformSurface,
    ) -> bool {
        if self.slot(slot).is_none() {
            return false;
        }
        if slot != self.active_slot {
            if let Some(prev) = self.slots[self.active_slot].as_mut() {
                prev.trim_mut().drag_ended();
            }
            self.active_slot = slot;
        }
        let Some(sound) = self.slots[slot].as_ref() else {
            return false;
        };
        sound.play(output);
        waveform.render_waveform(sound.display());
        true
    }

    /// Triggers the slot bound to `key`, if any.
    pub fn on_key(
        &mut self,
        key: &str,
        output: &dyn AudioOutput,
        waveform: &mut dyn WaveformSurface,
    ) -> Option<usize> {
        let slot = self.keymap.slot_for(key)?;
        self.trigger(slot, output, waveform).then_some(slot)
    }

    pub fn pointer_moved(&mut self, x: f32) {
        if let Some(sound) = self.active_sound_mut() {
            sound.trim_mut().pointer_moved(x);
        }
    }

    pub fn drag_started(&mut self) {
        if let Some(sound) = self.active_sound_mut() {
            sound.trim_mut().drag_started();
        }
    }

    pub fn drag_ended(&mut self) {
        if let Some(sound) = self.active_sound_mut() {
            sound.trim_mut().drag_ended();
        }
    }

    fn active_sound_mut(&mut self) -> Option<&mut Sound> {
        self.slots.get_mut(self.active_slot).and_then(Option::as_mut)
    }
}
