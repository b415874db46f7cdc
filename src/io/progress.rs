use crate::{config::ProgressGranularity, types::LoadProgress};

/// Ceiling of the download phase.
pub const DOWNLOAD_MAX: u8 = 70;
/// Reported when decoding begins.
pub const DECODE_CHECKPOINT: u8 = 80;
pub const COMPLETE: u8 = 100;

// Smoothing constant for transfers without a declared length.
const UNKNOWN_TOTAL_SOFTENING: f64 = 100_000.0;

/// Download percentage for `received` bytes out of an optional declared `total`.
///
/// With an unknown total the value approaches but never reaches
/// [`DOWNLOAD_MAX`].
pub fn download_percent(received: u64, total: Option<u64>) -> u8 {
    let ratio = match total {
        Some(t) if t > 0 => (received as f64 / t as f64).min(1.0),
        _ => received as f64 / (received as f64 + UNKNOWN_TOTAL_SOFTENING),
    };
    let pct = (ratio * DOWNLOAD_MAX as f64).floor() as u8;
    match total {
        Some(t) if t > 0 => pct.min(DOWNLOAD_MAX),
        _ => pct.min(DOWNLOAD_MAX - 1),
    }
}

/// Forwards one locator's progress to a sink, keeping it non-decreasing and
/// dropping repeated values.
pub struct ProgressReporter<'a> {
    sink: &'a mut dyn FnMut(LoadProgress),
    granularity: ProgressGranularity,
    last: Option<u8>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(sink: &'a mut dyn FnMut(LoadProgress), granularity: ProgressGranularity) -> Self {
        Self {
            sink,
            granularity,
            last: None,
        }
    }

    pub fn transfer(&mut self, received: u64, total: Option<u64>) {
        if self.granularity == ProgressGranularity::Download {
            self.percent(download_percent(received, total));
        }
    }

    pub fn transfer_done(&mut self) {
        if self.granularity == ProgressGranularity::Download {
            self.percent(DOWNLOAD_MAX);
        }
    }

    pub fn decoding(&mut self) {
        self.percent(DECODE_CHECKPOINT);
    }

    pub fn complete(&mut self) {
        self.percent(COMPLETE);
    }

    pub fn failed(&mut self) {
        (self.sink)(LoadProgress::Failed);
    }

    fn percent(&mut self, pct: u8) {
        if self.last.is_some_and(|last| pct <= last) {
            return;
        }
        self.last = Some(pct);
        (self.sink)(LoadProgress::Percent(pct));
    }
}
