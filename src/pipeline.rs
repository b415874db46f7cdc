use std::cell::RefCell;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::{
    audio::{PcmDecoder, SymphoniaDecoder},
    config::SamplerConfig,
    core::client::AudioDecodeClient,
    error::Result,
    io::net::{http_client, ByteFetcher, HttpFetcher, UrlResolver},
    types::{LoadProgress, Preset, SampleOutcome, SlotResult, SLOT_COUNT},
};

/// Loads every sample of a preset concurrently and returns one result per
/// slot, in preset order.
pub struct SampleLoader<F, D> {
    client: AudioDecodeClient<F, D>,
    resolver: UrlResolver,
}

impl SampleLoader<HttpFetcher, SymphoniaDecoder> {
    /// HTTP transport and symphonia decoding, configured from `cfg`.
    pub fn from_config(cfg: &SamplerConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(http_client(cfg)?);
        let client = AudioDecodeClient::new(fetcher, SymphoniaDecoder)
            .with_granularity(cfg.progress_granularity);
        Ok(Self::new(client, UrlResolver::new(cfg.samples_base())))
    }
}

impl<F: ByteFetcher, D: PcmDecoder> SampleLoader<F, D> {
    pub fn new(client: AudioDecodeClient<F, D>, resolver: UrlResolver) -> Self {
        Self { client, resolver }
    }

    pub fn client(&self) -> &AudioDecodeClient<F, D> {
        &self.client
    }

    /// All acquisitions are polled on the calling task and awaited together.
    /// Only the first [`SLOT_COUNT`] samples are fetched; the rest are
    /// dropped silently. Per-sample failures are encoded in the results.
    pub async fn load<P>(&self, preset: &Preset, progress: P) -> Vec<SlotResult>
    where
        P: FnMut(usize, LoadProgress),
    {
        if preset.samples.is_empty() {
            return Vec::new();
        }
        if preset.samples.len() > SLOT_COUNT {
            info!(
                preset = %preset.name,
                samples = preset.samples.len(),
                "preset has more samples than pads, extra samples ignored"
            );
        }

        let sink = RefCell::new(progress);
        let sink = &sink;

        let acquisitions = preset
            .samples
            .iter()
            .take(SLOT_COUNT)
            .enumerate()
            .map(|(slot_index, sample)| {
                // Unresolvable entries keep their raw url so the failure names it.
                let locator = self
                    .resolver
                    .resolve(&sample.url)
                    .unwrap_or_else(|| sample.url.clone());
                async move {
                    let mut forward = |p: LoadProgress| (&mut *sink.borrow_mut())(slot_index, p);
                    let outcome = self
                        .client
                        .acquire(Some(&locator), sample.name.as_deref(), &mut forward)
                        .await;
                    SlotResult {
                        slot_index,
                        outcome,
                    }
                }
            });

        let results = join_all(acquisitions).await;

        let failed = results
            .iter()
            .filter(|r| matches!(r.outcome, SampleOutcome::Failed { .. }))
            .count();
        if failed > 0 {
            warn!(preset = %preset.name, failed, total = results.len(), "some samples failed to load");
        }
        info!(preset = %preset.name, loaded = results.len() - failed, "preset loaded");

        results
    }
}
