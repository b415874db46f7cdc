use tracing::{debug, warn};

use crate::{
    audio::PcmDecoder,
    config::ProgressGranularity,
    error::LoadError,
    io::{net::ByteFetcher, progress::ProgressReporter},
    types::{LoadProgress, SampleOutcome},
};

/// Fetches and decodes a single sample.
pub struct AudioDecodeClient<F, D> {
    fetcher: F,
    decoder: D,
    granularity: ProgressGranularity,
}

impl<F: ByteFetcher, D: PcmDecoder> AudioDecodeClient<F, D> {
    pub fn new(fetcher: F, decoder: D) -> Self {
        Self {
            fetcher,
            decoder,
            granularity: ProgressGranularity::default(),
        }
    }

    pub fn with_granularity(mut self, granularity: ProgressGranularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Acquires one sample. Never fails: every error becomes
    /// [`SampleOutcome::Failed`] and a final [`LoadProgress::Failed`].
    ///
    /// `locator` is expected to be resolved already; `None` or an empty
    /// string is reported as [`LoadError::EmptyLocator`] without fetching,
    /// with the blank string kept as the source url.
    pub async fn acquire(
        &self,
        locator: Option<&str>,
        name: Option<&str>,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> SampleOutcome {
        let mut reporter = ProgressReporter::new(progress, self.granularity);
        let name = name.map(str::to_string);

        let url = match locator.map(str::trim).filter(|l| !l.is_empty()) {
            Some(url) => url,
            None => {
                reporter.failed();
                return SampleOutcome::Failed {
                    reason: LoadError::EmptyLocator,
                    source_url: locator.map(str::to_string),
                    name,
                };
            }
        };

        let fetched = {
            let mut on_chunk = |received: u64, total: Option<u64>| reporter.transfer(received, total);
            self.fetcher.fetch(url, &mut on_chunk).await
        };
        let bytes = match fetched {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(url, error = %format!("{e:#}"), "sample transfer failed");
                reporter.failed();
                return SampleOutcome::Failed {
                    reason: LoadError::Transfer(format!("{e:#}")),
                    source_url: Some(url.to_string()),
                    name,
                };
            }
        };
        reporter.transfer_done();

        reporter.decoding();
        tokio::task::yield_now().await;

        match self.decoder.decode(bytes, extension_of(url)) {
            Ok(buffer) => {
                debug!(url, duration = buffer.duration(), "sample decoded");
                reporter.complete();
                SampleOutcome::Decoded {
                    buffer,
                    source_url: url.to_string(),
                    name,
                }
            }
            Err(e) => {
                warn!(url, error = %format!("{e:#}"), "sample decode failed");
                reporter.failed();
                SampleOutcome::Failed {
                    reason: LoadError::Decode(format!("{e:#}")),
                    source_url: Some(url.to_string()),
                    name,
                }
            }
        }
    }
}

fn extension_of(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}
