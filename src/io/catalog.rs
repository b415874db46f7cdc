use anyhow::Context;
use reqwest::Client;
use tracing::{info, warn};

use crate::types::Preset;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Fetches the preset list. Any failure degrades to an empty list.
pub async fn fetch_presets(client: &Client, catalog_url: &str) -> Vec<Preset> {
    match try_fetch_presets(client, catalog_url).await {
        Ok(presets) => {
            info!(count = presets.len(), url = catalog_url, "preset catalog loaded");
            presets
        }
        Err(e) => {
            warn!(url = catalog_url, error = %format!("{e:#}"), "preset catalog unavailable");
            Vec::new()
        }
    }
}

async fn try_fetch_presets(client: &Client, catalog_url: &str) -> anyhow::Result<Vec<Preset>> {
    let presets = client
        .get(catalog_url)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<Preset>>()
        .await
        .context("malformed preset catalog")?;
    Ok(presets)
}

/// Groups preset indices by category, in first-seen category order.
pub fn group_by_category(presets: &[Preset]) -> Vec<(String, Vec<usize>)> {
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    for (index, preset) in presets.iter().enumerate() {
        let category = preset
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED);
        match groups.iter_mut().find(|(c, _)| c == category) {
            Some((_, members)) => members.push(index),
            None => groups.push((category.to_string(), vec![index])),
        }
    }
    groups
}

/// Finds a preset by exact name, or by index when `key` parses as one.
pub fn find_preset<'a>(presets: &'a [Preset], key: &str) -> Option<&'a Preset> {
    presets
        .iter()
        .find(|p| p.name == key)
        .or_else(|| key.parse::<usize>().ok().and_then(|i| presets.get(i)))
}
