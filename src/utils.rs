use crate::error::Result;
use crate::types::{MirrorDef, ProbeResult, ResolvedLink};
use indicatif::ProgressBar;
use reqwest::Client;
use std::cmp::Ordering;
use std::time::{Duration, Instant};

/// Direct download URL without any mirror selection
pub fn base_url(download_base: &str, link: &ResolvedLink) -> String {
    format!(
        "{}/{}/{}",
        download_base.trim_end_matches('/'),
        link.project,
        link.rel_path
    )
}

/// Candidate URL for one mirror: `base?use_mirror=<slug>`, or `base` for auto-select
pub fn candidate_url(base_url: &str, mirror: &MirrorDef) -> String {
    match mirror.slug.as_deref() {
        Some(slug) => format!("{}?use_mirror={}", base_url, slug),
        None => base_url.to_string(),
    }
}

/// Shared client for one ranking request; every probe goes through its pool
pub fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Probe every candidate concurrently
///
/// Logic:
/// 1. Build one future per (mirror, url) pair on the shared client
/// 2. Wait for all of them (join_all), no early exit
/// 3. Return results in the input order; ranking is a separate step
pub async fn probe_mirrors(
    client: &Client,
    candidates: Vec<(MirrorDef, String)>,
    pb: &ProgressBar,
) -> Vec<ProbeResult> {
    let tasks = candidates.into_iter().map(|(mirror, url)| {
        let pb = pb.clone();
        async move {
            let latency = check_latency(client, &url).await;
            tracing::debug!(mirror = %mirror.label, url = %url, ?latency, "probe finished");
            pb.inc(1);
            ProbeResult {
                mirror,
                url,
                latency,
            }
        }
    });

    futures::future::join_all(tasks).await
}

/// Time until response headers arrive for a HEAD request, in seconds.
/// Any HTTP status counts as alive; transport errors and timeouts give None.
pub async fn check_latency(client: &Client, url: &str) -> Option<f64> {
    let start = Instant::now();

    // HEAD only fetches metadata; redirects to the mirror host are followed
    match client.head(url).send().await {
        Ok(_) => Some(start.elapsed().as_secs_f64()),
        Err(e) => {
            tracing::trace!(url, "probe failed: {}", e);
            None
        }
    }
}

/// Sort: measured mirrors first by ascending latency, failed ones last in
/// their original order (the sort is stable)
pub fn rank_results(results: &mut [ProbeResult]) {
    results.sort_by(|a, b| match (a.latency, b.latency) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

pub fn format_latency(latency: Option<f64>) -> String {
    match latency {
        Some(secs) => format!("{:.2}s", secs),
        None => "timeout".to_string(),
    }
}
