use crate::buttons::ButtonMaker;
use crate::cache::TokenCache;
use crate::error::{MirrorError, Result};
use crate::types::{MirrorDef, ProbeResult, ResolvedLink, SourceForgeMenu};
use crate::utils;
use indicatif::ProgressBar;
use reqwest::{Client, Url};

/// Callback prefix for SourceForge mirror buttons
pub const CALLBACK_PREFIX: &str = "sfmirror";

/// Probe every mirror for `link` and return them ranked by latency
pub async fn rank_mirrors(
    client: &Client,
    download_base: &str,
    mirrors: &[MirrorDef],
    link: &ResolvedLink,
    pb: &ProgressBar,
) -> Result<Vec<ProbeResult>> {
    let base_url = utils::base_url(download_base, link);
    Url::parse(&base_url)
        .map_err(|e| MirrorError::Custom(format!("Invalid download URL {}: {}", base_url, e)))?;

    let candidates = mirrors
        .iter()
        .map(|m| (m.clone(), utils::candidate_url(&base_url, m)))
        .collect();

    let mut results = utils::probe_mirrors(client, candidates, pb).await;
    utils::rank_results(&mut results);
    Ok(results)
}

/// Turn ranked results into message text plus one button per mirror.
/// Each button carries a fresh cache token pointing at the mirror URL.
pub fn render_menu(
    link: &ResolvedLink,
    ranked: &[ProbeResult],
    cache: &TokenCache,
    columns: usize,
) -> SourceForgeMenu {
    let mut btn = ButtonMaker::new();
    for r in ranked {
        let label = format!("{} ({})", r.mirror.label, utils::format_latency(r.latency));
        let token = cache.insert(r.url.as_str());
        btn.ibutton(label, format!("{}|{}", CALLBACK_PREFIX, token));
    }

    let text = format!(
        "📦 <b>File:</b> <code>{}</code>\n\
         ⚡ <b>Choose a SourceForge server to mirror from (sorted by ping):</b>",
        escape_html(&link.rel_path)
    );

    SourceForgeMenu {
        text,
        markup: btn.build_menu(columns),
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
