use crate::cache::TokenCache;
use crate::config::{self, Settings};
use crate::error::Result;
use crate::menu::{self, CALLBACK_PREFIX};
use crate::resolver;
use crate::traits::{MessageContext, Messenger};
use crate::types::{MirrorDef, ResolvedLink, SourceForgeMenu};
use crate::utils;
use indicatif::ProgressBar;
use reqwest::Client;
use std::sync::Arc;

const PLACEHOLDER_TEXT: &str =
    "🔍 <b>SourceForge link detected</b>\n⏳ Checking the server list, hang on...";

const FAILURE_TEXT: &str =
    "❌ Failed to fetch the SourceForge server list.\n➡️ Mirroring the original link directly.";

/// Extract the cache token from a `sfmirror|<token>` callback payload
pub fn parse_callback(data: &str) -> Option<&str> {
    let (prefix, token) = data.split_once('|')?;
    if prefix != CALLBACK_PREFIX || token.is_empty() {
        return None;
    }
    Some(token)
}

/// Turns SourceForge links into a ping-sorted mirror picker
pub struct SourceForgeHandler {
    client: Client,
    settings: Settings,
    mirrors: Vec<MirrorDef>,
    cache: Arc<TokenCache>,
}

impl SourceForgeHandler {
    /// Handler wired to the user settings, mirror table and global token cache
    pub fn new() -> Result<Self> {
        let settings = config::settings().clone();
        let client = utils::build_client(settings.probe_timeout())?;
        Ok(Self::with_parts(
            client,
            settings,
            config::get_mirrors().to_vec(),
            TokenCache::global(),
        ))
    }

    pub fn with_parts(
        client: Client,
        settings: Settings,
        mirrors: Vec<MirrorDef>,
        cache: Arc<TokenCache>,
    ) -> Self {
        Self {
            client,
            settings,
            mirrors,
            cache,
        }
    }

    /// Probe, rank and render the picker for one resolved link
    pub async fn build_menu(&self, link: &ResolvedLink, pb: &ProgressBar) -> Result<SourceForgeMenu> {
        let ranked = menu::rank_mirrors(
            &self.client,
            &self.settings.download_base,
            &self.mirrors,
            link,
            pb,
        )
        .await?;

        let alive = ranked.iter().filter(|r| r.latency.is_some()).count();
        tracing::info!(
            project = %link.project,
            alive,
            total = ranked.len(),
            "mirror probes finished"
        );

        let menu = menu::render_menu(link, &ranked, &self.cache, self.settings.menu_columns);
        tracing::debug!(cached_tokens = self.cache.len(), "mirror menu rendered");
        Ok(menu)
    }

    /// Handle a link submitted by a user.
    ///
    /// Returns `true` once the mirror picker has replaced the placeholder.
    /// `false` means the caller should treat the URL as an ordinary link.
    pub async fn handle(&self, url: &str, ctx: &MessageContext, messenger: &dyn Messenger) -> bool {
        let link = match resolver::resolve(url) {
            Ok(link) => link,
            Err(e) => {
                tracing::warn!("[SF] could not extract project/path: {}", e);
                return false;
            }
        };

        tracing::info!(
            project = %link.project,
            rel_path = %link.rel_path,
            "[SF] SourceForge link detected"
        );

        let placeholder = match messenger.send_message(ctx, PLACEHOLDER_TEXT).await {
            Ok(sent) => sent,
            Err(e) => {
                tracing::error!("[SF] failed to send placeholder: {}", e);
                return false;
            }
        };

        let outcome = match self.build_menu(&link, &ProgressBar::hidden()).await {
            Ok(menu) => {
                messenger
                    .edit_message_text(&placeholder, &menu.text, Some(&menu.markup))
                    .await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("[SF] failed to build or show mirror menu: {}", e);
                if let Err(e) = messenger
                    .edit_message_text(&placeholder, FAILURE_TEXT, None)
                    .await
                {
                    tracing::debug!("[SF] failure notice not delivered: {}", e);
                }
                false
            }
        }
    }

    /// Mirror URL behind a clicked button, if the token is still cached
    pub fn resolve_callback(&self, data: &str) -> Option<String> {
        let token = parse_callback(data)?;
        let url = self.cache.get(token);
        if url.is_none() {
            tracing::warn!(
                token,
                cache_empty = self.cache.is_empty(),
                "[SF] unknown or expired mirror token"
            );
        }
        url
    }
}
