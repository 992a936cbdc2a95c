use crate::buttons::ButtonMenu;
use serde::{Deserialize, Serialize};

/// Mirror definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorDef {
    pub label: String,        // e.g. "🇩🇪 NetCologne (DE)"
    pub slug: Option<String>, // e.g. "netcologne"; None lets SourceForge pick
}

impl MirrorDef {
    #[cfg(test)]
    pub fn new(label: &str, slug: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            slug: slug.map(str::to_string),
        }
    }
}

/// Project and file path extracted from a SourceForge link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub project: String,
    pub rel_path: String,
}

/// Probe result for a single mirror
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub mirror: MirrorDef,
    pub url: String,
    pub latency: Option<f64>, // seconds, None on error or timeout
}

/// Text and button layout shown to the user
#[derive(Debug, Clone)]
pub struct SourceForgeMenu {
    pub text: String,
    pub markup: ButtonMenu,
}
