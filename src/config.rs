use crate::error::Result;
use crate::types::MirrorDef;
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

// Include the JSON file at compile time
const MIRRORS_JSON: &str = include_str!("../assets/mirrors.json");

// Parsed mirror table, fixed for the life of the process
static MIRRORS_CACHE: OnceLock<Vec<MirrorDef>> = OnceLock::new();

static SETTINGS: OnceLock<Settings> = OnceLock::new();

fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sfmirror").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Retrieve the SourceForge mirror table in definition order
/// Strategy:
/// 1. Try to load from User Config (~/.config/sfmirror/mirrors.json)
/// 2. Fallback to built-in assets/mirrors.json
pub fn get_mirrors() -> &'static [MirrorDef] {
    MIRRORS_CACHE.get_or_init(|| {
        if let Some(path) = config_dir().map(|d| d.join("mirrors.json")) {
            if path.exists() {
                match load_mirrors_from(&path) {
                    Ok(parsed) => {
                        tracing::info!(path = %path.display(), "loaded mirrors from local config");
                        return parsed;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), "ignoring local mirror list: {}", e);
                    }
                }
            }
        }

        builtin_mirrors()
    })
}

fn builtin_mirrors() -> Vec<MirrorDef> {
    serde_json::from_str(MIRRORS_JSON)
        .expect("Failed to parse assets/mirrors.json. This is a compile-time error.")
}

pub fn load_mirrors_from(path: &Path) -> Result<Vec<MirrorDef>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Runtime settings (~/.config/sfmirror/settings.toml). Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix of the direct download endpoint, without trailing slash
    pub download_base: String,
    pub probe_timeout_secs: u64,
    pub menu_columns: usize,
    pub cache_capacity: usize,
    pub cache_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            download_base: "https://downloads.sourceforge.net/project".to_string(),
            probe_timeout_secs: 10,
            menu_columns: 2,
            cache_capacity: 4096,
            cache_ttl_secs: 60 * 60,
        }
    }
}

impl Settings {
    /// Read settings from the user config dir, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = config_dir().map(|d| d.join("settings.toml")) else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), "invalid settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// A missing file yields the defaults; a malformed one is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Process-wide settings, loaded once
pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(Settings::load)
}
