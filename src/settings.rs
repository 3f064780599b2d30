// ABOUTME: Settings persistence and override precedence
// ABOUTME: CLI flag → env var → settings.json → defaults

use crate::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://your-wiki.js/graphql";
pub const API_URL_ENV: &str = "WIKIJS_API_URL";
pub const TOKEN_ENV: &str = "WIKIJS_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_url: String,
    pub bearer_token: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_url: DEFAULT_API_URL.into(),
            bearer_token: String::new(),
        }
    }
}

impl Settings {
    pub fn is_configured(&self) -> bool {
        !self.api_url.trim().is_empty() && !self.bearer_token.trim().is_empty()
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(url) = overrides.api_url {
            self.api_url = url;
        }
        if let Some(token) = overrides.bearer_token {
            self.bearer_token = token;
        }
        self
    }
}

/// Values that shadow the stored settings for one invocation.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub bearer_token: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Overrides {
            api_url: non_empty(API_URL_ENV),
            bearer_token: non_empty(TOKEN_ENV),
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path_override: Option<PathBuf>) -> Result<Self> {
        let path = if let Some(path) = path_override {
            path
        } else {
            ProjectDirs::from("", "", "wikipub")
                .ok_or_else(|| {
                    Error::Filesystem(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "Could not determine config directory",
                    ))
                })?
                .config_dir()
                .join("settings.json")
        };

        Ok(SettingsStore { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file yields defaults; missing keys are filled from defaults.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;

        // The file holds a bearer token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
