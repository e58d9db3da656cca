use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::{api::endpoints::VideoOptions, store::WritePolicy};

const DEBUG_CADENCE_SECS: u64 = 2;

/// Seconds between scheduled polls of each resource. Persons have no cadence:
/// they load once at startup and after every person mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PollCadence {
    pub stats_secs: u64,
    pub streams_secs: u64,
    pub logs_secs: u64,
    pub jobs_secs: u64,
}

impl Default for PollCadence {
    fn default() -> Self {
        Self {
            stats_secs: 30,
            streams_secs: 10,
            logs_secs: 30,
            jobs_secs: 15,
        }
    }
}

impl PollCadence {
    fn debug() -> Self {
        Self {
            stats_secs: DEBUG_CADENCE_SECS,
            streams_secs: DEBUG_CADENCE_SECS,
            logs_secs: DEBUG_CADENCE_SECS,
            jobs_secs: DEBUG_CADENCE_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VideoDefaults {
    pub options: VideoOptions,
    pub upload_report_format: String,
    pub youtube_quality: String,
    pub youtube_report_format: String,
}

impl Default for VideoDefaults {
    fn default() -> Self {
        Self {
            options: VideoOptions::default(),
            upload_report_format: "html".into(),
            youtube_quality: "720p".into(),
            youtube_report_format: "json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsoleSettings {
    pub base_url: String,
    pub cadence: PollCadence,
    pub logs_limit: u32,
    pub notification_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub write_policy: WritePolicy,
    pub video: VideoDefaults,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            cadence: PollCadence::default(),
            logs_limit: 10,
            notification_timeout_secs: 5,
            request_timeout_secs: 10,
            write_policy: WritePolicy::default(),
            video: VideoDefaults::default(),
        }
    }
}

impl ConsoleSettings {
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Overlay `FACEDASH_BASE_URL` and `FACEDASH_DEBUG` from `env`. The result
    /// is never written back to the settings file.
    fn with_env(mut self, env: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = env("FACEDASH_BASE_URL") {
            if !base_url.trim().is_empty() {
                self.base_url = base_url.trim().to_string();
            }
        }

        let debug_mode = env("FACEDASH_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if debug_mode {
            self.cadence = PollCadence::debug();
        }
        self
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ConsoleSettings>,
}

impl SettingsStore {
    /// Missing or unreadable files fall back to defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("Ignoring malformed settings in {}: {err}", path.display());
                ConsoleSettings::default()
            })
        } else {
            ConsoleSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// `FACEDASH_SETTINGS`, or `facedash.json` in the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var("FACEDASH_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("facedash.json"))
    }

    /// Effective settings: the file-backed values with environment
    /// overrides applied on top.
    pub fn current(&self) -> ConsoleSettings {
        self.current_with(|key| std::env::var(key).ok())
    }

    fn current_with(&self, env: impl Fn(&str) -> Option<String>) -> ConsoleSettings {
        self.read().clone().with_env(env)
    }

    pub fn update_base_url(&self, base_url: &str) -> Result<()> {
        let mut guard = self.write();
        guard.base_url = base_url.trim_end_matches('/').to_string();
        self.persist(&guard)
    }

    fn read(&self) -> RwLockReadGuard<'_, ConsoleSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConsoleSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, data: &ConsoleSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
