use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

use crate::cli::Args;
use crate::timer::state::{DEFAULT_BREAK_MINUTES, DEFAULT_FOCUS_MINUTES};

pub const DEBUG_ENV: &str = "SOFTPOMO_DEBUG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    pub enabled: bool,
    pub frequency_hz: f32,
    pub duration_ms: u64,
    pub volume: f32,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency_hz: 1000.0,
            duration_ms: 700,
            volume: 0.3,
        }
    }
}

/// Startup configuration. Read once, never written back.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub focus_minutes: i64,
    pub break_minutes: i64,
    pub alert: AlertSettings,
    pub frame_interval_ms: u64,
    pub log_file: PathBuf,
    #[serde(skip)]
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            alert: AlertSettings::default(),
            frame_interval_ms: 33,
            log_file: std::env::temp_dir().join("softpomo.log"),
            debug: false,
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Defaults, then the optional config file, then flags, then the
    /// environment.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut settings = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        settings.apply_args(args);
        settings.debug = std::env::var(DEBUG_ENV)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(settings)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(focus) = args.focus {
            self.focus_minutes = focus;
        }
        if let Some(rest) = args.break_minutes {
            self.break_minutes = rest;
        }
        if args.no_sound {
            self.alert.enabled = false;
        }
        if let Some(path) = &args.log_file {
            self.log_file = path.clone();
        }
    }
}
