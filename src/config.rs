use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::locale::Language;
use crate::puzzle::model::{CrossingInput, GroupCount};

pub const SETTINGS_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Settings {
    pub language: Language,
    pub theme: Theme,
    pub reveal_delay_ms: u64,
    pub show_breakdown: bool,
    pub groups: CrossingInput,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::English,
            theme: Theme::Dark,
            reveal_delay_ms: default_reveal_delay_ms(),
            show_breakdown: true,
            groups: default_groups(),
        }
    }
}

/// Reads the settings file, falling back to defaults when it does not exist yet.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("{} not found, using default settings", path.display());
            return Ok(Settings::default());
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("unable to read settings file {}", path.display()));
        }
    };
    parse_settings_text(&content)
}

pub fn parse_settings_text(content: &str) -> Result<Settings> {
    let raw = serde_json::from_str::<SettingsFile>(content).map_err(|err| {
        let line = err.line();
        let column = err.column();
        anyhow::anyhow!("invalid JSON at line {line}, column {column}: {err}")
    })?;

    if raw.version != SETTINGS_VERSION {
        bail!(
            "unsupported settings version {}; expected version {SETTINGS_VERSION}",
            raw.version
        );
    }

    Ok(Settings {
        language: raw.language,
        theme: raw.theme,
        reveal_delay_ms: raw.reveal_delay_ms,
        show_breakdown: raw.show_breakdown,
        groups: raw.groups,
    })
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    let payload = json!({
        "version": SETTINGS_VERSION,
        "language": settings.language.code(),
        "theme": settings.theme.as_str(),
        "reveal_delay_ms": settings.reveal_delay_ms,
        "show_breakdown": settings.show_breakdown,
        "groups": {
            "red": settings.groups.red.get(),
            "green": settings.groups.green.get(),
            "blue": settings.groups.blue.get()
        }
    });
    let text = serde_json::to_string_pretty(&payload)?;
    fs::write(path, format!("{text}\n"))
        .with_context(|| format!("unable to write settings file {}", path.display()))?;
    info!("saved settings to {}", path.display());
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    version: u32,
    #[serde(default)]
    language: Language,
    #[serde(default)]
    theme: Theme,
    #[serde(default = "default_reveal_delay_ms")]
    reveal_delay_ms: u64,
    #[serde(default = "default_show_breakdown")]
    show_breakdown: bool,
    #[serde(default = "default_groups")]
    groups: CrossingInput,
}

fn default_reveal_delay_ms() -> u64 {
    1_000
}

fn default_show_breakdown() -> bool {
    true
}

fn default_groups() -> CrossingInput {
    CrossingInput {
        red: GroupCount::new(3),
        green: GroupCount::new(3),
        blue: GroupCount::new(1),
    }
}
