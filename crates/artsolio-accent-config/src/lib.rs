//! Session configuration for accent blocks.
//!
//! The host injects one configuration object before any accent block is
//! mounted: the size and offset preset tables, the group-variation flag and
//! the offset style strategy. It is read once and passed explicitly to the
//! engine. Missing pieces fall back to the built-in defaults per label, so a
//! partial table never leaves a preset without a value.

use serde::de::IgnoredAny;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse injected preset config: {0}")]
    InjectedParseError(#[from] serde_json::Error),
}

/// Preset label shared by the size and offset tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PresetLabel {
    XS,
    S,
    M,
    L,
    XL,
}

impl PresetLabel {
    pub const ALL: [PresetLabel; 5] = [
        PresetLabel::XS,
        PresetLabel::S,
        PresetLabel::M,
        PresetLabel::L,
        PresetLabel::XL,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PresetLabel::XS => "XS",
            PresetLabel::S => "S",
            PresetLabel::M => "M",
            PresetLabel::L => "L",
            PresetLabel::XL => "XL",
        }
    }

    /// Parse a label, ignoring surrounding whitespace and case
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(label))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PresetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const DEFAULT_SIZE_PRESETS: [&str; 5] = [
    "clamp(56px, 7cqi, 96px)",
    "clamp(64px, 9cqi, 120px)",
    "clamp(80px, 12cqi, 160px)",
    "clamp(96px, 15cqi, 200px)",
    "clamp(112px, 18cqi, 240px)",
];

const DEFAULT_OFFSET_PRESETS: [&str; 5] = ["0.25rem", "0.5rem", "0.75rem", "1rem", "1.5rem"];

/// Label → concrete CSS string, one entry per [`PresetLabel`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetTable {
    values: [String; 5],
}

impl PresetTable {
    fn from_literals(literals: [&str; 5]) -> Self {
        Self {
            values: literals.map(str::to_string),
        }
    }

    pub fn default_size() -> Self {
        Self::from_literals(DEFAULT_SIZE_PRESETS)
    }

    pub fn default_offset() -> Self {
        Self::from_literals(DEFAULT_OFFSET_PRESETS)
    }

    pub fn get(&self, label: PresetLabel) -> &str {
        &self.values[label.index()]
    }

    pub fn set(&mut self, label: PresetLabel, value: impl Into<String>) {
        self.values[label.index()] = value.into();
    }

    pub fn iter(&self) -> impl Iterator<Item = (PresetLabel, &str)> {
        PresetLabel::ALL
            .into_iter()
            .map(move |label| (label, self.get(label)))
    }

    /// Apply host overrides on top of `self`.
    ///
    /// Unknown labels and non-string values are ignored, and blank values
    /// keep the existing entry.
    fn with_overrides(
        mut self,
        table_name: &str,
        overrides: BTreeMap<String, PresetEntry>,
    ) -> Self {
        for (key, entry) in overrides {
            let Some(label) = PresetLabel::parse(&key) else {
                log::warn!("Ignoring unknown {table_name} preset label {key:?}");
                continue;
            };
            let PresetEntry::Text(value) = entry else {
                log::warn!("Ignoring non-string {table_name} preset {label}, keeping default");
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                log::debug!("Blank {table_name} preset {label}, keeping default");
                continue;
            }
            self.set(label, value);
        }
        self
    }
}

impl Serialize for PresetTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (label, value) in self.iter() {
            map.serialize_entry(label.as_str(), value)?;
        }
        map.end()
    }
}

/// How resolved offsets reach the stylesheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OffsetStyle {
    /// Offsets travel as custom properties; the `is-<corner>` class picks the sides
    #[default]
    CustomProperties,
    /// Offsets are written straight onto `top`/`right`/`bottom`/`left`
    InlineSides,
}

/// One table entry as written by the host; anything but a string is skipped
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PresetEntry {
    Text(String),
    Other(IgnoredAny),
}

/// On-disk / injected shape; every key is optional
#[derive(Debug, Default, Deserialize)]
struct RawPresetConfig {
    #[serde(default)]
    size: BTreeMap<String, PresetEntry>,
    #[serde(default)]
    offset: BTreeMap<String, PresetEntry>,
    #[serde(
        default,
        alias = "enableGroupVariation",
        alias = "enableCoreGroupVariation"
    )]
    enable_group_variation: Option<bool>,
    #[serde(default, alias = "offsetStyle")]
    offset_style: Option<OffsetStyle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetConfig {
    pub enable_group_variation: bool,
    pub offset_style: OffsetStyle,
    pub size: PresetTable,
    pub offset: PresetTable,
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            enable_group_variation: true,
            offset_style: OffsetStyle::default(),
            size: PresetTable::default_size(),
            offset: PresetTable::default_offset(),
        }
    }
}

impl From<RawPresetConfig> for PresetConfig {
    fn from(raw: RawPresetConfig) -> Self {
        Self {
            enable_group_variation: raw.enable_group_variation.unwrap_or(true),
            offset_style: raw.offset_style.unwrap_or_default(),
            size: PresetTable::default_size().with_overrides("size", raw.size),
            offset: PresetTable::default_offset().with_overrides("offset", raw.offset),
        }
    }
}

impl PresetConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let raw: RawPresetConfig = toml::from_str(content)?;
        Ok(raw.into())
    }

    /// Parse the JSON object the host page injects before the editor starts
    pub fn from_injected_json(content: &str) -> Result<Self, ConfigError> {
        let raw: RawPresetConfig = serde_json::from_str(content)?;
        Ok(raw.into())
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config =
            Self::from_toml_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load an explicit file, else the user config, else the built-in defaults.
    ///
    /// An explicit path that does not exist is an error; a missing user
    /// config is not.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_path(path)?.ok_or_else(|| ConfigError::ConfigReadError {
                config_path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/artsolio-accent");
        PathBuf::from(config_dir.as_ref()).join("presets.toml")
    }
}
