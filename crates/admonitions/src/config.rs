use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use pulldown_cmark::Options;
use serde::Deserialize;
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::admonition::recognizer::DEFAULT_MARKER;

/// Renderer configuration loaded from `admonitions.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub admonition: AdmonitionConfig,

    #[serde(default)]
    pub markdown: MarkdownConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdmonitionConfig {
    /// Fence character. Must be ASCII punctuation.
    #[serde(default = "default_marker")]
    pub marker: char,

    /// Emit `data-admonition` with the nesting depth on each container.
    #[serde(default = "default_depth_attribute")]
    pub depth_attribute: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarkdownConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<Extension>,
}

/// A pulldown-cmark extension that can be switched on by name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    IntoStaticStr,
    EnumIter,
    EnumString,
    Deserialize,
)]
#[serde(try_from = "String")]
#[strum(serialize_all = "kebab-case")]
pub enum Extension {
    Tables,
    Footnotes,
    Strikethrough,
    Tasklists,
    HeadingAttributes,
    SmartPunctuation,
}

impl Extension {
    #[must_use]
    pub fn option(self) -> Options {
        match self {
            Self::Tables => Options::ENABLE_TABLES,
            Self::Footnotes => Options::ENABLE_FOOTNOTES,
            Self::Strikethrough => Options::ENABLE_STRIKETHROUGH,
            Self::Tasklists => Options::ENABLE_TASKLISTS,
            Self::HeadingAttributes => Options::ENABLE_HEADING_ATTRIBUTES,
            Self::SmartPunctuation => Options::ENABLE_SMART_PUNCTUATION,
        }
    }
}

impl TryFrom<String> for Extension {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse().map_err(|_| {
            let known: Vec<&'static str> = Self::iter().map(<&'static str>::from).collect();
            format!(
                "unknown markdown extension `{name}`, expected one of: {}",
                known.join(", ")
            )
        })
    }
}

impl Config {
    /// Loads configuration from `path`.
    ///
    /// Falls back to defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or if
    /// it holds an invalid marker.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialization alone cannot rule out.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker is not ASCII punctuation.
    pub fn validate(&self) -> Result<()> {
        let marker = self.admonition.marker;
        ensure!(
            marker.is_ascii_punctuation(),
            "admonition marker must be an ASCII punctuation character, got {marker:?}"
        );
        Ok(())
    }
}

impl AdmonitionConfig {
    /// The marker as a byte, or `!` if it is not ASCII.
    #[must_use]
    pub fn marker_byte(&self) -> u8 {
        u8::try_from(self.marker)
            .ok()
            .filter(u8::is_ascii_punctuation)
            .unwrap_or(DEFAULT_MARKER)
    }
}

impl Default for AdmonitionConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            depth_attribute: default_depth_attribute(),
        }
    }
}

impl MarkdownConfig {
    /// Combined pulldown-cmark options for all enabled extensions.
    #[must_use]
    pub fn options(&self) -> Options {
        self.extensions
            .iter()
            .fold(Options::empty(), |options, ext| options | ext.option())
    }
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_marker() -> char {
    char::from(DEFAULT_MARKER)
}

fn default_depth_attribute() -> bool {
    true
}

fn default_extensions() -> Vec<Extension> {
    vec![
        Extension::Tables,
        Extension::Footnotes,
        Extension::Strikethrough,
        Extension::Tasklists,
    ]
}
