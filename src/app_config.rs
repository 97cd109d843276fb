use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::model::assembly::AssemblyLimits;
use crate::model::DesignVariant;
use crate::providers::EnrichmentOptions;

/// Application configuration module
/// This module handles loading, creating and validating the JSON
/// configuration file.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Hub defaults
    #[serde(default)]
    pub hub: HubConfig,

    /// Artifact generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Enrichment provider settings
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

/// Defaults applied to hubs without an explicit name or design
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HubConfig {
    // @field: Hub display name
    #[serde(default = "default_hub_name")]
    pub name: String,

    // @field: Presentation variant
    #[serde(default)]
    pub design: DesignVariant,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            name: default_hub_name(),
            design: DesignVariant::default(),
        }
    }
}

/// Artifact generation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationConfig {
    /// Channel count above which videos per channel are capped
    #[serde(default = "default_channel_limit_threshold")]
    pub channel_limit_threshold: usize,

    /// Videos kept per channel once the threshold is exceeded
    #[serde(default = "default_videos_per_channel_cap")]
    pub videos_per_channel_cap: usize,

    /// Spacing before a single-media public companion is delivered
    #[serde(default = "default_single_companion_delay_ms")]
    pub single_companion_delay_ms: u64,

    /// Spacing before a hub public companion is delivered
    #[serde(default = "default_hub_companion_delay_ms")]
    pub hub_companion_delay_ms: u64,

    /// Watermark text shown over players; empty disables it
    #[serde(default = "default_watermark_text")]
    pub watermark_text: String,

    /// Document language attribute
    #[serde(default = "default_lang")]
    pub lang: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            channel_limit_threshold: default_channel_limit_threshold(),
            videos_per_channel_cap: default_videos_per_channel_cap(),
            single_companion_delay_ms: default_single_companion_delay_ms(),
            hub_companion_delay_ms: default_hub_companion_delay_ms(),
            watermark_text: default_watermark_text(),
            lang: default_lang(),
        }
    }
}

impl GenerationConfig {
    /// Assembly limits derived from this section
    pub fn limits(&self) -> AssemblyLimits {
        AssemblyLimits {
            channel_limit_threshold: self.channel_limit_threshold,
            videos_per_channel_cap: self.videos_per_channel_cap,
        }
    }
}

/// Enrichment provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentProvider {
    // @provider: Enrichment disabled
    #[default]
    None,
    // @provider: Anthropic
    Anthropic,
    // @provider: Deterministic mock
    Mock,
}

impl std::fmt::Display for EnrichmentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Anthropic => "anthropic",
            Self::Mock => "mock",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for EnrichmentProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "anthropic" => Ok(Self::Anthropic),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid enrichment provider: {}", s)),
        }
    }
}

/// Enrichment provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnrichmentConfig {
    // @field: Provider type identifier
    #[serde(default)]
    pub provider: EnrichmentProvider,

    // @field: Model name
    #[serde(default = "default_anthropic_model")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "default_anthropic_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Fields to enrich
    #[serde(default)]
    pub options: EnrichmentOptions,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            provider: EnrichmentProvider::default(),
            model: default_anthropic_model(),
            api_key: String::new(),
            endpoint: default_anthropic_endpoint(),
            timeout_secs: default_timeout_secs(),
            options: EnrichmentOptions::default(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Platform floor for the single-media companion spacing
pub const MIN_SINGLE_COMPANION_DELAY_MS: u64 = 500;
/// Platform floor for the hub companion spacing
pub const MIN_HUB_COMPANION_DELAY_MS: u64 = 1000;

fn default_hub_name() -> String {
    "Clip Hub".to_string()
}

fn default_channel_limit_threshold() -> usize {
    5
}

fn default_videos_per_channel_cap() -> usize {
    10
}

fn default_single_companion_delay_ms() -> u64 {
    MIN_SINGLE_COMPANION_DELAY_MS
}

fn default_hub_companion_delay_ms() -> u64 {
    MIN_HUB_COMPANION_DELAY_MS
}

fn default_watermark_text() -> String {
    "CLIP STUDIO".to_string()
}

fn default_lang() -> String {
    "pt-BR".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Load the configuration at `path`, writing a default file when it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path).context(format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            let config: Config =
                serde_json::from_reader(reader).context(format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        let config_json =
            serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write default config to file: {:?}", path))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.generation.videos_per_channel_cap == 0 {
            return Err(anyhow!("generation.videos_per_channel_cap must be greater than zero"));
        }

        if self.hub.name.trim().is_empty() {
            return Err(anyhow!("hub.name must not be empty"));
        }

        if self.enrichment.provider != EnrichmentProvider::None && self.enrichment.timeout_secs == 0 {
            return Err(anyhow!("enrichment.timeout_secs must be greater than zero"));
        }

        if self.enrichment.provider == EnrichmentProvider::Anthropic && self.enrichment.api_key.trim().is_empty() {
            return Err(anyhow!("Enrichment API key is required for Anthropic provider"));
        }

        Ok(())
    }
}
