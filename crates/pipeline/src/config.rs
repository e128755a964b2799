use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use music_gen::OutputNaming;
use serde::{Deserialize, Serialize};
use tune_core::{DecodingParams, LoudnessParams};

/// Process-wide settings. Every field defaults to the stock service values,
/// so an absent config file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub bind: String,
    pub output_dir: PathBuf,
    /// URL prefix the output directory is served under.
    pub static_prefix: String,
    pub output_naming: OutputNaming,
    pub categories_dir: PathBuf,
    pub cache_category_embeddings: bool,
    pub max_upload_bytes: usize,
    pub max_image_side: u32,
    pub decoding: DecodingParams,
    pub loudness: LoudnessParams,
    pub translation: ServerSettings,
    pub embedding: ServerSettings,
    pub generation: GenerationSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub endpoint: String,
    /// Token limit the server truncates input to.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_max_length() -> usize { 77 }
fn default_model() -> String { "large".to_string() }

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            output_dir: PathBuf::from("audio_files"),
            static_prefix: "/audio_files".to_string(),
            output_naming: OutputNaming::PerJob,
            categories_dir: PathBuf::from("data/categories"),
            cache_category_embeddings: true,
            max_upload_bytes: 20 * 1024 * 1024,
            max_image_side: visual_tags::DEFAULT_MAX_SIDE,
            decoding: DecodingParams::default(),
            loudness: LoudnessParams::default(),
            translation: ServerSettings::at("http://127.0.0.1:9001"),
            embedding: ServerSettings::at("http://127.0.0.1:9002"),
            generation: GenerationSettings {
                endpoint: "http://127.0.0.1:9003".to_string(),
                model: default_model(),
                timeout_secs: None,
            },
        }
    }
}

impl ServerSettings {
    fn at(endpoint: &str) -> Self {
        Self { endpoint: endpoint.to_string(), max_length: default_max_length(), timeout_secs: None }
    }

    pub fn timeout(&self) -> Option<Duration> { self.timeout_secs.map(Duration::from_secs) }
}

impl GenerationSettings {
    pub fn timeout(&self) -> Option<Duration> { self.timeout_secs.map(Duration::from_secs) }
}

impl Settings {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        toml::from_str(src).context("invalid settings")
    }

    /// Defaults when `path` is `None`; otherwise the file must exist and parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let src = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&src).with_context(|| format!("in {}", path.display()))
    }
}
