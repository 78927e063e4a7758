// src/curate/config.rs
//! Curation configuration: impact keyword weights, ordered topic categories,
//! and the selection caps. Loads from TOML or JSON; resolution order is
//! `$CURATION_CONFIG_PATH`, then `config/curation.toml` on disk, then the
//! embedded default.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CURATION_CONFIG_PATH: &str = "CURATION_CONFIG_PATH";
pub const DEFAULT_CURATION_CONFIG_PATH: &str = "config/curation.toml";

/// Default shipped with the binary, so the engine runs without any files.
static EMBEDDED_DEFAULT: Lazy<CurationConfig> = Lazy::new(|| {
    CurationConfig::from_toml_str(include_str!("../../config/curation.toml"))
        .expect("embedded curation config is valid")
});

#[derive(Debug, Clone, Deserialize)]
pub struct CurationConfig {
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub dedup: DedupConfig,
    #[serde(default)]
    pub impact_weights: HashMap<String, u32>,
    /// Declaration order is the tie-break order; keep this a list, not a map.
    #[serde(default)]
    pub topics: Vec<TopicCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_main_story_cap")]
    pub main_story_cap: usize,
    #[serde(default = "default_main_story_pool")]
    pub main_story_pool: usize,
    #[serde(default = "default_main_story_secs")]
    pub main_story_secs: u32,
    #[serde(default = "default_main_topic_cap")]
    pub main_topic_cap: usize,
    #[serde(default = "default_quick_hit_cap")]
    pub quick_hit_cap: usize,
    #[serde(default = "default_quick_hit_pool")]
    pub quick_hit_pool: usize,
    #[serde(default = "default_quick_hit_secs")]
    pub quick_hit_secs: u32,
    #[serde(default = "default_combined_topic_cap")]
    pub combined_topic_cap: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DedupConfig {
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicCategory {
    pub name: String,
    pub keywords: Vec<String>,
}

fn default_main_story_cap() -> usize {
    6
}
fn default_main_story_pool() -> usize {
    10
}
fn default_main_story_secs() -> u32 {
    180
}
fn default_main_topic_cap() -> usize {
    2
}
fn default_quick_hit_cap() -> usize {
    12
}
fn default_quick_hit_pool() -> usize {
    15
}
fn default_quick_hit_secs() -> u32 {
    20
}
fn default_combined_topic_cap() -> usize {
    3
}
fn default_similarity_threshold() -> f64 {
    0.85
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            main_story_cap: default_main_story_cap(),
            main_story_pool: default_main_story_pool(),
            main_story_secs: default_main_story_secs(),
            main_topic_cap: default_main_topic_cap(),
            quick_hit_cap: default_quick_hit_cap(),
            quick_hit_pool: default_quick_hit_pool(),
            quick_hit_secs: default_quick_hit_secs(),
            combined_topic_cap: default_combined_topic_cap(),
        }
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl CurationConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: CurationConfig = toml::from_str(s)?;
        Ok(cfg.hardened())
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: CurationConfig = serde_json::from_str(s)?;
        Ok(cfg.hardened())
    }

    /// Load from an explicit path; format is picked by extension, with the
    /// other format tried as a fallback.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading curation config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if ext == "json" {
            if let Ok(cfg) = Self::from_json_str(&content) {
                return Ok(cfg);
            }
        } else if let Ok(cfg) = Self::from_toml_str(&content) {
            return Ok(cfg);
        }
        // Cross-format fallback before giving up.
        Self::from_toml_str(&content)
            .or_else(|_| Self::from_json_str(&content))
            .map_err(|_| anyhow!("unsupported curation config format: {}", path.display()))
    }

    /// Resolution order: env var, default path on disk, embedded default.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CURATION_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!(
                    "{} points to non-existent path {}",
                    ENV_CURATION_CONFIG_PATH,
                    pb.display()
                ));
            }
            return Self::load_from(&pb);
        }
        let default_path = PathBuf::from(DEFAULT_CURATION_CONFIG_PATH);
        if default_path.exists() {
            return Self::load_from(&default_path);
        }
        Ok(Self::embedded())
    }

    pub fn embedded() -> Self {
        EMBEDDED_DEFAULT.clone()
    }

    /// Clamp odd values rather than failing the run.
    fn hardened(mut self) -> Self {
        if !self.dedup.similarity_threshold.is_finite() {
            self.dedup.similarity_threshold = default_similarity_threshold();
        }
        self.dedup.similarity_threshold = self.dedup.similarity_threshold.clamp(0.0, 1.0);
        self
    }
}
