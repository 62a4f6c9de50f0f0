use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;
use word_segment::{Order, DEFAULT_LIMIT, DEFAULT_THRESHOLD};

/// Settings read from the TOML file passed with `--config`
///
/// Every value is optional; command-line flags take precedence over the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub usage: ModelConfig,
    pub documents: ModelConfig,
    pub segment: SegmentConfig,
    pub keywords: KeywordsConfig,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => return Ok(Self::default()),
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str::<Self>(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

/// Where to find one set of counts and how to read it
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Separator between word and count on each line
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Token count of the full corpus; the model's built-in total if left out
    #[serde(default)]
    pub total: Option<f64>,
    /// Use the sum of all counts as the total instead
    #[serde(default)]
    pub sum_counts: bool,
}

impl ModelConfig {
    /// Total to build the model with, `None` meaning the sum of its counts
    pub fn total_or(&self, default: f64) -> Option<f64> {
        if self.sum_counts {
            None
        } else {
            Some(self.total.unwrap_or(default))
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: default_delimiter(),
            total: None,
            sum_counts: false,
        }
    }
}

fn default_delimiter() -> char {
    ' '
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Maximum length in chars of the first word at each split point
    pub limit: usize,
    /// Reject input lines longer than this many chars
    pub max_chars: Option<usize>,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            max_chars: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeywordsConfig {
    pub threshold: f64,
    pub order: Order,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            order: Order::Ascending,
        }
    }
}

/// Token count of the corpus behind the usage counts
pub const USAGE_TOTAL: f64 = 43_514_267_000_000.0;
/// Token count of the corpus behind the document-frequency counts
pub const DOCUMENTS_TOTAL: f64 = 43_772_962_000_000.0;
