use crate::error::{CatalogError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Index page listing the per-subject course description pages
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_base_url() -> String {
    "https://catalog.uic.edu/ucat/course-descriptions/".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; CourseCatalogScraper/1.0; +https://catalog.uic.edu)".to_string()
}

fn default_timeout_seconds() -> u64 {
    20
}

fn default_max_words() -> usize {
    500
}

fn default_overlap() -> usize {
    80
}

fn default_output_dir() -> String {
    "output/rag_export".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_words: default_max_words(),
            overlap: default_overlap(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            chunking: ChunkingConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    pub fn load(config_path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            CatalogError::Config(format!("Failed to read config file '{}': {}", config_path, e))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Load `config.toml` when present, otherwise fall back to defaults.
    pub fn load_or_default(config_path: &str) -> Result<Self> {
        if Path::new(config_path).exists() {
            Self::load(config_path)
        } else {
            Ok(Self::default())
        }
    }
}
