use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::index::default_index_pages;

pub const BASE_URL: &str = "http://zfcxjsj.huhhot.gov.cn/tjsj/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Run settings. Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub index_pages: Vec<String>,
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
    pub charts: bool,
    pub export: Option<ExportFormat>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: BASE_URL.to_string(),
            index_pages: default_index_pages(),
            cache_dir: PathBuf::from("."),
            output_dir: PathBuf::from("data"),
            chart_width: 1024,
            chart_height: 480,
            charts: true,
            export: None,
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str, path: &Path) -> Result<Config, ConfigError> {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_yaml(&text, path)
    }
}
