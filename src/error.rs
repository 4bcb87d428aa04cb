use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while obtaining a page, either from the network or the cache directory.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("cache file {path}: {source}")]
    Cache {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("page {0} is not valid UTF-8")]
    Utf8(String),
}

/// Failure while pulling figures out of a bulletin page.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("container div#para not found")]
    MissingContainer,
    #[error("sentence for {0} not found")]
    SentenceMissing(&'static str),
    #[error("bad number in group {group}: {text:?}")]
    BadNumber { group: String, text: String },
    #[error("invalid figure for {field}: {reason}")]
    InvalidFigure { field: &'static str, reason: String },
}

/// Why a single month was left out of the series.
#[derive(Debug, Error)]
pub enum MonthError {
    #[error("bulletin fetch: {0}")]
    Fetch(#[from] FetchError),
    #[error("bulletin parse: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("{metric}: unit count is zero for {label}")]
    ZeroUnits { metric: &'static str, label: String },
    #[error("drawing {metric} failed: {reason}")]
    Drawing { metric: &'static str, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
