use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::browser::Browser;
use crate::cache::PageCache;
use crate::config::{Config, ExportFormat};
use crate::error::AppError;

mod browser;
mod bulletin;
mod cache;
mod chart;
mod config;
mod error;
mod export;
mod index;
mod model;
mod patterns;
mod pipeline;

/// 呼和浩特房地产市场运行情况 scraper: bulletins in, charts out.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// YAML config file; every key is optional
    #[arg(long, env = "FANGJIA_CONFIG")]
    config: Option<PathBuf>,
    /// Directory holding the cached html pages
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    /// Directory the charts and exports are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,
    /// Also write the collected records
    #[arg(long, value_enum)]
    export: Option<ExportFormat>,
}

impl Cli {
    fn into_config(self) -> Result<Config, AppError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(dir) = self.cache_dir {
            config.cache_dir = dir;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if self.no_charts {
            config.charts = false;
        }
        if self.export.is_some() {
            config.export = self.export;
        }
        Ok(config)
    }
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Cli::parse().into_config()?;
    info!(?config, "fangjia v{}", env!("CARGO_PKG_VERSION"));

    let cache = PageCache::new(&config.cache_dir, &config.base_url, Browser::new());
    let mut harvest = pipeline::collect_records(&cache, &config.index_pages)?;
    chart::sort_records(&mut harvest.records);
    let records = harvest.records;
    info!(months = records.len(), cache = %cache.dir().display(), "records ready");

    if let Some(format) = config.export {
        std::fs::create_dir_all(&config.output_dir).map_err(crate::error::ExportError::from)?;
        let path = match format {
            ExportFormat::Csv => {
                let path = config.output_dir.join("hohhot.csv");
                export::write_csv(&path, &records)?;
                path
            }
            ExportFormat::Json => {
                let path = config.output_dir.join("hohhot.json");
                export::write_json(&path, &records)?;
                path
            }
        };
        info!(file = %path.display(), "records exported");
    }

    if config.charts {
        let written = chart::render_charts(
            &records,
            &config.output_dir,
            (config.chart_width, config.chart_height),
        )?;
        info!(charts = written.len(), "done");
    }
    Ok(())
}
