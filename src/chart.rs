use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{info, warn};

use crate::error::ChartError;
use crate::model::{HouseSegment, MonthlyRecord};

pub enum Metric {
    Value(fn(&MonthlyRecord) -> f64),
    /// area / units of a segment; a zero unit count is fatal.
    AvgArea(fn(&MonthlyRecord) -> &HouseSegment),
}

pub struct ChartSpec {
    pub name: &'static str,
    pub metric: Metric,
}

impl ChartSpec {
    pub fn series(&self, records: &[MonthlyRecord]) -> Result<Vec<f64>, ChartError> {
        records
            .iter()
            .map(|r| match self.metric {
                Metric::Value(get) => Ok(get(r)),
                Metric::AvgArea(segment) => {
                    segment(r)
                        .avg_area_per_unit()
                        .ok_or_else(|| ChartError::ZeroUnits {
                            metric: self.name,
                            label: r.label(),
                        })
                }
            })
            .collect()
    }
}

fn new_residential(r: &MonthlyRecord) -> &HouseSegment {
    &r.new_house.residential
}

fn old_residential(r: &MonthlyRecord) -> &HouseSegment {
    &r.old_house.residential
}

/// The charts drawn for every run, in drawing order.
pub fn chart_specs() -> Vec<ChartSpec> {
    vec![
        ChartSpec { name: "commercial_list_info", metric: Metric::Value(|r| r.commercial_list.value) }, // 新建商品房面积
        ChartSpec { name: "residential_list_info", metric: Metric::Value(|r| r.residential_list.value) }, // 新建住宅面积
        ChartSpec { name: "new_house.commercial_area", metric: Metric::Value(|r| r.new_house.commercial.area.value) },
        ChartSpec { name: "new_house.commercial_unit", metric: Metric::Value(|r| r.new_house.commercial.unit.value) },
        ChartSpec { name: "new_house.residential_area", metric: Metric::Value(|r| r.new_house.residential.area.value) },
        ChartSpec { name: "new_house.residential_unit", metric: Metric::Value(|r| r.new_house.residential.unit.value) },
        ChartSpec { name: "old_house.residential_unit", metric: Metric::Value(|r| r.old_house.residential.unit.value) }, // 二手住宅成交套数
        ChartSpec { name: "old_house.residential_area", metric: Metric::Value(|r| r.old_house.residential.area.value) },
        ChartSpec { name: "new_house.residential_avg_area_per_house", metric: Metric::AvgArea(new_residential) },
        ChartSpec { name: "old_house.residential_avg_area_per_house", metric: Metric::AvgArea(old_residential) },
    ]
}

pub fn sort_records(records: &mut [MonthlyRecord]) {
    records.sort_by_key(|r| r.key());
}

pub fn x_axis_labels(records: &[MonthlyRecord]) -> Vec<String> {
    records.iter().map(MonthlyRecord::label).collect()
}

fn y_range(values: &[f64]) -> (f64, f64) {
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    let min = values.iter().cloned().fold(f64::MAX, f64::min);
    let pad = if max > min { (max - min) / 10.0 } else { 1.0 };
    let low = match min - pad {
        x if x > 0.0 => x,
        _ => 0.0,
    };
    (low, max + pad)
}

/// Draws one PNG line chart per metric into `dir`. `records` must already be sorted.
pub fn render_charts(
    records: &[MonthlyRecord],
    dir: &Path,
    size: (u32, u32),
) -> Result<Vec<PathBuf>, ChartError> {
    if records.is_empty() {
        warn!("no records, nothing to draw");
        return Ok(Vec::new());
    }
    fs::create_dir_all(dir)?;
    let labels = x_axis_labels(records);
    let mut written = Vec::new();
    for spec in chart_specs() {
        let values = spec.series(records)?;
        let path = dir.join(format!("{}.png", spec.name));
        draw(&path, size, spec.name, &labels, &values)?;
        info!(file = %path.display(), "chart written");
        written.push(path);
    }
    Ok(written)
}

fn draw(
    path: &Path,
    size: (u32, u32),
    metric: &'static str,
    labels: &[String],
    values: &[f64],
) -> Result<(), ChartError> {
    let fail = |e: String| ChartError::Drawing { metric, reason: e };
    let (low, high) = y_range(values);
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| fail(e.to_string()))?;
    let root = root.margin(10, 10, 10, 10);
    let mut chart = ChartBuilder::on(&root)
        .caption(metric, ("sans-serif", 30).into_font())
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..(labels.len().max(2) - 1) as f64, low..high)
        .map_err(|e| fail(e.to_string()))?;
    chart
        .configure_mesh()
        .x_labels(labels.len().min(40))
        .y_labels(5)
        .x_label_formatter(&|x| {
            if x.fract() != 0.0 || *x < 0.0 {
                return String::new();
            }
            labels.get(*x as usize).cloned().unwrap_or_default()
        })
        .draw()
        .map_err(|e| fail(e.to_string()))?;
    chart
        .draw_series(LineSeries::new(
            values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
            &RED,
        ))
        .map_err(|e| fail(e.to_string()))?;
    root.present().map_err(|e| fail(e.to_string()))?;
    Ok(())
}
