use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::ExportError;
use crate::model::{BulletinFigures, MetricTriple, MonthlyRecord};

/// Header row: `year,month,href` then `{slot}_value,{slot}_yoy,{slot}_mom`
/// for every triple, slots named as in [`BulletinFigures::triples`].
fn header() -> Vec<String> {
    let mut columns = vec!["year".to_string(), "month".to_string(), "href".to_string()];
    for (slot, _) in BulletinFigures::default().triples() {
        let slot = slot.replace('.', "_");
        for suffix in ["value", "yoy", "mom"] {
            columns.push(format!("{}_{}", slot, suffix));
        }
    }
    columns
}

fn row(record: &MonthlyRecord) -> Vec<String> {
    let mut fields = vec![record.year.to_string(), record.month.to_string(), record.href.clone()];
    let figures = record.figures();
    for (_, triple) in figures.triples() {
        let MetricTriple { value, yoy, mom } = *triple;
        fields.extend([value, yoy, mom].iter().map(f64::to_string));
    }
    fields
}

/// One CSV line per month with every triple flattened into three columns.
pub fn write_csv(path: &Path, records: &[MonthlyRecord]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(header())?;
    for record in records {
        wtr.write_record(row(record))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json(path: &Path, records: &[MonthlyRecord]) -> Result<(), ExportError> {
    let out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(out, records)?;
    Ok(())
}
