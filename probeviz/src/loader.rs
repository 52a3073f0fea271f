//! CSV readers for the two benchmark datasets.
//!
//! Column names go through [`crate::schema`], so any of the known naming
//! variants is accepted. A missing file or column is reported as its own
//! error kind so the pipeline can skip only the charts that depend on it.

use std::path::Path;

use probemodel::{LoadFactorSample, ResizePolicy, ResizeSample};
use tracing::{debug, warn};

use crate::error::{Result, VizError};
use crate::schema::{ColumnMap, Field};

/// Load `q` plus whichever policy columns are present.
pub fn load_resize(path: &Path) -> Result<Vec<ResizeSample>> {
    let (columns, mut reader) = open(path)?;
    let q_idx = require(&columns, path, Field::Q)?;

    let policies: Vec<(ResizePolicy, usize)> = ResizePolicy::ALL
        .into_iter()
        .filter_map(|p| columns.index(Field::Resize(p)).map(|idx| (p, idx)))
        .collect();
    if policies.is_empty() {
        return Err(missing(&columns, path, "resize policy"));
    }
    for policy in ResizePolicy::ALL {
        if !columns.contains(Field::Resize(policy)) {
            warn!(path = %path.display(), %policy, "resize column missing, series skipped");
        }
    }

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = line_of(&record);
        let mut sample = ResizeSample::new(parse_cell(&record, q_idx, path, line, &columns)?);
        for &(policy, idx) in &policies {
            sample = sample.with_time(policy, parse_cell(&record, idx, path, line, &columns)?);
        }
        samples.push(sample);
    }

    debug!(path = %path.display(), rows = samples.len(), "loaded resize dataset");
    Ok(samples)
}

/// Load load factor, success and fail times; all three columns are required.
pub fn load_load_factor(path: &Path) -> Result<Vec<LoadFactorSample>> {
    let (columns, mut reader) = open(path)?;
    let lf_idx = require(&columns, path, Field::LoadFactor)?;
    let success_idx = require(&columns, path, Field::SuccessTime)?;
    let fail_idx = require(&columns, path, Field::FailTime)?;

    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = line_of(&record);
        samples.push(LoadFactorSample::new(
            parse_cell(&record, lf_idx, path, line, &columns)?,
            parse_cell(&record, success_idx, path, line, &columns)?,
            parse_cell(&record, fail_idx, path, line, &columns)?,
        ));
    }

    debug!(path = %path.display(), rows = samples.len(), "loaded load factor dataset");
    Ok(samples)
}

fn open(path: &Path) -> Result<(ColumnMap, csv::Reader<std::fs::File>)> {
    if !path.is_file() {
        return Err(VizError::MissingInputFile {
            path: path.to_path_buf(),
        });
    }
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let columns = ColumnMap::resolve(reader.headers()?.iter());
    Ok((columns, reader))
}

fn require(columns: &ColumnMap, path: &Path, field: Field) -> Result<usize> {
    columns
        .index(field)
        .ok_or_else(|| missing(columns, path, &field.to_string()))
}

fn missing(columns: &ColumnMap, path: &Path, field: &str) -> VizError {
    VizError::MissingColumn {
        path: path.to_path_buf(),
        field: field.to_string(),
        available: columns.headers().to_vec(),
    }
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or_default()
}

fn parse_cell<T: std::str::FromStr>(
    record: &csv::StringRecord,
    idx: usize,
    path: &Path,
    line: u64,
    columns: &ColumnMap,
) -> Result<T> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse().map_err(|_| VizError::Parse {
        path: path.to_path_buf(),
        line,
        column: columns.headers()[idx].clone(),
        value: raw.to_string(),
    })
}
