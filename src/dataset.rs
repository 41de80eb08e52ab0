// src/dataset.rs

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, BooleanArray, Float64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{info, instrument};

use crate::config::OutputFormat;
use crate::process::{reshape, RawBatch, RawTable, Trial};

pub const COLUMNS: [&str; 7] = [
    "event_name",
    "year",
    "athlete",
    "location",
    "date",
    "DOB",
    "result",
];

/// The final table: one row per attempt, in collection order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Dataset {
    pub trials: Vec<Trial>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }
}

/// Stack every collected batch and reshape it. No batches, or batches with
/// no trial rows, give an explicitly empty dataset.
#[instrument(level = "info", skip_all, fields(batches = batches.len()))]
pub fn assemble(batches: Vec<RawBatch>) -> Dataset {
    let batches: Vec<RawBatch> = batches.into_iter().filter(|b| !b.is_empty()).collect();
    if batches.is_empty() {
        return Dataset::empty();
    }
    let table = RawTable::concat(batches);
    info!(raw_rows = table.len(), width = table.width, "assembled raw table");
    Dataset {
        trials: reshape(&table),
    }
}

/// `all_athlete_trials_{event}_{sex}.{ext}` under `dir`.
pub fn output_path(dir: &Path, event: &str, sex: &str, format: OutputFormat) -> PathBuf {
    dir.join(format!(
        "all_athlete_trials_{}_{}.{}",
        event,
        sex,
        format.extension()
    ))
}

/// Write the dataset; an empty dataset writes nothing and returns `None`.
pub fn write_dataset(dataset: &Dataset, path: &Path, format: OutputFormat) -> Result<Option<PathBuf>> {
    if dataset.is_empty() {
        return Ok(None);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    match format {
        OutputFormat::Csv => write_csv(dataset, path)?,
        OutputFormat::Parquet => write_parquet(dataset, path)?,
    }
    info!(path = %path.display(), rows = dataset.len(), "saved");
    Ok(Some(path.to_path_buf()))
}

pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV file {}", path.display()))?;
    for trial in &dataset.trials {
        wtr.serialize(trial)
            .with_context(|| format!("writing row to {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

fn text_column<'a>(trials: &'a [Trial], get: impl Fn(&'a Trial) -> &'a Option<String>) -> ArrayRef {
    Arc::new(trials.iter().map(|t| get(t).as_deref()).collect::<StringArray>())
}

pub fn to_record_batch(dataset: &Dataset) -> Result<RecordBatch> {
    let mut fields: Vec<Field> = COLUMNS[..6]
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, true))
        .collect();
    fields.push(Field::new("result", DataType::Float64, true));
    fields.push(Field::new("foul", DataType::Boolean, false));
    let schema = Arc::new(Schema::new(fields));

    let t = &dataset.trials;
    let columns: Vec<ArrayRef> = vec![
        text_column(t, |r| &r.event_name),
        text_column(t, |r| &r.year),
        text_column(t, |r| &r.athlete),
        text_column(t, |r| &r.location),
        text_column(t, |r| &r.date),
        text_column(t, |r| &r.date_of_birth),
        Arc::new(t.iter().map(|r| r.result.mark()).collect::<Float64Array>()),
        Arc::new(BooleanArray::from(
            t.iter().map(|r| r.result.is_foul()).collect::<Vec<_>>(),
        )),
    ];

    RecordBatch::try_new(schema, columns).context("building trial record batch")
}

pub fn write_parquet(dataset: &Dataset, path: &Path) -> Result<()> {
    let batch = to_record_batch(dataset)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Arrow writer for trials")?;
    writer.write(&batch).context("writing trial batch")?;
    writer.close().context("closing trial writer")?;
    Ok(())
}
