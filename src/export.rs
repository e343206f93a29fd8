// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Writes records to timestamped CSV files.

use crate::clock::Clock;
use crate::record::Record;
use csv::WriterBuilder;
use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Writes batches of records to CSV files in an output directory.
#[derive(Debug)]
pub struct Exporter<C: Clock> {
    dir: PathBuf,
    clock: C,
}

impl<C: Clock> Exporter<C> {
    /// Creates an exporter writing into `dir`, naming files with
    /// timestamps taken from `clock`.
    ///
    /// The directory is not created until something is exported.
    pub fn new(dir: impl Into<PathBuf>, clock: C) -> Self {
        let dir = dir.into();
        Self { dir, clock }
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// A file name for an export starting with `prefix`, such as
    /// `utah_ai_posts_2025-07-04_13-05-59.csv`.
    pub fn filename(&self, prefix: &str) -> String {
        format!("{prefix}_{}.csv", self.clock.timestamp())
    }

    /// Writes `records` to a new file starting with `prefix` and returns
    /// its path.
    ///
    /// The file always starts with a header row, so an empty batch still
    /// produces a file containing only the header.
    pub fn export<R: Record>(&self, prefix: &str, records: &[R]) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(self.filename(prefix));
        debug!("writing {} records to {}", records.len(), path.display());

        let mut writer = WriterBuilder::new().has_headers(false).from_path(&path)?;
        writer.write_record(R::headers())?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        info!("wrote {} records to {}", records.len(), path.display());
        Ok(path)
    }
}

/// An error writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output directory or file could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record could not be written as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
