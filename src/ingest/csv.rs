// src/ingest/csv.rs

use crate::errors::AppError;
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Loads the listings table from a local CSV path or an http(s) URL.
/// Remote datasets are downloaded to a temp file first, then read like
/// any local file.
pub fn load_table(source: &str) -> Result<DataFrame, AppError> {
    let path = if source.starts_with("http://") || source.starts_with("https://") {
        download_csv_file(source)?
    } else {
        PathBuf::from(source)
    };
    read_csv(&path)
}

fn read_csv(path: &Path) -> Result<DataFrame, AppError> {
    let df = CsvReader::from_path(path)
        .map_err(|e| AppError::DataError(format!("cannot open {}: {e}", path.display())))?
        .finish()
        .map_err(|e| AppError::DataError(format!("cannot parse {}: {e}", path.display())))?;

    println!("Loaded {} rows and {} columns", df.height(), df.width());
    Ok(df)
}

/// Fetches a remote CSV onto disk and returns the local path.
fn download_csv_file(url: &str) -> Result<PathBuf, AppError> {
    println!("Downloading dataset from {url}...");

    let response = reqwest::blocking::get(url)
        .map_err(|e| AppError::DataError(format!("download failed: {e}")))?;
    let bytes = response
        .bytes()
        .map_err(|e| AppError::DataError(format!("download failed: {e}")))?;

    let path = std::env::temp_dir().join("immoprice_dataset.csv");
    std::fs::write(&path, bytes)
        .map_err(|e| AppError::DataError(format!("cannot write {}: {e}", path.display())))?;

    Ok(path)
}
