// src/pipeline/mod.rs
//
// Batch orchestration: clean the raw table, partition it into
// (property type, region) segments, filter outliers, and train each
// segment. One bad segment never aborts the batch; failures are
// collected and reported at the end.

pub mod clean;
pub mod correlate;
pub mod explore;
pub mod outliers;

use crate::db::Database;
use crate::domain::columns;
use crate::domain::property::{PropertyType, Segment};
use crate::domain::restrictions::Restrictions;
use crate::errors::AppError;
use crate::model::trainer::{train_segment, SegmentReport, TrainConfig};
use polars::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct TrainingSummary {
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub unmapped_zip_rows_removed: usize,
    pub unknown_property_type_rows: usize,
    pub trained: Vec<SegmentReport>,
    pub failed: Vec<(Segment, String)>,
}

/// Runs the full pipeline over a raw listings table, persisting one
/// artifact per (segment, model kind) into the store.
pub fn run_training(
    db: &Database,
    raw: &DataFrame,
    restrictions: &Restrictions,
    cfg: &TrainConfig,
) -> Result<TrainingSummary, AppError> {
    let rows_loaded = raw.height();
    let cleaned = clean::clean(raw)?;
    println!(
        "Cleaned table: {} rows ({} duplicates, {} rows without a region removed)",
        cleaned.df.height(),
        cleaned.duplicates_removed,
        cleaned.unmapped_zip_rows_removed
    );

    let (segments, unknown_property_type_rows) = partition_segments(&cleaned.df)?;

    let mut trained = Vec::new();
    let mut failed = Vec::new();

    for (segment, indices) in segments {
        let take = UInt32Chunked::from_vec("", indices);
        let segment_df = cleaned
            .df
            .take(&take)
            .map_err(|e| AppError::DataError(e.to_string()))?;

        let filtered = outliers::filter(&segment_df, &segment, restrictions)?;
        let outliers_removed = segment_df.height() - filtered.height();
        println!(
            "Segment {segment}: {} rows ({outliers_removed} outliers removed)",
            filtered.height()
        );

        match train_segment(db, &filtered, segment, cfg) {
            Ok(report) => trained.push(report),
            Err(err) => {
                eprintln!("Segment {segment} failed: {err}");
                failed.push((segment, err.to_string()));
            }
        }
    }

    Ok(TrainingSummary {
        rows_loaded,
        duplicates_removed: cleaned.duplicates_removed,
        unmapped_zip_rows_removed: cleaned.unmapped_zip_rows_removed,
        unknown_property_type_rows,
        trained,
        failed,
    })
}

/// Groups row indices by (property type, region), in deterministic
/// segment order. Rows whose type column holds neither `house` nor
/// `apartment` (the dataset uses `0` as a placeholder) are skipped and
/// counted.
fn partition_segments(
    df: &DataFrame,
) -> Result<(BTreeMap<Segment, Vec<u32>>, usize), AppError> {
    let types = df
        .column(columns::TYPE_OF_PROPERTY)
        .map_err(|e| {
            AppError::DataError(format!(
                "missing column '{}': {e}",
                columns::TYPE_OF_PROPERTY
            ))
        })?
        .utf8()
        .map_err(|e| AppError::DataError(e.to_string()))?;
    let regions = df
        .column(columns::REGION)
        .map_err(|e| AppError::DataError(format!("missing column '{}': {e}", columns::REGION)))?
        .utf8()
        .map_err(|e| AppError::DataError(e.to_string()))?;

    let mut segments: BTreeMap<Segment, Vec<u32>> = BTreeMap::new();
    let mut unknown = 0usize;

    for (i, (ptype, region)) in types.into_iter().zip(regions.into_iter()).enumerate() {
        let parsed = ptype
            .and_then(|t| t.parse::<PropertyType>().ok())
            .zip(region.and_then(|r| r.parse().ok()));
        match parsed {
            Some((property_type, region)) => {
                segments
                    .entry(Segment::new(property_type, region))
                    .or_default()
                    .push(i as u32);
            }
            None => unknown += 1,
        }
    }

    Ok((segments, unknown))
}
